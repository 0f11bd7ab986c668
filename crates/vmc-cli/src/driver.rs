//! File discovery and the per-file parse, bind and check pipeline.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use vmc_binder::BinderState;
use vmc_checker::{CheckerOptions, ComponentModel, ContractChecker};
use vmc_common::Diagnostic;
use vmc_parser::parser::ParserState;

use crate::args::CliArgs;
use crate::config::{ResolvedOptions, VmcConfig, load_config, resolve_config_path, resolve_options};

/// Outcome of checking one file.
#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
    pub model: Option<ComponentModel>,
    /// The file had syntax errors and was not checked.
    pub parse_failed: bool,
}

#[derive(Debug, Default)]
pub struct CheckResult {
    /// Per-file results, sorted by path
    pub files: Vec<FileResult>,
    /// Model files written to the output directory
    pub written: Vec<PathBuf>,
}

impl CheckResult {
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.files.iter().flat_map(|file| file.diagnostics.iter())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics().count()
    }

    pub fn has_errors(&self) -> bool {
        self.files.iter().any(|file| !file.diagnostics.is_empty())
    }

    pub fn models(&self) -> impl Iterator<Item = &ComponentModel> {
        self.files.iter().filter_map(|file| file.model.as_ref())
    }
}

/// Resolve the configuration, check every selected file and write the
/// models when nothing was reported.
pub fn run(args: &CliArgs, cwd: &Path) -> Result<CheckResult> {
    let config_path = resolve_config_path(cwd, args.config.as_deref())?;
    let (config, config_dir) = match &config_path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            let dir = path.parent().unwrap_or(cwd).to_path_buf();
            (load_config(path)?, dir)
        }
        None => (VmcConfig::default(), cwd.to_path_buf()),
    };
    let options = resolve_options(args, config, &config_dir, cwd)?;

    let roots: Vec<PathBuf> = if args.paths.is_empty() {
        vec![cwd.to_path_buf()]
    } else {
        args.paths.iter().map(|path| cwd.join(path)).collect()
    };
    let files = collect_files(&roots, &options)?;
    info!(files = files.len(), "checking component modules");

    let mut result = CheckResult {
        files: check_files(&files, &options.checker)?,
        written: Vec::new(),
    };

    if let Some(out_dir) = &options.out_dir {
        if result.has_errors() {
            debug!("skipping model output: diagnostics were reported");
        } else {
            result.written = write_models(out_dir, result.models())?;
        }
    }
    Ok(result)
}

/// Files under `roots` selected by the include and exclude globs, sorted.
/// Globs match paths relative to the root being walked. A root that is a
/// file is always selected.
pub fn collect_files(roots: &[PathBuf], options: &ResolvedOptions) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }
        if !root.is_dir() {
            anyhow::bail!("path not found: {}", root.display());
        }

        for entry in WalkDir::new(root).follow_links(true) {
            let entry =
                entry.with_context(|| format!("failed to walk directory {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            if options.include.is_match(relative) && !options.exclude.is_match(relative) {
                files.push(path.to_path_buf());
            } else {
                debug!(path = %relative.display(), "file not selected");
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Check `files` in parallel. Results are sorted by path.
pub fn check_files(files: &[PathBuf], options: &CheckerOptions) -> Result<Vec<FileResult>> {
    let mut results = files
        .par_iter()
        .map(|path| check_file(path, options))
        .collect::<Result<Vec<_>>>()?;
    results.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(results)
}

pub fn check_file(path: &Path, options: &CheckerOptions) -> Result<FileResult> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(check_source(path.to_path_buf(), source, options))
}

/// Parse, bind and check one module. Files with syntax errors report only
/// those errors.
pub fn check_source(path: PathBuf, source: String, options: &CheckerOptions) -> FileResult {
    let file_name = path.display().to_string();
    let mut parser = ParserState::new(file_name.clone(), source);
    let root = parser.parse_source_file();

    if !parser.get_diagnostics().is_empty() {
        debug!(file = %file_name, errors = parser.get_diagnostics().len(), "skipping check after parse errors");
        let diagnostics = parser
            .get_diagnostics()
            .iter()
            .map(|diag| {
                Diagnostic::error(
                    file_name.clone(),
                    diag.start,
                    diag.length,
                    diag.message.clone(),
                    diag.code,
                )
            })
            .collect();
        return FileResult {
            path,
            source: parser.get_source_text().to_string(),
            diagnostics,
            model: None,
            parse_failed: true,
        };
    }

    let mut binder = BinderState::new();
    binder.bind_source_file(parser.get_arena(), root);

    let mut checker = ContractChecker::new(
        parser.get_arena(),
        &binder,
        file_name,
        options.clone(),
    );
    checker.check_source_file(root);
    let diagnostics = checker.to_diagnostics();
    let model = checker.into_component_model();

    FileResult {
        path,
        source: parser.get_source_text().to_string(),
        diagnostics,
        model,
        parse_failed: false,
    }
}

/// Write each model as `<name>.json` under `out_dir`.
pub fn write_models<'a>(
    out_dir: &Path,
    models: impl Iterator<Item = &'a ComponentModel>,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

    let mut written = Vec::new();
    for model in models {
        let path = out_dir.join(format!("{}.json", model.name));
        let mut json = serde_json::to_string_pretty(model)
            .with_context(|| format!("failed to serialize model for {}", model.name))?;
        json.push('\n');
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "wrote component model");
        written.push(path);
    }
    Ok(written)
}
