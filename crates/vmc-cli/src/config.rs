use anyhow::{Context, Result, bail};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use vmc_checker::CheckerOptions;
use vmc_checker::vocabulary::{PROP_TYPES_FIELD, VIEW_MODEL_META_FIELD};

use crate::args::CliArgs;

pub const CONFIG_FILE_NAME: &str = "vmc.json";

/// Contents of `vmc.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VmcConfig {
    #[serde(default = "default_include")]
    pub include: Vec<String>,
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
    #[serde(default = "default_prop_types_field")]
    pub prop_types_field: String,
    #[serde(default = "default_meta_field")]
    pub meta_field: String,
}

impl Default for VmcConfig {
    fn default() -> Self {
        VmcConfig {
            include: default_include(),
            exclude: default_exclude(),
            out_dir: None,
            prop_types_field: default_prop_types_field(),
            meta_field: default_meta_field(),
        }
    }
}

fn default_include() -> Vec<String> {
    vec!["**/*.jsx".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

fn default_prop_types_field() -> String {
    PROP_TYPES_FIELD.to_string()
}

fn default_meta_field() -> String {
    VIEW_MODEL_META_FIELD.to_string()
}

pub fn parse_config(source: &str) -> Result<VmcConfig> {
    let config: VmcConfig = serde_json::from_str(source).context("failed to parse vmc.json")?;
    if config.prop_types_field.is_empty() || config.meta_field.is_empty() {
        bail!("propTypesField and metaField must not be empty");
    }
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<VmcConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&source).with_context(|| format!("invalid config {}", path.display()))
}

/// `vmc.json` in `cwd`, if present.
pub fn find_config(cwd: &Path) -> Option<PathBuf> {
    let candidate = cwd.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Locate the config file. An explicit path must exist; a directory is
/// searched for `vmc.json`.
pub fn resolve_config_path(cwd: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(explicit) = explicit else {
        return Ok(find_config(cwd));
    };

    let mut candidate = if explicit.is_absolute() {
        explicit.to_path_buf()
    } else {
        cwd.join(explicit)
    };
    if candidate.is_dir() {
        candidate = candidate.join(CONFIG_FILE_NAME);
    }
    if !candidate.is_file() {
        bail!("config not found at {}", candidate.display());
    }
    Ok(Some(candidate))
}

/// Config merged with the command line, globs compiled.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub include: GlobSet,
    pub exclude: GlobSet,
    pub out_dir: Option<PathBuf>,
    pub checker: CheckerOptions,
}

/// Apply CLI overrides to `config`. Relative `outDir` values from the file
/// resolve against `config_dir`; those from the command line against `cwd`.
pub fn resolve_options(
    args: &CliArgs,
    config: VmcConfig,
    config_dir: &Path,
    cwd: &Path,
) -> Result<ResolvedOptions> {
    let include = if args.include.is_empty() {
        &config.include
    } else {
        &args.include
    };
    let exclude = if args.exclude.is_empty() {
        &config.exclude
    } else {
        &args.exclude
    };
    let out_dir = match (&args.out_dir, &config.out_dir) {
        (Some(dir), _) => Some(cwd.join(dir)),
        (None, Some(dir)) => Some(config_dir.join(dir)),
        (None, None) => None,
    };

    Ok(ResolvedOptions {
        include: build_glob_set(include)?,
        exclude: build_glob_set(exclude)?,
        out_dir,
        checker: CheckerOptions {
            prop_types_field: config.prop_types_field,
            meta_field: config.meta_field,
        },
    })
}

pub fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("invalid glob pattern '{pattern}'"))?;
        builder.add(glob);
    }
    builder.build().context("failed to compile glob patterns")
}
