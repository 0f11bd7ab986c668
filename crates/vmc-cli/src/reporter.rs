use anyhow::{Context, Result};
use colored::Colorize;
use rustc_hash::FxHashMap;
use serde::Serialize;

use vmc_common::{Diagnostic, DiagnosticCategory, LineMap};

/// Prefix of diagnostic codes in text output.
pub const CODE_PREFIX: &str = "VMC";

/// Renders diagnostics against the sources they point into.
pub struct Reporter {
    color: bool,
    sources: FxHashMap<String, String>,
    line_maps: FxHashMap<String, LineMap>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            sources: FxHashMap::default(),
            line_maps: FxHashMap::default(),
        }
    }

    /// Register the text of `file` so locations and snippets can be shown.
    pub fn add_source(&mut self, file: String, source: String) {
        self.line_maps.insert(file.clone(), LineMap::build(&source));
        self.sources.insert(file, source);
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            out.push_str(&self.format_diagnostic(diagnostic));
            out.push('\n');
        }
        out
    }

    /// `file:line:col - error VMC9101: message`, followed by the source line
    /// with the span underlined.
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = match self.position_for(&diagnostic.file, diagnostic.start) {
            Some((line, column)) => format!("{}:{line}:{column}", diagnostic.file),
            None if diagnostic.file.is_empty() => "<unknown>".to_string(),
            None => diagnostic.file.clone(),
        };
        if self.color {
            output = output.cyan().to_string();
        }

        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_code(diagnostic.code));
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let Some(snippet) =
            self.format_snippet(&diagnostic.file, diagnostic.start, diagnostic.length)
        {
            output.push_str(&snippet);
        }
        output
    }

    /// The line holding `start`, underlined up to the end of the span or of
    /// the line.
    ///   3   A.propTypes = { b: PropTypes.object };
    ///                       ~~~~~~~~~~~~~~~~~~~~
    fn format_snippet(&self, file: &str, start: u32, length: u32) -> Option<String> {
        if length == 0 {
            return None;
        }
        let (line_num, column) = self.position_for(file, start)?;
        let source = self.sources.get(file)?;
        let line_text = source.lines().nth(line_num as usize - 1)?;
        let line_text = line_text.strip_suffix('\r').unwrap_or(line_text);

        let span_chars = source
            .get(start as usize..(start + length) as usize)
            .map_or(1, |text| text.chars().take_while(|&ch| ch != '\n').count().max(1));
        let mut underline = String::new();
        for (i, ch) in line_text.chars().enumerate() {
            let i = i as u32 + 1;
            if i < column {
                underline.push(if ch == '\t' { '\t' } else { ' ' });
            } else if ((i - column) as usize) < span_chars {
                underline.push('~');
            } else {
                break;
            }
        }
        if !underline.contains('~') {
            underline.push('~');
        }

        let underline = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        Some(format!("\n  {line_num:>3}   {line_text}\n        {underline}"))
    }

    /// One-based line and column of `offset` in `file`.
    fn position_for(&self, file: &str, offset: u32) -> Option<(u32, u32)> {
        let source = self.sources.get(file)?;
        let line_map = self.line_maps.get(file)?;
        let position = line_map.offset_to_position(offset, source);
        Some((position.line + 1, position.character + 1))
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            _ => label.blue().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let text = format!("{CODE_PREFIX}{code}");
        if self.color {
            text.bright_black().to_string()
        } else {
            text
        }
    }

    /// `Found 3 errors in 2 files.`
    pub fn summary(&self, error_count: usize, file_count: usize) -> String {
        let errors = if error_count == 1 { "error" } else { "errors" };
        let files = if file_count == 1 { "file" } else { "files" };
        let text = format!("Found {error_count} {errors} in {file_count} {files}.");
        if self.color && error_count > 0 {
            text.bold().to_string()
        } else {
            text
        }
    }

    /// Diagnostics as a JSON array, with one-based line and column added.
    pub fn render_json(&self, diagnostics: &[Diagnostic]) -> Result<String> {
        let entries: Vec<JsonDiagnostic<'_>> = diagnostics
            .iter()
            .map(|diagnostic| {
                let (line, column) = self
                    .position_for(&diagnostic.file, diagnostic.start)
                    .unwrap_or((0, 0));
                JsonDiagnostic {
                    file: &diagnostic.file,
                    start: diagnostic.start,
                    length: diagnostic.length,
                    line,
                    column,
                    category: diagnostic.category,
                    code: diagnostic.code,
                    message: &diagnostic.message_text,
                }
            })
            .collect();
        serde_json::to_string_pretty(&entries).context("failed to serialize diagnostics")
    }
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    file: &'a str,
    start: u32,
    length: u32,
    line: u32,
    column: u32,
    category: DiagnosticCategory,
    code: u32,
    message: &'a str,
}
