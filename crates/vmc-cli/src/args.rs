use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the vmc binary.
#[derive(Parser, Debug)]
#[command(
    name = "vmc",
    version,
    about = "Validate component propTypes against their viewModelMeta overrides"
)]
pub struct CliArgs {
    /// Files or directories to check. Defaults to the current directory.
    pub paths: Vec<PathBuf>,

    /// Path to vmc.json or a directory containing it.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Glob patterns selecting the files to check.
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Glob patterns excluding files from the check.
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Write a `<Component>.json` type model for every clean component.
    #[arg(long = "out-dir", alias = "outDir")]
    pub out_dir: Option<PathBuf>,

    /// Diagnostic output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Always use color and source snippets, even when stderr is not a terminal.
    #[arg(long)]
    pub pretty: bool,

    /// Disable colored output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Print per-file progress to stderr.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl CliArgs {
    /// Whether text output should be colored, given whether stderr is a terminal.
    pub fn use_color(&self, is_terminal: bool) -> bool {
        !self.no_color && (self.pretty || is_terminal)
    }
}
