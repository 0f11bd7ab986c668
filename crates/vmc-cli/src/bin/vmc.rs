#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use vmc_cli::args::{CliArgs, OutputFormat};
use vmc_cli::driver;
use vmc_cli::reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DIAGNOSTICS: i32 = 1;
const EXIT_FAILURE: i32 = 2;

fn main() {
    // No-op unless VMC_LOG or RUST_LOG is set
    vmc_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let code = match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

fn run(args: &CliArgs) -> Result<i32> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let result = driver::run(args, &cwd)?;

    if args.verbose {
        for file in &result.files {
            let status = if file.parse_failed {
                "syntax errors".to_string()
            } else if file.diagnostics.is_empty() {
                "ok".to_string()
            } else {
                format!("{} diagnostic(s)", file.diagnostics.len())
            };
            eprintln!("{}: {status}", file.path.display());
        }
        for path in &result.written {
            eprintln!("wrote {}", path.display());
        }
    }

    let diagnostics: Vec<_> = result.diagnostics().cloned().collect();
    let mut reporter = Reporter::new(args.use_color(std::io::stderr().is_terminal()));
    for file in &result.files {
        if !file.diagnostics.is_empty() {
            reporter.add_source(file.path.display().to_string(), file.source.clone());
        }
    }

    match args.format {
        OutputFormat::Json => println!("{}", reporter.render_json(&diagnostics)?),
        OutputFormat::Text => {
            if !diagnostics.is_empty() {
                eprint!("{}", reporter.render(&diagnostics));
                let failed_files = result
                    .files
                    .iter()
                    .filter(|file| !file.diagnostics.is_empty())
                    .count();
                eprintln!("\n{}", reporter.summary(diagnostics.len(), failed_files));
            }
        }
    }

    Ok(if result.has_errors() {
        EXIT_DIAGNOSTICS
    } else {
        EXIT_SUCCESS
    })
}
