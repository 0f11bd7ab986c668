use super::args::{CliArgs, OutputFormat};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn parses_paths_and_defaults() {
    let args = CliArgs::try_parse_from(["vmc", "src", "lib/Card.jsx"]).expect("parse");
    assert_eq!(
        args.paths,
        vec![PathBuf::from("src"), PathBuf::from("lib/Card.jsx")]
    );
    assert_eq!(args.format, OutputFormat::Text);
    assert!(args.include.is_empty());
    assert!(args.out_dir.is_none());
    assert!(!args.verbose);
}

#[test]
fn parses_comma_separated_globs() {
    let args = CliArgs::try_parse_from([
        "vmc",
        "--include",
        "**/*.jsx,**/*.js",
        "--exclude",
        "**/dist/**",
        "--out-dir",
        "generated",
        "--format",
        "json",
    ])
    .expect("parse");
    assert_eq!(args.include, vec!["**/*.jsx", "**/*.js"]);
    assert_eq!(args.exclude, vec!["**/dist/**"]);
    assert_eq!(args.out_dir, Some(PathBuf::from("generated")));
    assert_eq!(args.format, OutputFormat::Json);
}

#[test]
fn color_follows_terminal_unless_overridden() {
    let plain = CliArgs::try_parse_from(["vmc"]).expect("parse");
    assert!(plain.use_color(true));
    assert!(!plain.use_color(false));

    let pretty = CliArgs::try_parse_from(["vmc", "--pretty"]).expect("parse");
    assert!(pretty.use_color(false));

    let no_color = CliArgs::try_parse_from(["vmc", "--pretty", "--no-color"]).expect("parse");
    assert!(!no_color.use_color(true));
}

#[test]
fn rejects_unknown_format() {
    assert!(CliArgs::try_parse_from(["vmc", "--format", "xml"]).is_err());
}
