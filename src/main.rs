use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use drupal_printer::parser::TreeLoader;
use drupal_printer::renderer::{ArraySyntax, Printer, StyleConfig};

fn load_config(path: Option<&PathBuf>) -> Result<StyleConfig> {
    let Some(path) = path else {
        return Ok(StyleConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid config {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("drupal-printer")
        .about("Render a PHP syntax tree dump as Drupal-style source")
        .arg(
            Arg::new("input")
                .help("JSON syntax tree dump")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("html")
                .long("html")
                .help("Wrap keywords, names and literals in highlighting markup")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("long-arrays")
                .long("long-arrays")
                .help("Render arrays as array(...) unless the tree says otherwise")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("generic-style")
                .long("generic-style")
                .help("Skip hook and callback classification of string literals")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("JSON style configuration file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .get_matches();

    let mut config = load_config(matches.get_one::<PathBuf>("config"))?;
    if matches.get_flag("html") {
        config = config.with_annotate(true);
    }
    if matches.get_flag("long-arrays") {
        config = config.with_array_syntax(ArraySyntax::Long);
    }
    if matches.get_flag("generic-style") {
        config = config.with_target_style(false);
    }
    debug!(?config, "style configuration");

    let Some(input) = matches.get_one::<PathBuf>("input") else {
        anyhow::bail!("missing input file");
    };
    let tree = TreeLoader::load(input)?;

    let mut printer = Printer::new(config);
    let output = printer
        .render(&tree.stmts)
        .with_context(|| format!("Failed to render {}", input.display()))?;

    print!("{}", output);

    Ok(())
}
