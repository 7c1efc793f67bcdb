mod cli;

use anyhow::{Context, Result};
use cli::{Command, SplitArgs};
use pgscript::{ScriptConfig, escape_identifier};
use std::io::Read;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match cli::parse_args(&args)? {
        Command::Help => {
            cli::print_usage();
            Ok(())
        }
        Command::Split(split) => run_split(&split),
        Command::Escape(names) => run_escape(&names),
    }
}

fn run_split(args: &SplitArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ScriptConfig::from_path(path)?,
        None => ScriptConfig::load()?,
    };
    let config = args.apply(config)?;

    let script = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?,
        None => {
            let mut script = String::new();
            std::io::stdin()
                .read_to_string(&mut script)
                .context("Failed to read script from stdin")?;
            script
        }
    };

    let statements = config.splitter().split(&script);
    tracing::info!(
        "Found {} statement(s) using delimiter {:?}",
        statements.len(),
        config.delimiter.as_str()
    );

    let output = cli::render(&statements, &config)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

fn run_escape(names: &[String]) -> Result<()> {
    for name in names {
        let escaped =
            escape_identifier(name).with_context(|| format!("Cannot escape {:?}", name))?;
        println!("{}", escaped);
    }
    Ok(())
}
