//! Argument parsing and output rendering for the `pgscript` binary.

use anyhow::{Result, anyhow, bail};
use pgscript::{Delimiter, OutputFormat, ScriptConfig};
use serde::Serialize;
use sqlformat::{FormatOptions, QueryParams, format};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Split(SplitArgs),
    Escape(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitArgs {
    /// Script file; stdin when absent
    pub input: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub delimiter: Option<String>,
    pub json: bool,
    pub format: bool,
}

impl SplitArgs {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, mut config: ScriptConfig) -> Result<ScriptConfig> {
        if let Some(delimiter) = &self.delimiter {
            config.delimiter = Delimiter::new(delimiter.as_str())?;
        }
        if self.json {
            config.output = OutputFormat::Json;
        }
        if self.format {
            config.format_statements = true;
        }
        Ok(config)
    }
}

pub fn parse_args(args: &[String]) -> Result<Command> {
    let mut args = args.iter().peekable();

    match args.peek().map(|a| a.as_str()) {
        Some("--help" | "-h" | "help") => return Ok(Command::Help),
        Some("escape") => {
            args.next();
            let names: Vec<String> = args.cloned().collect();
            if names.is_empty() {
                bail!("escape requires at least one identifier");
            }
            return Ok(Command::Escape(names));
        }
        Some("split") => {
            args.next();
        }
        _ => {}
    }

    let mut split = SplitArgs::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--json" => split.json = true,
            "--format" => split.format = true,
            "--delimiter" | "-d" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("{} requires a value", arg))?;
                split.delimiter = Some(value.clone());
            }
            "--config" | "-c" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("{} requires a value", arg))?;
                split.config = Some(PathBuf::from(value));
            }
            flag if flag.starts_with('-') && flag != "-" => bail!("Unknown option: {}", flag),
            path => {
                if split.input.is_some() {
                    bail!("Only one input file may be given (extra: {})", path);
                }
                if path != "-" {
                    split.input = Some(PathBuf::from(path));
                }
            }
        }
    }

    Ok(Command::Split(split))
}

pub fn print_usage() {
    println!("pgscript - split SQL scripts into statements");
    println!();
    println!("USAGE:");
    println!("    pgscript [split] [OPTIONS] [FILE]");
    println!("    pgscript escape <NAME>...");
    println!();
    println!("OPTIONS:");
    println!("    -d, --delimiter <D>    Statement delimiter (default: ;)");
    println!("    -c, --config <PATH>    Config file (default: ~/.pgscript/config.json)");
    println!("        --json             Print statements as a JSON array");
    println!("        --format           Pretty-print each statement");
    println!("    -h, --help             Show this message");
    println!();
    println!("Reads the script from stdin when FILE is omitted or '-'.");
}

#[derive(Debug, Serialize)]
struct StatementEntry<'a> {
    index: usize,
    statement: &'a str,
}

/// Render statements in the configured output format.
pub fn render(statements: &[String], config: &ScriptConfig) -> Result<String> {
    let statements: Vec<String> = if config.format_statements {
        statements
            .iter()
            .map(|s| format(s, &QueryParams::None, &FormatOptions::default()))
            .collect()
    } else {
        statements.to_vec()
    };

    match config.output {
        OutputFormat::Plain => Ok(statements.join("\n\n")),
        OutputFormat::Json => {
            let entries: Vec<StatementEntry> = statements
                .iter()
                .enumerate()
                .map(|(index, statement)| StatementEntry { index, statement })
                .collect();
            Ok(serde_json::to_string_pretty(&entries)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults_to_split_from_stdin() {
        assert_eq!(
            parse_args(&[]).unwrap(),
            Command::Split(SplitArgs::default())
        );
        assert_eq!(
            parse_args(&args(&["split", "-"])).unwrap(),
            Command::Split(SplitArgs::default())
        );
    }

    #[test]
    fn test_parse_split_options() {
        let command =
            parse_args(&args(&["--json", "-d", "GO", "--format", "schema.sql"])).unwrap();
        assert_eq!(
            command,
            Command::Split(SplitArgs {
                input: Some(PathBuf::from("schema.sql")),
                config: None,
                delimiter: Some("GO".to_string()),
                json: true,
                format: true,
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["--delimiter"])).is_err());
        assert!(parse_args(&args(&["--verbose"])).is_err());
        assert!(parse_args(&args(&["a.sql", "b.sql"])).is_err());
        assert!(parse_args(&args(&["escape"])).is_err());
    }

    #[test]
    fn test_parse_escape_and_help() {
        assert_eq!(
            parse_args(&args(&["escape", "users", "user table"])).unwrap(),
            Command::Escape(args(&["users", "user table"]))
        );
        assert_eq!(parse_args(&args(&["-h"])).unwrap(), Command::Help);
        assert_eq!(
            parse_args(&args(&["split", "--help"])).unwrap(),
            Command::Help
        );
    }

    #[test]
    fn test_apply_overrides() {
        let split = SplitArgs {
            delimiter: Some("//".to_string()),
            json: true,
            ..Default::default()
        };
        let config = split.apply(ScriptConfig::default()).unwrap();
        assert_eq!(config.delimiter.as_str(), "//");
        assert_eq!(config.output, OutputFormat::Json);

        let bad = SplitArgs {
            delimiter: Some(String::new()),
            ..Default::default()
        };
        assert!(bad.apply(ScriptConfig::default()).is_err());
    }

    #[test]
    fn test_render_plain() {
        let statements = vec!["SELECT 1;".to_string(), "SELECT 2;".to_string()];
        assert_eq!(
            render(&statements, &ScriptConfig::default()).unwrap(),
            "SELECT 1;\n\nSELECT 2;"
        );
    }

    #[test]
    fn test_render_json() {
        let config = ScriptConfig {
            output: OutputFormat::Json,
            ..Default::default()
        };
        let statements = vec!["SELECT ';';".to_string()];
        let value: serde_json::Value =
            serde_json::from_str(&render(&statements, &config).unwrap()).unwrap();

        assert_eq!(
            value,
            serde_json::json!([{ "index": 0, "statement": "SELECT ';';" }])
        );
    }

    #[test]
    fn test_render_formatted() {
        let config = ScriptConfig {
            format_statements: true,
            ..Default::default()
        };
        let statements = vec!["select a, b from t where a = 1;".to_string()];
        let rendered = render(&statements, &config).unwrap();

        assert!(rendered.contains('\n'));
        assert!(rendered.contains("from"));
    }
}
