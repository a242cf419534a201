//! tallysheet - a terminal spreadsheet with typed cells and formulas

mod config;
mod error;
mod tui;

use error::CliError;
use std::env;
use std::path::PathBuf;
use tallysheet_core::Document;
use tallysheet_engine::engine::{Evaluator, FormulaCell, format_number};

fn print_usage() {
    eprintln!("Usage: tallysheet [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Spreadsheet file to open (.csv)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <FORMULA>   Evaluate a formula against FILE and print the result");
    eprintln!("  -o, --output <FILE>       Re-save FILE as CSV to this path (non-interactive)");
    eprintln!("  --config <FILE>           Read settings from this TOML file");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    file: Option<PathBuf>,
    command: Option<String>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Options, CliError> {
    let mut opts = Options::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| CliError::MissingValue(flag.to_string()))
        };
        match arg.as_str() {
            "-h" | "--help" => opts.help = true,
            "-c" | "--command" => opts.command = Some(value("--command")?),
            "-o" | "--output" => opts.output = Some(PathBuf::from(value("--output")?)),
            "--config" => opts.config = Some(PathBuf::from(value("--config")?)),
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(CliError::UnknownOption(other.to_string()));
            }
            other => {
                if opts.file.is_some() {
                    return Err(CliError::UnexpectedArgument(other.to_string()));
                }
                opts.file = Some(PathBuf::from(other));
            }
        }
    }

    if opts.command.is_some() && opts.output.is_some() {
        return Err(CliError::ConflictingModes);
    }
    Ok(opts)
}

/// Evaluate `formula` (with or without a leading `=`) against the document.
/// Prints the value, or the error code, and returns the process exit code.
fn run_command(doc: &Document, formula: &str) -> i32 {
    let source = if formula.trim_start().starts_with('=') {
        formula.trim().to_string()
    } else {
        format!("={}", formula.trim())
    };
    let cell = FormulaCell::new(&source);
    match Evaluator::new(&doc.grid).formula(&cell) {
        Ok(value) => {
            println!("{}", format_number(value));
            0
        }
        Err(err) => {
            println!("{}", err.short_code());
            eprintln!("Error: {}", err);
            1
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let opts = match parse_args(&args) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };
    if opts.help {
        print_usage();
        return;
    }

    let (config, warnings) = config::load_config(opts.config.as_deref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let mut doc = match Document::with_file(opts.file.clone(), config.rows, config.columns) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(formula) = opts.command {
        std::process::exit(run_command(&doc, &formula));
    }

    if let Some(output_path) = opts.output {
        if let Err(e) = doc.save_as(&output_path) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        println!("Saved to {}", output_path.display());
        return;
    }

    let mut app = tui::App::new(doc, &config);
    if let Err(e) = tui::run(&mut app) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("tallysheet")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_parse_args_file_and_flags() {
        let opts = parse_args(&args(&["sheet.csv", "-c", "=A1+1", "--config", "c.toml"])).unwrap();
        assert_eq!(
            opts,
            Options {
                file: Some(PathBuf::from("sheet.csv")),
                command: Some("=A1+1".to_string()),
                config: Some(PathBuf::from("c.toml")),
                ..Options::default()
            }
        );
    }

    #[test]
    fn test_parse_args_errors() {
        assert_eq!(
            parse_args(&args(&["-o"])),
            Err(CliError::MissingValue("--output".to_string()))
        );
        assert_eq!(
            parse_args(&args(&["--frobnicate"])),
            Err(CliError::UnknownOption("--frobnicate".to_string()))
        );
        assert_eq!(
            parse_args(&args(&["a.csv", "b.csv"])),
            Err(CliError::UnexpectedArgument("b.csv".to_string()))
        );
        assert_eq!(
            parse_args(&args(&["-c", "1", "-o", "x.csv"])),
            Err(CliError::ConflictingModes)
        );
    }

    #[test]
    fn test_negative_number_formula_is_not_a_flag() {
        let opts = parse_args(&args(&["-c", "-5"])).unwrap();
        assert_eq!(opts.command.as_deref(), Some("-5"));
    }

    #[test]
    fn test_run_command_exit_codes() {
        let mut doc = Document::new();
        doc.set_cell_from_input(tallysheet_core::Location::new(0, 0), "4");
        assert_eq!(run_command(&doc, "A1 * 2"), 0);
        assert_eq!(run_command(&doc, "=A1 / 0"), 1);
    }
}
