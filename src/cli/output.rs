//! Output formatting for CLI commands.

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::cli::args::{DisasterArgs, OutputFormat};
use crate::error::Result;

/// Result structure for the ETL stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub database_path: String,
    pub table: String,
    pub rows_loaded: usize,
    pub rows_saved: usize,
    pub label_columns: usize,
}

/// Result structure for training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub model_path: String,
    pub best_params: String,
    pub cv_recall_micro: f64,
    pub training_rows: usize,
    pub test_rows: usize,
    pub test_recall_micro: f64,
    pub test_f1_micro: f64,
}

/// Result structure for a single classification.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassificationOutput {
    pub query: String,
    pub classification_result: BTreeMap<String, u8>,
}

/// Whether stage-by-stage progress lines are shown: always, unless quiet
/// or emitting JSON.
pub fn shows_progress(args: &DisasterArgs) -> bool {
    args.verbosity() > 0 && args.output_format == OutputFormat::Human
}

/// Progress lines printed while a long-running command works.
#[derive(Debug)]
pub struct Progress<W: Write> {
    out: W,
    enabled: bool,
}

impl Progress<io::Stdout> {
    pub fn stdout(args: &DisasterArgs) -> Self {
        Progress::new(io::stdout(), shows_progress(args))
    }
}

impl Progress<io::Sink> {
    pub fn silent() -> Self {
        Progress::new(io::sink(), false)
    }
}

impl<W: Write> Progress<W> {
    pub fn new(out: W, enabled: bool) -> Self {
        Progress { out, enabled }
    }

    /// Print one progress message. Messages may span several lines.
    pub fn step<S: AsRef<str>>(&mut self, message: S) -> Result<()> {
        let message = message.as_ref();
        log::debug!("{message}");
        if self.enabled {
            writeln!(self.out, "{message}")?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Output a result in the selected format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &DisasterArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_human<T: Serialize>(message: &str, result: &T, args: &DisasterArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    print!("{}", render_human(&value, 0));
    Ok(())
}

fn output_json<T: Serialize>(result: &T, args: &DisasterArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// Render a JSON value as indented `key: value` lines.
fn render_human(value: &serde_json::Value, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    let mut out = String::new();
    match value {
        serde_json::Value::Object(map) => {
            for (key, value) in map {
                match value {
                    serde_json::Value::Object(_) => {
                        out.push_str(&format!("{pad}{key}:\n"));
                        out.push_str(&render_human(value, indent + 1));
                    }
                    serde_json::Value::String(text) => {
                        out.push_str(&format!("{pad}{key}: {text}\n"));
                    }
                    other => out.push_str(&format!("{pad}{key}: {other}\n")),
                }
            }
        }
        other => out.push_str(&format!("{pad}{other}\n")),
    }
    out
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn parse(extra: &[&str]) -> DisasterArgs {
        let mut argv = vec!["disaster-response"];
        argv.extend_from_slice(extra);
        argv.extend_from_slice(&["process", "messages.csv", "categories.csv", "db.sqlite"]);
        DisasterArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_progress_shown_by_default() {
        assert!(shows_progress(&parse(&[])));
        assert!(shows_progress(&parse(&["-v"])));
        assert!(!shows_progress(&parse(&["-q"])));
        assert!(!shows_progress(&parse(&["--format", "json"])));
    }

    #[test]
    fn test_progress_steps() {
        let mut progress = Progress::new(Vec::new(), true);
        progress.step("Loading data...").unwrap();
        progress.step("Saving data...\n    DATABASE: db.sqlite").unwrap();
        let text = String::from_utf8(progress.into_inner()).unwrap();
        assert_eq!(text, "Loading data...\nSaving data...\n    DATABASE: db.sqlite\n");

        let mut hidden = Progress::new(Vec::new(), false);
        hidden.step("Loading data...").unwrap();
        assert!(hidden.into_inner().is_empty());
    }

    #[test]
    fn test_render_human() {
        let output = ClassificationOutput {
            query: "need water".to_string(),
            classification_result: BTreeMap::from([
                ("food".to_string(), 0),
                ("water".to_string(), 1),
            ]),
        };
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(
            render_human(&value, 0),
            "classification_result:\n  food: 0\n  water: 1\nquery: need water\n"
        );
    }
}
