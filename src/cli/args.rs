//! Command line argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::ServeConfig;
use crate::dataset::store::DEFAULT_TABLE_NAME;

/// Disaster response message pipeline: ETL, model training and web service
#[derive(Parser, Debug, Clone)]
#[command(name = "disaster-response")]
#[command(about = "Classify disaster response messages into 36 categories")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct DisasterArgs {
    /// Verbosity level (repeat for more output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl DisasterArgs {
    /// Effective verbosity: 0 when quiet, otherwise 1 plus the `-v` count.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Parse `argv`, or print the usage (or help) text and return `None`.
///
/// A malformed command line is not a failure of the pipeline: the caller
/// simply stops without doing any work and without an error status.
pub fn parse_or_usage<I, T>(argv: I) -> Option<DisasterArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match DisasterArgs::try_parse_from(argv) {
        Ok(args) => Some(args),
        Err(e) => {
            if let Err(print_error) = e.print() {
                log::error!("Failed to print usage: {print_error}");
            }
            None
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load, clean and store the message and category CSV files
    Process(ProcessArgs),

    /// Train, evaluate and save the classifier
    Train(TrainArgs),

    /// Run the web application
    Serve(ServeArgs),

    /// Classify a single message with a saved model
    Classify(ClassifyArgs),
}

/// Arguments for the ETL stage
#[derive(Parser, Debug, Clone)]
pub struct ProcessArgs {
    /// Messages CSV (id, message, original, genre)
    #[arg(value_name = "MESSAGES_CSV")]
    pub messages_csv: PathBuf,

    /// Categories CSV (id, categories)
    #[arg(value_name = "CATEGORIES_CSV")]
    pub categories_csv: PathBuf,

    /// SQLite database to write
    #[arg(value_name = "DATABASE_PATH")]
    pub database_path: PathBuf,

    /// Table name
    #[arg(long, default_value = DEFAULT_TABLE_NAME)]
    pub table: String,
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// SQLite database produced by `process`
    #[arg(value_name = "DATABASE_PATH")]
    pub database_path: PathBuf,

    /// Where to write the model artifact
    #[arg(value_name = "MODEL_PATH")]
    pub model_path: PathBuf,

    /// Table name
    #[arg(long, default_value = DEFAULT_TABLE_NAME)]
    pub table: String,

    /// JSON file overriding the training configuration
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seed for the train/test shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Append a timestamp to the model file name instead of overwriting
    #[arg(long)]
    pub tag: bool,
}

/// Arguments for the web application
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// SQLite database holding the training table
    #[arg(long, env = "DISASTER_DATABASE", default_value = "data/DisasterResponse.db")]
    pub database: PathBuf,

    /// Model artifact written by `train`
    #[arg(long, env = "DISASTER_MODEL", default_value = "models/classifier.bin")]
    pub model: PathBuf,

    /// Table name
    #[arg(long, env = "DISASTER_TABLE", default_value = DEFAULT_TABLE_NAME)]
    pub table: String,

    /// Address to bind
    #[arg(long, env = "DISASTER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "DISASTER_PORT", default_value_t = 3000)]
    pub port: u16,
}

impl ServeArgs {
    pub fn to_config(&self) -> ServeConfig {
        ServeConfig {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            model: self.model.clone(),
            table: self.table.clone(),
        }
    }
}

/// Arguments for one-off classification
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Model artifact written by `train`
    #[arg(value_name = "MODEL_PATH")]
    pub model_path: PathBuf,

    /// Message to classify
    #[arg(value_name = "QUERY")]
    pub query: String,
}

/// Output format for command results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_argument_count_yields_usage() {
        assert!(parse_or_usage(["disaster-response", "process", "messages.csv"]).is_none());
        assert!(parse_or_usage(["disaster-response", "train", "db.sqlite"]).is_none());
        assert!(
            parse_or_usage(["disaster-response", "classify", "model.bin", "need water"]).is_some()
        );
    }

    #[test]
    fn test_process_args() {
        let args = DisasterArgs::try_parse_from([
            "disaster-response",
            "process",
            "messages.csv",
            "categories.csv",
            "DisasterResponse.db",
        ])
        .unwrap();

        match args.command {
            Command::Process(process) => {
                assert_eq!(process.messages_csv, PathBuf::from("messages.csv"));
                assert_eq!(process.database_path, PathBuf::from("DisasterResponse.db"));
                assert_eq!(process.table, "disaster_table");
            }
            _ => panic!("Expected Process command"),
        }
    }

    #[test]
    fn test_wrong_argument_count() {
        let result = DisasterArgs::try_parse_from([
            "disaster-response",
            "process",
            "messages.csv",
            "categories.csv",
        ]);
        assert!(result.is_err());

        let result = DisasterArgs::try_parse_from(["disaster-response", "train", "db.sqlite"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_train_args() {
        let args = DisasterArgs::try_parse_from([
            "disaster-response",
            "-vv",
            "train",
            "db.sqlite",
            "classifier.bin",
            "--seed",
            "42",
            "--tag",
        ])
        .unwrap();

        assert_eq!(args.verbosity(), 3);
        match args.command {
            Command::Train(train) => {
                assert_eq!(train.seed, Some(42));
                assert!(train.tag);
                assert!(train.config.is_none());
            }
            _ => panic!("Expected Train command"),
        }
    }

    #[test]
    fn test_classify_args() {
        let args = DisasterArgs::try_parse_from([
            "disaster-response",
            "classify",
            "classifier.bin",
            "we need water",
            "--format",
            "json",
            "-q",
        ])
        .unwrap();

        assert_eq!(args.verbosity(), 0);
        assert_eq!(args.output_format, OutputFormat::Json);
        match args.command {
            Command::Classify(classify) => assert_eq!(classify.query, "we need water"),
            _ => panic!("Expected Classify command"),
        }
    }

    #[test]
    fn test_serve_to_config() {
        let args = DisasterArgs::try_parse_from([
            "disaster-response",
            "serve",
            "--port",
            "8080",
            "--model",
            "m.bin",
        ])
        .unwrap();

        match args.command {
            Command::Serve(serve) => {
                let config = serve.to_config();
                assert_eq!(config.port, 8080);
                assert_eq!(config.model, PathBuf::from("m.bin"));
            }
            _ => panic!("Expected Serve command"),
        }
    }
}
