//! Command implementations for the disaster-response CLI.

use std::io::Write;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::analysis::analyzer::MessageAnalyzer;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::TrainingConfig;
use crate::dataset::clean::clean_data;
use crate::dataset::ingest::load_data;
use crate::dataset::store::{load_table, save_table};
use crate::dataset::table::MessageTable;
use crate::error::{DisasterError, Result};
use crate::ml::artifact::{ModelArtifact, versioned_path};
use crate::ml::grid_search::GridSearch;
use crate::ml::metrics::ClassificationReport;
use crate::ml::split::train_test_split;

/// Execute a CLI command.
pub fn execute_command(args: DisasterArgs) -> Result<()> {
    match &args.command {
        Command::Process(process_args) => process(process_args, &args),
        Command::Train(train_args) => train(train_args, &args),
        Command::Serve(serve_args) => serve(serve_args),
        Command::Classify(classify_args) => classify(classify_args, &args),
    }
}

/// Load both CSV files, clean them and overwrite the database table.
fn process(args: &ProcessArgs, cli_args: &DisasterArgs) -> Result<()> {
    let summary = run_process(args, &mut Progress::stdout(cli_args))?;
    output_result("Cleaned data saved to database!", &summary, cli_args)
}

/// The ETL stage, reporting each step to `progress`.
pub fn run_process<W: Write>(args: &ProcessArgs, progress: &mut Progress<W>) -> Result<ProcessSummary> {
    progress.step(format!(
        "Loading data...\n    MESSAGES: {}\n    CATEGORIES: {}",
        args.messages_csv.display(),
        args.categories_csv.display()
    ))?;
    let joined = load_data(&args.messages_csv, &args.categories_csv)?;

    progress.step("Cleaning data...")?;
    let table = clean_data(&joined)?;

    progress.step(format!("Saving data...\n    DATABASE: {}", args.database_path.display()))?;
    save_table(&table, &args.database_path, &args.table)?;

    Ok(ProcessSummary {
        database_path: args.database_path.display().to_string(),
        table: args.table.clone(),
        rows_loaded: joined.len(),
        rows_saved: table.len(),
        label_columns: table.label_names().len(),
    })
}

/// A trained model with its held-out evaluation.
#[derive(Debug)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub report: ClassificationReport,
    pub training_rows: usize,
    pub test_rows: usize,
}

/// Split, grid-search, refit and evaluate on `table`.
pub fn train_model(table: &MessageTable, config: &TrainingConfig) -> Result<TrainingOutcome> {
    train_model_with_progress(table, config, &mut Progress::silent())
}

/// [`train_model`], reporting each stage to `progress`.
pub fn train_model_with_progress<W: Write>(
    table: &MessageTable,
    config: &TrainingConfig,
    progress: &mut Progress<W>,
) -> Result<TrainingOutcome> {
    config.validate()?;
    if table.is_empty() {
        return Err(DisasterError::model("cannot train on an empty table"));
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let (train, test) = train_test_split(table.len(), config.test_size, &mut rng)?;
    log::info!("Split {} rows into {} train / {} test", table.len(), train.len(), test.len());

    let label_names = table.label_names().to_vec();
    let analyzer = MessageAnalyzer::new();
    let documents = table
        .messages()
        .par_iter()
        .map(|message| analyzer.tokenize(message))
        .collect::<Result<Vec<Vec<String>>>>()?;
    let labels = table.label_matrix();

    let train_documents: Vec<Vec<String>> = train.iter().map(|&i| documents[i].clone()).collect();
    let train_labels: Vec<Vec<u8>> = train.iter().map(|&i| labels[i].clone()).collect();

    progress.step("Building model...")?;
    let search = GridSearch::from_config(config)?;
    progress.step("Training model...")?;
    let result = search.fit(&train_documents, &train_labels, &label_names)?;

    progress.step("Evaluating model...")?;
    let mut predicted = Vec::with_capacity(test.len());
    let mut actual = Vec::with_capacity(test.len());
    for &i in &test {
        predicted.push(result.best_pipeline.predict_tokens(&documents[i])?);
        actual.push(labels[i].clone());
    }
    let report = ClassificationReport::new(&label_names, &actual, &predicted)?;

    Ok(TrainingOutcome {
        artifact: ModelArtifact::new(result.best_pipeline, Some(result.best_score), train.len()),
        report,
        training_rows: train.len(),
        test_rows: test.len(),
    })
}

/// Train on the stored table and write the model artifact.
fn train(args: &TrainArgs, cli_args: &DisasterArgs) -> Result<()> {
    let summary = run_train(args, &mut Progress::stdout(cli_args))?;
    output_result("Trained model saved!", &summary, cli_args)
}

/// The training stage, reporting each step and the evaluation to `progress`.
pub fn run_train<W: Write>(args: &TrainArgs, progress: &mut Progress<W>) -> Result<TrainingSummary> {
    let mut config = match &args.config {
        Some(path) => TrainingConfig::from_file(path)?,
        None => TrainingConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    progress.step(format!("Loading data...\n    DATABASE: {}", args.database_path.display()))?;
    let table = load_table(&args.database_path, &args.table)?;

    let outcome = train_model_with_progress(&table, &config, progress)?;
    progress.step(outcome.report.to_string())?;

    let model_path: PathBuf = if args.tag {
        versioned_path(&args.model_path, outcome.artifact.trained_at)
    } else {
        args.model_path.clone()
    };
    progress.step(format!("Saving model...\n    MODEL: {}", model_path.display()))?;
    outcome.artifact.save(&model_path)?;

    Ok(TrainingSummary {
        model_path: model_path.display().to_string(),
        best_params: outcome.artifact.params.to_string(),
        cv_recall_micro: outcome.artifact.cv_score.unwrap_or(0.0),
        training_rows: outcome.training_rows,
        test_rows: outcome.test_rows,
        test_recall_micro: outcome.report.micro_avg.recall,
        test_f1_micro: outcome.report.micro_avg.f1,
    })
}

/// Run the web application until interrupted.
fn serve(args: &ServeArgs) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(crate::serve::run(args.to_config()))
}

/// Classify one query with a saved model.
fn classify(args: &ClassifyArgs, cli_args: &DisasterArgs) -> Result<()> {
    let artifact = ModelArtifact::load(&args.model_path)?;
    let classification_result = artifact.classify(&args.query)?.into_iter().collect();

    output_result(
        "Classification result:",
        &ClassificationOutput {
            query: args.query.clone(),
            classification_result,
        },
        cli_args,
    )
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::dataset::store::DEFAULT_TABLE_NAME;
    use crate::dataset::table::MessageRow;

    fn lines(progress: Progress<Vec<u8>>) -> String {
        String::from_utf8(progress.into_inner()).unwrap()
    }

    fn table() -> MessageTable {
        let mut table = MessageTable::new(vec!["water".into(), "food".into()]);
        let rows = [
            ("we need water", vec![1, 0]),
            ("send food please", vec![0, 1]),
            ("water and food", vec![1, 1]),
            ("no water here", vec![1, 0]),
            ("hungry, need food", vec![0, 1]),
            ("clean water", vec![1, 0]),
            ("food and rice", vec![0, 1]),
            ("water tanks empty", vec![1, 0]),
            ("food trucks", vec![0, 1]),
            ("drinking water", vec![1, 0]),
            ("baby food", vec![0, 1]),
            ("water is gone", vec![1, 0]),
        ];
        for (message, labels) in rows {
            table.push(MessageRow::new(message, "direct", labels)).unwrap();
        }
        table
    }

    #[test]
    fn test_train_model() {
        let config = TrainingConfig {
            folds: 2,
            n_estimators: vec![5],
            learning_rates: vec![1.0],
            seed: Some(3),
            ..TrainingConfig::default()
        };

        let outcome = train_model(&table(), &config).unwrap();
        assert_eq!(outcome.test_rows, 3);
        assert_eq!(outcome.training_rows, 9);
        assert_eq!(outcome.artifact.label_names, vec!["water", "food"]);
        assert_eq!(outcome.report.labels.len(), 2);
        assert_eq!(outcome.artifact.predict("water").unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_train_model_empty_table() {
        let empty = MessageTable::new(vec!["water".into()]);
        assert!(train_model(&empty, &TrainingConfig::default()).is_err());
    }

    #[test]
    fn test_process_reports_each_stage() {
        let dir = TempDir::new().unwrap();
        let args = ProcessArgs {
            messages_csv: dir.path().join("messages.csv"),
            categories_csv: dir.path().join("categories.csv"),
            database_path: dir.path().join("DisasterResponse.db"),
            table: DEFAULT_TABLE_NAME.to_string(),
        };
        fs::write(&args.messages_csv, "id,message,original,genre\n1,need water,,direct\n").unwrap();
        fs::write(&args.categories_csv, "id,categories\n1,related-1;water-1;\n").unwrap();

        let mut progress = Progress::new(Vec::new(), true);
        let summary = run_process(&args, &mut progress).unwrap();
        let text = lines(progress);

        assert!(text.contains("Loading data...\n    MESSAGES: "));
        assert!(text.contains("Cleaning data..."));
        assert!(text.contains("Saving data...\n    DATABASE: "));
        assert_eq!(summary.rows_saved, 1);
        assert_eq!(summary.label_columns, 2);
    }

    #[test]
    fn test_train_reports_each_stage() {
        let dir = TempDir::new().unwrap();
        let database_path = dir.path().join("DisasterResponse.db");
        let config_path = dir.path().join("training.json");
        crate::dataset::store::save_table(&table(), &database_path, DEFAULT_TABLE_NAME).unwrap();
        fs::write(&config_path, r#"{"folds": 2, "n_estimators": [5], "learning_rates": [1.0]}"#)
            .unwrap();

        let args = TrainArgs {
            database_path,
            model_path: dir.path().join("classifier.bin"),
            table: DEFAULT_TABLE_NAME.to_string(),
            config: Some(config_path),
            seed: Some(3),
            tag: false,
        };
        let mut progress = Progress::new(Vec::new(), true);
        let summary = run_train(&args, &mut progress).unwrap();
        let text = lines(progress);

        let stages = [
            "Loading data...",
            "Building model...",
            "Training model...",
            "Evaluating model...",
            "Saving model...",
        ];
        let mut last = 0;
        for stage in stages {
            let at = text.find(stage).unwrap_or_else(|| panic!("missing {stage:?} in {text}"));
            assert!(at >= last, "{stage:?} out of order");
            last = at;
        }
        assert!(text.contains("micro avg"));
        assert!(args.model_path.exists());
        assert_eq!(summary.test_rows, 3);
    }
}
