//! Command implementations for the Verity CLI.

use std::fs;

use crate::artifact::TrainedArtifact;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{Result, VerityError};
use crate::predictor::{Prediction, Predictor};
use crate::trainer::{Trainer, TrainerConfig};

/// Execute a CLI command.
pub fn execute_command(args: VerityArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args, &args),
        Command::Classify(classify_args) => classify(classify_args, &args),
        Command::Inspect(inspect_args) => inspect(inspect_args, &args),
    }
}

/// Train a model and write the artifact.
fn train(args: &TrainArgs, cli_args: &VerityArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => TrainerConfig::from_file(path)?,
        None => TrainerConfig::default(),
    };
    args.apply_to(&mut config);

    let report = Trainer::new(config).train_from_paths(&args.fake, &args.real)?;
    report.artifact.save(&args.output)?;

    output_result(
        "Training complete",
        &TrainingResult {
            output: args.output.display().to_string(),
            documents: report.train_size + report.test_size,
            train_size: report.train_size,
            test_size: report.test_size,
            vocabulary_size: report.vocabulary_size,
            iterations: report.stats.iterations,
            converged: report.stats.converged,
            final_loss: report.stats.final_loss,
            accuracy: report.accuracy,
        },
        cli_args,
    )
}

/// Classify texts given on the command line or in a file.
fn classify(args: &ClassifyArgs, cli_args: &VerityArgs) -> Result<()> {
    let mut texts = args.texts.clone();
    if let Some(path) = &args.file {
        texts.push(fs::read_to_string(path)?);
    }
    if texts.is_empty() {
        return Err(VerityError::empty_input(
            "please enter some text to analyze",
        ));
    }

    let predictor = Predictor::load(&args.model)?;
    let results = texts
        .iter()
        .map(|text| predictor.classify(text).map(ClassificationResult::from))
        .collect::<Result<Vec<_>>>()?;

    output_result("Classification results", &results, cli_args)
}

/// Print artifact metadata.
fn inspect(args: &InspectArgs, cli_args: &VerityArgs) -> Result<()> {
    let artifact = TrainedArtifact::load(&args.model)?;
    let metadata = artifact.metadata();

    output_result(
        "Artifact information",
        &ArtifactInfo {
            path: args.model.display().to_string(),
            format_version: metadata.format_version,
            tokenizer: metadata.tokenizer.clone(),
            created_at: metadata.created_at.to_rfc3339(),
            training_documents: metadata.training_documents,
            vocabulary_size: artifact.vocabulary().len(),
            max_df: metadata.vectorizer.max_df,
            min_df: metadata.vectorizer.min_df,
            bias: artifact.parameters().bias,
        },
        cli_args,
    )
}

impl From<Prediction> for ClassificationResult {
    fn from(prediction: Prediction) -> Self {
        ClassificationResult {
            label: prediction.label.to_string(),
            confidence: prediction.confidence,
            word_count: prediction.word_count,
            description: prediction.label.description().to_string(),
        }
    }
}
