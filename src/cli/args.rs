//! Command line argument parsing for the Verity CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::trainer::TrainerConfig;

/// Verity - fake/real news classification with TF-IDF and logistic regression
#[derive(Parser, Debug, Clone)]
#[command(name = "verity")]
#[command(about = "Classify news articles as fake or real")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct VerityArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
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

impl VerityArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model from fake and real corpora
    Train(TrainArgs),

    /// Classify text with a trained model
    Classify(ClassifyArgs),

    /// Show what a trained model contains
    Inspect(InspectArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Fake news corpus (CSV with a `text` column, or JSONL)
    #[arg(long, value_name = "FILE")]
    pub fake: PathBuf,

    /// Real news corpus (CSV with a `text` column, or JSONL)
    #[arg(long, value_name = "FILE")]
    pub real: PathBuf,

    /// Where to write the trained artifact (`.json` for JSON, otherwise binary)
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Training configuration file (JSON)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Shuffle seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fraction of documents held out for evaluation
    #[arg(long)]
    pub test_ratio: Option<f64>,

    /// Drop terms found in more than this fraction of documents
    #[arg(long)]
    pub max_df: Option<f64>,

    /// Drop terms found in fewer than this many documents
    #[arg(long)]
    pub min_df: Option<usize>,

    /// Inverse regularization strength
    #[arg(long = "c", value_name = "C")]
    pub c: Option<f64>,

    /// Maximum optimizer iterations
    #[arg(long)]
    pub max_iter: Option<usize>,

    /// Optimizer gradient tolerance
    #[arg(long)]
    pub tol: Option<f64>,
}

impl TrainArgs {
    /// Override `config` with every flag that was given.
    pub fn apply_to(&self, config: &mut TrainerConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(test_ratio) = self.test_ratio {
            config.test_ratio = test_ratio;
        }
        if let Some(max_df) = self.max_df {
            config.vectorizer.max_df = max_df;
        }
        if let Some(min_df) = self.min_df {
            config.vectorizer.min_df = min_df;
        }
        if let Some(c) = self.c {
            config.classifier.c = c;
        }
        if let Some(max_iter) = self.max_iter {
            config.classifier.max_iter = max_iter;
        }
        if let Some(tol) = self.tol {
            config.classifier.tol = tol;
        }
    }
}

/// Arguments for classification
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Trained artifact
    #[arg(short, long, value_name = "FILE")]
    pub model: PathBuf,

    /// Texts to classify, one result per text
    #[arg(value_name = "TEXT")]
    pub texts: Vec<String>,

    /// Read one document from a text file
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Arguments for inspecting an artifact
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Trained artifact
    #[arg(short, long, value_name = "FILE")]
    pub model: PathBuf,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
