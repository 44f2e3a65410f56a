//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, VerityArgs};
use crate::error::Result;

/// Result structure for a training run.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub output: String,
    pub documents: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub vocabulary_size: usize,
    pub iterations: usize,
    pub converged: bool,
    pub final_loss: f64,
    pub accuracy: Option<f64>,
}

/// Result structure for one classified text.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    pub confidence: f64,
    pub word_count: usize,
    pub description: String,
}

/// Result structure for artifact inspection.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub path: String,
    pub format_version: u32,
    pub tokenizer: String,
    pub created_at: String,
    pub training_documents: usize,
    pub vocabulary_size: usize,
    pub max_df: f64,
    pub min_df: usize,
    pub bias: f64,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()>;
}

impl HumanOutput for TrainingResult {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Documents:  {}", self.documents)?;
        writeln!(out, "Training:   {}", self.train_size)?;
        writeln!(out, "Test:       {}", self.test_size)?;
        writeln!(out, "Vocabulary: {} terms", self.vocabulary_size)?;
        writeln!(
            out,
            "Optimizer:  {} iterations, loss {:.6}{}",
            self.iterations,
            self.final_loss,
            if self.converged { "" } else { " (not converged)" }
        )?;
        match self.accuracy {
            Some(accuracy) => writeln!(out, "Accuracy: {accuracy}")?,
            None => writeln!(out, "Accuracy: n/a (empty test partition)")?,
        }
        writeln!(out, "Model saved to {}", self.output)
    }
}

impl HumanOutput for ClassificationResult {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            "{} news ({:.2}% confidence, {} words)",
            capitalize(&self.label),
            self.confidence * 100.0,
            self.word_count
        )?;
        writeln!(out, "{}", self.description)
    }
}

impl HumanOutput for ArtifactInfo {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Artifact:    {}", self.path)?;
        writeln!(out, "Format:      v{}", self.format_version)?;
        writeln!(out, "Tokenizer:   {}", self.tokenizer)?;
        writeln!(out, "Created:     {}", self.created_at)?;
        writeln!(out, "Trained on:  {} documents", self.training_documents)?;
        writeln!(out, "Vocabulary:  {} terms", self.vocabulary_size)?;
        writeln!(out, "max_df:      {}", self.max_df)?;
        writeln!(out, "min_df:      {}", self.min_df)?;
        writeln!(out, "Bias:        {:.6}", self.bias)
    }
}

impl<T: HumanOutput> HumanOutput for Vec<T> {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            item.write_human(out)?;
        }
        Ok(())
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &VerityArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_result(&mut out, message, result, args)
}

/// Write a result to `out` in the specified format.
pub fn write_result<T>(out: &mut dyn Write, message: &str, result: &T, args: &VerityArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                writeln!(out, "{message}")?;
                writeln!(out)?;
            }
            result.write_human(out)?;
        }
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
