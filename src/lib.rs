//! # Verity
//!
//! A fake/real news text classifier: TF-IDF features fed to an
//! L2-regularized logistic regression.
//!
//! ## Features
//!
//! - Text analysis pipeline (regex tokenizer, lowercase, length and stop
//!   word filters)
//! - TF-IDF vectorizer with a reproducible vocabulary
//! - Logistic regression fitted with L-BFGS
//! - Seeded corpus shuffling and train/test splitting
//! - One paired artifact (vocabulary + model) in JSON or binary form
//! - Thread-safe predictor for inference
//!
//! ## Example
//!
//! ```
//! use verity::prelude::*;
//!
//! # fn main() -> verity::error::Result<()> {
//! let fake: Vec<String> = (0..10).map(|i| format!("shocking secret hoax {i}x")).collect();
//! let real: Vec<String> = (0..10).map(|i| format!("senate reported budget {i}x")).collect();
//!
//! let report = Trainer::default().train(&fake, &real)?;
//! let predictor = Predictor::new(report.artifact)?;
//!
//! let prediction = predictor.classify("A shocking hoax")?;
//! assert_eq!(prediction.label, Label::Fake);
//! assert!(prediction.confidence >= 0.5);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod artifact;
pub mod classifier;
pub mod cli;
pub mod corpus;
pub mod error;
pub mod predictor;
pub mod trainer;
pub mod vectorizer;

pub mod prelude {
    pub use crate::artifact::TrainedArtifact;
    pub use crate::corpus::Label;
    pub use crate::error::{Result, VerityError};
    pub use crate::predictor::{Prediction, Predictor, classify};
    pub use crate::trainer::{Trainer, TrainerConfig, TrainingReport};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
