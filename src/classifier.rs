//! Binary linear classification of TF-IDF feature vectors.
//!
//! [`LogisticRegression`] learns a weight per vocabulary term and a bias by
//! minimizing the L2-regularized logistic loss with L-BFGS. Predictions are
//! [`Label`](crate::corpus::Label)s together with the probability of the
//! predicted class.

mod lbfgs;
mod logistic;

pub use lbfgs::{Lbfgs, Minimum};
pub use logistic::{ClassifierConfig, LogisticRegression, ModelParameters, TrainingStats, sigmoid};
