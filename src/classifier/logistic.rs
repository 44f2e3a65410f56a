//! L2-regularized binary logistic regression over sparse TF-IDF features.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::classifier::lbfgs::Lbfgs;
use crate::corpus::Label;
use crate::error::{Result, VerityError};
use crate::vectorizer::FeatureVector;

/// Optimizer and regularization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Inverse regularization strength; the penalty is `‖w‖² / (2C)`.
    pub c: f64,
    /// Maximum L-BFGS iterations.
    pub max_iter: usize,
    /// Stop once every gradient component is within `tol` of zero.
    pub tol: f64,
    /// Number of curvature pairs L-BFGS keeps.
    pub history_size: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 100,
            tol: 1e-4,
            history_size: 10,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.c > 0.0 && self.c.is_finite()) {
            return Err(VerityError::invalid_argument(format!(
                "C must be positive, got {}",
                self.c
            )));
        }
        if self.max_iter == 0 {
            return Err(VerityError::invalid_argument("max_iter must be at least 1"));
        }
        if self.tol.is_nan() || self.tol <= 0.0 {
            return Err(VerityError::invalid_argument(format!(
                "tol must be positive, got {}",
                self.tol
            )));
        }
        if self.history_size == 0 {
            return Err(VerityError::invalid_argument(
                "history_size must be at least 1",
            ));
        }
        Ok(())
    }

    /// L2 penalty coefficient `λ = 1 / (2C)`.
    pub fn lambda(&self) -> f64 {
        1.0 / (2.0 * self.c)
    }
}

/// Learned weights: one per vocabulary term, plus an intercept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl ModelParameters {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    /// Feature dimension the parameters expect.
    pub fn dim(&self) -> usize {
        self.weights.len()
    }

    /// The margin `w·x + b`.
    pub fn decision(&self, features: &FeatureVector) -> Result<f64> {
        if features.dim() != self.dim() {
            return Err(VerityError::artifact_mismatch(format!(
                "feature vector has dimension {} but the model expects {}",
                features.dim(),
                self.dim()
            )));
        }
        Ok(features.dot(&self.weights) + self.bias)
    }

    fn is_finite(&self) -> bool {
        self.bias.is_finite() && self.weights.iter().all(|w| w.is_finite())
    }
}

/// Summary of an optimizer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    pub iterations: usize,
    /// Mean regularized log-loss at the solution.
    pub final_loss: f64,
    /// Largest absolute gradient component at the solution.
    pub gradient_norm: f64,
    pub converged: bool,
}

/// Logistic regression classifier.
///
/// # Example
///
/// ```
/// use verity::classifier::LogisticRegression;
/// use verity::corpus::Label;
/// use verity::vectorizer::FeatureVector;
///
/// # fn main() -> verity::error::Result<()> {
/// let features = vec![
///     FeatureVector::from_pairs(2, [(0, 1.0)]),
///     FeatureVector::from_pairs(2, [(1, 1.0)]),
/// ];
/// let labels = vec![Label::Fake, Label::Real];
///
/// let mut model = LogisticRegression::default();
/// model.fit(&features, &labels)?;
///
/// assert_eq!(model.predict(&features[1])?, Label::Real);
/// assert!(model.predict_proba(&features[0])? >= 0.5);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogisticRegression {
    config: ClassifierConfig,
    parameters: Option<ModelParameters>,
    stats: Option<TrainingStats>,
}

impl LogisticRegression {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            parameters: None,
            stats: None,
        }
    }

    /// Wrap already learned parameters, e.g. from a loaded artifact.
    pub fn from_parameters(parameters: ModelParameters) -> Result<Self> {
        if !parameters.is_finite() {
            return Err(VerityError::artifact_mismatch(
                "model parameters contain non-finite values",
            ));
        }
        Ok(Self {
            config: ClassifierConfig::default(),
            parameters: Some(parameters),
            stats: None,
        })
    }

    /// Fit on feature vectors and their labels.
    ///
    /// Minimizes `(Σ log(1 + exp(-yᵢ zᵢ)) + λ‖w‖²) / n` with
    /// `zᵢ = w·xᵢ + b` and `yᵢ ∈ {-1, +1}`, starting from zero weights.
    pub fn fit(&mut self, features: &[FeatureVector], labels: &[Label]) -> Result<&ModelParameters> {
        self.config.validate()?;

        if features.is_empty() {
            return Err(VerityError::empty_corpus("no training samples"));
        }
        if features.len() != labels.len() {
            return Err(VerityError::invalid_argument(format!(
                "{} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if labels.iter().all(|&label| label == labels[0]) {
            return Err(VerityError::degenerate_labels(format!(
                "all {} training samples are labeled {}",
                labels.len(),
                labels[0]
            )));
        }
        let dim = features[0].dim();
        if let Some(other) = features.iter().find(|f| f.dim() != dim) {
            return Err(VerityError::artifact_mismatch(format!(
                "feature vectors have dimensions {dim} and {}",
                other.dim()
            )));
        }

        let signs: Vec<f64> = labels.iter().map(|label| label.sign()).collect();
        let lambda = self.config.lambda();
        let n = features.len() as f64;

        // Parameter layout: [w_0, ..., w_{dim-1}, b].
        let objective = |theta: &[f64]| {
            let (weights, bias) = theta.split_at(dim);
            let bias = bias[0];

            let mut loss = 0.0;
            let mut gradient = vec![0.0; dim + 1];
            for (x, &y) in features.iter().zip(&signs) {
                let margin = y * (x.dot(weights) + bias);
                loss += softplus(-margin);
                // d/dz log(1 + exp(-y z)) = -y σ(-y z)
                let coefficient = -y * sigmoid(-margin);
                for (index, value) in x.iter() {
                    gradient[index] += coefficient * value;
                }
                gradient[dim] += coefficient;
            }

            let mut penalty = 0.0;
            for (g, w) in gradient.iter_mut().zip(weights) {
                penalty += w * w;
                *g += 2.0 * lambda * w;
            }
            loss += lambda * penalty;

            gradient.iter_mut().for_each(|g| *g /= n);
            (loss / n, gradient)
        };

        let optimizer = Lbfgs::new(
            self.config.max_iter,
            self.config.tol,
            self.config.history_size,
        );
        let minimum = optimizer.minimize(objective, vec![0.0; dim + 1]);

        if minimum.converged {
            debug!(
                "logistic regression converged after {} iterations (loss {:.6})",
                minimum.iterations, minimum.value
            );
        } else {
            warn!(
                "logistic regression stopped after {} iterations without converging (gradient {:.3e}, tol {:.1e})",
                minimum.iterations, minimum.gradient_norm, self.config.tol
            );
        }

        self.stats = Some(TrainingStats {
            iterations: minimum.iterations,
            final_loss: minimum.value,
            gradient_norm: minimum.gradient_norm,
            converged: minimum.converged,
        });

        let mut weights = minimum.x;
        let bias = weights.pop().unwrap_or(0.0);
        Ok(&*self.parameters.insert(ModelParameters::new(weights, bias)))
    }

    /// The raw margin `w·x + b`.
    pub fn decision_function(&self, features: &FeatureVector) -> Result<f64> {
        self.parameters()?.decision(features)
    }

    /// Probability that `features` is real news.
    pub fn probability_real(&self, features: &FeatureVector) -> Result<f64> {
        Ok(sigmoid(self.decision_function(features)?))
    }

    /// `Real` if `P(real) ≥ 0.5`, otherwise `Fake`.
    pub fn predict(&self, features: &FeatureVector) -> Result<Label> {
        let p = self.probability_real(features)?;
        Ok(if p >= 0.5 { Label::Real } else { Label::Fake })
    }

    /// Probability of the predicted class, always in `[0.5, 1]`.
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<f64> {
        let p = self.probability_real(features)?;
        Ok(p.max(1.0 - p))
    }

    /// Fraction of samples whose prediction matches the label.
    pub fn score(&self, features: &[FeatureVector], labels: &[Label]) -> Result<f64> {
        if features.len() != labels.len() {
            return Err(VerityError::invalid_argument(format!(
                "{} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if features.is_empty() {
            return Err(VerityError::empty_corpus("no samples to score"));
        }

        let mut correct = 0usize;
        for (x, &label) in features.iter().zip(labels) {
            if self.predict(x)? == label {
                correct += 1;
            }
        }
        Ok(correct as f64 / features.len() as f64)
    }

    pub fn parameters(&self) -> Result<&ModelParameters> {
        self.parameters
            .as_ref()
            .ok_or_else(|| VerityError::not_fitted("LogisticRegression::fit has not been called"))
    }

    pub fn into_parameters(self) -> Result<ModelParameters> {
        self.parameters
            .ok_or_else(|| VerityError::not_fitted("LogisticRegression::fit has not been called"))
    }

    /// Statistics of the last `fit`, if any.
    pub fn stats(&self) -> Option<&TrainingStats> {
        self.stats.as_ref()
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.parameters.is_some()
    }
}

/// Numerically stable logistic function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^t)` without overflow.
fn softplus(t: f64) -> f64 {
    t.max(0.0) + (-t.abs()).exp().ln_1p()
}
