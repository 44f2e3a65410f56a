//! Class labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VerityError};

/// The two classes an article can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Fabricated or misleading news, encoded as 0.
    Fake,
    /// Authentic news, encoded as 1.
    Real,
}

impl Label {
    /// Numeric class used for training.
    pub fn as_u8(self) -> u8 {
        match self {
            Label::Fake => 0,
            Label::Real => 1,
        }
    }

    /// `-1.0` for fake, `+1.0` for real, as used by the logistic loss.
    pub fn sign(self) -> f64 {
        match self {
            Label::Fake => -1.0,
            Label::Real => 1.0,
        }
    }

    /// Lowercase name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Fake => "fake",
            Label::Real => "real",
        }
    }

    /// One-sentence explanation of the outcome for end users.
    pub fn description(self) -> &'static str {
        match self {
            Label::Fake => {
                "The text shows patterns commonly associated with fake or misleading news."
            }
            Label::Real => "The text matches patterns typically found in authentic news articles.",
        }
    }
}

impl TryFrom<u8> for Label {
    type Error = VerityError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Label::Fake),
            1 => Ok(Label::Real),
            other => Err(VerityError::invalid_argument(format!(
                "label must be 0 (fake) or 1 (real), got {other}"
            ))),
        }
    }
}

impl FromStr for Label {
    type Err = VerityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fake" | "0" => Ok(Label::Fake),
            "real" | "1" => Ok(Label::Real),
            other => Err(VerityError::invalid_argument(format!(
                "unknown label '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
