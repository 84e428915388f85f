//! Engine configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::EngineSettings;
use crate::domain::ahp::{Precision, CONSISTENCY_THRESHOLD};

/// Numeric parameters of the AHP engine
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Decimal places judgments are rounded to (2..=4)
    #[serde(default = "default_precision")]
    pub precision: u32,

    /// Consistency ratio above which judgments are flagged
    #[serde(default = "default_consistency_threshold")]
    pub consistency_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            consistency_threshold: default_consistency_threshold(),
        }
    }
}

fn default_precision() -> u32 {
    Precision::DEFAULT.places()
}

fn default_consistency_threshold() -> f64 {
    CONSISTENCY_THRESHOLD
}

impl EngineConfig {
    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if Precision::try_new(self.precision).is_err() {
            return Err(ValidationError::InvalidPrecision {
                min: Precision::MIN,
                max: Precision::MAX,
                actual: self.precision,
            });
        }

        // NaN fails both comparisons
        if !(self.consistency_threshold > 0.0 && self.consistency_threshold <= 1.0) {
            return Err(ValidationError::InvalidConsistencyThreshold(
                self.consistency_threshold,
            ));
        }

        Ok(())
    }

    /// Converts into handler settings, validating on the way.
    pub fn settings(&self) -> Result<EngineSettings, ValidationError> {
        self.validate()?;
        let precision = Precision::try_new(self.precision).map_err(|_| {
            ValidationError::InvalidPrecision {
                min: Precision::MIN,
                max: Precision::MAX,
                actual: self.precision,
            }
        })?;
        Ok(EngineSettings {
            precision,
            consistency_threshold: self.consistency_threshold,
        })
    }
}
