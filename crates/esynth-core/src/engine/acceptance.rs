use super::config::ConfigError;
use crate::core::chem::fingerprint::Fingerprint;
use crate::core::chem::{ChemistryError, ChemistryProvider};
use crate::core::models::fragment::Fragment;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictorError {
    #[error("Predictor returned a non-numeric score ({0})")]
    NonNumeric(f64),
    #[error("Predictor failed: {0}")]
    Failed(String),
}

/// Scores a fingerprint; larger means more likely to be kept.
///
/// Implementations must be usable from several threads at once, since scoring
/// runs inside the parallel expansion when the `parallel` feature is enabled.
pub trait Predictor: Send + Sync {
    fn predict(&self, fingerprint: &Fingerprint) -> Result<f64, PredictorError>;
}

/// Adapts a plain closure into a [`Predictor`].
pub struct FnPredictor<F>(F);

impl<F> FnPredictor<F>
where
    F: Fn(&Fingerprint) -> f64 + Send + Sync,
{
    pub fn new(score: F) -> Self {
        Self(score)
    }
}

impl<F> Predictor for FnPredictor<F>
where
    F: Fn(&Fingerprint) -> f64 + Send + Sync,
{
    fn predict(&self, fingerprint: &Fingerprint) -> Result<f64, PredictorError> {
        Ok((self.0)(fingerprint))
    }
}

#[derive(Debug, Error)]
pub enum AcceptanceError {
    #[error("Fingerprint computation failed: {0}")]
    Fingerprint(#[from] ChemistryError),
    #[error(transparent)]
    Predictor(#[from] PredictorError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// `score` is `None` when no predictor is installed.
    Accepted { score: Option<f64> },
    Rejected { score: f64 },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }

    pub fn score(&self) -> Option<f64> {
        match *self {
            Verdict::Accepted { score } => score,
            Verdict::Rejected { score } => Some(score),
        }
    }
}

/// Decides which complexes are emitted.
///
/// A complex is accepted iff the predictor's score is strictly greater than the
/// threshold. Without a predictor every complex is accepted unscored.
pub struct AcceptanceFilter {
    predictor: Option<Box<dyn Predictor>>,
    threshold: f64,
}

impl AcceptanceFilter {
    pub fn new(predictor: Box<dyn Predictor>, threshold: f64) -> Result<Self, ConfigError> {
        if !threshold.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "threshold",
                reason: format!("must be a finite number, got {}", threshold),
            });
        }
        Ok(Self {
            predictor: Some(predictor),
            threshold,
        })
    }

    pub fn permissive() -> Self {
        Self {
            predictor: None,
            threshold: f64::NEG_INFINITY,
        }
    }

    pub fn is_permissive(&self) -> bool {
        self.predictor.is_none()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn evaluate(
        &self,
        complex: &Fragment,
        chemistry: &dyn ChemistryProvider,
    ) -> Result<Verdict, AcceptanceError> {
        let Some(predictor) = &self.predictor else {
            return Ok(Verdict::Accepted { score: None });
        };

        let fingerprint = chemistry.fingerprint(complex.structure())?;
        let score = predictor.predict(&fingerprint)?;
        if !score.is_finite() {
            return Err(PredictorError::NonNumeric(score).into());
        }

        if score > self.threshold {
            Ok(Verdict::Accepted { score: Some(score) })
        } else {
            Ok(Verdict::Rejected { score })
        }
    }
}

impl Default for AcceptanceFilter {
    fn default() -> Self {
        Self::permissive()
    }
}

impl fmt::Debug for AcceptanceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcceptanceFilter")
            .field("has_predictor", &self.predictor.is_some())
            .field("threshold", &self.threshold)
            .finish()
    }
}
