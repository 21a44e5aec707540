use esynth::core::chem::fingerprint::{FINGERPRINT_BITS, Fingerprint};
use esynth::engine::acceptance::{Predictor, PredictorError};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Unknown model term '{term}' in '{path}'; expected 'bias' or a bit index")]
    UnknownTerm { path: String, term: String },
    #[error("Bit {bit} in '{path}' is outside the fingerprint")]
    BitOutOfRange { path: String, bit: usize },
    #[error("Weight for term '{term}' in '{path}' is not a finite number")]
    NonFiniteWeight { path: String, term: String },
}

#[derive(Debug, Deserialize)]
struct WeightRecord {
    term: String,
    weight: f64,
}

/// Logistic model over fingerprint bits.
///
/// Weight files are CSV tables with a `term,weight` header. A term is either
/// `bias` or the index of a fingerprint bit; repeated terms accumulate.
#[derive(Debug, Clone)]
pub struct LinearPredictor {
    bias: f64,
    weights: Vec<f64>,
}

impl LinearPredictor {
    pub fn new(bias: f64, weights: Vec<f64>) -> Self {
        Self { bias, weights }
    }

    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let display_path = path.to_string_lossy().to_string();
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| ModelLoadError::Csv {
                path: display_path.clone(),
                source: e,
            })?;

        let mut model = Self::new(0.0, vec![0.0; FINGERPRINT_BITS]);
        for result in reader.deserialize::<WeightRecord>() {
            let record = result.map_err(|e| ModelLoadError::Csv {
                path: display_path.clone(),
                source: e,
            })?;
            if !record.weight.is_finite() {
                return Err(ModelLoadError::NonFiniteWeight {
                    path: display_path,
                    term: record.term,
                });
            }
            if record.term.eq_ignore_ascii_case("bias") {
                model.bias += record.weight;
                continue;
            }
            let bit: usize = record
                .term
                .parse()
                .map_err(|_| ModelLoadError::UnknownTerm {
                    path: display_path.clone(),
                    term: record.term.clone(),
                })?;
            if bit >= FINGERPRINT_BITS {
                return Err(ModelLoadError::BitOutOfRange { path: display_path, bit });
            }
            model.weights[bit] += record.weight;
        }

        info!(
            path = %display_path,
            active_terms = model.weights.iter().filter(|w| **w != 0.0).count(),
            "Loaded linear acceptance model"
        );
        Ok(model)
    }

    fn logit(&self, fingerprint: &Fingerprint) -> f64 {
        fingerprint
            .iter_ones()
            .filter_map(|bit| self.weights.get(bit))
            .sum::<f64>()
            + self.bias
    }
}

impl Predictor for LinearPredictor {
    fn predict(&self, fingerprint: &Fingerprint) -> Result<f64, PredictorError> {
        let score = 1.0 / (1.0 + (-self.logit(fingerprint)).exp());
        if score.is_finite() {
            Ok(score)
        } else {
            Err(PredictorError::NonNumeric(score))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_model(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.csv");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn empty_fingerprint_scores_the_bias() {
        let model = LinearPredictor::new(0.0, vec![0.0; FINGERPRINT_BITS]);
        let score = model.predict(&Fingerprint::new()).unwrap();
        assert!((score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn set_bits_shift_the_score() {
        let (_dir, path) = write_model("term,weight\nbias,-1.0\n3,2.5\n700, 1.5\n3,0.5\n");
        let model = LinearPredictor::load(&path).unwrap();

        let mut fp = Fingerprint::new();
        fp.set(3);
        let expected = 1.0 / (1.0 + (-2.0f64).exp());
        assert!((model.predict(&fp).unwrap() - expected).abs() < 1e-12);

        fp.set(700);
        assert!(model.predict(&fp).unwrap() > expected);
        assert!(model.predict(&Fingerprint::new()).unwrap() < 0.5);
    }

    #[test]
    fn unknown_terms_are_rejected() {
        let (_dir, path) = write_model("term,weight\nintercept,1.0\n");
        assert!(matches!(
            LinearPredictor::load(&path),
            Err(ModelLoadError::UnknownTerm { term, .. }) if term == "intercept"
        ));
    }

    #[test]
    fn bits_outside_the_fingerprint_are_rejected() {
        let (_dir, path) = write_model("term,weight\n1024,1.0\n");
        assert!(matches!(
            LinearPredictor::load(&path),
            Err(ModelLoadError::BitOutOfRange { bit: 1024, .. })
        ));
    }

    #[test]
    fn non_finite_weights_are_rejected() {
        let (_dir, path) = write_model("term,weight\n5,NaN\n");
        assert!(matches!(
            LinearPredictor::load(&path),
            Err(ModelLoadError::NonFiniteWeight { .. })
        ));
    }

    #[test]
    fn malformed_rows_are_csv_errors() {
        let (_dir, path) = write_model("term,weight\n5,heavy\n");
        assert!(matches!(
            LinearPredictor::load(&path),
            Err(ModelLoadError::Csv { .. })
        ));
    }
}
