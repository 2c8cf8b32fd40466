// PredictionService - loaded backend + label space, behind one predict call
//
// The service is constructed once by `load` and is immutable afterwards:
// model weights and the label mapping are read-only shared state, so a
// single service can be put behind an Arc and called from any number of
// worker threads. Each predict call is an independent, pure function of
// the loaded state and its input.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::audio::Waveform;
use crate::error::{Error, ModelError};
use crate::features::{FeatureExtractor, FeatureVector};
use crate::model::backend::{argmax, ModelArtifact, ModelBackend, ModelOutput};
use crate::model::labels::LabelSpace;

/// Result of classifying one clip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Predicted category name
    pub label: String,
    /// Index of the predicted category in the label space
    pub index: usize,
    /// Probability per label (softmax backend only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<BTreeMap<String, f32>>,
}

/// A loaded classifier plus its label space and feature extractor.
pub struct PredictionService {
    extractor: FeatureExtractor,
    backend: ModelBackend,
    labels: LabelSpace,
}

impl PredictionService {
    /// Load a model artifact from disk and pair it with a label space.
    ///
    /// Fails with `ArtifactNotFound` for a missing path, `CorruptArtifact`
    /// for unparseable or shape-inconsistent contents, and `LabelMismatch`
    /// when a probabilistic model's output width disagrees with the label
    /// count. A failed load is terminal; there is no partially loaded
    /// service state.
    pub fn load<P: AsRef<Path>>(path: P, labels: LabelSpace) -> Result<Self, ModelError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ModelError::ArtifactNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path)?;
        let artifact: ModelArtifact = serde_json::from_str(&text)
            .map_err(|e| ModelError::CorruptArtifact(e.to_string()))?;
        let backend = ModelBackend::from_artifact(artifact)?;

        info!(
            artifact = %path.display(),
            probabilistic = backend.is_probabilistic(),
            classes = backend.num_classes(),
            labels = labels.len(),
            "loaded model artifact"
        );

        Self::from_backend(backend, labels)
    }

    /// Build a service around an already-constructed backend.
    ///
    /// This is the injection point for stub backends in tests and for
    /// callers that assemble backends in memory.
    pub fn from_backend(backend: ModelBackend, labels: LabelSpace) -> Result<Self, ModelError> {
        // Label-count check applies to the probabilistic backend only;
        // a decision backend's stray index is caught at predict time.
        if backend.is_probabilistic() && backend.num_classes() != labels.len() {
            return Err(ModelError::LabelMismatch {
                model_classes: backend.num_classes(),
                label_count: labels.len(),
            });
        }
        Ok(Self {
            extractor: FeatureExtractor::new(),
            backend,
            labels,
        })
    }

    pub fn labels(&self) -> &LabelSpace {
        &self.labels
    }

    /// Expected feature vector length for this model.
    pub fn input_dim(&self) -> usize {
        self.backend.input_dim()
    }

    /// Classify a pre-extracted feature vector.
    ///
    /// Fails with `Shape` when the slice length does not match the
    /// model's input width.
    pub fn predict(&self, features: &[f32]) -> Result<Prediction, ModelError> {
        let expected = self.backend.input_dim();
        if features.len() != expected {
            return Err(ModelError::Shape {
                expected,
                got: features.len(),
            });
        }

        let prediction = match self.backend.infer(features) {
            ModelOutput::Index(index) => {
                let label = self.label_for(index)?;
                Prediction {
                    label,
                    index,
                    probabilities: None,
                }
            }
            ModelOutput::Distribution(probs) => {
                let index = argmax(&probs);
                let label = self.label_for(index)?;
                // Output width was validated against the label space at load
                let probabilities = self
                    .labels
                    .iter()
                    .zip(probs.iter())
                    .map(|(name, &p)| (name.to_string(), p))
                    .collect();
                Prediction {
                    label,
                    index,
                    probabilities: Some(probabilities),
                }
            }
        };

        debug!(label = %prediction.label, index = prediction.index, "prediction");
        Ok(prediction)
    }

    /// Convenience wrapper that accepts the typed feature vector.
    pub fn predict_vector(&self, features: &FeatureVector) -> Result<Prediction, ModelError> {
        self.predict(features.as_slice())
    }

    /// End-to-end path: extract features from a raw waveform, then predict.
    pub fn classify(&self, waveform: &Waveform) -> Result<Prediction, Error> {
        let features = self.extractor.extract(waveform)?;
        Ok(self.predict(features.as_slice())?)
    }

    /// Extract features without predicting (for callers that want both).
    pub fn extract(&self, waveform: &Waveform) -> Result<FeatureVector, Error> {
        Ok(self.extractor.extract(waveform)?)
    }

    fn label_for(&self, index: usize) -> Result<String, ModelError> {
        self.labels
            .name(index)
            .map(str::to_string)
            .ok_or(ModelError::LabelMismatch {
                model_classes: self.backend.num_classes(),
                label_count: self.labels.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::backend::{Activation, LayerArtifact};

    fn labels() -> LabelSpace {
        LabelSpace::from_labels(["belly_pain", "burping", "discomfort", "hungry", "tired"])
            .unwrap()
    }

    /// Decision stub whose bias forces a fixed argmax
    fn stub_backend(winning_index: usize, classes: usize, input_dim: usize) -> ModelBackend {
        let mut bias = vec![0.0; classes];
        bias[winning_index] = 1.0;
        ModelBackend::from_artifact(ModelArtifact::Decision {
            input_dim,
            weights: vec![vec![0.0; input_dim]; classes],
            bias,
        })
        .unwrap()
    }

    #[test]
    fn test_predict_maps_index_to_label() {
        let service = PredictionService::from_backend(stub_backend(2, 5, 27), labels()).unwrap();
        let prediction = service.predict(&[0.0; 27]).unwrap();

        assert_eq!(prediction.index, 2);
        assert_eq!(prediction.label, "discomfort");
        assert!(prediction.probabilities.is_none());
    }

    #[test]
    fn test_predict_deterministic() {
        let service = PredictionService::from_backend(stub_backend(4, 5, 27), labels()).unwrap();
        let features = [0.25; 27];

        let first = service.predict(&features).unwrap();
        let second = service.predict(&features).unwrap();
        assert_eq!(first.index, second.index);
        assert_eq!(first, second);
    }

    #[test]
    fn test_shape_error() {
        let service = PredictionService::from_backend(stub_backend(0, 5, 27), labels()).unwrap();
        let result = service.predict(&[0.0; 26]);

        match result {
            Err(ModelError::Shape { expected, got }) => {
                assert_eq!(expected, 27);
                assert_eq!(got, 26);
            }
            other => panic!("expected Shape error, got {:?}", other),
        }
    }

    #[test]
    fn test_decision_index_outside_label_space() {
        // 7-class decision model over a 5-label space: not caught at load
        // (probabilistic-only check), surfaces when the stray index wins.
        let service = PredictionService::from_backend(stub_backend(6, 7, 27), labels()).unwrap();
        let result = service.predict(&[0.0; 27]);
        assert!(matches!(result, Err(ModelError::LabelMismatch { .. })));
    }

    #[test]
    fn test_softmax_label_mismatch_at_load() {
        let backend = ModelBackend::from_artifact(ModelArtifact::Softmax {
            input_dim: 27,
            layers: vec![LayerArtifact {
                weights: vec![vec![0.0; 27]; 3],
                bias: vec![0.0; 3],
                activation: Activation::Softmax,
            }],
        })
        .unwrap();

        let result = PredictionService::from_backend(backend, labels());
        match result {
            Err(ModelError::LabelMismatch {
                model_classes,
                label_count,
            }) => {
                assert_eq!(model_classes, 3);
                assert_eq!(label_count, 5);
            }
            other => panic!("expected LabelMismatch, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_softmax_prediction_has_full_distribution() {
        let backend = ModelBackend::from_artifact(ModelArtifact::Softmax {
            input_dim: 27,
            layers: vec![LayerArtifact {
                weights: vec![vec![0.0; 27]; 5],
                bias: vec![0.0, 0.0, 0.0, 2.0, 0.0],
                activation: Activation::Softmax,
            }],
        })
        .unwrap();
        let service = PredictionService::from_backend(backend, labels()).unwrap();

        let prediction = service.predict(&[0.5; 27]).unwrap();
        assert_eq!(prediction.index, 3);
        assert_eq!(prediction.label, "hungry");

        let probs = prediction.probabilities.expect("softmax exposes probabilities");
        assert_eq!(probs.len(), 5);
        let sum: f32 = probs.values().sum();
        assert!((sum - 1.0).abs() < 1e-3, "probabilities sum to {}", sum);
        assert!(probs.values().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_prediction_serializes_without_null_probabilities() {
        let service = PredictionService::from_backend(stub_backend(1, 5, 27), labels()).unwrap();
        let prediction = service.predict(&[0.0; 27]).unwrap();
        let json = serde_json::to_string(&prediction).unwrap();
        assert!(json.contains("\"label\":\"burping\""));
        assert!(!json.contains("probabilities"));
    }
}
