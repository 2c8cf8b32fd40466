// ModelBackend - the two inference backends behind one tagged enum
//
// A backend maps a feature vector to either a bare class index (decision
// backend, argmax of linear decision scores, no probabilities) or a full
// probability distribution (softmax backend, a small dense network).
// PredictionService never needs to know which concrete backend is loaded.
//
// Artifact format: a single JSON file tagged by "kind":
//
//   {"kind": "decision", "input_dim": 27,
//    "weights": [[..], ..], "bias": [..]}
//
//   {"kind": "softmax", "input_dim": 27,
//    "layers": [{"weights": [[..], ..], "bias": [..], "activation": "relu"},
//               {"weights": [[..], ..], "bias": [..], "activation": "softmax"}]}
//
// Weight matrices are row-major: one row per output unit.

use serde::Deserialize;

use crate::error::ModelError;

/// On-disk model artifact, tagged by backend kind.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Decision {
        input_dim: usize,
        weights: Vec<Vec<f32>>,
        bias: Vec<f32>,
    },
    Softmax {
        input_dim: usize,
        layers: Vec<LayerArtifact>,
    },
}

#[derive(Debug, Deserialize)]
pub struct LayerArtifact {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    pub activation: Activation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Linear,
    Relu,
    Softmax,
}

/// What a backend produces for one feature vector.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    /// Best class index only (deterministic backend)
    Index(usize),
    /// Full probability distribution over the label space
    Distribution(Vec<f32>),
}

/// A validated, loaded inference backend.
#[derive(Debug)]
pub enum ModelBackend {
    Decision(DecisionModel),
    Softmax(SoftmaxModel),
}

/// Linear decision-score classifier: argmax of W·x + b.
#[derive(Debug)]
pub struct DecisionModel {
    input_dim: usize,
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

/// Dense feed-forward network ending in a softmax layer.
#[derive(Debug)]
pub struct SoftmaxModel {
    input_dim: usize,
    layers: Vec<Layer>,
}

#[derive(Debug)]
struct Layer {
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
    activation: Activation,
}

impl ModelBackend {
    /// Validate an artifact's shapes and build the runtime backend.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        match artifact {
            ModelArtifact::Decision {
                input_dim,
                weights,
                bias,
            } => {
                check_layer_shapes(input_dim, &weights, &bias, "decision layer")?;
                Ok(ModelBackend::Decision(DecisionModel {
                    input_dim,
                    weights,
                    bias,
                }))
            }
            ModelArtifact::Softmax { input_dim, layers } => {
                if layers.is_empty() {
                    return Err(ModelError::CorruptArtifact(
                        "softmax model has no layers".to_string(),
                    ));
                }
                let mut width = input_dim;
                let mut built = Vec::with_capacity(layers.len());
                for (i, layer) in layers.into_iter().enumerate() {
                    check_layer_shapes(
                        width,
                        &layer.weights,
                        &layer.bias,
                        &format!("layer {}", i),
                    )?;
                    width = layer.weights.len();
                    built.push(Layer {
                        weights: layer.weights,
                        bias: layer.bias,
                        activation: layer.activation,
                    });
                }
                if built.last().map(|l| l.activation) != Some(Activation::Softmax) {
                    return Err(ModelError::CorruptArtifact(
                        "final layer of a softmax model must use softmax activation".to_string(),
                    ));
                }
                Ok(ModelBackend::Softmax(SoftmaxModel { input_dim, layers: built }))
            }
        }
    }

    /// Expected feature vector length.
    pub fn input_dim(&self) -> usize {
        match self {
            ModelBackend::Decision(m) => m.input_dim,
            ModelBackend::Softmax(m) => m.input_dim,
        }
    }

    /// Number of output classes.
    pub fn num_classes(&self) -> usize {
        match self {
            ModelBackend::Decision(m) => m.weights.len(),
            ModelBackend::Softmax(m) => m.layers.last().map(|l| l.weights.len()).unwrap_or(0),
        }
    }

    /// Whether this backend exposes a probability distribution.
    pub fn is_probabilistic(&self) -> bool {
        matches!(self, ModelBackend::Softmax(_))
    }

    /// Run inference on one feature vector.
    ///
    /// The caller (PredictionService) has already checked the input
    /// length against `input_dim`.
    pub fn infer(&self, features: &[f32]) -> ModelOutput {
        match self {
            ModelBackend::Decision(m) => {
                let scores = dense(&m.weights, &m.bias, features);
                ModelOutput::Index(argmax(&scores))
            }
            ModelBackend::Softmax(m) => {
                let mut activations = features.to_vec();
                for layer in &m.layers {
                    let mut out = dense(&layer.weights, &layer.bias, &activations);
                    match layer.activation {
                        Activation::Linear => {}
                        Activation::Relu => {
                            for v in &mut out {
                                *v = v.max(0.0);
                            }
                        }
                        Activation::Softmax => softmax_in_place(&mut out),
                    }
                    activations = out;
                }
                ModelOutput::Distribution(activations)
            }
        }
    }
}

fn check_layer_shapes(
    input_dim: usize,
    weights: &[Vec<f32>],
    bias: &[f32],
    what: &str,
) -> Result<(), ModelError> {
    if weights.is_empty() {
        return Err(ModelError::CorruptArtifact(format!(
            "{} has no output units",
            what
        )));
    }
    if bias.len() != weights.len() {
        return Err(ModelError::CorruptArtifact(format!(
            "{}: {} bias terms for {} output units",
            what,
            bias.len(),
            weights.len()
        )));
    }
    for (row, w) in weights.iter().enumerate() {
        if w.len() != input_dim {
            return Err(ModelError::CorruptArtifact(format!(
                "{}: row {} has {} weights, expected {}",
                what,
                row,
                w.len(),
                input_dim
            )));
        }
    }
    Ok(())
}

fn dense(weights: &[Vec<f32>], bias: &[f32], input: &[f32]) -> Vec<f32> {
    weights
        .iter()
        .zip(bias.iter())
        .map(|(row, b)| row.iter().zip(input.iter()).map(|(w, x)| w * x).sum::<f32>() + b)
        .collect()
}

/// Numerically stable softmax.
fn softmax_in_place(values: &mut [f32]) {
    let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    if sum > 0.0 {
        for v in values.iter_mut() {
            *v /= sum;
        }
    }
}

/// Index of the maximum value; ties resolve to the lowest index.
pub(crate) fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
