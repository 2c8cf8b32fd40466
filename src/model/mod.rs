// Model module - label space, inference backends, and the prediction service
//
// Module organization:
// - labels: LabelSpace (stable index <-> name mapping)
// - backend: ModelBackend (tagged decision/softmax variants + artifact format)
// - service: PredictionService (load + predict + end-to-end classify)

pub mod backend;
pub mod labels;
mod service;

pub use backend::{Activation, LayerArtifact, ModelArtifact, ModelBackend, ModelOutput};
pub use labels::{LabelSpace, DEFAULT_LABEL_COLUMN};
pub use service::{Prediction, PredictionService};
