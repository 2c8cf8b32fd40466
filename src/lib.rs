// Crysense - infant cry audio classification core
//
// Deterministic acoustic feature extraction (27-dimension vector: 13 MFCC
// means, spectral centroid mean, zero-crossing-rate mean, 12 chroma means)
// plus a prediction service around a pre-trained model artifact. Audio
// decoding, extraction, and inference all run in memory; the service is
// immutable after load and safe to share across threads.

pub mod audio;
pub mod error;
pub mod features;
pub mod model;

// Re-exports for convenience
pub use audio::{read_wav, read_wav_path, Waveform};
pub use error::{DecodeError, Error, ModelError};
pub use features::{FeatureExtractor, FeatureVector, FEATURE_DIM};
pub use model::{LabelSpace, ModelBackend, Prediction, PredictionService};
