// Error types for the cry classification pipeline
//
// Decode errors cover everything up to and including feature extraction;
// model errors cover artifact loading and inference. The top-level Error
// unions the two for end-to-end classification, so a caller can always
// tell a bad clip apart from a bad model.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while decoding audio or extracting features.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Waveform contains no samples (empty or fully malformed clip)
    #[error("waveform contains no samples")]
    EmptyWaveform,

    /// Sample rate must be a positive number of Hz
    #[error("sample rate must be positive (got {0} Hz)")]
    InvalidSampleRate(u32),

    /// WAV stream uses an encoding we do not handle
    #[error("unsupported wav encoding: {0}")]
    UnsupportedFormat(String),

    /// Underlying WAV parse failure
    #[error("wav decode failed: {0}")]
    Wav(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors produced while loading a model artifact or running inference.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Model artifact path is missing or unreadable
    #[error("model artifact not found: {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    /// Artifact parsed but its contents are inconsistent
    #[error("model artifact is corrupt: {0}")]
    CorruptArtifact(String),

    /// Label space size does not match the model's output width
    #[error("model produces {model_classes} classes but label space has {label_count} labels")]
    LabelMismatch {
        model_classes: usize,
        label_count: usize,
    },

    /// Feature vector length does not match the model's input width
    #[error("feature vector has length {got} but model expects {expected}")]
    Shape { expected: usize, got: usize },

    /// Label source (CSV column or explicit list) is unusable
    #[error("label source is invalid: {0}")]
    LabelSource(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Top-level error for end-to-end classification (decode + extract + predict).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_messages() {
        let err = DecodeError::EmptyWaveform;
        assert!(err.to_string().contains("no samples"));

        let err = DecodeError::InvalidSampleRate(0);
        assert!(err.to_string().contains("0 Hz"));
    }

    #[test]
    fn test_model_error_messages() {
        let err = ModelError::Shape {
            expected: 27,
            got: 5,
        };
        assert!(err.to_string().contains("27"));
        assert!(err.to_string().contains("5"));

        let err = ModelError::LabelMismatch {
            model_classes: 5,
            label_count: 4,
        };
        assert!(err.to_string().contains("5 classes"));
    }

    #[test]
    fn test_top_level_error_wraps_both_sides() {
        let err: Error = DecodeError::EmptyWaveform.into();
        assert!(matches!(err, Error::Decode(_)));

        let err: Error = ModelError::Shape {
            expected: 27,
            got: 0,
        }
        .into();
        assert!(matches!(err, Error::Model(_)));
    }
}
