// Audio module - decoded waveform representation and WAV decoding
//
// A Waveform is the hand-off point between audio decoding and feature
// extraction: mono f32 samples plus the native sample rate. Decoding
// happens fully in memory; no temporary files are involved.

mod wav;

pub use wav::{read_wav, read_wav_path};

/// A decoded mono audio clip.
///
/// Samples are 32-bit floats, nominally in [-1.0, 1.0], at the clip's
/// native sample rate. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Create a waveform from raw samples and a sample rate in Hz.
    ///
    /// Validity (non-empty samples, positive rate) is checked by the
    /// feature extractor, so synthetic or edge-case waveforms can be
    /// constructed freely in tests and callers.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Clip duration in seconds (0.0 when the sample rate is invalid).
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_accessors() {
        let wave = Waveform::new(vec![0.0, 0.5, -0.5], 16000);
        assert_eq!(wave.len(), 3);
        assert!(!wave.is_empty());
        assert_eq!(wave.sample_rate(), 16000);
        assert_eq!(wave.samples(), &[0.0, 0.5, -0.5]);
    }

    #[test]
    fn test_duration() {
        let wave = Waveform::new(vec![0.0; 16000], 16000);
        assert!((wave.duration_secs() - 1.0).abs() < 1e-6);

        let degenerate = Waveform::new(vec![0.0; 100], 0);
        assert_eq!(degenerate.duration_secs(), 0.0);
    }
}
