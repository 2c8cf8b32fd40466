// FeatureExtractor - acoustic feature extraction for cry classification
//
// Turns an arbitrary-length waveform into the fixed 27-dimension feature
// vector the classifier was trained on. All per-frame features share the
// same STFT framing and are aggregated by taking the mean over frames,
// so clip duration never changes the output dimensionality.
//
// Module organization:
// - types: FeatureVector (fixed 27-element layout)
// - stft: Hann-windowed framing and magnitude spectra
// - mfcc: mel filterbank and cepstral coefficients
// - spectral: spectral centroid
// - temporal: zero-crossing rate
// - chroma: pitch-class profile
// - mod.rs: coordinator (FeatureExtractor)

pub mod chroma;
pub mod mfcc;
pub mod spectral;
pub mod stft;
pub mod temporal;
mod types;

pub use types::{FeatureVector, FEATURE_DIM};

use tracing::debug;

use crate::audio::Waveform;
use crate::error::DecodeError;
use chroma::N_CHROMA;
use mfcc::{MelFilterBank, N_MFCC};
use stft::{frame_offsets, StftProcessor, N_FFT};

/// FeatureExtractor coordinates the per-frame analysis pipeline.
///
/// The extractor is stateless apart from its FFT planner cache and may be
/// shared across threads. Extraction is a pure, deterministic function of
/// the input waveform.
pub struct FeatureExtractor {
    stft: StftProcessor,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self {
            stft: StftProcessor::new(),
        }
    }

    /// Extract the 27-element feature vector from a waveform.
    ///
    /// Per frame: 13 MFCCs, spectral centroid, zero-crossing rate, and a
    /// 12-bin chroma profile, each averaged over all frames and
    /// concatenated in training order.
    ///
    /// Fails with `DecodeError::EmptyWaveform` for zero-sample input and
    /// `DecodeError::InvalidSampleRate` for a zero sample rate.
    pub fn extract(&self, waveform: &Waveform) -> Result<FeatureVector, DecodeError> {
        if waveform.is_empty() {
            return Err(DecodeError::EmptyWaveform);
        }
        let sample_rate = waveform.sample_rate();
        if sample_rate == 0 {
            return Err(DecodeError::InvalidSampleRate(sample_rate));
        }

        let samples = waveform.samples();
        let magnitude_frames = self.stft.magnitude_frames(samples);
        let n_frames = magnitude_frames.len() as f32;
        let mel_bank = MelFilterBank::new(sample_rate);

        let mut mfcc_sums = [0.0f32; N_MFCC];
        let mut centroid_sum = 0.0f32;
        let mut chroma_sums = [0.0f32; N_CHROMA];
        let mut power = vec![0.0f32; stft::N_BINS];

        for spectrum in &magnitude_frames {
            for (p, &m) in power.iter_mut().zip(spectrum.iter()) {
                *p = m * m;
            }

            for (sum, c) in mfcc_sums.iter_mut().zip(mfcc::mfcc_frame(&mel_bank, &power)) {
                *sum += c;
            }
            centroid_sum += spectral::centroid(spectrum, sample_rate);
            for (sum, c) in chroma_sums.iter_mut().zip(chroma::chroma_frame(&power, sample_rate)) {
                *sum += c;
            }
        }

        // ZCR uses the same framing, over the raw (unwindowed) samples
        let zcr_sum: f32 = frame_offsets(samples.len())
            .map(|start| {
                let end = (start + N_FFT).min(samples.len());
                temporal::zero_crossing_rate(&samples[start..end])
            })
            .sum();

        let mut mfcc_means = [0.0f32; N_MFCC];
        for (mean, sum) in mfcc_means.iter_mut().zip(mfcc_sums) {
            *mean = sum / n_frames;
        }
        let mut chroma_means = [0.0f32; N_CHROMA];
        for (mean, sum) in chroma_means.iter_mut().zip(chroma_sums) {
            *mean = sum / n_frames;
        }

        debug!(
            frames = magnitude_frames.len(),
            sample_rate,
            duration_secs = waveform.duration_secs(),
            "extracted feature vector"
        );

        Ok(FeatureVector::from_parts(
            mfcc_means,
            centroid_sum / n_frames,
            zcr_sum / n_frames,
            chroma_means,
        ))
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generate pure sine wave for testing
    fn generate_sine_wave(sample_rate: u32, frequency: f32, duration_samples: usize) -> Vec<f32> {
        (0..duration_samples)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect()
    }

    /// Generate white noise for testing
    fn generate_white_noise(duration_samples: usize) -> Vec<f32> {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        (0..duration_samples)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect()
    }

    #[test]
    fn test_extract_length_is_always_27() {
        let extractor = FeatureExtractor::new();
        for samples in [100usize, 2048, 16000, 48000] {
            let wave = Waveform::new(generate_sine_wave(16000, 440.0, samples), 16000);
            let features = extractor.extract(&wave).unwrap();
            assert_eq!(features.len(), FEATURE_DIM);
            assert_eq!(features.as_slice().len(), 27);
        }
    }

    #[test]
    fn test_extract_values_finite() {
        let extractor = FeatureExtractor::new();

        let sine = Waveform::new(generate_sine_wave(16000, 440.0, 16000), 16000);
        let noise = Waveform::new(generate_white_noise(16000), 16000);
        let silence = Waveform::new(vec![0.0; 16000], 16000);

        for wave in [&sine, &noise, &silence] {
            let features = extractor.extract(wave).unwrap();
            assert!(
                features.as_slice().iter().all(|v| v.is_finite()),
                "non-finite value in {:?}",
                features
            );
        }
    }

    #[test]
    fn test_extract_deterministic() {
        let extractor = FeatureExtractor::new();
        let wave = Waveform::new(generate_sine_wave(16000, 300.0, 32000), 16000);

        let first = extractor.extract(&wave).unwrap();
        let second = extractor.extract(&wave).unwrap();
        assert_eq!(first, second, "extraction must be bit-identical");
    }

    #[test]
    fn test_empty_waveform_rejected() {
        let extractor = FeatureExtractor::new();
        let result = extractor.extract(&Waveform::new(Vec::new(), 16000));
        assert!(matches!(result, Err(DecodeError::EmptyWaveform)));
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let extractor = FeatureExtractor::new();
        let result = extractor.extract(&Waveform::new(vec![0.1; 1000], 0));
        assert!(matches!(result, Err(DecodeError::InvalidSampleRate(0))));
    }

    #[test]
    fn test_sine_vs_noise_features_differ() {
        let extractor = FeatureExtractor::new();

        let sine = extractor
            .extract(&Waveform::new(generate_sine_wave(16000, 200.0, 16000), 16000))
            .unwrap();
        let noise = extractor
            .extract(&Waveform::new(generate_white_noise(16000), 16000))
            .unwrap();

        assert!(
            noise.zcr() > sine.zcr(),
            "noise ZCR {} should exceed sine ZCR {}",
            noise.zcr(),
            sine.zcr()
        );
        assert!(
            noise.spectral_centroid() > sine.spectral_centroid(),
            "noise centroid should exceed a 200 Hz sine's"
        );
    }

    #[test]
    fn test_a440_chroma_mean_peaks_at_a() {
        let extractor = FeatureExtractor::new();
        let wave = Waveform::new(generate_sine_wave(16000, 440.0, 48000), 16000);
        let features = extractor.extract(&wave).unwrap();

        let chroma = features.chroma();
        let peak = chroma
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 9, "chroma means: {:?}", chroma);
    }

    #[test]
    fn test_short_clip_single_frame() {
        let extractor = FeatureExtractor::new();
        let wave = Waveform::new(generate_sine_wave(16000, 440.0, 100), 16000);
        let features = extractor.extract(&wave).unwrap();
        assert!(features.as_slice().iter().all(|v| v.is_finite()));
    }
}
