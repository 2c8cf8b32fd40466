// STFT module - short-time Fourier transform framing
//
// Slices a waveform into Hann-windowed frames and computes the magnitude
// spectrum of each frame. Frame size and hop are fixed analysis constants
// shared with training-time extraction; changing them silently degrades
// classifier accuracy, so they are not configurable.

use rustfft::{num_complex::Complex, FftPlanner};
use std::sync::Mutex;

/// Analysis frame size in samples
pub const N_FFT: usize = 2048;

/// Hop between consecutive frames in samples
pub const HOP_LENGTH: usize = 512;

/// Number of positive-frequency bins per frame (N_FFT / 2 + 1)
pub const N_BINS: usize = N_FFT / 2 + 1;

/// Number of analysis frames for a clip of `len` samples.
///
/// Clips shorter than one frame still produce a single zero-padded frame,
/// so every non-empty waveform yields at least one frame.
pub fn frame_count(len: usize) -> usize {
    if len >= N_FFT {
        (len - N_FFT) / HOP_LENGTH + 1
    } else {
        1
    }
}

/// Sample offsets of each analysis frame.
pub fn frame_offsets(len: usize) -> impl Iterator<Item = usize> {
    (0..frame_count(len)).map(|i| i * HOP_LENGTH)
}

/// STFT processor that computes per-frame magnitude spectra
pub struct StftProcessor {
    fft_planner: Mutex<FftPlanner<f32>>,
    /// Hann window (pre-computed)
    window: Vec<f32>,
}

impl StftProcessor {
    pub fn new() -> Self {
        // Pre-compute Hann window to reduce spectral leakage
        let window = (0..N_FFT)
            .map(|i| {
                0.5 * (1.0 - ((2.0 * std::f32::consts::PI * i as f32) / (N_FFT as f32 - 1.0)).cos())
            })
            .collect();

        Self {
            fft_planner: Mutex::new(FftPlanner::new()),
            window,
        }
    }

    /// Compute the magnitude spectrum of every analysis frame.
    ///
    /// Frames past the end of the signal are zero-padded. Each row has
    /// `N_BINS` entries covering the positive frequencies only.
    pub fn magnitude_frames(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        let fft = self
            .fft_planner
            .lock()
            .expect("fft planner lock poisoned")
            .plan_fft_forward(N_FFT);

        let mut frames = Vec::with_capacity(frame_count(samples.len()));
        let mut buffer = vec![Complex::new(0.0f32, 0.0); N_FFT];

        for start in frame_offsets(samples.len()) {
            for (i, slot) in buffer.iter_mut().enumerate() {
                let sample = samples.get(start + i).copied().unwrap_or(0.0);
                *slot = Complex::new(sample * self.window[i], 0.0);
            }
            fft.process(&mut buffer);
            frames.push(buffer[..N_BINS].iter().map(|c| c.norm()).collect());
        }

        frames
    }
}

impl Default for StftProcessor {
    fn default() -> Self {
        Self::new()
    }
}
