// Spectral module - frequency-domain feature computation
//
// Per-frame features computed from magnitude spectra.
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

use crate::features::stft::N_FFT;

/// Compute the spectral centroid of one frame (weighted mean frequency).
///
/// Formula: centroid = Σ(f_i × |X[i]|) / Σ|X[i]|
///
/// The centroid is the "center of mass" of the spectrum and a proxy for
/// brightness. Returns 0.0 for silent frames.
pub fn centroid(spectrum: &[f32], sample_rate: u32) -> f32 {
    let freq_bin_width = sample_rate as f32 / N_FFT as f32;

    let weighted_sum: f32 = spectrum
        .iter()
        .enumerate()
        .map(|(i, &mag)| i as f32 * freq_bin_width * mag)
        .sum();

    let magnitude_sum: f32 = spectrum.iter().sum();

    if magnitude_sum > 1e-10 {
        weighted_sum / magnitude_sum
    } else {
        0.0
    }
}
