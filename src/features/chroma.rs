// Chroma module - pitch-class energy profile
//
// Folds each frame's power spectrum onto the 12 western pitch classes
// (C = 0 .. B = 11) by rounding bin frequencies to the nearest MIDI note
// against an A440 reference. Each frame is max-normalized so the profile
// describes relative pitch-class strength, not absolute level.

use crate::features::stft::N_FFT;

/// Number of pitch-class bins
pub const N_CHROMA: usize = 12;

/// Reference tuning for pitch-class mapping
const A4_HZ: f32 = 440.0;

/// Compute the 12-bin chroma profile of one power-spectrum frame.
///
/// The DC bin is excluded (it has no pitch). Silent frames return all
/// zeros rather than dividing by zero during normalization.
pub fn chroma_frame(power: &[f32], sample_rate: u32) -> [f32; N_CHROMA] {
    let bin_width = sample_rate as f32 / N_FFT as f32;
    let mut bins = [0.0f32; N_CHROMA];

    for (k, &p) in power.iter().enumerate().skip(1) {
        let freq = k as f32 * bin_width;
        // midi 69 = A4; midi 60 = C4, so midi mod 12 puts C at class 0
        let midi = 69.0 + 12.0 * (freq / A4_HZ).log2();
        let class = (midi.round() as i64).rem_euclid(12) as usize;
        bins[class] += p;
    }

    let max = bins.iter().cloned().fold(0.0f32, f32::max);
    if max > 1e-10 {
        for b in &mut bins {
            *b /= max;
        }
    }
    bins
}
