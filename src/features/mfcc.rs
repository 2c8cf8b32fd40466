// MFCC module - mel-frequency cepstral coefficients
//
// Per-frame pipeline: power spectrum -> triangular mel filterbank ->
// log energies -> orthonormal DCT-II -> first 13 coefficients. The mel
// layout (40 HTK-scale bands, 0 Hz to Nyquist) is part of the contract
// with training-time extraction and must not change independently.
//
// References:
// - Davis, S. & Mermelstein, P. (1980). Comparison of parametric
//   representations for monosyllabic word recognition

use crate::features::stft::{N_BINS, N_FFT};

/// Number of cepstral coefficients kept per frame
pub const N_MFCC: usize = 13;

/// Number of triangular mel bands
const N_MELS: usize = 40;

/// Floor applied before taking logs of band energies
const LOG_FLOOR: f32 = 1e-10;

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0f32.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filterbank for a fixed sample rate.
///
/// Filters are stored sparsely as (first bin, weights) runs since each
/// triangle covers only a contiguous span of FFT bins.
pub struct MelFilterBank {
    filters: Vec<(usize, Vec<f32>)>,
}

impl MelFilterBank {
    pub fn new(sample_rate: u32) -> Self {
        let nyquist = sample_rate as f32 / 2.0;
        let mel_max = hz_to_mel(nyquist);
        let bin_width = sample_rate as f32 / N_FFT as f32;

        // N_MELS + 2 band edges, evenly spaced on the mel scale
        let edges: Vec<f32> = (0..N_MELS + 2)
            .map(|i| mel_to_hz(mel_max * i as f32 / (N_MELS + 1) as f32))
            .collect();

        let mut filters = Vec::with_capacity(N_MELS);
        for j in 0..N_MELS {
            let (lo, mid, hi) = (edges[j], edges[j + 1], edges[j + 2]);
            let mut first = None;
            let mut weights = Vec::new();

            for k in 0..N_BINS {
                let freq = k as f32 * bin_width;
                let weight = if freq <= lo || freq >= hi || mid <= lo || hi <= mid {
                    0.0
                } else if freq <= mid {
                    (freq - lo) / (mid - lo)
                } else {
                    (hi - freq) / (hi - mid)
                };

                if weight > 0.0 {
                    if first.is_none() {
                        first = Some(k);
                    }
                    weights.push(weight);
                } else if first.is_some() {
                    break;
                }
            }

            filters.push((first.unwrap_or(0), weights));
        }

        Self { filters }
    }

    /// Log mel-band energies of one power-spectrum frame.
    pub fn log_energies(&self, power: &[f32]) -> [f32; N_MELS] {
        let mut out = [0.0f32; N_MELS];
        for (band, (first, weights)) in self.filters.iter().enumerate() {
            let energy: f32 = weights
                .iter()
                .enumerate()
                .map(|(i, &w)| w * power.get(first + i).copied().unwrap_or(0.0))
                .sum();
            out[band] = energy.max(LOG_FLOOR).ln();
        }
        out
    }
}

/// Compute the first `N_MFCC` cepstral coefficients of one frame.
///
/// Uses the orthonormal DCT-II of the log mel energies.
pub fn mfcc_frame(bank: &MelFilterBank, power: &[f32]) -> [f32; N_MFCC] {
    let log_energies = bank.log_energies(power);
    let n = N_MELS as f32;

    let mut coeffs = [0.0f32; N_MFCC];
    for (c, slot) in coeffs.iter_mut().enumerate() {
        let sum: f32 = log_energies
            .iter()
            .enumerate()
            .map(|(m, &e)| {
                e * (std::f32::consts::PI * c as f32 * (m as f32 + 0.5) / n).cos()
            })
            .sum();
        let scale = if c == 0 {
            (1.0 / n).sqrt()
        } else {
            (2.0 / n).sqrt()
        };
        *slot = scale * sum;
    }
    coeffs
}
