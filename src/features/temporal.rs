// Temporal module - time-domain feature computation
//
// Zero-crossing rate is computed on the raw (unwindowed) samples of each
// analysis frame, using the same framing as the spectral features.

/// Compute the zero-crossing rate of one frame.
///
/// Formula: ZCR = crossings / (N - 1)
///
/// High ZCR indicates noise-like or high-frequency content; low ZCR
/// indicates tonal or low-frequency content. Returns a value in [0, 1].
pub fn zero_crossing_rate(frame: &[f32]) -> f32 {
    if frame.len() < 2 {
        return 0.0;
    }

    let mut crossings = 0;
    for i in 1..frame.len() {
        if (frame[i] >= 0.0 && frame[i - 1] < 0.0) || (frame[i] < 0.0 && frame[i - 1] >= 0.0) {
            crossings += 1;
        }
    }

    crossings as f32 / (frame.len() - 1) as f32
}
