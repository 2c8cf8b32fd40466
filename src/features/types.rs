// Types module - the fixed-length acoustic feature vector

use serde::Serialize;

use crate::features::chroma::N_CHROMA;
use crate::features::mfcc::N_MFCC;

/// Total feature vector length: 13 MFCC + centroid + ZCR + 12 chroma = 27
pub const FEATURE_DIM: usize = N_MFCC + 1 + 1 + N_CHROMA;

/// Fixed-length acoustic feature vector for one audio clip.
///
/// Layout (the order the classifier was trained on, never reordered):
/// `[mfcc_0..mfcc_12, spectral_centroid, zcr, chroma_0..chroma_11]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector([f32; FEATURE_DIM]);

impl FeatureVector {
    pub(crate) fn from_parts(
        mfcc: [f32; N_MFCC],
        spectral_centroid: f32,
        zcr: f32,
        chroma: [f32; N_CHROMA],
    ) -> Self {
        let mut values = [0.0f32; FEATURE_DIM];
        values[..N_MFCC].copy_from_slice(&mfcc);
        values[N_MFCC] = spectral_centroid;
        values[N_MFCC + 1] = zcr;
        values[N_MFCC + 2..].copy_from_slice(&chroma);
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        FEATURE_DIM
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The 13 MFCC means
    pub fn mfcc(&self) -> &[f32] {
        &self.0[..N_MFCC]
    }

    /// Mean spectral centroid in Hz
    pub fn spectral_centroid(&self) -> f32 {
        self.0[N_MFCC]
    }

    /// Mean zero-crossing rate
    pub fn zcr(&self) -> f32 {
        self.0[N_MFCC + 1]
    }

    /// The 12 chroma means
    pub fn chroma(&self) -> &[f32] {
        &self.0[N_MFCC + 2..]
    }
}

impl AsRef<[f32]> for FeatureVector {
    fn as_ref(&self) -> &[f32] {
        self.as_slice()
    }
}

impl From<FeatureVector> for Vec<f32> {
    fn from(v: FeatureVector) -> Self {
        v.0.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_order() {
        let mfcc = [1.0; N_MFCC];
        let chroma = [4.0; N_CHROMA];
        let v = FeatureVector::from_parts(mfcc, 2.0, 3.0, chroma);

        assert_eq!(v.len(), 27);
        assert_eq!(v.as_slice()[0], 1.0);
        assert_eq!(v.as_slice()[12], 1.0);
        assert_eq!(v.as_slice()[13], 2.0);
        assert_eq!(v.as_slice()[14], 3.0);
        assert_eq!(v.as_slice()[15], 4.0);
        assert_eq!(v.as_slice()[26], 4.0);

        assert_eq!(v.mfcc(), &[1.0; N_MFCC]);
        assert_eq!(v.spectral_centroid(), 2.0);
        assert_eq!(v.zcr(), 3.0);
        assert_eq!(v.chroma(), &[4.0; N_CHROMA]);
    }

    #[test]
    fn test_serializes_as_json_array() {
        let v = FeatureVector::from_parts([0.0; N_MFCC], 0.0, 0.0, [0.0; N_CHROMA]);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 27);
    }
}
