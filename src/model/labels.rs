// LabelSpace - ordered category names with a stable index <-> name mapping
//
// The mapping is fixed at construction (sorted, deduplicated) and never
// rebuilt, so indices emitted by a loaded model always resolve to the
// same names. This mirrors how the training pipeline fits its label
// encoder on the sorted unique labels of the training table.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::ModelError;

/// Default CSV column holding category names
pub const DEFAULT_LABEL_COLUMN: &str = "label";

/// The fixed, ordered set of categories a classifier can predict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSpace {
    labels: Vec<String>,
}

impl LabelSpace {
    /// Build a label space from an explicit collection of names.
    ///
    /// Names are deduplicated and sorted so the index assignment matches
    /// the encoder used at training time.
    pub fn from_labels<I, S>(labels: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        labels.sort();
        labels.dedup();

        if labels.is_empty() {
            return Err(ModelError::LabelSource(
                "label set is empty".to_string(),
            ));
        }
        Ok(Self { labels })
    }

    /// Build a label space from one column of a training CSV.
    ///
    /// Only plain (unquoted, comma-separated) CSV is handled; label names
    /// are simple tokens in the training tables this reads.
    pub fn from_csv_path<P: AsRef<Path>>(path: P, column: &str) -> Result<Self, ModelError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ModelError::ArtifactNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path)?;

        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| ModelError::LabelSource(format!("{} is empty", path.display())))?;

        let column_index = header
            .split(',')
            .position(|name| name.trim().trim_matches('"') == column)
            .ok_or_else(|| {
                ModelError::LabelSource(format!(
                    "column '{}' not found in {}",
                    column,
                    path.display()
                ))
            })?;

        let labels = lines.filter_map(|line| {
            line.split(',')
                .nth(column_index)
                .map(|v| v.trim().trim_matches('"').to_string())
                .filter(|v| !v.is_empty())
        });

        let space = Self::from_labels(labels)?;
        info!(
            labels = space.len(),
            source = %path.display(),
            "built label space from csv"
        );
        Ok(space)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Name for a label index, if in range.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Index for a label name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}
