//! Predictor inputs for the reverse Game of Life task.
//!
//! - [`neighborhood`] - Per-cell windows of an end board ([`NeighborhoodFeatures`]),
//!   batched into a row-major [`FeatureMatrix`]
//! - [`training_data`] - Feature/label rows assembled from examples
//!   ([`TrainingData`]), optionally deduplicated into weighted rows
//!   ([`WeightedTrainingData`])
//!
//! Features are always computed from the end board and labels are the start
//! board cells, so row `k` of a board's block predicts cell
//! `(k / cols, k % cols)` of the start board.
//!
//! # Example
//!
//! ```
//! use revlife_engine::{Example, Grid};
//! use revlife_features::{NeighborhoodFeatures, TrainingData};
//!
//! let start: Grid = "0110\n1001\n0110\n0000".parse().unwrap();
//! let examples = [Example::from_start(1, start)];
//!
//! let extractor = NeighborhoodFeatures::new(1, 0.0);
//! let data = TrainingData::from_examples(&extractor, &examples, false).unwrap();
//!
//! assert_eq!(data.len(), 16);
//! assert_eq!(data.x().num_features(), 9);
//! ```

use revlife_engine::ErrorKind;

pub use self::{neighborhood::*, training_data::*};

pub mod neighborhood;
pub mod training_data;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TrainingDataError {
    #[display("training data needs at least one example")]
    EmptyExamples,
    #[display("example {index} has no start board to label with")]
    MissingStart { index: usize },
    #[display(
        "example {index} is {actual_rows}x{actual_cols}, but the batch is {expected_rows}x{expected_cols}"
    )]
    ShapeMismatch {
        index: usize,
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },
}

impl TrainingDataError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyExamples | Self::MissingStart { .. } => ErrorKind::PreconditionFailed,
            Self::ShapeMismatch { .. } => ErrorKind::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert!(
            TrainingDataError::EmptyExamples
                .kind()
                .is_precondition_failed()
        );
        assert!(
            TrainingDataError::MissingStart { index: 0 }
                .kind()
                .is_precondition_failed()
        );
        let mismatch = TrainingDataError::ShapeMismatch {
            index: 1,
            expected_rows: 3,
            expected_cols: 3,
            actual_rows: 4,
            actual_cols: 4,
        };
        assert!(mismatch.kind().is_unsupported());
        assert_eq!(
            mismatch.to_string(),
            "example 1 is 4x4, but the batch is 3x3"
        );
    }
}
