use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{EvaluateError, ExampleError, core::grid::Grid};

/// A reverse Game of Life task: an end board reached after `delta` steps from
/// a (possibly unknown) start board.
///
/// Construction modes:
///
/// - start only: the end board is derived by advancing a copy of the start
///   `delta` times
/// - end only: no ground truth, so [`Self::evaluate`] fails
/// - both: kept as given, even if the end is not reachable from the start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExampleRepr", into = "ExampleRepr")]
pub struct Example {
    id: Option<u64>,
    delta: usize,
    start: Option<Grid>,
    end: Grid,
}

impl Example {
    pub fn new(delta: usize, start: Option<Grid>, end: Option<Grid>) -> Result<Self, ExampleError> {
        match (start, end) {
            (None, None) => Err(ExampleError::MissingBoards),
            (Some(start), None) => Ok(Self::from_start(delta, start)),
            (None, Some(end)) => Ok(Self::from_end(delta, end)),
            (Some(start), Some(end)) => Self::from_pair(delta, start, end),
        }
    }

    /// Creates an example whose end board is `start` advanced `delta` steps.
    #[must_use]
    pub fn from_start(delta: usize, start: Grid) -> Self {
        let mut end = start.clone();
        end.advance_by(delta);
        Self {
            id: None,
            delta,
            start: Some(start),
            end,
        }
    }

    /// Creates an example without ground truth.
    #[must_use]
    pub fn from_end(delta: usize, end: Grid) -> Self {
        Self {
            id: None,
            delta,
            start: None,
            end,
        }
    }

    /// Creates an example from both boards without checking that `end`
    /// follows from `start`.
    pub fn from_pair(delta: usize, start: Grid, end: Grid) -> Result<Self, ExampleError> {
        if start.shape() != end.shape() {
            return Err(ExampleError::ShapeMismatch {
                start_rows: start.rows(),
                start_cols: start.cols(),
                end_rows: end.rows(),
                end_cols: end.cols(),
            });
        }
        Ok(Self {
            id: None,
            delta,
            start: Some(start),
            end,
        })
    }

    /// Attaches an external identifier (e.g. the row id of a persisted example).
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    #[must_use]
    pub fn delta(&self) -> usize {
        self.delta
    }

    #[must_use]
    pub fn start(&self) -> Option<&Grid> {
        self.start.as_ref()
    }

    #[must_use]
    pub fn end(&self) -> &Grid {
        &self.end
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.end.shape()
    }

    /// Fraction of cells where `predicted` disagrees with the start board.
    ///
    /// The result lies in \[0, 1\].
    #[expect(clippy::cast_precision_loss)]
    pub fn evaluate(&self, predicted: &Grid) -> Result<f64, EvaluateError> {
        let start = self.start.as_ref().ok_or(EvaluateError::MissingStart)?;
        if start.shape() != predicted.shape() {
            return Err(EvaluateError::ShapeMismatch {
                expected_rows: start.rows(),
                expected_cols: start.cols(),
                actual_rows: predicted.rows(),
                actual_cols: predicted.cols(),
            });
        }
        let errors = start
            .cells()
            .iter()
            .zip(predicted.cells())
            .filter(|(label, predict)| label != predict)
            .count();
        Ok(errors as f64 / start.len() as f64)
    }
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "delta={}", self.delta)?;
        writeln!(f, "start board:")?;
        match &self.start {
            Some(start) => writeln!(f, "{start}")?,
            None => writeln!(f, "(unknown)")?,
        }
        writeln!(f, "end board:")?;
        write!(f, "{}", self.end)
    }
}

#[derive(Serialize, Deserialize)]
struct ExampleRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    delta: usize,
    #[serde(default)]
    start: Option<Grid>,
    #[serde(default)]
    end: Option<Grid>,
}

impl TryFrom<ExampleRepr> for Example {
    type Error = ExampleError;

    fn try_from(repr: ExampleRepr) -> Result<Self, Self::Error> {
        let example = Self::new(repr.delta, repr.start, repr.end)?;
        Ok(Self {
            id: repr.id,
            ..example
        })
    }
}

impl From<Example> for ExampleRepr {
    fn from(example: Example) -> Self {
        Self {
            id: example.id,
            delta: example.delta,
            start: example.start,
            end: Some(example.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[u8]]) -> Grid {
        Grid::from_rows(rows).unwrap()
    }

    fn scoring_example() -> Example {
        let start = grid(&[&[0, 1, 0], &[1, 1, 0], &[0, 1, 1]]);
        let end = grid(&[&[1, 1, 0], &[1, 0, 0], &[1, 1, 1]]);
        Example::new(1, Some(start), Some(end)).unwrap()
    }

    #[test]
    fn test_constructor_keeps_both_boards() {
        let start = grid(&[&[0, 0], &[1, 0]]);
        let end = grid(&[&[0, 0], &[0, 0]]);
        let example = Example::new(1, Some(start.clone()), Some(end.clone())).unwrap();
        assert_eq!(example.delta(), 1);
        assert_eq!(example.start(), Some(&start));
        assert_eq!(example.end(), &end);
        assert_eq!(example.id(), None);
    }

    #[test]
    fn test_constructor_requires_a_board() {
        let err = Example::new(1, None, None).unwrap_err();
        assert_eq!(err, ExampleError::MissingBoards);
        assert!(err.kind().is_invalid_argument());
    }

    #[test]
    fn test_constructor_rejects_mixed_shapes() {
        let err = Example::new(1, Some(Grid::new_dead(2, 2)), Some(Grid::new_dead(3, 3)));
        assert!(err.unwrap_err().kind().is_unsupported());
    }

    #[test]
    fn test_end_derived_from_start() {
        let start = grid(&[&[0, 0, 0, 0], &[0, 1, 1, 1], &[1, 1, 1, 0], &[0, 0, 0, 0]]);
        let example = Example::from_start(2, start.clone());
        // the toad has period 2
        assert_eq!(example.end(), &start);

        let example = Example::from_start(1, start.clone());
        let mut expected = start;
        expected.advance();
        assert_eq!(example.end(), &expected);
    }

    #[test]
    fn test_derived_end_does_not_alias_start() {
        let start = grid(&[&[0, 1, 0], &[1, 0, 0], &[0, 0, 1]]);
        let example = Example::from_start(1, start.clone());
        assert_eq!(example.start(), Some(&start));
        assert_ne!(example.end(), &start);
    }

    #[test]
    fn test_evaluate() {
        let example = scoring_example();
        let start = example.start().unwrap().clone();
        let end = example.end().clone();
        let eps = 1e-12;
        assert!((example.evaluate(&Grid::new_dead(3, 3)).unwrap() - 5.0 / 9.0).abs() < eps);
        assert!(example.evaluate(&start).unwrap().abs() < eps);
        assert!((example.evaluate(&end).unwrap() - 3.0 / 9.0).abs() < eps);
    }

    #[test]
    fn test_evaluate_without_start() {
        let example = Example::from_end(1, Grid::new_dead(3, 3));
        let err = example.evaluate(&Grid::new_dead(3, 3)).unwrap_err();
        assert_eq!(err, EvaluateError::MissingStart);
        assert!(err.kind().is_precondition_failed());
    }

    #[test]
    fn test_evaluate_shape_mismatch() {
        let example = scoring_example();
        let err = example.evaluate(&Grid::new_dead(2, 3)).unwrap_err();
        assert!(err.kind().is_unsupported());
    }

    #[test]
    fn test_display() {
        let example = Example::from_end(3, grid(&[&[1, 0], &[0, 1]]));
        assert_eq!(
            example.to_string(),
            "delta=3\nstart board:\n(unknown)\nend board:\n10\n01"
        );
    }

    #[test]
    fn test_serialization_roundtrip() {
        let example = scoring_example().with_id(42);
        let serialized = serde_json::to_string(&example).unwrap();
        let deserialized: Example = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, example);

        // start-only payloads derive the end board
        let json = r#"{"delta":1,"start":{"rows":3,"cols":3,"cells":"010100001"}}"#;
        let example: Example = serde_json::from_str(json).unwrap();
        assert_eq!(example.end().render(), "000\n010\n000");

        assert!(serde_json::from_str::<Example>(r#"{"delta":1}"#).is_err());
    }
}
