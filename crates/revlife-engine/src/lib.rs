//! Simulation substrate for the reverse Game of Life task.
//!
//! - [`core`] - Board storage and the automaton step ([`Grid`]), the eight
//!   symmetries of the square ([`Symmetry`]) and the bit-packed tile
//!   identifier ([`TileId`])
//! - [`engine`] - Start/end pairs ([`Example`]), synthetic example generation
//!   and error-rate scoring
//!
//! # Example
//!
//! ```
//! use revlife_engine::{Example, Grid};
//!
//! let start: Grid = "010\n010\n010".parse().unwrap();
//! let example = Example::from_start(1, start.clone());
//!
//! assert_eq!(example.end().render(), "000\n111\n000");
//! assert_eq!(example.evaluate(&start).unwrap(), 0.0);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Category of a failure, shared by every error type in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant)]
pub enum ErrorKind {
    /// An argument is outside the domain of the operation.
    #[display("invalid argument")]
    InvalidArgument,
    /// The receiver is not in a state that allows the operation.
    #[display("precondition failed")]
    PreconditionFailed,
    /// The inputs are individually valid but cannot be combined.
    #[display("unsupported")]
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("symmetry index {index} is out of range 0..8")]
pub struct InvalidSymmetryError {
    pub index: usize,
}

impl InvalidSymmetryError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridShapeError {
    #[display("grid dimensions must be positive, got {rows}x{cols}")]
    EmptyDimension { rows: usize, cols: usize },
    #[display("expected {expected} cells for a {rows}x{cols} grid, got {actual}")]
    CellCount {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },
    #[display("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("cell value {value} at index {index} is neither 0 nor 1")]
    InvalidCell { index: usize, value: u8 },
    #[display("unexpected character {ch:?} at row {row}, column {col}")]
    InvalidChar { row: usize, col: usize, ch: char },
    #[display("a {rows}x{cols} grid has more cells than fit in usize")]
    TooLarge { rows: usize, cols: usize },
}

impl GridShapeError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DecodeTileError {
    #[display("tile value needs {bits} bits but a {rows}x{cols} tile holds {capacity}")]
    TooManyBits {
        bits: u64,
        rows: usize,
        cols: usize,
        capacity: usize,
    },
    #[display("invalid tile shape: {_0}")]
    Shape(GridShapeError),
}

impl DecodeTileError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ExampleError {
    #[display("start and end boards cannot both be missing")]
    MissingBoards,
    #[display("start board is {start_rows}x{start_cols} but end board is {end_rows}x{end_cols}")]
    ShapeMismatch {
        start_rows: usize,
        start_cols: usize,
        end_rows: usize,
        end_cols: usize,
    },
}

impl ExampleError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingBoards => ErrorKind::InvalidArgument,
            Self::ShapeMismatch { .. } => ErrorKind::Unsupported,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EvaluateError {
    #[display("cannot evaluate an example with no start board")]
    MissingStart,
    #[display(
        "predicted board is {actual_rows}x{actual_cols}, expected {expected_rows}x{expected_cols}"
    )]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },
}

impl EvaluateError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingStart => ErrorKind::PreconditionFailed,
            Self::ShapeMismatch { .. } => ErrorKind::Unsupported,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum GenerateError {
    #[display("fill probability {value} is outside [0, 1]")]
    FillProbability { value: f64 },
    #[display("fill range [{min}, {max}] must satisfy 0 <= min <= max <= 1 and max > 0")]
    FillRange { min: f64, max: f64 },
    #[display("no deltas to choose from")]
    EmptyDeltas,
    #[display("max attempts per example must be positive")]
    ZeroAttempts,
    #[display("gave up after {attempts} boards without a live end board")]
    TooManyRejections { attempts: usize },
    #[display("{_0}")]
    Shape(GridShapeError),
}

impl GenerateError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TooManyRejections { .. } => ErrorKind::PreconditionFailed,
            Self::FillProbability { .. }
            | Self::FillRange { .. }
            | Self::EmptyDeltas
            | Self::ZeroAttempts
            | Self::Shape(_) => ErrorKind::InvalidArgument,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("expected 32 hex digits, got {len} bytes")]
    Length { len: usize },
    #[display("invalid hex digit {ch:?} at index {index}")]
    Digit { index: usize, ch: char },
}

impl ParseSeedError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

impl From<GridShapeError> for GenerateError {
    fn from(err: GridShapeError) -> Self {
        Self::Shape(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert!(
            InvalidSymmetryError { index: 8 }
                .kind()
                .is_invalid_argument()
        );
        assert!(ExampleError::MissingBoards.kind().is_invalid_argument());
        assert!(EvaluateError::MissingStart.kind().is_precondition_failed());
        let mismatch = EvaluateError::ShapeMismatch {
            expected_rows: 3,
            expected_cols: 3,
            actual_rows: 2,
            actual_cols: 2,
        };
        assert!(mismatch.kind().is_unsupported());
        assert!(GenerateError::EmptyDeltas.kind().is_invalid_argument());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            InvalidSymmetryError { index: 8 }.to_string(),
            "symmetry index 8 is out of range 0..8"
        );
        assert_eq!(
            EvaluateError::MissingStart.to_string(),
            "cannot evaluate an example with no start board"
        );
    }
}
