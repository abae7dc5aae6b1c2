//! Predictors that recover start boards, and their scoring.
//!
//! Every strategy implements [`Predictor`]: given an end board and the number
//! of steps it evolved for, return a start board of the same shape.
//!
//! - [`AllDeadPredictor`] - Baseline that predicts an all-dead board
//! - [`TilePredictor`] - Votes with start tiles previously seen under the same end tile
//! - [`SymmetryVotePredictor`] - Wraps another predictor and averages its
//!   predictions over the eight symmetries of the board
//! - [`PredictorReport`] - Mean error rate of a predictor over examples, overall and per delta
//!
//! # Example
//!
//! ```
//! use revlife_engine::{Example, Grid};
//! use revlife_predictor::{AllDeadPredictor, PredictorReport};
//!
//! let start: Grid = "010\n110\n011".parse().unwrap();
//! let examples = [Example::from_start(1, start)];
//!
//! let report = PredictorReport::evaluate(&AllDeadPredictor, &examples).unwrap();
//! assert!((report.overall().mean_error() - 5.0 / 9.0).abs() < 1e-12);
//! ```

use std::fmt;

use revlife_engine::{ErrorKind, EvaluateError, Grid};

pub use self::{all_dead::*, report::*, symmetry_vote::*, tile::*};

mod all_dead;
mod report;
mod symmetry_vote;
mod tile;

/// Recovers a start board from an end board.
pub trait Predictor: fmt::Debug + Send + Sync {
    /// Predicts the board that evolves into `end` after `delta` steps.
    ///
    /// The result has the same shape as `end`.
    fn predict(&self, end: &Grid, delta: usize) -> Result<Grid, PredictError>;
}

impl<P> Predictor for Box<P>
where
    P: Predictor + ?Sized,
{
    fn predict(&self, end: &Grid, delta: usize) -> Result<Grid, PredictError> {
        (**self).predict(end, delta)
    }
}

impl<P> Predictor for &P
where
    P: Predictor + ?Sized,
{
    fn predict(&self, end: &Grid, delta: usize) -> Result<Grid, PredictError> {
        (**self).predict(end, delta)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PredictError {
    #[display("no model for delta={delta}")]
    UnknownDelta { delta: usize },
    #[display(
        "prediction is {actual_rows}x{actual_cols}, expected {expected_rows}x{expected_cols}"
    )]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },
}

impl PredictError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownDelta { .. } => ErrorKind::PreconditionFailed,
            Self::ShapeMismatch { .. } => ErrorKind::Unsupported,
        }
    }

    pub(crate) fn check_shape(expected: &Grid, actual: &Grid) -> Result<(), Self> {
        if expected.shape() == actual.shape() {
            return Ok(());
        }
        Err(Self::ShapeMismatch {
            expected_rows: expected.rows(),
            expected_cols: expected.cols(),
            actual_rows: actual.rows(),
            actual_cols: actual.cols(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ReportError {
    #[display("cannot score a predictor on zero examples")]
    EmptyExamples,
    #[display("prediction failed: {_0}")]
    Predict(PredictError),
    #[display("evaluation failed: {_0}")]
    Evaluate(EvaluateError),
}

impl ReportError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyExamples => ErrorKind::PreconditionFailed,
            Self::Predict(err) => err.kind(),
            Self::Evaluate(err) => err.kind(),
        }
    }
}

impl From<PredictError> for ReportError {
    fn from(err: PredictError) -> Self {
        Self::Predict(err)
    }
}

impl From<EvaluateError> for ReportError {
    fn from(err: EvaluateError) -> Self {
        Self::Evaluate(err)
    }
}
