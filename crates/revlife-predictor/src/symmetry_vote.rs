use revlife_engine::{Cell, Grid, Symmetry};

use crate::{PredictError, Predictor};

/// Averages an inner predictor over the eight symmetries of the board.
///
/// The inner predictor sees every transformed copy of the end board. Each
/// prediction is mapped back with the inverse transform, and a cell is alive
/// iff the fraction of predictions marking it alive exceeds the threshold
/// (0.5 unless set with [`Self::with_threshold`]).
#[derive(Debug, Clone)]
pub struct SymmetryVotePredictor<P> {
    inner: P,
    threshold: f64,
}

impl<P> SymmetryVotePredictor<P>
where
    P: Predictor,
{
    pub const DEFAULT_THRESHOLD: f64 = 0.5;

    #[must_use]
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn inner(&self) -> &P {
        &self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P> Predictor for SymmetryVotePredictor<P>
where
    P: Predictor,
{
    #[expect(clippy::cast_precision_loss)]
    fn predict(&self, end: &Grid, delta: usize) -> Result<Grid, PredictError> {
        let mut votes = vec![0.0_f64; end.len()];
        for sym in Symmetry::ALL {
            let image = sym.apply(end);
            let predicted = self.inner.predict(&image, delta)?;
            PredictError::check_shape(&image, &predicted)?;
            let plane: Vec<f64> = predicted.cells().iter().map(|&c| f64::from(c.as_u8())).collect();
            let restored = sym
                .inverse()
                .apply_plane(&plane, predicted.rows(), predicted.cols());
            for (vote, value) in votes.iter_mut().zip(restored) {
                *vote += value;
            }
        }

        let cells = votes
            .iter()
            .map(|&v| Cell::from_bool(v / Symmetry::LEN as f64 > self.threshold))
            .collect();
        match Grid::from_cells(end.rows(), end.cols(), cells) {
            Ok(grid) => Ok(grid),
            Err(_) => unreachable!("votes cover every cell of the end board"),
        }
    }
}
