use std::collections::{BTreeMap, HashMap};

use revlife_engine::{Cell, Example, Grid, TileId};
use revlife_features::TrainingDataError;

use crate::{PredictError, Predictor};

/// How stored start tiles are weighted when they vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileWeighting {
    /// Every distinct start tile seen under an end tile votes with weight
    /// `1 / count(end tile)`, however often it occurred.
    #[default]
    Distinct,
    /// Every start tile votes with weight `count(start tile) / count(end tile)`.
    Frequency,
}

#[derive(Debug, Clone, Default)]
struct StartTiles {
    total: u32,
    // ordered so that the f64 vote sums are reproducible
    counts: BTreeMap<TileId, u32>,
}

/// Predicts from the start tiles observed under each end tile.
///
/// [`Self::store_tiles`] slides a `tile_size`x`tile_size` window over every
/// example and records, per delta and per end-tile id, how often each start
/// tile occurred. To predict, every window of the end board looks up its
/// end tile and spreads the stored start tiles over the window's cells,
/// weighted as selected by [`TileWeighting`]. A cell is alive iff its alive
/// weight exceeds its dead weight, so ties and cells no window has seen stay
/// dead.
///
/// Storage is cumulative: storing the same examples twice doubles their
/// counts. Use [`Self::clear_tiles`] to start over.
///
/// # Example
///
/// ```
/// use revlife_engine::{Example, Grid};
/// use revlife_predictor::{Predictor, TilePredictor};
///
/// let start: Grid = "0110\n1001\n0110\n0000".parse().unwrap();
/// let example = Example::from_start(1, start.clone());
///
/// let mut predictor = TilePredictor::new(2);
/// predictor.store_tiles(std::slice::from_ref(&example)).unwrap();
///
/// // a still life seen once is predicted exactly
/// assert_eq!(predictor.predict(example.end(), 1).unwrap(), start);
/// assert!(predictor.predict(example.end(), 2).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct TilePredictor {
    tile_size: usize,
    weighting: TileWeighting,
    tiles: BTreeMap<usize, HashMap<TileId, StartTiles>>,
}

impl TilePredictor {
    /// # Panics
    ///
    /// Panics if `tile_size` is zero.
    #[must_use]
    pub fn new(tile_size: usize) -> Self {
        assert!(tile_size > 0, "tile size must be positive");
        Self {
            tile_size,
            weighting: TileWeighting::default(),
            tiles: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_weighting(mut self, weighting: TileWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    #[must_use]
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    #[must_use]
    pub fn weighting(&self) -> TileWeighting {
        self.weighting
    }

    /// Deltas with stored tiles, in ascending order.
    pub fn deltas(&self) -> impl Iterator<Item = usize> + '_ {
        self.tiles.keys().copied()
    }

    /// Number of distinct end tiles stored for `delta`.
    #[must_use]
    pub fn num_end_tiles(&self, delta: usize) -> usize {
        self.tiles.get(&delta).map_or(0, HashMap::len)
    }

    /// Records the tile pairs of every example.
    ///
    /// Every example must have a start board. Boards smaller than the tile
    /// contribute nothing, but still make their delta known.
    pub fn store_tiles(&mut self, examples: &[Example]) -> Result<(), TrainingDataError> {
        if let Some(index) = examples.iter().position(|e| e.start().is_none()) {
            return Err(TrainingDataError::MissingStart { index });
        }
        let size = self.tile_size;
        for example in examples {
            let Some(start) = example.start() else {
                continue;
            };
            let end = example.end();
            let by_end = self.tiles.entry(example.delta()).or_default();
            for (row, col) in window_origins(end, size) {
                let end_id = TileId::encode(&end.sub_grid(row, col, size, size));
                let start_id = TileId::encode(&start.sub_grid(row, col, size, size));
                let stats = by_end.entry(end_id).or_default();
                stats.total += 1;
                *stats.counts.entry(start_id).or_default() += 1;
            }
        }
        tracing::debug!(
            examples = examples.len(),
            tile_size = size,
            deltas = self.tiles.len(),
            "stored tiles"
        );
        Ok(())
    }

    /// Forgets every stored tile.
    pub fn clear_tiles(&mut self) {
        self.tiles.clear();
    }
}

impl Predictor for TilePredictor {
    fn predict(&self, end: &Grid, delta: usize) -> Result<Grid, PredictError> {
        let by_end = self
            .tiles
            .get(&delta)
            .ok_or(PredictError::UnknownDelta { delta })?;
        let size = self.tile_size;
        let cols = end.cols();
        let mut alive = vec![0.0_f64; end.len()];
        let mut dead = vec![0.0_f64; end.len()];

        for (row, col) in window_origins(end, size) {
            let end_id = TileId::encode(&end.sub_grid(row, col, size, size));
            let Some(stats) = by_end.get(&end_id) else {
                continue;
            };
            for (start_id, &count) in &stats.counts {
                let weight = match self.weighting {
                    TileWeighting::Distinct => 1.0 / f64::from(stats.total),
                    TileWeighting::Frequency => f64::from(count) / f64::from(stats.total),
                };
                let Ok(tile) = start_id.decode(size, size) else {
                    unreachable!("stored tiles are {size}x{size}");
                };
                for (k, cell) in tile.cells().iter().enumerate() {
                    let index = (row + k / size) * cols + col + k % size;
                    if cell.is_alive() {
                        alive[index] += weight;
                    } else {
                        dead[index] += weight;
                    }
                }
            }
        }

        let mut predicted = Grid::new_dead(end.rows(), end.cols());
        for (index, (a, d)) in alive.iter().zip(&dead).enumerate() {
            if a > d {
                predicted.set(index / cols, index % cols, Cell::Alive);
            }
        }
        tracing::trace!(
            delta,
            alive = predicted.population(),
            cells = end.len(),
            "tile prediction"
        );
        Ok(predicted)
    }
}

fn window_origins(grid: &Grid, size: usize) -> impl Iterator<Item = (usize, usize)> {
    let rows = (grid.rows() + 1).saturating_sub(size);
    let cols = (grid.cols() + 1).saturating_sub(size);
    (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
}
