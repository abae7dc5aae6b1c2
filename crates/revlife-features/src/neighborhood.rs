use std::ops::Index;

use revlife_engine::{Cell, Grid};
use serde::{Deserialize, Serialize};

/// Row-major matrix of per-cell feature vectors.
///
/// Row `k` holds the features of one cell; every row has
/// [`Self::num_features`] values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureMatrix {
    num_features: usize,
    data: Vec<f32>,
}

impl FeatureMatrix {
    #[must_use]
    pub fn new(num_features: usize) -> Self {
        Self {
            num_features,
            data: vec![],
        }
    }

    #[must_use]
    pub fn with_capacity(num_features: usize, num_rows: usize) -> Self {
        Self {
            num_features,
            data: Vec::with_capacity(num_features * num_rows),
        }
    }

    #[must_use]
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.data.len().checked_div(self.num_features).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn row(&self, index: usize) -> &[f32] {
        let start = index * self.num_features;
        &self.data[start..start + self.num_features]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.data.chunks_exact(self.num_features.max(1))
    }

    /// Appends one row.
    ///
    /// # Panics
    ///
    /// Panics if `row.len()` differs from [`Self::num_features`].
    pub fn push_row(&mut self, row: &[f32]) {
        assert_eq!(
            row.len(),
            self.num_features,
            "feature row has the wrong width"
        );
        self.data.extend_from_slice(row);
    }

    /// Appends every row of `other`.
    ///
    /// # Panics
    ///
    /// Panics if the two matrices have different widths.
    pub fn append(&mut self, other: &Self) {
        assert_eq!(
            other.num_features, self.num_features,
            "feature matrices have different widths"
        );
        self.data.extend_from_slice(&other.data);
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

impl Index<usize> for FeatureMatrix {
    type Output = [f32];

    fn index(&self, index: usize) -> &Self::Output {
        self.row(index)
    }
}

/// Extracts the square neighborhood around each cell.
///
/// The window extends `window_size` cells in each of the four directions, so
/// its side is `2 * window_size + 1`. Positions outside the board contribute
/// `off_board_value`. Values are flattened in row-major order over the window.
///
/// # Example
///
/// ```
/// use revlife_engine::Grid;
/// use revlife_features::NeighborhoodFeatures;
///
/// let grid: Grid = "
///     01
///     11
/// ".parse().unwrap();
///
/// let extractor = NeighborhoodFeatures::new(1, -1.0);
/// assert_eq!(
///     extractor.features_for_cell(&grid, 0, 0),
///     [-1.0, -1.0, -1.0, -1.0, 0.0, 1.0, -1.0, 1.0, 1.0],
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborhoodFeatures {
    window_size: usize,
    off_board_value: f32,
}

impl Default for NeighborhoodFeatures {
    fn default() -> Self {
        Self {
            window_size: 1,
            off_board_value: 0.0,
        }
    }
}

impl NeighborhoodFeatures {
    #[must_use]
    pub fn new(window_size: usize, off_board_value: f32) -> Self {
        Self {
            window_size,
            off_board_value,
        }
    }

    #[must_use]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    #[must_use]
    pub fn off_board_value(&self) -> f32 {
        self.off_board_value
    }

    /// Side length of the window.
    #[must_use]
    pub fn side_len(&self) -> usize {
        2 * self.window_size + 1
    }

    #[must_use]
    pub fn num_features(&self) -> usize {
        self.side_len() * self.side_len()
    }

    /// Features of the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` is outside the grid.
    #[must_use]
    pub fn features_for_cell(&self, grid: &Grid, row: usize, col: usize) -> Vec<f32> {
        assert!(row < grid.rows() && col < grid.cols(), "cell ({row}, {col}) is off the board");
        let w = self.window_size;
        let mut features = Vec::with_capacity(self.num_features());
        // shifted by w so that offsets stay unsigned
        for r in row..=row + 2 * w {
            for c in col..=col + 2 * w {
                let inside = (w..grid.rows() + w).contains(&r) && (w..grid.cols() + w).contains(&c);
                features.push(if inside {
                    f32::from(grid.get(r - w, c - w))
                } else {
                    self.off_board_value
                });
            }
        }
        features
    }

    /// Features of every cell, in row-major cell order.
    ///
    /// Row `k` equals `features_for_cell(grid, k / cols, k % cols)`. The board
    /// is padded once and each window is copied row by row from the padded
    /// buffer.
    #[must_use]
    pub fn features_for_board(&self, grid: &Grid) -> FeatureMatrix {
        let side = self.side_len();
        let padded = self.pad(grid);
        let padded_cols = grid.cols() + 2 * self.window_size;

        let mut matrix = FeatureMatrix::with_capacity(self.num_features(), grid.len());
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                for dr in 0..side {
                    let start = (row + dr) * padded_cols + col;
                    matrix.data.extend_from_slice(&padded[start..start + side]);
                }
            }
        }
        matrix
    }

    fn pad(&self, grid: &Grid) -> Vec<f32> {
        let w = self.window_size;
        let padded_cols = grid.cols() + 2 * w;
        let padded_rows = grid.rows() + 2 * w;
        let mut padded = vec![self.off_board_value; padded_rows * padded_cols];
        for (row, cells) in grid.iter_rows().enumerate() {
            let start = (row + w) * padded_cols + w;
            for (dst, &cell) in padded[start..start + grid.cols()].iter_mut().zip(cells) {
                *dst = f32::from(cell);
            }
        }
        padded
    }
}

/// Converts labels to the `0.0`/`1.0` encoding used by feature values.
#[must_use]
pub fn labels_as_f32(labels: &[Cell]) -> Vec<f32> {
    labels.iter().map(|&cell| f32::from(cell)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner_board() -> Grid {
        Grid::from_rows(&[[0_u8, 0, 0], [0, 1, 1], [0, 1, 1]]).unwrap()
    }

    fn as_f32(values: &[[i8; 9]]) -> Vec<Vec<f32>> {
        values
            .iter()
            .map(|row| row.iter().map(|&v| f32::from(v)).collect())
            .collect()
    }

    #[test]
    fn test_counts() {
        let extractor = NeighborhoodFeatures::new(2, 0.0);
        assert_eq!(extractor.side_len(), 5);
        assert_eq!(extractor.num_features(), 25);
        assert_eq!(NeighborhoodFeatures::new(0, 0.0).num_features(), 1);
    }

    #[test]
    fn test_cell_boundary_fill() {
        let extractor = NeighborhoodFeatures::new(1, -1.0);
        let board = corner_board();
        assert_eq!(
            extractor.features_for_cell(&board, 0, 0),
            [-1.0, -1.0, -1.0, -1.0, 0.0, 0.0, -1.0, 0.0, 1.0]
        );
        assert_eq!(
            extractor.features_for_cell(&board, 2, 2),
            [1.0, 1.0, -1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0]
        );
    }

    #[test]
    fn test_board_features_literal() {
        let extractor = NeighborhoodFeatures::new(1, -1.0);
        let matrix = extractor.features_for_board(&corner_board());
        let expected = as_f32(&[
            [-1, -1, -1, -1, 0, 0, -1, 0, 1],
            [-1, -1, -1, 0, 0, 0, 0, 1, 1],
            [-1, -1, -1, 0, 0, -1, 1, 1, -1],
            [-1, 0, 0, -1, 0, 1, -1, 0, 1],
            [0, 0, 0, 0, 1, 1, 0, 1, 1],
            [0, 0, -1, 1, 1, -1, 1, 1, -1],
            [-1, 0, 1, -1, 0, 1, -1, -1, -1],
            [0, 1, 1, 0, 1, 1, -1, -1, -1],
            [1, 1, -1, 1, 1, -1, -1, -1, -1],
        ]);
        assert_eq!(matrix.num_rows(), 9);
        assert_eq!(matrix.num_features(), 9);
        for (k, row) in expected.iter().enumerate() {
            assert_eq!(&matrix[k], row.as_slice(), "row {k}");
        }
    }

    #[test]
    fn test_board_matches_cells() {
        let board = Grid::from_rows(&[
            [1_u8, 0, 0, 1, 1],
            [0, 1, 0, 0, 0],
            [1, 1, 1, 0, 1],
            [0, 0, 0, 1, 0],
        ])
        .unwrap();
        for window_size in 0..=3 {
            let extractor = NeighborhoodFeatures::new(window_size, 0.5);
            let matrix = extractor.features_for_board(&board);
            assert_eq!(matrix.num_rows(), board.len());
            for (k, row) in matrix.iter_rows().enumerate() {
                let expected =
                    extractor.features_for_cell(&board, k / board.cols(), k % board.cols());
                assert_eq!(row, expected.as_slice(), "window {window_size}, cell {k}");
            }
        }
    }

    #[test]
    fn test_window_zero_is_the_board() {
        let board = corner_board();
        let matrix = NeighborhoodFeatures::new(0, -1.0).features_for_board(&board);
        assert_eq!(matrix.as_slice(), labels_as_f32(board.cells()).as_slice());
    }

    #[test]
    fn test_input_not_mutated() {
        let board = corner_board();
        let copy = board.clone();
        let _ = NeighborhoodFeatures::default().features_for_board(&board);
        assert_eq!(board, copy);
    }

    #[test]
    fn test_matrix_append() {
        let extractor = NeighborhoodFeatures::default();
        let mut matrix = extractor.features_for_board(&corner_board());
        let other = extractor.features_for_board(&Grid::new_dead(2, 2));
        matrix.append(&other);
        assert_eq!(matrix.num_rows(), 13);
        assert_eq!(matrix.row(12), [0.0; 9]);
    }

    #[test]
    fn test_serialization() {
        let extractor = NeighborhoodFeatures::new(2, -1.0);
        let serialized = serde_json::to_string(&extractor).unwrap();
        assert_eq!(serialized, r#"{"window_size":2,"off_board_value":-1.0}"#);
        let deserialized: NeighborhoodFeatures = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, extractor);
        let defaulted: NeighborhoodFeatures = serde_json::from_str("{}").unwrap();
        assert_eq!(defaulted, NeighborhoodFeatures::default());
    }
}
