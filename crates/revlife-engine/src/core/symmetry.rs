use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{InvalidSymmetryError, core::grid::Grid};

/// One of the eight symmetries of the square.
///
/// Indices 0-3 rotate clockwise by `90° × index`; indices 4-7 flip the board
/// left-right first and then rotate clockwise by `90° × (index - 4)`.
///
/// Rotations by 90° or 270° swap the row and column extents, so symmetry
/// composition is only shape-preserving on square boards.
///
/// # Example
///
/// ```
/// use revlife_engine::{Grid, Symmetry};
///
/// let grid: Grid = "
///     10
///     00
/// ".parse().unwrap();
///
/// let rotated = Symmetry::Rotate90.apply(&grid);
/// assert_eq!(rotated.render(), "01\n00");
/// assert_eq!(Symmetry::Rotate90.inverse().apply(&rotated), grid);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "usize", into = "usize")]
#[repr(u8)]
pub enum Symmetry {
    #[default]
    Identity = 0,
    Rotate90 = 1,
    Rotate180 = 2,
    Rotate270 = 3,
    Mirror = 4,
    MirrorRotate90 = 5,
    MirrorRotate180 = 6,
    MirrorRotate270 = 7,
}

impl Symmetry {
    pub const LEN: usize = 8;

    pub const ALL: [Self; Self::LEN] = [
        Self::Identity,
        Self::Rotate90,
        Self::Rotate180,
        Self::Rotate270,
        Self::Mirror,
        Self::MirrorRotate90,
        Self::MirrorRotate180,
        Self::MirrorRotate270,
    ];

    /// Looks up a symmetry by index, rejecting anything outside `0..8`.
    pub fn from_index(index: usize) -> Result<Self, InvalidSymmetryError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(InvalidSymmetryError { index })
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the left-right flip is applied before rotating.
    #[must_use]
    pub const fn is_mirrored(self) -> bool {
        self.index() >= 4
    }

    /// Number of clockwise quarter turns applied after the optional flip.
    #[must_use]
    pub const fn quarter_turns(self) -> usize {
        self.index() % 4
    }

    /// Returns the symmetry that undoes `self`.
    ///
    /// The two odd rotations undo each other; every other symmetry is its own
    /// inverse.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Rotate90 => Self::Rotate270,
            Self::Rotate270 => Self::Rotate90,
            other => other,
        }
    }

    /// Shape of a `rows`x`cols` plane after applying `self`.
    #[must_use]
    pub const fn output_shape(self, rows: usize, cols: usize) -> (usize, usize) {
        if self.quarter_turns().is_multiple_of(2) {
            (rows, cols)
        } else {
            (cols, rows)
        }
    }

    /// Applies the symmetry to a grid, returning a new grid.
    #[must_use]
    pub fn apply(self, grid: &Grid) -> Grid {
        let (rows, cols) = self.output_shape(grid.rows(), grid.cols());
        let cells = self.apply_plane(grid.cells(), grid.rows(), grid.cols());
        match Grid::from_cells(rows, cols, cells) {
            Ok(grid) => grid,
            Err(_) => unreachable!("symmetries preserve the cell count"),
        }
    }

    /// Applies the symmetry to any row-major `rows`x`cols` plane.
    ///
    /// Used to move per-cell values (such as vote counts or probabilities)
    /// between a board and its transformed image. The result has the shape
    /// given by [`Self::output_shape`].
    ///
    /// # Panics
    ///
    /// Panics if `plane.len() != rows * cols`.
    #[must_use]
    pub fn apply_plane<T>(self, plane: &[T], rows: usize, cols: usize) -> Vec<T>
    where
        T: Copy,
    {
        assert_eq!(
            plane.len(),
            rows * cols,
            "plane does not match {rows}x{cols}"
        );
        let mut data = if self.is_mirrored() {
            mirror(plane, rows, cols)
        } else {
            plane.to_vec()
        };
        let (mut rows, mut cols) = (rows, cols);
        for _ in 0..self.quarter_turns() {
            data = rotate_clockwise(&data, rows, cols);
            (rows, cols) = (cols, rows);
        }
        data
    }

    /// All eight images of `grid`, indexed like [`Self::ALL`].
    #[must_use]
    pub fn orbit(grid: &Grid) -> ArrayVec<Grid, { Symmetry::LEN }> {
        Self::ALL.iter().map(|sym| sym.apply(grid)).collect()
    }
}

impl Grid {
    /// Shorthand for [`Symmetry::apply`].
    #[must_use]
    pub fn transformed(&self, sym: Symmetry) -> Self {
        sym.apply(self)
    }
}

impl TryFrom<usize> for Symmetry {
    type Error = InvalidSymmetryError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index)
    }
}

impl From<Symmetry> for usize {
    fn from(sym: Symmetry) -> Self {
        sym.index()
    }
}

/// Applies the symmetry with the given index.
pub fn transform(grid: &Grid, index: usize) -> Result<Grid, InvalidSymmetryError> {
    Ok(Symmetry::from_index(index)?.apply(grid))
}

/// Index of the symmetry undoing the symmetry with the given index.
pub fn inverse_transform(index: usize) -> Result<usize, InvalidSymmetryError> {
    Ok(Symmetry::from_index(index)?.inverse().index())
}

fn mirror<T>(plane: &[T], rows: usize, cols: usize) -> Vec<T>
where
    T: Copy,
{
    let mut out = Vec::with_capacity(rows * cols);
    for row in plane.chunks_exact(cols) {
        out.extend(row.iter().rev());
    }
    out
}

// out[i][j] = in[rows - 1 - j][i], output is cols x rows
fn rotate_clockwise<T>(plane: &[T], rows: usize, cols: usize) -> Vec<T>
where
    T: Copy,
{
    let mut out = Vec::with_capacity(rows * cols);
    for i in 0..cols {
        for j in 0..rows {
            out.push(plane[(rows - 1 - j) * cols + i]);
        }
    }
    out
}
