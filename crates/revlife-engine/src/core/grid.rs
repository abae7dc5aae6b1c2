use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::GridShapeError;

/// State of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::IsVariant)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl Cell {
    #[must_use]
    pub const fn from_bool(alive: bool) -> Self {
        if alive { Cell::Alive } else { Cell::Dead }
    }

    /// Converts a `0`/`1` value, returning `None` for anything else.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Cell::Dead),
            1 => Some(Cell::Alive),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Dead => '0',
            Cell::Alive => '1',
        }
    }

    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            '0' => Some(Cell::Dead),
            '1' => Some(Cell::Alive),
            _ => None,
        }
    }

    /// Next state under the B3/S23 rule.
    #[inline]
    #[must_use]
    pub const fn next(self, live_neighbors: u8) -> Self {
        match (self, live_neighbors) {
            (Cell::Dead, 3) | (Cell::Alive, 2 | 3) => Cell::Alive,
            _ => Cell::Dead,
        }
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        cell.as_u8()
    }
}

impl From<Cell> for f32 {
    fn from(cell: Cell) -> Self {
        f32::from(cell.as_u8())
    }
}

/// Fixed-size board of dead and alive cells.
///
/// Cells are stored row-major. The dimensions are fixed at construction;
/// [`Self::advance`] rewrites the contents in place.
///
/// A `Grid` owns its storage, so clones never alias: advancing one copy leaves
/// every other copy untouched.
///
/// # Text format
///
/// [`Self::render`] and [`FromStr`] use one line per row and one `0`/`1`
/// character per cell:
///
/// ```
/// use revlife_engine::Grid;
///
/// let mut grid: Grid = "
///     000
///     111
///     000
/// ".parse().unwrap();
///
/// grid.advance();
/// assert_eq!(grid.render(), "010\n010\n010");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an all-dead grid.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or the cell count overflows.
    #[must_use]
    pub fn new_dead(rows: usize, cols: usize) -> Self {
        let len = match Self::cell_count(rows, cols) {
            Ok(len) => len,
            Err(err) => panic!("cannot create a dead grid: {err}"),
        };
        Self {
            rows,
            cols,
            cells: vec![Cell::Dead; len],
        }
    }

    /// Number of cells in a `rows`x`cols` grid.
    ///
    /// Fails if either dimension is zero or the product overflows `usize`.
    pub fn cell_count(rows: usize, cols: usize) -> Result<usize, GridShapeError> {
        if rows == 0 || cols == 0 {
            return Err(GridShapeError::EmptyDimension { rows, cols });
        }
        rows.checked_mul(cols)
            .ok_or(GridShapeError::TooLarge { rows, cols })
    }

    /// Creates a grid from row-major cells.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Result<Self, GridShapeError> {
        let expected = Self::cell_count(rows, cols)?;
        if cells.len() != expected {
            return Err(GridShapeError::CellCount {
                rows,
                cols,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    /// Creates a grid from flattened row-major `0`/`1` values.
    ///
    /// The values are copied; the caller's buffer is never shared.
    pub fn from_flat(rows: usize, cols: usize, values: &[u8]) -> Result<Self, GridShapeError> {
        let cells = values
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                Cell::from_u8(value).ok_or(GridShapeError::InvalidCell { index, value })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_cells(rows, cols, cells)
    }

    /// Creates a grid from nested rows of `0`/`1` values.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, GridShapeError>
    where
        R: AsRef<[u8]>,
    {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        let mut values = Vec::with_capacity(rows.len() * cols);
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != cols {
                return Err(GridShapeError::RaggedRow {
                    row,
                    expected: cols,
                    actual: cells.len(),
                });
            }
            values.extend_from_slice(cells);
        }
        Self::from_flat(rows.len(), cols, &values)
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of cells (`rows * cols`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; grids have positive dimensions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) is outside a {}x{} grid",
            self.rows,
            self.cols
        );
        self.cells[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) is outside a {}x{} grid",
            self.rows,
            self.cols
        );
        self.cells[row * self.cols + col] = cell;
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.cols..][..self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(self.cols)
    }

    /// Number of alive cells.
    #[must_use]
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    #[must_use]
    pub fn is_all_dead(&self) -> bool {
        self.cells.iter().all(Cell::is_dead)
    }

    /// Flattened row-major `0`/`1` values.
    #[must_use]
    pub fn to_flat(&self) -> Vec<u8> {
        self.cells.iter().map(|cell| cell.as_u8()).collect()
    }

    /// Copies the `rows`x`cols` block whose top-left corner is `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the block is empty or extends past the grid.
    #[must_use]
    pub fn sub_grid(&self, row: usize, col: usize, rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "sub-grid dimensions must be positive");
        assert!(
            row + rows <= self.rows && col + cols <= self.cols,
            "{rows}x{cols} block at ({row}, {col}) extends past a {}x{} grid",
            self.rows,
            self.cols
        );
        let mut cells = Vec::with_capacity(rows * cols);
        for r in row..row + rows {
            cells.extend_from_slice(&self.row(r)[col..][..cols]);
        }
        Self { rows, cols, cells }
    }

    /// Advances the board by one step.
    ///
    /// Positions outside the board count as dead; the edges never wrap.
    /// Every cell is updated from the neighbor counts taken before the step.
    pub fn advance(&mut self) {
        // all-dead boards are a fixed point
        if self.is_all_dead() {
            return;
        }
        let census = self.live_neighbor_counts();
        for (cell, &count) in self.cells.iter_mut().zip(&census) {
            *cell = cell.next(count);
        }
    }

    /// Advances the board by `steps` steps.
    pub fn advance_by(&mut self, steps: usize) {
        for _ in 0..steps {
            if self.is_all_dead() {
                break;
            }
            self.advance();
        }
    }

    /// Counts live neighbors of every cell by scattering each live cell into
    /// its 3x3 neighborhood.
    fn live_neighbor_counts(&self) -> Vec<u8> {
        let mut census = vec![0_u8; self.cells.len()];
        for (index, cell) in self.cells.iter().enumerate() {
            if cell.is_dead() {
                continue;
            }
            let (row, col) = (index / self.cols, index % self.cols);
            let row_range = row.saturating_sub(1)..=(row + 1).min(self.rows - 1);
            for r in row_range {
                let col_range = col.saturating_sub(1)..=(col + 1).min(self.cols - 1);
                for c in col_range {
                    if (r, c) != (row, col) {
                        census[r * self.cols + c] += 1;
                    }
                }
            }
        }
        census
    }

    /// Renders the board as `0`/`1` lines without a trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        for (i, row) in self.iter_rows().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.extend(row.iter().map(|cell| cell.as_char()));
        }
        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for Grid {
    type Err = GridShapeError;

    /// Parses the [`Grid::render`] format. Blank lines and surrounding
    /// whitespace are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        for (row, line) in s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
        {
            let cells = line
                .chars()
                .enumerate()
                .map(|(col, ch)| {
                    Cell::from_char(ch)
                        .map(Cell::as_u8)
                        .ok_or(GridShapeError::InvalidChar { row, col, ch })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }
        Self::from_rows(rows.as_slice())
    }
}

#[derive(Serialize, Deserialize)]
struct GridRepr {
    rows: usize,
    cols: usize,
    cells: String,
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: {"rows":3,"cols":3,"cells":"010010010"}
        GridRepr {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(|cell| cell.as_char()).collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = GridRepr::deserialize(deserializer)?;
        let cells = repr
            .cells
            .chars()
            .enumerate()
            .map(|(i, ch)| {
                Cell::from_char(ch).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid cell {ch:?} at index {i}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_cells(repr.rows, repr.cols, cells).map_err(serde::de::Error::custom)
    }
}
