use std::{fmt, str::FromStr};

use num_bigint::{BigUint, ParseBigIntError};
use serde::{Deserialize, Serialize};

use crate::{
    DecodeTileError,
    core::grid::{Cell, Grid},
};

/// Bit-packed identifier of a grid.
///
/// Bit `i` is set iff the `i`-th cell in row-major order is alive. The value
/// is arbitrary precision, so a 20x20 board (400 bits) encodes without
/// truncation. Encoding and decoding are mutual inverses for a fixed shape.
///
/// # Example
///
/// ```
/// use revlife_engine::{Grid, TileId};
///
/// let tile: Grid = "
///     10
///     01
/// ".parse().unwrap();
///
/// let id = TileId::encode(&tile);
/// assert_eq!(id, TileId::from(0b1001_u64));
/// assert_eq!(id.decode(2, 2).unwrap(), tile);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TileId(BigUint);

impl TileId {
    /// Encodes the cells of `grid` in row-major order.
    #[must_use]
    pub fn encode(grid: &Grid) -> Self {
        let mut value = BigUint::ZERO;
        for (bit, cell) in grid.cells().iter().enumerate() {
            if cell.is_alive() {
                value.set_bit(bit as u64, true);
            }
        }
        Self(value)
    }

    /// Decodes into a `rows`x`cols` grid.
    ///
    /// Fails if the value has bits set beyond `rows * cols`.
    pub fn decode(&self, rows: usize, cols: usize) -> Result<Grid, DecodeTileError> {
        let capacity = Grid::cell_count(rows, cols)
            .map_err(DecodeTileError::Shape)?;
        let bits = self.0.bits();
        if bits > capacity as u64 {
            return Err(DecodeTileError::TooManyBits {
                bits,
                rows,
                cols,
                capacity,
            });
        }
        let cells = (0..capacity as u64)
            .map(|bit| Cell::from_bool(self.0.bit(bit)))
            .collect();
        Grid::from_cells(rows, cols, cells).map_err(DecodeTileError::Shape)
    }

    /// Number of significant bits (zero for the all-dead tile).
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.0.bits()
    }

    #[must_use]
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    #[must_use]
    pub fn into_biguint(self) -> BigUint {
        self.0
    }
}

impl From<BigUint> for TileId {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<u64> for TileId {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TileId {
    type Err = ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl Serialize for TileId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // decimal string; JSON numbers cannot hold 400-bit values
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TileId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid tile id: {s} ({e})")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_row_major_bits() {
        let g: Grid = "
            100
            010
            001
        "
        .parse()
        .unwrap();
        // bits 0, 4 and 8
        assert_eq!(TileId::encode(&g), TileId::from(0b1_0001_0001_u64));
        assert_eq!(TileId::encode(&Grid::new_dead(4, 4)), TileId::default());
    }

    #[test]
    fn test_roundtrip_all_3x3() {
        for value in 0_u64..512 {
            let id = TileId::from(value);
            let g = id.decode(3, 3).unwrap();
            assert_eq!(TileId::encode(&g), id);
            assert_eq!(TileId::encode(&g).decode(3, 3).unwrap(), g);
        }
    }

    #[test]
    fn test_roundtrip_sparse_20x20() {
        let mut g = Grid::new_dead(20, 20);
        for (row, col) in [(0, 0), (3, 17), (10, 10), (19, 0), (19, 19)] {
            g.set(row, col, Cell::Alive);
        }
        let id = TileId::encode(&g);
        // the last cell sets bit 399, far beyond u64
        assert_eq!(id.bits(), 400);
        assert_eq!(id.decode(20, 20).unwrap(), g);
    }

    #[test]
    fn test_decode_too_many_bits() {
        let id = TileId::from(0b1_0000_u64);
        assert_eq!(
            id.decode(2, 2),
            Err(DecodeTileError::TooManyBits {
                bits: 5,
                rows: 2,
                cols: 2,
                capacity: 4
            })
        );
        assert!(id.decode(1, 5).is_ok());
        assert!(id.decode(0, 5).unwrap_err().kind().is_invalid_argument());
    }

    #[test]
    fn test_display_and_parse() {
        let id = TileId::from(BigUint::from(1_u8) << 130_u32);
        let s = id.to_string();
        assert_eq!(s, "1361129467683753853853498429727072845824");
        assert_eq!(s.parse::<TileId>().unwrap(), id);
        assert!("12a".parse::<TileId>().is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut g = Grid::new_dead(10, 10);
        g.set(9, 9, Cell::Alive);
        let id = TileId::encode(&g);
        let serialized = serde_json::to_string(&id).unwrap();
        assert_eq!(serialized, format!("\"{id}\""));
        let deserialized: TileId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, id);
    }
}
