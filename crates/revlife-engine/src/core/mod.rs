pub use self::{grid::*, symmetry::*, tile::*};

pub(crate) mod grid;
pub(crate) mod symmetry;
pub(crate) mod tile;
