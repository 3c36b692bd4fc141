use thiserror::Error;

use crate::{PieceId, ShapeId};

/// Geometry and construction failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("unknown shape {0}")]
    UnknownShape(ShapeId),

    #[error("orientation {0} is not one of 0, 1, 2, 3")]
    InvalidOrientation(u8),

    #[error("piece of width {width} at column {column} does not fit a board {board_width} wide")]
    OutOfBounds {
        column: u32,
        width: u32,
        board_width: u32,
    },

    #[error("piece identity {0} is queued more than once")]
    DuplicateIdentity(PieceId),

    #[error("board width {0} is outside 1..=32")]
    InvalidWidth(u32),

    #[error("edge {from:?} -> {to:?} is neither axis-aligned nor diagonal")]
    UnsupportedEdge { from: (i32, i32), to: (i32, i32) },

    #[error("polygon encloses no area")]
    DegeneratePolygon,

    #[error("polygon intersects itself")]
    NonSimplePolygon,

    #[error("shape extent {0} exceeds 32 units")]
    ShapeTooLarge(u32),
}
