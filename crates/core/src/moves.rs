//! Placement record - the externally visible decision for one piece.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Piece, PieceId, Rotation, ShapeId};

/// Where one queued piece goes: orientation plus left column.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub shape: ShapeId,
    pub piece: PieceId,
    pub rotation: Rotation,
    pub column: u32,
}

impl Placement {
    pub fn new(shape: ShapeId, piece: PieceId, rotation: Rotation, column: u32) -> Self {
        Self {
            shape,
            piece,
            rotation,
            column,
        }
    }

    pub fn for_piece(piece: &Piece, rotation: Rotation, column: u32) -> Self {
        Self::new(piece.shape(), piece.id(), rotation, column)
    }
}

/// `shape orientation column`, the line format of the solver output.
impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.shape, self.rotation.index(), self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_line_format() {
        let p = Placement::new(ShapeId(5), PieceId(0), Rotation::Deg270, 4);
        assert_eq!(p.to_string(), "5 3 4");
    }

    #[test]
    fn test_placement_for_piece() {
        let piece = crate::ShapeCatalog::standard()
            .spawn(ShapeId(3), PieceId(9))
            .expect("standard shape");
        let p = Placement::for_piece(&piece, Rotation::Deg90, 2);
        assert_eq!(p.shape, ShapeId(3));
        assert_eq!(p.piece, PieceId(9));
        assert_eq!(p.column, 2);
    }
}
