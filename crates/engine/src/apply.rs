use dropline_core::{GeometryError, Piece, Placement};

use crate::Board;

/// Turn a copy of `piece` to the placement's orientation, drop it at the
/// placement's column and clear full rows. Returns rows cleared.
///
/// On error the board is left untouched.
pub fn apply_placement(
    board: &mut Board,
    piece: &Piece,
    placement: &Placement,
) -> Result<u32, GeometryError> {
    debug_assert_eq!(piece.id(), placement.piece, "placement is for another piece");
    let turned = piece.rotated(placement.rotation);
    board.drop_piece(turned, placement.column)?;
    Ok(board.clear_full_rows())
}

/// Same as [`apply_placement`] on a clone, for callers that keep the original.
pub fn applied(
    board: &Board,
    piece: &Piece,
    placement: &Placement,
) -> Result<(Board, u32), GeometryError> {
    let mut next = board.clone();
    let cleared = apply_placement(&mut next, piece, placement)?;
    Ok((next, cleared))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropline_core::{PieceId, Rotation, ShapeCatalog, ShapeId};

    fn bar(id: u32) -> Piece {
        ShapeCatalog::standard()
            .spawn(ShapeId(1), PieceId(id))
            .expect("standard shape")
    }

    #[test]
    fn test_apply_clears_row() {
        let mut board = Board::new(4).expect("width");
        let piece = bar(0);
        let placement = Placement::for_piece(&piece, Rotation::Deg90, 0);
        assert_eq!(apply_placement(&mut board, &piece, &placement), Ok(1));
        assert!(board.is_empty());
    }

    #[test]
    fn test_applied_leaves_original() {
        let board = Board::new(6).expect("width");
        let piece = bar(0);
        let placement = Placement::for_piece(&piece, Rotation::Deg0, 5);
        let (next, cleared) = applied(&board, &piece, &placement).expect("fits");
        assert_eq!(cleared, 0);
        assert_eq!(next.height(), 4);
        assert!(board.is_empty());
        // the queued piece itself keeps its orientation
        assert_eq!(piece.rotation(), Rotation::Deg0);
    }

    #[test]
    fn test_apply_out_of_bounds_is_untouched() {
        let mut board = Board::new(6).expect("width");
        let piece = bar(0);
        let placement = Placement::for_piece(&piece, Rotation::Deg90, 3);
        assert!(matches!(
            apply_placement(&mut board, &piece, &placement),
            Err(GeometryError::OutOfBounds { .. })
        ));
        assert!(board.is_empty());
    }
}
