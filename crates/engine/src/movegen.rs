//! Placement generation for one piece on a board.

use dropline_core::{Piece, Placement};

use crate::Board;

/// Every in-bounds placement: distinct rotations in order, then columns
/// left to right. The order is the tie-break order for equal costs.
pub fn generate_placements(board: &Board, piece: &Piece) -> Vec<Placement> {
    let mut placements = Vec::with_capacity(count_placements(board, piece));
    for &rotation in piece.distinct_rotations() {
        let width = piece.rotated(rotation).width();
        if width > board.width() {
            continue;
        }
        for column in 0..=board.width() - width {
            placements.push(Placement::for_piece(piece, rotation, column));
        }
    }
    placements
}

/// Number of placements without building them.
pub fn count_placements(board: &Board, piece: &Piece) -> usize {
    piece
        .distinct_rotations()
        .iter()
        .map(|&rotation| {
            let width = piece.rotated(rotation).width();
            (board.width() + 1).saturating_sub(width) as usize
        })
        .sum()
}
