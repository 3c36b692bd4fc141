//! collision detection - floor and other pieces

use dropline_core::{Piece, Row};

/// does the piece share area with the stack where it is anchored now?
/// Touching edges or corners is not a collision.
#[inline(always)]
pub fn collides(occupancy: &[Row], piece: &Piece) -> bool {
    piece.intersects(occupancy)
}

/// lowest row the piece reaches falling straight down from its current bottom
#[inline]
pub fn landing_row(occupancy: &[Row], piece: &Piece) -> i32 {
    let mut lowered = piece.clone();
    let mut row = piece.bottom();
    while row > 0 {
        lowered.move_to(piece.left(), row - 1);
        if collides(occupancy, &lowered) {
            break;
        }
        row -= 1;
    }
    row
}
