//! dropline eval crate - move statistics and the weighted cost of a placement.

use dropline_core::{GeometryError, Piece, Placement, Rotation};
use dropline_engine::Board;
use serde::{Deserialize, Serialize};

/// Linear weights over [`MoveStats`]. Lower cost is better.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// area added above the previous height
    pub area: f64,
    /// height of the added area's centroid above the previous height
    pub area_centroid: f64,
    pub rows_removed: f64,
    pub height: f64,
    pub gaps: f64,
    /// height of the placed piece's own centroid
    pub piece_centroid: f64,
    /// added to every cost so ordinary costs stay non-negative
    pub offset: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            area: 1.0,
            area_centroid: 1.0,
            rows_removed: -20.0,
            height: 10.0,
            gaps: 5.0,
            piece_centroid: 1.0,
            offset: 100.0,
        }
    }
}

/// What one placement did to the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveStats {
    pub area_added: f64,
    pub area_centroid: f64,
    pub rows_removed: u32,
    pub height_delta: f64,
    pub gap_delta: f64,
    pub piece_centroid: f64,
}

impl MoveStats {
    /// Weighted sum plus offset, floored at zero: a path's cumulative cost
    /// never decreases, however deep the clear.
    pub fn cost(&self, weights: &EvalWeights) -> f64 {
        let mut cost = 0.0;
        cost += weights.area * self.area_added;
        cost += weights.area_centroid * self.area_centroid;
        cost += weights.rows_removed * self.rows_removed as f64;
        cost += weights.height * self.height_delta;
        cost += weights.gaps * self.gap_delta;
        cost += weights.piece_centroid * self.piece_centroid;
        (cost + weights.offset).max(0.0)
    }
}

/// A scored hypothetical placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub placement: Placement,
    pub stats: MoveStats,
    pub cost: f64,
}

/// A scored move together with the board it produces.
#[derive(Clone, Debug)]
pub struct Evaluation {
    pub mv: Move,
    pub board: Board,
}

/// Simulate `piece` turned to `rotation` and dropped at `column` on a private
/// copy of `board`, then score it. `board` is never touched.
///
/// Added area is measured before rows are cleared; height and gaps after.
pub fn evaluate(
    board: &Board,
    piece: &Piece,
    rotation: Rotation,
    column: u32,
    weights: &EvalWeights,
) -> Result<Evaluation, GeometryError> {
    let mut next = board.clone();
    let height_before = next.height();
    let gaps_before = next.count_gaps();

    let piece_centroid = next
        .drop_piece(piece.rotated(rotation), column)?
        .centroid_y();
    let (area_centroid, area_added) = next.area_and_centroid_above(height_before);
    let rows_removed = next.clear_full_rows();

    let stats = MoveStats {
        area_added,
        area_centroid,
        rows_removed,
        height_delta: next.height() as f64 - height_before as f64,
        gap_delta: next.count_gaps() - gaps_before,
        piece_centroid,
    };
    let mv = Move {
        placement: Placement::for_piece(piece, rotation, column),
        cost: stats.cost(weights),
        stats,
    };
    Ok(Evaluation { mv, board: next })
}

/// Every placement of `piece`, scored and stably sorted by ascending cost.
pub fn evaluate_all(board: &Board, piece: &Piece, weights: &EvalWeights) -> Vec<Evaluation> {
    let mut evaluations: Vec<Evaluation> = dropline_engine::generate_placements(board, piece)
        .into_iter()
        .filter_map(|p| match evaluate(board, piece, p.rotation, p.column, weights) {
            Err(GeometryError::OutOfBounds { .. }) => None,
            result => result.ok(),
        })
        .collect();
    evaluations.sort_by(|a, b| a.mv.cost.total_cmp(&b.mv.cost));
    evaluations
}
