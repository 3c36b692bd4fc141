//! dropline-engine - the board: dropping pieces, clearing rows and the
//! stack measurements the evaluator scores.

pub mod apply;
pub mod board;
pub mod collision;
pub mod movegen;
pub mod queue;

pub use apply::{applied, apply_placement};
pub use board::Board;
pub use collision::{collides, landing_row};
pub use movegen::{count_placements, generate_placements};
pub use queue::PieceQueue;
