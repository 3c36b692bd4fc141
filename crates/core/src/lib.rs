//! dropline core crate - shapes, pieces and the quarter-cell lattice they are drawn on.

mod error;
pub mod lattice;
mod moves;
mod piece;
mod shapes;

pub use error::GeometryError;
pub use lattice::{Footprint, Row, MAX_WIDTH, QUARTER_AREA};
pub use moves::Placement;
pub use piece::{Piece, PieceId, Rotation, SplitOutcome};
pub use shapes::{ShapeCatalog, ShapeId, ShapeSpec, ShapeTemplate};
