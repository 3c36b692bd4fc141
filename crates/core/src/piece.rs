//! Piece instances, their orientation, anchor and row splitting.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::lattice::{Footprint, Row, QUARTER_AREA};
use crate::{GeometryError, ShapeId, ShapeTemplate};

/// Identity of one queued piece, stable through search and commit.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Orientation in quarter turns counter-clockwise from the template.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    pub fn index(self) -> u8 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 1,
            Self::Deg180 => 2,
            Self::Deg270 => 3,
        }
    }

    pub fn from_index(index: u8) -> Result<Self, GeometryError> {
        match index {
            0 => Ok(Self::Deg0),
            1 => Ok(Self::Deg90),
            2 => Ok(Self::Deg180),
            3 => Ok(Self::Deg270),
            other => Err(GeometryError::InvalidOrientation(other)),
        }
    }

    /// Quarter turns counter-clockwise needed to get from `self` to `target`.
    pub fn turns_to(self, target: Rotation) -> u32 {
        (target.index() as u32 + 4 - self.index() as u32) % 4
    }
}

impl TryFrom<u8> for Rotation {
    type Error = GeometryError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value)
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> u8 {
        rotation.index()
    }
}

/// What a row removal did to one piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SplitOutcome {
    /// The band is above the piece.
    Untouched,
    /// The piece sits wholly above the band and moved down one unit.
    Lowered,
    /// The band crossed the piece; the part above it moved down onto the rest.
    Cut,
    /// Nothing of the piece is left.
    Removed,
}

/// A queued or placed instance of a shape.
///
/// `left`/`bottom` is the bounding-box minimum of the derived footprint.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Piece {
    shape: ShapeId,
    id: PieceId,
    rotation: Rotation,
    left: i32,
    bottom: i32,
    footprint: Footprint,
    rotations: SmallVec<[Rotation; 4]>,
}

impl Piece {
    pub fn new(template: &ShapeTemplate, id: PieceId) -> Self {
        Self {
            shape: template.id(),
            id,
            rotation: Rotation::Deg0,
            left: 0,
            bottom: 0,
            footprint: template.footprint().clone(),
            rotations: SmallVec::from_slice(template.rotations()),
        }
    }

    #[inline(always)]
    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    #[inline(always)]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[inline(always)]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[inline(always)]
    pub fn left(&self) -> i32 {
        self.left
    }

    #[inline(always)]
    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.footprint.width()
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.footprint.height()
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// Orientations of the shape that differ from each other, 0 first.
    pub fn distinct_rotations(&self) -> &[Rotation] {
        &self.rotations
    }

    /// Rotate to an absolute orientation given as 0..=3.
    pub fn rotate(&mut self, orientation: u8) -> Result<(), GeometryError> {
        self.set_rotation(Rotation::from_index(orientation)?);
        Ok(())
    }

    /// Turn the current footprint by the delta to `rotation`; the anchor stays put.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        let turns = self.rotation.turns_to(rotation);
        if turns != 0 {
            self.footprint = self.footprint.rotated(turns);
        }
        self.rotation = rotation;
    }

    pub fn rotated(&self, rotation: Rotation) -> Self {
        let mut piece = self.clone();
        piece.set_rotation(rotation);
        piece
    }

    pub fn move_to(&mut self, left: i32, bottom: i32) {
        self.left = left;
        self.bottom = bottom;
    }

    /// Footprint row `index` shifted to board columns. Requires `left >= 0`.
    #[inline]
    pub fn board_row(&self, index: usize) -> Row {
        debug_assert!(self.left >= 0, "piece is left of the board");
        self.footprint.rows()[index] << (4 * self.left as u32)
    }

    /// Board rows covered by this piece, bottom first, with their bits.
    pub fn board_rows(&self) -> impl Iterator<Item = (i32, Row)> + '_ {
        (0..self.footprint.height() as usize)
            .map(move |i| (self.bottom + i as i32, self.board_row(i)))
    }

    /// True iff the piece overlaps `occupancy` with non-zero area.
    /// Rows below the floor or above the slice count as empty.
    pub fn intersects(&self, occupancy: &[Row]) -> bool {
        self.board_rows().any(|(y, bits)| {
            y >= 0
                && occupancy
                    .get(y as usize)
                    .is_some_and(|&row| row & bits != 0)
        })
    }

    /// Overlap area with another piece, wherever both are anchored.
    pub fn overlap_area(&self, other: &Piece) -> f64 {
        let shift = self.left - other.left;
        let mut quarters = 0u32;
        for (i, &row) in self.footprint.rows().iter().enumerate() {
            let y = self.bottom + i as i32 - other.bottom;
            if y < 0 || y >= other.height() as i32 {
                continue;
            }
            let theirs = other.footprint.rows()[y as usize];
            let overlap = if shift >= 0 {
                row.checked_shl(4 * shift as u32).unwrap_or(0) & theirs
            } else {
                row & theirs.checked_shl(4 * (-shift) as u32).unwrap_or(0)
            };
            quarters += overlap.count_ones();
        }
        quarters as f64 * QUARTER_AREA
    }

    pub fn area(&self) -> f64 {
        self.footprint.area()
    }

    /// Height of the area centroid in board coordinates.
    pub fn centroid_y(&self) -> f64 {
        let quarters = self.footprint.quarters() as i64;
        if quarters == 0 {
            return self.bottom as f64;
        }
        let sixths = self.footprint.centroid_sixths() + 6 * self.bottom as i64 * quarters;
        sixths as f64 / (6 * quarters) as f64
    }

    /// Remove the unit band at board row `row`.
    pub fn split(&mut self, row: i32) -> SplitOutcome {
        if row >= self.bottom + self.height() as i32 {
            return SplitOutcome::Untouched;
        }
        if row < self.bottom {
            self.bottom -= 1;
            return SplitOutcome::Lowered;
        }

        match self.footprint.without_row((row - self.bottom) as usize) {
            Some((rest, dx, dy)) => {
                self.footprint = rest;
                self.left += dx as i32;
                self.bottom += dy as i32;
                SplitOutcome::Cut
            }
            None => SplitOutcome::Removed,
        }
    }
}
