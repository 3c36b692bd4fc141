//! board - placed pieces plus their merged occupancy on the quarter-cell lattice
//! height is always the number of occupancy rows up to the highest non-empty one

use std::fmt;

use log::trace;

use dropline_core::lattice::{cell_mask, full_row, row_centroid_sixths};
use dropline_core::{GeometryError, Piece, Row, SplitOutcome, MAX_WIDTH, QUARTER_AREA};

use crate::collision::landing_row;

/// Fixed-width stack of placed pieces. Row 0 is the floor.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    width: u32,
    pieces: Vec<Piece>,
    occupancy: Vec<Row>,
}

impl Board {
    pub fn new(width: u32) -> Result<Self, GeometryError> {
        if width == 0 || width > MAX_WIDTH {
            return Err(GeometryError::InvalidWidth(width));
        }
        Ok(Self {
            width,
            pieces: Vec::new(),
            occupancy: Vec::new(),
        })
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.occupancy.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy.is_empty()
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Merged occupancy, one row per unit of height.
    pub fn occupancy(&self) -> &[Row] {
        &self.occupancy
    }

    /// Quarter bits of one cell (0..=0xF).
    pub fn cell(&self, x: u32, y: u32) -> u8 {
        if x >= self.width {
            return 0;
        }
        self.occupancy
            .get(y as usize)
            .map_or(0, |&row| ((row >> (4 * x)) & 0xF) as u8)
    }

    pub fn filled_area(&self) -> f64 {
        self.occupancy.iter().map(|r| r.count_ones()).sum::<u32>() as f64 * QUARTER_AREA
    }

    /// Let `piece` fall in at `column` from the current height until it rests
    /// on the first obstruction or the floor. Returns the placed piece.
    pub fn drop_piece(&mut self, mut piece: Piece, column: u32) -> Result<&Piece, GeometryError> {
        if column + piece.width() > self.width {
            return Err(GeometryError::OutOfBounds {
                column,
                width: piece.width(),
                board_width: self.width,
            });
        }

        piece.move_to(column as i32, self.height() as i32);
        let row = landing_row(&self.occupancy, &piece);
        piece.move_to(column as i32, row);
        debug_assert!(!piece.intersects(&self.occupancy), "landed inside the stack");

        let top = (row as u32 + piece.height()) as usize;
        if self.occupancy.len() < top {
            self.occupancy.resize(top, 0);
        }
        for (y, bits) in piece.board_rows() {
            self.occupancy[y as usize] |= bits;
        }
        self.pieces.push(piece);
        Ok(&self.pieces[self.pieces.len() - 1])
    }

    /// The unit band at `row` is completely covered.
    pub fn row_is_full(&self, row: u32) -> bool {
        let full = full_row(self.width);
        self.occupancy
            .get(row as usize)
            .is_some_and(|&bits| bits & full == full)
    }

    /// Remove every full row, top-down so lower indices stay valid.
    /// Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> u32 {
        let full: Vec<u32> = (0..self.height()).filter(|&r| self.row_is_full(r)).collect();
        if full.is_empty() {
            return 0;
        }

        for &row in full.iter().rev() {
            self.pieces
                .retain_mut(|piece| piece.split(row as i32) != SplitOutcome::Removed);
        }
        self.rebuild_occupancy();
        trace!("cleared rows {:?}, height now {}", full, self.height());
        full.len() as u32
    }

    /// Uncovered area below the topmost occupied cell of each column.
    pub fn count_gaps(&self) -> f64 {
        let mut quarters = 0u32;
        for x in 0..self.width {
            let mask = cell_mask(x);
            if let Some(top) = self.occupancy.iter().rposition(|row| row & mask != 0) {
                quarters += self.occupancy[..top]
                    .iter()
                    .map(|row| 4 - (row & mask).count_ones())
                    .sum::<u32>();
            }
        }
        quarters as f64 * QUARTER_AREA
    }

    /// `(centroid height above line, area)` of the occupancy above `line`,
    /// or `(0, 0)` when there is none.
    pub fn area_and_centroid_above(&self, line: u32) -> (f64, f64) {
        let rows = self.occupancy.get(line as usize..).unwrap_or(&[]);
        let (quarters, sixths) = rows
            .iter()
            .enumerate()
            .fold((0i64, 0i64), |(quarters, sixths), (dy, &row)| {
                let count = row.count_ones() as i64;
                (
                    quarters + count,
                    sixths + 6 * dy as i64 * count + row_centroid_sixths(row),
                )
            });
        if quarters == 0 {
            return (0.0, 0.0);
        }
        (
            sixths as f64 / (6 * quarters) as f64,
            quarters as f64 * QUARTER_AREA,
        )
    }

    fn rebuild_occupancy(&mut self) {
        self.occupancy.clear();
        for piece in &self.pieces {
            for (y, bits) in piece.board_rows() {
                let y = y as usize;
                if self.occupancy.len() <= y {
                    self.occupancy.resize(y + 1, 0);
                }
                self.occupancy[y] |= bits;
            }
        }
        while self.occupancy.last() == Some(&0) {
            self.occupancy.pop();
        }
    }
}

/// `#` full cell, `+` partly covered, `.` empty; top row first.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height()).rev() {
            for x in 0..self.width {
                let c = match self.cell(x, y) {
                    0 => '.',
                    0xF => '#',
                    _ => '+',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
