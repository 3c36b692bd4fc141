//! quarter-cell lattice - every unit cell is cut by both diagonals into four triangles
//! rows are u128 bitfields, 4 bits per column, row 0 at the bottom

use smallvec::{smallvec, SmallVec};

use crate::GeometryError;

/// One lattice row. Column `x` owns bits `4x..4x+4`.
pub type Row = u128;

/// Widest board (and widest shape) a `Row` can hold.
pub const MAX_WIDTH: u32 = 32;

/// Area of a single quarter triangle.
pub const QUARTER_AREA: f64 = 0.25;

/// All four quarters of one cell.
pub const FULL_CELL: Row = 0xF;

// Quarter order inside a cell nibble: south, east, north, west.
const SOUTH_MASK: Row = Row::MAX / 0xF;
const EAST_MASK: Row = SOUTH_MASK << 1;
const NORTH_MASK: Row = SOUTH_MASK << 2;
const WEST_MASK: Row = SOUTH_MASK << 3;

/// Quarter centroids inside a unit cell, in sixths: (x, y) for S, E, N, W.
const QUARTER_CENTROID_SIXTHS: [(i64, i64); 4] = [(3, 1), (5, 3), (3, 5), (1, 3)];

#[inline(always)]
pub fn cell_mask(x: u32) -> Row {
    FULL_CELL << (4 * x)
}

/// Row with every quarter of columns `0..width` set.
#[inline]
pub fn full_row(width: u32) -> Row {
    if width >= MAX_WIDTH {
        Row::MAX
    } else {
        (1 << (4 * width)) - 1
    }
}

/// Sum of quarter-centroid heights in a row, in sixths above the row floor.
#[inline]
pub fn row_centroid_sixths(row: Row) -> i64 {
    let south = (row & SOUTH_MASK).count_ones() as i64;
    let east = (row & EAST_MASK).count_ones() as i64;
    let north = (row & NORTH_MASK).count_ones() as i64;
    let west = (row & WEST_MASK).count_ones() as i64;
    south + 3 * (east + west) + 5 * north
}

/// Number of columns spanned from column 0 to the last occupied one.
#[inline]
fn row_extent(row: Row) -> u32 {
    if row == 0 {
        0
    } else {
        (Row::BITS - 1 - row.leading_zeros()) / 4 + 1
    }
}

/// Exact occupancy of one shape, normalised so its bounding box starts at (0, 0).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Footprint {
    rows: SmallVec<[Row; 4]>,
    width: u32,
}

impl Footprint {
    /// Rasterise a polygon given as an integer vertex ring.
    ///
    /// Every edge must be axis-aligned or diagonal; under that restriction each
    /// quarter triangle is either fully inside or fully outside, so testing its
    /// centroid is exact. The ring may repeat its first vertex at the end.
    pub fn from_polygon(vertices: &[(i32, i32)]) -> Result<Self, GeometryError> {
        let mut ring: Vec<(i64, i64)> = vertices
            .iter()
            .map(|&(x, y)| (x as i64, y as i64))
            .collect();
        ring.dedup();
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(GeometryError::DegeneratePolygon);
        }

        for (i, &from) in ring.iter().enumerate() {
            let to = ring[(i + 1) % ring.len()];
            let (dx, dy) = (to.0 - from.0, to.1 - from.1);
            if dx != 0 && dy != 0 && dx.abs() != dy.abs() {
                return Err(GeometryError::UnsupportedEdge {
                    from: (from.0 as i32, from.1 as i32),
                    to: (to.0 as i32, to.1 as i32),
                });
            }
        }

        let min_x = ring.iter().map(|v| v.0).min().unwrap_or(0);
        let max_x = ring.iter().map(|v| v.0).max().unwrap_or(0);
        let min_y = ring.iter().map(|v| v.1).min().unwrap_or(0);
        let max_y = ring.iter().map(|v| v.1).max().unwrap_or(0);
        let (width, height) = ((max_x - min_x) as u32, (max_y - min_y) as u32);
        if width == 0 || height == 0 {
            return Err(GeometryError::DegeneratePolygon);
        }
        if width > MAX_WIDTH || height > MAX_WIDTH {
            return Err(GeometryError::ShapeTooLarge(width.max(height)));
        }

        let mut rows: SmallVec<[Row; 4]> = smallvec![0; height as usize];
        for (cy, row) in rows.iter_mut().enumerate() {
            for cx in 0..width {
                for (q, &(ox, oy)) in QUARTER_CENTROID_SIXTHS.iter().enumerate() {
                    let px = 6 * (min_x + cx as i64) + ox;
                    let py = 6 * (min_y + cy as i64) + oy;
                    if ring_contains(&ring, px, py) {
                        *row |= 1 << (4 * cx + q as u32);
                    }
                }
            }
        }

        let quarters: i64 = rows.iter().map(|r| r.count_ones() as i64).sum();
        if quarters == 0 {
            return Err(GeometryError::DegeneratePolygon);
        }
        // a quarter is 1/4, so a simple ring has quarters == 2 * (twice the shoelace area)
        if quarters != 2 * twice_signed_area(&ring).abs() {
            return Err(GeometryError::NonSimplePolygon);
        }

        Ok(Self { rows, width })
    }

    /// Build from raw rows, trimming empty margins. Returns the footprint and
    /// how far its box moved right and up, or `None` if nothing is set.
    pub fn from_rows(rows: &[Row]) -> Option<(Self, u32, u32)> {
        let first = rows.iter().position(|&r| r != 0)?;
        let last = rows.iter().rposition(|&r| r != 0)?;
        let rows = &rows[first..=last];

        let dx = rows
            .iter()
            .filter(|&&r| r != 0)
            .map(|r| r.trailing_zeros() / 4)
            .min()
            .unwrap_or(0);
        let rows: SmallVec<[Row; 4]> = rows.iter().map(|&r| r >> (4 * dx)).collect();
        let width = rows.iter().map(|&r| row_extent(r)).max().unwrap_or(0);

        Some((Self { rows, width }, dx, first as u32))
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    #[inline(always)]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Quarter bits of one cell (0..=0xF).
    pub fn cell(&self, x: u32, y: u32) -> u8 {
        match self.rows.get(y as usize) {
            Some(&row) if x < self.width => ((row >> (4 * x)) & FULL_CELL) as u8,
            _ => 0,
        }
    }

    pub fn quarters(&self) -> u32 {
        self.rows.iter().map(|r| r.count_ones()).sum()
    }

    pub fn area(&self) -> f64 {
        self.quarters() as f64 * QUARTER_AREA
    }

    /// Sum of quarter-centroid heights above the footprint floor, in sixths.
    pub fn centroid_sixths(&self) -> i64 {
        self.rows
            .iter()
            .enumerate()
            .map(|(y, &row)| 6 * y as i64 * row.count_ones() as i64 + row_centroid_sixths(row))
            .sum()
    }

    /// Rotate by `quarter_turns` x 90 degrees counter-clockwise and re-normalise.
    pub fn rotated(&self, quarter_turns: u32) -> Self {
        let mut current = self.clone();
        for _ in 0..quarter_turns % 4 {
            current = current.rotated_once();
        }
        current
    }

    // cell (x, y) -> (h - 1 - y, x); quarter q -> q + 1
    fn rotated_once(&self) -> Self {
        let height = self.height();
        let mut rows: SmallVec<[Row; 4]> = smallvec![0; self.width as usize];
        for (y, &row) in self.rows.iter().enumerate() {
            let mut bits = row;
            while bits != 0 {
                let bit = bits.trailing_zeros();
                bits &= bits - 1;
                let (x, q) = (bit / 4, bit % 4);
                let nx = height - 1 - y as u32;
                rows[x as usize] |= 1 << (4 * nx + (q + 1) % 4);
            }
        }
        Self {
            rows,
            width: height,
        }
    }

    /// Delete row `index` and drop everything above it by one.
    /// Returns the remainder with its box shift (see `from_rows`), or `None`
    /// if nothing is left.
    pub fn without_row(&self, index: usize) -> Option<(Self, u32, u32)> {
        let mut rows = self.rows.clone();
        if index < rows.len() {
            rows.remove(index);
        }
        Self::from_rows(&rows)
    }
}

fn twice_signed_area(ring: &[(i64, i64)]) -> i64 {
    ring.iter()
        .enumerate()
        .map(|(i, &(x1, y1))| {
            let (x2, y2) = ring[(i + 1) % ring.len()];
            x1 * y2 - x2 * y1
        })
        .sum::<i64>()
}

/// Even-odd inclusion test for a point in sixths against a ring in whole units.
/// The probe never sits on a vertex row, so there is no on-edge case to handle.
fn ring_contains(ring: &[(i64, i64)], px: i64, py: i64) -> bool {
    let mut inside = false;
    for (i, &(x1, y1)) in ring.iter().enumerate() {
        let (x2, y2) = ring[(i + 1) % ring.len()];
        let (x1, y1, x2, y2) = (6 * x1, 6 * y1, 6 * x2, 6 * y2);
        if (y1 > py) != (y2 > py) {
            let dy = y2 - y1;
            let lhs = (px - x1) * dy;
            let rhs = (py - y1) * (x2 - x1);
            let left_of_edge = if dy > 0 { lhs < rhs } else { lhs > rhs };
            if left_of_edge {
                inside = !inside;
            }
        }
    }
    inside
}
