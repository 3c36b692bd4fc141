//! queue of pieces waiting to be placed, in order

use dropline_core::{GeometryError, Piece, PieceId, ShapeCatalog, ShapeId};
use rustc_hash::FxHashSet;

#[derive(Clone, Debug, Default)]
pub struct PieceQueue {
    pieces: Vec<Piece>,
    index: usize,
}

impl PieceQueue {
    /// Fails with `DuplicateIdentity` if two pieces share an identity.
    pub fn new(pieces: Vec<Piece>) -> Result<Self, GeometryError> {
        let mut seen = FxHashSet::default();
        for piece in &pieces {
            if !seen.insert(piece.id()) {
                return Err(GeometryError::DuplicateIdentity(piece.id()));
            }
        }
        Ok(Self { pieces, index: 0 })
    }

    /// One piece per shape id, identities numbered from 0.
    pub fn from_shapes(catalog: &ShapeCatalog, shapes: &[ShapeId]) -> Result<Self, GeometryError> {
        let pieces = shapes
            .iter()
            .enumerate()
            .map(|(i, &shape)| catalog.spawn(shape, PieceId(i as u32)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(pieces)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Up to `len` upcoming pieces, without consuming them.
    pub fn window(&self, len: usize) -> &[Piece] {
        let rest = self.remaining();
        &rest[..len.min(rest.len())]
    }

    /// Consume `count` pieces (clamped to what is left).
    pub fn advance(&mut self, count: usize) {
        self.index = (self.index + count).min(self.pieces.len());
    }

    pub fn remaining(&self) -> &[Piece] {
        &self.pieces[self.index..]
    }

    pub fn all(&self) -> &[Piece] {
        &self.pieces
    }
}
