//! Shape catalog - polygon templates, colours and their distinct rotations.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::lattice::Footprint;
use crate::{GeometryError, Piece, PieceId, Rotation};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u16);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Serialized form of one catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub id: ShapeId,
    pub polygon: Vec<(i32, i32)>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Immutable geometry of one piece type.
#[derive(Clone, Debug)]
pub struct ShapeTemplate {
    id: ShapeId,
    polygon: Vec<(i32, i32)>,
    footprint: Footprint,
    rotations: SmallVec<[Rotation; 4]>,
}

impl ShapeTemplate {
    pub fn new(id: ShapeId, polygon: &[(i32, i32)]) -> Result<Self, GeometryError> {
        let footprint = Footprint::from_polygon(polygon)?;
        let rotations = distinct_rotations(&footprint);
        Ok(Self {
            id,
            polygon: polygon.to_vec(),
            footprint,
            rotations,
        })
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn polygon(&self) -> &[(i32, i32)] {
        &self.polygon
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    pub fn rotations(&self) -> &[Rotation] {
        &self.rotations
    }
}

/// Rotations whose shapes differ from every earlier one, 0 first.
///
/// Turning about the centroid keeps the centroid fixed, so two turned shapes
/// coincide exactly when their normalised footprints are equal.
fn distinct_rotations(footprint: &Footprint) -> SmallVec<[Rotation; 4]> {
    let mut seen: SmallVec<[Footprint; 4]> = SmallVec::new();
    let mut rotations = SmallVec::new();
    for rotation in Rotation::ALL {
        let turned = footprint.rotated(rotation.index() as u32);
        if !seen.contains(&turned) {
            seen.push(turned);
            rotations.push(rotation);
        }
    }
    rotations
}

/// Maps shape ids to templates and display colours.
#[derive(Clone, Debug, Default)]
pub struct ShapeCatalog {
    templates: BTreeMap<ShapeId, ShapeTemplate>,
    colors: BTreeMap<ShapeId, String>,
}

impl ShapeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The seven tetrominoes, ids 1..=7: I, O, T, J, L, S, Z.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for (id, polygon, color) in STANDARD_SHAPES {
            catalog.add_builtin(*id, polygon, color);
        }
        catalog
    }

    /// Standard set plus the plus shape (8) and the diagonal-nosed ship (9).
    pub fn extended() -> Self {
        let mut catalog = Self::standard();
        for (id, polygon, color) in EXTRA_SHAPES {
            catalog.add_builtin(*id, polygon, color);
        }
        catalog
    }

    fn add_builtin(&mut self, id: u16, polygon: &[(i32, i32)], color: &str) {
        if let Ok(template) = ShapeTemplate::new(ShapeId(id), polygon) {
            self.templates.insert(template.id(), template);
            self.colors.insert(ShapeId(id), color.to_string());
        }
    }

    pub fn from_specs(specs: &[ShapeSpec]) -> Result<Self, GeometryError> {
        let mut catalog = Self::new();
        for spec in specs {
            catalog.insert(spec.id, &spec.polygon)?;
            if let Some(color) = &spec.color {
                catalog.set_color(spec.id, color.clone());
            }
        }
        Ok(catalog)
    }

    /// Register or replace a polygon; rotations are worked out here, once.
    pub fn insert(
        &mut self,
        id: ShapeId,
        polygon: &[(i32, i32)],
    ) -> Result<&ShapeTemplate, GeometryError> {
        let template = ShapeTemplate::new(id, polygon)?;
        self.templates.insert(id, template);
        self.template(id)
    }

    pub fn set_color(&mut self, id: ShapeId, color: impl Into<String>) {
        self.colors.insert(id, color.into());
    }

    pub fn template(&self, id: ShapeId) -> Result<&ShapeTemplate, GeometryError> {
        self.templates
            .get(&id)
            .ok_or(GeometryError::UnknownShape(id))
    }

    pub fn polygon_for(&self, id: ShapeId) -> Result<&[(i32, i32)], GeometryError> {
        self.template(id).map(ShapeTemplate::polygon)
    }

    pub fn color(&self, id: ShapeId) -> Option<&str> {
        self.colors.get(&id).map(String::as_str)
    }

    /// Both a polygon and a colour are registered.
    pub fn is_valid(&self, id: ShapeId) -> bool {
        self.templates.contains_key(&id) && self.colors.contains_key(&id)
    }

    pub fn distinct_rotations(&self, id: ShapeId) -> Result<&[Rotation], GeometryError> {
        self.template(id).map(ShapeTemplate::rotations)
    }

    pub fn spawn(&self, id: ShapeId, piece: PieceId) -> Result<Piece, GeometryError> {
        self.template(id).map(|template| Piece::new(template, piece))
    }

    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.templates.keys().copied()
    }

    pub fn specs(&self) -> Vec<ShapeSpec> {
        self.templates
            .values()
            .map(|template| ShapeSpec {
                id: template.id(),
                polygon: template.polygon().to_vec(),
                color: self.color(template.id()).map(str::to_string),
            })
            .collect()
    }
}

type BuiltinShape = (u16, &'static [(i32, i32)], &'static str);

const STANDARD_SHAPES: &[BuiltinShape] = &[
    (1, &[(0, 0), (1, 0), (1, 4), (0, 4)], "#ff0000"),
    (2, &[(0, 0), (2, 0), (2, 2), (0, 2)], "#de60cc"),
    (
        3,
        &[(0, 0), (0, 3), (1, 3), (1, 2), (2, 2), (2, 1), (1, 1), (1, 0)],
        "#f79646",
    ),
    (
        4,
        &[(0, 0), (0, 3), (2, 3), (2, 2), (1, 2), (1, 0)],
        "#ffff00",
    ),
    (
        5,
        &[(0, 2), (0, 3), (2, 3), (2, 0), (1, 0), (1, 2)],
        "#00b050",
    ),
    (
        6,
        &[(0, 1), (0, 3), (1, 3), (1, 2), (2, 2), (2, 0), (1, 0), (1, 1)],
        "#66ffff",
    ),
    (
        7,
        &[(0, 0), (0, 2), (1, 2), (1, 3), (2, 3), (2, 1), (1, 1), (1, 0)],
        "#4f81bd",
    ),
];

const EXTRA_SHAPES: &[BuiltinShape] = &[
    (
        8,
        &[
            (0, 1),
            (0, 2),
            (1, 2),
            (1, 3),
            (2, 3),
            (2, 2),
            (3, 2),
            (3, 1),
            (2, 1),
            (2, 0),
            (1, 0),
            (1, 1),
        ],
        "#aaaaaa",
    ),
    (
        9,
        &[
            (0, 1),
            (0, 2),
            (1, 3),
            (2, 3),
            (3, 2),
            (2, 2),
            (2, 1),
            (3, 1),
            (2, 0),
            (1, 0),
        ],
        "#9000ff",
    ),
];
