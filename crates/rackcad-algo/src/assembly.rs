//! A named collection of placed solids.

use crate::error::LayoutError;
use crate::solid::{Role, ShapeKey, Solid};
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use rackcad_core::color::Rgba;
use rackcad_core::geom::{BBox3, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Index of a shape inside one [`Assembly`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(usize);

impl ShapeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRotation {
    pub axis: Axis,
    pub angle_deg: f64,
}

impl AxisRotation {
    pub fn new(axis: Axis, angle_deg: f64) -> Self {
        Self { axis, angle_deg }
    }

    pub fn quaternion(&self) -> UnitQuaternion<f64> {
        let axis = nalgebra::Unit::new_normalize(self.axis.unit());
        UnitQuaternion::from_axis_angle(&axis, self.angle_deg.to_radians())
    }
}

/// One instance of a shape: rotated about the shape's local origin, then translated.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub name: String,
    pub shape: ShapeId,
    pub role: Role,
    pub translation: Vector3<f64>,
    pub rotation: Option<AxisRotation>,
    pub color: Rgba,
}

impl Placement {
    pub fn isometry(&self) -> Isometry3<f64> {
        let rotation = self
            .rotation
            .map(|r| r.quaternion())
            .unwrap_or_else(UnitQuaternion::identity);
        Isometry3::from_parts(Translation3::from(self.translation), rotation)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Assembly {
    name: String,
    shapes: Vec<Solid>,
    shape_index: HashMap<ShapeKey, ShapeId>,
    placements: Vec<Placement>,
    names: HashSet<String>,
    notes: Vec<String>,
}

impl Assembly {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a shape, reusing an existing id when the geometry is identical.
    pub fn add_shape(&mut self, solid: Solid) -> ShapeId {
        let key = solid.key();
        if let Some(&id) = self.shape_index.get(&key) {
            return id;
        }
        let id = ShapeId(self.shapes.len());
        self.shapes.push(solid);
        self.shape_index.insert(key, id);
        id
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Solid> {
        self.shapes.get(id.0)
    }

    pub fn shapes(&self) -> &[Solid] {
        &self.shapes
    }

    pub fn place(
        &mut self,
        name: impl Into<String>,
        shape: ShapeId,
        translation: Vector3<f64>,
        rotation: Option<AxisRotation>,
        color: Rgba,
    ) -> Result<&Placement, LayoutError> {
        let name = name.into();
        let Some(solid) = self.shapes.get(shape.0) else {
            return Err(LayoutError::UnknownShape {
                name,
                shape: shape.0,
            });
        };
        if !self.names.insert(name.clone()) {
            return Err(LayoutError::DuplicateName(name));
        }
        let role = solid.role;
        self.placements.push(Placement {
            name,
            shape,
            role,
            translation,
            rotation,
            color,
        });
        Ok(&self.placements[self.placements.len() - 1])
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.name == name)
    }

    pub fn by_role(&self, role: Role) -> impl Iterator<Item = &Placement> + '_ {
        self.placements.iter().filter(move |p| p.role == role)
    }

    pub fn count_by_role(&self) -> BTreeMap<Role, usize> {
        let mut counts = BTreeMap::new();
        for p in &self.placements {
            *counts.entry(p.role).or_insert(0) += 1;
        }
        counts
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Non-fatal remarks made while assembling, such as clamped dimensions.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Corners of the placed solid in world coordinates.
    pub fn world_vertices(&self, placement: &Placement) -> Vec<Point3<f64>> {
        let Some(solid) = self.shape(placement.shape) else {
            return Vec::new();
        };
        let iso = placement.isometry();
        solid.vertices().map(|v| iso.transform_point(&v)).collect()
    }

    pub fn placement_bbox(&self, placement: &Placement) -> BBox3 {
        let mut bbox = BBox3::empty();
        for v in self.world_vertices(placement) {
            bbox.include_point(Vec3::new(v.x, v.y, v.z));
        }
        bbox
    }

    /// World bounds of every placement, `None` when nothing is placed.
    pub fn bbox(&self) -> Option<BBox3> {
        let mut bbox = BBox3::empty();
        for p in &self.placements {
            bbox = bbox.union(&self.placement_bbox(p));
        }
        (!bbox.is_empty()).then_some(bbox)
    }
}
