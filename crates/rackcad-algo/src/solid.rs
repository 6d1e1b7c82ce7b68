//! Primitive solids for the rack parts.
//!
//! Every part is a straight extrusion: a simple polygon in the local XY plane swept
//! along local Z. Builders only know dimensions; orientation and position are decided
//! by the layout engine.

use crate::error::FactoryError;
use nalgebra::{Point2, Point3};
use rackcad_core::geom::{BBox3, Vec3};
use rackcad_core::model::SectionSize;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

pub const DECKING_THICKNESS_MIN: f64 = 10.0;
pub const DECKING_THICKNESS_MAX: f64 = 50.0;
/// Extra plate width on each side of the column footprint.
pub const BASE_PLATE_MARGIN: f64 = 20.0;
pub const BASE_PLATE_THICKNESS: f64 = 5.0;
pub const SPACER_WIDTH: f64 = 50.0;
pub const SPACER_THICKNESS: f64 = 20.0;
pub const DEFAULT_UPRIGHT_WALL: f64 = 2.0;
/// Gap between the column footprint and the inside of its guard rail, per side.
pub const GUARD_RAIL_CLEARANCE: f64 = 30.0;
pub const GUARD_RAIL_THICKNESS: f64 = 20.0;
pub const GUARD_RAIL_HEIGHT: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Upright,
    Beam,
    Decking,
    Bracing,
    BasePlate,
    Spacer,
    SideBeam,
    GuardRail,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Upright => "upright",
            Role::Beam => "beam",
            Role::Decking => "decking",
            Role::Bracing => "bracing",
            Role::BasePlate => "base_plate",
            Role::Spacer => "spacer",
            Role::SideBeam => "side_beam",
            Role::GuardRail => "guard_rail",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An extruded polygon. The profile is stored counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    pub role: Role,
    pub profile: Vec<Point2<f64>>,
    pub z_min: f64,
    pub z_max: f64,
}

/// Identity of a solid's geometry, used to share one shape between placements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeKey {
    role: Role,
    bits: Vec<u64>,
}

impl Solid {
    fn extrusion(role: Role, mut profile: Vec<Point2<f64>>, z_min: f64, z_max: f64) -> Self {
        if signed_area(&profile) < 0.0 {
            profile.reverse();
        }
        Self {
            role,
            profile,
            z_min,
            z_max,
        }
    }

    /// Rectangle of `sx` × `sy` centred on the local origin.
    fn rect(role: Role, sx: f64, sy: f64, z_min: f64, z_max: f64) -> Self {
        let (hx, hy) = (sx * 0.5, sy * 0.5);
        let profile = vec![
            Point2::new(-hx, -hy),
            Point2::new(hx, -hy),
            Point2::new(hx, hy),
            Point2::new(-hx, hy),
        ];
        Self::extrusion(role, profile, z_min, z_max)
    }

    pub fn length(&self) -> f64 {
        self.z_max - self.z_min
    }

    pub fn key(&self) -> ShapeKey {
        let mut bits = Vec::with_capacity(self.profile.len() * 2 + 2);
        for p in &self.profile {
            bits.push(p.x.to_bits());
            bits.push(p.y.to_bits());
        }
        bits.push(self.z_min.to_bits());
        bits.push(self.z_max.to_bits());
        ShapeKey {
            role: self.role,
            bits,
        }
    }

    /// Bottom ring followed by top ring, in profile order.
    pub fn vertices(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        let bottom = self
            .profile
            .iter()
            .map(|p| Point3::new(p.x, p.y, self.z_min));
        let top = self
            .profile
            .iter()
            .map(|p| Point3::new(p.x, p.y, self.z_max));
        bottom.chain(top)
    }

    pub fn local_bbox(&self) -> BBox3 {
        let mut bbox = BBox3::empty();
        for v in self.vertices() {
            bbox.include_point(Vec3::new(v.x, v.y, v.z));
        }
        bbox
    }
}

fn signed_area(profile: &[Point2<f64>]) -> f64 {
    let n = profile.len();
    (0..n)
        .map(|i| {
            let a = profile[i];
            let b = profile[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        * 0.5
}

fn positive(part: Role, dimension: &'static str, value: f64) -> Result<f64, FactoryError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(FactoryError::NonPositive {
            part,
            dimension,
            value,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileKind {
    Rectangular,
    /// L-shaped angle.
    Angle,
    /// U/C channel, open towards +Y.
    Channel,
    Omega,
}

impl ProfileKind {
    /// Picks a cross-section from an upright `type` name such as `"L-beam"`.
    pub fn from_type_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        if name.contains("omega") {
            ProfileKind::Omega
        } else if name.contains("channel") || name.starts_with("c-") || name.starts_with("u-") {
            ProfileKind::Channel
        } else if name.contains("angle") || name.starts_with("l-") || name == "l" {
            ProfileKind::Angle
        } else {
            ProfileKind::Rectangular
        }
    }

    pub fn is_open(self) -> bool {
        self != ProfileKind::Rectangular
    }
}

/// Column cross-section: `section` is width (X) by depth (Y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UprightProfile {
    pub kind: ProfileKind,
    pub section: SectionSize,
    pub wall: f64,
}

impl UprightProfile {
    pub fn new(kind: ProfileKind, section: SectionSize, wall: f64) -> Self {
        Self {
            kind,
            section,
            wall,
        }
    }

    pub fn parse(type_name: &str, section: &str, wall: f64) -> Result<Self, FactoryError> {
        Ok(Self::new(
            ProfileKind::from_type_name(type_name),
            SectionSize::parse(section)?,
            wall,
        ))
    }

    pub fn width(&self) -> f64 {
        self.section.first
    }

    pub fn depth(&self) -> f64 {
        self.section.second
    }

    fn outline(&self) -> Vec<Point2<f64>> {
        let (hw, hd, t) = (self.width() * 0.5, self.depth() * 0.5, self.wall);
        let p = Point2::new;
        match self.kind {
            ProfileKind::Rectangular => vec![p(-hw, -hd), p(hw, -hd), p(hw, hd), p(-hw, hd)],
            ProfileKind::Angle => vec![
                p(-hw, -hd),
                p(hw, -hd),
                p(hw, -hd + t),
                p(-hw + t, -hd + t),
                p(-hw + t, hd),
                p(-hw, hd),
            ],
            ProfileKind::Channel => vec![
                p(-hw, -hd),
                p(hw, -hd),
                p(hw, hd),
                p(hw - t, hd),
                p(hw - t, -hd + t),
                p(-hw + t, -hd + t),
                p(-hw + t, hd),
                p(-hw, hd),
            ],
            ProfileKind::Omega => {
                let inner = hw * 0.6;
                vec![
                    p(-hw, -hd),
                    p(hw, -hd),
                    p(hw, hd),
                    p(inner, hd),
                    p(inner, -hd + t),
                    p(-inner, -hd + t),
                    p(-inner, hd),
                    p(-hw, hd),
                ]
            }
        }
    }
}

/// Column standing on its local origin, extruded `0..height`.
pub fn upright(profile: &UprightProfile, height: f64) -> Result<Solid, FactoryError> {
    let part = Role::Upright;
    positive(part, "width", profile.width())?;
    positive(part, "depth", profile.depth())?;
    positive(part, "height", height)?;
    if profile.kind.is_open() {
        positive(part, "wall thickness", profile.wall)?;
        if profile.wall * 2.0 >= profile.width().min(profile.depth()) {
            return Err(FactoryError::WallTooThick {
                part,
                wall: profile.wall,
                section: profile.section,
            });
        }
    }
    debug!(kind = ?profile.kind, section = %profile.section, height, "upright built");
    Ok(Solid::extrusion(part, profile.outline(), 0.0, height))
}

/// Beam of section `"H x W"` swept along local Z, centred on the origin.
///
/// H lies along local X and W along local Y, so a +90° turn about Y stands the
/// section upright and runs the beam along world X.
pub fn beam(section: SectionSize, length: f64) -> Result<Solid, FactoryError> {
    let part = Role::Beam;
    let height = positive(part, "height", section.first)?;
    let width = positive(part, "width", section.second)?;
    let length = positive(part, "length", length)?;
    Ok(Solid::rect(part, height, width, -length * 0.5, length * 0.5))
}

/// Depth-wise beam tying the front and back columns of a frame together.
///
/// Same `"H x W"` section as [`beam`], but W lies along local X and H along local Y,
/// so a +90° turn about X keeps the section upright and runs the beam along world Y.
pub fn side_beam(section: SectionSize, length: f64) -> Result<Solid, FactoryError> {
    let part = Role::SideBeam;
    let height = positive(part, "height", section.first)?;
    let width = positive(part, "width", section.second)?;
    let length = positive(part, "length", length)?;
    Ok(Solid::rect(part, width, height, -length * 0.5, length * 0.5))
}

/// One half of the guard ring around a column foot, standing on local Z = 0.
///
/// The half is a U covering local `y <= 0`; the other half is the same solid turned
/// 180° about Z, which closes the ring and leaves the footprint open in the middle.
pub fn guard_rail(column: SectionSize) -> Result<Solid, FactoryError> {
    let part = Role::GuardRail;
    let w = positive(part, "column width", column.first)?;
    let d = positive(part, "column depth", column.second)?;
    let (ix, iy) = (
        w * 0.5 + GUARD_RAIL_CLEARANCE,
        d * 0.5 + GUARD_RAIL_CLEARANCE,
    );
    let (ox, oy) = (ix + GUARD_RAIL_THICKNESS, iy + GUARD_RAIL_THICKNESS);
    let p = Point2::new;
    let profile = vec![
        p(-ox, -oy),
        p(ox, -oy),
        p(ox, 0.0),
        p(ix, 0.0),
        p(ix, -iy),
        p(-ix, -iy),
        p(-ix, 0.0),
        p(-ox, 0.0),
    ];
    Ok(Solid::extrusion(part, profile, 0.0, GUARD_RAIL_HEIGHT))
}

/// Clamps a decking thickness into the supported range, returning a note when it
/// had to move.
pub fn clamp_decking_thickness(thickness: f64) -> (f64, Option<String>) {
    let clamped = thickness.clamp(DECKING_THICKNESS_MIN, DECKING_THICKNESS_MAX);
    if clamped == thickness {
        (thickness, None)
    } else {
        (
            clamped,
            Some(format!(
                "decking thickness {thickness}mm out of range [{DECKING_THICKNESS_MIN}, {DECKING_THICKNESS_MAX}], clamped to {clamped}mm"
            )),
        )
    }
}

/// Flat panel centred on the origin; thickness along local Z.
pub fn decking(width: f64, depth: f64, thickness: f64) -> Result<Solid, FactoryError> {
    let part = Role::Decking;
    positive(part, "width", width)?;
    positive(part, "depth", depth)?;
    let thickness = positive(part, "thickness", thickness)?;
    let (thickness, note) = clamp_decking_thickness(thickness);
    if let Some(note) = note {
        warn!("{note}");
    }
    Ok(Solid::rect(
        part,
        width,
        depth,
        -thickness * 0.5,
        thickness * 0.5,
    ))
}

/// Bar along local Z, centred on its midpoint so rotations keep it anchored.
pub fn bracing_bar(length: f64, width: f64, thickness: f64) -> Result<Solid, FactoryError> {
    let part = Role::Bracing;
    let length = positive(part, "length", length)?;
    let width = positive(part, "width", width)?;
    let thickness = positive(part, "thickness", thickness)?;
    Ok(Solid::rect(part, width, thickness, -length * 0.5, length * 0.5))
}

/// Foot plate for a column; its top face sits at local Z = 0.
pub fn base_plate(column: SectionSize) -> Result<Solid, FactoryError> {
    let part = Role::BasePlate;
    let w = positive(part, "column width", column.first)?;
    let d = positive(part, "column depth", column.second)?;
    Ok(Solid::rect(
        part,
        w + 2.0 * BASE_PLATE_MARGIN,
        d + 2.0 * BASE_PLATE_MARGIN,
        -BASE_PLATE_THICKNESS,
        0.0,
    ))
}

/// Row-to-row connector of fixed section, length along local Z, centred.
pub fn spacer_bar(length: f64) -> Result<Solid, FactoryError> {
    let part = Role::Spacer;
    let length = positive(part, "length", length)?;
    Ok(Solid::rect(
        part,
        SPACER_WIDTH,
        SPACER_THICKNESS,
        -length * 0.5,
        length * 0.5,
    ))
}
