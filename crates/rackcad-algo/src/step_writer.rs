//! ISO 10303-21 (AP214) output for assemblies of extruded solids.

use crate::assembly::{Assembly, Placement};
use crate::error::ExportError;
use crate::solid::Solid;
use itertools::Itertools;
use nalgebra::{Isometry3, Point3, Vector3};
use rackcad_core::color::Rgba;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq)]
pub struct StepOptions {
    pub author: String,
    pub organization: String,
    /// Fixed header timestamp; the current local time when `None`.
    pub timestamp: Option<String>,
}

impl Default for StepOptions {
    fn default() -> Self {
        Self {
            author: "rackcad".to_string(),
            organization: String::new(),
            timestamp: None,
        }
    }
}

/// Writes every placement of `assembly` into one STEP document.
pub fn write_step(assembly: &Assembly, opts: &StepOptions) -> Result<String, ExportError> {
    write_placements(assembly, assembly.name(), assembly.placements(), opts)
}

/// Writes the given placements of `assembly` as a document named `name`.
pub fn write_placements<'a>(
    assembly: &Assembly,
    name: &str,
    placements: impl IntoIterator<Item = &'a Placement>,
    opts: &StepOptions,
) -> Result<String, ExportError> {
    let name = escape_step_string(if name.trim().is_empty() {
        "rackcad"
    } else {
        name.trim()
    });
    let mut w = StepWriter::new();

    let app_ctx = w.push(format!(
        "APPLICATION_CONTEXT('core data for automotive mechanical design processes')"
    ));
    w.push(format!(
        "APPLICATION_PROTOCOL_DEFINITION('international standard','automotive_design',2000,#{app_ctx})"
    ));
    let prod_def_ctx = w.push(format!(
        "PRODUCT_DEFINITION_CONTEXT('part definition',#{app_ctx},'design')"
    ));
    let prod_ctx = w.push(format!("PRODUCT_CONTEXT('',#{app_ctx},'mechanical')"));
    let product = w.push(format!("PRODUCT('{name}','{name}','',(#{prod_ctx}))"));
    let formation = w.push(format!(
        "PRODUCT_DEFINITION_FORMATION_WITH_SPECIFIED_SOURCE('','',#{product},.MADE.)"
    ));
    let prod_def = w.push(format!(
        "PRODUCT_DEFINITION('design','',#{formation},#{prod_def_ctx})"
    ));
    let prod_def_shape = w.push(format!("PRODUCT_DEFINITION_SHAPE('','',#{prod_def})"));

    let len_unit = w.push("(LENGTH_UNIT()NAMED_UNIT(*)SI_UNIT(.MILLI.,.METRE.))".to_string());
    let angle_unit = w.push("(NAMED_UNIT(*)PLANE_ANGLE_UNIT()SI_UNIT($,.RADIAN.))".to_string());
    let solid_unit =
        w.push("(NAMED_UNIT(*)SOLID_ANGLE_UNIT()SI_UNIT($,.STERADIAN.))".to_string());
    let uncertainty = w.push(format!(
        "UNCERTAINTY_MEASURE_WITH_UNIT(LENGTH_MEASURE(1.E-6),#{len_unit},'distance_accuracy_value','')"
    ));
    let rep_ctx = w.push(format!(
        "(GEOMETRIC_REPRESENTATION_CONTEXT(3)GLOBAL_UNCERTAINTY_ASSIGNED_CONTEXT((#{uncertainty}))GLOBAL_UNIT_ASSIGNED_CONTEXT((#{len_unit},#{angle_unit},#{solid_unit}))REPRESENTATION_CONTEXT('',''))"
    ));

    let origin = w.push(cartesian_point(&Point3::origin()));
    let z_dir = w.push(direction(&Vector3::z()));
    let x_dir = w.push(direction(&Vector3::x()));
    let world = w.push(format!("AXIS2_PLACEMENT_3D('',#{origin},#{z_dir},#{x_dir})"));

    let mut items = vec![world];
    let mut styled = Vec::new();
    let mut styles: Vec<(Rgba, u32)> = Vec::new();
    for placement in placements {
        let Some(solid) = assembly.shape(placement.shape) else {
            continue;
        };
        let brep = push_solid(&mut w, &placement.name, solid, &placement.isometry());
        let style = push_style(&mut w, placement.color, &mut styles);
        styled.push(w.push(format!("STYLED_ITEM('color',(#{style}),#{brep})")));
        items.push(brep);
    }
    if items.len() == 1 {
        return Err(ExportError::EmptyAssembly);
    }

    let shape_rep = w.push(format!(
        "ADVANCED_BREP_SHAPE_REPRESENTATION('{name}',({}),#{rep_ctx})",
        id_list(&items)
    ));
    w.push(format!(
        "SHAPE_DEFINITION_REPRESENTATION(#{prod_def_shape},#{shape_rep})"
    ));
    w.push(format!(
        "MECHANICAL_DESIGN_GEOMETRIC_PRESENTATION_REPRESENTATION('',({}),#{rep_ctx})",
        id_list(&styled)
    ));

    let timestamp = opts.timestamp.clone().unwrap_or_else(|| {
        chrono::Local::now()
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string()
    });
    let author = escape_step_string(&opts.author);
    let organization = escape_step_string(&opts.organization);

    let mut out = String::new();
    writeln!(out, "ISO-10303-21;")?;
    writeln!(out, "HEADER;")?;
    writeln!(out, "FILE_DESCRIPTION(('rackcad racking assembly'),'2;1');")?;
    writeln!(
        out,
        "FILE_NAME('{name}.step','{timestamp}',('{author}'),('{organization}'),'rackcad','rackcad','');"
    )?;
    writeln!(
        out,
        "FILE_SCHEMA(('AUTOMOTIVE_DESIGN {{ 1 0 10303 214 1 1 1 1 }}'));"
    )?;
    writeln!(out, "ENDSEC;")?;
    writeln!(out, "DATA;")?;
    for line in &w.lines {
        writeln!(out, "{line}")?;
    }
    writeln!(out, "ENDSEC;")?;
    writeln!(out, "END-ISO-10303-21;")?;
    Ok(out)
}

struct StepWriter {
    next_id: u32,
    lines: Vec<String>,
}

impl StepWriter {
    fn new() -> Self {
        Self {
            next_id: 1,
            lines: Vec::new(),
        }
    }

    fn push(&mut self, entity: String) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.lines.push(format!("#{id}={entity};"));
        id
    }
}

/// A corner of the solid: its point and topological vertex.
#[derive(Clone, Copy)]
struct Corner {
    at: Point3<f64>,
    point: u32,
    vertex: u32,
}

/// Emits the solid as a closed shell of planar faces in world coordinates.
///
/// Each edge is written once and shared by its two faces, with orientation flags
/// chosen so every face loop runs counter-clockwise seen from outside.
fn push_solid(w: &mut StepWriter, name: &str, solid: &Solid, iso: &Isometry3<f64>) -> u32 {
    let n = solid.profile.len();
    let corner = |w: &mut StepWriter, x: f64, y: f64, z: f64| {
        let at = iso.transform_point(&Point3::new(x, y, z));
        let point = w.push(cartesian_point(&at));
        let vertex = w.push(format!("VERTEX_POINT('',#{point})"));
        Corner { at, point, vertex }
    };
    let bottom: Vec<Corner> = solid
        .profile
        .iter()
        .map(|p| corner(w, p.x, p.y, solid.z_min))
        .collect();
    let top: Vec<Corner> = solid
        .profile
        .iter()
        .map(|p| corner(w, p.x, p.y, solid.z_max))
        .collect();

    let bottom_edges: Vec<u32> = (0..n)
        .map(|i| push_edge(w, bottom[i], bottom[(i + 1) % n]))
        .collect();
    let top_edges: Vec<u32> = (0..n)
        .map(|i| push_edge(w, top[i], top[(i + 1) % n]))
        .collect();
    let vertical_edges: Vec<u32> = (0..n).map(|i| push_edge(w, bottom[i], top[i])).collect();

    let mut faces = Vec::with_capacity(n + 2);
    for i in 0..n {
        let j = (i + 1) % n;
        let d = solid.profile[j] - solid.profile[i];
        let normal = iso.transform_vector(&Vector3::new(d.y, -d.x, 0.0));
        let reference = iso.transform_vector(&Vector3::new(d.x, d.y, 0.0));
        let bound = [
            (bottom_edges[i], true),
            (vertical_edges[j], true),
            (top_edges[i], false),
            (vertical_edges[i], false),
        ];
        faces.push(push_face(w, &bound, bottom[i].point, &normal, &reference));
    }

    let x_axis = iso.transform_vector(&Vector3::x());
    let top_bound: Vec<(u32, bool)> = top_edges.iter().map(|&e| (e, true)).collect();
    let up = iso.transform_vector(&Vector3::z());
    faces.push(push_face(w, &top_bound, top[0].point, &up, &x_axis));

    let bottom_bound: Vec<(u32, bool)> = bottom_edges.iter().rev().map(|&e| (e, false)).collect();
    let down = iso.transform_vector(&-Vector3::z());
    faces.push(push_face(w, &bottom_bound, bottom[0].point, &down, &x_axis));

    let shell = w.push(format!("CLOSED_SHELL('',({}))", id_list(&faces)));
    w.push(format!(
        "MANIFOLD_SOLID_BREP('{}',#{shell})",
        escape_step_string(name)
    ))
}

fn push_edge(w: &mut StepWriter, from: Corner, to: Corner) -> u32 {
    let d = to.at - from.at;
    let length = d.norm();
    let dir = if length > 1e-12 { d / length } else { Vector3::x() };
    let dir = w.push(direction(&dir));
    let vector = w.push(format!("VECTOR('',#{dir},{})", f64_step(length)));
    let line = w.push(format!("LINE('',#{},#{vector})", from.point));
    w.push(format!(
        "EDGE_CURVE('',#{},#{},#{line},.T.)",
        from.vertex, to.vertex
    ))
}

fn push_face(
    w: &mut StepWriter,
    bound: &[(u32, bool)],
    origin: u32,
    normal: &Vector3<f64>,
    reference: &Vector3<f64>,
) -> u32 {
    let oriented: Vec<u32> = bound
        .iter()
        .map(|&(edge, forward)| {
            w.push(format!(
                "ORIENTED_EDGE('',*,*,#{edge},{})",
                if forward { ".T." } else { ".F." }
            ))
        })
        .collect();
    let edge_loop = w.push(format!("EDGE_LOOP('',({}))", id_list(&oriented)));
    let outer = w.push(format!("FACE_OUTER_BOUND('',#{edge_loop},.T.)"));
    let axis = w.push(direction(&normal.normalize()));
    let ref_dir = w.push(direction(&reference.normalize()));
    let frame = w.push(format!(
        "AXIS2_PLACEMENT_3D('',#{origin},#{axis},#{ref_dir})"
    ));
    let plane = w.push(format!("PLANE('',#{frame})"));
    w.push(format!("ADVANCED_FACE('',(#{outer}),#{plane},.T.)"))
}

/// Returns the presentation style for `color`, writing it on first use.
fn push_style(w: &mut StepWriter, color: Rgba, cache: &mut Vec<(Rgba, u32)>) -> u32 {
    if let Some(&(_, id)) = cache.iter().find(|(c, _)| *c == color) {
        return id;
    }
    let rgb = w.push(format!(
        "COLOUR_RGB('',{},{},{})",
        f64_step(color.r),
        f64_step(color.g),
        f64_step(color.b)
    ));
    let fill_colour = w.push(format!("FILL_AREA_STYLE_COLOUR('',#{rgb})"));
    let fill = w.push(format!("FILL_AREA_STYLE('',(#{fill_colour}))"));
    let area = w.push(format!("SURFACE_STYLE_FILL_AREA(#{fill})"));
    let side = w.push(format!("SURFACE_SIDE_STYLE('',(#{area}))"));
    let usage = w.push(format!("SURFACE_STYLE_USAGE(.BOTH.,#{side})"));
    let id = w.push(format!("PRESENTATION_STYLE_ASSIGNMENT((#{usage}))"));
    cache.push((color, id));
    id
}

fn id_list(ids: &[u32]) -> String {
    ids.iter().map(|id| format!("#{id}")).join(",")
}

fn escape_step_string(s: &str) -> String {
    s.replace('\'', "''")
}

fn f64_step(v: f64) -> String {
    if !v.is_finite() {
        return "0.".to_string();
    }
    let s = format!("{v:.6}");
    if s == "-0.000000" {
        "0.000000".to_string()
    } else {
        s
    }
}

fn cartesian_point(p: &Point3<f64>) -> String {
    format!(
        "CARTESIAN_POINT('',({},{},{}))",
        f64_step(p.x),
        f64_step(p.y),
        f64_step(p.z)
    )
}

fn direction(v: &Vector3<f64>) -> String {
    format!(
        "DIRECTION('',({},{},{}))",
        f64_step(v.x),
        f64_step(v.y),
        f64_step(v.z)
    )
}
