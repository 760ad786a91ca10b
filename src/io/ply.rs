//! PLY (Stanford polygon) format support.
//!
//! Vertex order is preserved on load, so vertex indices in a PLY file are
//! the [`VertexId`]s curve files refer to. Per-vertex `red`/`green`/`blue`
//! colors and `u`/`v` (or `s`/`t`) texture coordinates are read when present
//! and carried into new ribbon vertices.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector2, Vector3};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, MeshIndex, TriMesh, VertexId};

/// Load a mesh from a PLY file (ASCII or binary).
///
/// Polygons with more than three corners are fan-triangulated.
///
/// # Example
///
/// ```no_run
/// use meshrib::io::ply;
/// use meshrib::mesh::TriMesh;
///
/// let mesh: TriMesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<TriMesh<I>> {
    let path = path.as_ref();
    let load_error = |message: &str| MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let parser = Parser::<DefaultElement>::new();
    let ply = parser.read_ply(&mut reader).map_err(|e| load_error(&e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element"))?;

    let mut positions = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let coord = |name: &str| {
            float_property(vertex, name)
                .ok_or_else(|| load_error(&format!("vertex missing {} coordinate", name)))
        };
        positions.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error("PLY file has no face element"))?;

    let mut faces = Vec::with_capacity(face_element.len());
    for face in face_element {
        let corners = list_property(face, "vertex_indices")
            .or_else(|| list_property(face, "vertex_index"))
            .ok_or_else(|| load_error("face missing vertex_indices property"))?;
        for k in 1..corners.len().saturating_sub(1) {
            faces.push([corners[0], corners[k], corners[k + 1]]);
        }
    }

    if faces.is_empty() {
        return Err(load_error("PLY file contains no faces"));
    }

    let mut mesh = build_from_triangles(&positions, &faces)?;
    for (i, element) in vertex_element.iter().enumerate() {
        let vertex = mesh.vertex_mut(VertexId::new(i));
        vertex.color = vertex_color(element);
        vertex.texcoord = vertex_texcoord(element);
    }
    Ok(mesh)
}

fn float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Colors stored as bytes are scaled to `[0, 1]`.
fn vertex_color(element: &DefaultElement) -> Option<Vector3<f64>> {
    let channel = |name: &str| match element.get(name)? {
        Property::UChar(v) => Some(*v as f64 / 255.0),
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        _ => None,
    };
    Some(Vector3::new(channel("red")?, channel("green")?, channel("blue")?))
}

fn vertex_texcoord(element: &DefaultElement) -> Option<Vector2<f64>> {
    let uv = |u: &str, v: &str| Some(Vector2::new(float_property(element, u)?, float_property(element, v)?));
    uv("u", "v").or_else(|| uv("s", "t"))
}

/// Save a mesh to an ASCII PLY file.
///
/// The mesh is compacted first, so vertex indices in the file may differ from
/// the mesh's ids when vertices were pruned. Colors and texture coordinates
/// are written when every live vertex has them.
///
/// # Example
///
/// ```no_run
/// use meshrib::io::ply;
/// use meshrib::mesh::TriMesh;
///
/// let mesh: TriMesh = ply::load("model.ply").unwrap();
/// ply::save(&mesh, "copy.ply").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &TriMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_ply(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_ply<I: MeshIndex, W: Write>(mesh: &TriMesh<I>, writer: &mut W) -> Result<()> {
    let mut remap = vec![usize::MAX; mesh.num_vertex_slots()];
    let live: Vec<VertexId<I>> = mesh.vertex_ids().collect();
    for (dense, v) in live.iter().enumerate() {
        remap[v.index()] = dense;
    }
    let with_color = !live.is_empty() && live.iter().all(|&v| mesh.vertex(v).color.is_some());
    let with_uv = !live.is_empty() && live.iter().all(|&v| mesh.vertex(v).texcoord.is_some());

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by meshrib")?;
    writeln!(writer, "element vertex {}", live.len())?;
    for axis in ["x", "y", "z"] {
        writeln!(writer, "property double {}", axis)?;
    }
    if with_color {
        for channel in ["red", "green", "blue"] {
            writeln!(writer, "property uchar {}", channel)?;
        }
    }
    if with_uv {
        writeln!(writer, "property double u")?;
        writeln!(writer, "property double v")?;
    }
    writeln!(writer, "element face {}", mesh.num_faces())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for &v in &live {
        let vertex = mesh.vertex(v);
        let p = vertex.position;
        write!(writer, "{} {} {}", p.x, p.y, p.z)?;
        if let (true, Some(c)) = (with_color, vertex.color) {
            let byte = |x: f64| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
            write!(writer, " {} {} {}", byte(c.x), byte(c.y), byte(c.z))?;
        }
        if let (true, Some(uv)) = (with_uv, vertex.texcoord) {
            write!(writer, " {} {}", uv.x, uv.y)?;
        }
        writeln!(writer)?;
    }

    for (_, tri) in mesh.faces() {
        let [a, b, c] = tri.map(|v| remap[v.index()]);
        writeln!(writer, "3 {} {} {}", a, b, c)?;
    }
    Ok(())
}
