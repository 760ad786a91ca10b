//! STL (stereolithography) format support.
//!
//! STL stores every triangle with its own corners. Loading welds corners with
//! bit-identical coordinates back into shared vertices, numbered in order of
//! first appearance. Both binary and ASCII files are read; files are written
//! as binary.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_face_vertex, MeshIndex, TriMesh};

/// Load a mesh from an STL file.
///
/// Triangles that collapse after welding are skipped.
///
/// # Example
///
/// ```no_run
/// use meshrib::io::stl;
/// use meshrib::mesh::TriMesh;
///
/// let mesh: TriMesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<TriMesh<I>> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut welded: HashMap<[u32; 3], usize> = HashMap::new();
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::with_capacity(stl.faces.len());
    let mut skipped = 0usize;

    for tri in &stl.faces {
        let corners = tri.vertices.map(|k| {
            let v = stl.vertices[k];
            let key = [v[0].to_bits(), v[1].to_bits(), v[2].to_bits()];
            *welded.entry(key).or_insert_with(|| {
                vertices.push(Point3::new(v[0] as f64, v[1] as f64, v[2] as f64));
                vertices.len() - 1
            })
        });

        if corners[0] != corners[1] && corners[1] != corners[2] && corners[0] != corners[2] {
            faces.push(corners);
        } else {
            skipped += 1;
        }
    }

    if skipped > 0 {
        log::warn!("{}: skipped {} degenerate triangles", path.display(), skipped);
    }
    if faces.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "STL file contains no valid triangles".to_string(),
        });
    }

    build_from_triangles(&vertices, &faces)
}

/// Save a mesh to a binary STL file.
///
/// # Example
///
/// ```no_run
/// use meshrib::io::stl;
/// use meshrib::mesh::TriMesh;
///
/// let mesh: TriMesh = stl::load("model.stl").unwrap();
/// stl::save(&mesh, "copy.stl").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &TriMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let (vertices, faces) = to_face_vertex(mesh);
    let corner = |p: &Point3<f64>| stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32]);

    let triangles: Vec<stl_io::Triangle> = faces
        .iter()
        .map(|f| {
            let [p0, p1, p2] = f.map(|i| vertices[i]);
            let n = (p1 - p0).cross(&(p2 - p0)).try_normalize(1e-12).unwrap_or_else(Vector3::zeros);
            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [corner(&p0), corner(&p1), corner(&p2)],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    writer.flush()?;

    Ok(())
}
