//! Mesh and curve-set file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | STL | `.stl` | ✓ | ✓ | Binary and ASCII read, binary write |
//! | PLY | `.ply` | ✓ | ✓ | Keeps vertex order, colors and texture coordinates |
//! | Curve set | any | ✓ | ✓ | See [`curves`] |
//!
//! # Usage
//!
//! ```no_run
//! use meshrib::io::{load, load_curves, save};
//! use meshrib::mesh::TriMesh;
//! use meshrib::ribbon::RibbonCurves;
//!
//! let mesh: TriMesh = load("model.ply").unwrap();
//! let curves: RibbonCurves = load_curves("model.curves").unwrap();
//! save(&mesh, "output.stl").unwrap();
//! ```
//!
//! Saving compacts the mesh: pruned vertex slots are dropped and the
//! remaining vertices renumbered, so vertex ids in the written file can
//! differ from the ids of an edited [`TriMesh`].

pub mod curves;
pub mod ply;
pub mod stl;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, TriMesh};

pub use curves::{load_curves, parse_curves, save_curves, write_curves};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    fn for_path(path: &Path) -> Result<Format> {
        Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        })
    }
}

/// Load a mesh from a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<TriMesh<I>> {
    let path = path.as_ref();
    let mesh = match Format::for_path(path)? {
        Format::Stl => stl::load(path)?,
        Format::Ply => ply::load(path)?,
    };
    log::debug!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Save a mesh to a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &TriMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    match Format::for_path(path)? {
        Format::Stl => stl::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
    }
}
