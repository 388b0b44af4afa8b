//! STL file loading.

use crate::{MeshError, TriangleMesh};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tristep_math::Point3;

/// Load an ASCII or binary STL file.
pub fn load_stl(path: impl AsRef<Path>) -> Result<TriangleMesh, MeshError> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let mesh = read_stl(&mut reader)?;
    tracing::debug!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.num_vertices(),
        mesh.num_triangles()
    );
    Ok(mesh)
}

/// Read STL data from any seekable reader.
///
/// Vertices that are bit-identical in the file share an index; no tolerance
/// welding is applied.
pub fn read_stl<R: Read + Seek>(reader: &mut R) -> Result<TriangleMesh, MeshError> {
    let stl = stl_io::read_stl(reader)?;
    let positions = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();
    let indices = stl
        .faces
        .iter()
        .flat_map(|f| f.vertices.iter().map(|&i| i as u32))
        .collect();
    TriangleMesh::from_parts(positions, indices)
}
