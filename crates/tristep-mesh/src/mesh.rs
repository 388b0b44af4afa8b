//! Indexed triangle mesh.

use crate::{MeshError, Triangle, TriangleSource};
use tristep_math::Point3;

/// Indexed triangle mesh in double precision.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    positions: Vec<Point3>,
    indices: Vec<u32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh, checking that every index names an existing vertex.
    pub fn from_parts(positions: Vec<Point3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::RaggedIndices(indices.len()));
        }
        let vertex_count = positions.len();
        if let Some((i, &index)) = indices
            .iter()
            .enumerate()
            .find(|(_, index)| **index as usize >= vertex_count)
        {
            return Err(MeshError::InvalidIndex {
                triangle: i / 3,
                index,
                vertex_count,
            });
        }
        Ok(Self { positions, indices })
    }

    /// Build a mesh from flat `[x0, y0, z0, x1, ...]` and `[i0, i1, i2, ...]` buffers.
    pub fn from_flat(vertices: &[f64], indices: &[u32]) -> Result<Self, MeshError> {
        if vertices.len() % 3 != 0 {
            return Err(MeshError::RaggedPositions(vertices.len()));
        }
        let positions = vertices
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        Self::from_parts(positions, indices.to_vec())
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, p: Point3) -> Result<u32, MeshError> {
        let index = vertex_index(self.positions.len())?;
        self.positions.push(p);
        Ok(index)
    }

    /// Append a triangle over existing vertices.
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) -> Result<(), MeshError> {
        let vertex_count = self.positions.len();
        if let Some(&index) = [a, b, c].iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::InvalidIndex {
                triangle: self.num_triangles(),
                index,
                vertex_count,
            });
        }
        self.indices.extend_from_slice(&[a, b, c]);
        Ok(())
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Flat triangle indices.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Corner positions of triangle `i`.
    pub fn triangle(&self, i: usize) -> Option<Triangle> {
        let start = i.checked_mul(3)?;
        let idx = self.indices.get(start..start.checked_add(3)?)?;
        Some([
            self.positions[idx[0] as usize],
            self.positions[idx[1] as usize],
            self.positions[idx[2] as usize],
        ])
    }

    /// Merge another mesh into this one.
    ///
    /// Fails, leaving `self` untouched, when the merged vertices would not
    /// all be addressable by a `u32` index.
    pub fn merge(&mut self, other: &TriangleMesh) -> Result<(), MeshError> {
        let total = self.positions.len() + other.positions.len();
        if total > 0 {
            vertex_index(total - 1)?;
        }
        let offset = vertex_index(self.positions.len())?;
        let indices = other
            .indices
            .iter()
            .map(|&i| i.checked_add(offset).ok_or(MeshError::TooManyVertices(total)))
            .collect::<Result<Vec<_>, _>>()?;
        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(indices);
        Ok(())
    }
}

/// `u32` index of the vertex at position `position`.
fn vertex_index(position: usize) -> Result<u32, MeshError> {
    u32::try_from(position).map_err(|_| MeshError::TooManyVertices(position.saturating_add(1)))
}

impl TriangleSource for TriangleMesh {
    fn for_each_triangle(&self, visit: &mut dyn FnMut(Triangle)) {
        for tri in self.indices.chunks_exact(3) {
            visit([
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]);
        }
    }

    fn triangle_count(&self) -> usize {
        self.num_triangles()
    }
}
