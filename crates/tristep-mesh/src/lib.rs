#![warn(missing_docs)]

//! Triangle meshes and the triangle enumeration boundary for tristep.
//!
//! The encoder never looks at index buffers: it consumes a stream of
//! triangles given as three absolute corner positions. [`TriangleSource`]
//! is that stream. [`TriangleMesh`], [`MeshInstance`] and [`Model`] are the
//! in-memory shapes callers usually hold, and they all flatten themselves
//! into corner triples, applying instance transforms on the way.

mod error;
mod mesh;
mod model;
#[cfg(feature = "stl")]
mod stl;

pub use error::MeshError;
pub use mesh::TriangleMesh;
pub use model::{MeshInstance, Model};
#[cfg(feature = "stl")]
pub use stl::{load_stl, read_stl};

use tristep_math::Point3;

/// One triangle as three absolute corner positions, in winding order.
pub type Triangle = [Point3; 3];

/// Callback-driven triangle enumeration.
///
/// Implementors call `visit` once per triangle in their own insertion order.
/// That order is significant: it becomes the face order of the export.
pub trait TriangleSource {
    /// Invoke `visit` for every triangle.
    fn for_each_triangle(&self, visit: &mut dyn FnMut(Triangle));

    /// Number of triangles `for_each_triangle` will produce.
    fn triangle_count(&self) -> usize {
        let mut count = 0;
        self.for_each_triangle(&mut |_| count += 1);
        count
    }
}

impl TriangleSource for [Triangle] {
    fn for_each_triangle(&self, visit: &mut dyn FnMut(Triangle)) {
        self.iter().for_each(|t| visit(*t));
    }

    fn triangle_count(&self) -> usize {
        self.len()
    }
}

impl TriangleSource for Vec<Triangle> {
    fn for_each_triangle(&self, visit: &mut dyn FnMut(Triangle)) {
        self.as_slice().for_each_triangle(visit);
    }

    fn triangle_count(&self) -> usize {
        self.len()
    }
}

impl<T: TriangleSource + ?Sized> TriangleSource for &T {
    fn for_each_triangle(&self, visit: &mut dyn FnMut(Triangle)) {
        (**self).for_each_triangle(visit);
    }

    fn triangle_count(&self) -> usize {
        (**self).triangle_count()
    }
}
