//! Models made of transformed mesh instances.

use crate::{Triangle, TriangleMesh, TriangleSource};
use tristep_math::Transform;

/// A mesh placed in the model by an affine transform.
#[derive(Debug, Clone, Default)]
pub struct MeshInstance {
    /// The instanced geometry.
    pub mesh: TriangleMesh,
    /// Placement of the mesh in model space.
    pub transform: Transform,
}

impl MeshInstance {
    /// Place `mesh` with `transform`.
    pub fn new(mesh: TriangleMesh, transform: Transform) -> Self {
        Self { mesh, transform }
    }
}

impl TriangleSource for MeshInstance {
    /// Yields model-space corners. A mirroring transform swaps the last two
    /// corners so the winding, and therefore the face normal, stays outward.
    fn for_each_triangle(&self, visit: &mut dyn FnMut(Triangle)) {
        let mirrored = self.transform.is_mirroring();
        self.mesh.for_each_triangle(&mut |[a, b, c]| {
            let a = self.transform.apply_point(&a);
            let b = self.transform.apply_point(&b);
            let c = self.transform.apply_point(&c);
            if mirrored {
                visit([a, c, b]);
            } else {
                visit([a, b, c]);
            }
        });
    }

    fn triangle_count(&self) -> usize {
        self.mesh.num_triangles()
    }
}

/// A named collection of mesh instances, enumerated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// Model name.
    pub name: String,
    instances: Vec<MeshInstance>,
}

impl Model {
    /// Create an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instances: Vec::new(),
        }
    }

    /// Add a mesh at the identity placement.
    pub fn add_mesh(&mut self, mesh: TriangleMesh) {
        self.instances.push(MeshInstance::new(mesh, Transform::identity()));
    }

    /// Add a placed mesh instance.
    pub fn add_instance(&mut self, instance: MeshInstance) {
        self.instances.push(instance);
    }

    /// Mesh instances in insertion order.
    pub fn instances(&self) -> &[MeshInstance] {
        &self.instances
    }

    /// True when the model has no triangles at all.
    pub fn is_empty(&self) -> bool {
        self.instances.iter().all(|i| i.mesh.num_triangles() == 0)
    }
}

impl TriangleSource for Model {
    fn for_each_triangle(&self, visit: &mut dyn FnMut(Triangle)) {
        for instance in &self.instances {
            instance.for_each_triangle(visit);
        }
    }

    fn triangle_count(&self) -> usize {
        self.instances.iter().map(|i| i.triangle_count()).sum()
    }
}
