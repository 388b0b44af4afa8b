//! Triangle-to-B-rep graph construction.
//!
//! Each triangle becomes one planar `ADVANCED_FACE`:
//!
//! ```text
//! ADVANCED_FACE ─┬─ FACE_OUTER_BOUND ── EDGE_LOOP ── 3 × ORIENTED_EDGE ── EDGE_CURVE ─┬─ VERTEX_POINT × 2
//!                │                                                                 └─ LINE ── VECTOR ── DIRECTION
//!                └─ PLANE ── AXIS2_PLACEMENT_3D ── CARTESIAN_POINT, DIRECTION × 2
//! ```
//!
//! Edges are not shared between faces; only vertices are deduplicated.

use crate::dedup::{VertexHandle, VertexTable};
use crate::entity::{EntityKind, EntityRef, Field};
use crate::error::StepError;
use crate::graph::{EntityGraph, SealedGraph};
use crate::options::StepOptions;
use crate::product;
use crate::ExportStats;
use tristep_math::{edge_direction, reference_direction, unit_normal, Dir3, Point3};
use tristep_mesh::Triangle;

/// Incrementally builds the entity graph for one export.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: EntityGraph,
    vertices: VertexTable,
    faces: Vec<EntityRef>,
    degenerate: usize,
}

/// Output of [`GraphBuilder::finish`].
#[derive(Debug)]
pub struct BuiltGraph {
    /// The sealed entity graph.
    pub graph: SealedGraph,
    /// The `MANIFOLD_SOLID_BREP` entity.
    pub solid: EntityRef,
    /// Counts gathered while building.
    pub stats: ExportStats,
}

impl GraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles added so far.
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Add one triangle and return its `ADVANCED_FACE`.
    ///
    /// Degenerate triangles are kept, with a `+Z` normal. Non-finite corners
    /// are rejected before any entity is created.
    pub fn add_triangle(&mut self, triangle: Triangle) -> Result<EntityRef, StepError> {
        let index = self.faces.len();
        if let Some(p) = triangle
            .iter()
            .find(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(StepError::non_finite(index, p));
        }

        let corners = triangle.map(|p| self.vertices.intern(&mut self.graph, &p));
        let normal = unit_normal(&triangle[0], &triangle[1], &triangle[2]);
        if normal.degenerate {
            self.degenerate += 1;
            tracing::debug!("triangle {index} is degenerate; using +Z normal");
        }

        let edges: [EntityRef; 3] = std::array::from_fn(|i| {
            let j = (i + 1) % 3;
            self.add_edge(
                (&triangle[i], corners[i]),
                (&triangle[j], corners[j]),
            )
        });

        let edge_loop = self
            .graph
            .push(EntityKind::EdgeLoop, vec![Field::label(), Field::refs(edges)]);
        let bound = self.graph.push(
            EntityKind::FaceOuterBound,
            vec![Field::label(), Field::Ref(edge_loop), Field::Bool(true)],
        );

        let axis = self.add_direction(&normal.dir);
        let ref_direction = self.add_direction(&reference_direction(&normal.dir));
        let placement = self.graph.push(
            EntityKind::Axis2Placement3D,
            vec![
                Field::label(),
                Field::Ref(corners[0].point),
                Field::Ref(axis),
                Field::Ref(ref_direction),
            ],
        );
        let plane = self
            .graph
            .push(EntityKind::Plane, vec![Field::label(), Field::Ref(placement)]);

        let face = self.graph.push(
            EntityKind::AdvancedFace,
            vec![
                Field::label(),
                Field::refs([bound]),
                Field::Ref(plane),
                Field::Bool(true),
            ],
        );
        self.faces.push(face);
        Ok(face)
    }

    /// Straight edge from `start` to `end`, returned as its `ORIENTED_EDGE`.
    fn add_edge(
        &mut self,
        (start_pos, start): (&Point3, VertexHandle),
        (end_pos, end): (&Point3, VertexHandle),
    ) -> EntityRef {
        let dir = self.add_direction(&edge_direction(start_pos, end_pos));
        let vector = self.graph.push(
            EntityKind::Vector,
            vec![Field::label(), Field::Ref(dir), Field::Real(1.0)],
        );
        let line = self.graph.push(
            EntityKind::Line,
            vec![Field::label(), Field::Ref(start.point), Field::Ref(vector)],
        );
        let curve = self.graph.push(
            EntityKind::EdgeCurve,
            vec![
                Field::label(),
                Field::Ref(start.vertex),
                Field::Ref(end.vertex),
                Field::Ref(line),
                Field::Bool(true),
            ],
        );
        self.graph.push(
            EntityKind::OrientedEdge,
            vec![
                Field::label(),
                Field::Derived,
                Field::Derived,
                Field::Ref(curve),
                Field::Bool(true),
            ],
        )
    }

    fn add_direction(&mut self, d: &Dir3) -> EntityRef {
        // `+ 0.0` keeps negative zero out of the output.
        self.graph.push(
            EntityKind::Direction,
            vec![Field::label(), Field::triple(d.x + 0.0, d.y + 0.0, d.z + 0.0)],
        )
    }

    /// Close the shell, wrap it in a solid and the product structure, and
    /// seal the graph.
    pub fn finish(mut self, options: &StepOptions) -> BuiltGraph {
        if self.faces.is_empty() {
            tracing::warn!("no triangles to export; writing an empty closed shell");
        }
        let shell = self.graph.push(
            EntityKind::ClosedShell,
            vec![Field::label(), Field::refs(self.faces.iter().copied())],
        );
        let solid = self.graph.push(
            EntityKind::ManifoldSolidBrep,
            vec![Field::string(options.product_name.as_str()), Field::Ref(shell)],
        );
        product::add_product_structure(&mut self.graph, solid, options);

        let stats = ExportStats {
            triangles: self.faces.len(),
            vertices: self.vertices.len(),
            degenerate_triangles: self.degenerate,
            entities: self.graph.len(),
        };
        tracing::debug!(
            "built entity graph: {} entities, {} faces, {} vertices",
            stats.entities,
            stats.triangles,
            stats.vertices
        );
        BuiltGraph {
            graph: self.graph.seal(),
            solid,
            stats,
        }
    }
}
