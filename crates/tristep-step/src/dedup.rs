//! Vertex deduplication.
//!
//! Corners are keyed by the exact bits of their coordinates, so two corners
//! share a `CARTESIAN_POINT` only when all three coordinates are equal as
//! `f64` values. There is no tolerance welding: corners that differ in the
//! last bit stay distinct.

use crate::entity::{EntityKind, EntityRef, Field};
use crate::graph::EntityGraph;
use indexmap::IndexMap;
use tristep_math::Point3;

/// Exact-value key of a vertex.
///
/// `-0.0` is folded into `0.0` first because the two compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct VertexKey([u64; 3]);

impl VertexKey {
    fn new(p: &Point3) -> Self {
        let bits = |v: f64| (v + 0.0).to_bits();
        Self([bits(p.x), bits(p.y), bits(p.z)])
    }
}

/// Entities standing for one distinct vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexHandle {
    /// The `CARTESIAN_POINT` carrying the coordinates.
    pub point: EntityRef,
    /// The `VERTEX_POINT` wrapping it, used as edge endpoint.
    pub vertex: EntityRef,
}

/// Maps coordinate triples to their point entities in first-seen order.
#[derive(Debug, Default)]
pub struct VertexTable {
    handles: IndexMap<VertexKey, VertexHandle>,
}

impl VertexTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `p`, creating its entities on first sight.
    pub fn intern(&mut self, graph: &mut EntityGraph, p: &Point3) -> VertexHandle {
        *self.handles.entry(VertexKey::new(p)).or_insert_with(|| {
            let point = graph.push(
                EntityKind::CartesianPoint,
                vec![Field::label(), Field::triple(p.x + 0.0, p.y + 0.0, p.z + 0.0)],
            );
            let vertex = graph.push(EntityKind::VertexPoint, vec![Field::label(), Field::Ref(point)]);
            VertexHandle { point, vertex }
        })
    }

    /// Number of distinct vertices seen.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// True when no vertex has been interned.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Handles in first-seen order.
    pub fn handles(&self) -> impl Iterator<Item = &VertexHandle> {
        self.handles.values()
    }
}
