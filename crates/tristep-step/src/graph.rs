//! Entity arena.
//!
//! Entities are appended in dependency order and addressed by position.
//! Building and writing are separate phases: [`EntityGraph::seal`] turns the
//! mutable arena into a [`SealedGraph`], and only a sealed graph can be
//! handed to the writer, so no id is ever produced for a graph that is still
//! growing.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::entity::{Entity, EntityKind, EntityRef, Field};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Growable arena of STEP entities in creation order.
#[derive(Debug)]
pub struct EntityGraph {
    id: u64,
    entities: Vec<Entity>,
}

impl Default for EntityGraph {
    fn default() -> Self {
        Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            entities: Vec::new(),
        }
    }
}

impl EntityGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity and return a reference to it.
    ///
    /// Every ref among `fields` must come from this graph; since refs are
    /// only created here, they always point at earlier entities.
    pub fn push(&mut self, kind: EntityKind, fields: Vec<Field>) -> EntityRef {
        debug_assert_eq!(
            fields.len(),
            kind.arity(),
            "{kind:?} takes {} fields",
            kind.arity()
        );
        let next = self.entities.len();
        debug_assert!(
            fields.iter().all(|f| {
                let mut ok = true;
                f.for_each_ref(&mut |r| ok &= r.graph == self.id && r.index < next);
                ok
            }),
            "{kind:?} references an entity outside this graph"
        );
        self.entities.push(Entity { kind, fields });
        EntityRef {
            graph: self.id,
            index: next,
        }
    }

    /// Number of entities so far.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when no entity has been added.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity at `r`, `None` for a ref issued by another graph.
    pub fn get(&self, r: EntityRef) -> Option<&Entity> {
        (r.graph == self.id).then(|| self.entities.get(r.index)).flatten()
    }

    /// Close the graph for writing.
    pub fn seal(self) -> SealedGraph {
        SealedGraph {
            id: self.id,
            entities: self.entities,
        }
    }
}

/// A completed, immutable entity graph ready for id assignment.
#[derive(Debug)]
pub struct SealedGraph {
    id: u64,
    entities: Vec<Entity>,
}

impl SealedGraph {
    /// Entities in creation order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when the graph holds no entity.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity at `r`, `None` for a ref issued by another graph.
    pub fn get(&self, r: EntityRef) -> Option<&Entity> {
        (r.graph == self.id).then(|| self.entities.get(r.index)).flatten()
    }

    /// Whether `r` was issued by the graph this one was sealed from.
    pub fn owns(&self, r: EntityRef) -> bool {
        r.graph == self.id && r.index < self.entities.len()
    }

    /// Number of entities of `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }
}
