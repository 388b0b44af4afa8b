#![warn(missing_docs)]

//! Triangle mesh to STEP (ISO 10303-21) encoder.
//!
//! Every triangle becomes a planar `ADVANCED_FACE` bounded by three straight
//! edges; the faces form one `CLOSED_SHELL` inside a `MANIFOLD_SOLID_BREP`,
//! anchored in an AP203 (or AP214) product structure.
//!
//! Export runs in two phases. The builder appends typed entities to an
//! arena and links them by position; only once the arena is sealed does the
//! writer number them `#1..#N` in creation order. A reference can therefore
//! never point at an entity that was not written.
//!
//! # Example
//!
//! ```
//! use tristep_math::Point3;
//! use tristep_step::{StepExporter, StepOptions};
//!
//! let triangles = vec![[
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ]];
//! let exporter = StepExporter::new(StepOptions::default());
//! let file = exporter.export(&triangles).unwrap();
//! assert_eq!(file.name, "model.step");
//! assert!(file.content.contains("ADVANCED_FACE"));
//! ```

mod builder;
mod dedup;
mod document;
mod entity;
mod error;
mod graph;
mod options;
mod product;
mod writer;

pub use builder::{BuiltGraph, GraphBuilder};
pub use dedup::{VertexHandle, VertexTable};
pub use document::ExportedFile;
pub use entity::{Entity, EntityKind, EntityRef, Field};
pub use error::StepError;
pub use graph::{EntityGraph, SealedGraph};
pub use options::{LengthUnit, Schema, StepOptions};
pub use writer::{format_real, format_string, write_data_section, Resolver};

use serde::{Deserialize, Serialize};
use tristep_mesh::{Triangle, TriangleSource};

/// File extensions handled by [`StepExporter`].
const EXTENSIONS: [&str; 2] = ["step", "stp"];

/// Counts describing one export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExportStats {
    /// Triangles read, one `ADVANCED_FACE` each.
    pub triangles: usize,
    /// Distinct vertices, one `CARTESIAN_POINT` each.
    pub vertices: usize,
    /// Triangles that fell back to the `+Z` normal.
    pub degenerate_triangles: usize,
    /// Entities in the data section.
    pub entities: usize,
}

/// Mesh to STEP exporter.
#[derive(Debug, Clone, Default)]
pub struct StepExporter {
    options: StepOptions,
}

impl StepExporter {
    /// Create an exporter with the given options.
    pub fn new(options: StepOptions) -> Self {
        Self { options }
    }

    /// Options used for every export.
    pub fn options(&self) -> &StepOptions {
        &self.options
    }

    /// Whether this exporter produces files with `extension`.
    pub fn can_export(&self, extension: &str) -> bool {
        EXTENSIONS
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }

    /// Export every triangle of `source`, in the order it yields them.
    ///
    /// The first triangle with a non-finite coordinate aborts the export.
    pub fn export<S: TriangleSource + ?Sized>(&self, source: &S) -> Result<ExportedFile, StepError> {
        let mut builder = GraphBuilder::new();
        let mut failure = None;
        source.for_each_triangle(&mut |triangle| {
            if failure.is_none() {
                if let Err(e) = builder.add_triangle(triangle) {
                    failure = Some(e);
                }
            }
        });
        if let Some(e) = failure {
            return Err(e);
        }
        self.finish(builder)
    }

    /// Export a triangle iterator.
    pub fn export_triangles<I>(&self, triangles: I) -> Result<ExportedFile, StepError>
    where
        I: IntoIterator<Item = Triangle>,
    {
        let mut builder = GraphBuilder::new();
        for triangle in triangles {
            builder.add_triangle(triangle)?;
        }
        self.finish(builder)
    }

    fn finish(&self, builder: GraphBuilder) -> Result<ExportedFile, StepError> {
        let built = builder.finish(&self.options);
        let file = document::assemble(&built, &self.options)?;
        tracing::debug!(
            "encoded {} ({} bytes, {} entities)",
            file.name,
            file.content.len(),
            file.stats.entities
        );
        Ok(file)
    }
}

/// Export `source` with default options.
pub fn export_step<S: TriangleSource + ?Sized>(source: &S) -> Result<ExportedFile, StepError> {
    StepExporter::default().export(source)
}
