//! Typed STEP entity records.
//!
//! An [`Entity`] is a kind plus an ordered list of [`Field`]s. References
//! between entities are [`EntityRef`]s: positions in the owning
//! [`EntityGraph`](crate::graph::EntityGraph), never numeric `#n` ids. Ids
//! exist only while the sealed graph is being written.

/// Reference to an entity by its position in the graph.
///
/// Only [`EntityGraph::push`](crate::graph::EntityGraph::push) creates refs,
/// so a ref always points at an entity that already exists. Each ref also
/// carries the id of the graph that issued it; the writer refuses refs from
/// any other graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef {
    pub(crate) graph: u64,
    pub(crate) index: usize,
}

impl EntityRef {
    /// Position of the referenced entity in creation order.
    pub fn index(self) -> usize {
        self.index
    }
}

/// A single argument value of a STEP entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Reference to another entity, rendered as `#id`.
    Ref(EntityRef),
    /// String literal.
    String(String),
    /// Real number.
    Real(f64),
    /// Integer number.
    Integer(i64),
    /// Enumeration, rendered as `.NAME.`.
    Enum(&'static str),
    /// Boolean / logical, rendered as `.T.` or `.F.`.
    Bool(bool),
    /// List of values (nested in parentheses).
    List(Vec<Field>),
    /// Derived value (`*`).
    Derived,
    /// Unset value (`$`).
    Unset,
    /// Typed value `TYPE_NAME(args)`: a measure such as
    /// `LENGTH_MEASURE(1.0E-7)` or one record of a complex instance.
    Typed {
        /// The type name.
        type_name: &'static str,
        /// Arguments.
        args: Vec<Field>,
    },
}

impl Field {
    /// Empty label, the `''` name every geometric item carries.
    pub fn label() -> Self {
        Field::String(String::new())
    }

    /// String field.
    pub fn string(s: impl Into<String>) -> Self {
        Field::String(s.into())
    }

    /// Coordinate triple `(x,y,z)`.
    pub fn triple(x: f64, y: f64, z: f64) -> Self {
        Field::List(vec![Field::Real(x), Field::Real(y), Field::Real(z)])
    }

    /// List of references.
    pub fn refs(refs: impl IntoIterator<Item = EntityRef>) -> Self {
        Field::List(refs.into_iter().map(Field::Ref).collect())
    }

    /// Typed value or complex-instance record.
    pub fn typed(type_name: &'static str, args: Vec<Field>) -> Self {
        Field::Typed { type_name, args }
    }

    /// Visit every entity reference in this field, depth-first.
    pub fn for_each_ref(&self, f: &mut impl FnMut(EntityRef)) {
        match self {
            Field::Ref(r) => f(*r),
            Field::List(items) | Field::Typed { args: items, .. } => {
                items.iter().for_each(|item| item.for_each_ref(f))
            }
            _ => {}
        }
    }
}

/// Kind of a STEP entity. Each kind has a fixed keyword and field count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    // Geometry
    /// `CARTESIAN_POINT(name, coordinates)`
    CartesianPoint,
    /// `DIRECTION(name, ratios)`
    Direction,
    /// `VECTOR(name, orientation, magnitude)`
    Vector,
    /// `LINE(name, pnt, dir)`
    Line,
    /// `AXIS2_PLACEMENT_3D(name, location, axis, ref_direction)`
    Axis2Placement3D,
    /// `PLANE(name, position)`
    Plane,

    // Topology
    /// `VERTEX_POINT(name, vertex_geometry)`
    VertexPoint,
    /// `EDGE_CURVE(name, edge_start, edge_end, edge_geometry, same_sense)`
    EdgeCurve,
    /// `ORIENTED_EDGE(name, *, *, edge_element, orientation)`
    OrientedEdge,
    /// `EDGE_LOOP(name, edge_list)`
    EdgeLoop,
    /// `FACE_OUTER_BOUND(name, bound, orientation)`
    FaceOuterBound,
    /// `ADVANCED_FACE(name, bounds, face_geometry, same_sense)`
    AdvancedFace,
    /// `CLOSED_SHELL(name, cfs_faces)`
    ClosedShell,
    /// `MANIFOLD_SOLID_BREP(name, outer)`
    ManifoldSolidBrep,

    // Product structure
    /// `APPLICATION_CONTEXT(application)`
    ApplicationContext,
    /// `APPLICATION_PROTOCOL_DEFINITION(status, schema, year, context)`
    ApplicationProtocolDefinition,
    /// `PRODUCT_CONTEXT(name, frame_of_reference, discipline_type)`
    ProductContext,
    /// `PRODUCT(id, name, description, frame_of_reference)`
    Product,
    /// `PRODUCT_DEFINITION_FORMATION(id, description, of_product)`
    ProductDefinitionFormation,
    /// `PRODUCT_DEFINITION_CONTEXT(name, frame_of_reference, life_cycle_stage)`
    ProductDefinitionContext,
    /// `PRODUCT_DEFINITION(id, description, formation, frame_of_reference)`
    ProductDefinition,
    /// `PRODUCT_DEFINITION_SHAPE(name, description, definition)`
    ProductDefinitionShape,
    /// `SHAPE_DEFINITION_REPRESENTATION(definition, used_representation)`
    ShapeDefinitionRepresentation,
    /// `ADVANCED_BREP_SHAPE_REPRESENTATION(name, items, context_of_items)`
    AdvancedBrepShapeRepresentation,

    // Units and representation context
    /// Complex `(LENGTH_UNIT() NAMED_UNIT(*) SI_UNIT(prefix, .METRE.))`
    LengthUnit,
    /// Complex `(NAMED_UNIT(*) PLANE_ANGLE_UNIT() SI_UNIT($, .RADIAN.))`
    PlaneAngleUnit,
    /// Complex `(NAMED_UNIT(*) SI_UNIT($, .STERADIAN.) SOLID_ANGLE_UNIT())`
    SolidAngleUnit,
    /// `UNCERTAINTY_MEASURE_WITH_UNIT(value, unit, name, description)`
    UncertaintyMeasureWithUnit,
    /// Complex geometric representation context with units and uncertainty.
    GeometricRepresentationContext,
}

impl EntityKind {
    /// STEP keyword, or `None` for complex instances whose records carry
    /// their own keywords.
    pub fn keyword(self) -> Option<&'static str> {
        use EntityKind::*;
        Some(match self {
            CartesianPoint => "CARTESIAN_POINT",
            Direction => "DIRECTION",
            Vector => "VECTOR",
            Line => "LINE",
            Axis2Placement3D => "AXIS2_PLACEMENT_3D",
            Plane => "PLANE",
            VertexPoint => "VERTEX_POINT",
            EdgeCurve => "EDGE_CURVE",
            OrientedEdge => "ORIENTED_EDGE",
            EdgeLoop => "EDGE_LOOP",
            FaceOuterBound => "FACE_OUTER_BOUND",
            AdvancedFace => "ADVANCED_FACE",
            ClosedShell => "CLOSED_SHELL",
            ManifoldSolidBrep => "MANIFOLD_SOLID_BREP",
            ApplicationContext => "APPLICATION_CONTEXT",
            ApplicationProtocolDefinition => "APPLICATION_PROTOCOL_DEFINITION",
            ProductContext => "PRODUCT_CONTEXT",
            Product => "PRODUCT",
            ProductDefinitionFormation => "PRODUCT_DEFINITION_FORMATION",
            ProductDefinitionContext => "PRODUCT_DEFINITION_CONTEXT",
            ProductDefinition => "PRODUCT_DEFINITION",
            ProductDefinitionShape => "PRODUCT_DEFINITION_SHAPE",
            ShapeDefinitionRepresentation => "SHAPE_DEFINITION_REPRESENTATION",
            AdvancedBrepShapeRepresentation => "ADVANCED_BREP_SHAPE_REPRESENTATION",
            UncertaintyMeasureWithUnit => "UNCERTAINTY_MEASURE_WITH_UNIT",
            LengthUnit | PlaneAngleUnit | SolidAngleUnit | GeometricRepresentationContext => {
                return None
            }
        })
    }

    /// Whether instances render as `( RECORD(..) RECORD(..) )`.
    pub fn is_complex(self) -> bool {
        self.keyword().is_none()
    }

    /// Number of fields. For complex kinds, the number of records.
    pub fn arity(self) -> usize {
        use EntityKind::*;
        match self {
            ApplicationContext => 1,
            CartesianPoint | Direction | Plane | VertexPoint | EdgeLoop | ClosedShell
            | ManifoldSolidBrep | ShapeDefinitionRepresentation => 2,
            Vector | Line | FaceOuterBound | ProductContext | ProductDefinitionFormation
            | ProductDefinitionContext | ProductDefinitionShape
            | AdvancedBrepShapeRepresentation | LengthUnit | PlaneAngleUnit | SolidAngleUnit => 3,
            Axis2Placement3D | AdvancedFace | ApplicationProtocolDefinition | Product
            | ProductDefinition | UncertaintyMeasureWithUnit | GeometricRepresentationContext => 4,
            EdgeCurve | OrientedEdge => 5,
        }
    }
}

/// A STEP entity instance before id assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Entity kind.
    pub kind: EntityKind,
    /// Arguments in schema order (records, for complex kinds).
    pub fields: Vec<Field>,
}

impl Entity {
    /// Visit every entity this one references.
    pub fn for_each_ref(&self, mut f: impl FnMut(EntityRef)) {
        self.fields.iter().for_each(|field| field.for_each_ref(&mut f));
    }
}
