//! Product structure anchoring the solid as a named part.
//!
//! Readers locate geometry through
//! `SHAPE_DEFINITION_REPRESENTATION -> PRODUCT_DEFINITION_SHAPE -> PRODUCT_DEFINITION`,
//! and interpret coordinates through the representation context's units.

use crate::entity::{EntityKind, EntityRef, Field};
use crate::graph::EntityGraph;
use crate::options::StepOptions;

/// Distance uncertainty declared in the representation context.
const DISTANCE_UNCERTAINTY: f64 = 1.0e-7;

/// Append the product, units and shape representation for `solid`.
///
/// Returns the `SHAPE_DEFINITION_REPRESENTATION`.
pub fn add_product_structure(
    graph: &mut EntityGraph,
    solid: EntityRef,
    options: &StepOptions,
) -> EntityRef {
    let schema = options.schema;
    let app_ctx = graph.push(
        EntityKind::ApplicationContext,
        vec![Field::string(schema.application())],
    );
    let (protocol, year) = schema.protocol();
    graph.push(
        EntityKind::ApplicationProtocolDefinition,
        vec![
            Field::string("international standard"),
            Field::string(protocol),
            Field::Integer(year),
            Field::Ref(app_ctx),
        ],
    );
    let product_ctx = graph.push(
        EntityKind::ProductContext,
        vec![Field::label(), Field::Ref(app_ctx), Field::string("mechanical")],
    );
    let product = graph.push(
        EntityKind::Product,
        vec![
            Field::string(options.product_name.as_str()),
            Field::string(options.product_name.as_str()),
            Field::string(options.product_description.as_str()),
            Field::refs([product_ctx]),
        ],
    );
    let formation = graph.push(
        EntityKind::ProductDefinitionFormation,
        vec![Field::label(), Field::label(), Field::Ref(product)],
    );
    let definition_ctx = graph.push(
        EntityKind::ProductDefinitionContext,
        vec![
            Field::string("part definition"),
            Field::Ref(app_ctx),
            Field::string("design"),
        ],
    );
    let definition = graph.push(
        EntityKind::ProductDefinition,
        vec![
            Field::string("design"),
            Field::label(),
            Field::Ref(formation),
            Field::Ref(definition_ctx),
        ],
    );
    let definition_shape = graph.push(
        EntityKind::ProductDefinitionShape,
        vec![Field::label(), Field::label(), Field::Ref(definition)],
    );

    let context = add_representation_context(graph, options);
    let representation = graph.push(
        EntityKind::AdvancedBrepShapeRepresentation,
        vec![
            Field::string(options.product_name.as_str()),
            Field::refs([solid]),
            Field::Ref(context),
        ],
    );
    graph.push(
        EntityKind::ShapeDefinitionRepresentation,
        vec![Field::Ref(definition_shape), Field::Ref(representation)],
    )
}

/// Units, uncertainty and the 3D geometric context that binds them.
fn add_representation_context(graph: &mut EntityGraph, options: &StepOptions) -> EntityRef {
    let prefix = match options.unit.si_prefix() {
        Some(p) => Field::Enum(p),
        None => Field::Unset,
    };
    let length = graph.push(
        EntityKind::LengthUnit,
        vec![
            Field::typed("LENGTH_UNIT", vec![]),
            Field::typed("NAMED_UNIT", vec![Field::Derived]),
            Field::typed("SI_UNIT", vec![prefix, Field::Enum("METRE")]),
        ],
    );
    let plane_angle = graph.push(
        EntityKind::PlaneAngleUnit,
        vec![
            Field::typed("NAMED_UNIT", vec![Field::Derived]),
            Field::typed("PLANE_ANGLE_UNIT", vec![]),
            Field::typed("SI_UNIT", vec![Field::Unset, Field::Enum("RADIAN")]),
        ],
    );
    let solid_angle = graph.push(
        EntityKind::SolidAngleUnit,
        vec![
            Field::typed("NAMED_UNIT", vec![Field::Derived]),
            Field::typed("SI_UNIT", vec![Field::Unset, Field::Enum("STERADIAN")]),
            Field::typed("SOLID_ANGLE_UNIT", vec![]),
        ],
    );
    let uncertainty = graph.push(
        EntityKind::UncertaintyMeasureWithUnit,
        vec![
            Field::typed("LENGTH_MEASURE", vec![Field::Real(DISTANCE_UNCERTAINTY)]),
            Field::Ref(length),
            Field::string("distance_accuracy_value"),
            Field::string("confusion accuracy"),
        ],
    );
    graph.push(
        EntityKind::GeometricRepresentationContext,
        vec![
            Field::typed("GEOMETRIC_REPRESENTATION_CONTEXT", vec![Field::Integer(3)]),
            Field::typed(
                "GLOBAL_UNCERTAINTY_ASSIGNED_CONTEXT",
                vec![Field::refs([uncertainty])],
            ),
            Field::typed(
                "GLOBAL_UNIT_ASSIGNED_CONTEXT",
                vec![Field::refs([length, plane_angle, solid_angle])],
            ),
            Field::typed(
                "REPRESENTATION_CONTEXT",
                vec![Field::string("3D"), Field::string("3D context with units")],
            ),
        ],
    )
}
