//! End-to-end checks on generated STEP text.

use std::collections::{BTreeSet, HashMap};

use approx::assert_relative_eq;
use tristep_math::{Point3, Transform};
use tristep_mesh::{MeshInstance, Model, Triangle, TriangleMesh};
use tristep_step::{export_step, StepExporter, StepOptions};

fn options() -> StepOptions {
    StepOptions {
        timestamp: Some("2024-01-01T00:00:00".into()),
        ..StepOptions::default()
    }
}

fn export(triangles: &[Triangle]) -> String {
    StepExporter::new(options()).export(triangles).unwrap().content
}

/// Data section as `id -> (keyword, args)`.
fn data_lines(content: &str) -> Vec<(u64, String, String)> {
    let data = content
        .split("DATA;\n")
        .nth(1)
        .and_then(|rest| rest.split("ENDSEC;").next())
        .unwrap();
    data.lines()
        .map(|line| {
            let (id, body) = line.split_once(" = ").unwrap();
            let id = id.trim_start_matches('#').parse().unwrap();
            let body = body.strip_suffix(';').unwrap();
            let (keyword, args) = match body.find('(') {
                Some(0) => (String::new(), body.to_string()),
                Some(i) => (body[..i].to_string(), body[i..].to_string()),
                None => (body.to_string(), String::new()),
            };
            (id, keyword, args)
        })
        .collect()
}

/// Every `#n` in `args`, skipping quoted strings.
fn refs(args: &str) -> Vec<u64> {
    let mut out = Vec::new();
    let mut chars = args.chars().peekable();
    let mut in_string = false;
    while let Some(c) = chars.next() {
        match c {
            '\'' => in_string = !in_string,
            '#' if !in_string => {
                let mut n = String::new();
                while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                    n.push(*d);
                    chars.next();
                }
                out.push(n.parse().unwrap());
            }
            _ => {}
        }
    }
    out
}

fn count(content: &str, keyword: &str) -> usize {
    data_lines(content)
        .iter()
        .filter(|(_, k, _)| k == keyword)
        .count()
}

fn triples(args: &str) -> Vec<f64> {
    let inner = args.rsplit_once(",(").unwrap().1;
    inner
        .trim_end_matches(')')
        .split(',')
        .map(|v| v.parse().unwrap())
        .collect()
}

fn unit_triangle() -> Triangle {
    [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ]
}

fn unit_square() -> Vec<Triangle> {
    vec![
        unit_triangle(),
        [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
    ]
}

fn cube() -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    for i in 0..8 {
        mesh.add_vertex(Point3::new(
            (i & 1) as f64,
            ((i >> 1) & 1) as f64,
            ((i >> 2) & 1) as f64,
        ))
        .unwrap();
    }
    let quads = [
        [0, 2, 3, 1],
        [4, 5, 7, 6],
        [0, 1, 5, 4],
        [2, 6, 7, 3],
        [0, 4, 6, 2],
        [1, 3, 7, 5],
    ];
    for [a, b, c, d] in quads {
        mesh.add_triangle(a, b, c).unwrap();
        mesh.add_triangle(a, c, d).unwrap();
    }
    mesh
}

#[test]
fn test_single_triangle_scenario() {
    let content = export(&[unit_triangle()]);
    assert_eq!(count(&content, "CARTESIAN_POINT"), 3);
    assert_eq!(count(&content, "ADVANCED_FACE"), 1);
    assert_eq!(count(&content, "CLOSED_SHELL"), 1);

    let lines = data_lines(&content);
    let face_id = lines
        .iter()
        .find(|(_, k, _)| k == "ADVANCED_FACE")
        .map(|(id, _, _)| *id)
        .unwrap();
    let shell = lines.iter().find(|(_, k, _)| k == "CLOSED_SHELL").unwrap();
    assert_eq!(refs(&shell.2), vec![face_id]);

    assert!(content.contains("DIRECTION('',(0.0,0.0,1.0));"));
    assert!(content.contains("CARTESIAN_POINT('',(0.0,0.0,0.0));"));
}

#[test]
fn test_unit_square_scenario() {
    let content = export(&unit_square());
    assert_eq!(count(&content, "CARTESIAN_POINT"), 4);
    assert_eq!(count(&content, "ADVANCED_FACE"), 2);
    assert_eq!(count(&content, "EDGE_CURVE"), 6);
}

#[test]
fn test_point_count_matches_distinct_vertices() {
    let mesh = cube();
    let file = StepExporter::new(options()).export(&mesh).unwrap();
    assert_eq!(count(&file.content, "CARTESIAN_POINT"), 8);
    assert_eq!(count(&file.content, "VERTEX_POINT"), 8);
    assert_eq!(count(&file.content, "ADVANCED_FACE"), 12);
    assert_eq!(file.stats.vertices, 8);
    assert_eq!(file.stats.triangles, 12);
    assert_eq!(file.stats.degenerate_triangles, 0);
}

#[test]
fn test_reference_closure_and_contiguity() {
    let content = export_step(&cube()).unwrap().content;
    let lines = data_lines(&content);
    let ids: Vec<u64> = lines.iter().map(|(id, _, _)| *id).collect();
    let expected: Vec<u64> = (1..=lines.len() as u64).collect();
    assert_eq!(ids, expected);

    let defined: BTreeSet<u64> = ids.iter().copied().collect();
    for (id, _, args) in &lines {
        for r in refs(args) {
            assert!(defined.contains(&r), "#{id} references undefined #{r}");
            assert!(r < *id, "#{id} references later #{r}");
        }
    }
}

#[test]
fn test_reference_types() {
    let content = export(&unit_square());
    let lines = data_lines(&content);
    let kinds: HashMap<u64, &str> = lines
        .iter()
        .map(|(id, k, _)| (*id, k.as_str()))
        .collect();
    let expect = |keyword: &str, position: usize, target: &str| {
        for (_, _, args) in lines.iter().filter(|(_, k, _)| k == keyword) {
            let r = refs(args)[position];
            assert_eq!(kinds[&r], target, "{keyword} ref {position}");
        }
    };
    expect("VERTEX_POINT", 0, "CARTESIAN_POINT");
    expect("VECTOR", 0, "DIRECTION");
    expect("LINE", 0, "CARTESIAN_POINT");
    expect("LINE", 1, "VECTOR");
    expect("EDGE_CURVE", 0, "VERTEX_POINT");
    expect("EDGE_CURVE", 1, "VERTEX_POINT");
    expect("EDGE_CURVE", 2, "LINE");
    expect("ORIENTED_EDGE", 0, "EDGE_CURVE");
    expect("FACE_OUTER_BOUND", 0, "EDGE_LOOP");
    expect("AXIS2_PLACEMENT_3D", 0, "CARTESIAN_POINT");
    expect("AXIS2_PLACEMENT_3D", 1, "DIRECTION");
    expect("AXIS2_PLACEMENT_3D", 2, "DIRECTION");
    expect("PLANE", 0, "AXIS2_PLACEMENT_3D");
    expect("ADVANCED_FACE", 0, "FACE_OUTER_BOUND");
    expect("ADVANCED_FACE", 1, "PLANE");
    expect("MANIFOLD_SOLID_BREP", 0, "CLOSED_SHELL");
    expect("PRODUCT_DEFINITION", 0, "PRODUCT_DEFINITION_FORMATION");
    expect("PRODUCT_DEFINITION_FORMATION", 0, "PRODUCT");
    expect("SHAPE_DEFINITION_REPRESENTATION", 0, "PRODUCT_DEFINITION_SHAPE");
    expect("SHAPE_DEFINITION_REPRESENTATION", 1, "ADVANCED_BREP_SHAPE_REPRESENTATION");
    expect("ADVANCED_BREP_SHAPE_REPRESENTATION", 0, "MANIFOLD_SOLID_BREP");
}

#[test]
fn test_deterministic_output() {
    let a = export(&unit_square());
    let b = export(&unit_square());
    assert_eq!(a, b);

    // Only FILE_NAME differs when the timestamp is generated.
    let x = export_step(&unit_square()).unwrap().content;
    let y = export(&unit_square());
    let differing: Vec<_> = x.lines().zip(y.lines()).filter(|(l, r)| l != r).collect();
    assert!(differing.iter().all(|(l, _)| l.starts_with("FILE_NAME(")));
}

#[test]
fn test_degenerate_triangle_is_safe() {
    let p = Point3::new(1.0, 1.0, 1.0);
    let file = StepExporter::new(options())
        .export(&vec![[p, p, p]])
        .unwrap();
    assert_eq!(file.stats.degenerate_triangles, 1);
    assert_eq!(count(&file.content, "ADVANCED_FACE"), 1);
    assert_eq!(count(&file.content, "CARTESIAN_POINT"), 1);
    assert!(!file.content.contains("NaN"));
    assert!(!file.content.contains("inf"));
    assert!(!file.content.contains("DIRECTION('',(0.0,0.0,0.0))"));
}

#[test]
fn test_small_triangle_keeps_its_normal() {
    let file = StepExporter::new(options())
        .export(&vec![[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1e-4, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1e-4),
        ]])
        .unwrap();
    assert_eq!(file.stats.degenerate_triangles, 0);

    let lines = data_lines(&file.content);
    let by_id: HashMap<u64, &str> = lines.iter().map(|(id, _, a)| (*id, a.as_str())).collect();
    let placement = lines
        .iter()
        .find(|(_, k, _)| k == "AXIS2_PLACEMENT_3D")
        .unwrap();
    let axis = triples(by_id[&refs(&placement.2)[1]]);
    assert_eq!(axis, vec![0.0, -1.0, 0.0]);
}

#[test]
fn test_short_edge_line_follows_its_endpoints() {
    let content = export(&[[
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 1e-7, 0.0),
        Point3::new(1.0, 0.0, 0.0),
    ]]);
    let lines = data_lines(&content);
    let by_id: HashMap<u64, &str> = lines.iter().map(|(id, _, a)| (*id, a.as_str())).collect();
    let vector = lines.iter().find(|(_, k, _)| k == "VECTOR").unwrap();
    let direction = triples(by_id[&refs(&vector.2)[0]]);
    assert_eq!(direction, vec![0.0, 1.0, 0.0]);
}

#[test]
fn test_placement_axes_orthogonal() {
    // Normal along +X, then one along -X, then an oblique one.
    let tris = vec![
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ],
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ],
    ];
    let content = export(&tris);
    let lines = data_lines(&content);
    let by_id: HashMap<u64, &str> = lines.iter().map(|(id, _, a)| (*id, a.as_str())).collect();
    let placements: Vec<_> = lines
        .iter()
        .filter(|(_, k, _)| k == "AXIS2_PLACEMENT_3D")
        .collect();
    assert_eq!(placements.len(), 3);
    for (_, _, args) in placements {
        let r = refs(args);
        let axis = triples(by_id[&r[1]]);
        let reference = triples(by_id[&r[2]]);
        let dot: f64 = axis.iter().zip(&reference).map(|(a, b)| a * b).sum();
        assert_relative_eq!(dot, 0.0, epsilon = 1e-12);
        let len: f64 = reference.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert_relative_eq!(len, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_empty_input() {
    let file = StepExporter::new(options())
        .export(&Vec::<Triangle>::new())
        .unwrap();
    assert!(file.content.contains("CLOSED_SHELL('',())"));
    assert_eq!(count(&file.content, "ADVANCED_FACE"), 0);
    assert_eq!(count(&file.content, "MANIFOLD_SOLID_BREP"), 1);
}

#[test]
fn test_model_instances_are_flattened() {
    let mesh = TriangleMesh::from_flat(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2])
        .unwrap();
    let mut model = Model::new("pair");
    model.add_mesh(mesh.clone());
    model.add_instance(MeshInstance::new(mesh, Transform::translation(0.0, 0.0, 5.0)));

    let file = StepExporter::new(options()).export(&model).unwrap();
    assert_eq!(file.stats.triangles, 2);
    assert_eq!(file.stats.vertices, 6);
    assert!(file.content.contains("CARTESIAN_POINT('',(0.0,1.0,5.0));"));
}

#[test]
fn test_product_name_and_units() {
    let opts = StepOptions {
        product_name: "bracket".into(),
        unit: "cm".parse().unwrap(),
        ..options()
    };
    let content = StepExporter::new(opts)
        .export(&vec![unit_triangle()])
        .unwrap()
        .content;
    assert!(content.contains("PRODUCT('bracket','bracket',"));
    assert!(content.contains("SI_UNIT(.CENTI.,.METRE.)"));
    assert!(content.contains("UNCERTAINTY_MEASURE_WITH_UNIT(LENGTH_MEASURE(1.0E-7),"));
}
