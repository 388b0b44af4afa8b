#![warn(missing_docs)]

//! Math types for the tristep encoder.
//!
//! Thin wrappers around nalgebra: points, vectors, directions, affine
//! transforms, and the guarded vector operations used to derive the
//! per-triangle frame (edge directions, face normal, reference axis).

use nalgebra::{Matrix4, Unit, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Length below which a vector is treated as zero by [`normalize`].
pub const NORMALIZE_EPSILON: f64 = 1e-6;

/// Componentwise `b - a`.
pub fn edge_vector(a: &Point3, b: &Point3) -> Vec3 {
    b - a
}

/// Standard right-handed cross product.
pub fn cross(u: &Vec3, v: &Vec3) -> Vec3 {
    Vec3::new(
        u.y * v.z - u.z * v.y,
        u.z * v.x - u.x * v.z,
        u.x * v.y - u.y * v.x,
    )
}

/// Scale `v` to unit length.
///
/// Divides by `max(|v|, ε)`. A vector shorter than [`NORMALIZE_EPSILON`] is
/// returned unchanged; callers that need a guaranteed unit vector use
/// [`unit_normal`] or [`edge_direction`], which substitute a sentinel axis.
pub fn normalize(v: &Vec3) -> Vec3 {
    let len = v.norm();
    if len < NORMALIZE_EPSILON {
        return *v;
    }
    v / len.max(NORMALIZE_EPSILON)
}

/// `normalize(cross(v1 - v0, v2 - v0))`.
///
/// Counter-clockwise winding seen from the front gives the outward normal.
/// For a degenerate triangle the result is the (near) zero cross product.
pub fn face_normal(v0: &Point3, v1: &Point3, v2: &Point3) -> Vec3 {
    normalize(&cross(&edge_vector(v0, v1), &edge_vector(v0, v2)))
}

/// Unit normal of a triangle plus whether the triangle was degenerate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceNormal {
    /// Unit normal; `+Z` when the triangle is degenerate.
    pub dir: Dir3,
    /// True when the edge vectors are parallel or zero-length.
    pub degenerate: bool,
}

/// Face normal as a guaranteed unit vector.
///
/// Only an exactly zero cross product makes a triangle degenerate; those get
/// `+Z`. Small triangles keep their true normal whatever their size: the
/// edges are rescaled before the cross product, so neither underflow nor
/// overflow changes the result.
pub fn unit_normal(v0: &Point3, v1: &Point3, v2: &Point3) -> FaceNormal {
    let n = cross(&balanced(span(v0, v1)), &balanced(span(v0, v2)));
    match unit(n) {
        Some(dir) => FaceNormal {
            dir,
            degenerate: false,
        },
        None => FaceNormal {
            dir: Vec3::z_axis(),
            degenerate: true,
        },
    }
}

/// Unit direction from `a` to `b`, `+X` only when `a == b`.
pub fn edge_direction(a: &Point3, b: &Point3) -> Dir3 {
    unit(span(a, b)).unwrap_or_else(Vec3::x_axis)
}

/// `b - a`, taken at half scale when the full difference overflows.
fn span(a: &Point3, b: &Point3) -> Vec3 {
    let v = edge_vector(a, b);
    if v.iter().all(|c| c.is_finite()) {
        v
    } else {
        b.coords * 0.5 - a.coords * 0.5
    }
}

/// `v` divided by its largest absolute component; zero stays zero.
fn balanced(v: Vec3) -> Vec3 {
    let m = v.amax();
    if m > 0.0 && m.is_finite() {
        v / m
    } else {
        v
    }
}

/// Normalize any finite non-zero vector, however short.
fn unit(v: Vec3) -> Option<Dir3> {
    if !v.iter().all(|c| c.is_finite()) {
        return None;
    }
    let v = balanced(v);
    Dir3::try_new(v, 0.0)
}

/// Secondary placement axis orthogonal to `normal`.
///
/// Projects `+X` onto the plane of the normal. When the normal is (nearly)
/// parallel to X the projection is shorter than [`NORMALIZE_EPSILON`] and
/// `+Y` is projected instead, which cannot vanish for a unit normal along X.
pub fn reference_direction(normal: &Dir3) -> Dir3 {
    let n = normal.as_ref();
    let project = |axis: Vec3| Dir3::try_new(axis - n * n.dot(&axis), NORMALIZE_EPSILON);
    project(Vec3::x())
        .or_else(|| project(Vec3::y()))
        .unwrap_or_else(Vec3::x_axis)
}

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Non-uniform scale by `(sx, sy, sz)`. Negative factors mirror.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 0)] = sx;
        m[(1, 1)] = sy;
        m[(2, 2)] = sz;
        Self { matrix: m }
    }

    /// Rotation about an axis through the origin by `angle` radians.
    pub fn rotation(axis: &Dir3, angle: f64) -> Self {
        let rot = nalgebra::Rotation3::from_axis_angle(axis, angle);
        Self {
            matrix: rot.to_homogeneous(),
        }
    }

    /// Compose: `self` then `other` (self * other), so `other` applies first.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Whether the linear part flips orientation (negative determinant).
    ///
    /// Mirrored instances must reverse triangle winding to keep outward normals.
    pub fn is_mirroring(&self) -> bool {
        self.matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
