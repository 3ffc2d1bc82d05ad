//! Conversion of polygonized triangles into renderable vertices.
//!
//! Each triangle becomes three vertices carrying one shared face normal and
//! tangent. Vertices are never welded across triangles, so the output is a flat,
//! non-indexed list whose length is always three times the triangle count.

use cgmath::{InnerSpace, Vector3, Zero};

use super::marching_cubes::Triangle;
use crate::engine_state::rendering::Vertex;

/// Normalizes `vector`, leaving zero-length vectors at zero instead of NaN.
fn normalize_or_zero(vector: Vector3<f32>) -> Vector3<f32> {
    if vector.magnitude2() > 0.0 {
        vector.normalize()
    } else {
        Vector3::zero()
    }
}

/// Face normal and tangent of a triangle `ABC`.
///
/// The normal is `(B - A) × (C - A)` normalized; the tangent is `C - B`
/// normalized.
pub fn face_frame(triangle: &Triangle) -> (Vector3<f32>, Vector3<f32>) {
    let [a, b, c] = triangle.points;
    let normal = normalize_or_zero((b - a).cross(c - a));
    let tangent = normalize_or_zero(c - b);
    (normal, tangent)
}

/// Appends three vertices per triangle to `vertices`.
///
/// # Arguments
/// * `triangles` - Polygonized triangles of one chunk
/// * `vertices` - Output list; vertices are appended in triangle order
pub fn build_vertices(triangles: &[Triangle], vertices: &mut Vec<Vertex>) {
    vertices.reserve(triangles.len() * 3);
    for triangle in triangles {
        let (normal, tangent) = face_frame(triangle);
        for point in triangle.points {
            vertices.push(Vertex::new(point, normal, tangent));
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;

    #[test]
    fn each_triangle_emits_three_vertices_sharing_its_frame() {
        let triangles = vec![
            Triangle {
                points: [
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(1.0, 0.0, 0.0),
                    Point3::new(0.0, 1.0, 0.0),
                ],
            },
            Triangle {
                points: [
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(0.0, 0.0, 2.0),
                    Point3::new(2.0, 0.0, 0.0),
                ],
            },
        ];
        let mut vertices = Vec::new();
        build_vertices(&triangles, &mut vertices);

        assert_eq!(vertices.len(), 6);
        for vertex in &vertices[0..3] {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
        for vertex in &vertices[3..6] {
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        }
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);

        let tangent = Vector3::from(vertices[0].tangent);
        assert!((tangent.magnitude() - 1.0).abs() < 1e-6);
        assert!((tangent - Vector3::new(-1.0, 1.0, 0.0).normalize()).magnitude() < 1e-6);
    }

    #[test]
    fn degenerate_triangle_gets_zero_normal() {
        let point = Point3::new(1.0, 1.0, 1.0);
        let (normal, tangent) = face_frame(&Triangle {
            points: [point, point, point],
        });
        assert_eq!(normal, Vector3::zero());
        assert_eq!(tangent, Vector3::zero());
    }
}
