use crate::errors::CollisionError;
use crate::models::Vector3;

/// Vertex storage plus support queries of a convex shape.
///
/// Only `vertex_count` and `vertex` are required; the support queries scan
/// every vertex and keep the lowest index among equal projections.
pub trait ConvexShape {
    fn vertex_count(&self) -> usize;

    /// Panics if `index >= vertex_count()`.
    fn vertex(&self, index: usize) -> Vector3;

    /// Index of the vertex with the largest projection on `direction`.
    ///
    /// # Errors
    /// `CollisionError::DegenerateInput` if the shape has no vertices.
    fn support_point(&self, direction: Vector3) -> Result<usize, CollisionError> {
        self.support_point_translated(direction, Vector3::zero())
    }

    /// Same as [`ConvexShape::support_point`] with every vertex displaced by `translation`.
    fn support_point_translated(&self, direction: Vector3, translation: Vector3) -> Result<usize, CollisionError> {
        let count = self.vertex_count();
        if count == 0 {
            return Err(CollisionError::DegenerateInput("support point requested from a shape without vertices"));
        }
        let mut best_index = 0;
        let mut best_projection = (self.vertex(0) + translation).dot(direction);
        for index in 1..count {
            let projection = (self.vertex(index) + translation).dot(direction);
            if projection > best_projection {
                best_projection = projection;
                best_index = index;
            }
        }
        Ok(best_index)
    }

    /// Local search over vertex adjacency starting at `start_index`.
    ///
    /// Shapes without adjacency information fall back to the exhaustive scan.
    fn support_point_hill_climb(&self, direction: Vector3, start_index: usize) -> Result<usize, CollisionError> {
        let _ = start_index;
        self.support_point(direction)
    }
}

/// Triangle faces of a convex shape, as needed by the ray casting workloads.
pub trait FacetedShape: ConvexShape {
    fn face_count(&self) -> usize;

    /// Unit normal pointing out of the shape.
    fn face_normal(&self, face: usize) -> Vector3;

    /// `(v1 - v0, v2 - v0)` for the face's vertices in outward winding.
    fn face_edge_vectors(&self, face: usize) -> (Vector3, Vector3);

    /// Index of `v0`, the vertex both edge vectors start from.
    fn face_anchor_vertex_index(&self, face: usize) -> usize {
        self.face_vertex_indices(face)[0]
    }

    fn face_vertex_indices(&self, face: usize) -> [usize; 3];
}

impl ConvexShape for [Vector3] {
    fn vertex_count(&self) -> usize {
        self.len()
    }

    fn vertex(&self, index: usize) -> Vector3 {
        self[index]
    }
}

impl ConvexShape for Vec<Vector3> {
    fn vertex_count(&self) -> usize {
        self.len()
    }

    fn vertex(&self, index: usize) -> Vector3 {
        self[index]
    }
}
