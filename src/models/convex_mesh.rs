use std::f64::consts::PI;
use log::warn;
use crate::errors::CollisionError;
use crate::models::{ConvexShape, FacetedShape, Vector3};

/// Cross products shorter than this mark a triangle as having no area.
const DEGENERATE_FACE: f64 = 1e-12;

/// One triangle of a [`ConvexMesh`], stored in outward winding.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub vertices: [usize; 3],
    pub normal: Vector3,
    pub edges: (Vector3, Vector3),
}

/// Convex polytope with owned vertex, adjacency and face buffers.
///
/// Cloning copies every buffer, so two meshes never share storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexMesh {
    vertices: Vec<Vector3>,
    adjacency: Vec<Vec<usize>>,
    faces: Vec<Face>,
    /// Every vertex has at least one neighbour.
    fully_linked: bool,
}

impl ConvexMesh {
    /// Builds a mesh from vertices and triangle indices.
    ///
    /// Face windings are flipped where needed so every normal points away from
    /// the vertex centroid, and adjacency is derived from the triangle edges.
    ///
    /// # Errors
    /// * `DegenerateInput` if `vertices` is empty.
    /// * `MalformedShape` for out-of-range indices, repeated indices or zero-area triangles.
    ///
    /// # Example
    /// ```
    /// use rs_collide::models::{ConvexMesh, FacetedShape, Vector3};
    ///
    /// let tetrahedron = ConvexMesh::new(
    ///     vec![
    ///         Vector3::new(0.0, 0.0, 0.0),
    ///         Vector3::new(1.0, 0.0, 0.0),
    ///         Vector3::new(0.0, 1.0, 0.0),
    ///         Vector3::new(0.0, 0.0, 1.0),
    ///     ],
    ///     vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]],
    /// ).unwrap();
    /// assert_eq!(tetrahedron.face_count(), 4);
    /// assert!(tetrahedron.face_normal(0).z < 0.0);
    /// ```
    pub fn new(vertices: Vec<Vector3>, triangles: Vec<[usize; 3]>) -> Result<Self, CollisionError> {
        if vertices.is_empty() {
            return Err(CollisionError::DegenerateInput("mesh has no vertices"));
        }
        let centroid = vertices.iter().fold(Vector3::zero(), |sum, v| sum + *v) * (1.0 / vertices.len() as f64);

        let mut adjacency = vec![Vec::new(); vertices.len()];
        let mut faces = Vec::with_capacity(triangles.len());
        for (face_index, triangle) in triangles.iter().enumerate() {
            let [a, mut b, mut c] = *triangle;
            if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
                return Err(CollisionError::MalformedShape(format!("face {} references a vertex outside 0..{}", face_index, vertices.len())));
            }
            if a == b || b == c || a == c {
                return Err(CollisionError::MalformedShape(format!("face {} repeats a vertex index", face_index)));
            }

            let mut normal = (vertices[b] - vertices[a]).cross(vertices[c] - vertices[a]);
            if normal.magnitude() <= DEGENERATE_FACE {
                return Err(CollisionError::MalformedShape(format!("face {} has zero area", face_index)));
            }
            if normal.dot(vertices[a] - centroid) < 0.0 {
                std::mem::swap(&mut b, &mut c);
                normal = -normal;
            }

            for (from, to) in [(a, b), (b, c), (c, a)] {
                adjacency[from].push(to);
                adjacency[to].push(from);
            }
            faces.push(Face {
                vertices: [a, b, c],
                normal: normal.normalize()?,
                edges: (vertices[b] - vertices[a], vertices[c] - vertices[a]),
            });
        }
        for neighbors in adjacency.iter_mut() {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        let fully_linked = adjacency.iter().all(|neighbors| !neighbors.is_empty());
        if !fully_linked {
            warn!("Mesh has vertices outside every face, hill climbing will scan all vertices");
        }
        Ok(Self { vertices, adjacency, faces, fully_linked })
    }

    /// A vertex-only hull: support queries work, faces and adjacency are empty.
    pub fn from_points(vertices: Vec<Vector3>) -> Result<Self, CollisionError> {
        if vertices.is_empty() {
            return Err(CollisionError::DegenerateInput("mesh has no vertices"));
        }
        let adjacency = vec![Vec::new(); vertices.len()];
        Ok(Self { vertices, adjacency, faces: Vec::new(), fully_linked: false })
    }

    /// Axis-aligned box centred on the origin. Vertex `i` has positive x, y, z
    /// where bits 0, 1, 2 of `i` are set.
    pub fn cuboid(half_extents: Vector3) -> Result<Self, CollisionError> {
        let vertices = (0..8)
            .map(|i| Vector3::new(
                if i & 1 != 0 { half_extents.x } else { -half_extents.x },
                if i & 2 != 0 { half_extents.y } else { -half_extents.y },
                if i & 4 != 0 { half_extents.z } else { -half_extents.z },
            ))
            .collect();
        let triangles = vec![
            [0, 4, 6], [0, 6, 2],
            [1, 3, 7], [1, 7, 5],
            [0, 1, 5], [0, 5, 4],
            [2, 6, 7], [2, 7, 3],
            [0, 2, 3], [0, 3, 1],
            [4, 5, 7], [4, 7, 6],
        ];
        Self::new(vertices, triangles)
    }

    /// Latitude/longitude sphere with poles on the y axis.
    ///
    /// Produces `2 + (rings - 1) * segments` vertices and `2 * segments * (rings - 1)`
    /// faces; 16 segments by 16 rings gives 242 vertices and 480 faces.
    pub fn uv_sphere(radius: f64, segments: usize, rings: usize) -> Result<Self, CollisionError> {
        if segments < 3 || rings < 2 {
            return Err(CollisionError::MalformedShape(format!("uv sphere needs at least 3 segments and 2 rings, got {}x{}", segments, rings)));
        }
        if radius <= 0.0 || !radius.is_finite() {
            return Err(CollisionError::InvalidParameter(format!("sphere radius must be positive, got {}", radius)));
        }

        let mut vertices = Vec::with_capacity(2 + (rings - 1) * segments);
        vertices.push(Vector3::new(0.0, radius, 0.0));
        for ring in 1..rings {
            let theta = PI * ring as f64 / rings as f64;
            for segment in 0..segments {
                let phi = 2.0 * PI * segment as f64 / segments as f64;
                vertices.push(Vector3::new(
                    radius * theta.sin() * phi.cos(),
                    radius * theta.cos(),
                    radius * theta.sin() * phi.sin(),
                ));
            }
        }
        vertices.push(Vector3::new(0.0, -radius, 0.0));

        let mut triangles = Vec::with_capacity(2 * segments * (rings - 1));
        for segment in 0..segments {
            triangles.push([0, 1 + segment, 1 + (segment + 1) % segments]);
        }
        for ring in 0..rings - 2 {
            for segment in 0..segments {
                let a = 1 + ring * segments + segment;
                let b = 1 + ring * segments + (segment + 1) % segments;
                let c = a + segments;
                let d = b + segments;
                triangles.push([a, c, b]);
                triangles.push([b, c, d]);
            }
        }
        let bottom = vertices.len() - 1;
        let last_ring = 1 + (rings - 2) * segments;
        for segment in 0..segments {
            triangles.push([bottom, last_ring + (segment + 1) % segments, last_ring + segment]);
        }

        Self::new(vertices, triangles)
    }

    pub fn vertices(&self) -> &[Vector3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        &self.adjacency[vertex]
    }

    /// Whether hill climbing can walk this mesh: every vertex lies on some face.
    /// An isolated vertex could be the support point yet is unreachable.
    pub fn has_adjacency(&self) -> bool {
        self.fully_linked
    }
}

impl ConvexShape for ConvexMesh {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertex(&self, index: usize) -> Vector3 {
        self.vertices[index]
    }

    fn support_point_hill_climb(&self, direction: Vector3, start_index: usize) -> Result<usize, CollisionError> {
        if !self.has_adjacency() {
            return self.support_point(direction);
        }
        if start_index >= self.vertices.len() {
            warn!("Hill climb start index {} is out of range, starting from vertex 0", start_index);
        }
        let mut current = if start_index < self.vertices.len() { start_index } else { 0 };
        let mut current_projection = self.vertices[current].dot(direction);
        loop {
            let mut best = current;
            let mut best_projection = current_projection;
            for &neighbor in &self.adjacency[current] {
                let projection = self.vertices[neighbor].dot(direction);
                if projection > best_projection {
                    best_projection = projection;
                    best = neighbor;
                }
            }
            if best == current {
                return Ok(current);
            }
            current = best;
            current_projection = best_projection;
        }
    }
}

impl FacetedShape for ConvexMesh {
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face_normal(&self, face: usize) -> Vector3 {
        self.faces[face].normal
    }

    fn face_edge_vectors(&self, face: usize) -> (Vector3, Vector3) {
        self.faces[face].edges
    }

    fn face_vertex_indices(&self, face: usize) -> [usize; 3] {
        self.faces[face].vertices
    }
}
