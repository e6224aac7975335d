use approx::assert_relative_eq;
use crate::errors::CollisionError;
use crate::models::{ConvexMesh, ConvexShape, FacetedShape, Vector3};

fn unit_cube() -> ConvexMesh {
    ConvexMesh::cuboid(Vector3::new(0.5, 0.5, 0.5)).unwrap()
}

#[test]
fn test_cuboid_layout() {
    let cube = unit_cube();
    assert_eq!(cube.vertex_count(), 8);
    assert_eq!(cube.face_count(), 12);
    assert_eq!(cube.vertex(0), Vector3::new(-0.5, -0.5, -0.5));
    assert_eq!(cube.vertex(7), Vector3::new(0.5, 0.5, 0.5));

    // Every cube vertex touches three cube edges plus face diagonals
    for vertex in 0..8 {
        assert!(cube.neighbors(vertex).len() >= 3);
    }
}

#[test]
fn test_face_normals_point_outward() {
    let cube = unit_cube();
    for face in 0..cube.face_count() {
        let normal = cube.face_normal(face);
        assert_relative_eq!(normal.magnitude(), 1.0, epsilon = 1e-12);

        let [a, b, c] = cube.face_vertex_indices(face);
        let center = (cube.vertex(a) + cube.vertex(b) + cube.vertex(c)) * (1.0 / 3.0);
        assert!(normal.dot(center) > 0.0, "face {} normal {:?} points inward", face, normal);

        let (edge0, edge1) = cube.face_edge_vectors(face);
        let anchor = cube.face_anchor_vertex_index(face);
        assert_eq!(anchor, a);
        let winding = edge0.cross(edge1).normalize().unwrap();
        assert_relative_eq!(winding, normal, epsilon = 1e-12);
    }
}

#[test]
fn test_inward_winding_is_flipped() {
    let vertices = vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
    ];
    let mesh = ConvexMesh::new(vertices, vec![[0, 1, 2]]).unwrap();
    assert_eq!(mesh.face_vertex_indices(0), [0, 2, 1]);
    assert_relative_eq!(mesh.face_normal(0), Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
}

#[test]
fn test_uv_sphere_matches_reference_fixture_size() {
    let sphere = ConvexMesh::uv_sphere(1.0, 16, 16).unwrap();
    assert_eq!(sphere.vertex_count(), 242);
    assert_eq!(sphere.face_count(), 480);
    for vertex in sphere.vertices() {
        assert_relative_eq!(vertex.magnitude(), 1.0, epsilon = 1e-12);
    }
    for face in 0..sphere.face_count() {
        let [a, _, _] = sphere.face_vertex_indices(face);
        assert!(sphere.face_normal(face).dot(sphere.vertex(a)) > 0.0);
    }
}

#[test]
fn test_invalid_meshes_are_rejected() {
    assert!(matches!(ConvexMesh::new(Vec::new(), Vec::new()), Err(CollisionError::DegenerateInput(_))));
    assert!(matches!(ConvexMesh::from_points(Vec::new()), Err(CollisionError::DegenerateInput(_))));

    let points = vec![Vector3::zero(), Vector3::new(1.0, 0.0, 0.0), Vector3::new(2.0, 0.0, 0.0)];
    assert!(matches!(ConvexMesh::new(points.clone(), vec![[0, 1, 3]]), Err(CollisionError::MalformedShape(_))));
    assert!(matches!(ConvexMesh::new(points.clone(), vec![[0, 1, 1]]), Err(CollisionError::MalformedShape(_))));
    // Collinear vertices have no area
    assert!(matches!(ConvexMesh::new(points, vec![[0, 1, 2]]), Err(CollisionError::MalformedShape(_))));

    assert!(ConvexMesh::uv_sphere(1.0, 2, 8).is_err());
    assert!(ConvexMesh::uv_sphere(-1.0, 8, 8).is_err());
}

#[test]
fn test_support_point_prefers_lowest_index_on_ties() {
    let cube = unit_cube();
    // All four +x vertices tie; vertex 1 is the first of them.
    assert_eq!(cube.support_point(Vector3::new(1.0, 0.0, 0.0)).unwrap(), 1);
    assert_eq!(cube.support_point(Vector3::new(1.0, 1.0, 1.0)).unwrap(), 7);
    assert_eq!(cube.support_point(Vector3::new(-1.0, -1.0, -1.0)).unwrap(), 0);
}

#[test]
fn test_translated_support_point() {
    let points = vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 2.0, 0.0)];
    let diagonal = Vector3::new(1.0, 1.0, 0.0);
    assert_eq!(points.support_point(diagonal).unwrap(), 2);
    assert_eq!(points.support_point_translated(diagonal, Vector3::new(100.0, 0.0, 0.0)).unwrap(), 2);
    assert_eq!(points.as_slice().support_point(Vector3::new(1.0, 0.0, 0.0)).unwrap(), 1);
}

#[test]
fn test_empty_shape_support_fails_fast() {
    let empty: Vec<Vector3> = Vec::new();
    let result = empty.support_point(Vector3::new(1.0, 0.0, 0.0));
    assert!(matches!(result, Err(CollisionError::DegenerateInput(_))));
}

#[test]
fn test_hill_climb_agrees_with_exhaustive_scan() {
    let sphere = ConvexMesh::uv_sphere(1.0, 16, 16).unwrap();
    for _ in 0..500 {
        let direction = Vector3::new(
            rand::random::<f64>() * 2.0 - 1.0,
            rand::random::<f64>() * 2.0 - 1.0,
            rand::random::<f64>() * 2.0 - 1.0,
        );
        let start = (rand::random::<f64>() * 241.0) as usize;
        let climbed = sphere.support_point_hill_climb(direction, start).unwrap();
        let scanned = sphere.support_point(direction).unwrap();
        assert_relative_eq!(
            sphere.vertex(climbed).dot(direction),
            sphere.vertex(scanned).dot(direction),
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_hill_climb_without_adjacency_scans() {
    let cloud = ConvexMesh::from_points(vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(3.0, 0.0, 0.0),
        Vector3::new(1.0, 1.0, 0.0),
    ]).unwrap();
    assert!(!cloud.has_adjacency());
    assert_eq!(cloud.support_point_hill_climb(Vector3::new(1.0, 0.0, 0.0), 0).unwrap(), 1);
}

fn tetrahedron_with_isolated_vertex() -> ConvexMesh {
    // Vertex 0 belongs to no face
    ConvexMesh::new(
        vec![
            Vector3::new(-2.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ],
        vec![[1, 2, 3], [1, 2, 4], [1, 3, 4], [2, 3, 4]],
    ).unwrap()
}

#[test]
fn test_hill_climb_reaches_isolated_vertices() {
    let mesh = tetrahedron_with_isolated_vertex();
    assert!(!mesh.has_adjacency());
    assert!(unit_cube().has_adjacency());

    // Starting on the isolated vertex must not stop there
    let towards_x = Vector3::new(1.0, 0.0, 0.0);
    assert_eq!(mesh.support_point(towards_x).unwrap(), 2);
    assert_eq!(mesh.support_point_hill_climb(towards_x, 0).unwrap(), 2);

    // The isolated vertex is the support point but no edge leads to it
    let away_from_x = Vector3::new(-1.0, 0.0, 0.0);
    assert_eq!(mesh.support_point(away_from_x).unwrap(), 0);
    assert_eq!(mesh.support_point_hill_climb(away_from_x, 1).unwrap(), 0);
}

#[test]
fn test_clone_owns_its_buffers() {
    let original = unit_cube();
    let copy = original.clone();
    drop(original);
    assert_eq!(copy.vertex_count(), 8);
    assert_eq!(copy.face_count(), 12);
}
