use log::{debug, trace};
use crate::models::{ConvexShape, FacetedShape, Vector3};
use crate::scheduling::Dispatcher;
use crate::utils::CollisionConstants;

fn faces_motion(normal: Vector3, direction: Vector3, facing_epsilon: f64) -> bool {
    -normal.dot(direction) > facing_epsilon
}

/// Möller–Trumbore intersection of `origin + t * velocity` with one face.
fn intersect_face<T: FacetedShape + ?Sized>(
    target: &T,
    face: usize,
    origin: Vector3,
    velocity: Vector3,
    constants: &CollisionConstants,
) -> Option<f64> {
    let (edge_1, edge_2) = target.face_edge_vectors(face);
    let h = velocity.cross(edge_2);
    let a = edge_1.dot(h);
    if a.abs() < constants.parallel_epsilon {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - target.vertex(target.face_anchor_vertex_index(face));
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge_1);
    let v = f * velocity.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge_2.dot(q);
    if t > constants.time_epsilon && t < 1.0 + constants.time_upper_slack {
        Some(t)
    } else {
        None
    }
}

/// Earliest normalized time at which `point` moving by `velocity` crosses a
/// face of `target`.
///
/// Only faces whose outward normal opposes the motion are tested. With
/// `candidate_faces` set, only those faces are considered at all. Zero
/// velocity never hits anything.
pub fn ray_cast_vertex<T: FacetedShape + ?Sized>(
    target: &T,
    point: Vector3,
    velocity: Vector3,
    candidate_faces: Option<&[usize]>,
    constants: &CollisionConstants,
) -> Option<f64> {
    let direction = velocity.normalize().ok()?;
    let test = |face: usize| {
        if faces_motion(target.face_normal(face), direction, constants.facing_epsilon) {
            intersect_face(target, face, point, velocity, constants)
        } else {
            None
        }
    };

    match candidate_faces {
        Some(faces) => faces.iter().filter_map(|&face| test(face)).reduce(f64::min),
        None => (0..target.face_count()).filter_map(test).reduce(f64::min),
    }
}

/// Faces of `target` that can be hit by motion along `velocity`, in index order.
pub fn cull_faces<D, T>(
    dispatcher: &mut D,
    target: &T,
    velocity: Vector3,
    constants: &CollisionConstants,
) -> Vec<usize>
where
    D: Dispatcher,
    T: FacetedShape + Sync + ?Sized,
{
    let direction = match velocity.normalize() {
        Ok(direction) => direction,
        Err(_) => return Vec::new(),
    };
    let keep = dispatcher.dispatch_collect(target.face_count(), |face| {
        faces_motion(target.face_normal(face), direction, constants.facing_epsilon)
    });
    let faces: Vec<usize> = keep
        .iter()
        .enumerate()
        .filter_map(|(face, &kept)| kept.then_some(face))
        .collect();
    debug!("Culled {} of {} faces", target.face_count() - faces.len(), target.face_count());
    faces
}

/// Per-vertex ray cast of `moving` (displaced by `translation`) against
/// `target`, one slot per vertex of `moving`.
pub fn swept_vertex_times<D, M, T>(
    dispatcher: &mut D,
    moving: &M,
    target: &T,
    translation: Vector3,
    velocity: Vector3,
    candidate_faces: Option<&[usize]>,
    constants: &CollisionConstants,
) -> Vec<Option<f64>>
where
    D: Dispatcher,
    M: ConvexShape + Sync + ?Sized,
    T: FacetedShape + Sync + ?Sized,
{
    let times = dispatcher.dispatch_collect(moving.vertex_count(), |vertex| {
        ray_cast_vertex(target, moving.vertex(vertex) + translation, velocity, candidate_faces, constants)
    });
    trace!("Swept {} vertices, {} hit", times.len(), times.iter().flatten().count());
    times
}

/// Smallest contact time among per-vertex results.
pub fn earliest_vertex_time(times: &[Option<f64>]) -> Option<f64> {
    times.iter().flatten().copied().reduce(f64::min)
}
