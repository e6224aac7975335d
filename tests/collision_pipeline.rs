use approx::assert_relative_eq;
use rs_collide::apis::easy_collision::EasyCollision;
use rs_collide::interactions::{gjk_distance, time_of_impact, TimeOfImpact};
use rs_collide::models::{ConvexMesh, ConvexShape, Vector3};
use rs_collide::scheduling::{Dispatcher, SerialDispatcher, WorkerPool};
use rs_collide::utils::{CollisionConstants, SupportSearch};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_direction() -> Vector3 {
    loop {
        let candidate = Vector3::new(
            rand::random::<f64>() * 2.0 - 1.0,
            rand::random::<f64>() * 2.0 - 1.0,
            rand::random::<f64>() * 2.0 - 1.0,
        );
        if let Ok(direction) = candidate.normalize() {
            return direction;
        }
    }
}

#[test]
fn test_cubes_far_apart_are_never_overlapping() {
    init_logger();
    let cube = ConvexMesh::cuboid(Vector3::new(0.5, 0.5, 0.5)).unwrap();
    for _ in 0..200 {
        let offset = random_direction() * 3.0;
        let distance = gjk_distance(&cube, &cube, offset).unwrap();
        // The hulls' bounding spheres have radius sqrt(0.75), so the gap is at least 3 - 2 * 0.866
        assert!(distance >= 3.0 - 2.0 * 0.75_f64.sqrt() - 1e-9, "offset {:?}: {}", offset, distance);
        assert!(distance <= 2.0 + 1e-9);
    }
}

#[test]
fn test_toi_agrees_with_static_distance() {
    init_logger();
    let cube = ConvexMesh::cuboid(Vector3::new(0.5, 0.5, 0.5)).unwrap();
    let offset = Vector3::new(0.0, 0.0, 6.0);
    let velocity = Vector3::new(0.0, 0.0, -6.0);

    let toi = time_of_impact(&cube, &cube, offset, velocity).unwrap().unwrap();
    let at_contact = gjk_distance(&cube, &cube, velocity * toi.time + offset).unwrap();
    assert_relative_eq!(at_contact, toi.distance, epsilon = 1e-12);
    assert!(toi.time < 5.0 / 6.0 + 1e-12);
    assert_ne!(TimeOfImpact::as_pair(Some(toi)), TimeOfImpact::NO_CONTACT_SENTINEL);
}

#[test]
fn test_pool_and_serial_sweeps_agree() {
    init_logger();
    let sphere = ConvexMesh::uv_sphere(1.0, 16, 16).unwrap();
    let cube = ConvexMesh::cuboid(Vector3::new(0.5, 0.5, 0.5)).unwrap();
    let translation = Vector3::new(2.5, 0.1, -0.05);
    let velocity = Vector3::new(-3.0, 0.0, 0.0);

    let mut pooled = EasyCollision::with_workers(4, CollisionConstants::default()).unwrap();
    let mut serial = EasyCollision::with_dispatcher(SerialDispatcher, CollisionConstants::default()).unwrap();

    let pooled_times = pooled.swept_vertex_times(&sphere, &cube, translation, velocity, true);
    let serial_times = serial.swept_vertex_times(&sphere, &cube, translation, velocity, false);
    assert_eq!(pooled_times.len(), sphere.vertex_count());
    assert_eq!(pooled_times, serial_times);
    assert!(pooled_times.iter().flatten().all(|&t| t > 0.0 && t <= 1.0 + 1e-5));
}

#[test]
fn test_hill_climb_random_offsets() {
    init_logger();
    let sphere = ConvexMesh::uv_sphere(1.0, 16, 16).unwrap();
    let hill_climb = EasyCollision::with_dispatcher(
        SerialDispatcher,
        CollisionConstants::default().with_support_search(SupportSearch::HillClimb),
    )
    .unwrap();
    let exhaustive = EasyCollision::with_dispatcher(SerialDispatcher, CollisionConstants::default()).unwrap();

    for _ in 0..50 {
        let offset = random_direction() * 4.0;
        let a = exhaustive.distance(&sphere, &sphere, offset).unwrap();
        let b = hill_climb.distance(&sphere, &sphere, offset).unwrap();
        // Faces sit inside the unit sphere, so the mesh gap is never below the analytic one
        assert!(a >= 2.0 - 1e-9 && a < 2.1, "offset {:?}: {}", offset, a);
        assert_relative_eq!(a, b, epsilon = 1e-9);
    }
}

#[test]
fn test_pool_survives_many_small_batches() {
    init_logger();
    let mut pool = WorkerPool::new(3).unwrap();
    for count in 0..64 {
        let values = pool.dispatch_collect(count, |i| i * 3);
        assert_eq!(values, (0..count).map(|i| i * 3).collect::<Vec<_>>());
    }
    assert_eq!(pool.shutdown(), 3);
}
