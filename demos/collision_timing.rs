// demos/collision_timing.rs

use log::info;
use std::time::Instant;
use rs_collide::apis::easy_collision::EasyCollision;
use rs_collide::errors::CollisionError;
use rs_collide::models::{ConvexMesh, Vector3};
use rs_collide::scheduling::Dispatcher;

fn main() -> Result<(), CollisionError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut collision = EasyCollision::new()?;
    let cube = ConvexMesh::cuboid(Vector3::new(0.5, 0.5, 0.5))?;
    let sphere = ConvexMesh::uv_sphere(1.0, 16, 16)?;
    let offset = Vector3::new(5.0, 0.0, 0.0);
    let velocity = Vector3::new(-5.0, 0.0, 0.0);

    for (name, shape) in [("Cube", &cube), ("Sphere", &sphere)] {
        let start = Instant::now();
        let distance = collision.distance(shape, shape, offset)?;
        info!("{} to {} distance is {} and took {} microseconds", name, name, distance, start.elapsed().as_micros());
    }

    for (name, shape) in [("Cube", &cube), ("Sphere", &sphere)] {
        let start = Instant::now();
        let toi = collision.time_of_impact(shape, shape, offset, velocity)?;
        match toi {
            Some(toi) => info!(
                "{} to {} time is {} after {} steps and took {} microseconds",
                name, name, toi.time, toi.iterations, start.elapsed().as_micros()
            ),
            None => info!("{} to {} never touch ({} microseconds)", name, name, start.elapsed().as_micros()),
        }
    }

    let translation = Vector3::new(3.0, 0.05, 0.02);
    let velocity = Vector3::new(-3.0, 0.0, 0.0);
    for cull in [false, true] {
        let start = Instant::now();
        let times = collision.swept_vertex_times(&sphere, &sphere, translation, velocity, cull);
        let hits = times.iter().flatten().count();
        let earliest = times.iter().flatten().copied().reduce(f64::min);
        info!(
            "Sphere vertex sweep (culled: {}) hit {} of {} vertices, earliest {:?}, took {} microseconds",
            cull, hits, times.len(), earliest, start.elapsed().as_micros()
        );
    }

    let mut pool = collision.into_dispatcher();
    info!("Shut down {} workers", {
        let threads = pool.thread_count();
        let joined = pool.shutdown();
        debug_assert_eq!(threads, joined);
        joined
    });
    Ok(())
}
