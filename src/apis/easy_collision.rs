// src/apis/easy_collision.rs

use log::info;
use crate::errors::CollisionError;
use crate::interactions::{
    cull_faces, earliest_vertex_time, gjk_distance_with, gjk_query, swept_vertex_times, time_of_impact_with,
    GjkResult, TimeOfImpact,
};
use crate::models::{ConvexShape, FacetedShape, Vector3};
use crate::scheduling::{Dispatcher, WorkerPool};
use crate::utils::CollisionConstants;

/// A simplified interface for collision queries.
///
/// Bundles a set of [`CollisionConstants`] with a [`Dispatcher`] so callers
/// can run distance, time-of-impact and ray-cast batches without threading
/// the tolerances and the thread pool through every call.
pub struct EasyCollision<D: Dispatcher = WorkerPool> {
    constants: CollisionConstants,
    dispatcher: D,
}

impl EasyCollision<WorkerPool> {
    /// Creates an `EasyCollision` with default constants and a worker pool
    /// sized to the machine.
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - Ready to run queries
    /// * `Err(CollisionError::ThreadSpawn)` - If the pool threads could not be started
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_collide::apis::easy_collision::EasyCollision;
    /// use rs_collide::models::{ConvexMesh, Vector3};
    ///
    /// let mut collision = EasyCollision::new().unwrap();
    /// let cube = ConvexMesh::cuboid(Vector3::new(0.5, 0.5, 0.5)).unwrap();
    /// let distance = collision.distance(&cube, &cube, Vector3::new(3.0, 0.0, 0.0)).unwrap();
    /// assert!((distance - 2.0).abs() < 1e-9);
    /// ```
    pub fn new() -> Result<Self, CollisionError> {
        let pool = WorkerPool::with_available_parallelism()?;
        info!("EasyCollision using {} worker threads", pool.worker_count());
        Self::with_dispatcher(pool, CollisionConstants::default())
    }

    /// Creates an `EasyCollision` with a pool of exactly `workers` threads.
    ///
    /// # Arguments
    ///
    /// * `workers` - Number of worker threads, at least one
    /// * `constants` - Tolerances used by every query
    ///
    /// # Returns
    ///
    /// * `Err(CollisionError::InvalidWorkerCount)` - If `workers` is zero
    /// * `Err(CollisionError::InvalidParameter)` - If `constants` fail validation
    pub fn with_workers(workers: usize, constants: CollisionConstants) -> Result<Self, CollisionError> {
        constants.validate()?;
        Self::with_dispatcher(WorkerPool::new(workers)?, constants)
    }
}

impl<D: Dispatcher> EasyCollision<D> {
    /// Wraps an existing dispatcher.
    ///
    /// # Errors
    /// `CollisionError::InvalidParameter` if `constants` fail validation.
    pub fn with_dispatcher(dispatcher: D, constants: CollisionConstants) -> Result<Self, CollisionError> {
        constants.validate()?;
        Ok(Self { constants, dispatcher })
    }

    pub fn constants(&self) -> &CollisionConstants {
        &self.constants
    }

    /// Replaces the constants after validating them.
    pub fn set_constants(&mut self, constants: CollisionConstants) -> Result<(), CollisionError> {
        constants.validate()?;
        self.constants = constants;
        Ok(())
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Gives the dispatcher back, dropping the façade.
    pub fn into_dispatcher(self) -> D {
        self.dispatcher
    }

    /// Distance between `shape_a` and `shape_b` placed at `offset_b`.
    ///
    /// # Returns
    ///
    /// * `Ok(distance)` - Euclidean gap, or `-1.0` when the shapes overlap
    /// * `Err(CollisionError::DegenerateInput)` - If either shape is empty
    pub fn distance<A, B>(&self, shape_a: &A, shape_b: &B, offset_b: Vector3) -> Result<f64, CollisionError>
    where
        A: ConvexShape + ?Sized,
        B: ConvexShape + ?Sized,
    {
        gjk_distance_with(shape_a, shape_b, offset_b, &self.constants)
    }

    /// Full GJK result including the separation vector and why the search stopped.
    pub fn query<A, B>(&self, shape_a: &A, shape_b: &B, offset_b: Vector3) -> Result<GjkResult, CollisionError>
    where
        A: ConvexShape + ?Sized,
        B: ConvexShape + ?Sized,
    {
        gjk_query(shape_a, shape_b, offset_b, &self.constants)
    }

    /// Earliest contact of `shape_b` moving from `offset_b` by `velocity_b` over `t ∈ [0, 1]`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(toi))` - Time and distance of the first contact found
    /// * `Ok(None)` - No contact within the iteration budget
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_collide::apis::easy_collision::EasyCollision;
    /// use rs_collide::models::{ConvexMesh, Vector3};
    /// use rs_collide::scheduling::SerialDispatcher;
    /// use rs_collide::utils::CollisionConstants;
    ///
    /// let collision = EasyCollision::with_dispatcher(SerialDispatcher, CollisionConstants::default()).unwrap();
    /// let cube = ConvexMesh::cuboid(Vector3::new(0.5, 0.5, 0.5)).unwrap();
    /// let toi = collision
    ///     .time_of_impact(&cube, &cube, Vector3::new(5.0, 0.0, 0.0), Vector3::new(-5.0, 0.0, 0.0))
    ///     .unwrap();
    /// assert!(toi.is_some());
    /// ```
    pub fn time_of_impact<A, B>(
        &self,
        shape_a: &A,
        shape_b: &B,
        offset_b: Vector3,
        velocity_b: Vector3,
    ) -> Result<Option<TimeOfImpact>, CollisionError>
    where
        A: ConvexShape + ?Sized,
        B: ConvexShape + ?Sized,
    {
        time_of_impact_with(shape_a, shape_b, offset_b, velocity_b, &self.constants, |_| {})
    }

    /// Faces of `target` facing against `velocity`.
    pub fn cull_faces<T>(&mut self, target: &T, velocity: Vector3) -> Vec<usize>
    where
        T: FacetedShape + Sync + ?Sized,
    {
        cull_faces(&mut self.dispatcher, target, velocity, &self.constants)
    }

    /// Ray casts every vertex of `moving` against `target`.
    ///
    /// # Arguments
    ///
    /// * `translation` - Placement of `moving` relative to `target` at `t = 0`
    /// * `velocity` - Displacement of `moving` over the whole step
    /// * `cull` - Run a face culling pass first and test only the surviving faces
    ///
    /// # Returns
    ///
    /// One entry per vertex of `moving`, `None` where the vertex hits nothing.
    pub fn swept_vertex_times<M, T>(
        &mut self,
        moving: &M,
        target: &T,
        translation: Vector3,
        velocity: Vector3,
        cull: bool,
    ) -> Vec<Option<f64>>
    where
        M: ConvexShape + Sync + ?Sized,
        T: FacetedShape + Sync + ?Sized,
    {
        let faces = cull.then(|| cull_faces(&mut self.dispatcher, target, velocity, &self.constants));
        swept_vertex_times(
            &mut self.dispatcher,
            moving,
            target,
            translation,
            velocity,
            faces.as_deref(),
            &self.constants,
        )
    }

    /// Earliest vertex contact of `moving` against `target`, or `None`.
    pub fn earliest_vertex_impact<M, T>(
        &mut self,
        moving: &M,
        target: &T,
        translation: Vector3,
        velocity: Vector3,
    ) -> Option<f64>
    where
        M: ConvexShape + Sync + ?Sized,
        T: FacetedShape + Sync + ?Sized,
    {
        earliest_vertex_time(&self.swept_vertex_times(moving, target, translation, velocity, true))
    }
}
