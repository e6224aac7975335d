use log::{debug, trace};
use crate::errors::CollisionError;
use crate::interactions::gjk_query;
use crate::models::{ConvexShape, Vector3};
use crate::utils::{CollisionConstants, DEFAULT_COLLISION_CONSTANTS};

/// Earliest contact found by [`time_of_impact`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeOfImpact {
    /// Normalized time in `[0, 1]`.
    pub time: f64,
    /// Static distance at `time`; below the contact threshold.
    pub distance: f64,
    /// Number of GJK evaluations spent.
    pub iterations: usize,
}

impl TimeOfImpact {
    /// `(time, distance)` pair callers of the sentinel convention expect for "no contact".
    pub const NO_CONTACT_SENTINEL: (f64, f64) = (-1.0, -1.0);

    /// Flattens an optional result into the `(time, distance)` sentinel convention.
    pub fn as_pair(result: Option<TimeOfImpact>) -> (f64, f64) {
        result.map_or(Self::NO_CONTACT_SENTINEL, |toi| (toi.time, toi.distance))
    }
}

/// What GJK reported at one bisection midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToiOutcome {
    Overlap,
    Contact(f64),
    Separated(f64),
}

/// One step of the bisection, as handed to the observer of [`time_of_impact_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToiStep {
    pub iteration: usize,
    /// Bracket before the step.
    pub start: f64,
    pub end: f64,
    /// Midpoint that was evaluated.
    pub time: f64,
    pub outcome: ToiOutcome,
}

/// Time of impact by bisection over repeated static GJK distance queries.
///
/// `shape_b` moves linearly from `offset_b` to `offset_b + velocity_b` over
/// `t ∈ [0, 1]`; `shape_a` stays put. Each step evaluates the midpoint of the
/// bracket `[start, end]`:
/// * overlap: `end = mid` and `start` goes back to `0`, so the search
///   re-widens towards the earliest possible contact;
/// * distance below `contact_threshold`: `mid` is accepted;
/// * otherwise `start = mid`.
///
/// Returns `Ok(None)` when `max_toi_iterations` steps pass without contact.
///
/// # Errors
/// Propagates `CollisionError::DegenerateInput` from GJK and
/// `CollisionError::InvalidParameter` from the constants.
pub fn time_of_impact_with<A, B, F>(
    shape_a: &A,
    shape_b: &B,
    offset_b: Vector3,
    velocity_b: Vector3,
    constants: &CollisionConstants,
    mut observer: F,
) -> Result<Option<TimeOfImpact>, CollisionError>
where
    A: ConvexShape + ?Sized,
    B: ConvexShape + ?Sized,
    F: FnMut(&ToiStep),
{
    constants.validate()?;

    let mut start = 0.0;
    let mut end = 1.0;
    for iteration in 0..constants.max_toi_iterations {
        let time = (start + end) * 0.5;
        let result = gjk_query(shape_a, shape_b, velocity_b * time + offset_b, constants)?;

        let outcome = if result.is_intersecting() {
            ToiOutcome::Overlap
        } else if result.distance() < constants.contact_threshold {
            ToiOutcome::Contact(result.distance())
        } else {
            ToiOutcome::Separated(result.distance())
        };
        let step = ToiStep { iteration, start, end, time, outcome };
        trace!("ToI step {:?}", step);
        observer(&step);

        match outcome {
            ToiOutcome::Overlap => {
                end = time;
                start = 0.0;
            }
            ToiOutcome::Contact(distance) => {
                return Ok(Some(TimeOfImpact { time, distance, iterations: iteration + 1 }));
            }
            ToiOutcome::Separated(_) => start = time,
        }
    }

    debug!("No time of impact within {} iterations", constants.max_toi_iterations);
    Ok(None)
}

/// [`time_of_impact_with`] using the default constants and no observer.
///
/// # Example
/// ```
/// use rs_collide::interactions::time_of_impact;
/// use rs_collide::models::{ConvexMesh, Vector3};
///
/// let cube = ConvexMesh::cuboid(Vector3::new(0.5, 0.5, 0.5)).unwrap();
/// let toi = time_of_impact(&cube, &cube, Vector3::new(5.0, 0.0, 0.0), Vector3::new(-5.0, 0.0, 0.0))
///     .unwrap()
///     .expect("the cubes meet at t = 0.8");
/// assert!(toi.time <= 0.8 && toi.time > 0.79);
/// ```
pub fn time_of_impact<A, B>(
    shape_a: &A,
    shape_b: &B,
    offset_b: Vector3,
    velocity_b: Vector3,
) -> Result<Option<TimeOfImpact>, CollisionError>
where
    A: ConvexShape + ?Sized,
    B: ConvexShape + ?Sized,
{
    time_of_impact_with(shape_a, shape_b, offset_b, velocity_b, &DEFAULT_COLLISION_CONSTANTS, |_| {})
}
