use crate::models::Vector3;
use crate::utils::{CollisionConstants, SupportSearch};

/// Distance reported by GJK when the hulls overlap.
pub const INTERSECTION_SENTINEL: f64 = -1.0;

/// Scalars below `-SIGN_EPSILON` classify as negative; everything else as non-negative.
pub const SIGN_EPSILON: f64 = 1e-4;

/// Search directions no longer than this count as the origin itself.
pub const ZERO_EPSILON: f64 = 1e-9;

/// Static distance under which a time of impact is accepted.
pub const CONTACT_THRESHOLD: f64 = 0.01;

/// Iteration budget of the time of impact bisection.
pub const MAX_TOI_ITERATIONS: usize = 1000;

/// Any non-zero vector works; this one avoids axis-aligned ties on boxes.
pub const INITIAL_DIRECTION: Vector3 = Vector3 { x: 1.0, y: 0.25, z: 0.5 };

pub const DEFAULT_COLLISION_CONSTANTS: CollisionConstants = CollisionConstants {
    sign_epsilon: SIGN_EPSILON,
    zero_epsilon: ZERO_EPSILON,
    contact_threshold: CONTACT_THRESHOLD,
    max_toi_iterations: MAX_TOI_ITERATIONS,
    initial_direction: INITIAL_DIRECTION,
    support_search: SupportSearch::Exhaustive,
    facing_epsilon: 1e-6,
    parallel_epsilon: 1e-5,
    time_epsilon: 1e-6,
    time_upper_slack: 1e-5,
};
