use log::{debug, trace, warn};
use crate::errors::CollisionError;
use crate::models::{ConvexShape, Simplex, SupportPoint, Vector3};
use crate::utils::{CollisionConstants, SupportSearch, DEFAULT_COLLISION_CONSTANTS, INTERSECTION_SENTINEL};

/// Hard stop for pathological input; convex input terminates long before.
const MAX_GJK_ITERATIONS: usize = 256;

/// Why a GJK query stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GjkTermination {
    /// The search direction shrank to within `zero_epsilon` of the origin.
    ZeroDirection,
    /// The next support point repeated a vertex pair already in the simplex.
    ProvenanceCycle,
    /// The new closest point was not strictly nearer than the previous one.
    NoProgress,
    /// The tetrahedron contains the origin.
    EnclosedOrigin,
    /// No face of the tetrahedron produced a usable closest point.
    DegenerateReduction,
}

/// Outcome of [`gjk_query`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GjkResult {
    Separated {
        /// Hull-to-hull distance.
        distance: f64,
        /// Closest point of the Minkowski difference `B - A` to the origin.
        separation: Vector3,
        termination: GjkTermination,
        iterations: usize,
    },
    Intersecting {
        termination: GjkTermination,
        iterations: usize,
    },
}

impl GjkResult {
    /// The distance, or [`INTERSECTION_SENTINEL`] when the hulls overlap.
    pub fn distance(&self) -> f64 {
        match self {
            GjkResult::Separated { distance, .. } => *distance,
            GjkResult::Intersecting { .. } => INTERSECTION_SENTINEL,
        }
    }

    pub fn is_intersecting(&self) -> bool {
        matches!(self, GjkResult::Intersecting { .. })
    }

    pub fn termination(&self) -> GjkTermination {
        match self {
            GjkResult::Separated { termination, .. } | GjkResult::Intersecting { termination, .. } => *termination,
        }
    }

    pub fn iterations(&self) -> usize {
        match self {
            GjkResult::Separated { iterations, .. } | GjkResult::Intersecting { iterations, .. } => *iterations,
        }
    }
}

/// Support mapping of `(B + offset_b) - A`.
struct MinkowskiDifference<'s, A: ?Sized, B: ?Sized> {
    shape_a: &'s A,
    shape_b: &'s B,
    offset_b: Vector3,
    search: SupportSearch,
    last_a: usize,
    last_b: usize,
}

impl<'s, A: ConvexShape + ?Sized, B: ConvexShape + ?Sized> MinkowskiDifference<'s, A, B> {
    fn support(&mut self, direction: Vector3) -> Result<SupportPoint, CollisionError> {
        let (index_a, index_b) = match self.search {
            SupportSearch::Exhaustive => (
                self.shape_a.support_point(-direction)?,
                self.shape_b.support_point(direction)?,
            ),
            SupportSearch::HillClimb => (
                self.shape_a.support_point_hill_climb(-direction, self.last_a)?,
                self.shape_b.support_point_hill_climb(direction, self.last_b)?,
            ),
        };
        self.last_a = index_a;
        self.last_b = index_b;
        Ok(SupportPoint {
            point: (self.shape_b.vertex(index_b) + self.offset_b) - self.shape_a.vertex(index_a),
            index_a,
            index_b,
        })
    }
}

fn separated(direction: Vector3, termination: GjkTermination, iterations: usize) -> GjkResult {
    debug!("GJK separated after {} iterations ({:?})", iterations, termination);
    GjkResult::Separated {
        distance: direction.magnitude(),
        separation: -direction,
        termination,
        iterations,
    }
}

fn intersecting(termination: GjkTermination, iterations: usize) -> GjkResult {
    debug!("GJK intersecting after {} iterations ({:?})", iterations, termination);
    GjkResult::Intersecting { termination, iterations }
}

/// Distance GJK between the hull of `shape_a` and the hull of `shape_b`
/// translated by `offset_b`.
///
/// Overlap is reported when the search direction collapses into the
/// `zero_epsilon` ball or a tetrahedron encloses the origin. Separation is
/// reported when a support point repeats a vertex pair of the simplex, or when
/// the new closest point is not strictly nearer than the last one. The
/// `sign_epsilon` band in the triangle test leans towards separation, so
/// overlapping shapes can come back with a distance below `sign_epsilon`.
///
/// # Errors
/// * `DegenerateInput` when either shape has no vertices.
/// * `InvalidParameter` when `constants` fail [`CollisionConstants::validate`].
pub fn gjk_query<A, B>(
    shape_a: &A,
    shape_b: &B,
    offset_b: Vector3,
    constants: &CollisionConstants,
) -> Result<GjkResult, CollisionError>
where
    A: ConvexShape + ?Sized,
    B: ConvexShape + ?Sized,
{
    constants.validate()?;
    if shape_a.vertex_count() == 0 || shape_b.vertex_count() == 0 {
        return Err(CollisionError::DegenerateInput("GJK needs at least one vertex per shape"));
    }
    let sign_epsilon = constants.sign_epsilon;
    let zero_length_squared = constants.zero_epsilon * constants.zero_epsilon;
    let mut minkowski = MinkowskiDifference {
        shape_a,
        shape_b,
        offset_b,
        search: constants.support_search,
        last_a: 0,
        last_b: 0,
    };

    let mut direction = constants.initial_direction;
    let mut simplex = Simplex::new();
    simplex.push(minkowski.support(direction)?);
    direction = -direction;
    let second = minkowski.support(direction)?;
    if !simplex.contains_provenance(second.index_a, second.index_b) {
        simplex.push(second);
    }
    // `direction` holds the closest point here and is negated at the top of the loop
    direction = match simplex.closest_point_to_origin(sign_epsilon) {
        Some(closest) => closest,
        None => return Ok(intersecting(GjkTermination::DegenerateReduction, 0)),
    };

    let mut iterations = 0;
    loop {
        iterations += 1;
        direction = -direction;
        if direction.magnitude_squared() <= zero_length_squared {
            return Ok(intersecting(GjkTermination::ZeroDirection, iterations));
        }
        if iterations > MAX_GJK_ITERATIONS {
            warn!("GJK did not settle within {} iterations, reporting the last direction", MAX_GJK_ITERATIONS);
            return Ok(separated(direction, GjkTermination::NoProgress, iterations));
        }

        let next = minkowski.support(direction)?;
        trace!("GJK iteration {}: direction {:?}, support {:?}", iterations, direction, next);
        if simplex.contains_provenance(next.index_a, next.index_b) {
            return Ok(separated(direction, GjkTermination::ProvenanceCycle, iterations));
        }
        simplex.push(next);
        if simplex.len() == 4 {
            if simplex.encloses_origin(sign_epsilon) {
                return Ok(intersecting(GjkTermination::EnclosedOrigin, iterations));
            }
            if simplex.reduce_tetrahedron(sign_epsilon).is_none() {
                return Ok(intersecting(GjkTermination::DegenerateReduction, iterations));
            }
        }

        let candidate = match simplex.closest_point_to_origin(sign_epsilon) {
            Some(closest) => closest,
            None => return Ok(intersecting(GjkTermination::DegenerateReduction, iterations)),
        };
        if direction.magnitude_squared() <= candidate.magnitude_squared() {
            return Ok(separated(direction, GjkTermination::NoProgress, iterations));
        }
        direction = candidate;
    }
}

/// [`gjk_query`] with explicit constants, collapsed to the distance or
/// [`INTERSECTION_SENTINEL`].
pub fn gjk_distance_with<A, B>(
    shape_a: &A,
    shape_b: &B,
    offset_b: Vector3,
    constants: &CollisionConstants,
) -> Result<f64, CollisionError>
where
    A: ConvexShape + ?Sized,
    B: ConvexShape + ?Sized,
{
    gjk_query(shape_a, shape_b, offset_b, constants).map(|result| result.distance())
}

/// Distance between two convex hulls using the default constants.
///
/// # Returns
/// The Euclidean distance, or `-1.0` ([`INTERSECTION_SENTINEL`]) when the hulls overlap.
///
/// # Example
/// ```
/// use rs_collide::interactions::gjk_distance;
/// use rs_collide::models::{ConvexMesh, Vector3};
///
/// let cube = ConvexMesh::cuboid(Vector3::new(0.5, 0.5, 0.5)).unwrap();
/// let distance = gjk_distance(&cube, &cube, Vector3::new(5.0, 0.0, 0.0)).unwrap();
/// assert!((distance - 4.0).abs() < 1e-9);
///
/// let overlap = gjk_distance(&cube, &cube, Vector3::zero()).unwrap();
/// assert_eq!(overlap, -1.0);
/// ```
pub fn gjk_distance<A, B>(shape_a: &A, shape_b: &B, offset_b: Vector3) -> Result<f64, CollisionError>
where
    A: ConvexShape + ?Sized,
    B: ConvexShape + ?Sized,
{
    gjk_distance_with(shape_a, shape_b, offset_b, &DEFAULT_COLLISION_CONSTANTS)
}
