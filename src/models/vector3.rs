use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use approx::{AbsDiffEq, RelativeEq};
use crate::errors::CollisionError;

/// Squared lengths at or below this are treated as a collapsed segment.
const DEGENERATE_SEGMENT: f64 = 1e-12;

/// Relative size of the barycentric denominator under which a triangle has no area.
const DEGENERATE_TRIANGLE: f64 = 1e-12;

pub trait FromCoordinates <T> {
    /// Creates a new instance of the struct from the given coordinates.
    /// # Example
    /// ```
    /// use rs_collide::models::{FromCoordinates, Vector3};
    ///
    /// let v = Vector3::from_coord((1.0, 2.0, 3.0));
    /// assert_eq!(v.y, 2.0);
    /// ```
    fn from_coord(position: T) -> Self;
}

pub trait ToCoordinates <T> {
    /// Converts the struct to a tuple of coordinates.
    /// # Example
    /// ```
    /// use rs_collide::models::{ToCoordinates, Vector3};
    ///
    /// let v = Vector3::new(1.0, 2.0, 3.0);
    /// assert_eq!(v.to_coord(), (1.0, 2.0, 3.0));
    /// ```
    fn to_coord(&self) -> T;
}

/// A point or direction in 3D space.
///
/// `PartialEq` is exact; use [`Vector3::approx_eq`] or the `approx` macros
/// whenever values come out of a computation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }

    /// # Example
    /// ```
    /// use rs_collide::models::Vector3;
    ///
    /// let a = Vector3::new(1.0, 2.0, 3.0);
    /// let b = Vector3::new(4.0, 5.0, 6.0);
    /// assert_eq!(a.dot(b), 32.0);
    /// ```
    pub fn dot(self, other: Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// # Example
    /// ```
    /// use rs_collide::models::Vector3;
    ///
    /// let x = Vector3::new(1.0, 0.0, 0.0);
    /// let y = Vector3::new(0.0, 1.0, 0.0);
    /// assert_eq!(x.cross(y), Vector3::new(0.0, 0.0, 1.0));
    /// ```
    pub fn cross(self, other: Vector3) -> Vector3 {
        Vector3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn magnitude_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn magnitude(self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns the unit vector pointing the same way.
    ///
    /// # Errors
    /// Returns an error if the input is a zero vector.
    ///
    /// # Example
    /// ```
    /// use rs_collide::models::Vector3;
    ///
    /// let n = Vector3::new(3.0, 0.0, 4.0).normalize().unwrap();
    /// assert!((n.x - 0.6).abs() < 1e-10);
    /// assert!((n.z - 0.8).abs() < 1e-10);
    /// assert!(Vector3::zero().normalize().is_err());
    /// ```
    pub fn normalize(self) -> Result<Vector3, CollisionError> {
        let magnitude = self.magnitude();
        if magnitude == 0.0 || !magnitude.is_finite() {
            return Err(CollisionError::InvalidParameter("Cannot normalize a zero or non-finite vector".to_string()));
        }
        Ok(self * (1.0 / magnitude))
    }

    /// Exact zero test; `-0.0` counts as zero.
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Component-wise comparison within `epsilon`.
    pub fn approx_eq(self, other: Vector3, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }
}

impl FromCoordinates<(f64, f64, f64)> for Vector3 {
    fn from_coord(position: (f64, f64, f64)) -> Self {
        Vector3::new(position.0, position.1, position.2)
    }
}

impl ToCoordinates<(f64, f64, f64)> for Vector3 {
    fn to_coord(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Vector3) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;
    fn mul(self, rhs: f64) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Vector3 {
        rhs * self
    }
}

impl Neg for Vector3 {
    type Output = Vector3;
    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl AbsDiffEq for Vector3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        f64::abs_diff_eq(&self.x, &other.x, epsilon)
            && f64::abs_diff_eq(&self.y, &other.y, epsilon)
            && f64::abs_diff_eq(&self.z, &other.z, epsilon)
    }
}

impl RelativeEq for Vector3 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        f64::relative_eq(&self.x, &other.x, epsilon, max_relative)
            && f64::relative_eq(&self.y, &other.y, epsilon, max_relative)
            && f64::relative_eq(&self.z, &other.z, epsilon, max_relative)
    }
}

/// Classifies a scalar as `-1` only when it is below `-epsilon`; everything else is `1`.
///
/// Borderline values therefore count as non-negative, which makes closest-point
/// queries accept slightly exterior projections.
///
/// # Example
/// ```
/// use rs_collide::models::dir_sign;
///
/// assert_eq!(dir_sign(-0.00005, 1e-4), 1);
/// assert_eq!(dir_sign(-0.0002, 1e-4), -1);
/// assert_eq!(dir_sign(0.0, 1e-4), 1);
/// ```
pub fn dir_sign(value: f64, epsilon: f64) -> i8 {
    if value < -epsilon { -1 } else { 1 }
}

/// Point of segment `ab` closest to `p`.
///
/// # Example
/// ```
/// use rs_collide::models::{closest_point_on_segment, Vector3};
///
/// let closest = closest_point_on_segment(
///     Vector3::zero(),
///     Vector3::new(1.0, -1.0, 0.0),
///     Vector3::new(1.0, 1.0, 0.0),
/// );
/// assert_eq!(closest, Vector3::new(1.0, 0.0, 0.0));
/// ```
pub fn closest_point_on_segment(p: Vector3, a: Vector3, b: Vector3) -> Vector3 {
    let ab = b - a;
    let length_squared = ab.magnitude_squared();
    if length_squared <= DEGENERATE_SEGMENT {
        return a;
    }
    let t = ((p - a).dot(ab) / length_squared).clamp(0.0, 1.0);
    a + ab * t
}

/// Point of triangle `abc` closest to `p`.
///
/// The plane projection of `p` is used when all three barycentric coordinates
/// classify as non-negative under [`dir_sign`] with `sign_epsilon`; otherwise
/// the answer lies on an edge. Zero-area triangles fall back to their edges.
pub fn closest_point_on_triangle(p: Vector3, a: Vector3, b: Vector3, c: Vector3, sign_epsilon: f64) -> Vector3 {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d11 = v1.dot(v1);
    let d20 = v2.dot(v0);
    let d21 = v2.dot(v1);
    let denom = d00 * d11 - d01 * d01;

    if denom > 0.0 && denom > DEGENERATE_TRIANGLE * (d00 * d11).max(f64::MIN_POSITIVE) {
        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        let u = 1.0 - v - w;
        if dir_sign(u, sign_epsilon) >= 0 && dir_sign(v, sign_epsilon) >= 0 && dir_sign(w, sign_epsilon) >= 0 {
            return a + (v0 * v + v1 * w);
        }
    }

    let candidates = [
        closest_point_on_segment(p, a, b),
        closest_point_on_segment(p, b, c),
        closest_point_on_segment(p, c, a),
    ];
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if (*candidate - p).magnitude_squared() < (best - p).magnitude_squared() {
            best = *candidate;
        }
    }
    best
}
