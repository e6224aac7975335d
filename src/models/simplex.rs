use crate::models::{closest_point_on_segment, closest_point_on_triangle, dir_sign, Vector3};

/// A vertex closer than this to the plane of its opposite face makes the
/// tetrahedron flat.
const FLAT_TETRAHEDRON: f64 = 1e-10;

/// A point of the Minkowski difference `B - A` together with the vertex indices
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SupportPoint {
    pub point: Vector3,
    pub index_a: usize,
    pub index_b: usize,
}

impl SupportPoint {
    pub fn provenance(&self) -> (usize, usize) {
        (self.index_a, self.index_b)
    }
}

/// Working set of up to four support points (for use with GJK).
///
/// Lives on the stack and is rebuilt for every query. Points keep insertion
/// order; index 0 is the oldest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Simplex {
    points: [SupportPoint; 4],
    count: usize,
}

impl Simplex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn points(&self) -> &[SupportPoint] {
        &self.points[..self.count]
    }

    /// Appends a point. Panics when the simplex already holds four points.
    pub fn push(&mut self, point: SupportPoint) {
        assert!(self.count < 4, "simplex cannot hold more than four points");
        self.points[self.count] = point;
        self.count += 1;
    }

    /// Removes the point at `index`, keeping the others in order.
    pub fn remove(&mut self, index: usize) -> SupportPoint {
        assert!(index < self.count, "simplex index {} out of range", index);
        let removed = self.points[index];
        self.points.copy_within(index + 1..self.count, index);
        self.count -= 1;
        removed
    }

    /// Whether a point with the same `(index_a, index_b)` pair is already present.
    ///
    /// Coordinates are deliberately not compared: distinct vertex pairs can
    /// land on the same Minkowski point.
    pub fn contains_provenance(&self, index_a: usize, index_b: usize) -> bool {
        self.points().iter().any(|p| p.index_a == index_a && p.index_b == index_b)
    }

    /// Closest point of the current simplex to the origin. `None` for an empty
    /// simplex or a full tetrahedron (reduce it first).
    pub fn closest_point_to_origin(&self, sign_epsilon: f64) -> Option<Vector3> {
        let origin = Vector3::zero();
        let p = &self.points;
        match self.count {
            1 => Some(p[0].point),
            2 => Some(closest_point_on_segment(origin, p[0].point, p[1].point)),
            3 => Some(closest_point_on_triangle(origin, p[0].point, p[1].point, p[2].point, sign_epsilon)),
            _ => None,
        }
    }

    /// Whether a full tetrahedron strictly contains the origin.
    ///
    /// Each face normal is oriented away from the opposite vertex and the
    /// origin must classify as negative (see [`dir_sign`]) against all four.
    /// Flat tetrahedra never enclose anything, and neither does a simplex of
    /// fewer than four points.
    pub fn encloses_origin(&self, sign_epsilon: f64) -> bool {
        if self.count != 4 {
            return false;
        }
        for drop in 0..4 {
            let [a, b, c] = self.face_without(drop);
            let opposite = self.points[drop].point;
            let normal = match (b - a).cross(c - a).normalize() {
                Ok(normal) => normal,
                Err(_) => return false,
            };
            let height = normal.dot(opposite - a);
            if !height.is_finite() || height.abs() <= FLAT_TETRAHEDRON {
                return false;
            }
            let outward = if height > 0.0 { -normal } else { normal };
            if dir_sign(outward.dot(-a), sign_epsilon) != -1 {
                return false;
            }
        }
        true
    }

    /// Shrinks a tetrahedron back to the triangle nearest the origin.
    ///
    /// Only the three faces through the newest point are candidates, tried
    /// dropping the oldest, then the second oldest, then the third point. A
    /// later face replaces an earlier one only when its closest point is
    /// strictly nearer. Returns the dropped point, or `None` (simplex
    /// untouched) when no face yields a finite closest point.
    pub fn reduce_tetrahedron(&mut self, sign_epsilon: f64) -> Option<SupportPoint> {
        if self.count != 4 {
            return None;
        }
        let origin = Vector3::zero();
        let mut best: Option<(usize, f64)> = None;
        for drop in [0, 1, 2] {
            let [a, b, c] = self.face_without(drop);
            let closest = closest_point_on_triangle(origin, a, b, c, sign_epsilon);
            if !closest.is_finite() {
                continue;
            }
            let length_squared = closest.magnitude_squared();
            match best {
                Some((_, best_length)) if length_squared >= best_length => {}
                _ => best = Some((drop, length_squared)),
            }
        }
        best.map(|(drop, _)| self.remove(drop))
    }

    /// Coordinates of the tetrahedron face opposite `drop`, in insertion order.
    fn face_without(&self, drop: usize) -> [Vector3; 3] {
        let mut face = [Vector3::zero(); 3];
        let mut slot = 0;
        for (index, point) in self.points.iter().enumerate() {
            if index != drop {
                face[slot] = point.point;
                slot += 1;
            }
        }
        face
    }
}
