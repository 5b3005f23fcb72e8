//! Enclosing-circle solver — smallest circle containing a point set
//!
//! Incremental randomized construction (Welzl), written as three nested
//! loops instead of recursion. The input order is shuffled with a
//! caller-supplied RNG; that shuffle is what gives the expected linear
//! running time. Any order yields the same circle.
//!
//! Containment is checked with a relative tolerance of `1e-6` on the radius
//! to absorb floating-point round-off.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Radius multiplier used by [`Circle::contains`]
pub const CONTAINMENT_TOLERANCE: f64 = 1.0 + 1e-6;

/// Relative collinearity threshold: the triangle's doubled area against its
/// longest squared side
pub const COLLINEAR_EPSILON: f64 = 1e-10;

/// Circle with center and radius. Serialized as `{"x": .., "y": .., "r": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    #[serde(flatten)]
    pub center: Point,
    #[serde(rename = "r")]
    pub radius: f64,
}

impl Circle {
    pub const fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Zero-radius circle at `p`
    pub const fn point(p: Point) -> Self {
        Self::new(p, 0.0)
    }

    /// Circle whose diameter is the segment `a`–`b`
    pub fn diametral(a: Point, b: Point) -> Self {
        let center = a.midpoint(&b);
        Self::new(center, center.distance(&a))
    }

    /// Circle through `a`, `b` and `c`.
    ///
    /// Solved in a frame translated to `a`, so with `u = b - a` and
    /// `v = c - a` the center offset is
    ///
    /// ```text
    /// x = (v.y·|u|² - u.y·|v|²) / d
    /// y = (u.x·|v|² - v.x·|u|²) / d      d = 2 (u.x·v.y - u.y·v.x)
    /// ```
    ///
    /// When `|u × v|` is below [`COLLINEAR_EPSILON`] times the longest
    /// squared side the points are treated as collinear and the diametral
    /// circle of the farthest pair is returned. The test is scale free.
    pub fn circumscribed(a: Point, b: Point, c: Point) -> Self {
        let d_ab = a.sq_distance(&b);
        let d_ac = a.sq_distance(&c);
        let d_bc = b.sq_distance(&c);

        let (ux, uy) = (b.x - a.x, b.y - a.y);
        let (vx, vy) = (c.x - a.x, c.y - a.y);
        let cross = ux * vy - uy * vx;

        if cross.abs() <= COLLINEAR_EPSILON * d_ab.max(d_ac).max(d_bc) {
            return if d_bc >= d_ac && d_bc >= d_ab {
                Self::diametral(b, c)
            } else if d_ac >= d_bc && d_ac >= d_ab {
                Self::diametral(a, c)
            } else {
                Self::diametral(a, b)
            };
        }

        let d = 2.0 * cross;
        let offset = Point::new(
            (vy * d_ab - uy * d_ac) / d,
            (ux * d_ac - vx * d_ab) / d,
        );
        let center = Point::new(a.x + offset.x, a.y + offset.y);
        Self::new(center, offset.x.hypot(offset.y))
    }

    /// True if `p` lies within `radius · (1 + 1e-6)` of the center
    pub fn contains(&self, p: &Point) -> bool {
        self.center.distance(p) <= self.radius * CONTAINMENT_TOLERANCE
    }
}

// ── Solver ─────────────────────────────────────────────────

/// Smallest circle enclosing `points`.
///
/// An empty set gives the zero circle at the origin and a single point gives
/// a zero-radius circle on it. The RNG only affects running time.
pub fn smallest_enclosing_circle<R: Rng + ?Sized>(points: &[Point], rng: &mut R) -> Circle {
    match points {
        [] => return Circle::point(Point::ORIGIN),
        [p] => return Circle::point(*p),
        _ => {}
    }

    let mut shuffled = points.to_vec();
    shuffled.shuffle(rng);

    let mut circle = Circle::diametral(shuffled[0], shuffled[1]);
    for i in 2..shuffled.len() {
        let p = shuffled[i];
        if !circle.contains(&p) {
            circle = circle_with_one(&shuffled[..i], p);
        }
    }

    circle
}

/// Smallest circle around `prior` with `p` on its boundary
fn circle_with_one(prior: &[Point], p: Point) -> Circle {
    let mut circle = Circle::point(p);
    for (j, &q) in prior.iter().enumerate() {
        if !circle.contains(&q) {
            circle = circle_with_two(&prior[..j], p, q);
        }
    }
    circle
}

/// Smallest circle around `prior` with `p` and `q` on its boundary
fn circle_with_two(prior: &[Point], p: Point, q: Point) -> Circle {
    let mut circle = Circle::diametral(p, q);
    for &r in prior {
        if !circle.contains(&r) {
            circle = Circle::circumscribed(p, q, r);
        }
    }
    circle
}
