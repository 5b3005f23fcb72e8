//! Resampler — arc-length resampling through a parametric cubic spline
//!
//! A polyline of any length is turned into exactly `n` points spaced evenly
//! in the chord-length parameter. The curve between input points is the
//! not-a-knot cubic spline through them, so the output follows the path's
//! curvature instead of its polygonal chain.
//!
//! # Pipeline
//!
//! `points → collapse coincident neighbours → chord parameters t ∈ [0, 1]
//!  → spline x(t), y(t) → sample at n uniform t`

use crate::geometry::Point;

// ── Public API ─────────────────────────────────────────────

/// Resample a polyline to exactly `n` points.
///
/// Sample positions are `k / (n - 1)` for `k = 0..n`, both endpoints
/// included; a single sample sits at `t = 0`.
///
/// Degenerate inputs skip interpolation: an empty polyline yields the origin
/// `n` times, and a polyline of zero length (one point, or all points
/// coincident) yields its first point `n` times.
pub fn resample(points: &[Point], n: usize) -> Vec<Point> {
    let Some(&first) = points.first() else {
        return vec![Point::ORIGIN; n];
    };

    let (knots, distinct) = chord_parameters(points);
    if distinct.len() < 2 {
        log::debug!("polyline has zero length, replicating first point");
        return vec![first; n];
    }

    let spline = ParametricSpline::fit(&knots, &distinct);
    (0..n)
        .map(|k| {
            let t = if n == 1 {
                0.0
            } else {
                k as f64 / (n - 1) as f64
            };
            spline.eval(t)
        })
        .collect()
}

/// Normalized cumulative chord-length parameters.
///
/// Adjacent coincident points are collapsed first, so the returned knots are
/// strictly increasing, start at 0 and end at exactly 1. Returns the knots
/// together with the surviving points. Fewer than two surviving points means
/// the polyline has zero length and the knot list is `[0.0]` or empty.
pub fn chord_parameters(points: &[Point]) -> (Vec<f64>, Vec<Point>) {
    let mut distinct: Vec<Point> = Vec::with_capacity(points.len());
    let mut knots: Vec<f64> = Vec::with_capacity(points.len());

    for &p in points {
        match distinct.last() {
            None => {
                distinct.push(p);
                knots.push(0.0);
            }
            Some(prev) => {
                let step = prev.distance(&p);
                if step > 0.0 {
                    let t = knots[knots.len() - 1] + step;
                    distinct.push(p);
                    knots.push(t);
                }
            }
        }
    }

    if let Some(&total) = knots.last() {
        if total > 0.0 {
            for t in knots.iter_mut() {
                *t /= total;
            }
            if let Some(last) = knots.last_mut() {
                *last = 1.0;
            }
        }
    }

    (knots, distinct)
}

// ── Spline ─────────────────────────────────────────────────

/// Interpolating cubic spline with not-a-knot end conditions.
///
/// Stored as knot values plus second derivatives at each knot. Two knots give
/// the straight segment and three give the interpolating parabola, which is
/// what the not-a-knot condition reduces to for those sizes.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    knots: Vec<f64>,
    values: Vec<f64>,
    second: Vec<f64>,
}

impl CubicSpline {
    /// Fit through `(knots[i], values[i])`.
    ///
    /// `knots` must be strictly increasing and have the same length as
    /// `values`, with at least two entries.
    pub fn fit(knots: &[f64], values: &[f64]) -> Self {
        debug_assert_eq!(knots.len(), values.len());
        debug_assert!(knots.len() >= 2);

        let second = match knots.len() {
            2 => vec![0.0, 0.0],
            3 => {
                let d0 = (values[1] - values[0]) / (knots[1] - knots[0]);
                let d1 = (values[2] - values[1]) / (knots[2] - knots[1]);
                let c = 2.0 * (d1 - d0) / (knots[2] - knots[0]);
                vec![c, c, c]
            }
            _ => not_a_knot_second_derivatives(knots, values),
        };

        Self {
            knots: knots.to_vec(),
            values: values.to_vec(),
            second,
        }
    }

    /// Evaluate at `t`. Outside the knot range the end pieces are extended.
    pub fn eval(&self, t: f64) -> f64 {
        let last_segment = self.knots.len() - 2;
        let i = self
            .knots
            .partition_point(|&k| k <= t)
            .saturating_sub(1)
            .min(last_segment);

        let (t0, t1) = (self.knots[i], self.knots[i + 1]);
        let (y0, y1) = (self.values[i], self.values[i + 1]);
        let (m0, m1) = (self.second[i], self.second[i + 1]);
        let h = t1 - t0;
        let a = t1 - t;
        let b = t - t0;

        m0 * a * a * a / (6.0 * h)
            + m1 * b * b * b / (6.0 * h)
            + (y0 - m0 * h * h / 6.0) * a / h
            + (y1 - m1 * h * h / 6.0) * b / h
    }
}

/// Second derivatives for four or more knots.
///
/// The not-a-knot rows (third derivative continuous at the second and the
/// penultimate knot) are folded into the first and last interior equations,
/// which leaves a diagonally dominant tridiagonal system in the interior
/// unknowns. The two end values are recovered from the folded rows.
fn not_a_knot_second_derivatives(knots: &[f64], values: &[f64]) -> Vec<f64> {
    let m = knots.len();
    let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
    let slope: Vec<f64> = (0..m - 1)
        .map(|i| (values[i + 1] - values[i]) / h[i])
        .collect();

    // Interior unknowns M_1 ..= M_{m-2}
    let k = m - 2;
    let mut sub = vec![0.0; k];
    let mut diag = vec![0.0; k];
    let mut sup = vec![0.0; k];
    let mut rhs = vec![0.0; k];

    for row in 0..k {
        let i = row + 1;
        sub[row] = h[i - 1];
        diag[row] = 2.0 * (h[i - 1] + h[i]);
        sup[row] = h[i];
        rhs[row] = 6.0 * (slope[i] - slope[i - 1]);
    }

    let (h0, h1) = (h[0], h[1]);
    diag[0] = (h0 + h1) * (h0 + 2.0 * h1) / h1;
    sup[0] = (h1 * h1 - h0 * h0) / h1;

    let (a, b) = (h[m - 3], h[m - 2]);
    diag[k - 1] = (a + b) * (2.0 * a + b) / a;
    sub[k - 1] = (a * a - b * b) / a;

    let interior = solve_tridiagonal(&sub, &diag, &sup, &rhs);

    let mut second = Vec::with_capacity(m);
    second.push(((h0 + h1) * interior[0] - h0 * interior[1]) / h1);
    second.extend_from_slice(&interior);
    second.push(((a + b) * interior[k - 1] - b * interior[k - 2]) / a);
    second
}

/// Thomas algorithm. `sub[0]` and `sup[n-1]` are ignored.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - sub[i] * c[i - 1];
        c[i] = sup[i] / denom;
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / denom;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d[i] - c[i] * x[i + 1];
    }
    x
}

/// x(t) and y(t) over shared knots
#[derive(Debug, Clone)]
pub struct ParametricSpline {
    x: CubicSpline,
    y: CubicSpline,
}

impl ParametricSpline {
    pub fn fit(knots: &[f64], points: &[Point]) -> Self {
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        Self {
            x: CubicSpline::fit(knots, &xs),
            y: CubicSpline::fit(knots, &ys),
        }
    }

    pub fn eval(&self, t: f64) -> Point {
        Point::new(self.x.eval(t), self.y.eval(t))
    }
}
