//! Normalizer — centers and scales a resampled polyline on its enclosing circle
//!
//! # Pipeline
//!
//! `points → validate → resample(N) → smallest_enclosing_circle
//!  → (p - center) · scale → round`
//!
//! # Guarantees
//!
//! - **Fixed size**: the coordinate buffer always has `2 · N` entries
//! - **Invariant**: translation moves nothing, uniform scaling only
//!   rescales the input, so both leave the buffer unchanged up to rounding
//! - **Deterministic**: with a seed, identical input gives identical output
//!
//! Coordinates are rounded half away from zero (`f64::round`).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::circle::{smallest_enclosing_circle, Circle};
use crate::geometry::Point;
use crate::resample::resample;
use crate::{Error, Result};

/// Default number of resampled points
pub const DEFAULT_POINTS: usize = 60;

/// Default half side of the target square
pub const DEFAULT_HALF_EXTENT: f64 = 250.0;

/// Scale factor used when the enclosing circle has zero radius
pub const DEGENERATE_SCALE: f64 = 1.0;

// ── Configuration ─────────────────────────────────────────

/// Per-invocation normalization settings.
///
/// Deserializes from `{"points": 60, "halfExtent": 250.0, "seed": 7}`;
/// missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct NormalizeConfig {
    /// Resampled point count N
    pub points: usize,
    /// Enclosing circle radius after scaling
    pub half_extent: f64,
    /// Seed for the shuffle inside the circle solver
    pub seed: Option<u64>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS,
            half_extent: DEFAULT_HALF_EXTENT,
            seed: None,
        }
    }
}

impl NormalizeConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.points == 0 {
            return Err(Error::Config("points must be at least 1".into()));
        }
        if !self.half_extent.is_finite() || self.half_extent <= 0.0 {
            return Err(Error::Config(format!(
                "halfExtent must be a positive finite number, got {}",
                self.half_extent
            )));
        }
        Ok(())
    }

    /// RNG for one call: seeded when a seed is set, otherwise fresh entropy
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}

// ── Result ────────────────────────────────────────────────

/// Normalized polyline: `coords` alternates x, y for each resampled point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationResult {
    coords: Vec<i64>,
    scale_factor: f64,
    circle: Circle,
}

impl NormalizationResult {
    pub fn coords(&self) -> &[i64] {
        &self.coords
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn circle(&self) -> &Circle {
        &self.circle
    }

    /// Iterate the buffer as `(x, y)` pairs
    pub fn points(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.coords.chunks_exact(2).map(|c| (c[0], c[1]))
    }
}

// ── Public API ─────────────────────────────────────────────

/// Normalize a polyline with the RNG described by `config`.
///
/// # Errors
/// `InvalidInput` for an empty polyline, a non-finite coordinate or
/// coordinates so large that the geometry overflows; `Config` for unusable
/// settings.
pub fn normalize(points: &[Point], config: &NormalizeConfig) -> Result<NormalizationResult> {
    let mut rng = config.rng();
    normalize_with_rng(points, config, &mut rng)
}

/// Normalize a polyline, drawing the solver's shuffle from `rng`
pub fn normalize_with_rng<R: Rng + ?Sized>(
    points: &[Point],
    config: &NormalizeConfig,
    rng: &mut R,
) -> Result<NormalizationResult> {
    config.validate()?;
    validate_points(points)?;

    let resampled = resample(points, config.points);
    let circle = smallest_enclosing_circle(&resampled, rng);
    if !circle.center.is_finite() || !circle.radius.is_finite() {
        return Err(overflow());
    }
    let scale_factor = scale_for(&circle, config.half_extent);

    log::debug!(
        "normalized {} points -> {} (center=({:.3}, {:.3}) r={:.3} scale={:.5})",
        points.len(),
        resampled.len(),
        circle.center.x,
        circle.center.y,
        circle.radius,
        scale_factor
    );

    let coords = resampled
        .iter()
        .flat_map(|p| {
            [
                (p.x - circle.center.x) * scale_factor,
                (p.y - circle.center.y) * scale_factor,
            ]
        })
        .map(|v| if v.is_finite() { Ok(round_coord(v)) } else { Err(overflow()) })
        .collect::<Result<Vec<i64>>>()?;

    Ok(NormalizationResult {
        coords,
        scale_factor,
        circle,
    })
}

/// `half_extent / r`, or [`DEGENERATE_SCALE`] for a zero-radius circle
pub fn scale_for(circle: &Circle, half_extent: f64) -> f64 {
    if circle.radius > 0.0 {
        half_extent / circle.radius
    } else {
        DEGENERATE_SCALE
    }
}

/// Round half away from zero
pub fn round_coord(v: f64) -> i64 {
    v.round() as i64
}

fn overflow() -> Error {
    Error::InvalidInput("coordinates are too large to normalize".into())
}

fn validate_points(points: &[Point]) -> Result<()> {
    if points.is_empty() {
        return Err(Error::InvalidInput("polyline has no points".into()));
    }
    if let Some((i, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
        return Err(Error::InvalidInput(format!(
            "point {} has a non-finite coordinate ({}, {})",
            i, p.x, p.y
        )));
    }
    Ok(())
}
