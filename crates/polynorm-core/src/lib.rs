//! Polynorm Core - fixed-size, scale- and translation-invariant polylines
//!
//! Pure computation: no file, network or global state. The CLI and the
//! language bindings are thin wrappers around this crate.
//!
//! # Architecture
//!
//! ```text
//! JSON → Document → lines → Resampler → Enclosing-Circle Solver → Normalizer
//!                                                                    ↓
//!                                            BatchReport ← NormalizationResult
//!                                                                    ↓
//!                                                    VpTree (nearest shapes)
//! ```
//!
//! # Guarantees
//!
//! - **Fixed size**: every result holds exactly `2 · N` coordinates
//! - **Contained**: every resampled point lies within `r · (1 + 1e-6)` of the circle center
//! - **Deterministic**: a seeded run always produces identical output
//! - **Isolated**: one bad line never aborts a batch

pub mod api;
pub mod batch;
pub mod circle;
pub mod document;
pub mod error;
pub mod geometry;
pub mod normalizer;
pub mod resample;
pub mod similarity;
pub mod vptree;

pub use batch::{process_document, BatchReport, LineFailure, ProcessedLine};
pub use circle::{smallest_enclosing_circle, Circle};
pub use document::{Document, LineEntry, LineShape};
pub use error::{Error, Result};
pub use geometry::Point;
pub use normalizer::{normalize, normalize_with_rng, NormalizationResult, NormalizeConfig};
pub use resample::resample;
pub use vptree::{Neighbor, VpTree};
