//! Python bindings for polynorm
//!
//! Thin wrapper around `polynorm-core` — ZERO logic here.
//! All behavior comes from the canonical Rust implementation.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Normalize one polyline.
///
/// Args:
///     line: JSON array, either [x1, y1, x2, y2, ...] or [{"x": .., "y": ..}, ...]
///     config: JSON settings {"points": 60, "halfExtent": 250, "seed": 7}; "" for defaults
///
/// Returns:
///     JSON string {"coords": [...], "scaleFactor": f, "circle": {"x", "y", "r"}}
///
/// Raises:
///     ValueError: If the line is empty, non-finite, or the settings are invalid
#[pyfunction]
#[pyo3(signature = (line, config = ""))]
fn normalize(line: &str, config: &str) -> PyResult<String> {
    polynorm_core::api::normalize_line_json(line, config)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Normalize every line of a document.
///
/// Accepts a flat or point-object line, an array of lines (optionally
/// wrapped as {"points": ..} or {"coords": ..}), or {"lines": [...]} /
/// {"segments": [...]}. Lines that fail are reported, not raised.
///
/// Returns:
///     JSON string {"lines": [...], "failures": [{"index": i, "message": "..."}]}
///
/// Raises:
///     ValueError: If the document or the settings cannot be parsed
#[pyfunction]
#[pyo3(signature = (document, config = ""))]
fn process(document: &str, config: &str) -> PyResult<String> {
    polynorm_core::api::process_document_json(document, config)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Angular distance in radians between two normalized coordinate buffers.
///
/// Raises:
///     ValueError: If the buffers differ in length or have odd length
#[pyfunction]
fn distance(a: Vec<f64>, b: Vec<f64>) -> PyResult<f64> {
    polynorm_core::similarity::cos_distance(&a, &b)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// polynorm Python module — polyline normalization
#[pymodule]
fn polynorm(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(normalize, m)?)?;
    m.add_function(wrap_pyfunction!(process, m)?)?;
    m.add_function(wrap_pyfunction!(distance, m)?)?;
    m.add("DEFAULT_POINTS", polynorm_core::normalizer::DEFAULT_POINTS)?;
    m.add(
        "DEFAULT_HALF_EXTENT",
        polynorm_core::normalizer::DEFAULT_HALF_EXTENT,
    )?;
    Ok(())
}
