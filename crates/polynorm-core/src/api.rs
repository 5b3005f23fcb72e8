//! JSON-in / JSON-out entry points shared by the language bindings
//!
//! Every binding forwards strings to these functions, so all bindings
//! accept and produce exactly the same documents.

use crate::batch::process_document;
use crate::document::{coords_from_json, Document, LineShape};
use crate::normalizer::{normalize, NormalizeConfig};
use crate::similarity::cos_distance;
use crate::Result;

/// Parse settings; an empty or blank string means defaults
pub fn config_from_json(config: &str) -> Result<NormalizeConfig> {
    if config.trim().is_empty() {
        Ok(NormalizeConfig::default())
    } else {
        NormalizeConfig::from_json(config)
    }
}

/// Normalize one line given as a flat array or an array of point objects.
///
/// Returns `{"coords": [...], "scaleFactor": f, "circle": {"x", "y", "r"}}`.
pub fn normalize_line_json(line: &str, config: &str) -> Result<String> {
    let config = config_from_json(config)?;
    let shape: LineShape = serde_json::from_str(line)?;
    let result = normalize(&shape.to_points(), &config)?;
    Ok(serde_json::to_string(&result)?)
}

/// Normalize every line of a document.
///
/// Returns `{"lines": [...], "failures": [{"index": i, "message": "..."}]}`.
pub fn process_document_json(document: &str, config: &str) -> Result<String> {
    let config = config_from_json(config)?;
    let document = Document::from_json(document)?;
    let report = process_document(&document, &config)?;

    let failures: Vec<serde_json::Value> = report
        .failures
        .iter()
        .map(|f| {
            serde_json::json!({
                "index": f.index,
                "message": f.error.to_string(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "lines": report.lines,
        "failures": failures,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Angular distance between two coordinate buffers given as JSON
pub fn distance_json(lhs: &str, rhs: &str) -> Result<f64> {
    let lhs = coords_from_json(lhs)?;
    let rhs = coords_from_json(rhs)?;
    cos_distance(&lhs, &rhs)
}
