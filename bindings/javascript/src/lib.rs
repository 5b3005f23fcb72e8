//! JavaScript/TypeScript bindings for polynorm
//!
//! Thin wrapper around `polynorm-core` compiled to WebAssembly.
//! ZERO logic here — all behavior from the canonical Rust implementation.

use wasm_bindgen::prelude::*;

/// Normalize one polyline.
///
/// @param line - JSON array: [x1, y1, ...] or [{x, y}, ...]
/// @param config - JSON settings { points, halfExtent, seed }, or "" for defaults
/// @returns JSON string { coords, scaleFactor, circle: { x, y, r } }
/// @throws Error if the line is empty, non-finite, or the settings are invalid
#[wasm_bindgen]
pub fn normalize(line: &str, config: &str) -> Result<String, JsError> {
    polynorm_core::api::normalize_line_json(line, config)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Normalize every line of a document.
///
/// @param document - any accepted document shape (flat line, batch array,
///   { lines: [...] } or { segments: [...] })
/// @param config - JSON settings, or "" for defaults
/// @returns JSON string { lines: [...], failures: [{ index, message }] }
/// @throws Error if the document or the settings cannot be parsed
#[wasm_bindgen]
pub fn process(document: &str, config: &str) -> Result<String, JsError> {
    polynorm_core::api::process_document_json(document, config)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Angular distance in radians between two coordinate buffers.
///
/// @throws Error if the buffers differ in length or have odd length
#[wasm_bindgen]
pub fn distance(a: &[f64], b: &[f64]) -> Result<f64, JsError> {
    polynorm_core::similarity::cos_distance(a, b).map_err(|e| JsError::new(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_normalize_square() {
        let out = normalize("[0, 0, 10, 0, 10, 10, 0, 10]", r#"{"points": 4, "seed": 5}"#).unwrap();
        assert!(out.contains("\"coords\":[-177,-177,177,-177,177,177,-177,177]"));
    }

    #[wasm_bindgen_test]
    fn test_distance_identical() {
        let a = [3.0, 4.0, -1.0, 2.0];
        assert_eq!(distance(&a, &a).unwrap(), 0.0);
    }
}
