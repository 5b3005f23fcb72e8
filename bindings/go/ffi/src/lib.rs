//! C-FFI layer for polynorm — used by Go (cgo) and other FFI consumers.
//!
//! ZERO logic here. All calls delegate to `polynorm-core`.
//!
//! # Memory Contract
//!
//! All functions that return `*mut c_char` allocate via `CString`.
//! The caller MUST free the returned string by calling `polynorm_free_string()`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Result from a polynorm FFI call.
/// If `error` is null, the call succeeded and `result` contains the output.
/// If `error` is non-null, the call failed and `error` contains the error message.
/// The caller MUST free both `result` and `error` with `polynorm_free_string()`.
#[repr(C)]
pub struct PolynormResult {
    pub result: *mut c_char,
    pub error: *mut c_char,
}

impl PolynormResult {
    fn ok(value: String) -> Self {
        PolynormResult {
            result: into_c_string(value, ""),
            error: std::ptr::null_mut(),
        }
    }

    fn err(msg: String) -> Self {
        PolynormResult {
            result: std::ptr::null_mut(),
            error: into_c_string(msg, "unknown error"),
        }
    }

    fn from_core(outcome: polynorm_core::Result<String>) -> Self {
        match outcome {
            Ok(json) => PolynormResult::ok(json),
            Err(e) => PolynormResult::err(e.to_string()),
        }
    }
}

/// Interior NUL bytes cannot cross the boundary; fall back to `fallback`
fn into_c_string(value: String, fallback: &str) -> *mut c_char {
    CString::new(value)
        .or_else(|_| CString::new(fallback))
        .unwrap_or_default()
        .into_raw()
}

/// Helper: convert a C string pointer to a Rust &str.
/// Returns None if the pointer is null or not valid UTF-8.
unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Normalize one polyline given as a JSON array.
/// `config` may be null or empty for the default settings.
/// Returns JSON: { "coords": [...], "scaleFactor": f, "circle": {...} }
///
/// # Safety
/// `line` must be a valid null-terminated UTF-8 C string; `config` must be
/// one or null. The caller must free the returned strings with
/// `polynorm_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn polynorm_normalize(
    line: *const c_char,
    config: *const c_char,
) -> PolynormResult {
    let line = match cstr_to_str(line) {
        Some(s) => s,
        None => return PolynormResult::err("null or invalid UTF-8 line".into()),
    };
    let config = cstr_to_str(config).unwrap_or("");

    PolynormResult::from_core(polynorm_core::api::normalize_line_json(line, config))
}

/// Normalize every line of a JSON document.
/// Returns JSON: { "lines": [...], "failures": [...] }
///
/// # Safety
/// `document` must be a valid null-terminated UTF-8 C string; `config` must
/// be one or null. The caller must free the returned strings with
/// `polynorm_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn polynorm_process(
    document: *const c_char,
    config: *const c_char,
) -> PolynormResult {
    let document = match cstr_to_str(document) {
        Some(s) => s,
        None => return PolynormResult::err("null or invalid UTF-8 document".into()),
    };
    let config = cstr_to_str(config).unwrap_or("");

    PolynormResult::from_core(polynorm_core::api::process_document_json(document, config))
}

/// Angular distance between two coordinate buffers (JSON arrays or
/// objects with `coords`). The distance is returned as a decimal string.
///
/// # Safety
/// `a` and `b` must be valid null-terminated UTF-8 C strings.
/// The caller must free the returned strings with `polynorm_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn polynorm_distance(a: *const c_char, b: *const c_char) -> PolynormResult {
    let (a, b) = match (cstr_to_str(a), cstr_to_str(b)) {
        (Some(a), Some(b)) => (a, b),
        _ => return PolynormResult::err("null or invalid UTF-8 input".into()),
    };

    PolynormResult::from_core(polynorm_core::api::distance_json(a, b).map(|d| d.to_string()))
}

/// Free a string previously returned by a polynorm FFI function.
///
/// # Safety
/// `ptr` must be a pointer previously returned by a polynorm FFI function,
/// or null (in which case this is a no-op).
#[no_mangle]
pub unsafe extern "C" fn polynorm_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}
