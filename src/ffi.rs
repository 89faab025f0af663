//! FFI bindings for the Wellspring engine
//!
//! C-compatible functions for calling the engine from other languages.
//! All functions take and return null-terminated JSON strings. Returned
//! strings are heap-allocated and must be released with
//! `wellspring_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::Utc;

use crate::error::EngineError;
use crate::pipeline::{analyze_domain, generate_daily_plans, generate_plan};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Convert a C string to an owned Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Read a required argument, recording an error when it is missing
unsafe fn required_arg(ptr: *const c_char, name: &str) -> Option<String> {
    let value = cstr_to_string(ptr);
    if value.is_none() {
        set_last_error(&format!("Invalid {name} string pointer"));
    }
    value
}

/// Convert a Rust string to a C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn respond(result: Result<String, EngineError>) -> *mut c_char {
    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Domain analysis
// ============================================================================

/// Analyze one domain and return its report as JSON.
///
/// # Safety
/// - `domain` and `json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `wellspring_free_string`.
/// - Returns NULL on error; call `wellspring_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellspring_analyze_domain(
    domain: *const c_char,
    json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(domain) = required_arg(domain, "domain") else {
        return ptr::null_mut();
    };
    let Some(json) = required_arg(json, "JSON") else {
        return ptr::null_mut();
    };

    respond(analyze_domain(&domain, &json, Utc::now()))
}

// ============================================================================
// Planning
// ============================================================================

/// Generate a long-term plan starting now.
///
/// # Safety
/// - `snapshot_json`, `duration` and `urgency` must be valid null-terminated C strings.
/// - `config_json` may be NULL to use the default configuration.
/// - Returns a newly allocated string that must be freed with `wellspring_free_string`.
/// - Returns NULL on error; call `wellspring_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellspring_generate_plan(
    snapshot_json: *const c_char,
    duration: *const c_char,
    urgency: *const c_char,
    config_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(snapshot) = required_arg(snapshot_json, "snapshot JSON") else {
        return ptr::null_mut();
    };
    let Some(duration) = required_arg(duration, "duration") else {
        return ptr::null_mut();
    };
    let Some(urgency) = required_arg(urgency, "urgency") else {
        return ptr::null_mut();
    };
    let config = cstr_to_string(config_json);

    respond(generate_plan(
        &snapshot,
        &duration,
        &urgency,
        Utc::now(),
        config.as_deref(),
    ))
}

/// Expand a plan into a JSON array of daily entries.
///
/// # Safety
/// - `plan_json`, `snapshot_json` and `season` must be valid null-terminated C strings.
/// - `config_json` may be NULL to use the default configuration.
/// - Returns a newly allocated string that must be freed with `wellspring_free_string`.
/// - Returns NULL on error; call `wellspring_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellspring_generate_daily_plans(
    plan_json: *const c_char,
    snapshot_json: *const c_char,
    season: *const c_char,
    config_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(plan) = required_arg(plan_json, "plan JSON") else {
        return ptr::null_mut();
    };
    let Some(snapshot) = required_arg(snapshot_json, "snapshot JSON") else {
        return ptr::null_mut();
    };
    let Some(season) = required_arg(season, "season") else {
        return ptr::null_mut();
    };
    let config = cstr_to_string(config_json);

    respond(generate_daily_plans(
        &plan,
        &snapshot,
        &season,
        config.as_deref(),
    ))
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by a Wellspring function.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Wellspring function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn wellspring_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Wellspring call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn wellspring_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the engine version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn wellspring_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "profile": { "age_years": 30, "sex": "male", "height_cm": 182.0, "weight_kg": 88.0 }
    }"#;

    unsafe fn take_string(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null());
        let s = CStr::from_ptr(ptr).to_str().unwrap().to_string();
        wellspring_free_string(ptr);
        s
    }

    #[test]
    fn test_ffi_analyze_domain() {
        let domain = CString::new("sleep").unwrap();
        let json = CString::new(r#"{"tests": [], "sessions": []}"#).unwrap();

        unsafe {
            let result = take_string(wellspring_analyze_domain(domain.as_ptr(), json.as_ptr()));
            assert!(result.contains("\"domain\":\"sleep\""));
            assert!(wellspring_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_plan_lifecycle() {
        let snapshot = CString::new(SNAPSHOT).unwrap();
        let duration = CString::new("three_months").unwrap();
        let urgency = CString::new("moderate").unwrap();
        let season = CString::new("winter").unwrap();

        unsafe {
            let plan = wellspring_generate_plan(
                snapshot.as_ptr(),
                duration.as_ptr(),
                urgency.as_ptr(),
                ptr::null(),
            );
            assert!(!plan.is_null());

            let days = wellspring_generate_daily_plans(
                plan,
                snapshot.as_ptr(),
                season.as_ptr(),
                ptr::null(),
            );
            let days = take_string(days);
            assert!(days.starts_with('['));
            assert!(days.contains("\"day_number\":90"));

            wellspring_free_string(plan);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        let domain = CString::new("smell").unwrap();
        let json = CString::new("{}").unwrap();

        unsafe {
            let result = wellspring_analyze_domain(domain.as_ptr(), json.as_ptr());
            assert!(result.is_null());

            let error = wellspring_last_error();
            assert!(!error.is_null());
            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(error_str.contains("smell"));
        }
    }

    #[test]
    fn test_ffi_null_argument() {
        let json = CString::new("{}").unwrap();

        unsafe {
            let result = wellspring_analyze_domain(ptr::null(), json.as_ptr());
            assert!(result.is_null());
            let error_str = CStr::from_ptr(wellspring_last_error()).to_str().unwrap();
            assert_eq!(error_str, "Invalid domain string pointer");
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = wellspring_version();
            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert_eq!(version_str, env!("CARGO_PKG_VERSION"));
        }
    }
}
