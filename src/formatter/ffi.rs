//! Adapter for engines exposing a C calling convention
//!
//! The engine contract is two functions, plus an optional third:
//!
//! ```text
//! format(const char *source) -> char *   // NULL signals failure
//! free_string(char *formatted)           // releases a non-NULL result
//! last_error() -> const char *           // why the last NULL happened, or NULL
//! ```
//!
//! The `last_error` string is borrowed from the engine and only read before the
//! next call into it.
//!
//! The adapter owns the NUL-terminated input buffer for the duration of the call
//! and wraps the returned pointer in [`EngineString`], whose `Drop` hands it back
//! to `free_string`. Both buffers are therefore released on every exit path.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr::NonNull;

use super::{FormatError, FormatOutcome, Formatter};

/// `format` entry point of an engine
pub type FormatFn = unsafe extern "C" fn(*const c_char) -> *mut c_char;
/// `free_string` entry point of an engine
pub type FreeFn = unsafe extern "C" fn(*mut c_char);
/// `last_error` entry point of an engine
pub type LastErrorFn = unsafe extern "C" fn() -> *const c_char;

/// The entry points making up an engine
#[derive(Debug, Clone, Copy)]
pub struct EngineAbi {
    pub format: FormatFn,
    pub free_string: FreeFn,
    pub last_error: Option<LastErrorFn>,
}

/// Formatter backed by an [`EngineAbi`]
#[derive(Debug, Clone)]
pub struct FfiFormatter {
    name: String,
    abi: EngineAbi,
}

impl FfiFormatter {
    pub fn new(name: impl Into<String>, abi: EngineAbi) -> Self {
        Self {
            name: name.into(),
            abi,
        }
    }
}

impl Formatter for FfiFormatter {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self, source: &str) -> FormatOutcome {
        let input = CString::new(source).map_err(|e| {
            FormatError::new(format!(
                "Source contains a NUL byte at offset {}",
                e.nul_position()
            ))
        })?;

        // SAFETY: `input` is NUL-terminated and outlives the call.
        let raw = unsafe { (self.abi.format)(input.as_ptr()) };
        drop(input);

        let Some(result) = EngineString::adopt(raw, self.abi.free_string) else {
            tracing::debug!("Engine '{}' returned the failure sentinel", self.name);
            return Err(match self.failure_reason() {
                Some(reason) => FormatError::new(reason),
                None => FormatError::unexplained(),
            });
        };

        result.to_owned_string()
    }
}

impl FfiFormatter {
    /// The engine's explanation for its last failure, when it offers one
    fn failure_reason(&self) -> Option<String> {
        let last_error = self.abi.last_error?;
        // SAFETY: the engine keeps the string alive until its next call, and
        // it is copied out before returning.
        unsafe {
            let raw = last_error();
            if raw.is_null() {
                return None;
            }
            Some(CStr::from_ptr(raw).to_string_lossy().into_owned())
        }
    }
}

/// A string allocated by the engine, released through its `free_string`
struct EngineString {
    ptr: NonNull<c_char>,
    free: FreeFn,
}

impl EngineString {
    fn adopt(raw: *mut c_char, free: FreeFn) -> Option<Self> {
        NonNull::new(raw).map(|ptr| Self { ptr, free })
    }

    fn to_owned_string(&self) -> FormatOutcome {
        // SAFETY: the engine returns a NUL-terminated string that stays valid
        // until handed back to `free_string`, which only happens in `drop`.
        let text = unsafe { CStr::from_ptr(self.ptr.as_ptr()) };
        text.to_str()
            .map(str::to_owned)
            .map_err(|e| FormatError::new(format!("Formatter returned invalid UTF-8: {}", e)))
    }
}

impl Drop for EngineString {
    fn drop(&mut self) {
        // SAFETY: the pointer came from this engine's `format` and is freed once.
        unsafe { (self.free)(self.ptr.as_ptr()) }
    }
}
