//! # Native Argument Decoding
//!
//! Converts libvcx callback arguments into owned Rust values.
//!
//! | Native | Rust |
//! |--------|------|
//! | `const char *` (nullable) | `Option<String>` |
//! | `const uint8_t *` + `uint32_t` | `Vec<u8>` |
//! | `unsigned int` flag | `bool` |
//! | `vcx_error_t` | `Result<(), NativeError>` |

use std::ffi::CStr;
use std::os::raw::{c_char, c_uint};

use crate::error::{ErrorMessageSource, NativeError, VcxErrorCode, SUCCESS};

/// Decode a nullable C string.
///
/// A null pointer is `None`, never the empty string. Invalid UTF-8 is
/// replaced lossily.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated buffer that stays valid
/// for the duration of the call.
pub unsafe fn c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }

    let cstr = CStr::from_ptr(ptr);
    match cstr.to_str() {
        Ok(s) => Some(s.to_owned()),
        Err(e) => {
            tracing::warn!("String from libvcx with malformed utf8: {}", e);
            Some(cstr.to_string_lossy().into_owned())
        }
    }
}

/// Copy a `(pointer, length)` buffer, length-exact.
///
/// # Safety
/// When `len` is non-zero and `ptr` is non-null, `ptr` must be valid for
/// reads of `len` bytes.
pub unsafe fn c_buffer(ptr: *const u8, len: u32) -> Vec<u8> {
    if len == 0 {
        return Vec::new();
    }
    if ptr.is_null() {
        tracing::warn!("Null buffer from libvcx with length {}", len);
        return Vec::new();
    }

    std::slice::from_raw_parts(ptr, len as usize).to_vec()
}

/// Native booleans arrive as `unsigned int`.
pub fn c_bool(value: c_uint) -> bool {
    value != 0
}

/// Map a libvcx error code to a result, resolving a message when possible.
pub fn error_code(
    code: VcxErrorCode,
    messages: Option<&dyn ErrorMessageSource>,
) -> Result<(), NativeError> {
    if code == SUCCESS {
        return Ok(());
    }

    Err(NativeError {
        code,
        message: messages.and_then(|m| m.message_for(code)),
    })
}
