//! # FFI Types
//!
//! C signatures shared with libvcx (`vcx.h`).

use std::os::raw::{c_char, c_uint};

use crate::decode;
use crate::error::{ErrorMessageSource, VcxErrorCode};
use crate::CommandHandle;

/// `void (*)(vcx_command_handle_t, vcx_error_t)`
pub type CommonCb = extern "C" fn(command_handle: CommandHandle, err: VcxErrorCode);

/// `void (*)(vcx_command_handle_t, vcx_error_t, vcx_command_handle_t)`
pub type HandleCb =
    extern "C" fn(command_handle: CommandHandle, err: VcxErrorCode, handle: CommandHandle);

/// `void (*)(vcx_command_handle_t, vcx_error_t, const char *)`
pub type StringCb =
    extern "C" fn(command_handle: CommandHandle, err: VcxErrorCode, arg1: *const c_char);

/// `void (*)(vcx_command_handle_t, vcx_error_t, unsigned int)`
pub type BoolCb = extern "C" fn(command_handle: CommandHandle, err: VcxErrorCode, arg1: c_uint);

/// `void (*)(vcx_command_handle_t, vcx_error_t, const char *, const char *)`
pub type StringStringCb = extern "C" fn(
    command_handle: CommandHandle,
    err: VcxErrorCode,
    arg1: *const c_char,
    arg2: *const c_char,
);

/// `void (*)(vcx_command_handle_t, vcx_error_t, const uint8_t *, uint32_t)`
pub type DataCb =
    extern "C" fn(command_handle: CommandHandle, err: VcxErrorCode, data: *const u8, len: u32);

/// `void (*)(vcx_command_handle_t, vcx_error_t, const char *, const char *, const char *)`
pub type StringStringStringCb = extern "C" fn(
    command_handle: CommandHandle,
    err: VcxErrorCode,
    arg1: *const c_char,
    arg2: *const c_char,
    arg3: *const c_char,
);

/// `void (*)(vcx_command_handle_t, vcx_error_t, const char *, const uint8_t *, uint32_t)`
pub type StringDataCb = extern "C" fn(
    command_handle: CommandHandle,
    err: VcxErrorCode,
    arg1: *const c_char,
    data: *const u8,
    len: u32,
);

/// `void (*)(vcx_command_handle_t, vcx_error_t, int32_t)`
pub type NumberCb = extern "C" fn(command_handle: CommandHandle, err: VcxErrorCode, value: i32);

/// `void (*)(vcx_command_handle_t, vcx_error_t, const char *, const char *, unsigned long long)`
pub type StringStringLongCb = extern "C" fn(
    command_handle: CommandHandle,
    err: VcxErrorCode,
    arg1: *const c_char,
    arg2: *const c_char,
    arg3: u64,
);

/// `const char *vcx_error_c_message(vcx_error_t)`
///
/// The returned string is owned by libvcx and is not freed by the bridge.
pub type ErrorMessageFn = extern "C" fn(error_code: VcxErrorCode) -> *const c_char;

/// [`ErrorMessageSource`] backed by libvcx's message lookup.
#[derive(Clone, Copy)]
pub struct NativeErrorMessages(pub ErrorMessageFn);

impl ErrorMessageSource for NativeErrorMessages {
    fn message_for(&self, code: VcxErrorCode) -> Option<String> {
        // SAFETY: libvcx returns null or a static NUL-terminated string.
        unsafe { decode::c_string((self.0)(code)) }
    }
}
