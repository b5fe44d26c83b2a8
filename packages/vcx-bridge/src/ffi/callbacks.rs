//! # Completion Trampolines
//!
//! `extern "C"` functions handed to libvcx as completion callbacks, one per
//! callback shape. Each forwards to the matching typed `complete_*` entry
//! point of the installed registry.
//!
//! The `register_*` helpers store a closure and return its command handle
//! together with the trampoline of the same shape, so the pair passed to a
//! `vcx_*` call always matches.

// libvcx calls these through safe `extern fn` pointers and owns the
// pointer arguments for the duration of the call.
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::os::raw::{c_char, c_uint};

use super::state::{registry, registry_for_completion};
use super::types::*;
use crate::error::{Result, VcxErrorCode};
use crate::registry::{Callback, NativeResult};
use crate::CommandHandle;

// ============================================================================
// TRAMPOLINES
// ============================================================================

/// Completion with no payload
#[no_mangle]
pub extern "C" fn vcx_bridge_common_cb(command_handle: CommandHandle, err: VcxErrorCode) {
    if let Some(registry) = registry_for_completion(command_handle) {
        registry.complete(command_handle, err);
    }
}

/// Completion carrying a native object handle
#[no_mangle]
pub extern "C" fn vcx_bridge_handle_cb(
    command_handle: CommandHandle,
    err: VcxErrorCode,
    handle: CommandHandle,
) {
    if let Some(registry) = registry_for_completion(command_handle) {
        registry.complete_handle(command_handle, err, handle);
    }
}

/// Completion carrying one string
#[no_mangle]
pub extern "C" fn vcx_bridge_string_cb(
    command_handle: CommandHandle,
    err: VcxErrorCode,
    arg1: *const c_char,
) {
    if let Some(registry) = registry_for_completion(command_handle) {
        unsafe { registry.complete_str(command_handle, err, arg1) };
    }
}

/// Completion carrying a boolean
#[no_mangle]
pub extern "C" fn vcx_bridge_bool_cb(command_handle: CommandHandle, err: VcxErrorCode, arg1: c_uint) {
    if let Some(registry) = registry_for_completion(command_handle) {
        registry.complete_bool(command_handle, err, arg1);
    }
}

/// Completion carrying two strings
#[no_mangle]
pub extern "C" fn vcx_bridge_string_string_cb(
    command_handle: CommandHandle,
    err: VcxErrorCode,
    arg1: *const c_char,
    arg2: *const c_char,
) {
    if let Some(registry) = registry_for_completion(command_handle) {
        unsafe { registry.complete_str_str(command_handle, err, arg1, arg2) };
    }
}

/// Completion carrying a binary buffer
#[no_mangle]
pub extern "C" fn vcx_bridge_data_cb(
    command_handle: CommandHandle,
    err: VcxErrorCode,
    data: *const u8,
    len: u32,
) {
    if let Some(registry) = registry_for_completion(command_handle) {
        unsafe { registry.complete_data(command_handle, err, data, len) };
    }
}

/// Completion carrying three strings
#[no_mangle]
pub extern "C" fn vcx_bridge_string_string_string_cb(
    command_handle: CommandHandle,
    err: VcxErrorCode,
    arg1: *const c_char,
    arg2: *const c_char,
    arg3: *const c_char,
) {
    if let Some(registry) = registry_for_completion(command_handle) {
        unsafe { registry.complete_str_str_str(command_handle, err, arg1, arg2, arg3) };
    }
}

/// Completion carrying a string and a binary buffer
#[no_mangle]
pub extern "C" fn vcx_bridge_string_data_cb(
    command_handle: CommandHandle,
    err: VcxErrorCode,
    arg1: *const c_char,
    data: *const u8,
    len: u32,
) {
    if let Some(registry) = registry_for_completion(command_handle) {
        unsafe { registry.complete_str_data(command_handle, err, arg1, data, len) };
    }
}

/// Completion carrying a signed number
#[no_mangle]
pub extern "C" fn vcx_bridge_number_cb(command_handle: CommandHandle, err: VcxErrorCode, value: i32) {
    if let Some(registry) = registry_for_completion(command_handle) {
        registry.complete_number(command_handle, err, value);
    }
}

/// Completion carrying two strings and an unsigned 64-bit value
#[no_mangle]
pub extern "C" fn vcx_bridge_string_string_long_cb(
    command_handle: CommandHandle,
    err: VcxErrorCode,
    arg1: *const c_char,
    arg2: *const c_char,
    arg3: u64,
) {
    if let Some(registry) = registry_for_completion(command_handle) {
        unsafe { registry.complete_str_str_u64(command_handle, err, arg1, arg2, arg3) };
    }
}

// ============================================================================
// REGISTRATION
// ============================================================================

/// Register a no-payload callback with the installed registry
pub fn register_common(
    f: impl FnOnce(NativeResult<()>) + Send + 'static,
) -> Result<(CommandHandle, CommonCb)> {
    Ok((registry()?.create_handle(Callback::plain(f)), vcx_bridge_common_cb))
}

/// Register a native-object-handle callback with the installed registry
pub fn register_handle(
    f: impl FnOnce(NativeResult<CommandHandle>) + Send + 'static,
) -> Result<(CommandHandle, HandleCb)> {
    Ok((registry()?.create_handle(Callback::handle(f)), vcx_bridge_handle_cb))
}

/// Register a string callback with the installed registry
pub fn register_string(
    f: impl FnOnce(NativeResult<Option<String>>) + Send + 'static,
) -> Result<(CommandHandle, StringCb)> {
    Ok((registry()?.create_handle(Callback::string(f)), vcx_bridge_string_cb))
}

/// Register a boolean callback with the installed registry
pub fn register_bool(
    f: impl FnOnce(NativeResult<bool>) + Send + 'static,
) -> Result<(CommandHandle, BoolCb)> {
    Ok((registry()?.create_handle(Callback::boolean(f)), vcx_bridge_bool_cb))
}

/// Register a two-string callback with the installed registry
pub fn register_string_string(
    f: impl FnOnce(NativeResult<(Option<String>, Option<String>)>) + Send + 'static,
) -> Result<(CommandHandle, StringStringCb)> {
    Ok((
        registry()?.create_handle(Callback::string_pair(f)),
        vcx_bridge_string_string_cb,
    ))
}

/// Register a buffer callback with the installed registry
pub fn register_data(
    f: impl FnOnce(NativeResult<Vec<u8>>) + Send + 'static,
) -> Result<(CommandHandle, DataCb)> {
    Ok((registry()?.create_handle(Callback::data(f)), vcx_bridge_data_cb))
}

/// Register a three-string callback with the installed registry
pub fn register_string_string_string(
    f: impl FnOnce(NativeResult<(Option<String>, Option<String>, Option<String>)>) + Send + 'static,
) -> Result<(CommandHandle, StringStringStringCb)> {
    Ok((
        registry()?.create_handle(Callback::string_triple(f)),
        vcx_bridge_string_string_string_cb,
    ))
}

/// Register a string-and-buffer callback with the installed registry
pub fn register_string_data(
    f: impl FnOnce(NativeResult<(Option<String>, Vec<u8>)>) + Send + 'static,
) -> Result<(CommandHandle, StringDataCb)> {
    Ok((
        registry()?.create_handle(Callback::string_data(f)),
        vcx_bridge_string_data_cb,
    ))
}

/// Register a number callback with the installed registry
pub fn register_number(
    f: impl FnOnce(NativeResult<i32>) + Send + 'static,
) -> Result<(CommandHandle, NumberCb)> {
    Ok((registry()?.create_handle(Callback::number(f)), vcx_bridge_number_cb))
}

/// Register a two-string-and-`u64` callback with the installed registry
pub fn register_string_string_long(
    f: impl FnOnce(NativeResult<(Option<String>, Option<String>, u64)>) + Send + 'static,
) -> Result<(CommandHandle, StringStringLongCb)> {
    Ok((
        registry()?.create_handle(Callback::string_pair_u64(f)),
        vcx_bridge_string_string_long_cb,
    ))
}

// ============================================================================
// TESTS
// ============================================================================
