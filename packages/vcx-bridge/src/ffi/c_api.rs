//! # C API
//!
//! Bridge lifecycle and diagnostics for the native host.
//!
//! All functions follow the naming convention: `vcx_bridge_<action>`

use std::ffi::CString;
use std::os::raw::c_char;
use std::sync::Arc;

use super::state::{install, registry, uninstall};
use super::types::{ErrorMessageFn, NativeErrorMessages};
use crate::error::{Error, Result, VcxErrorCode, SUCCESS};
use crate::registry::{CommandRegistry, RegistryConfig};
use crate::CommandHandle;

fn to_code(result: Result<()>) -> VcxErrorCode {
    match result {
        Ok(()) => SUCCESS,
        Err(e) => {
            tracing::warn!("vcx bridge call failed: {}", e);
            e.code()
        }
    }
}

fn into_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(s) => s.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

// ============================================================================
// LIFECYCLE
// ============================================================================

/// Initialize the bridge with a fresh registry
///
/// # Arguments
/// * `error_message` - libvcx's `vcx_error_c_message`, used to attach
///   messages to native errors (may be null)
///
/// # Returns
/// `0` on success, otherwise a bridge error code
#[no_mangle]
pub extern "C" fn vcx_bridge_init(error_message: Option<ErrorMessageFn>) -> VcxErrorCode {
    let mut registry = CommandRegistry::new(RegistryConfig::default());
    if let Some(lookup) = error_message {
        registry = registry.with_messages(Arc::new(NativeErrorMessages(lookup)));
    }
    to_code(install(Arc::new(registry)))
}

/// Shut down the bridge
///
/// Pending commands are discarded without their callbacks being invoked.
#[no_mangle]
pub extern "C" fn vcx_bridge_shutdown() -> VcxErrorCode {
    to_code(uninstall().map(|_| ()).ok_or(Error::NotInitialized))
}

/// Get the bridge version. Free with `vcx_bridge_free_string`.
#[no_mangle]
pub extern "C" fn vcx_bridge_version() -> *mut c_char {
    into_c_string(crate::version().to_string())
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Abandon a pending command; its callback is dropped without being invoked
///
/// # Returns
/// `1` if the command was pending, `0` otherwise
#[no_mangle]
pub extern "C" fn vcx_bridge_delete_command_handle(command_handle: CommandHandle) -> u32 {
    match registry() {
        Ok(registry) => u32::from(registry.remove_handle(command_handle)),
        Err(_) => 0,
    }
}

/// Number of commands awaiting completion (`0` when not initialized)
#[no_mangle]
pub extern "C" fn vcx_bridge_pending_count() -> u32 {
    registry()
        .map(|r| u32::try_from(r.pending_count()).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// Registry counters as JSON, or null when not initialized.
/// Free with `vcx_bridge_free_string`.
#[no_mangle]
pub extern "C" fn vcx_bridge_stats_json() -> *mut c_char {
    let json = registry().and_then(|r| Ok(serde_json::to_string(&r.stats())?));
    match json {
        Ok(json) => into_c_string(json),
        Err(e) => {
            tracing::debug!("No stats available: {}", e);
            std::ptr::null_mut()
        }
    }
}

/// Free a string returned by this API
///
/// # Safety
/// `ptr` must be null or a pointer returned by a `vcx_bridge_*` function
/// that has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn vcx_bridge_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// TESTS
// ============================================================================
