//! # vcx-bridge
//!
//! Command-handle registry between libvcx's asynchronous C API and an
//! application's completion callbacks.
//!
//! Every asynchronous libvcx call takes a command handle and a C callback.
//! The bridge issues the handle, keeps the application's closure until
//! libvcx reports back on one of its own threads, decodes the native error
//! code and arguments, and runs the closure exactly once.
//!
//! ## Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            VCX BRIDGE                                   │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Application                                                            │
//! │     │  create_handle(Callback::string(|r| ..))                          │
//! │     ▼                                                                   │
//! │  ┌─────────────────┐   h    ┌──────────────────────┐                    │
//! │  │ CommandRegistry │──────► │ vcx_*(h, .., cb)     │  libvcx            │
//! │  │                 │        └──────────┬───────────┘                    │
//! │  │ h → Callback    │                   │ later, any thread              │
//! │  │                 │ ◄─────────────────┘ cb(h, err, args..)             │
//! │  └────────┬────────┘  complete_str(h, err, ptr)                         │
//! │           │ decode outside the lock                                     │
//! │           ▼                                                             │
//! │  closure(Ok(Some("..."))) or closure(Err(NativeError { code, .. }))     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Bridge errors, native errors, message lookup
//! - [`registry`] - The handle table and typed completion entry points
//! - [`decode`] - Native argument decoding
//! - [`completion`] - Future adapter over a callback slot
//! - `ffi` - C trampolines and lifecycle API (feature `ffi`)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod completion;
pub mod decode;
pub mod error;
pub mod registry;

#[cfg(feature = "ffi")]
pub mod ffi;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use completion::Completion;
pub use error::{
    CompletionError, Error, ErrorMessageSource, NativeError, Result, VcxErrorCode, SUCCESS,
};
pub use registry::{Callback, CallbackKind, CommandRegistry, NativeResult, RegistryConfig, RegistryStats};

/// Opaque command handle (`vcx_command_handle_t`)
pub type CommandHandle = u32;

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of the bridge
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// TESTS
// ============================================================================
