//! # FFI Bindings
//!
//! The C side of the bridge: what libvcx calls back into, and what the
//! iOS host calls to set the bridge up.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         FFI ARCHITECTURE                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Swift / Objective-C host                                               │
//! │         │ vcx_bridge_init / vcx_bridge_shutdown                         │
//! │         ▼                                                               │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  state: installed Arc<CommandRegistry>                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │         ▲                                   │                           │
//! │         │ complete_*                        │ register_* → (h, cb)      │
//! │  ┌──────┴──────────────────────┐            ▼                           │
//! │  │  callbacks: vcx_bridge_*_cb │◄──── libvcx thread pool ◄── vcx_*(h,cb)│
//! │  └─────────────────────────────┘                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Lifecycle functions return `0` or an [`crate::Error::code`]. Completion
//! trampolines never fail: a completion with no bridge installed, or for a
//! handle that is not pending, is logged and dropped.

mod callbacks;
mod c_api;
mod state;
mod types;

pub use callbacks::*;
pub use c_api::*;
pub use state::{install, registry, uninstall};
pub use types::*;
