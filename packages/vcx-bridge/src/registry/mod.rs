//! # Command Handle Registry
//!
//! Correlates libvcx asynchronous completions with the callbacks that are
//! waiting for them.
//!
//! ## Lifecycle of a handle
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       COMMAND HANDLE LIFECYCLE                          │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  create_handle(cb) ──► handle h ──► vcx_*(h, ..., trampoline)           │
//! │                            │                                            │
//! │                            ▼                                            │
//! │                    ┌───────────────┐                                    │
//! │                    │   PENDING     │  lookup(h) sees it                 │
//! │                    └───────┬───────┘                                    │
//! │          ┌─────────────────┼──────────────────┐                         │
//! │          ▼                 ▼                  ▼                         │
//! │   complete_*(h, ..)   remove_handle(h)     drain()                      │
//! │   take under lock,    dropped, never       dropped, never               │
//! │   decode + invoke     invoked              invoked                      │
//! │   outside the lock                                                      │
//! │          │                 │                  │                         │
//! │          └─────────────────┴──────────────────┘                         │
//! │                            ▼                                            │
//! │                    handle h is free again                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A completion for a handle that is not pending (already completed,
//! removed, drained, never issued) is logged, counted and dropped. So is a
//! completion whose shape differs from the registered callback, which then
//! loses its entry without being invoked.

mod callback;
mod complete;

pub use callback::{BoxedCallback, Callback, CallbackKind, NativeResult};

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use crate::decode;
use crate::error::{ErrorMessageSource, NativeError, VcxErrorCode};
use crate::CommandHandle;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for a [`CommandRegistry`]
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// First handle value issued. `0` is never issued.
    pub first_handle: CommandHandle,
    /// Log a warning when the number of pending handles grows past this
    /// value. Usually a sign that libvcx is not calling back.
    pub pending_warn_threshold: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            first_handle: 1,
            pending_warn_threshold: 1024,
        }
    }
}

// ============================================================================
// STATS
// ============================================================================

/// Snapshot of registry counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Handles issued by `create_handle`
    pub issued: u64,
    /// Callbacks invoked by a completion
    pub completed: u64,
    /// Completions dropped because the handle was not pending
    pub dropped_unknown: u64,
    /// Completions dropped because the pending callback has another shape
    pub dropped_mismatch: u64,
    /// Handles removed through `remove_handle`
    pub removed: u64,
    /// Handles discarded by `drain`
    pub drained: u64,
    /// Handles currently pending
    pub pending: u64,
}

#[derive(Default)]
struct Counters {
    issued: AtomicU64,
    completed: AtomicU64,
    dropped_unknown: AtomicU64,
    dropped_mismatch: AtomicU64,
    removed: AtomicU64,
    drained: AtomicU64,
}

fn bump(counter: &AtomicU64, by: u64) {
    counter.fetch_add(by, Ordering::Relaxed);
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Table of pending libvcx commands keyed by command handle.
///
/// Safe to share between threads; libvcx completes commands from its own
/// thread pool in any order. The internal lock is only held for the map
/// operation itself, never while decoding arguments or running a callback,
/// so a callback may register new handles.
pub struct CommandRegistry {
    config: RegistryConfig,
    next_handle: AtomicU32,
    pending: Mutex<HashMap<CommandHandle, Callback>>,
    messages: Option<Arc<dyn ErrorMessageSource>>,
    counters: Counters,
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            next_handle: AtomicU32::new(config.first_handle),
            config,
            pending: Mutex::new(HashMap::new()),
            messages: None,
            counters: Counters::default(),
        }
    }

    /// Resolve native error messages through `source`
    pub fn with_messages(mut self, source: Arc<dyn ErrorMessageSource>) -> Self {
        self.messages = Some(source);
        self
    }

    /// Store `callback` and return a fresh handle for it.
    ///
    /// The handle is unique among pending handles. The counter wraps after
    /// 2^32 allocations; on wrap it skips `0` and any handle still pending.
    pub fn create_handle(&self, callback: Callback) -> CommandHandle {
        let kind = callback.kind();
        let mut pending = self.pending.lock();
        let handle = loop {
            let candidate = self.next_handle.fetch_add(1, Ordering::Relaxed);
            if candidate != 0 && !pending.contains_key(&candidate) {
                break candidate;
            }
        };
        pending.insert(handle, callback);
        let count = pending.len();
        drop(pending);

        bump(&self.counters.issued, 1);
        if count == self.config.pending_warn_threshold.saturating_add(1) {
            tracing::warn!(
                "{} libvcx commands pending, completions may be getting lost",
                count
            );
        }
        tracing::trace!("Registered {} callback for command handle {}", kind, handle);
        handle
    }

    /// Shape of the callback pending on `handle`, without removing it
    pub fn lookup(&self, handle: CommandHandle) -> Option<CallbackKind> {
        self.pending.lock().get(&handle).map(Callback::kind)
    }

    /// Drop the callback pending on `handle` without invoking it.
    ///
    /// Idempotent. Returns whether a callback was pending.
    pub fn remove_handle(&self, handle: CommandHandle) -> bool {
        let removed = self.pending.lock().remove(&handle);
        match removed {
            Some(callback) => {
                bump(&self.counters.removed, 1);
                tracing::debug!("Removed {} callback for command handle {}", callback.kind(), handle);
                drop(callback);
                true
            }
            None => false,
        }
    }

    /// Discard every pending callback without invoking it.
    ///
    /// Used at teardown so that no completion reaches application state that
    /// is going away. Returns the number of callbacks discarded.
    pub fn drain(&self) -> usize {
        let drained = std::mem::take(&mut *self.pending.lock());
        let count = drained.len();
        drop(drained);

        if count > 0 {
            bump(&self.counters.drained, count as u64);
            tracing::info!("Discarded {} pending libvcx commands", count);
        }
        count
    }

    /// Number of handles awaiting completion
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Snapshot of the registry counters
    pub fn stats(&self) -> RegistryStats {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        RegistryStats {
            issued: load(&self.counters.issued),
            completed: load(&self.counters.completed),
            dropped_unknown: load(&self.counters.dropped_unknown),
            dropped_mismatch: load(&self.counters.dropped_mismatch),
            removed: load(&self.counters.removed),
            drained: load(&self.counters.drained),
            pending: self.pending_count() as u64,
        }
    }

    // ========================================================================
    // COMPLETION PLUMBING
    // ========================================================================

    /// Take the callback for `handle` if it has shape `expected`.
    ///
    /// A callback of another shape is removed too, since libvcx completes a
    /// handle only once, and dropped without being invoked.
    fn take(&self, handle: CommandHandle, expected: CallbackKind) -> Option<Callback> {
        let mut pending = self.pending.lock();
        let Some(callback) = pending.remove(&handle) else {
            drop(pending);
            bump(&self.counters.dropped_unknown, 1);
            tracing::warn!(
                "Unable to find callback for {} completion of command handle {}",
                expected,
                handle
            );
            return None;
        };
        drop(pending);

        let kind = callback.kind();
        if kind == expected {
            return Some(callback);
        }

        bump(&self.counters.dropped_mismatch, 1);
        tracing::error!(
            "Dropping {} completion for command handle {}: a {} callback was registered",
            expected,
            handle,
            kind
        );
        drop(callback);
        None
    }

    /// Decode `err`, resolving its message. A panicking message source
    /// leaves the error without a message.
    fn native_result(&self, err: VcxErrorCode) -> Result<(), NativeError> {
        let resolved = panic::catch_unwind(AssertUnwindSafe(|| {
            decode::error_code(err, self.messages.as_deref())
        }));
        resolved.unwrap_or_else(|_| {
            tracing::error!("Error message lookup for code {} panicked", err);
            Err(NativeError::new(err))
        })
    }

    /// Run `callback` with `result`. Panics stay on this side of the
    /// boundary.
    fn deliver<T>(&self, handle: CommandHandle, callback: BoxedCallback<T>, result: NativeResult<T>) {
        if let Err(e) = &result {
            tracing::debug!("Command handle {} completed with error {}", handle, e.code);
        }

        bump(&self.counters.completed, 1);
        if panic::catch_unwind(AssertUnwindSafe(move || callback(result))).is_err() {
            tracing::error!("Callback for command handle {} panicked", handle);
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
