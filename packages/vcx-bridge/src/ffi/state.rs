//! # Installed Registry
//!
//! libvcx calls back through plain C function pointers that cannot carry
//! state, so the trampolines reach the registry through this slot. The host
//! constructs a [`CommandRegistry`], installs it at bridge initialization and
//! uninstalls it at shutdown.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::registry::CommandRegistry;

static BRIDGE: Lazy<RwLock<Option<Arc<CommandRegistry>>>> = Lazy::new(|| RwLock::new(None));

/// Make `registry` the target of the completion trampolines
pub fn install(registry: Arc<CommandRegistry>) -> Result<()> {
    let mut slot = BRIDGE.write();
    if slot.is_some() {
        return Err(Error::AlreadyInitialized);
    }
    *slot = Some(registry);

    tracing::info!("vcx bridge initialized");
    Ok(())
}

/// Detach the installed registry and discard its pending commands.
///
/// The drain is best effort. A completion that already took its entry
/// before the drain may still invoke its callback after this returns.
/// Completions that arrive later are dropped. Returns the registry that was
/// installed, if any.
pub fn uninstall() -> Option<Arc<CommandRegistry>> {
    let registry = BRIDGE.write().take()?;
    let discarded = registry.drain();

    tracing::info!("vcx bridge shut down ({} pending commands discarded)", discarded);
    Some(registry)
}

/// The installed registry
pub fn registry() -> Result<Arc<CommandRegistry>> {
    BRIDGE.read().clone().ok_or(Error::NotInitialized)
}

/// The installed registry, or `None` with a log line for a completion that
/// has nowhere to go.
pub(crate) fn registry_for_completion(handle: crate::CommandHandle) -> Option<Arc<CommandRegistry>> {
    let registry = BRIDGE.read().clone();
    if registry.is_none() {
        tracing::warn!(
            "Completion for command handle {} arrived with no bridge installed",
            handle
        );
    }
    registry
}

/// Tests touching the process-wide slot run one at a time.
#[cfg(test)]
pub(crate) fn test_guard() -> parking_lot::MutexGuard<'static, ()> {
    static GUARD: parking_lot::Mutex<()> = parking_lot::const_mutex(());
    let guard = GUARD.lock();
    uninstall();
    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Callback;

    #[test]
    fn test_install_twice_fails() {
        let _guard = test_guard();

        install(Arc::new(CommandRegistry::default())).unwrap();
        let err = install(Arc::new(CommandRegistry::default())).unwrap_err();
        assert_eq!(err.code(), Error::AlreadyInitialized.code());

        uninstall();
    }

    #[test]
    fn test_registry_requires_install() {
        let _guard = test_guard();

        assert!(matches!(registry(), Err(Error::NotInitialized)));

        let installed = Arc::new(CommandRegistry::default());
        install(installed.clone()).unwrap();
        assert!(Arc::ptr_eq(&registry().unwrap(), &installed));

        uninstall();
        assert!(matches!(registry(), Err(Error::NotInitialized)));
    }

    #[test]
    fn test_uninstall_drains() {
        let _guard = test_guard();

        let installed = Arc::new(CommandRegistry::default());
        install(installed.clone()).unwrap();
        installed.create_handle(Callback::plain(|_| panic!("must not run")));
        installed.create_handle(Callback::plain(|_| panic!("must not run")));

        let removed = uninstall().unwrap();
        assert!(Arc::ptr_eq(&removed, &installed));
        assert_eq!(removed.pending_count(), 0);
        assert_eq!(removed.stats().drained, 2);
        assert!(uninstall().is_none());
    }
}
