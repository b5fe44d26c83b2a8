//! # Future Adapter
//!
//! Turns a callback slot into an awaitable value, for hosts that drive
//! libvcx from async code.
//!
//! ```ignore
//! let (cb, done) = completion::oneshot();
//! let handle = registry.create_handle(Callback::Str(cb));
//! unsafe { vcx_connection_serialize(handle, connection, Some(vcx_bridge_string_cb)) };
//! let json = done.await?;
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::CompletionError;
use crate::registry::{BoxedCallback, NativeResult};

/// Pending result of one libvcx command.
///
/// Resolves to [`CompletionError::Abandoned`] if the callback is dropped
/// without being invoked (handle removed, registry drained).
#[derive(Debug)]
pub struct Completion<T> {
    rx: oneshot::Receiver<NativeResult<T>>,
}

/// Create a callback and the future it resolves.
pub fn oneshot<T: Send + 'static>() -> (BoxedCallback<T>, Completion<T>) {
    let (tx, rx) = oneshot::channel();
    let callback: BoxedCallback<T> = Box::new(move |result| {
        if tx.send(result).is_err() {
            tracing::debug!("Completion receiver dropped before the result arrived");
        }
    });
    (callback, Completion { rx })
}

impl<T> Completion<T> {
    /// Block the current thread until the command completes.
    ///
    /// Must not be called from inside an async runtime.
    pub fn wait(self) -> Result<T, CompletionError> {
        match self.rx.blocking_recv() {
            Ok(result) => result.map_err(CompletionError::from),
            Err(_) => Err(CompletionError::Abandoned),
        }
    }
}

impl<T> Future for Completion<T> {
    type Output = Result<T, CompletionError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| match received {
            Ok(result) => result.map_err(CompletionError::from),
            Err(_) => Err(CompletionError::Abandoned),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NativeError;
    use crate::registry::{Callback, CommandRegistry};
    use crate::CommandHandle;
    use std::ffi::CString;
    use std::sync::Arc;
    use std::thread;

    #[tokio::test]
    async fn test_resolves_on_success() {
        let registry = CommandRegistry::default();
        let (cb, done) = oneshot();
        let handle = registry.create_handle(Callback::Str(cb));

        let json = CString::new("{\"state\":4}").unwrap();
        unsafe { registry.complete_str(handle, 0, json.as_ptr()) };

        assert_eq!(done.await, Ok(Some("{\"state\":4}".to_string())));
    }

    #[tokio::test]
    async fn test_resolves_on_native_error() {
        let registry = CommandRegistry::default();
        let (cb, done) = oneshot::<CommandHandle>();
        let handle = registry.create_handle(Callback::Handle(cb));

        registry.complete_handle(handle, 1021, 0);

        assert_eq!(
            done.await,
            Err(CompletionError::Native(NativeError::new(1021)))
        );
    }

    #[tokio::test]
    async fn test_removed_handle_is_abandoned() {
        let registry = CommandRegistry::default();
        let (cb, done) = oneshot::<()>();
        let handle = registry.create_handle(Callback::Plain(cb));

        assert!(registry.remove_handle(handle));

        assert_eq!(done.await, Err(CompletionError::Abandoned));
    }

    #[tokio::test]
    async fn test_drained_handle_is_abandoned() {
        let registry = CommandRegistry::default();
        let (cb, done) = oneshot::<Vec<u8>>();
        registry.create_handle(Callback::Data(cb));

        registry.drain();

        assert_eq!(done.await, Err(CompletionError::Abandoned));
    }

    #[tokio::test]
    async fn test_mismatched_completion_is_abandoned() {
        let registry = CommandRegistry::default();
        let (cb, done) = oneshot::<Vec<u8>>();
        let handle = registry.create_handle(Callback::Data(cb));

        let s = CString::new("x").unwrap();
        unsafe { registry.complete_str(handle, 0, s.as_ptr()) };

        assert_eq!(registry.pending_count(), 0);
        let resolved = tokio::time::timeout(std::time::Duration::from_millis(200), done).await;
        assert_eq!(resolved.unwrap(), Err(CompletionError::Abandoned));
    }

    #[tokio::test]
    async fn test_completed_from_native_thread() {
        let registry = Arc::new(CommandRegistry::default());
        let (cb, done) = oneshot::<bool>();
        let handle = registry.create_handle(Callback::Bool(cb));

        let r = registry.clone();
        thread::spawn(move || r.complete_bool(handle, 0, 1));

        assert_eq!(done.await, Ok(true));
    }

    #[test]
    fn test_blocking_wait() {
        let registry = Arc::new(CommandRegistry::default());
        let (cb, done) = oneshot::<i32>();
        let handle = registry.create_handle(Callback::Number(cb));

        let r = registry.clone();
        let native = thread::spawn(move || r.complete_number(handle, 0, 17));

        assert_eq!(done.wait(), Ok(17));
        native.join().unwrap();
    }

    #[test]
    fn test_poll_with_tokio_test() {
        let registry = CommandRegistry::default();
        let (cb, done) = oneshot::<()>();
        let handle = registry.create_handle(Callback::Plain(cb));

        let mut task = tokio_test::task::spawn(done);
        tokio_test::assert_pending!(task.poll());

        registry.complete(handle, 0);
        assert!(task.is_woken());
        tokio_test::assert_ready_eq!(task.poll(), Ok(()));
    }
}
