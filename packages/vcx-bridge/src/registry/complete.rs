//! Typed completion entry points, one per [`CallbackKind`].
//!
//! Each entry point takes the pending callback out of the table, then
//! decodes the error code and (on success only) the native arguments, then
//! invokes the callback once. Arguments are never read for an unknown
//! handle or a failed command.

use std::os::raw::{c_char, c_uint};

use super::{Callback, CallbackKind, CommandRegistry};
use crate::decode::{c_bool, c_buffer, c_string};
use crate::error::VcxErrorCode;
use crate::CommandHandle;

impl CommandRegistry {
    /// Complete a command with no payload
    pub fn complete(&self, handle: CommandHandle, err: VcxErrorCode) {
        let Some(Callback::Plain(cb)) = self.take(handle, CallbackKind::Plain) else {
            return;
        };
        let result = self.native_result(err);
        self.deliver(handle, cb, result);
    }

    /// Complete a command returning a boolean (`unsigned int` on the wire)
    pub fn complete_bool(&self, handle: CommandHandle, err: VcxErrorCode, arg1: c_uint) {
        let Some(Callback::Bool(cb)) = self.take(handle, CallbackKind::Bool) else {
            return;
        };
        let result = self.native_result(err).map(|()| c_bool(arg1));
        self.deliver(handle, cb, result);
    }

    /// Complete a command returning one string
    ///
    /// # Safety
    /// `arg1` must be null or a NUL-terminated string valid for this call.
    pub unsafe fn complete_str(&self, handle: CommandHandle, err: VcxErrorCode, arg1: *const c_char) {
        let Some(Callback::Str(cb)) = self.take(handle, CallbackKind::Str) else {
            return;
        };
        let result = self.native_result(err).map(|()| c_string(arg1));
        self.deliver(handle, cb, result);
    }

    /// Complete a command returning two strings
    ///
    /// # Safety
    /// Each pointer must be null or a NUL-terminated string valid for this
    /// call.
    pub unsafe fn complete_str_str(
        &self,
        handle: CommandHandle,
        err: VcxErrorCode,
        arg1: *const c_char,
        arg2: *const c_char,
    ) {
        let Some(Callback::StrStr(cb)) = self.take(handle, CallbackKind::StrStr) else {
            return;
        };
        let result = self
            .native_result(err)
            .map(|()| (c_string(arg1), c_string(arg2)));
        self.deliver(handle, cb, result);
    }

    /// Complete a command returning three strings
    ///
    /// # Safety
    /// Each pointer must be null or a NUL-terminated string valid for this
    /// call.
    pub unsafe fn complete_str_str_str(
        &self,
        handle: CommandHandle,
        err: VcxErrorCode,
        arg1: *const c_char,
        arg2: *const c_char,
        arg3: *const c_char,
    ) {
        let Some(Callback::StrStrStr(cb)) = self.take(handle, CallbackKind::StrStrStr) else {
            return;
        };
        let result = self
            .native_result(err)
            .map(|()| (c_string(arg1), c_string(arg2), c_string(arg3)));
        self.deliver(handle, cb, result);
    }

    /// Complete a command returning a binary buffer
    ///
    /// # Safety
    /// `data` must be valid for reads of `len` bytes, or null.
    pub unsafe fn complete_data(
        &self,
        handle: CommandHandle,
        err: VcxErrorCode,
        data: *const u8,
        len: u32,
    ) {
        let Some(Callback::Data(cb)) = self.take(handle, CallbackKind::Data) else {
            return;
        };
        let result = self.native_result(err).map(|()| c_buffer(data, len));
        self.deliver(handle, cb, result);
    }

    /// Complete a command returning a handle to a native object.
    ///
    /// The object stays owned by libvcx; releasing it is up to the caller.
    pub fn complete_handle(&self, handle: CommandHandle, err: VcxErrorCode, object: CommandHandle) {
        let Some(Callback::Handle(cb)) = self.take(handle, CallbackKind::Handle) else {
            return;
        };
        let result = self.native_result(err).map(|()| object);
        self.deliver(handle, cb, result);
    }

    /// Complete a command returning a signed number
    pub fn complete_number(&self, handle: CommandHandle, err: VcxErrorCode, value: i32) {
        let Some(Callback::Number(cb)) = self.take(handle, CallbackKind::Number) else {
            return;
        };
        let result = self.native_result(err).map(|()| value);
        self.deliver(handle, cb, result);
    }

    /// Complete a command returning a string and a binary buffer
    ///
    /// # Safety
    /// `arg1` must be null or a NUL-terminated string, and `data` must be
    /// valid for reads of `len` bytes or null, for the duration of this call.
    pub unsafe fn complete_str_data(
        &self,
        handle: CommandHandle,
        err: VcxErrorCode,
        arg1: *const c_char,
        data: *const u8,
        len: u32,
    ) {
        let Some(Callback::StrData(cb)) = self.take(handle, CallbackKind::StrData) else {
            return;
        };
        let result = self
            .native_result(err)
            .map(|()| (c_string(arg1), c_buffer(data, len)));
        self.deliver(handle, cb, result);
    }

    /// Complete a command returning two strings and an unsigned 64-bit value
    ///
    /// # Safety
    /// Each pointer must be null or a NUL-terminated string valid for this
    /// call.
    pub unsafe fn complete_str_str_u64(
        &self,
        handle: CommandHandle,
        err: VcxErrorCode,
        arg1: *const c_char,
        arg2: *const c_char,
        arg3: u64,
    ) {
        let Some(Callback::StrStrU64(cb)) = self.take(handle, CallbackKind::StrStrU64) else {
            return;
        };
        let result = self
            .native_result(err)
            .map(|()| (c_string(arg1), c_string(arg2), arg3));
        self.deliver(handle, cb, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NativeError, VcxErrorCode};
    use crate::registry::NativeResult;
    use parking_lot::Mutex;
    use std::ffi::CString;
    use std::ptr;
    use std::sync::Arc;

    /// Records every result a callback receives.
    fn recorder<T: Send + 'static>() -> (
        Arc<Mutex<Vec<NativeResult<T>>>>,
        impl FnOnce(NativeResult<T>) + Send + 'static,
    ) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |r: NativeResult<T>| sink.lock().push(r))
    }

    #[test]
    fn test_complete_plain_success() {
        let registry = CommandRegistry::default();
        let (seen, cb) = recorder::<()>();
        let handle = registry.create_handle(Callback::plain(cb));

        registry.complete(handle, 0);

        assert_eq!(*seen.lock(), vec![Ok(())]);
        assert_eq!(registry.lookup(handle), None);
    }

    #[test]
    fn test_complete_twice_invokes_once() {
        let registry = CommandRegistry::default();
        let (seen, cb) = recorder::<bool>();
        let handle = registry.create_handle(Callback::boolean(cb));

        registry.complete_bool(handle, 0, 1);
        registry.complete_bool(handle, 0, 0);
        registry.complete_bool(handle, 1021, 0);

        assert_eq!(*seen.lock(), vec![Ok(true)]);
    }

    #[test]
    fn test_complete_unknown_handle_is_noop() {
        let registry = CommandRegistry::default();
        registry.complete(42, 0);
        registry.complete_handle(42, 0, 7);
        unsafe {
            registry.complete_str(42, 0, ptr::null());
            registry.complete_data(42, 0, ptr::null(), 10);
        }
        assert_eq!(registry.stats().dropped_unknown, 4);
    }

    #[test]
    fn test_string_pair_with_absent_second() {
        let registry = CommandRegistry::default();
        let (seen, cb) = recorder::<(Option<String>, Option<String>)>();
        let handle = registry.create_handle(Callback::string_pair(cb));

        let abc = CString::new("abc").unwrap();
        unsafe { registry.complete_str_str(handle, 0, abc.as_ptr(), ptr::null()) };

        assert_eq!(*seen.lock(), vec![Ok((Some("abc".to_string()), None))]);
    }

    #[test]
    fn test_empty_string_distinct_from_absent() {
        let registry = CommandRegistry::default();
        let (seen, cb) = recorder::<Option<String>>();
        let empty_handle = registry.create_handle(Callback::string(cb));
        let (seen_null, cb_null) = recorder::<Option<String>>();
        let null_handle = registry.create_handle(Callback::string(cb_null));

        let empty = CString::new("").unwrap();
        unsafe {
            registry.complete_str(empty_handle, 0, empty.as_ptr());
            registry.complete_str(null_handle, 0, ptr::null());
        }

        assert_eq!(*seen.lock(), vec![Ok(Some(String::new()))]);
        assert_eq!(*seen_null.lock(), vec![Ok(None)]);
    }

    #[test]
    fn test_string_triple() {
        let registry = CommandRegistry::default();
        let (seen, cb) = recorder::<(Option<String>, Option<String>, Option<String>)>();
        let handle = registry.create_handle(Callback::string_triple(cb));

        let a = CString::new("schema_id").unwrap();
        let c = CString::new("{}").unwrap();
        unsafe { registry.complete_str_str_str(handle, 0, a.as_ptr(), ptr::null(), c.as_ptr()) };

        assert_eq!(
            *seen.lock(),
            vec![Ok((Some("schema_id".into()), None, Some("{}".into())))]
        );
    }

    #[test]
    fn test_data_is_exact() {
        let registry = CommandRegistry::default();
        let (seen, cb) = recorder::<Vec<u8>>();
        let handle = registry.create_handle(Callback::data(cb));

        let bytes = [1u8, 2, 3, 4, 5];
        unsafe { registry.complete_data(handle, 0, bytes.as_ptr(), 5) };

        assert_eq!(*seen.lock(), vec![Ok(vec![1, 2, 3, 4, 5])]);
    }

    #[test]
    fn test_handle_error_never_yields_handle() {
        let registry = CommandRegistry::default();
        let (seen, cb) = recorder::<CommandHandle>();
        let handle = registry.create_handle(Callback::handle(cb));

        registry.complete_handle(handle, 1021, 0);

        assert_eq!(*seen.lock(), vec![Err(NativeError::new(1021))]);
    }

    #[test]
    fn test_error_ignores_arguments() {
        let registry = CommandRegistry::default();
        let (seen, cb) = recorder::<(Option<String>, Vec<u8>)>();
        let handle = registry.create_handle(Callback::string_data(cb));

        // Garbage pointers must not be read when the command failed.
        let bogus = 0x10 as *const u8;
        unsafe { registry.complete_str_data(handle, 1001, bogus as *const c_char, bogus, 64) };

        assert_eq!(*seen.lock(), vec![Err(NativeError::new(1001))]);
    }

    #[test]
    fn test_string_and_data() {
        let registry = CommandRegistry::default();
        let (seen, cb) = recorder::<(Option<String>, Vec<u8>)>();
        let handle = registry.create_handle(Callback::string_data(cb));

        let verkey = CString::new("GJ1SzoWzavQYfNL9XkaJdrQejfztN4XqdsiV4ct3LXKL").unwrap();
        let msg = b"hello\0world";
        unsafe { registry.complete_str_data(handle, 0, verkey.as_ptr(), msg.as_ptr(), msg.len() as u32) };

        assert_eq!(
            *seen.lock(),
            vec![Ok((
                Some("GJ1SzoWzavQYfNL9XkaJdrQejfztN4XqdsiV4ct3LXKL".into()),
                b"hello\0world".to_vec()
            ))]
        );
    }

    #[test]
    fn test_number_and_u64() {
        let registry = CommandRegistry::default();
        let (numbers, cb) = recorder::<i32>();
        let number_handle = registry.create_handle(Callback::number(cb));
        let (triples, cb) = recorder::<(Option<String>, Option<String>, u64)>();
        let triple_handle = registry.create_handle(Callback::string_pair_u64(cb));

        registry.complete_number(number_handle, 0, -5);
        let payment = CString::new("{\"amount\":10}").unwrap();
        unsafe {
            registry.complete_str_str_u64(triple_handle, 0, payment.as_ptr(), ptr::null(), u64::MAX)
        };

        assert_eq!(*numbers.lock(), vec![Ok(-5)]);
        assert_eq!(
            *triples.lock(),
            vec![Ok((Some("{\"amount\":10}".into()), None, u64::MAX))]
        );
    }

    #[test]
    fn test_shape_mismatch_drops_entry() {
        let registry = CommandRegistry::default();
        let (seen, cb) = recorder::<Vec<u8>>();
        let handle = registry.create_handle(Callback::data(cb));

        let s = CString::new("not data").unwrap();
        unsafe { registry.complete_str(handle, 0, s.as_ptr()) };
        assert!(seen.lock().is_empty());
        assert_eq!(registry.lookup(handle), None);
        assert_eq!(registry.pending_count(), 0);
        assert_eq!(registry.stats().dropped_mismatch, 1);

        let bytes = [9u8];
        unsafe { registry.complete_data(handle, 0, bytes.as_ptr(), 1) };
        assert!(seen.lock().is_empty());
        assert_eq!(registry.stats().dropped_unknown, 1);
    }

    #[test]
    fn test_error_message_resolved() {
        let messages = |code: VcxErrorCode| (code == 1021).then(|| "Invalid handle".to_string());
        let registry = CommandRegistry::default().with_messages(Arc::new(messages));
        let (seen, cb) = recorder::<()>();
        let handle = registry.create_handle(Callback::plain(cb));

        registry.complete(handle, 1021);

        assert_eq!(
            *seen.lock(),
            vec![Err(NativeError::new(1021).with_message("Invalid handle"))]
        );
    }

    #[test]
    fn test_panicking_message_source_keeps_code() {
        let messages = |_: VcxErrorCode| -> Option<String> { panic!("lookup failed") };
        let registry = CommandRegistry::default().with_messages(Arc::new(messages));
        let (seen, cb) = recorder::<()>();
        let handle = registry.create_handle(Callback::plain(cb));

        registry.complete(handle, 1021);

        assert_eq!(*seen.lock(), vec![Err(NativeError::new(1021))]);
        assert_eq!(registry.pending_count(), 0);
    }
}
