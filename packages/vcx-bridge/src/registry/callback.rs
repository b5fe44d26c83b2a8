//! # Callback Shapes
//!
//! Every result shape a libvcx command can complete with gets its own
//! `Callback` variant. The completion entry points match on the variant, so
//! a callback is only ever invoked with arguments of the shape it was
//! registered for.

use std::fmt;

use crate::error::NativeError;
use crate::CommandHandle;

/// Result delivered to a callback: `Err` when libvcx reported an error.
pub type NativeResult<T> = Result<T, NativeError>;

/// Boxed one-shot closure receiving a decoded completion.
pub type BoxedCallback<T> = Box<dyn FnOnce(NativeResult<T>) + Send + 'static>;

/// A caller-supplied completion callback, tagged by result shape.
pub enum Callback {
    /// No payload on success
    Plain(BoxedCallback<()>),
    /// Boolean flag
    Bool(BoxedCallback<bool>),
    /// One nullable string
    Str(BoxedCallback<Option<String>>),
    /// Two nullable strings
    StrStr(BoxedCallback<(Option<String>, Option<String>)>),
    /// Three nullable strings
    StrStrStr(BoxedCallback<(Option<String>, Option<String>, Option<String>)>),
    /// Binary buffer
    Data(BoxedCallback<Vec<u8>>),
    /// Handle to a native-owned object (the bridge never releases it)
    Handle(BoxedCallback<CommandHandle>),
    /// Signed number, e.g. an object handle returned as `int32_t`
    Number(BoxedCallback<i32>),
    /// Nullable string and a binary buffer
    StrData(BoxedCallback<(Option<String>, Vec<u8>)>),
    /// Two nullable strings and an unsigned 64-bit value
    StrStrU64(BoxedCallback<(Option<String>, Option<String>, u64)>),
}

/// Shape tag of a [`Callback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    /// See [`Callback::Plain`]
    Plain,
    /// See [`Callback::Bool`]
    Bool,
    /// See [`Callback::Str`]
    Str,
    /// See [`Callback::StrStr`]
    StrStr,
    /// See [`Callback::StrStrStr`]
    StrStrStr,
    /// See [`Callback::Data`]
    Data,
    /// See [`Callback::Handle`]
    Handle,
    /// See [`Callback::Number`]
    Number,
    /// See [`Callback::StrData`]
    StrData,
    /// See [`Callback::StrStrU64`]
    StrStrU64,
}

impl Callback {
    /// Shape of this callback
    pub fn kind(&self) -> CallbackKind {
        match self {
            Callback::Plain(_) => CallbackKind::Plain,
            Callback::Bool(_) => CallbackKind::Bool,
            Callback::Str(_) => CallbackKind::Str,
            Callback::StrStr(_) => CallbackKind::StrStr,
            Callback::StrStrStr(_) => CallbackKind::StrStrStr,
            Callback::Data(_) => CallbackKind::Data,
            Callback::Handle(_) => CallbackKind::Handle,
            Callback::Number(_) => CallbackKind::Number,
            Callback::StrData(_) => CallbackKind::StrData,
            Callback::StrStrU64(_) => CallbackKind::StrStrU64,
        }
    }

    /// Wrap a closure taking no payload
    pub fn plain(f: impl FnOnce(NativeResult<()>) + Send + 'static) -> Self {
        Callback::Plain(Box::new(f))
    }

    /// Wrap a closure taking a boolean
    pub fn boolean(f: impl FnOnce(NativeResult<bool>) + Send + 'static) -> Self {
        Callback::Bool(Box::new(f))
    }

    /// Wrap a closure taking one nullable string
    pub fn string(f: impl FnOnce(NativeResult<Option<String>>) + Send + 'static) -> Self {
        Callback::Str(Box::new(f))
    }

    /// Wrap a closure taking two nullable strings
    pub fn string_pair(
        f: impl FnOnce(NativeResult<(Option<String>, Option<String>)>) + Send + 'static,
    ) -> Self {
        Callback::StrStr(Box::new(f))
    }

    /// Wrap a closure taking three nullable strings
    pub fn string_triple(
        f: impl FnOnce(NativeResult<(Option<String>, Option<String>, Option<String>)>)
            + Send
            + 'static,
    ) -> Self {
        Callback::StrStrStr(Box::new(f))
    }

    /// Wrap a closure taking a binary buffer
    pub fn data(f: impl FnOnce(NativeResult<Vec<u8>>) + Send + 'static) -> Self {
        Callback::Data(Box::new(f))
    }

    /// Wrap a closure taking a native object handle
    pub fn handle(f: impl FnOnce(NativeResult<CommandHandle>) + Send + 'static) -> Self {
        Callback::Handle(Box::new(f))
    }

    /// Wrap a closure taking a signed number
    pub fn number(f: impl FnOnce(NativeResult<i32>) + Send + 'static) -> Self {
        Callback::Number(Box::new(f))
    }

    /// Wrap a closure taking a nullable string and a buffer
    pub fn string_data(
        f: impl FnOnce(NativeResult<(Option<String>, Vec<u8>)>) + Send + 'static,
    ) -> Self {
        Callback::StrData(Box::new(f))
    }

    /// Wrap a closure taking two nullable strings and a `u64`
    pub fn string_pair_u64(
        f: impl FnOnce(NativeResult<(Option<String>, Option<String>, u64)>) + Send + 'static,
    ) -> Self {
        Callback::StrStrU64(Box::new(f))
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback").field(&self.kind()).finish()
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallbackKind::Plain => "plain",
            CallbackKind::Bool => "bool",
            CallbackKind::Str => "string",
            CallbackKind::StrStr => "string+string",
            CallbackKind::StrStrStr => "string+string+string",
            CallbackKind::Data => "data",
            CallbackKind::Handle => "handle",
            CallbackKind::Number => "number",
            CallbackKind::StrData => "string+data",
            CallbackKind::StrStrU64 => "string+string+u64",
        };
        f.write_str(name)
    }
}
