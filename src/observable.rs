//! Observability: inspect `CommandProcessor` state without affecting it.
//!
//! A dynamically-typed `Value` plus a `query`/`query_paths` trait lets an
//! embedding debugger poll this interpreter the same way it polls every
//! other emulated component.

use std::fmt;

/// A dynamically-typed value returned by [`Observable::query`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    U32(u32),
    U64(u64),
    String(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v:#010X}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
        }
    }
}

/// A component whose state can be inspected. Queries never affect
/// emulation state.
pub trait Observable {
    /// Query a specific property by path. Returns `None` for an
    /// unrecognised path.
    fn query(&self, path: &str) -> Option<Value>;

    /// List every path accepted by [`Self::query`].
    fn query_paths(&self) -> &'static [&'static str];
}
