use std::fmt::{Debug, Formatter, Result};
use std::thread::Builder;

/* ---------- */

/// Used to configure the properties of a new worker's thread.
pub struct Settings {
    builder: Builder,
    name: Option<String>,
}

impl Settings {
    /// Returns the base [`Settings`] with default parameters.
    #[inline]
    pub fn new() -> Self {
        Self {
            builder: Builder::new(),
            name: None,
        }
    }

    /// Sets the thread's name.
    ///
    /// The name must not contains null bytes (`\0`). It is also used to identify
    /// the worker in errors and logs.
    #[inline]
    pub fn name<T: ToString>(self, name: T) -> Self {
        let name = name.to_string();

        Self {
            builder: self.builder.name(name.clone()),
            name: Some(name),
        }
    }

    /// Returns the thread's name, if one was set.
    #[inline]
    pub fn thread_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the inner [`std::thread::Builder`].
    #[inline]
    pub(crate) fn into_inner(self) -> Builder {
        self.builder
    }
}

impl Default for Settings {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Settings {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{:?}", self.builder)
    }
}
