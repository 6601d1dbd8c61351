//! # The value flowing through the pipeline.
//!
//! [`Item`] is an opaque code produced by exactly one producer and stored
//! by exactly one manager invocation. Ownership moves producer → buffer →
//! manager; no two components ever hold a live reference at once.

use std::fmt;

/// One produced item, identified by value only.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Item {
    code: String,
}

impl Item {
    /// Wraps a code into an item.
    ///
    /// # Example
    /// ```
    /// use beltline::Item;
    ///
    /// let item = Item::new("ab3x9");
    /// assert_eq!(item.code(), "ab3x9");
    /// ```
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// The item's code.
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
