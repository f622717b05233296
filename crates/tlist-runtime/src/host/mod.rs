#![forbid(unsafe_code)]

//! Host field accessor.
//!
//! The widget never knows how the host persists its field. It sees an opaque
//! text cell with change notification, addressed by a [`FieldPath`].
//!
//! Implementations must tolerate `write` being called from inside event
//! handling; callbacks registered through [`FieldHost::subscribe`] may be
//! invoked synchronously from `write`.

pub mod memory;

pub use memory::MemoryHost;

use std::fmt;

use crate::reactive::Subscription;

/// Name of the host field the widget owns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(String);

impl FieldPath {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// Callback invoked with the field's new raw value.
pub type ChangeCallback = Box<dyn Fn(Option<&str>)>;

/// The host's field storage.
pub trait FieldHost {
    /// Current raw value of `path`. `None` when the field is unset.
    fn read(&self, path: &FieldPath) -> Option<String>;

    /// Store `value` as the new raw value of `path`.
    fn write(&self, path: &FieldPath, value: &str);

    /// Register `callback` for changes of `path`.
    ///
    /// The registration lives as long as the returned [`Subscription`].
    fn subscribe(&self, path: &FieldPath, callback: ChangeCallback) -> Subscription;
}
