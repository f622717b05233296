#![forbid(unsafe_code)]

//! Core: list items, the field value codec, field configuration, and the
//! item arena that gives every list entry a stable identity.

pub mod arena;
pub mod codec;
pub mod config;
pub mod error;
pub mod item;

pub use arena::{ItemArena, ItemId};
pub use config::{FieldConfig, InstanceParameters, ItemKind};
pub use error::{ListError, Result};
pub use item::Item;
