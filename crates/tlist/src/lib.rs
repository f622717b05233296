#![forbid(unsafe_code)]

//! Typed list public facade crate.
//!
//! Re-exports the layers under one name and collects the types an embedder
//! needs to mount a list on a host field.

pub use tlist_core as core;
pub use tlist_runtime as runtime;
pub use tlist_widgets as widgets;

pub use tlist_core::{FieldConfig, InstanceParameters, Item, ItemId, ItemKind, ListError, Result};
pub use tlist_runtime::{AppendRejected, FieldHost, FieldPath, ListStore, MemoryHost};
pub use tlist_widgets::{EventOutcome, KeyCode, TypedList, ViewSnapshot, WidgetEvent};

pub mod prelude {
    pub use tlist_core as core;
    pub use tlist_runtime as runtime;
    pub use tlist_widgets as widgets;

    pub use crate::{
        EventOutcome, FieldHost, FieldPath, InstanceParameters, Item, KeyCode, MemoryHost,
        TypedList, WidgetEvent,
    };
}
