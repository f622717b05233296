#![forbid(unsafe_code)]

//! Typed list widget.
//!
//! - [`view`]: headless view model (visual row order, input control).
//! - [`reorder`]: drag-and-drop state machine.
//! - [`typed_list`]: the widget tying store, listener, view, and reordering
//!   together behind a single event entry point.

pub mod reorder;
pub mod typed_list;
pub mod view;

pub use reorder::{DragPhase, DropEffect, DropOutcome, ReorderController};
pub use typed_list::{EventOutcome, KeyCode, TypedList, WidgetEvent};
pub use view::{InputControl, InputMode, InputSnapshot, ListView, Row, RowSnapshot, ViewSnapshot};
