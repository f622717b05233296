#![forbid(unsafe_code)]

//! Runtime: the list store, the host field accessor, and reconciliation of
//! out-of-band field changes.
//!
//! Everything here is single-threaded. Shared state is `Rc<RefCell<..>>` and
//! host notifications are queued rather than applied re-entrantly, so one
//! event is always fully processed before the next begins.

pub mod host;
pub mod listener;
pub mod reactive;
pub mod store;

pub use host::{FieldHost, FieldPath, MemoryHost};
pub use listener::{ChangeInbox, ExternalChangeListener};
pub use reactive::{Observable, Subscription};
pub use store::{AppendRejected, ListStore};
