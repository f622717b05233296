#![forbid(unsafe_code)]

//! Change-tracked cells backing in-memory host fields.
//!
//! [`Observable`] wraps a value in `Rc<RefCell<..>>` and calls back weakly
//! held subscribers when it changes; [`Subscription`] keeps one callback
//! alive and drops it with the guard. Dead callbacks are pruned when the next
//! change is delivered.
//!
//! # Invariants
//!
//! 1. `version` moves forward once for every `set`/`update` that changes the
//!    value, and never otherwise.
//! 2. Callbacks run in the order they subscribed.
//! 3. Storing an equal value notifies nobody.
//! 4. A callback whose guard was dropped is never called again.
//! 5. Callbacks run with the cell unborrowed and may read it.

pub mod observable;

pub use observable::{Observable, Subscription};
