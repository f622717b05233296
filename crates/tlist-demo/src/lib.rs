#![forbid(unsafe_code)]

//! Scripted driver for the typed list widget.
//!
//! Mounts a [`tlist_widgets::TypedList`] on an in-memory field seeded with
//! `["foo","bar"]` and replays a command script against it, printing the
//! rendered list after the run (or a JSON snapshot after every command).

pub mod cli;
pub mod error;
pub mod script;
pub mod session;

pub use cli::{Opts, run, run_from_env};
pub use error::{DemoError, Result};
pub use session::{OutputFormat, Session};
