#![forbid(unsafe_code)]

//! Reconciliation of out-of-band field changes.
//!
//! The host may change the field behind the widget's back (host-side undo,
//! another view of the same field). The listener subscribes once and queues
//! every notification in a [`ChangeInbox`]; the queue is drained into the
//! [`ListStore`] at the next event boundary.
//!
//! # Invariants
//!
//! 1. The subscription callback never touches the store, so a host that
//!    notifies synchronously from inside `write` cannot re-enter a mutation.
//! 2. Draining never writes to the host (no feedback loop).
//! 3. Each payload replaces the list wholesale; a payload equal to the
//!    current list (typically the echo of the widget's own write) keeps item
//!    identities and does not count as a change.
//! 4. A malformed payload leaves the list unchanged and does not stop the
//!    remaining payloads from being applied.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tlist_core::{ListError, Result, codec};

use crate::host::{FieldHost, FieldPath};
use crate::reactive::Subscription;
use crate::store::ListStore;

/// FIFO of raw field values awaiting reconciliation.
#[derive(Debug, Clone, Default)]
pub struct ChangeInbox {
    queue: Rc<RefCell<VecDeque<Option<String>>>>,
}

impl ChangeInbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, raw: Option<String>) {
        self.queue.borrow_mut().push_back(raw);
    }

    #[must_use]
    pub fn pop(&self) -> Option<Option<String>> {
        self.queue.borrow_mut().pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

/// Subscribes to one host field and feeds its changes into a [`ListStore`].
///
/// Dropping the listener ends the host subscription.
#[derive(Debug)]
pub struct ExternalChangeListener {
    path: FieldPath,
    inbox: ChangeInbox,
    _subscription: Subscription,
}

impl ExternalChangeListener {
    /// Subscribe to `path` on `host`.
    #[must_use]
    pub fn attach(host: &dyn FieldHost, path: &FieldPath) -> Self {
        let inbox = ChangeInbox::new();
        let sink = inbox.clone();
        let subscription = host.subscribe(
            path,
            Box::new(move |raw| sink.push(raw.map(str::to_string))),
        );
        Self {
            path: path.clone(),
            inbox,
            _subscription: subscription,
        }
    }

    #[must_use]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Notifications received but not yet applied.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inbox.len()
    }

    /// Apply every queued notification to `store`.
    ///
    /// Returns whether the store's list changed.
    ///
    /// # Errors
    ///
    /// Returns the first [`ListError::MalformedValue`] encountered, after
    /// all queued payloads have been processed.
    pub fn drain(&self, store: &mut ListStore) -> Result<bool> {
        let mut changed = false;
        let mut first_error: Option<ListError> = None;

        while let Some(raw) = self.inbox.pop() {
            match codec::decode(raw.as_deref()) {
                Ok(items) => {
                    let len = items.len();
                    if store.replace_all(items) {
                        tracing::debug!(message = "listener.replace", path = %self.path, len);
                        changed = true;
                    }
                }
                Err(err) => {
                    tracing::error!(message = "listener.malformed", path = %self.path, error = %err);
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(changed),
        }
    }
}
