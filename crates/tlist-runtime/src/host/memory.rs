//! In-memory [`FieldHost`] used by tests and the standalone demo.
//!
//! Each field is an [`Observable`]; writes notify subscribers synchronously,
//! and only when the stored text actually changed.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{ChangeCallback, FieldHost, FieldPath};
use crate::reactive::{Observable, Subscription};

/// Field storage kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    fields: RefCell<HashMap<FieldPath, Observable<Option<String>>>>,
    writes: RefCell<HashMap<FieldPath, usize>>,
}

impl MemoryHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Host with one field preset to `value`.
    #[must_use]
    pub fn with_field(path: impl Into<FieldPath>, value: Option<&str>) -> Self {
        let host = Self::new();
        host.field(&path.into()).set(value.map(str::to_string));
        host
    }

    /// Change a field as another writer would (another view of the same
    /// field, or a host-side undo). Not counted by [`Self::write_count`].
    pub fn set_external(&self, path: &FieldPath, value: Option<&str>) {
        self.field(path).set(value.map(str::to_string));
    }

    /// Number of [`FieldHost::write`] calls made for `path`.
    #[must_use]
    pub fn write_count(&self, path: &FieldPath) -> usize {
        self.writes.borrow().get(path).copied().unwrap_or(0)
    }

    /// Live subscriber count for `path`.
    #[must_use]
    pub fn subscriber_count(&self, path: &FieldPath) -> usize {
        self.fields
            .borrow()
            .get(path)
            .map_or(0, Observable::subscriber_count)
    }

    fn field(&self, path: &FieldPath) -> Observable<Option<String>> {
        self.fields
            .borrow_mut()
            .entry(path.clone())
            .or_insert_with(|| Observable::new(None))
            .clone()
    }
}

impl FieldHost for MemoryHost {
    fn read(&self, path: &FieldPath) -> Option<String> {
        self.fields.borrow().get(path).and_then(Observable::get)
    }

    fn write(&self, path: &FieldPath, value: &str) {
        *self.writes.borrow_mut().entry(path.clone()).or_insert(0) += 1;
        // The map borrow is released before subscribers run.
        let field = self.field(path);
        field.set(Some(value.to_string()));
    }

    fn subscribe(&self, path: &FieldPath, callback: ChangeCallback) -> Subscription {
        self.field(path)
            .subscribe(move |value: &Option<String>| callback(value.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn unset_field_reads_none() {
        let host = MemoryHost::new();
        assert_eq!(host.read(&FieldPath::new("tags")), None);
    }

    #[test]
    fn write_then_read() {
        let host = MemoryHost::new();
        let path = FieldPath::new("tags");
        host.write(&path, "[\"a\"]");
        assert_eq!(host.read(&path).as_deref(), Some("[\"a\"]"));
        assert_eq!(host.write_count(&path), 1);
    }

    #[test]
    fn subscribers_receive_changes_only() {
        let host = MemoryHost::with_field("tags", Some("[]"));
        let path = FieldPath::new("tags");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = host.subscribe(
            &path,
            Box::new(move |v| s.borrow_mut().push(v.map(str::to_string))),
        );

        host.write(&path, "[]");
        host.write(&path, "[1]");
        host.set_external(&path, None);

        assert_eq!(*seen.borrow(), [Some("[1]".to_string()), None]);
        assert_eq!(host.write_count(&path), 2);
    }

    #[test]
    fn subscription_drop_detaches() {
        let host = MemoryHost::new();
        let path = FieldPath::new("tags");
        let sub = host.subscribe(&path, Box::new(|_| {}));
        assert_eq!(host.subscriber_count(&path), 1);
        drop(sub);
        assert_eq!(host.subscriber_count(&path), 0);
    }

    #[test]
    fn callback_may_read_host_during_write() {
        let host = Rc::new(MemoryHost::new());
        let path = FieldPath::new("tags");
        let seen = Rc::new(RefCell::new(None));
        let (h, p, s) = (Rc::clone(&host), path.clone(), Rc::clone(&seen));
        let _sub = host.subscribe(
            &path,
            Box::new(move |_| *s.borrow_mut() = h.read(&p)),
        );
        host.write(&path, "[2]");
        assert_eq!(seen.borrow().as_deref(), Some("[2]"));
    }

    #[test]
    fn fields_are_independent() {
        let host = MemoryHost::new();
        host.write(&FieldPath::new("a"), "[1]");
        assert_eq!(host.read(&FieldPath::new("b")), None);
        assert_eq!(host.write_count(&FieldPath::new("b")), 0);
    }
}
