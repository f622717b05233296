#![forbid(unsafe_code)]

//! The list store: the one in-memory list and its mutation API.
//!
//! # Invariants
//!
//! 1. After every successful mutation the host field holds exactly
//!    `codec::encode(store.items())` (read-your-writes).
//! 2. Each successful mutation issues exactly one host write; rejected or
//!    no-op calls issue none. Writes are never batched.
//! 3. `revision` increases whenever the list content or order changes,
//!    whether by a local mutation or by adopting an external value.
//! 4. Stale ids and out-of-range positions never panic; they are no-ops.
//!
//! # Failure Modes
//!
//! - **Malformed field value**: [`ListStore::initialize`] and
//!   [`ListStore::resync`] return [`tlist_core::ListError::MalformedValue`]; the store
//!   keeps its previous list on resync.

use std::rc::Rc;

use thiserror::Error;
use tlist_core::codec;
use tlist_core::{FieldConfig, Item, ItemArena, ItemId, ItemKind, Result};

use crate::host::{FieldHost, FieldPath};

/// Why a candidate was not appended. Rejections are not errors: the list
/// and the field are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppendRejected {
    #[error("empty input")]
    Empty,
    #[error("'{0}' is not one of the allowed values")]
    NotAllowed(String),
    #[error("'{0}' is not a finite number")]
    NotANumber(String),
}

/// Parse `candidate` into an item according to `config`.
///
/// # Errors
///
/// Returns the rejection reason when the candidate is empty, outside the
/// allowed vocabulary, or not a finite number for number lists.
pub fn parse_candidate(
    config: &FieldConfig,
    candidate: &str,
) -> std::result::Result<Item, AppendRejected> {
    if candidate.is_empty() {
        return Err(AppendRejected::Empty);
    }
    match config.kind() {
        ItemKind::String => {
            if config.allows(candidate) {
                Ok(Item::text(candidate))
            } else {
                Err(AppendRejected::NotAllowed(candidate.to_string()))
            }
        }
        ItemKind::Number => parse_number(candidate)
            .map(Item::number)
            .ok_or_else(|| AppendRejected::NotANumber(candidate.to_string())),
    }
}

/// Lenient numeric parse: surrounding whitespace is ignored and `0x`/`0o`/`0b`
/// integer prefixes are understood. Only finite results are accepted.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let radix = |prefixes: [&str; 2], radix: u32| {
        prefixes
            .iter()
            .find_map(|prefix| text.strip_prefix(*prefix))
            .map(|digits| u64::from_str_radix(digits, radix).ok().map(|n| n as f64))
    };
    let parsed = radix(["0x", "0X"], 16)
        .or_else(|| radix(["0o", "0O"], 8))
        .or_else(|| radix(["0b", "0B"], 2))
        .unwrap_or_else(|| text.parse::<f64>().ok());
    parsed.filter(|n| n.is_finite())
}

/// The authoritative in-memory list for one host field.
pub struct ListStore {
    host: Rc<dyn FieldHost>,
    path: FieldPath,
    config: FieldConfig,
    arena: ItemArena,
    revision: u64,
}

impl std::fmt::Debug for ListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListStore")
            .field("path", &self.path)
            .field("config", &self.config)
            .field("items", &self.items())
            .field("revision", &self.revision)
            .finish()
    }
}

impl ListStore {
    /// Adopt the field's current value.
    ///
    /// # Errors
    ///
    /// Returns [`tlist_core::ListError::MalformedValue`] if the field does
    /// not decode; a corrupt stored value is not silently replaced.
    pub fn initialize(
        host: Rc<dyn FieldHost>,
        path: FieldPath,
        config: FieldConfig,
    ) -> Result<Self> {
        let raw = host.read(&path);
        let items = codec::decode(raw.as_deref())?;
        tracing::debug!(
            message = "store.initialize",
            path = %path,
            kind = config.kind().as_str(),
            len = items.len(),
        );
        Ok(Self {
            host,
            path,
            config,
            arena: ItemArena::from_items(items),
            revision: 0,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[must_use]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    #[must_use]
    pub fn host(&self) -> &Rc<dyn FieldHost> {
        &self.host
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Values in list order.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.arena.to_vec()
    }

    /// Entries with their ids, in list order.
    pub fn entries(&self) -> impl Iterator<Item = (ItemId, &Item)> + '_ {
        self.arena.iter()
    }

    /// Ids in list order.
    #[must_use]
    pub fn ids(&self) -> &[ItemId] {
        self.arena.ids()
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.arena.get(id)
    }

    #[must_use]
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.arena.position(id)
    }

    #[must_use]
    pub fn id_at(&self, position: usize) -> Option<ItemId> {
        self.arena.id_at(position)
    }

    /// Bumped on every content or order change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Parse and append `candidate` at the end of the list.
    ///
    /// # Errors
    ///
    /// Returns why the candidate was rejected; nothing is written then.
    pub fn append(&mut self, candidate: &str) -> std::result::Result<ItemId, AppendRejected> {
        let item = match parse_candidate(&self.config, candidate) {
            Ok(item) => item,
            Err(reason) => {
                tracing::debug!(message = "store.append_rejected", path = %self.path, %reason);
                return Err(reason);
            }
        };
        let id = self.arena.push(item);
        tracing::debug!(message = "store.append", path = %self.path, position = self.len() - 1);
        self.commit();
        Ok(id)
    }

    /// Remove the entry at `position`. Out of range is a no-op.
    pub fn remove_at(&mut self, position: usize) -> Option<Item> {
        let (_, item) = self.arena.remove_at(position)?;
        tracing::debug!(message = "store.remove", path = %self.path, position);
        self.commit();
        Some(item)
    }

    /// Remove the entry with `id`. Stale ids are a no-op.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let position = self.position(id)?;
        self.remove_at(position)
    }

    /// Overwrite the entry at `position` with `new_value` as text.
    ///
    /// The value is stored verbatim, also for number lists; callers validate
    /// it. Out of range is a no-op.
    pub fn replace_at(&mut self, position: usize, new_value: &str) -> bool {
        match self.id_at(position) {
            Some(id) => self.replace(id, new_value),
            None => false,
        }
    }

    /// Overwrite the entry with `id`. Stale ids are a no-op.
    pub fn replace(&mut self, id: ItemId, new_value: &str) -> bool {
        if self.arena.replace(id, Item::text(new_value)).is_none() {
            return false;
        }
        tracing::debug!(message = "store.replace", path = %self.path, id = %id);
        self.commit();
        true
    }

    /// Move the entry at `from` to `to`, with `to` addressing the list after
    /// removal. Out-of-range `from` is a no-op.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if !self.arena.move_position(from, to) {
            return false;
        }
        tracing::debug!(message = "store.move", path = %self.path, from, to);
        self.commit();
        true
    }

    /// Move the entry with `id` to `to`. Stale ids are a no-op.
    pub fn move_id(&mut self, id: ItemId, to: usize) -> bool {
        match self.position(id) {
            Some(from) => self.move_item(from, to),
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Adopting external values
    // -----------------------------------------------------------------------

    /// Adopt `items` wholesale without writing to the host.
    ///
    /// Returns `false` if `items` equals the current list, in which case ids
    /// are untouched.
    pub fn replace_all(&mut self, items: Vec<Item>) -> bool {
        if self.arena.values().eq(items.iter()) {
            return false;
        }
        self.arena.reconcile(items);
        self.revision += 1;
        true
    }

    /// Re-read the host field and adopt it without writing.
    ///
    /// # Errors
    ///
    /// Returns [`tlist_core::ListError::MalformedValue`] and keeps the
    /// current list if the field does not decode.
    pub fn resync(&mut self) -> Result<bool> {
        let raw = self.host.read(&self.path);
        let items = codec::decode(raw.as_deref())?;
        Ok(self.replace_all(items))
    }

    fn commit(&mut self) {
        self.revision += 1;
        let encoded = codec::encode(&self.items());
        tracing::trace!(message = "store.write", path = %self.path, value = %encoded);
        self.host.write(&self.path, &encoded);
    }
}
