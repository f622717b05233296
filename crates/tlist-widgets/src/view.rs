#![forbid(unsafe_code)]

//! Headless view model for the typed list.
//!
//! The view keeps its own row order, separate from the store, so a drag can
//! rearrange rows for live feedback without touching the list. A full render
//! from the store discards any such rearrangement.

use tlist_core::{FieldConfig, ItemId, ItemKind};
use tlist_runtime::ListStore;

/// One rendered list row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Row {
    pub id: ItemId,
    pub label: String,
}

/// Rendered rows in visual order.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    rows: Vec<Row>,
    rendered_revision: Option<u64>,
}

impl ListView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild every row from the store.
    pub fn render(&mut self, store: &ListStore) {
        self.rows = store
            .entries()
            .map(|(id, item)| Row {
                id,
                label: item.label(),
            })
            .collect();
        self.rendered_revision = Some(store.revision());
    }

    /// Whether the store changed since the last render.
    #[must_use]
    pub fn is_stale(&self, store: &ListStore) -> bool {
        self.rendered_revision != Some(store.revision())
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// An empty list is hidden.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Visual position of the row for `id`.
    #[must_use]
    pub fn row_position(&self, id: ItemId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    /// Row id at visual position `position`.
    #[must_use]
    pub fn id_at(&self, position: usize) -> Option<ItemId> {
        self.rows.get(position).map(|row| row.id)
    }

    /// Ids in visual order.
    #[must_use]
    pub fn order(&self) -> Vec<ItemId> {
        self.rows.iter().map(|row| row.id).collect()
    }

    /// Place the `source` row right next to `target`: after it when the
    /// target is below the source, before it when above.
    ///
    /// Returns `false` if either row is missing or they are the same row.
    pub fn relocate(&mut self, source: ItemId, target: ItemId) -> bool {
        if source == target {
            return false;
        }
        let (Some(from), Some(over)) = (self.row_position(source), self.row_position(target))
        else {
            return false;
        };
        let to_bottom = from < over;
        let row = self.rows.remove(from);
        let target_now = if to_bottom { over - 1 } else { over };
        let insert_at = if to_bottom { target_now + 1 } else { target_now };
        self.rows.insert(insert_at, row);
        true
    }
}

/// How the add control accepts input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "lowercase"))]
pub enum InputMode {
    /// Free text input.
    Text,
    /// Numeric input.
    Number,
    /// Selection among the allowed values.
    Select { options: Vec<String> },
}

/// The add control: its mode and current content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputControl {
    mode: InputMode,
    text: String,
}

impl InputControl {
    /// Control matching `config`: a select when a vocabulary exists.
    #[must_use]
    pub fn for_config(config: &FieldConfig) -> Self {
        let mode = match (config.kind(), config.allowed_values()) {
            (ItemKind::String, Some(values)) => InputMode::Select {
                options: values.to_vec(),
            },
            (ItemKind::String, None) => InputMode::Text,
            (ItemKind::Number, _) => InputMode::Number,
        };
        Self {
            mode,
            text: String::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_select(&self) -> bool {
        matches!(self.mode, InputMode::Select { .. })
    }

    /// Options as presented: a blank entry, then each allowed value.
    #[must_use]
    pub fn presented_options(&self) -> Vec<String> {
        match &self.mode {
            InputMode::Select { options } => std::iter::once(String::new())
                .chain(options.iter().cloned())
                .collect(),
            InputMode::Text | InputMode::Number => Vec::new(),
        }
    }

    /// Set the control's content. A select only takes one of its presented
    /// options; anything else is refused and `false` returned.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if let InputMode::Select { options } = &self.mode
            && !text.is_empty()
            && !options.contains(&text)
        {
            return false;
        }
        self.text = text;
        true
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

/// Renderer-facing snapshot of a row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RowSnapshot {
    pub id: ItemId,
    pub label: String,
    /// The row currently being dragged.
    pub moving: bool,
}

/// Renderer-facing snapshot of the add control.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InputSnapshot {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub mode: InputMode,
    pub value: String,
}

/// Everything a renderer needs to draw the widget.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ViewSnapshot {
    pub rows: Vec<RowSnapshot>,
    pub visible: bool,
    /// A drag is in progress somewhere in the list.
    pub dragging: bool,
    pub input: InputSnapshot,
}

impl ViewSnapshot {
    /// Row labels in visual order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.label.as_str()).collect()
    }
}
