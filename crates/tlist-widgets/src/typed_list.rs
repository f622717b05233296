#![forbid(unsafe_code)]

//! The typed list widget.
//!
//! [`TypedList`] owns a [`ListStore`], the [`ExternalChangeListener`] for the
//! same field, the rendered [`ListView`], the add control, and the drag
//! [`ReorderController`]. Renderers feed it [`WidgetEvent`]s and draw from
//! [`TypedList::snapshot`].
//!
//! Every call to [`TypedList::handle`] first applies queued external field
//! changes, so an event always acts on the host's latest value.

use std::rc::Rc;

use tlist_core::{FieldConfig, InstanceParameters, Item, ItemId, Result};
use tlist_runtime::{AppendRejected, ExternalChangeListener, FieldHost, FieldPath, ListStore};

use crate::reorder::{DropEffect, DropOutcome, ReorderController};
use crate::view::{InputControl, InputSnapshot, ListView, RowSnapshot, ViewSnapshot};

/// Keys reported on key release in the add control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Enter,
    Escape,
    Char(char),
}

/// User intents emitted by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// The add control's content changed.
    SetInput(String),
    /// The add button was clicked.
    Submit,
    /// A key was released in the add control.
    KeyUp(KeyCode),
    /// A row's remove button was clicked.
    Remove(ItemId),
    /// A row's inline edit was committed.
    Edit(ItemId, String),
    DragStart(ItemId),
    DragOver,
    DragEnter(ItemId),
    DragEnd,
    /// The platform abandoned the drag.
    DragCancel,
}

/// What handling an event did.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// Nothing changed.
    Ignored,
    InputChanged,
    Appended(ItemId),
    /// The add control's content was not accepted; it is left as is.
    Rejected(AppendRejected),
    Removed(Item),
    Edited(ItemId),
    DragStarted,
    /// The dragged row moved in the view.
    DragUpdated,
    DropEffect(DropEffect),
    /// A drop was committed to the list.
    Moved(DropOutcome),
    DragCancelled,
}

/// A list editor bound to one host field.
#[derive(Debug)]
pub struct TypedList {
    store: ListStore,
    listener: ExternalChangeListener,
    view: ListView,
    input: InputControl,
    reorder: ReorderController,
}

impl TypedList {
    /// Bind to `path` on `host` with the instance `params`.
    ///
    /// # Errors
    ///
    /// Returns [`tlist_core::ListError::MalformedValue`] if the field's
    /// current value does not decode.
    pub fn mount(
        host: Rc<dyn FieldHost>,
        path: FieldPath,
        params: &InstanceParameters,
    ) -> Result<Self> {
        let config = FieldConfig::resolve(params);
        let input = InputControl::for_config(&config);
        let listener = ExternalChangeListener::attach(host.as_ref(), &path);
        let store = ListStore::initialize(host, path, config)?;
        let mut view = ListView::new();
        view.render(&store);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "typed_list.mount",
            path = %store.path(),
            kind = %store.config().kind(),
            len = store.len()
        );

        Ok(Self {
            store,
            listener,
            view,
            input,
            reorder: ReorderController::new(),
        })
    }

    #[must_use]
    pub fn store(&self) -> &ListStore {
        &self.store
    }

    #[must_use]
    pub fn view(&self) -> &ListView {
        &self.view
    }

    #[must_use]
    pub fn input(&self) -> &InputControl {
        &self.input
    }

    #[must_use]
    pub fn config(&self) -> &FieldConfig {
        self.store.config()
    }

    #[must_use]
    pub fn reorder(&self) -> &ReorderController {
        &self.reorder
    }

    /// Current list values.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.store.items()
    }

    /// Everything a renderer needs to draw the widget.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        let source = self.reorder.source();
        ViewSnapshot {
            rows: self
                .view
                .rows()
                .iter()
                .map(|row| RowSnapshot {
                    id: row.id,
                    label: row.label.clone(),
                    moving: source == Some(row.id),
                })
                .collect(),
            visible: self.view.is_visible(),
            dragging: self.reorder.is_dragging(),
            input: InputSnapshot {
                mode: self.input.mode().clone(),
                value: self.input.text().to_string(),
            },
        }
    }

    /// Apply queued external field changes and report whether the list
    /// changed.
    ///
    /// The view is re-rendered unless a drag is in flight; then it keeps its
    /// rows until the drop, a cancel, the next `DragStart`, or a local edit.
    ///
    /// # Errors
    ///
    /// Returns the first malformed payload. Well-formed payloads queued
    /// alongside it are still applied.
    pub fn pump(&mut self) -> Result<bool> {
        let drained = self.listener.drain(&mut self.store);
        if !self.reorder.is_dragging() && self.view.is_stale(&self.store) {
            self.view.render(&self.store);
        }
        drained
    }

    /// Handle one user intent.
    ///
    /// # Errors
    ///
    /// Returns an error, without applying `event`, when a queued external
    /// change is malformed. A drop also fails when the field no longer
    /// decodes at drop time.
    pub fn handle(&mut self, event: WidgetEvent) -> Result<EventOutcome> {
        self.pump()?;

        let outcome = match event {
            WidgetEvent::SetInput(text) => {
                if self.input.set_text(text) {
                    EventOutcome::InputChanged
                } else {
                    EventOutcome::Ignored
                }
            }
            WidgetEvent::Submit => self.submit(),
            WidgetEvent::KeyUp(KeyCode::Enter) if !self.input.is_select() => self.submit(),
            WidgetEvent::KeyUp(_) => EventOutcome::Ignored,
            WidgetEvent::Remove(id) => match self.store.remove(id) {
                Some(item) => {
                    self.rerender();
                    EventOutcome::Removed(item)
                }
                None => EventOutcome::Ignored,
            },
            WidgetEvent::Edit(id, text) => {
                let text = text.trim();
                if !text.is_empty() && self.store.replace(id, text) {
                    self.rerender();
                    EventOutcome::Edited(id)
                } else {
                    EventOutcome::Ignored
                }
            }
            WidgetEvent::DragStart(id) => {
                // A drag that never ended left its rows relocated, or held
                // back external changes; restart from the store's order.
                if self.reorder.is_dragging() || self.view.is_stale(&self.store) {
                    self.rerender();
                }
                if self.reorder.drag_start(id, &self.view) {
                    EventOutcome::DragStarted
                } else {
                    EventOutcome::Ignored
                }
            }
            WidgetEvent::DragOver => EventOutcome::DropEffect(self.reorder.drag_over()),
            WidgetEvent::DragEnter(id) => {
                if self.reorder.drag_enter(id, &mut self.view) {
                    EventOutcome::DragUpdated
                } else {
                    EventOutcome::Ignored
                }
            }
            WidgetEvent::DragEnd => self.drop_dragged()?,
            WidgetEvent::DragCancel => {
                if self.reorder.is_dragging() {
                    self.rerender();
                    EventOutcome::DragCancelled
                } else {
                    EventOutcome::Ignored
                }
            }
        };
        Ok(outcome)
    }

    fn submit(&mut self) -> EventOutcome {
        match self.store.append(self.input.text()) {
            Ok(id) => {
                self.input.clear();
                self.rerender();
                EventOutcome::Appended(id)
            }
            Err(reason) => EventOutcome::Rejected(reason),
        }
    }

    /// Render the rows from the store. A drag in flight ends here: its
    /// origin was recorded against rows that no longer exist.
    fn rerender(&mut self) {
        if self.reorder.is_dragging() {
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "reorder.abandoned", item = ?self.reorder.source());
            self.reorder.cancel();
        }
        self.view.render(&self.store);
    }

    fn drop_dragged(&mut self) -> Result<EventOutcome> {
        let Some(outcome) = self.reorder.drag_end(&self.view) else {
            self.view.render(&self.store);
            return Ok(EventOutcome::Ignored);
        };

        // Re-read the field so the move applies to the host's current value.
        let resynced = self.store.resync();
        if let Err(err) = resynced {
            self.view.render(&self.store);
            return Err(err);
        }
        // The origin may be out of range if the list shrank meanwhile.
        let moved = self.store.move_item(outcome.from, outcome.to);
        self.view.render(&self.store);
        Ok(if moved {
            EventOutcome::Moved(outcome)
        } else {
            EventOutcome::Ignored
        })
    }
}
