#![forbid(unsafe_code)]
//! Drag-and-drop reordering state machine.
//!
//! Rows move inside the [`ListView`] while the drag is in flight; the list
//! itself is only touched once, when the drop is committed.
//!
//! # State transitions
//!
//! ```text
//!  ┌──────┐ drag_start ┌──────────┐  drag_end  ┌──────┐
//!  │ Idle ├───────────▶│ Dragging ├───────────▶│ Idle │
//!  └──────┘            └──┬────┬──┘            └──────┘
//!                drag_over│    │drag_enter
//!                         └────┘ (hover, relocate row)
//! ```
//!
//! # Invariants
//!
//! 1. `source` and `origin` are set exactly when the phase is `Dragging`.
//! 2. `drag_end` without a preceding `drag_start` yields no outcome.
//! 3. The controller never mutates the list; it only reports the move.
//! 4. `cancel` returns to `Idle` from any phase.

use tlist_core::ItemId;

use crate::view::ListView;

/// Phase of the drag lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    /// No drag in progress.
    #[default]
    Idle,
    /// A row is being dragged.
    Dragging,
}

/// Drop operation advertised while hovering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DropEffect {
    /// Dropping is not allowed.
    None,
    /// Dropping moves the dragged row.
    Move,
}

/// A committed drop: move `item` from list position `from` to `to`.
///
/// `to` is interpreted after removal of `from` (splice semantics).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DropOutcome {
    pub item: ItemId,
    pub from: usize,
    pub to: usize,
}

/// Drag state for one list instance.
#[derive(Debug, Clone, Default)]
pub struct ReorderController {
    phase: DragPhase,
    /// Row being dragged.
    source: Option<ItemId>,
    /// Position of `source` when the drag started.
    origin: Option<usize>,
    /// Last row entered while dragging.
    hover: Option<ItemId>,
}

impl ReorderController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// The dragged row, if any.
    #[must_use]
    pub fn source(&self) -> Option<ItemId> {
        self.source
    }

    /// Pre-drag position of the dragged row.
    #[must_use]
    pub fn origin(&self) -> Option<usize> {
        self.origin
    }

    #[must_use]
    pub fn hover(&self) -> Option<ItemId> {
        self.hover
    }

    // -----------------------------------------------------------------------
    // State transitions
    // -----------------------------------------------------------------------

    /// Begin dragging `source`. Starting while already dragging restarts
    /// from the new row.
    ///
    /// Returns `false` (and stays idle) if `source` is not a rendered row.
    pub fn drag_start(&mut self, source: ItemId, view: &ListView) -> bool {
        let Some(origin) = view.row_position(source) else {
            self.reset();
            return false;
        };
        self.phase = DragPhase::Dragging;
        self.source = Some(source);
        self.origin = Some(origin);
        self.hover = None;
        true
    }

    /// Pointer moving over the list.
    #[must_use]
    pub fn drag_over(&self) -> DropEffect {
        match self.phase {
            DragPhase::Dragging => DropEffect::Move,
            DragPhase::Idle => DropEffect::None,
        }
    }

    /// Pointer entered the row `target`; relocates the dragged row next to
    /// it. Returns whether the view changed.
    pub fn drag_enter(&mut self, target: ItemId, view: &mut ListView) -> bool {
        let Some(source) = self.source else {
            return false;
        };
        if view.row_position(target).is_none() {
            return false;
        }
        self.hover = Some(target);
        view.relocate(source, target)
    }

    /// Finish the drag.
    ///
    /// Returns `None` for a spurious end (no drag in progress) or when the
    /// dragged row is no longer rendered.
    pub fn drag_end(&mut self, view: &ListView) -> Option<DropOutcome> {
        let source = self.source;
        let origin = self.origin;
        self.reset();

        let (source, from) = (source?, origin?);
        let to = view.row_position(source)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "reorder.drop", item = %source, from, to);

        Some(DropOutcome {
            item: source,
            from,
            to,
        })
    }

    /// Abandon the drag without committing.
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.phase = DragPhase::Idle;
        self.source = None;
        self.origin = None;
        self.hover = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use tlist_core::FieldConfig;
    use tlist_runtime::{FieldPath, ListStore, MemoryHost};

    fn rendered(raw: &str) -> ListView {
        let host = Rc::new(MemoryHost::with_field("list", Some(raw)));
        let store =
            ListStore::initialize(host, FieldPath::new("list"), FieldConfig::string()).unwrap();
        let mut view = ListView::new();
        view.render(&store);
        view
    }

    fn labels(view: &ListView) -> Vec<&str> {
        view.rows().iter().map(|r| r.label.as_str()).collect()
    }

    // -----------------------------------------------------------------------
    // Basic lifecycle
    // -----------------------------------------------------------------------

    #[test]
    fn initial_state_is_idle() {
        let ctl = ReorderController::new();
        assert_eq!(ctl.phase(), DragPhase::Idle);
        assert!(ctl.source().is_none());
        assert!(ctl.origin().is_none());
        assert_eq!(ctl.drag_over(), DropEffect::None);
    }

    #[test]
    fn start_records_source_and_origin() {
        let view = rendered(r#"["a","b","c"]"#);
        let b = view.id_at(1).unwrap();
        let mut ctl = ReorderController::new();
        assert!(ctl.drag_start(b, &view));
        assert_eq!(ctl.phase(), DragPhase::Dragging);
        assert_eq!(ctl.source(), Some(b));
        assert_eq!(ctl.origin(), Some(1));
        assert_eq!(ctl.drag_over(), DropEffect::Move);
    }

    #[test]
    fn start_on_unknown_row_stays_idle() {
        let view = rendered(r#"["a"]"#);
        let stranger = rendered(r#"["x","y"]"#).id_at(1).unwrap();
        let mut ctl = ReorderController::new();
        assert!(!ctl.drag_start(stranger, &view));
        assert_eq!(ctl.phase(), DragPhase::Idle);
    }

    #[test]
    fn restart_replaces_source() {
        let view = rendered(r#"["a","b","c"]"#);
        let mut ctl = ReorderController::new();
        ctl.drag_start(view.id_at(0).unwrap(), &view);
        ctl.drag_start(view.id_at(2).unwrap(), &view);
        assert_eq!(ctl.source(), view.id_at(2));
        assert_eq!(ctl.origin(), Some(2));
    }

    // -----------------------------------------------------------------------
    // Hover feedback
    // -----------------------------------------------------------------------

    #[test]
    fn enter_moves_row_up_before_target() {
        let mut view = rendered(r#"["foo","bar","baz"]"#);
        let (foo, baz) = (view.id_at(0).unwrap(), view.id_at(2).unwrap());
        let mut ctl = ReorderController::new();
        ctl.drag_start(baz, &view);
        assert!(ctl.drag_enter(foo, &mut view));
        assert_eq!(ctl.hover(), Some(foo));
        assert_eq!(labels(&view), ["baz", "foo", "bar"]);
    }

    #[test]
    fn enter_moves_row_down_after_target() {
        let mut view = rendered(r#"["a","b","c"]"#);
        let (a, b) = (view.id_at(0).unwrap(), view.id_at(1).unwrap());
        let mut ctl = ReorderController::new();
        ctl.drag_start(a, &view);
        assert!(ctl.drag_enter(b, &mut view));
        assert_eq!(labels(&view), ["b", "a", "c"]);
    }

    #[test]
    fn enter_on_source_is_ignored() {
        let mut view = rendered(r#"["a","b"]"#);
        let a = view.id_at(0).unwrap();
        let mut ctl = ReorderController::new();
        ctl.drag_start(a, &view);
        assert!(!ctl.drag_enter(a, &mut view));
        assert_eq!(labels(&view), ["a", "b"]);
    }

    #[test]
    fn enter_while_idle_is_ignored() {
        let mut view = rendered(r#"["a","b"]"#);
        let b = view.id_at(1).unwrap();
        let mut ctl = ReorderController::new();
        assert!(!ctl.drag_enter(b, &mut view));
        assert_eq!(labels(&view), ["a", "b"]);
    }

    // -----------------------------------------------------------------------
    // Drop
    // -----------------------------------------------------------------------

    #[test]
    fn end_reports_origin_and_final_position() {
        let mut view = rendered(r#"["foo","bar","baz"]"#);
        let (foo, baz) = (view.id_at(0).unwrap(), view.id_at(2).unwrap());
        let mut ctl = ReorderController::new();
        ctl.drag_start(baz, &view);
        ctl.drag_enter(foo, &mut view);
        let outcome = ctl.drag_end(&view).unwrap();
        assert_eq!(
            outcome,
            DropOutcome {
                item: baz,
                from: 2,
                to: 0
            }
        );
        assert_eq!(ctl.phase(), DragPhase::Idle);
        assert!(ctl.source().is_none());
    }

    #[test]
    fn end_without_movement_reports_same_position() {
        let view = rendered(r#"["a","b"]"#);
        let mut ctl = ReorderController::new();
        ctl.drag_start(view.id_at(1).unwrap(), &view);
        let outcome = ctl.drag_end(&view).unwrap();
        assert_eq!((outcome.from, outcome.to), (1, 1));
    }

    #[test]
    fn spurious_end_is_noop() {
        let view = rendered(r#"["a","b"]"#);
        let mut ctl = ReorderController::new();
        assert!(ctl.drag_end(&view).is_none());
        assert_eq!(ctl.phase(), DragPhase::Idle);
    }

    #[test]
    fn second_end_is_noop() {
        let view = rendered(r#"["a","b"]"#);
        let mut ctl = ReorderController::new();
        ctl.drag_start(view.id_at(0).unwrap(), &view);
        assert!(ctl.drag_end(&view).is_some());
        assert!(ctl.drag_end(&view).is_none());
    }

    #[test]
    fn end_after_source_vanished_is_abandoned() {
        let view = rendered(r#"["a","b"]"#);
        let mut ctl = ReorderController::new();
        ctl.drag_start(view.id_at(1).unwrap(), &view);
        let replaced = rendered(r#"["z"]"#);
        // A fresh store reuses slot 0 only; slot 1 is unknown there.
        assert!(ctl.drag_end(&replaced).is_none());
        assert_eq!(ctl.phase(), DragPhase::Idle);
    }

    #[test]
    fn cancel_returns_to_idle() {
        let view = rendered(r#"["a","b"]"#);
        let mut ctl = ReorderController::new();
        ctl.drag_start(view.id_at(0).unwrap(), &view);
        ctl.cancel();
        assert_eq!(ctl.phase(), DragPhase::Idle);
        assert!(ctl.hover().is_none());
        assert!(ctl.drag_end(&view).is_none());
    }

    // -----------------------------------------------------------------------
    // Tracing
    // -----------------------------------------------------------------------

    #[cfg(feature = "tracing")]
    mod tracing_capture {
        use super::*;
        use std::sync::{Arc, Mutex};
        use tracing::Subscriber;
        use tracing_subscriber::Layer;
        use tracing_subscriber::layer::{Context, SubscriberExt};

        #[derive(Default)]
        struct Captured {
            drops: Vec<(u64, u64)>,
        }

        struct DropLayer {
            state: Arc<Mutex<Captured>>,
        }

        impl<S: Subscriber> Layer<S> for DropLayer {
            fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                #[derive(Default)]
                struct Fields {
                    message: Option<String>,
                    from: Option<u64>,
                    to: Option<u64>,
                }
                impl tracing::field::Visit for Fields {
                    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
                        match field.name() {
                            "from" => self.from = Some(value),
                            "to" => self.to = Some(value),
                            _ => {}
                        }
                    }

                    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                        if field.name() == "message" {
                            self.message = Some(value.to_string());
                        }
                    }

                    fn record_debug(
                        &mut self,
                        field: &tracing::field::Field,
                        value: &dyn std::fmt::Debug,
                    ) {
                        if field.name() == "message" {
                            self.message =
                                Some(format!("{value:?}").trim_matches('"').to_string());
                        }
                    }
                }

                let mut fields = Fields::default();
                event.record(&mut fields);
                if fields.message.as_deref() == Some("reorder.drop")
                    && let (Some(from), Some(to)) = (fields.from, fields.to)
                {
                    self.state.lock().unwrap().drops.push((from, to));
                }
            }
        }

        #[test]
        fn drop_emits_debug_event() {
            let state = Arc::new(Mutex::new(Captured::default()));
            let subscriber = tracing_subscriber::registry().with(DropLayer {
                state: Arc::clone(&state),
            });
            let _guard = tracing::subscriber::set_default(subscriber);

            let mut view = rendered(r#"["foo","bar","baz"]"#);
            let (foo, baz) = (view.id_at(0).unwrap(), view.id_at(2).unwrap());
            let mut ctl = ReorderController::new();
            ctl.drag_start(baz, &view);
            ctl.drag_enter(foo, &mut view);
            ctl.drag_end(&view);
            // Spurious end must not log a drop.
            ctl.drag_end(&view);

            assert_eq!(state.lock().unwrap().drops, vec![(2, 0)]);
        }
    }
}
