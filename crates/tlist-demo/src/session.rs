//! A widget mounted on an in-memory field, driven by script commands.

use std::io::Write;
use std::rc::Rc;

use tlist_core::InstanceParameters;
use tlist_runtime::{FieldHost, FieldPath, MemoryHost};
use tlist_widgets::{EventOutcome, InputMode, KeyCode, TypedList, ViewSnapshot, WidgetEvent};

use crate::error::Result;
use crate::script::{Command, ScriptLine};

/// Output format for rendered state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON snapshot per line.
    Json,
}

pub struct Session {
    host: Rc<MemoryHost>,
    path: FieldPath,
    list: TypedList,
    format: OutputFormat,
}

impl Session {
    /// Mount a list on a fresh field holding `initial`.
    ///
    /// # Errors
    ///
    /// Fails if `initial` is not a valid list value.
    pub fn start(
        initial: Option<&str>,
        params: &InstanceParameters,
        format: OutputFormat,
    ) -> Result<Self> {
        let path = FieldPath::new("demo");
        let host = Rc::new(MemoryHost::with_field(path.clone(), initial));
        let list = TypedList::mount(host.clone(), path.clone(), params)?;
        tracing::info!(
            message = "demo.start",
            kind = %list.config().kind(),
            len = list.store().len()
        );
        Ok(Self {
            host,
            path,
            list,
            format,
        })
    }

    #[must_use]
    pub fn list(&self) -> &TypedList {
        &self.list
    }

    /// The field's raw stored value.
    #[must_use]
    pub fn field_value(&self) -> Option<String> {
        self.host.read(&self.path)
    }

    /// Run every line, rendering the state after each one.
    ///
    /// A malformed external value is reported in the output and the script
    /// continues.
    ///
    /// # Errors
    ///
    /// Only I/O errors on `out` abort the run.
    pub fn run(&mut self, lines: &[ScriptLine], out: &mut impl Write) -> Result<()> {
        if self.format == OutputFormat::Text {
            self.render(out)?;
        }
        for line in lines {
            match self.execute(&line.command) {
                Ok(outcome) => {
                    tracing::debug!(message = "demo.command", line = line.line, ?outcome);
                }
                Err(err) => {
                    tracing::warn!(message = "demo.command_failed", line = line.line, error = %err);
                    if self.format == OutputFormat::Text {
                        writeln!(out, "line {}: {err}", line.line)?;
                    }
                }
            }
            if self.format == OutputFormat::Json || line.command == Command::Show {
                self.render(out)?;
            }
        }
        if self.format == OutputFormat::Text {
            self.render(out)?;
        }
        Ok(())
    }

    /// Apply one command to the widget.
    ///
    /// # Errors
    ///
    /// Returns the widget's error when a queued external value is malformed.
    pub fn execute(&mut self, command: &Command) -> tlist_core::Result<EventOutcome> {
        match command {
            Command::Input(text) => self.list.handle(WidgetEvent::SetInput(text.clone())),
            Command::Submit => self.list.handle(WidgetEvent::Submit),
            Command::Enter => self.list.handle(WidgetEvent::KeyUp(KeyCode::Enter)),
            Command::Add(text) => {
                self.list.handle(WidgetEvent::SetInput(text.clone()))?;
                self.list.handle(WidgetEvent::Submit)
            }
            Command::Remove(pos) => self.at(*pos, WidgetEvent::Remove),
            Command::Edit(pos, text) => {
                let text = text.clone();
                self.at(*pos, |id| WidgetEvent::Edit(id, text))
            }
            Command::Drag { from, over } => {
                self.at(*from, WidgetEvent::DragStart)?;
                self.list.handle(WidgetEvent::DragOver)?;
                self.at(*over, WidgetEvent::DragEnter)?;
                self.list.handle(WidgetEvent::DragEnd)
            }
            Command::DragStart(pos) => self.at(*pos, WidgetEvent::DragStart),
            Command::DragEnter(pos) => self.at(*pos, WidgetEvent::DragEnter),
            Command::DragEnd => self.list.handle(WidgetEvent::DragEnd),
            Command::DragCancel => self.list.handle(WidgetEvent::DragCancel),
            Command::External(raw) => {
                self.host.set_external(&self.path, Some(raw.as_str()));
                self.list.pump().map(|_| EventOutcome::Ignored)
            }
            Command::Show => self.list.pump().map(|_| EventOutcome::Ignored),
        }
    }

    /// Dispatch `event` for the row at `pos`; a missing row is ignored.
    fn at(
        &mut self,
        pos: usize,
        event: impl FnOnce(tlist_core::ItemId) -> WidgetEvent,
    ) -> tlist_core::Result<EventOutcome> {
        match self.list.view().id_at(pos) {
            Some(id) => self.list.handle(event(id)),
            None => Ok(EventOutcome::Ignored),
        }
    }

    /// Write the current state in the session's format.
    ///
    /// # Errors
    ///
    /// Returns I/O or serialization errors.
    pub fn render(&self, out: &mut impl Write) -> Result<()> {
        let snapshot = self.list.snapshot();
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &snapshot)?;
                writeln!(out)?;
            }
            OutputFormat::Text => write_text(&snapshot, self.field_value().as_deref(), out)?,
        }
        Ok(())
    }
}

fn write_text(snapshot: &ViewSnapshot, field: Option<&str>, out: &mut impl Write) -> Result<()> {
    if snapshot.visible {
        for (pos, row) in snapshot.rows.iter().enumerate() {
            let marker = if row.moving { '*' } else { ' ' };
            writeln!(out, "{marker}{pos:>3}  {}", row.label)?;
        }
    } else {
        writeln!(out, "   (empty)")?;
    }
    let mode = match &snapshot.input.mode {
        InputMode::Text => "text".to_string(),
        InputMode::Number => "number".to_string(),
        InputMode::Select { options } => format!("select: {}", options.join(", ")),
    };
    writeln!(out, "input [{mode}] {:?}", snapshot.input.value)?;
    writeln!(out, "field {}", field.unwrap_or("null"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;

    fn session(initial: &str, params: InstanceParameters) -> Session {
        Session::start(Some(initial), &params, OutputFormat::Text).unwrap()
    }

    fn run(session: &mut Session, script: &str) -> String {
        let lines = parse_script(script).unwrap();
        let mut out = Vec::new();
        session.run(&lines, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn add_then_drag_updates_field() {
        let mut s = session(r#"["foo","bar"]"#, InstanceParameters::default());
        run(&mut s, "add baz\ndrag 2 0\n");
        assert_eq!(s.field_value().as_deref(), Some(r#"["baz","foo","bar"]"#));
    }

    #[test]
    fn text_output_lists_rows_and_field() {
        let mut s = session(r#"["foo"]"#, InstanceParameters::default());
        let out = run(&mut s, "add bar\n");
        let last: Vec<&str> = out.lines().rev().take(4).collect();
        assert_eq!(
            last,
            [
                r#"field ["foo","bar"]"#,
                r#"input [text] """#,
                "    1  bar",
                "    0  foo"
            ]
        );
    }

    #[test]
    fn empty_list_renders_hidden() {
        let mut s = session("[]", InstanceParameters::default());
        let out = run(&mut s, "");
        assert!(out.contains("(empty)"));
    }

    #[test]
    fn dragged_row_is_marked() {
        let mut s = session(r#"["a","b"]"#, InstanceParameters::default());
        let out = run(&mut s, "drag-start 1\nshow\n");
        assert!(out.contains("*  1  b"));
    }

    #[test]
    fn malformed_external_value_is_reported_and_run_continues() {
        let mut s = session(r#"["a"]"#, InstanceParameters::default());
        let out = run(&mut s, "external nope\nadd b\n");
        assert!(out.contains("line 1:"));
        assert_eq!(s.field_value().as_deref(), Some(r#"["a","b"]"#));
    }

    #[test]
    fn missing_rows_are_ignored() {
        let mut s = session(r#"["a"]"#, InstanceParameters::default());
        assert_eq!(s.execute(&Command::Remove(5)).unwrap(), EventOutcome::Ignored);
        assert_eq!(
            s.execute(&Command::Drag { from: 0, over: 9 }).unwrap(),
            EventOutcome::Moved(tlist_widgets::DropOutcome {
                item: s.list().view().id_at(0).unwrap(),
                from: 0,
                to: 0
            })
        );
    }

    #[test]
    fn json_output_is_one_snapshot_per_command() {
        let mut s = Session::start(
            Some(r#"["a"]"#),
            &InstanceParameters::default(),
            OutputFormat::Json,
        )
        .unwrap();
        let out = run(&mut s, "add b\nremove 0\n");
        let snapshots: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[1]["rows"][0]["label"], "b");
        assert_eq!(snapshots[1]["visible"], true);
        assert_eq!(snapshots[1]["input"]["mode"], "text");
    }
}
