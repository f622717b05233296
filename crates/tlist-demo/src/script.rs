//! Line-oriented command scripts.
//!
//! One command per line; blank lines and lines starting with `#` are skipped.
//! Positions are 0-based visual row positions.

use crate::error::{DemoError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set the add control's content.
    Input(String),
    /// Click the add button.
    Submit,
    /// Release Enter in the add control.
    Enter,
    /// `input` followed by `submit`.
    Add(String),
    Remove(usize),
    Edit(usize, String),
    /// Full drag: start on `from`, enter `over`, drop.
    Drag { from: usize, over: usize },
    DragStart(usize),
    DragEnter(usize),
    DragEnd,
    DragCancel,
    /// Another writer stores `raw` in the field.
    External(String),
    Show,
}

/// A parsed command with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns [`DemoError::Script`] for the first line that does not parse.
pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let command = parse_command(trimmed).map_err(|message| DemoError::script(line, message))?;
        lines.push(ScriptLine { line, command });
    }
    Ok(lines)
}

/// Parse one non-empty command line.
///
/// # Errors
///
/// Returns a description of what is wrong with the line.
pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "input" => Command::Input(rest.to_string()),
        "submit" => no_args(word, rest, Command::Submit)?,
        "enter" => no_args(word, rest, Command::Enter)?,
        "add" => Command::Add(rest.to_string()),
        "remove" => Command::Remove(position(word, rest)?),
        "edit" => {
            let (pos, text) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| format!("usage: edit POS TEXT, got '{line}'"))?;
            Command::Edit(position(word, pos)?, text.trim().to_string())
        }
        "drag" => {
            let mut parts = rest.split_whitespace();
            let (Some(from), Some(over), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(format!("usage: drag FROM TO, got '{line}'"));
            };
            Command::Drag {
                from: position(word, from)?,
                over: position(word, over)?,
            }
        }
        "drag-start" => Command::DragStart(position(word, rest)?),
        "drag-enter" => Command::DragEnter(position(word, rest)?),
        "drag-end" => no_args(word, rest, Command::DragEnd)?,
        "drag-cancel" => no_args(word, rest, Command::DragCancel)?,
        "external" => {
            if rest.is_empty() {
                return Err("usage: external JSON".to_string());
            }
            Command::External(rest.to_string())
        }
        "show" => no_args(word, rest, Command::Show)?,
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(command)
}

fn no_args(word: &str, rest: &str, command: Command) -> std::result::Result<Command, String> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(format!("'{word}' takes no arguments"))
    }
}

fn position(word: &str, text: &str) -> std::result::Result<usize, String> {
    text.trim()
        .parse()
        .map_err(|_| format!("'{word}' expects a row position, got '{text}'"))
}
