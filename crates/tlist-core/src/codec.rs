//! Field value codec.
//!
//! The field stores the list as a JSON array of strings or numbers. An absent
//! or empty field is the empty list.
//!
//! # Invariants
//!
//! 1. `decode(Some(&encode(list)))` returns `list` for every list the widget
//!    itself produces (finite numbers, any strings).
//! 2. `decode` never substitutes a default for unparsable text; corrupt field
//!    values surface as [`ListError::MalformedValue`].

use serde_json::{Number, Value};

use crate::error::{ListError, Result};
use crate::item::{Item, MAX_SAFE_INTEGER};

/// Decode the raw field value into a list.
///
/// # Errors
///
/// Returns [`ListError::MalformedValue`] when `raw` is not a JSON array whose
/// elements are all strings or numbers.
pub fn decode(raw: Option<&str>) -> Result<Vec<Item>> {
    match raw {
        None => Ok(Vec::new()),
        Some("") => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text).map_err(|e| ListError::malformed(text, e)),
    }
}

/// Encode a list into the field's textual representation.
#[must_use]
pub fn encode(list: &[Item]) -> String {
    Value::Array(list.iter().map(item_to_json).collect()).to_string()
}

fn item_to_json(item: &Item) -> Value {
    match item {
        Item::Text(s) => Value::String(s.clone()),
        Item::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
            Value::Number(Number::from(*n as i64))
        }
        // Non-finite values never enter the store; `null` keeps encode total.
        Item::Number(n) => Number::from_f64(*n).map_or(Value::Null, Value::Number),
    }
}
