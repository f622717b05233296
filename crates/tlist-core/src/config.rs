//! Field configuration: item type and allowed vocabulary.
//!
//! The host hands the widget a parameter object once, at mount time:
//!
//! ```json
//! { "type": "string", "options": "red, green, blue" }
//! ```
//!
//! Resolution never fails. An unrecognized `type` falls back to
//! [`ItemKind::String`] and emits a `config.invalid_type` warning.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{ListError, Result};

/// Item type of the managed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Text items, optionally restricted to a vocabulary.
    #[default]
    String,
    /// Finite numbers.
    Number,
}

impl ItemKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            other => Err(format!("unknown item type '{other}'")),
        }
    }
}

/// Raw per-instance parameters as supplied by the host.
///
/// Values are kept loosely typed so that a misconfigured field still mounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceParameters {
    /// Configured item type (`"string"` or `"number"`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<Value>,
    /// Comma separated allowed values (string type only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl InstanceParameters {
    /// Parameters with an explicit type and no options.
    #[must_use]
    pub fn with_type(item_type: impl Into<String>) -> Self {
        Self {
            item_type: Some(Value::String(item_type.into())),
            options: None,
        }
    }

    /// Set the comma separated options string.
    #[must_use]
    pub fn options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(Value::String(options.into()));
        self
    }

    /// Parse parameters from the host's JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidParameters`] if the text is not a JSON
    /// object.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(ListError::InvalidParameters)
    }
}

/// Resolve the item type from instance parameters.
///
/// Absent means string. Anything other than `"string"` or `"number"` is
/// reported and corrected to string.
#[must_use]
pub fn resolve_type(params: &InstanceParameters) -> ItemKind {
    let Some(configured) = &params.item_type else {
        return ItemKind::String;
    };
    match configured.as_str().map(str::parse::<ItemKind>) {
        Some(Ok(kind)) => kind,
        _ => {
            tracing::warn!(
                message = "config.invalid_type",
                configured = %configured,
                fallback = ItemKind::String.as_str(),
            );
            ItemKind::String
        }
    }
}

/// Resolve the allowed vocabulary for string lists.
///
/// Tokens are trimmed and empty tokens dropped. `None` means any non-empty
/// text is accepted. Number lists never have a vocabulary.
#[must_use]
pub fn resolve_allowed_values(params: &InstanceParameters, kind: ItemKind) -> Option<Vec<String>> {
    if kind != ItemKind::String {
        return None;
    }
    let raw = match params.options.as_ref()? {
        Value::String(s) => s.as_str(),
        Value::Null => return None,
        other => {
            tracing::warn!(message = "config.invalid_options", configured = %other);
            return None;
        }
    };
    let tokens: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();
    (!tokens.is_empty()).then_some(tokens)
}

/// Immutable field configuration, resolved once at mount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    kind: ItemKind,
    allowed_values: Option<Vec<String>>,
}

impl FieldConfig {
    /// Resolve configuration from host parameters.
    #[must_use]
    pub fn resolve(params: &InstanceParameters) -> Self {
        let kind = resolve_type(params);
        let allowed_values = resolve_allowed_values(params, kind);
        Self {
            kind,
            allowed_values,
        }
    }

    /// Unrestricted string list.
    #[must_use]
    pub const fn string() -> Self {
        Self {
            kind: ItemKind::String,
            allowed_values: None,
        }
    }

    /// Number list.
    #[must_use]
    pub const fn number() -> Self {
        Self {
            kind: ItemKind::Number,
            allowed_values: None,
        }
    }

    /// String list restricted to `values`. An empty vocabulary is unrestricted.
    #[must_use]
    pub fn restricted<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        Self {
            kind: ItemKind::String,
            allowed_values: (!values.is_empty()).then_some(values),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Allowed vocabulary, or `None` for free input.
    #[must_use]
    pub fn allowed_values(&self) -> Option<&[String]> {
        self.allowed_values.as_deref()
    }

    /// Whether `text` is admitted by the vocabulary.
    #[must_use]
    pub fn allows(&self, text: &str) -> bool {
        self.allowed_values
            .as_ref()
            .is_none_or(|values| values.iter().any(|v| v == text))
    }
}
