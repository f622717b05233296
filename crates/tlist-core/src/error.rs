use thiserror::Error;

pub type Result<T> = std::result::Result<T, ListError>;

#[derive(Debug, Error)]
pub enum ListError {
    /// The field holds text that is not a JSON array of strings or numbers.
    #[error("malformed field value {raw:?}: {source}")]
    MalformedValue {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid instance parameters: {0}")]
    InvalidParameters(#[source] serde_json::Error),
}

impl ListError {
    #[must_use]
    pub fn malformed(raw: impl Into<String>, source: serde_json::Error) -> Self {
        Self::MalformedValue {
            raw: raw.into(),
            source,
        }
    }

    /// Raw field text that failed to decode, if this is a decode failure.
    #[must_use]
    pub fn raw_value(&self) -> Option<&str> {
        match self {
            Self::MalformedValue { raw, .. } => Some(raw),
            Self::InvalidParameters(_) => None,
        }
    }
}
