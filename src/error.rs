use thiserror::Error;

/// Errors raised while converting change-stream images
#[derive(Error, Debug)]
pub enum ConvertError {
    /// A wire value that cannot be decoded: no recognized tag, a payload of
    /// the wrong type, bad base64, or a non-numeric `N`/`NS` literal.
    #[error("malformed attribute value at `{}`: {reason}", display_path(.path))]
    MalformedValue { path: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        ConvertError::MalformedValue {
            path: String::new(),
            reason: reason.into(),
        }
    }

    /// Attribute path of a malformed value, if this is one
    pub fn path(&self) -> Option<&str> {
        match self {
            ConvertError::MalformedValue { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Prefix the path with the map key the failing value was found under.
    ///
    /// Paths are assembled while the error unwinds, so the happy path never
    /// allocates them.
    pub fn within_key(self, key: &str) -> Self {
        match self {
            ConvertError::MalformedValue { path, reason } => {
                let path = if path.is_empty() || path.starts_with('[') {
                    format!("{}{}", key, path)
                } else {
                    format!("{}.{}", key, path)
                };
                ConvertError::MalformedValue { path, reason }
            }
            other => other,
        }
    }

    /// Prefix the path with the list position the failing value was found at
    pub fn within_index(self, index: usize) -> Self {
        match self {
            ConvertError::MalformedValue { path, reason } => {
                let path = if path.is_empty() || path.starts_with('[') {
                    format!("[{}]{}", index, path)
                } else {
                    format!("[{}].{}", index, path)
                };
                ConvertError::MalformedValue { path, reason }
            }
            other => other,
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
