use serde::{Deserialize, Serialize};

/// Login responses have carried the token both as a bare string and as
/// an object with `access`/`refresh` fields. Accept either shape.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Token {
    Raw(String),
    Object { access: String },
}

impl Token {
    pub fn access(&self) -> &str {
        match self {
            Self::Raw(s) => s,
            Self::Object { access } => access,
        }
    }

    /// The value that goes on the Authorization header. Empty means
    /// "no usable token".
    pub fn as_str(&self) -> &str {
        self.access().trim()
    }
}
