use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::role::Role;

/// A portal account as the server reports it. Fields the client doesn't
/// model (`first_name`, `major`, ...) are kept in `extra` so a session
/// survives a disk round-trip losslessly.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Greeting name: `first_name` when the server sent one, then the
    /// full name, then the username.
    pub fn display_name(&self) -> &str {
        self.extra
            .get("first_name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(if self.full_name.is_empty() {
                &self.username
            } else {
                &self.full_name
            })
    }
}
