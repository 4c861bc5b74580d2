use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::user::UserRecord;

/// The persisted `{user, token}` pair. The file exists iff someone is
/// logged in.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AuthData {
    pub user: UserRecord,
    pub token: String,
}

#[derive(Debug)]
pub enum SessionError {
    Io(std::io::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(fmt, "couldn't write session file: {e}"),
            Self::Encode(e) => write!(fmt, "couldn't encode session: {e}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<std::io::Error> for SessionError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e)
    }
}

pub struct SessionStore {
    path: PathBuf,
    auth: Option<AuthData>,

    /// Whether the most recent data fetch fell back to mock data. Not
    /// persisted; views toggle it, nothing clears it behind their back.
    using_mock_data: bool,
}

impl SessionStore {
    /// Read the session file once at startup. A missing, unreadable or
    /// malformed file is the logged-out state, never an error.
    pub fn load(path: PathBuf) -> Self {
        let auth = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(auth) => {
                    debug!("session restored from {}", path.display());
                    Some(auth)
                }
                Err(e) => {
                    warn!("ignoring malformed session file {}: {e}", path.display());
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("couldn't read session file {}: {e}", path.display());
                None
            }
        };

        Self {
            path,
            auth,
            using_mock_data: false,
        }
    }

    /// Replace the session and persist it synchronously.
    pub fn set_auth_data(&mut self, auth: AuthData) -> Result<(), SessionError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_string_pretty(&auth)?;
        fs::write(&self.path, json)?;

        self.auth = Some(auth);
        Ok(())
    }

    /// Drop the session and remove the file; an already-absent file is
    /// fine.
    pub fn clear_auth(&mut self) {
        self.auth = None;

        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("couldn't remove session file {}: {e}", self.path.display()),
        }
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.auth.as_ref().map(|a| &a.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.token.as_str())
    }

    pub fn using_mock_data(&self) -> bool {
        self.using_mock_data
    }

    pub fn set_using_mock_data(&mut self, using: bool) {
        self.using_mock_data = using;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use tempfile::TempDir;

    fn auth() -> AuthData {
        serde_json::from_str(
            r#"{
                "user": {
                    "username": "aria",
                    "email": "aria@student.prasetiyamulya.ac.id",
                    "full_name": "Aria Hartanto",
                    "role": "student",
                    "major": "Business Tech"
                },
                "token": "tok-123"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn round_trips_through_a_fresh_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut store = SessionStore::load(path.clone());
        assert!(store.user().is_none());

        store.set_auth_data(auth()).unwrap();
        assert_eq!(store.token(), Some("tok-123"));

        // a "reload": read the same file from scratch
        let reloaded = SessionStore::load(path);
        assert_eq!(reloaded.token(), Some("tok-123"));
        assert_eq!(reloaded.user().unwrap().role, Some(crate::role::Role::Student));
        assert_eq!(
            reloaded.user().unwrap().email,
            "aria@student.prasetiyamulya.ac.id",
        );
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut store = SessionStore::load(path.clone());
        store.set_auth_data(auth()).unwrap();
        assert!(path.exists());

        store.clear_auth();
        assert!(store.user().is_none());
        assert!(!path.exists());

        let reloaded = SessionStore::load(path);
        assert!(reloaded.user().is_none());
    }

    #[test]
    fn clearing_twice_is_harmless() {
        let dir = TempDir::new().unwrap();
        let mut store = SessionStore::load(dir.path().join("session.json"));
        store.clear_auth();
        store.clear_auth();
    }

    #[test]
    fn a_corrupt_file_loads_as_logged_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = SessionStore::load(path);
        assert!(store.user().is_none());
        assert!(store.token().is_none());
    }

    #[test]
    fn creates_parent_directories_on_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("session.json");

        let mut store = SessionStore::load(path.clone());
        store.set_auth_data(auth()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn mock_flag_defaults_off_and_is_not_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut store = SessionStore::load(path.clone());
        store.set_auth_data(auth()).unwrap();
        store.set_using_mock_data(true);
        assert!(store.using_mock_data());

        let reloaded = SessionStore::load(path);
        assert!(!reloaded.using_mock_data());
    }
}
