use std::fmt;

use log::info;

use crate::api::ApiClient;
use crate::role::{detect_role_from_email, redirect_path_for_role, Role};
use crate::routes::Route;
use crate::session::{AuthData, SessionError, SessionStore};
use crate::user::UserRecord;

pub const EMPTY_FIELDS: &str = "Please fill out both fields.";

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug)]
pub enum LoginError {
    /// Pre-submit check; never reaches the network.
    Validation(&'static str),
    /// Whatever the server (or the transport) said; no mock fallback
    /// for authentication.
    Request(String),
    Session(SessionError),
}

impl fmt::Display for LoginError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(fmt, "{msg}"),
            Self::Request(msg) => write!(fmt, "{msg}"),
            Self::Session(e) => write!(fmt, "{e}"),
        }
    }
}

impl std::error::Error for LoginError {}

#[derive(Debug)]
pub struct LoginOutcome {
    pub role: Role,
    pub redirect: Route,
}

/// Log in, persist the session and report where the role lands. The
/// redirect is always the role default, even when the visitor was
/// bounced here from somewhere else.
pub async fn submit(
    api: &ApiClient,
    session: &mut SessionStore,
    form: &LoginForm,
) -> Result<LoginOutcome, LoginError> {
    if form.username_or_email.is_empty() || form.password.is_empty() {
        return Err(LoginError::Validation(EMPTY_FIELDS));
    }

    let response = api
        .login(&form.username_or_email, &form.password)
        .await
        .map_err(|e| LoginError::Request(e.message().to_string()))?;

    let role = resolve_role(&response.user, &form.username_or_email);
    let token = response.token.as_str().to_string();

    let mut user = response.user;
    user.role = Some(role);
    let username = user.username.clone();

    session
        .set_auth_data(AuthData { user, token })
        .map_err(LoginError::Session)?;

    info!("{username} logged in as {role}");

    Ok(LoginOutcome {
        role,
        redirect: redirect_path_for_role(Some(role)),
    })
}

/// Server-supplied role wins; otherwise derive from the account email,
/// then from whatever was typed into the form, then assume student.
pub fn resolve_role(user: &UserRecord, submitted: &str) -> Role {
    user.role
        .or_else(|| detect_role_from_email(&user.email))
        .or_else(|| detect_role_from_email(submitted))
        .unwrap_or(Role::Student)
}
