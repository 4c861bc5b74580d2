use std::fmt;

use log::info;
use serde_json::json;

use crate::api::ApiClient;
use crate::role::{detect_role_from_email, Role};
use crate::routes::Route;

pub const SUCCESS_STATUS: &str = "Account created! Redirecting to login...";

const REQUIRED: &str = "Required";
const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters.";
const PASSWORDS_MISMATCH: &str = "Passwords do not match";
const CAMPUS_EMAIL_REQUIRED: &str = "Use your campus email to determine your role.";

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password: String,
    pub password_confirmation: String,
    /// The one optional field.
    pub major: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug)]
pub enum RegisterError {
    Validation(Vec<FieldError>),
    Request(String),
}

impl fmt::Display for RegisterError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(errors) => {
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(fmt, "; ")?;
                    }
                    write!(fmt, "{}: {}", e.field, e.message)?;
                }
                Ok(())
            }
            Self::Request(msg) => write!(fmt, "{msg}"),
        }
    }
}

impl std::error::Error for RegisterError {}

#[derive(Debug)]
pub struct RegisterOutcome {
    pub role: Role,
    pub status: &'static str,
    /// Registration never logs in; the flow lands back on login.
    pub redirect: Route,
}

/// Field-level checks, run before anything touches the network. Later
/// checks override the generic "Required" for the same field.
pub fn validate(form: &RegisterForm) -> Result<Role, Vec<FieldError>> {
    let mut errors: Vec<FieldError> = Vec::new();
    let mut fail = |field: &'static str, message: &'static str| {
        match errors.iter_mut().find(|e| e.field == field) {
            Some(existing) => existing.message = message,
            None => errors.push(FieldError { field, message }),
        }
    };

    for (field, value) in [
        ("email", &form.email),
        ("username", &form.username),
        ("full_name", &form.full_name),
        ("password", &form.password),
        ("password_confirmation", &form.password_confirmation),
    ] {
        if value.trim().is_empty() {
            fail(field, REQUIRED);
        }
    }

    if !form.password.is_empty() && form.password.len() < 8 {
        fail("password", PASSWORD_TOO_SHORT);
    }
    if form.password != form.password_confirmation {
        fail("password_confirmation", PASSWORDS_MISMATCH);
    }

    let role = detect_role_from_email(&form.email);
    if role.is_none() {
        fail("email", CAMPUS_EMAIL_REQUIRED);
    }

    match role {
        Some(role) if errors.is_empty() => Ok(role),
        _ => Err(errors),
    }
}

pub async fn submit(api: &ApiClient, form: &RegisterForm) -> Result<RegisterOutcome, RegisterError> {
    let role = validate(form).map_err(RegisterError::Validation)?;

    let payload = json!({
        "email": form.email,
        "username": form.username,
        "full_name": form.full_name,
        "password": form.password,
        "password_confirmation": form.password_confirmation,
        "major": form.major,
        "role": role,
    });

    api.register(&payload)
        .await
        .map_err(|e| RegisterError::Request(e.message().to_string()))?;

    info!("registered {} as {role}", form.username);

    Ok(RegisterOutcome {
        role,
        status: SUCCESS_STATUS,
        redirect: Route::Login,
    })
}
