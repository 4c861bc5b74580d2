use std::fmt;

use log::{debug, error};
use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::class::ClassRecord;
use crate::course::{CourseRecord, StudentRecord};
use crate::grades::GradePatch;
use crate::token::Token;
use crate::user::UserRecord;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

const API_ROOT: &str = "/api/auth";
const GENERIC_FAILURE: &str = "Request failed";

/// Any failed call, collapsed into the one message the screens show.
/// Transport failures, non-2xx statuses and unreadable bodies all end
/// up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    message: String,
}

impl RequestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}", self.message)
    }
}

impl std::error::Error for RequestError {}

pub type Result<T> = std::result::Result<T, RequestError>;

#[derive(Debug, serde::Deserialize)]
pub struct LoginResponse {
    pub user: UserRecord,
    pub token: Token,
}

/// Client for the portal's `/api/auth` namespace. One attempt per
/// call - no retries, no client-side timeout.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn register(&self, payload: &Value) -> Result<Option<Value>> {
        self.send(Method::POST, "/register/", None, Some(payload.clone()))
            .await
    }

    pub async fn login(&self, username_or_email: &str, password: &str) -> Result<LoginResponse> {
        let body = json!({
            "username": username_or_email,
            "password": password,
        });

        let value = self
            .send(Method::POST, "/login/", None, Some(body))
            .await?
            .ok_or_else(|| RequestError::new(GENERIC_FAILURE))?;

        parse("/login/", value)
    }

    pub async fn student_classes(&self, token: &str) -> Result<Vec<ClassRecord>> {
        self.fetch("/dashboard/student/", token).await
    }

    pub async fn lecturer_courses(&self, token: &str) -> Result<Vec<CourseRecord>> {
        self.fetch("/dashboard/lecturer/", token).await
    }

    pub async fn course_students(
        &self,
        course_id: &str,
        token: &str,
    ) -> Result<Vec<StudentRecord>> {
        self.fetch(&format!("/courses/{course_id}/students/"), token)
            .await
    }

    pub async fn update_grades(
        &self,
        course_id: &str,
        student_id: &str,
        patch: &GradePatch,
        token: &str,
    ) -> Result<Option<Value>> {
        let body = serde_json::to_value(patch)
            .map_err(|e| RequestError::new(e.to_string()))?;

        self.send(
            Method::PATCH,
            &format!("/courses/{course_id}/students/{student_id}/grades/"),
            Some(token),
            Some(body),
        )
        .await
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T> {
        let value = self
            .send(Method::GET, path, Some(token), None)
            .await?
            .ok_or_else(|| RequestError::new(GENERIC_FAILURE))?;

        parse(path, value)
    }

    /// One request: JSON in, JSON out. Non-2xx becomes a
    /// [`RequestError`] with whatever human-readable message the error
    /// body carried; 204 becomes `None`.
    async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<Option<Value>> {
        let url = format!("{}{API_ROOT}{path}", self.base_url);
        debug!("{method} {url}");

        let mut request = self
            .http
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            let token = token.trim();
            if !token.is_empty() {
                request = request.header(header::AUTHORIZATION, format!("Token {token}"));
            }
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            error!("{url}: {e}");
            RequestError::new(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());

            error!("{url}: {status}: {message}");
            return Err(RequestError::new(message));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        response.json().await.map(Some).map_err(|e| {
            error!("{url}: unreadable response body: {e}");
            RequestError::new(e.to_string())
        })
    }
}

fn parse<T: DeserializeOwned>(path: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        error!("{path}: unexpected response shape: {e}");
        RequestError::new(e.to_string())
    })
}

/// Error bodies carry `detail` (DRF) or `message`; take the first
/// non-empty one.
fn error_message(body: &Value) -> Option<String> {
    ["detail", "message"]
        .iter()
        .filter_map(|key| body.get(key))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
