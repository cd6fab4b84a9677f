//! Backend HTTP contract: endpoint paths, wire DTOs, and the error taxonomy.
//!
//! SYSTEM CONTEXT
//! ==============
//! Both front ends speak to the same document backend. Transport lives in the
//! front ends (`gloo-net` in the browser, `reqwest` in the CLI); everything
//! that must agree between them lives here.
//!
//! ERROR HANDLING
//! ==============
//! Network and authentication failures become [`ApiError`] values that the
//! caller turns into a transient notice. Role mismatches never get here; they
//! are resolved by the route guard as redirects.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::session::{Role, Session};

/// Default backend origin when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

pub const LOGIN_PATH: &str = "/users/login/";
pub const SIGNUP_PATH: &str = "/users/signup/";
pub const DOCUMENTS_PATH: &str = "/documents/get-documents/";
pub const UPLOAD_PATH: &str = "/documents/upload-file/";
/// Multipart field name carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

#[must_use]
pub fn verify_email_path(token: &str) -> String {
    format!("/users/verify-email/{token}/")
}

#[must_use]
pub fn delete_document_path(id: i64) -> String {
    format!("/documents/delete-document/{id}")
}

#[must_use]
pub fn download_document_path(id: i64) -> String {
    format!("/documents/download-documents/{id}")
}

#[must_use]
pub fn view_document_path(id: i64) -> String {
    format!("/documents/view-documents/{id}")
}

#[must_use]
pub fn generate_link_path(id: i64) -> String {
    format!("/documents/generate-link/{id}/")
}

/// Join a base URL and an endpoint path with exactly one slash between them.
#[must_use]
pub fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_owned()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Value of the `Authorization` header for a session token.
#[must_use]
pub fn authorization_header(token: &str) -> String {
    format!("Token {token}")
}

/// Extract the `filename` parameter of a `Content-Disposition` header,
/// keeping only its last path segment.
#[must_use]
pub fn attachment_file_name(header: &str) -> Option<String> {
    let raw = header.split(';').map(str::trim).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("filename")
            .then(|| value.trim().trim_matches('"'))
    })?;
    let name = raw.rsplit(['/', '\\']).next()?.trim();
    (!name.is_empty() && name != "..").then(|| name.to_owned())
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Login form body. The backend's token endpoint names the email `username`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Trim the username and reject blank fields.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when either field is empty.
    pub fn new(username: &str, password: &str) -> Result<Self, ApiError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Enter both email and password.".to_owned(),
            ));
        }
        Ok(Self {
            username: username.to_owned(),
            password: password.to_owned(),
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `200` body of `POST /users/login/`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub email: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginResponse {
    /// Turn a login response into a session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the token or email is blank.
    pub fn into_session(self) -> Result<Session, ApiError> {
        let token = self.token.trim();
        let email = self.email.trim();
        if token.is_empty() || email.is_empty() {
            return Err(ApiError::Decode(
                "login response is missing token or email".to_owned(),
            ));
        }
        Ok(Session {
            token: token.to_owned(),
            role: self.role,
            identity: email.to_owned(),
        })
    }
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Body of `POST /users/signup/`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl SignupRequest {
    /// Validate signup form input.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a missing role or blank fields.
    pub fn new(email: &str, password: &str, role: Option<Role>) -> Result<Self, ApiError> {
        let Some(role) = role else {
            return Err(ApiError::Validation("Please select a role".to_owned()));
        };
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Enter both email and password.".to_owned(),
            ));
        }
        Ok(Self {
            email: email.to_owned(),
            password: password.to_owned(),
            role,
        })
    }
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// `200` body of `POST /users/signup/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupResponse {
    pub message: String,
    #[serde(default)]
    pub verification_link: Option<String>,
}

/// Generic `{ "message": ... }` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// One entry of `GET /documents/get-documents/`.
///
/// Opaque payload for the views; the guard never looks at it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: i64,
    /// Storage path or media URL of the file.
    pub file: String,
    /// Display name.
    pub file_name: String,
    /// Upload time as `YYYY-MM-DD HH:MM:SS`.
    pub uploaded_at: String,
}

/// `200` body of `GET /documents/generate-link/{id}/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLink {
    /// Time-limited pre-signed URL.
    pub download_url: String,
}

// =============================================================================
// UPLOADS
// =============================================================================

/// Office formats the backend accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    Pptx,
    Docx,
    Xlsx,
}

impl DocumentKind {
    /// Classify by extension, case-insensitively.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, extension) = name.trim().rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "docx" => Some(Self::Docx),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pptx => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pptx => "Presentation",
            Self::Docx => "Document",
            Self::Xlsx => "Spreadsheet",
        }
    }
}

/// Check an upload candidate before sending it.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for anything but pptx, docx, or xlsx.
pub fn validate_upload(file_name: &str) -> Result<DocumentKind, ApiError> {
    DocumentKind::from_file_name(file_name).ok_or_else(|| {
        ApiError::Validation(
            "Invalid file type. Only pptx, docx, xlsx files are allowed.".to_owned(),
        )
    })
}

/// Render a byte count with a 1024 base, e.g. `1.5 KB`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_owned();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}

// =============================================================================
// ERRORS
// =============================================================================

/// Failure talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No response: DNS, connection refused, timeout, CORS.
    #[error("network error: {0}")]
    Network(String),
    /// Credentials rejected or email unverified (400/403 on login).
    #[error("{message}")]
    Authentication { status: u16, message: String },
    /// Any other non-success status.
    #[error("request failed ({status}): {message}")]
    Server { status: u16, message: String },
    /// Response arrived but did not match the contract.
    #[error("response error: {0}")]
    Decode(String),
    /// Rejected locally before any request was sent.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Message suitable for an inline notice.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Please try again.".to_owned(),
            Self::Authentication { message, .. }
            | Self::Server { message, .. }
            | Self::Validation(message) => message.clone(),
            Self::Decode(_) => "Unexpected response from server.".to_owned(),
        }
    }

    /// HTTP status when the backend answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Classify a failed `POST /users/login/`.
#[must_use]
pub fn login_failure(status: u16, body: &str) -> ApiError {
    let server_message = message_field(body);
    match status {
        400 => ApiError::Authentication {
            status,
            message: "Invalid email or password".to_owned(),
        },
        403 => ApiError::Authentication {
            status,
            message: server_message
                .unwrap_or_else(|| "Email not verified. Please verify your email first.".to_owned()),
        },
        _ => ApiError::Server {
            status,
            message: server_message.unwrap_or_else(|| "Login failed".to_owned()),
        },
    }
}

/// Classify a failed `POST /users/signup/` from its field-error body.
#[must_use]
pub fn signup_failure(status: u16, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let field_error = parsed.as_ref().and_then(|value| {
        ["email", "password", "role"]
            .iter()
            .find_map(|field| first_field_error(value, field))
    });
    ApiError::Server {
        status,
        message: field_error
            .or_else(|| message_field(body))
            .unwrap_or_else(|| "Signup failed".to_owned()),
    }
}

/// Classify any other failed request, preferring the server's `message`.
#[must_use]
pub fn server_failure(status: u16, body: &str, fallback: &str) -> ApiError {
    ApiError::Server {
        status,
        message: message_field(body).unwrap_or_else(|| fallback.to_owned()),
    }
}

/// Extract and sanitize a `message` field from a JSON error body.
fn message_field(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    let message = value.get("message")?.as_str()?;
    sanitize(message)
}

fn first_field_error(value: &Value, field: &str) -> Option<String> {
    let entry = value.get(field)?;
    let message = match entry {
        Value::Array(items) => items.first()?.as_str()?,
        Value::String(text) => text.as_str(),
        _ => return None,
    };
    sanitize(message)
}

fn sanitize(message: &str) -> Option<String> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(MAX_ERROR_CHARS).collect())
    }
}
