use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    Status,
    Internal,
}

/// Diagnostic body emitted in debug mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, status: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            status,
            message: message.into(),
        }
    }
}

/// Aborts an action; the response is this status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("http error {code}")]
pub struct HttpError {
    pub code: u16,
    pub detail: Option<String>,
}

impl HttpError {
    pub fn new(code: u16) -> Self {
        Self { code, detail: None }
    }

    pub fn with_detail(code: u16, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: Some(detail.into()),
        }
    }

    pub fn not_found() -> Self {
        Self::new(404)
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::with_detail(403, detail)
    }
}

impl From<HttpError> for ApiError {
    fn from(value: HttpError) -> Self {
        let code = match value.code {
            400 => ErrorCode::BadRequest,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            405 => ErrorCode::MethodNotAllowed,
            _ => ErrorCode::Status,
        };
        let message = value.detail.unwrap_or_else(|| format!("status {}", value.code));
        Self {
            code,
            status: value.code,
            message,
        }
    }
}

/// Aborts an action; the response redirects to `url`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("redirect to {url}")]
pub struct Redirect {
    pub url: String,
    pub permanent: bool,
}

impl Redirect {
    pub fn to(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            permanent: false,
        }
    }

    pub fn permanent(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            permanent: true,
        }
    }
}

/// Everything that can cut an action short.
#[derive(Debug, Error)]
pub enum Interrupt {
    #[error(transparent)]
    Redirect(#[from] Redirect),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<serde_json::Error> for Interrupt {
    fn from(value: serde_json::Error) -> Self {
        Interrupt::Internal(value.into())
    }
}

pub type ActionResult = Result<(), Interrupt>;
