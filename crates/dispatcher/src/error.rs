use shared::{
    domain::{HttpMethod, RouteKind},
    error::{ApiError, ErrorCode},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("method {method} not allowed on {kind} route")]
    MethodNotAllowed { method: HttpMethod, kind: RouteKind },
    #[error("internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl DispatchError {
    pub fn not_found(message: impl Into<String>) -> Self {
        DispatchError::NotFound(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DispatchError::NotFound(_) => ErrorCode::NotFound,
            DispatchError::BadRequest(_) => ErrorCode::BadRequest,
            DispatchError::MethodNotAllowed { .. } => ErrorCode::MethodNotAllowed,
            DispatchError::Internal(_) => ErrorCode::Internal,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            DispatchError::NotFound(_) => 404,
            DispatchError::BadRequest(_) => 400,
            DispatchError::MethodNotAllowed { .. } => 405,
            DispatchError::Internal(_) => 500,
        }
    }
}

impl From<&DispatchError> for ApiError {
    fn from(value: &DispatchError) -> Self {
        ApiError::new(value.code(), value.status(), value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template '{0}' does not exist")]
    NotFound(String),
    #[error("template '{template}' failed to render: {source:#}")]
    Engine {
        template: String,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("invalid controller name '{0}'")]
    InvalidName(String),
    #[error("controller '{0}' is already registered")]
    Duplicate(String),
}
