use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// Every failure a handler can surface to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing required field")]
    MissingField,

    #[error("password too short")]
    WeakPassword,

    #[error("password confirmation mismatch")]
    PasswordMismatch,

    #[error("username already registered")]
    DuplicateUsername,

    #[error("no pending recipe")]
    NoPendingRecipe,

    #[error("bad request: {0}")]
    BadRequest(String),

    /// Unknown user and wrong password alike.
    #[error("wrong credentials")]
    WrongCredentials,

    /// Missing, malformed, foreign-signed or expired session token.
    #[error("invalid session")]
    Invalid,

    /// The category does not exist or belongs to someone else. Both answer
    /// 404 so a caller cannot tell a foreign category id from a missing one.
    #[error("not owner")]
    NotOwner,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_message: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingField
            | Self::WeakPassword
            | Self::PasswordMismatch
            | Self::DuplicateUsername
            | Self::NoPendingRecipe
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::WrongCredentials | Self::Invalid => StatusCode::UNAUTHORIZED,
            Self::NotOwner => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing text. Internal details never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            Self::MissingField => "Please enter all required fields.".into(),
            Self::WeakPassword => "Please enter a password of at least 6 characters.".into(),
            Self::PasswordMismatch => "Please enter the same password twice.".into(),
            Self::DuplicateUsername => "An account with this username already exists.".into(),
            Self::NoPendingRecipe => "No recipe selected.".into(),
            Self::BadRequest(msg) => msg.clone(),
            Self::WrongCredentials => "Wrong username or password.".into(),
            Self::Invalid => "Unauthorized.".into(),
            Self::NotOwner => "Category not found.".into(),
            Self::Internal(_) => "Internal server error.".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Internal(e) = &self {
            error!(error = ?e, "internal error");
        }
        let body = ErrorBody {
            error_message: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

// Extractor failures keep the `errorMessage` body; serde details stay in the log.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "request body rejected");
        Self::BadRequest("Invalid request body.".into())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        debug!(error = %rejection.body_text(), "request path rejected");
        Self::BadRequest("Invalid request path.".into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
