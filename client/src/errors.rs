use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use url::Url;
use waxlog_core::state::{FavouriteFailure, favourite::UNAUTHORIZED_MESSAGE};
use waxlog_types::FieldErrors;

/// Shown when the backend fails without saying why.
pub const GENERIC_ERROR: &str = "An unexpected error occurred. Please try again later.";

/// Errors that can occur when talking to the backend.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend answered 401; the session has been cleared.
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,
    /// The backend rejected some fields of the request.
    #[error("{0}")]
    Validation(FieldErrors),
    #[error("{message}")]
    Server { status: StatusCode, message: String },
    /// An authenticated call was attempted without a session; nothing was sent.
    #[error("You are not logged in. Please log in first.")]
    NotLoggedIn,
    #[error("Could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("{0} cannot be used as the API base URL")]
    BadBase(Url),
    #[error("Could not access the session token: {0}")]
    TokenStore(#[from] std::io::Error),
    /// The form was rejected before anything was sent.
    #[error("{0}")]
    Invalid(FieldErrors),
}

impl ApiError {
    /// Per-field messages, from either side of the wire.
    #[must_use]
    #[inline]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) | Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    #[must_use]
    #[inline]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::Server { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// The backend refused because the session doesn't own the record.
    #[must_use]
    #[inline]
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(StatusCode::FORBIDDEN)
    }

    /// Whether the user has to log in (again) before retrying.
    #[must_use]
    #[inline]
    pub const fn needs_login(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::NotLoggedIn)
    }
}

impl From<ApiError> for FavouriteFailure {
    #[inline]
    fn from(e: ApiError) -> Self {
        if e.needs_login() {
            Self::Unauthorized
        } else {
            Self::Failed(e.to_string())
        }
    }
}

/// Body of a failed response. Both keys are optional, and may both be missing.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<FieldErrors>,
}

impl ErrorBody {
    pub(crate) fn into_error(self, status: StatusCode) -> ApiError {
        match self.errors {
            Some(errors) if !errors.is_empty() => ApiError::Validation(errors),
            _ => ApiError::Server {
                status,
                message: self
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_ERROR.to_string()),
            },
        }
    }
}
