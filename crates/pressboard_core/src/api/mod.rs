//! HTTP transport to the press API.
//!
//! # Responsibility
//! - Own the blocking `reqwest` client, base URL and bearer token.
//! - Map non-2xx responses to `ApiError::Status` with a readable message.
//!
//! # Invariants
//! - A request is either fully accepted (2xx, decoded body) or an error;
//!   callers never see partially applied responses.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod client;

pub use client::{error_message_from_body, ApiClient};

pub type ApiResult<T> = Result<T, ApiError>;

/// Transport-level failure.
#[derive(Debug)]
pub enum ApiError {
    /// Connection, timeout or client build failure.
    Http(reqwest::Error),
    /// Non-2xx response.
    Status { status: u16, message: String },
    /// 2xx response whose body did not match the expected shape.
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "request failed: {err}"),
            Self::Status { status, message } => write!(f, "HTTP {status}: {message}"),
            Self::Decode(message) => write!(f, "unexpected response body: {message}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}
