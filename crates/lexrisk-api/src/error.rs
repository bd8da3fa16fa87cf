use thiserror::Error;

use crate::config::LOGIN_PATH;

const SERVER_FALLBACK: &str = "Server error occurred during analysis";
const NETWORK_MESSAGE: &str = "No response from server. Please check your connection.";
const SETUP_FALLBACK: &str = "Error initiating analysis";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },
    #[error("unauthorized; redirect to {redirect}")]
    Unauthorized { redirect: String },
    #[error("no response from server: {0}")]
    Network(String),
    #[error("request setup failed: {0}")]
    RequestSetup(String),
    #[error("unreadable response body: {0}")]
    InvalidResponse(String),
}

/// The three failure classes the UI distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// A response arrived but was not usable.
    Server,
    /// No response: timeout or connectivity.
    Network,
    /// The request could not be built or sent.
    RequestSetup,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized {
            redirect: LOGIN_PATH.to_string(),
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Server { .. } | ApiError::Unauthorized { .. } | ApiError::InvalidResponse(_) => {
                ApiErrorKind::Server
            }
            ApiError::Network(_) => ApiErrorKind::Network,
            ApiError::RequestSetup(_) => ApiErrorKind::RequestSetup,
        }
    }

    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            ApiError::Server { .. } | ApiError::InvalidResponse(_) => SERVER_FALLBACK.to_string(),
            ApiError::Unauthorized { .. } => "Unauthorized".to_string(),
            ApiError::Network(_) => NETWORK_MESSAGE.to_string(),
            ApiError::RequestSetup(m) if !m.trim().is_empty() => m.clone(),
            ApiError::RequestSetup(_) => SETUP_FALLBACK.to_string(),
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ApiError::RequestSetup(e.to_string())
        } else if e.is_decode() {
            ApiError::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Server {
                status: status.as_u16(),
                message: None,
            }
        } else {
            // Timeouts, refused connections, resets: nothing came back.
            ApiError::Network(e.to_string())
        }
    }
}
