//! Session store error types.

use thiserror::Error;

/// Failure while talking to the credential endpoint.
///
/// `login` never returns this as an `Err`; it is carried inside
/// `LoginResult::Failure` so callers can branch on it as a value.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// HTTP request error (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-2xx status
    #[error("Credential endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Base URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Any other transport failure reported by a custom client
    #[error("Transport error: {0}")]
    Transport(String),
}

impl CredentialError {
    /// Returns true if the failure looks transient (connect/timeout/5xx).
    ///
    /// Informational only; the store never retries on its own.
    pub fn is_transient(&self) -> bool {
        match self {
            CredentialError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    return true;
                }
                if let Some(status) = e.status() {
                    return status.is_server_error();
                }
                false
            }
            CredentialError::Status { status, .. } => (500..600).contains(status),
            _ => false,
        }
    }

    /// HTTP status code, if the endpoint answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            CredentialError::Status { status, .. } => Some(*status),
            CredentialError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Failure while decoding a token into claims.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Token has no second (payload) segment
    #[error("Token has no payload segment")]
    MissingPayload,

    /// Payload segment is not base64url
    #[error("Token payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Payload is not a JSON object with `sub` and `exp`
    #[error("Token payload is not valid claims JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Session store error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Token passed to `set_session` could not be decoded
    #[error("Invalid session token: {0}")]
    Decode(#[from] DecodeError),

    /// Input rejected by the session FSM. Not produced by the current
    /// machine, which accepts every input in both phases.
    #[error("Invalid session state transition: {0}")]
    InvalidStateTransition(String),
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;
