use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The exchange rejected the request. `code` and `msg` are the exchange's own.
    #[error("exchange rejected the request: {msg} (code {code})")]
    Api { code: i64, msg: String },
    #[error("unexpected response from exchange (HTTP {status}): {body}")]
    UnexpectedResponse { status: u16, body: String },
    #[error("failed to decode exchange response: {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },
    #[error("failed to encode order request")]
    Encode(#[source] serde_json::Error),
    #[error("invalid API credentials: {0}")]
    InvalidCredentials(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Error payload returned by the exchange alongside a non-200 status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorResponse {
    pub code: i64,
    pub msg: String,
}

/// Turns a non-200 response body into a [`ClientError`].
pub fn error_from_response(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(ApiErrorResponse { code, msg }) => ClientError::Api { code, msg },
        Err(_) => ClientError::UnexpectedResponse {
            status,
            body: body.to_owned(),
        },
    }
}
