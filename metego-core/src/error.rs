use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Every failure the core library can report.
///
/// Nothing here is retried: callers log the error and stop.
#[derive(Debug, Error)]
pub enum MetegoError {
    #[error("failed to read credentials file {}", .path.display())]
    CredentialsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed line {line} in credentials file {}: expected `<name> <token>`", .path.display())]
    CredentialsParse { path: PathBuf, line: usize },

    #[error("credential `{name}` is missing or empty")]
    MissingCredential { name: String },

    #[error("{provider} token must not be empty")]
    EmptyToken { provider: &'static str },

    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("city must not be empty")]
    EmptyCity,

    #[error("days value {days} is outside the supported range {min}..={max}")]
    InvalidDays { days: u32, min: u32, max: u32 },

    #[error("invalid notification message: {reason}")]
    InvalidMessage { reason: String },

    #[error("recipient key must be 30 alphanumeric characters")]
    InvalidRecipient,

    #[error("failed to send request to {provider}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} request failed with status {status}: {body}")]
    Status {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("failed to parse {provider} response")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("forecast covers only {available} of the {requested} requested day(s)")]
    InsufficientData { requested: u32, available: usize },

    #[error("pushover rejected the message{}: {}", status_suffix(.status), .errors.join("; "))]
    Delivery {
        status: Option<StatusCode>,
        errors: Vec<String>,
    },
}

fn status_suffix(status: &Option<StatusCode>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, MetegoError>;
