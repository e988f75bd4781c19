use serde::Deserialize;
use store::RemoteError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{message}")]
    Config { message: String },
    /// The service answered with an error; `message` is its own wording.
    #[error("{message}")]
    Service { status: u16, message: String },
}

impl Error {
    /// The service answered and refused the request (4xx). Transport failures
    /// and server errors are not rejections.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::Service { status, .. } if (400..500).contains(status))
    }
}

impl From<Error> for RemoteError {
    fn from(e: Error) -> Self {
        RemoteError::new(e.to_string())
    }
}

/// Error body shapes used by the auth and REST endpoints.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Pull the human-readable message out of an error response body.
pub(crate) fn service_message(status: reqwest::StatusCode, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .msg
        .or(parsed.error_description)
        .or(parsed.message)
        .or(parsed.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
        })
}
