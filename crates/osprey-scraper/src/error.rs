use thiserror::Error;

/// Errors from the profile API client and normalization pass.
///
/// `NotFound`, `Unauthorized` and `RateLimited` mirror the status codes the
/// profile endpoint uses for those conditions; `MalformedResponse` covers a
/// 200 whose body is valid JSON but is missing the expected user object.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("profile not found: {username}")]
    NotFound { username: String },

    #[error("unauthorized or forbidden (HTTP {status}), stale or invalid session")]
    Unauthorized { status: u16 },

    #[error("rate limited by profile API")]
    RateLimited,

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("malformed profile response: {reason}")]
    MalformedResponse { reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("session credential {name} is not a valid header value")]
    InvalidHeader { name: &'static str },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Errors from headless-browser session acquisition.
///
/// All variants are fatal for the current fetch attempt: a partially
/// acquired session is not usable.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("browser protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("session acquisition timed out after {secs}s")]
    Timeout { secs: u64 },
}
