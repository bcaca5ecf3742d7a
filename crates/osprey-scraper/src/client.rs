//! HTTP client for the unofficial `web_profile_info` endpoint.
//!
//! Wraps `reqwest` with the header set the endpoint expects from a browser
//! session, a typed error taxonomy keyed off HTTP status, and a retry policy
//! for transient failures. The raw response is normalized into
//! [`osprey_core::Profile`] before returning.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::{Client, Url};

use crate::error::ScrapeError;
use crate::normalize::normalize_user;
use crate::retry::retry_with_backoff;
use crate::session::SessionCredentials;
use crate::types::{RawUser, WebProfileResponse};
use osprey_core::Profile;

const PROFILE_INFO_PATH: &str = "api/v1/users/web_profile_info/";

/// The web app id the endpoint requires in `x-ig-app-id`. Fixed for the
/// public web client.
const WEB_APP_ID: &str = "936619743392459";

/// Client for the profile-info endpoint.
///
/// Use [`ProfileClient::new`] with the production base URL, or point
/// `base_url` at a mock server in tests.
pub struct ProfileClient {
    client: Client,
    base_url: Url,
    user_agent: String,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    backoff_base_ms: u64,
}

impl ProfileClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScrapeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join keeps the full path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ScrapeError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            user_agent: user_agent.to_owned(),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Fetches and normalizes the profile for `username`.
    ///
    /// Issues one GET to the profile-info endpoint with session-derived
    /// headers; 429/5xx/transport failures are retried with back-off, the
    /// rest map directly to the error taxonomy.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::NotFound`] — HTTP 404 (not retried).
    /// - [`ScrapeError::Unauthorized`] — HTTP 401/403, stale session (not retried).
    /// - [`ScrapeError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ScrapeError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`ScrapeError::MalformedResponse`] — 200 without the expected user object.
    /// - [`ScrapeError::Http`] / [`ScrapeError::Deserialize`] — transport or
    ///   body-shape failures.
    pub async fn fetch_profile(
        &self,
        username: &str,
        credentials: &SessionCredentials,
    ) -> Result<Profile, ScrapeError> {
        let url = self.profile_info_url(username)?;
        let headers = prepare_headers(username, credentials, &self.user_agent)?;

        let user = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let headers = headers.clone();
            async move { self.request_user(url, headers, username).await }
        })
        .await?;

        tracing::info!(username, "profile fetched");
        Ok(normalize_user(username, user))
    }

    /// Builds the full request URL with a percent-encoded username parameter.
    fn profile_info_url(&self, username: &str) -> Result<Url, ScrapeError> {
        let mut url =
            self.base_url
                .join(PROFILE_INFO_PATH)
                .map_err(|e| ScrapeError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        url.query_pairs_mut().append_pair("username", username);
        Ok(url)
    }

    /// Sends the GET, classifies the status, and extracts the raw user object.
    async fn request_user(
        &self,
        url: Url,
        headers: HeaderMap,
        username: &str,
    ) -> Result<RawUser, ScrapeError> {
        let response = self.client.get(url.clone()).headers(headers).send().await?;

        let status = response.status();
        match status.as_u16() {
            404 => {
                return Err(ScrapeError::NotFound {
                    username: username.to_owned(),
                })
            }
            s @ (401 | 403) => return Err(ScrapeError::Unauthorized { status: s }),
            429 => return Err(ScrapeError::RateLimited),
            s if !status.is_success() => {
                return Err(ScrapeError::UnexpectedStatus {
                    status: s,
                    url: url.to_string(),
                })
            }
            _ => {}
        }

        let body = response.text().await?;
        let parsed: WebProfileResponse =
            serde_json::from_str(&body).map_err(|e| ScrapeError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        let user = parsed
            .data
            .and_then(|d| d.user)
            .ok_or_else(|| ScrapeError::MalformedResponse {
                reason: "user object not found in response".to_owned(),
            })?;

        if user.id.as_deref().unwrap_or("").is_empty() {
            return Err(ScrapeError::MalformedResponse {
                reason: "user id not found in response".to_owned(),
            });
        }

        Ok(user)
    }
}

/// Builds the header set the endpoint expects from a browser session:
/// browser identity hints, a referer embedding the username, and the
/// session-derived anti-forgery and user-id tokens.
pub(crate) fn prepare_headers(
    username: &str,
    credentials: &SessionCredentials,
    user_agent: &str,
) -> Result<HeaderMap, ScrapeError> {
    let mut headers = HeaderMap::new();

    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        REFERER,
        HeaderValue::from_str(&format!("https://www.instagram.com/{username}/"))
            .map_err(|_| ScrapeError::InvalidHeader { name: "referer" })?,
    );
    headers.insert(
        "sec-ch-prefers-color-scheme",
        HeaderValue::from_static("dark"),
    );
    headers.insert(
        "sec-ch-ua",
        HeaderValue::from_static(
            "\"Chromium\";v=\"134\", \"Not:A-Brand\";v=\"24\", \"Google Chrome\";v=\"134\"",
        ),
    );
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"macOS\""));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-origin"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent)
            .map_err(|_| ScrapeError::InvalidHeader { name: "user-agent" })?,
    );
    headers.insert("x-ig-app-id", HeaderValue::from_static(WEB_APP_ID));
    headers.insert(
        "x-requested-with",
        HeaderValue::from_static("XMLHttpRequest"),
    );

    if let Some(token) = credentials.csrf_token() {
        headers.insert(
            "x-csrftoken",
            HeaderValue::from_str(token)
                .map_err(|_| ScrapeError::InvalidHeader { name: "x-csrftoken" })?,
        );
    }
    if let Some(user_id) = credentials.user_id() {
        headers.insert(
            "x-ig-user-id",
            HeaderValue::from_str(user_id)
                .map_err(|_| ScrapeError::InvalidHeader { name: "x-ig-user-id" })?,
        );
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn test_credentials() -> SessionCredentials {
        let mut cookies = BTreeMap::new();
        cookies.insert("csrftoken".to_owned(), "token-1".to_owned());
        cookies.insert("ds_user_id".to_owned(), "9001".to_owned());
        SessionCredentials::from_cookies(cookies)
    }

    fn test_client(base_url: &str) -> ProfileClient {
        ProfileClient::new(base_url, 30, "test-agent", 0, 0)
            .expect("client construction should not fail")
    }

    #[test]
    fn profile_info_url_embeds_username() {
        let client = test_client("https://www.instagram.com");
        let url = client.profile_info_url("alice").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.instagram.com/api/v1/users/web_profile_info/?username=alice"
        );
    }

    #[test]
    fn profile_info_url_strips_trailing_slash() {
        let client = test_client("https://www.instagram.com/");
        let url = client.profile_info_url("alice").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.instagram.com/api/v1/users/web_profile_info/?username=alice"
        );
    }

    #[test]
    fn profile_info_url_encodes_special_characters() {
        let client = test_client("https://www.instagram.com");
        let url = client.profile_info_url("a b&c").unwrap();
        assert!(
            url.as_str().contains("username=a+b%26c")
                || url.as_str().contains("username=a%20b%26c"),
            "username should be percent-encoded: {url}"
        );
    }

    #[test]
    fn prepare_headers_carries_session_tokens() {
        let headers = prepare_headers("alice", &test_credentials(), "test-agent").unwrap();
        assert_eq!(headers.get("x-csrftoken").unwrap(), "token-1");
        assert_eq!(headers.get("x-ig-user-id").unwrap(), "9001");
        assert_eq!(headers.get("x-ig-app-id").unwrap(), WEB_APP_ID);
        assert_eq!(
            headers.get(REFERER).unwrap(),
            "https://www.instagram.com/alice/"
        );
    }

    #[test]
    fn prepare_headers_omits_tokens_for_anonymous_sessions() {
        let headers =
            prepare_headers("alice", &SessionCredentials::default(), "test-agent").unwrap();
        assert!(headers.get("x-csrftoken").is_none());
        assert!(headers.get("x-ig-user-id").is_none());
        assert!(headers.get(USER_AGENT).is_some());
    }

    #[test]
    fn new_rejects_garbage_base_url() {
        let result = ProfileClient::new("not a url", 30, "ua", 0, 0);
        assert!(matches!(result, Err(ScrapeError::InvalidBaseUrl { .. })));
    }
}
