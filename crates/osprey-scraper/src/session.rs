//! Headless-browser session acquisition.
//!
//! The profile API only answers requests that carry the cookies a real
//! browser picks up on the public landing page (`csrftoken`, `ds_user_id`,
//! and friends). [`SessionAcquirer`] drives headless Chromium to that page,
//! waits for the page to settle, and collects every cookie plus the session
//! token the page stashes in local storage into one [`SessionCredentials`]
//! map. Failures at any step are fatal for the attempt: a partial cookie
//! set cannot authenticate the profile request.

use std::collections::BTreeMap;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;

use crate::error::SessionError;

/// Local-storage key the landing page uses for its session token.
const LOCAL_STORAGE_SESSION_KEY: &str = "Session";

/// Cookie name the session token is merged under.
const SESSION_COOKIE_NAME: &str = "sessionid";

/// Browser-derived cookies and session tokens, keyed by cookie name.
#[derive(Debug, Clone, Default)]
pub struct SessionCredentials {
    cookies: BTreeMap<String, String>,
}

impl SessionCredentials {
    #[must_use]
    pub fn from_cookies(cookies: BTreeMap<String, String>) -> Self {
        Self { cookies }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// The anti-forgery token the profile API expects in `x-csrftoken`.
    #[must_use]
    pub fn csrf_token(&self) -> Option<&str> {
        self.get("csrftoken")
    }

    /// The logged-in user id the profile API expects in `x-ig-user-id`.
    /// Empty for anonymous sessions.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.get("ds_user_id")
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Cookie names in sorted order, for diagnostics. Values are never exposed
    /// in bulk.
    #[must_use]
    pub fn cookie_names(&self) -> Vec<&str> {
        self.cookies.keys().map(String::as_str).collect()
    }
}

/// Acquires a fresh session by driving a headless browser to the landing page.
#[derive(Debug, Clone)]
pub struct SessionAcquirer {
    landing_url: String,
    timeout_secs: u64,
}

impl SessionAcquirer {
    #[must_use]
    pub fn new(landing_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            landing_url: landing_url.into(),
            timeout_secs,
        }
    }

    /// Launch a headless browser, visit the landing page, and collect cookies
    /// plus the local-storage session token.
    ///
    /// The whole acquisition runs under a single bounded timeout so a wedged
    /// browser surfaces as [`SessionError::Timeout`] instead of hanging the
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the browser cannot be launched, navigation
    /// fails, or the timeout elapses.
    pub async fn acquire(&self) -> Result<SessionCredentials, SessionError> {
        let secs = self.timeout_secs;
        match tokio::time::timeout(Duration::from_secs(secs), self.acquire_inner()).await {
            Ok(result) => result,
            Err(_) => Err(SessionError::Timeout { secs }),
        }
    }

    async fn acquire_inner(&self) -> Result<SessionCredentials, SessionError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .build()
            .map_err(SessionError::Launch)?;

        let (mut browser, mut handler) = Browser::launch(config).await?;

        // The handler stream must be polled for the browser connection to make
        // progress; it ends when the browser closes.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = Self::collect_credentials(&browser, &self.landing_url).await;

        browser.close().await.ok();
        let _ = handler_task.await;

        let credentials = result?;
        tracing::info!(
            cookie_count = credentials.cookie_names().len(),
            "session acquired"
        );
        Ok(credentials)
    }

    async fn collect_credentials(
        browser: &Browser,
        landing_url: &str,
    ) -> Result<SessionCredentials, SessionError> {
        let page = browser.new_page(landing_url).await?;
        page.wait_for_navigation().await?;

        let mut cookies = BTreeMap::new();
        for cookie in page.get_cookies().await? {
            cookies.insert(cookie.name, cookie.value);
        }

        // The page keeps its session token in local storage rather than a
        // cookie; merge it under the cookie name the API recognizes. A value
        // that fails to deserialize is treated as absent.
        let session_token: Option<String> = page
            .evaluate(format!(
                "window.localStorage.getItem('{LOCAL_STORAGE_SESSION_KEY}')"
            ))
            .await?
            .into_value()
            .unwrap_or(None);
        if let Some(token) = session_token {
            cookies.insert(SESSION_COOKIE_NAME.to_owned(), token);
        }

        Ok(SessionCredentials::from_cookies(cookies))
    }
}

/// Where the pipeline gets its credentials from.
///
/// `Fixed` carries pre-acquired cookies (tests, or operators exporting a
/// browser session by hand); `Headless` runs the full acquisition per request.
#[derive(Debug, Clone)]
pub enum SessionSource {
    Headless(SessionAcquirer),
    Fixed(SessionCredentials),
}

impl SessionSource {
    /// Produce credentials for one fetch attempt.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if headless acquisition fails. The `Fixed`
    /// variant never fails.
    pub async fn credentials(&self) -> Result<SessionCredentials, SessionError> {
        match self {
            Self::Headless(acquirer) => acquirer.acquire().await,
            Self::Fixed(credentials) => Ok(credentials.clone()),
        }
    }
}
