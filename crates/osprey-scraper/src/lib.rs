//! Profile scraping for osprey.
//!
//! Acquires browser-derived session credentials (headless Chromium), calls
//! the unofficial `web_profile_info` endpoint with the header set a browser
//! session would send, and normalizes the nested edge-list response into the
//! stable [`osprey_core::Profile`] / [`osprey_core::Post`] shape.

pub mod client;
pub mod error;
pub mod normalize;
pub mod session;
pub mod types;

mod retry;

pub use client::ProfileClient;
pub use error::{ScrapeError, SessionError};
pub use normalize::normalize_user;
pub use session::{SessionAcquirer, SessionCredentials, SessionSource};
