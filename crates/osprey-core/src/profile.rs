//! Normalized profile and post types shared across the workspace.
//!
//! These are the stable shapes produced by `osprey-scraper`'s normalization
//! pass and consumed by the analysis pipeline, the cache store, and the HTTP
//! surface. Both types are plain data: constructed once per fetch and never
//! mutated; a re-fetch produces a new snapshot.

use serde::{Deserialize, Serialize};

/// A snapshot of a public profile at fetch time.
///
/// `username` is the immutable identifier; everything else is whatever the
/// profile API reported when the snapshot was taken. `posts` is `None` when
/// the timeline edge was absent from the response (partial fetch), as opposed
/// to `Some(vec![])` for a profile with no posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    pub followers_count: Option<i64>,
    pub following_count: Option<i64>,
    pub is_private: Option<bool>,
    pub is_verified: Option<bool>,
    pub profile_pic_url: Option<String>,
    pub posts: Option<Vec<Post>>,
}

impl Profile {
    /// Biography text, or the empty string when absent.
    #[must_use]
    pub fn biography_text(&self) -> &str {
        self.biography.as_deref().unwrap_or("")
    }
}

/// One content item from a profile's timeline.
///
/// Carousel posts carry their child media in `children`; children are reduced
/// posts holding only id/shortcode/display_url/is_video/video_url/media_type,
/// with the remaining fields left at their zero values; captions, timestamps
/// and counts belong to the parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub shortcode: String,
    pub display_url: String,
    pub is_video: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub caption: String,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    pub like_count: i64,
    pub comment_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagged_users: Option<Vec<String>>,
    pub media_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Post>>,
}
