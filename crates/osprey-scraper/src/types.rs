//! Raw response types for the `web_profile_info` endpoint.
//!
//! ## Observed shape
//!
//! The endpoint wraps everything in `data.user`; the absence of that object
//! on a 200 is how the API signals "no such profile" to anonymous sessions,
//! so both levels are modeled as `Option` and checked by the client.
//!
//! Counts live behind edge objects (`edge_followed_by.count`), the timeline
//! behind `edge_owner_to_timeline_media.edges[].node`, captions behind
//! `edge_media_to_caption.edges[0].node.text`, and carousel children behind
//! `edge_sidecar_to_children.edges[].node`, whose child nodes carry only the
//! media subset (id, shortcode, display_url, is_video, video_url,
//! `__typename`).
//!
//! Every field is `#[serde(default)]`: the endpoint omits fields freely
//! between account types and app versions, and a missing scalar must never
//! fail the fetch. Defaulting happens here once; `normalize` converts to the
//! stable [`osprey_core::Profile`] shape.

use serde::Deserialize;

/// Top-level response from `GET /api/v1/users/web_profile_info/`.
#[derive(Debug, Default, Deserialize)]
pub struct WebProfileResponse {
    #[serde(default)]
    pub data: Option<ProfileData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileData {
    #[serde(default)]
    pub user: Option<RawUser>,
}

/// The `data.user` object. `id` is the only field whose absence the client
/// treats as an error.
#[derive(Debug, Default, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub is_private: Option<bool>,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    /// Higher-resolution avatar; preferred over `profile_pic_url` when present.
    #[serde(default)]
    pub profile_pic_url_hd: Option<String>,
    #[serde(default)]
    pub edge_followed_by: Option<EdgeCount>,
    #[serde(default)]
    pub edge_follow: Option<EdgeCount>,
    #[serde(default)]
    pub edge_owner_to_timeline_media: Option<TimelineEdges>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EdgeCount {
    #[serde(default)]
    pub count: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimelineEdges {
    #[serde(default)]
    pub edges: Vec<PostEdge>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostEdge {
    #[serde(default)]
    pub node: RawPostNode,
}

/// One timeline (or carousel-child) node. Parent posts populate the full
/// set; child nodes only the media subset.
#[derive(Debug, Default, Deserialize)]
pub struct RawPostNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub shortcode: Option<String>,
    #[serde(default)]
    pub display_url: Option<String>,
    #[serde(default)]
    pub is_video: Option<bool>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub taken_at_timestamp: Option<i64>,
    #[serde(default)]
    pub edge_media_to_caption: Option<CaptionEdges>,
    #[serde(default)]
    pub edge_liked_by: Option<EdgeCount>,
    #[serde(default)]
    pub edge_media_to_comment: Option<EdgeCount>,
    #[serde(default)]
    pub location: Option<RawLocation>,
    #[serde(default)]
    pub edge_media_to_tagged_user: Option<TaggedUserEdges>,
    /// GraphQL discriminator: `GraphImage`, `GraphVideo`, `GraphSidecar`.
    #[serde(rename = "__typename", default)]
    pub typename: Option<String>,
    #[serde(default)]
    pub edge_sidecar_to_children: Option<SidecarEdges>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CaptionEdges {
    #[serde(default)]
    pub edges: Vec<CaptionEdge>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CaptionEdge {
    #[serde(default)]
    pub node: CaptionNode,
}

#[derive(Debug, Default, Deserialize)]
pub struct CaptionNode {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaggedUserEdges {
    #[serde(default)]
    pub edges: Vec<TaggedUserEdge>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaggedUserEdge {
    #[serde(default)]
    pub node: TaggedUserNode,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaggedUserNode {
    #[serde(default)]
    pub user: Option<TaggedUser>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaggedUser {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SidecarEdges {
    #[serde(default)]
    pub edges: Vec<PostEdge>,
}
