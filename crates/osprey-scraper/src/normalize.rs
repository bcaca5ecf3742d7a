//! Normalization from raw `web_profile_info` types to [`osprey_core::Profile`].
//!
//! This is the single place where the endpoint's edge-list nesting and
//! optional fields are flattened into the stable shape the rest of the
//! workspace consumes. Missing scalars become empty string / 0 / false here;
//! nothing downstream needs to re-check them.

use osprey_core::{Post, Profile};

use crate::types::{PostEdge, RawPostNode, RawUser};

/// Normalizes the raw `data.user` object into a [`Profile`] snapshot.
///
/// `posts` is `None` when the timeline edge was absent from the response
/// (private account or partial fetch), `Some(vec![])` for an empty timeline.
#[must_use]
pub fn normalize_user(username: &str, user: RawUser) -> Profile {
    let posts = user
        .edge_owner_to_timeline_media
        .map(|timeline| timeline.edges.into_iter().map(normalize_post).collect());

    Profile {
        username: username.to_owned(),
        full_name: user.full_name,
        biography: user.biography,
        followers_count: user.edge_followed_by.and_then(|e| e.count),
        following_count: user.edge_follow.and_then(|e| e.count),
        is_private: user.is_private,
        is_verified: user.is_verified,
        profile_pic_url: user.profile_pic_url_hd.or(user.profile_pic_url),
        posts,
    }
}

/// Normalizes one timeline edge into a [`Post`].
///
/// Scalars default defensively, the first caption edge is flattened into
/// `caption`, tagged-user edges into a plain username list, and carousel
/// children into reduced child posts.
fn normalize_post(edge: PostEdge) -> Post {
    let node = edge.node;

    let caption = node
        .edge_media_to_caption
        .and_then(|c| c.edges.into_iter().next())
        .and_then(|e| e.node.text)
        .unwrap_or_default();

    let tagged_users = node.edge_media_to_tagged_user.map(|tagged| {
        tagged
            .edges
            .into_iter()
            .filter_map(|e| e.node.user.and_then(|u| u.username))
            .collect()
    });

    let children = node
        .edge_sidecar_to_children
        .map(|sidecar| sidecar.edges.into_iter().map(normalize_child).collect());

    let is_video = node.is_video.unwrap_or(false);
    let video_url = if is_video { node.video_url } else { None };

    Post {
        id: node.id.unwrap_or_default(),
        shortcode: node.shortcode.unwrap_or_default(),
        display_url: node.display_url.unwrap_or_default(),
        is_video,
        video_url,
        caption,
        timestamp: node.taken_at_timestamp.unwrap_or(0),
        like_count: node.edge_liked_by.and_then(|e| e.count).unwrap_or(0),
        comment_count: node.edge_media_to_comment.and_then(|e| e.count).unwrap_or(0),
        location: node.location.and_then(|l| l.name),
        tagged_users,
        media_type: node.typename.unwrap_or_default(),
        children,
    }
}

/// Normalizes a carousel child edge.
///
/// Children carry only the media subset: id, shortcode, display URL, video
/// flag/url, media type. Captions, timestamps, counts and tags belong to the
/// parent and stay at their zero values.
fn normalize_child(edge: PostEdge) -> Post {
    let node: RawPostNode = edge.node;
    let is_video = node.is_video.unwrap_or(false);
    let video_url = if is_video { node.video_url } else { None };

    Post {
        id: node.id.unwrap_or_default(),
        shortcode: node.shortcode.unwrap_or_default(),
        display_url: node.display_url.unwrap_or_default(),
        is_video,
        video_url,
        media_type: node.typename.unwrap_or_default(),
        ..Post::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_user(value: serde_json::Value) -> RawUser {
        serde_json::from_value(value).expect("test fixture should deserialize")
    }

    fn post_edge(value: serde_json::Value) -> PostEdge {
        serde_json::from_value(value).expect("test fixture should deserialize")
    }

    // -----------------------------------------------------------------------
    // normalize_user
    // -----------------------------------------------------------------------

    #[test]
    fn normalize_user_maps_profile_fields() {
        let user = raw_user(json!({
            "id": "123",
            "full_name": "Alice Example",
            "biography": "Exploring the world",
            "is_private": false,
            "is_verified": true,
            "profile_pic_url": "https://cdn.example/low.jpg",
            "profile_pic_url_hd": "https://cdn.example/hd.jpg",
            "edge_followed_by": {"count": 1500},
            "edge_follow": {"count": 300}
        }));

        let profile = normalize_user("alice", user);
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.full_name.as_deref(), Some("Alice Example"));
        assert_eq!(profile.followers_count, Some(1500));
        assert_eq!(profile.following_count, Some(300));
        assert_eq!(profile.is_verified, Some(true));
        assert_eq!(
            profile.profile_pic_url.as_deref(),
            Some("https://cdn.example/hd.jpg"),
            "HD avatar should win over the low-res one"
        );
    }

    #[test]
    fn normalize_user_falls_back_to_low_res_avatar() {
        let user = raw_user(json!({
            "id": "123",
            "profile_pic_url": "https://cdn.example/low.jpg"
        }));
        let profile = normalize_user("alice", user);
        assert_eq!(
            profile.profile_pic_url.as_deref(),
            Some("https://cdn.example/low.jpg")
        );
    }

    #[test]
    fn normalize_user_without_timeline_has_no_posts() {
        let profile = normalize_user("alice", raw_user(json!({"id": "123"})));
        assert!(profile.posts.is_none(), "absent timeline edge must map to None");
    }

    #[test]
    fn normalize_user_with_empty_timeline_has_empty_posts() {
        let user = raw_user(json!({
            "id": "123",
            "edge_owner_to_timeline_media": {"edges": []}
        }));
        let profile = normalize_user("alice", user);
        assert_eq!(profile.posts.as_deref(), Some(&[][..]));
    }

    // -----------------------------------------------------------------------
    // normalize_post
    // -----------------------------------------------------------------------

    #[test]
    fn normalize_post_extracts_scalar_fields() {
        let edge = post_edge(json!({
            "node": {
                "id": "p1",
                "shortcode": "AbCd",
                "display_url": "https://cdn.example/p1.jpg",
                "is_video": false,
                "taken_at_timestamp": 1_700_000_000,
                "edge_liked_by": {"count": 42},
                "edge_media_to_comment": {"count": 7},
                "__typename": "GraphImage"
            }
        }));

        let post = normalize_post(edge);
        assert_eq!(post.id, "p1");
        assert_eq!(post.shortcode, "AbCd");
        assert_eq!(post.timestamp, 1_700_000_000);
        assert_eq!(post.like_count, 42);
        assert_eq!(post.comment_count, 7);
        assert_eq!(post.media_type, "GraphImage");
        assert!(post.video_url.is_none());
    }

    #[test]
    fn normalize_post_defaults_missing_fields() {
        let post = normalize_post(post_edge(json!({"node": {}})));
        assert_eq!(post.id, "");
        assert_eq!(post.shortcode, "");
        assert_eq!(post.display_url, "");
        assert!(!post.is_video);
        assert_eq!(post.caption, "");
        assert_eq!(post.timestamp, 0);
        assert_eq!(post.like_count, 0);
        assert_eq!(post.comment_count, 0);
        assert!(post.location.is_none());
        assert!(post.tagged_users.is_none());
        assert!(post.children.is_none());
    }

    #[test]
    fn normalize_post_flattens_first_caption_edge() {
        let edge = post_edge(json!({
            "node": {
                "id": "p1",
                "edge_media_to_caption": {
                    "edges": [
                        {"node": {"text": "first caption"}},
                        {"node": {"text": "second caption"}}
                    ]
                }
            }
        }));
        assert_eq!(normalize_post(edge).caption, "first caption");
    }

    #[test]
    fn normalize_post_flattens_tagged_users() {
        let edge = post_edge(json!({
            "node": {
                "id": "p1",
                "edge_media_to_tagged_user": {
                    "edges": [
                        {"node": {"user": {"username": "bob"}}},
                        {"node": {"user": {"username": "carol"}}},
                        {"node": {}}
                    ]
                }
            }
        }));
        let post = normalize_post(edge);
        assert_eq!(
            post.tagged_users,
            Some(vec!["bob".to_owned(), "carol".to_owned()]),
            "edges without a user node are skipped"
        );
    }

    #[test]
    fn normalize_post_keeps_video_url_only_for_videos() {
        let video = normalize_post(post_edge(json!({
            "node": {"id": "v", "is_video": true, "video_url": "https://cdn.example/v.mp4"}
        })));
        assert_eq!(video.video_url.as_deref(), Some("https://cdn.example/v.mp4"));

        let image = normalize_post(post_edge(json!({
            "node": {"id": "i", "is_video": false, "video_url": "https://cdn.example/stale.mp4"}
        })));
        assert!(
            image.video_url.is_none(),
            "non-video posts must not carry a video URL"
        );
    }

    #[test]
    fn normalize_post_extracts_location_name() {
        let edge = post_edge(json!({
            "node": {"id": "p1", "location": {"name": "Reykjavik"}}
        }));
        assert_eq!(normalize_post(edge).location.as_deref(), Some("Reykjavik"));
    }

    // -----------------------------------------------------------------------
    // carousel children
    // -----------------------------------------------------------------------

    #[test]
    fn carousel_children_count_matches_edges() {
        let edge = post_edge(json!({
            "node": {
                "id": "parent",
                "edge_sidecar_to_children": {
                    "edges": [
                        {"node": {"id": "c1", "shortcode": "S1", "display_url": "u1",
                                  "is_video": false, "__typename": "GraphImage"}},
                        {"node": {"id": "c2", "shortcode": "S2", "display_url": "u2",
                                  "is_video": true, "video_url": "v2", "__typename": "GraphVideo"}},
                        {"node": {"id": "c3", "shortcode": "S3", "display_url": "u3",
                                  "is_video": false, "__typename": "GraphImage"}}
                    ]
                }
            }
        }));

        let post = normalize_post(edge);
        let children = post.children.expect("children should be present");
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].id, "c1");
        assert_eq!(children[1].video_url.as_deref(), Some("v2"));
        assert_eq!(children[2].media_type, "GraphImage");
    }

    #[test]
    fn carousel_children_carry_only_the_media_subset() {
        let edge = post_edge(json!({
            "node": {
                "id": "parent",
                "taken_at_timestamp": 1_700_000_000,
                "edge_sidecar_to_children": {
                    "edges": [
                        // Even if the API were to include caption/count data on a
                        // child, the normalized child ignores it.
                        {"node": {"id": "c1", "shortcode": "S1", "display_url": "u1",
                                  "is_video": false, "__typename": "GraphImage",
                                  "taken_at_timestamp": 1_700_000_999,
                                  "edge_liked_by": {"count": 5},
                                  "edge_media_to_caption": {"edges": [{"node": {"text": "hi"}}]}}}
                    ]
                }
            }
        }));

        let post = normalize_post(edge);
        let child = &post.children.expect("children should be present")[0];
        assert_eq!(child.id, "c1");
        assert_eq!(child.shortcode, "S1");
        assert_eq!(child.display_url, "u1");
        assert_eq!(child.media_type, "GraphImage");
        assert_eq!(child.caption, "", "children do not carry captions");
        assert_eq!(child.timestamp, 0, "children do not carry timestamps");
        assert_eq!(child.like_count, 0, "children do not carry counts");
        assert!(child.children.is_none(), "children do not nest further");
    }
}
