//! Parsing and validation of LLM output into [`AnalysisResult`].
//!
//! This is the pipeline's terminal safety net: whatever text the model (or a
//! failed call) produced, the caller gets back a structurally valid report.
//! [`parse_analysis`] never returns an error and never panics.

use chrono::{DateTime, SecondsFormat, Utc};

use osprey_core::Profile;

use crate::types::{
    AnalysisMetadata, AnalysisResult, GraphNode, ProfileContext, SentimentAssessment,
    ANALYSIS_VERSION_ERROR,
};

/// Legacy in-band error sentinel. The typed [`crate::llm::LlmError`] replaced
/// it at the client boundary, but text that still carries the prefix (cached
/// reports from older runs, hand-fed fixtures) is recognized and folded into
/// the error fallback rather than parsed as JSON.
pub const LLM_ERROR_PREFIX: &str = "LLM_ERROR:";

/// Parses raw model output into an [`AnalysisResult`].
///
/// Strict JSON parsing against the typed schema; defaulted arrays make a
/// response that omits a section still deserialize with that section present
/// and empty. On any failure (non-JSON text, truncated JSON, the legacy
/// `LLM_ERROR:` sentinel) the error fallback is returned instead. This
/// function is total: it never returns an error.
#[must_use]
pub fn parse_analysis(
    raw: &str,
    profile: &Profile,
    model: &str,
    now: DateTime<Utc>,
) -> AnalysisResult {
    let trimmed = raw.trim();

    if trimmed.starts_with(LLM_ERROR_PREFIX) {
        tracing::warn!(username = %profile.username, "LLM output carries error sentinel");
        return error_analysis(profile, model, now, trimmed);
    }

    match serde_json::from_str::<AnalysisResult>(trimmed) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(
                username = %profile.username,
                error = %e,
                "analysis response is not valid JSON, returning error fallback"
            );
            error_analysis(profile, model, now, &format!("invalid JSON response: {e}"))
        }
    }
}

/// Builds the error-shaped fallback report.
///
/// Marks `analysis_version = "error"`, carries `message` in the narrative
/// fields, keeps every required array present and empty, and seeds the
/// network graph with the profile-owner node so graph renderers still have a
/// root.
#[must_use]
pub fn error_analysis(
    profile: &Profile,
    model: &str,
    now: DateTime<Utc>,
    message: &str,
) -> AnalysisResult {
    let mut result = AnalysisResult {
        analysis_metadata: AnalysisMetadata {
            timestamp_utc: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            model_used: model.to_owned(),
            analysis_version: ANALYSIS_VERSION_ERROR.to_owned(),
        },
        profile_context: ProfileContext {
            username: profile.username.clone(),
            biography_text: profile.biography_text().to_owned(),
            fullname: profile.full_name.clone(),
            follower_count: profile.followers_count,
            following_count: profile.following_count,
            is_verified: profile.is_verified,
        },
        ..AnalysisResult::default()
    };

    result.initial_profile_analysis.profile_overview =
        format!("Error analyzing profile: {message}");
    result.initial_profile_analysis.sentiment_analysis = SentimentAssessment {
        label: "Error".to_owned(),
        score: 0.0,
    };
    result.account_authenticity.assessment = "Error during analysis".to_owned();
    result
        .network_graph_data
        .nodes
        .push(GraphNode::profile_owner(&profile.username));

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ANALYSIS_VERSION;

    fn test_profile() -> Profile {
        Profile {
            username: "alice".to_owned(),
            full_name: Some("Alice Example".to_owned()),
            biography: Some("bio text".to_owned()),
            followers_count: Some(10),
            following_count: Some(20),
            is_private: Some(false),
            is_verified: Some(false),
            profile_pic_url: None,
            posts: None,
        }
    }

    fn parse(raw: &str) -> AnalysisResult {
        parse_analysis(raw, &test_profile(), "gemini-2.0-flash", Utc::now())
    }

    /// Every required array field must be an actual array after any parse,
    /// successful or fallback.
    fn assert_required_arrays_present(result: &AnalysisResult) {
        let json = serde_json::to_value(result).expect("result serializes");
        for path in [
            &["initial_profile_analysis", "key_information"][..],
            &["forensic_analysis", "pii_indicators"],
            &["forensic_analysis", "mentioned_locations"],
            &["forensic_analysis", "external_connections", "usernames"],
            &["forensic_analysis", "external_connections", "urls"],
            &["forensic_analysis", "keywords_of_interest"],
            &["account_authenticity", "recommendations"],
            &["entity_extraction", "mentions"],
            &["entity_extraction", "hashtags"],
            &["entity_extraction", "urls"],
            &["entity_extraction", "emails"],
            &["entity_extraction", "phone_numbers"],
            &["entity_extraction", "locations"],
            &["entity_extraction", "organizations"],
            &["entity_extraction", "persons"],
            &["entity_extraction", "technologies_tools"],
            &["entity_extraction", "projects_products"],
            &["inferred_analysis", "potential_interests"],
            &["inferred_analysis", "potential_affiliations"],
            &["inferred_analysis", "potential_skills"],
            &["inferred_analysis", "potential_locations"],
            &["network_graph_data", "nodes"],
            &["network_graph_data", "edges"],
            &["visualization_data", "posting_heatmap"],
            &["visualization_data", "sentiment_timeline"],
            &["visualization_data", "topic_distribution"],
        ] {
            let mut node = &json;
            for key in path {
                node = node
                    .get(key)
                    .unwrap_or_else(|| panic!("{} missing", path.join(".")));
            }
            assert!(node.is_array(), "{} is not an array", path.join("."));
        }
    }

    #[test]
    fn valid_json_parses_through() {
        let raw = serde_json::json!({
            "analysis_metadata": {
                "timestamp_utc": "2026-01-01T00:00:00.000Z",
                "model_used": "gemini-2.0-flash",
                "analysis_version": "1.0"
            },
            "initial_profile_analysis": {
                "profile_overview": "A travel account.",
                "sentiment_analysis": {"label": "Positive", "score": 0.8}
            },
            "entity_extraction": {"hashtags": ["#travel"]}
        })
        .to_string();

        let result = parse(&raw);
        assert_eq!(result.analysis_metadata.analysis_version, ANALYSIS_VERSION);
        assert_eq!(
            result.initial_profile_analysis.profile_overview,
            "A travel account."
        );
        assert_eq!(result.entity_extraction.hashtags, vec!["#travel"]);
        assert_required_arrays_present(&result);
    }

    #[test]
    fn empty_input_returns_error_fallback() {
        let result = parse("");
        assert_eq!(
            result.analysis_metadata.analysis_version,
            ANALYSIS_VERSION_ERROR
        );
        assert_required_arrays_present(&result);
    }

    #[test]
    fn non_json_input_returns_error_fallback() {
        let result = parse("I'm sorry, I cannot analyze this profile.");
        assert_eq!(
            result.analysis_metadata.analysis_version,
            ANALYSIS_VERSION_ERROR
        );
        assert!(result
            .initial_profile_analysis
            .profile_overview
            .contains("invalid JSON response"));
        assert_required_arrays_present(&result);
    }

    #[test]
    fn truncated_json_returns_error_fallback() {
        let result = parse("{\"analysis_metadata\": {\"timestamp_utc\": \"2026");
        assert_eq!(
            result.analysis_metadata.analysis_version,
            ANALYSIS_VERSION_ERROR
        );
        assert_required_arrays_present(&result);
    }

    #[test]
    fn sentinel_input_returns_error_fallback_with_message() {
        let result = parse("LLM_ERROR: TimeoutError: upstream timed out");
        assert_eq!(
            result.analysis_metadata.analysis_version,
            ANALYSIS_VERSION_ERROR
        );
        assert!(result
            .initial_profile_analysis
            .profile_overview
            .contains("TimeoutError: upstream timed out"));
        assert_required_arrays_present(&result);
    }

    #[test]
    fn fallback_preserves_profile_context() {
        let result = parse("not json");
        assert_eq!(result.profile_context.username, "alice");
        assert_eq!(result.profile_context.biography_text, "bio text");
        assert_eq!(result.profile_context.follower_count, Some(10));
    }

    #[test]
    fn fallback_seeds_network_graph_with_profile_owner() {
        let result = parse("not json");
        assert_eq!(result.network_graph_data.nodes.len(), 1);
        let node = &result.network_graph_data.nodes[0];
        assert_eq!(node.id, "profile_owner");
        assert_eq!(node.label, "alice");
        assert_eq!(node.node_type, "ProfileOwner");
        assert!(result.network_graph_data.edges.is_empty());
    }

    #[test]
    fn wrong_json_type_returns_error_fallback() {
        for raw in ["[1, 2, 3]", "\"just a string\"", "42", "null", "true"] {
            let result = parse(raw);
            assert_eq!(
                result.analysis_metadata.analysis_version, ANALYSIS_VERSION_ERROR,
                "input {raw:?} should hit the fallback"
            );
        }
    }
}
