//! The canonical analysis report schema.
//!
//! This is the one shape the LLM is asked to produce and the only shape the
//! presentation layer ever sees. Every container is `#[serde(default)]` so a
//! model response that omits a section still deserializes with that section
//! present and empty, so renderers never need to null-check an enumerated
//! array. `temporal_analysis` and `content_analysis` are the two documented
//! optional sections (absent when no post data was available).

use serde::{Deserialize, Serialize};

/// Schema version written into fresh reports.
pub const ANALYSIS_VERSION: &str = "1.0";

/// Schema version marking an error-shaped fallback report.
pub const ANALYSIS_VERSION_ERROR: &str = "error";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    pub analysis_metadata: AnalysisMetadata,
    pub profile_context: ProfileContext,
    pub initial_profile_analysis: InitialProfileAnalysis,
    pub forensic_analysis: ForensicAnalysis,
    pub account_authenticity: AccountAuthenticity,
    pub entity_extraction: EntityExtraction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal_analysis: Option<TemporalAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_analysis: Option<ContentAnalysis>,
    pub inferred_analysis: InferredAnalysis,
    pub network_graph_data: NetworkGraph,
    pub visualization_data: VisualizationData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisMetadata {
    pub timestamp_utc: String,
    pub model_used: String,
    pub analysis_version: String,
}

/// Key profile fields copied into the report so it is self-describing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileContext {
    pub username: String,
    pub biography_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follower_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialProfileAnalysis {
    pub profile_overview: String,
    pub biography_summary: String,
    pub sentiment_analysis: SentimentAssessment,
    pub key_information: Vec<String>,
    pub potential_interests: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentAssessment {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForensicAnalysis {
    pub pii_indicators: Vec<String>,
    pub mentioned_locations: Vec<String>,
    pub external_connections: ExternalConnections,
    pub keywords_of_interest: Vec<String>,
    pub language_notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalConnections {
    pub usernames: Vec<String>,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountAuthenticity {
    pub assessment: String,
    pub indicators: IndicatorBuckets,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorBuckets {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub neutral: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityExtraction {
    pub mentions: Vec<String>,
    pub hashtags: Vec<String>,
    pub urls: Vec<String>,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub locations: Vec<String>,
    pub organizations: Vec<String>,
    pub persons: Vec<String>,
    pub technologies_tools: Vec<String>,
    pub projects_products: Vec<String>,
}

/// Present only when post data was supplied to the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalAnalysis {
    pub posting_frequency: SummaryWithPatterns,
    pub time_of_day_patterns: SummaryWithPatterns,
    pub seasonal_variations: Vec<String>,
    pub gaps_or_spikes: Vec<String>,
    pub evolution_over_time: String,
    pub anomalies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryWithPatterns {
    pub summary: String,
    pub patterns: Vec<String>,
}

/// Present only when post data was supplied to the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentAnalysis {
    pub dominant_themes: Vec<String>,
    pub linguistic_style: SummaryWithPatterns,
    pub hashtag_strategy: String,
    pub mention_patterns: Vec<String>,
    pub sentiment_evolution: SentimentEvolution,
    pub content_evolution: String,
    pub automated_vs_human: AutomationAssessment,
    pub concerning_content: Vec<String>,
    pub post_analyses: Vec<PostAnalysis>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentEvolution {
    pub summary: String,
    pub trends: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationAssessment {
    pub assessment: String,
    pub indicators: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostAnalysis {
    pub timestamp: String,
    pub summary: String,
    pub key_observations: Vec<String>,
    pub sentiment: String,
    pub themes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InferredAnalysis {
    pub potential_interests: Vec<InferredInterest>,
    pub potential_affiliations: Vec<InferredAffiliation>,
    pub potential_skills: Vec<InferredSkill>,
    pub potential_locations: Vec<InferredLocation>,
}

/// Speculation strength the model must attach to every inferred item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InferredInterest {
    pub interest: String,
    pub reasoning: String,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InferredAffiliation {
    pub affiliation: String,
    pub reasoning: String,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InferredSkill {
    pub skill: String,
    pub reasoning: String,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InferredLocation {
    pub location: String,
    pub reasoning: String,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
}

impl GraphNode {
    /// The node every graph is seeded with: the profile owner.
    #[must_use]
    pub fn profile_owner(username: &str) -> Self {
        Self {
            id: "profile_owner".to_owned(),
            label: username.to_owned(),
            node_type: "ProfileOwner".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationData {
    pub posting_heatmap: Vec<HeatmapCell>,
    pub sentiment_timeline: Vec<SentimentPoint>,
    pub topic_distribution: Vec<TopicCount>,
    pub mention_network: MentionNetwork,
}

/// One day-of-week × hour-of-day bucket for the posting heatmap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapCell {
    pub day: u32,
    pub hour: u32,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentPoint {
    pub timestamp: i64,
    pub sentiment: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicCount {
    pub topic: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MentionNetwork {
    pub nodes: Vec<WeightedNode>,
    pub edges: Vec<WeightedEdge>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightedNode {
    pub id: String,
    pub label: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightedEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
}
