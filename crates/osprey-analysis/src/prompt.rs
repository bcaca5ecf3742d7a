//! Prompt construction for profile analysis.
//!
//! Pure string building, no I/O. Each builder embeds the profile's identity
//! fields and an explicit contract for the output: plain text for the
//! narrative prompts, a full JSON schema for the comprehensive prompt. Any
//! profile text that lands inside a JSON literal goes through
//! [`json_escaped`] first so quotes and newlines in a biography cannot break
//! the requested output format.

use chrono::{DateTime, SecondsFormat, Utc};

use osprey_core::{Post, Profile};

/// Cap on serialized sample timestamps in the comprehensive prompt, to bound
/// prompt size for prolific accounts.
const MAX_SAMPLE_TIMESTAMPS: usize = 50;

/// The structured prompts the pipeline knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Plain-text initial reconnaissance report from username + biography.
    ReconReport,
    /// Plain-text forensic points-of-interest pass over the biography.
    ForensicIndicators,
    /// The full JSON-schema analysis used by the pipeline.
    Comprehensive,
    /// Plain-text posting-timeline pattern analysis.
    TemporalPatterns,
}

/// Builds the prompt of the given kind for a profile snapshot.
///
/// `now` stamps the metadata the model is asked to echo back; `model` is
/// embedded for the same reason. Post data is taken from the profile and
/// serialized sorted by ascending timestamp.
#[must_use]
pub fn build_prompt(kind: PromptKind, profile: &Profile, now: DateTime<Utc>, model: &str) -> String {
    match kind {
        PromptKind::ReconReport => recon_report_prompt(profile),
        PromptKind::ForensicIndicators => forensic_indicators_prompt(profile),
        PromptKind::Comprehensive => comprehensive_analysis_prompt(profile, now, model),
        PromptKind::TemporalPatterns => temporal_patterns_prompt(profile),
    }
}

/// Encodes `text` as a JSON string literal (quotes included), so it can be
/// spliced into prompt text that asks for JSON output.
#[must_use]
pub fn json_escaped(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| String::from("\"\""))
}

/// Unix seconds → ISO-8601 UTC with millisecond precision. Out-of-range
/// timestamps render as `"unknown"` rather than failing the build.
fn iso_utc(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Posts sorted by ascending timestamp (platform order is newest-first).
fn sorted_posts(profile: &Profile) -> Vec<&Post> {
    let mut posts: Vec<&Post> = profile.posts.iter().flatten().collect();
    posts.sort_by_key(|p| p.timestamp);
    posts
}

/// Human-readable per-post block: date, caption, tags, location.
fn posts_block(posts: &[&Post]) -> String {
    posts
        .iter()
        .enumerate()
        .map(|(idx, post)| {
            let caption = if post.caption.is_empty() {
                "None"
            } else {
                &post.caption
            };
            let tagged = match &post.tagged_users {
                Some(users) if !users.is_empty() => users.join(", "),
                _ => "None".to_owned(),
            };
            let location = post.location.as_deref().unwrap_or("None");
            format!(
                "Post {n}:\n  Date: {date}\n  Caption: {caption}\n  Tagged: {tagged}\n  Location: {location}\n",
                n = idx + 1,
                date = iso_utc(post.timestamp),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Timeline summary plus a capped sample of timestamps.
fn timeline_block(posts: &[&Post]) -> String {
    let oldest = posts.first().map_or_else(|| "unknown".to_owned(), |p| iso_utc(p.timestamp));
    let newest = posts.last().map_or_else(|| "unknown".to_owned(), |p| iso_utc(p.timestamp));

    let samples = posts
        .iter()
        .take(MAX_SAMPLE_TIMESTAMPS)
        .map(|p| format!("- {}", iso_utc(p.timestamp)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Post Timeline:\n- Oldest: {oldest}\n- Newest: {newest}\n- Post Count: {count}\nSample Timestamps:\n{samples}",
        count = posts.len(),
    )
}

/// Initial reconnaissance report: plain text, biography only.
#[must_use]
pub fn recon_report_prompt(profile: &Profile) -> String {
    let username = &profile.username;
    let biography = profile.biography_text();
    format!(
        r#"**Task:** Generate an "Initial Profile Reconnaissance" report based *only* on the provided profile biography text and username context. Output ONLY plain text.

**Username Context:** Analyze potential implications of the username ({username}) itself if relevant.
**Biography Text:** "{biography}"

**Report Structure (Use Plain Text Headings/Lists):**
1. Profile Overview: Briefly mention the username ({username}).
2. Biography Summary: Summarize the key themes, stated purpose, or activities mentioned in the biography text (2-4 sentences). If empty or nonsensical, state that.
3. Sentiment Analysis: State the inferred overall sentiment of the biography text (Positive, Negative, Neutral, Mixed, or Not Applicable if empty/nonsensical).
4. Key Information Extraction: List any explicitly mentioned key entities like locations, organizations, projects, or skills identified directly *in the bio text*. If none, state "No specific entities mentioned." Use simple list format (e.g., "- Entity 1").
5. Potential Interests (Inferred): Briefly mention 1-2 potential high-level interests that *might* be inferred *speculatively* from the bio or username, clearly labeling them as such. If none inferred, state "No specific interests could be reasonably inferred."
6. Concluding Remark: Add a brief concluding sentence (e.g., "Analysis based solely on provided bio text.").

**Output:** Generate ONLY the plain text report. **Do NOT use any markdown formatting (no asterisks, no hashes, no markdown lists).** Use simple line breaks for structure."#
    )
}

/// Forensic points-of-interest pass: plain text, biography only.
#[must_use]
pub fn forensic_indicators_prompt(profile: &Profile) -> String {
    let biography = profile.biography_text();
    format!(
        r#"**Task:** Analyze the provided profile biography text *strictly* for potential digital forensic points of interest. Focus *only* on patterns and explicit mentions within the text provided. **Do not make assumptions beyond the text.** Output ONLY plain text.

**Biography Text:** "{biography}"

**Analysis Points (Use Plain Text Headings/Lists):**
1. Potential PII Indicators: Identify any patterns that *might resemble* PII (e.g., email format `user@domain.com`, phone number patterns `XXX-XXX-XXXX`, specific location names). Note the *presence* of the pattern/mention found in the text. If none, state "No direct PII pattern indicators identified in the bio text."
2. Explicitly Mentioned Locations: List any specific cities, states, countries, or landmarks mentioned. If none, state "No locations mentioned." Use simple list format (e.g., "- Location 1").
3. Explicit Mentions/Connections: List any other usernames (@mentions) or specific websites (URLs beginning with http/https) found directly in the text. If none, state "No external usernames or URLs mentioned." Use simple list format.
4. Keywords/Themes of Interest: List 3-5 key terms or concepts directly present in the bio that might be relevant for further investigation. If none, state "No specific keywords/themes identified." Use simple list format.
5. Language/Tone Notes: Briefly comment if the language used seems unusual, coded, highly technical, or noteworthy in tone (optional, only if prominent).

**Output:** Generate ONLY the analysis notes as plain text. Use simple headings and simple lists. **Do NOT use any markdown formatting.** State clearly if no relevant information was found for a point. Emphasize that findings are based solely on the provided text."#
    )
}

/// Posting-timeline pattern analysis: plain text, timestamps only.
#[must_use]
pub fn temporal_patterns_prompt(profile: &Profile) -> String {
    let posts = sorted_posts(profile);
    if posts.is_empty() {
        return format!(
            "No posts data available for analysis of user {}.",
            profile.username
        );
    }

    let oldest = iso_utc(posts[0].timestamp);
    let newest = iso_utc(posts[posts.len() - 1].timestamp);
    let timestamps = posts
        .iter()
        .map(|p| iso_utc(p.timestamp))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"As a digital forensics analyst, examine the following posting timeline data for user {username}. The data spans from {oldest} to {newest}.

Post timestamps:
{timestamps}

Analyze this data to determine:
1. Posting frequency patterns (daily, weekly, monthly trends)
2. Time-of-day patterns (when posts are typically published)
3. Seasonal or periodic variations in posting activity
4. Unusual gaps or spikes in posting frequency
5. Evolution of posting behavior over time

Present your findings with specific examples from the data and identify any anomalies that might warrant further investigation. Output ONLY plain text, no markdown formatting."#,
        username = profile.username,
    )
}

/// The comprehensive analysis prompt: all profile data plus the full target
/// JSON schema the response must match.
#[must_use]
pub fn comprehensive_analysis_prompt(
    profile: &Profile,
    now: DateTime<Utc>,
    model: &str,
) -> String {
    let username = &profile.username;
    let escaped_bio = json_escaped(profile.biography_text());
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut profile_lines = format!(
        "- Username: {username}\n- Biography: {escaped_bio}"
    );
    if let Some(full_name) = &profile.full_name {
        profile_lines.push_str(&format!("\n- Full Name: {full_name}"));
    }
    if let Some(followers) = profile.followers_count {
        profile_lines.push_str(&format!("\n- Followers: {followers}"));
    }
    if let Some(following) = profile.following_count {
        profile_lines.push_str(&format!("\n- Following: {following}"));
    }
    if let Some(verified) = profile.is_verified {
        profile_lines.push_str(&format!("\n- Verified: {verified}"));
    }

    let posts = sorted_posts(profile);
    let post_section = if posts.is_empty() {
        "No posts data available for analysis.".to_owned()
    } else {
        format!(
            "POST DATA:\n{}\n\nTIMELINE DATA:\n{}",
            posts_block(&posts),
            timeline_block(&posts)
        )
    };

    // Context fields the model is asked to echo back verbatim.
    let mut context_fields = format!(
        "\"username\": \"{username}\",\n    \"biography_text\": {escaped_bio}"
    );
    if let Some(full_name) = &profile.full_name {
        context_fields.push_str(&format!(",\n    \"fullname\": {}", json_escaped(full_name)));
    }
    if let Some(followers) = profile.followers_count {
        context_fields.push_str(&format!(",\n    \"follower_count\": {followers}"));
    }
    if let Some(following) = profile.following_count {
        context_fields.push_str(&format!(",\n    \"following_count\": {following}"));
    }
    if let Some(verified) = profile.is_verified {
        context_fields.push_str(&format!(",\n    \"is_verified\": {verified}"));
    }

    // Sections that only make sense with post data.
    let post_sections = if posts.is_empty() {
        String::new()
    } else {
        r#"
  "temporal_analysis": {
    "posting_frequency": {"summary": "", "patterns": []},
    "time_of_day_patterns": {"summary": "", "patterns": []},
    "seasonal_variations": [],
    "gaps_or_spikes": [],
    "evolution_over_time": "",
    "anomalies": []
  },
  "content_analysis": {
    "dominant_themes": [],
    "linguistic_style": {"summary": "", "patterns": []},
    "hashtag_strategy": "",
    "mention_patterns": [],
    "sentiment_evolution": {"summary": "", "trends": []},
    "content_evolution": "",
    "automated_vs_human": {"assessment": "", "indicators": []},
    "concerning_content": [],
    "post_analyses": [
      {"timestamp": "YYYY-MM-DDTHH:mm:ss.sssZ", "summary": "", "key_observations": [], "sentiment": "", "themes": []}
    ]
  },"#
        .to_owned()
    };

    format!(
        r#"You are a digital forensics expert specializing in social media analysis. Analyze the following profile and provide a complete, structured analysis in JSON format that can be parsed by a visualization system.

PROFILE DATA:
{profile_lines}

{post_section}

ANALYSIS REQUIREMENTS:
1. Analyze all provided profile information.
2. Identify patterns, entities, and insights.
3. Format your entire response as a SINGLE, well-structured JSON object matching the exact schema provided below.
4. Include detailed analysis across all available dimensions.
5. Generate appropriate data for visualizations where applicable.
6. If certain data is unavailable, include empty arrays or appropriate default values rather than omitting keys.

OUTPUT FORMAT:
Respond ONLY with a valid JSON object following this exact structure:

{{
  "analysis_metadata": {{
    "timestamp_utc": "{timestamp}",
    "model_used": "{model}",
    "analysis_version": "1.0"
  }},
  "profile_context": {{
    {context_fields}
  }},
  "initial_profile_analysis": {{
    "profile_overview": "",
    "biography_summary": "",
    "sentiment_analysis": {{"label": "", "score": 0.0}},
    "key_information": [],
    "potential_interests": []
  }},
  "forensic_analysis": {{
    "pii_indicators": [],
    "mentioned_locations": [],
    "external_connections": {{"usernames": [], "urls": []}},
    "keywords_of_interest": [],
    "language_notes": ""
  }},
  "account_authenticity": {{
    "assessment": "",
    "indicators": {{"positive": [], "negative": [], "neutral": []}},
    "recommendations": []
  }},
  "entity_extraction": {{
    "mentions": [],
    "hashtags": [],
    "urls": [],
    "emails": [],
    "phone_numbers": [],
    "locations": [],
    "organizations": [],
    "persons": [],
    "technologies_tools": [],
    "projects_products": []
  }},{post_sections}
  "inferred_analysis": {{
    "potential_interests": [{{"interest": "", "reasoning": "", "confidence": "Low"}}],
    "potential_affiliations": [{{"affiliation": "", "reasoning": "", "confidence": "Low"}}],
    "potential_skills": [{{"skill": "", "reasoning": "", "confidence": "Low"}}],
    "potential_locations": [{{"location": "", "reasoning": "", "confidence": "Low"}}]
  }},
  "network_graph_data": {{
    "nodes": [
      {{"id": "profile_owner", "label": "{username}", "type": "ProfileOwner"}}
    ],
    "edges": []
  }},
  "visualization_data": {{
    "posting_heatmap": [],
    "sentiment_timeline": [],
    "topic_distribution": [],
    "mention_network": {{"nodes": [], "edges": []}}
  }}
}}

IMPORTANT NOTES:
- Your entire response must be ONLY a valid, parseable JSON object. No explanatory text before or after. No markdown formatting outside the JSON.
- Confidence values must be exactly "Low", "Medium", or "High".
- Use numeric values for scores (not strings).
- Use empty arrays [] rather than null for missing list data.
- Use empty strings "" rather than null for missing text fields."#
    )
}
