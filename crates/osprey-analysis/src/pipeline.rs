//! The analysis pipeline: cache check → fetch → prompt → complete → parse →
//! cache write.
//!
//! One sequential chain per request. Session and fetch failures are fatal and
//! typed; LLM and parse failures are absorbed into an error-shaped
//! [`AnalysisResult`]; cache failures are logged and never fail the request
//! (a freshly computed result is still worth returning).

use chrono::{Duration, Utc};
use sqlx::PgPool;
use thiserror::Error;

use osprey_core::{AppConfig, Profile};
use osprey_db::{lookup_profile_cache, upsert_profile_cache, CacheLookup};
use osprey_scraper::{
    ProfileClient, ScrapeError, SessionAcquirer, SessionError, SessionSource,
};

use crate::llm::{LlmClient, LlmError};
use crate::parse::{error_analysis, parse_analysis};
use crate::prompt::comprehensive_analysis_prompt;
use crate::types::AnalysisResult;

/// Fatal pipeline failures. LLM and parse problems never appear here; they
/// are folded into the returned report.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("session acquisition failed: {0}")]
    Session(#[from] SessionError),

    #[error("profile fetch failed: {0}")]
    Fetch(#[from] ScrapeError),

    /// Client construction failure (bad base URL, TLS setup).
    #[error("LLM client error: {0}")]
    Llm(#[from] LlmError),
}

/// Tunables for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub cache_ttl: Duration,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            model: config.llm_model.clone(),
            max_tokens: config.llm_max_tokens,
            temperature: config.llm_temperature,
            cache_ttl: Duration::days(config.cache_ttl_days),
        }
    }
}

/// The combined result handed to the presentation layer.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProfileReport {
    pub profile: Profile,
    pub analysis: AnalysisResult,
    pub served_from_cache: bool,
}

/// Composes session acquisition, profile fetching, prompting, completion,
/// parsing and caching. All collaborators are injected, so there is no global
/// client state.
pub struct AnalysisPipeline {
    session: SessionSource,
    profiles: ProfileClient,
    llm: LlmClient,
    pool: PgPool,
    settings: PipelineSettings,
}

impl AnalysisPipeline {
    #[must_use]
    pub fn new(
        session: SessionSource,
        profiles: ProfileClient,
        llm: LlmClient,
        pool: PgPool,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            session,
            profiles,
            llm,
            pool,
            settings,
        }
    }

    /// Builds a pipeline with all clients constructed from [`AppConfig`]
    /// (headless session acquisition, production endpoints).
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if a client cannot be constructed from the
    /// configured URLs.
    pub fn from_app_config(config: &AppConfig, pool: PgPool) -> Result<Self, PipelineError> {
        let session = SessionSource::Headless(SessionAcquirer::new(
            config.session_landing_url.clone(),
            config.session_timeout_secs,
        ));
        let profiles = ProfileClient::new(
            &config.scraper_base_url,
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            config.scraper_max_retries,
            config.scraper_retry_backoff_base_ms,
        )?;
        let llm = LlmClient::new(
            &config.llm_base_url,
            &config.llm_api_key,
            config.llm_request_timeout_secs,
        )?;
        let settings = PipelineSettings::from_app_config(config);

        Ok(Self::new(session, profiles, llm, pool, settings))
    }

    /// Runs the full pipeline for `username`.
    ///
    /// `force_refresh` bypasses the cache read; the fresh result still
    /// overwrites the cache entry afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Session`] or [`PipelineError::Fetch`] when no
    /// usable profile could be obtained. In that case nothing is written to
    /// the cache.
    pub async fn analyze(
        &self,
        username: &str,
        force_refresh: bool,
    ) -> Result<ProfileReport, PipelineError> {
        if let Some(report) = self.cached_report(username, force_refresh).await {
            return Ok(report);
        }

        let credentials = self.session.credentials().await?;
        let profile = self.profiles.fetch_profile(username, &credentials).await?;

        let now = Utc::now();
        let model = &self.settings.model;
        let prompt = comprehensive_analysis_prompt(&profile, now, model);

        let analysis = match self
            .llm
            .complete(model, &prompt, self.settings.max_tokens, self.settings.temperature)
            .await
        {
            Ok(text) => parse_analysis(&text, &profile, model, now),
            Err(e) => {
                tracing::warn!(username, error = %e, "LLM completion failed");
                error_analysis(&profile, model, now, &e.to_string())
            }
        };

        self.write_cache(username, &profile, &analysis).await;

        Ok(ProfileReport {
            profile,
            analysis,
            served_from_cache: false,
        })
    }

    /// Cache read. Bypass, lookup failures and undeserializable rows all
    /// report "no cached report", and the pipeline recomputes.
    async fn cached_report(&self, username: &str, force_refresh: bool) -> Option<ProfileReport> {
        let lookup =
            lookup_profile_cache(&self.pool, username, force_refresh, self.settings.cache_ttl)
                .await;

        let row = match lookup {
            Ok(CacheLookup::Hit(row)) => row,
            Ok(CacheLookup::Miss) => return None,
            Err(e) => {
                tracing::warn!(username, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        let profile = serde_json::from_value::<Profile>(row.data);
        let analysis = serde_json::from_value::<AnalysisResult>(row.report);
        match (profile, analysis) {
            (Ok(profile), Ok(analysis)) => Some(ProfileReport {
                profile,
                analysis,
                served_from_cache: true,
            }),
            (profile, analysis) => {
                let error = profile
                    .err()
                    .map_or_else(|| analysis.err().map(|e| e.to_string()), |e| Some(e.to_string()))
                    .unwrap_or_default();
                tracing::warn!(
                    username,
                    error = %error,
                    "cached entry does not deserialize, treating as miss"
                );
                None
            }
        }
    }

    /// Best-effort cache write: failures are logged, never propagated.
    async fn write_cache(&self, username: &str, profile: &Profile, analysis: &AnalysisResult) {
        let (data, report) = match (
            serde_json::to_value(profile),
            serde_json::to_value(analysis),
        ) {
            (Ok(data), Ok(report)) => (data, report),
            (data, report) => {
                let error = data
                    .err()
                    .map_or_else(|| report.err().map(|e| e.to_string()), |e| Some(e.to_string()))
                    .unwrap_or_default();
                tracing::warn!(username, error = %error, "cache serialization failed, skipping write");
                return;
            }
        };

        match upsert_profile_cache(&self.pool, username, &data, &report).await {
            Ok(timestamp) => {
                tracing::info!(username, written_at = %timestamp, "cache entry written");
            }
            Err(e) => {
                tracing::warn!(
                    username,
                    error = %e,
                    "cache write failed, returning fresh result anyway"
                );
            }
        }
    }
}
