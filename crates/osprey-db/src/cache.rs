//! Database operations for the `profile_cache` table.
//!
//! One row per profile identifier: the raw [`osprey_core::Profile`] snapshot
//! and its analysis report, both as JSONB, plus the write timestamp used for
//! TTL checks. Rows are upserted on every fresh pipeline run; stale rows are
//! ignored by lookups, never deleted here.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `profile_cache` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileCacheRow {
    pub username: String,
    pub data: Value,
    pub report: Value,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a cache lookup.
#[derive(Debug, Clone)]
pub enum CacheLookup {
    /// An entry exists and is within the TTL window.
    Hit(ProfileCacheRow),
    /// No entry, a stale entry, or the lookup was bypassed.
    Miss,
}

/// Whether an entry written at `written_at` is still inside the TTL window
/// as of `now`.
#[must_use]
pub fn is_fresh(written_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now - written_at < ttl
}

/// Look up the cached entry for `username`.
///
/// When `bypass` is set the lookup always reports [`CacheLookup::Miss`]
/// without touching the database (forced refresh). Otherwise an entry counts
/// as a hit only while `now - timestamp` is inside `ttl`; stale entries are
/// reported as a miss and left in place for the next upsert to overwrite.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn lookup_profile_cache(
    pool: &PgPool,
    username: &str,
    bypass: bool,
    ttl: Duration,
) -> Result<CacheLookup, DbError> {
    if bypass {
        tracing::info!(username, "cache bypassed (forced refresh)");
        return Ok(CacheLookup::Miss);
    }

    let row = sqlx::query_as::<_, ProfileCacheRow>(
        "SELECT username, data, report, timestamp \
         FROM profile_cache \
         WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) if is_fresh(row.timestamp, Utc::now(), ttl) => {
            tracing::info!(username, "cache hit");
            Ok(CacheLookup::Hit(row))
        }
        Some(row) => {
            tracing::info!(username, written_at = %row.timestamp, "cache entry expired");
            Ok(CacheLookup::Miss)
        }
        None => {
            tracing::info!(username, "cache miss");
            Ok(CacheLookup::Miss)
        }
    }
}

/// Insert or replace the cache entry for `username`, stamping it with the
/// current time. Returns the write timestamp.
///
/// Concurrent writers race benignly: the upsert is a single-key
/// insert-or-update, so the last writer wins.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_profile_cache(
    pool: &PgPool,
    username: &str,
    data: &Value,
    report: &Value,
) -> Result<DateTime<Utc>, DbError> {
    let timestamp: DateTime<Utc> = sqlx::query_scalar(
        "INSERT INTO profile_cache (username, data, report, timestamp) \
         VALUES ($1, $2, $3, now()) \
         ON CONFLICT (username) DO UPDATE \
         SET data = EXCLUDED.data, report = EXCLUDED.report, timestamp = EXCLUDED.timestamp \
         RETURNING timestamp",
    )
    .bind(username)
    .bind(data)
    .bind(report)
    .fetch_one(pool)
    .await?;

    Ok(timestamp)
}
