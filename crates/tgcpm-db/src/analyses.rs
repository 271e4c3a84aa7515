//! Database operations for `channel_analyses`, the per-handle audit trail.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqliteConnection;
use tgcpm_core::{AnalysisRecord, Niche};

use crate::{to_count, to_sql_count, DbError};

/// Latest audit record for a handle plus how often it has been analyzed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredAnalysis {
    #[serde(flatten)]
    pub record: AnalysisRecord,
    pub analysis_count: u64,
    pub first_analyzed_at: DateTime<Utc>,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct AnalysisRow {
    handle: String,
    subscribers: i64,
    niche: String,
    eligible: bool,
    competitive_cpm: f64,
    engagement_rate: f64,
    posts_per_day: f64,
    total_reactions: i64,
    total_forwards: i64,
    media_ratio: f64,
    is_verified: bool,
    analysis_count: i64,
    first_analyzed_at: DateTime<Utc>,
    analyzed_at: DateTime<Utc>,
}

impl TryFrom<AnalysisRow> for StoredAnalysis {
    type Error = DbError;

    fn try_from(row: AnalysisRow) -> Result<Self, DbError> {
        let niche = row
            .niche
            .parse::<Niche>()
            .map_err(|reason| DbError::Corrupt {
                handle: row.handle.clone(),
                column: "niche",
                reason,
            })?;

        Ok(StoredAnalysis {
            record: AnalysisRecord {
                subscribers: to_count(&row.handle, "subscribers", row.subscribers)?,
                total_reactions: to_count(&row.handle, "total_reactions", row.total_reactions)?,
                total_forwards: to_count(&row.handle, "total_forwards", row.total_forwards)?,
                niche,
                eligible: row.eligible,
                competitive_cpm: row.competitive_cpm,
                engagement_rate: row.engagement_rate,
                posts_per_day: row.posts_per_day,
                media_ratio: row.media_ratio,
                is_verified: row.is_verified,
                handle: row.handle.clone(),
            },
            analysis_count: to_count(&row.handle, "analysis_count", row.analysis_count)?,
            first_analyzed_at: row.first_analyzed_at,
            analyzed_at: row.analyzed_at,
        })
    }
}

/// Upserts the audit row for `record.handle`: the metric columns are
/// replaced, `analysis_count` is incremented and `analyzed_at` set to `at`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the write fails.
pub async fn record(
    conn: &mut SqliteConnection,
    record: &AnalysisRecord,
    at: DateTime<Utc>,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO channel_analyses \
            (handle, subscribers, niche, eligible, competitive_cpm, engagement_rate, \
             posts_per_day, total_reactions, total_forwards, media_ratio, is_verified, \
             analysis_count, first_analyzed_at, analyzed_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 1, ?12, ?12) \
         ON CONFLICT (handle) DO UPDATE SET \
            subscribers = excluded.subscribers, \
            niche = excluded.niche, \
            eligible = excluded.eligible, \
            competitive_cpm = excluded.competitive_cpm, \
            engagement_rate = excluded.engagement_rate, \
            posts_per_day = excluded.posts_per_day, \
            total_reactions = excluded.total_reactions, \
            total_forwards = excluded.total_forwards, \
            media_ratio = excluded.media_ratio, \
            is_verified = excluded.is_verified, \
            analysis_count = channel_analyses.analysis_count + 1, \
            analyzed_at = excluded.analyzed_at",
    )
    .bind(&record.handle)
    .bind(to_sql_count(record.subscribers))
    .bind(record.niche.as_str())
    .bind(record.eligible)
    .bind(record.competitive_cpm)
    .bind(record.engagement_rate)
    .bind(record.posts_per_day)
    .bind(to_sql_count(record.total_reactions))
    .bind(to_sql_count(record.total_forwards))
    .bind(record.media_ratio)
    .bind(record.is_verified)
    .bind(at)
    .execute(conn)
    .await?;

    tracing::debug!(handle = %record.handle, "analysis recorded");
    Ok(())
}

/// Most recently analyzed handles first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure and [`DbError::Corrupt`] for
/// rows that cannot be decoded into the domain model.
pub async fn list_recent(
    conn: &mut SqliteConnection,
    limit: u32,
) -> Result<Vec<StoredAnalysis>, DbError> {
    let rows = sqlx::query_as::<_, AnalysisRow>(
        "SELECT handle, subscribers, niche, eligible, competitive_cpm, engagement_rate, \
                posts_per_day, total_reactions, total_forwards, media_ratio, is_verified, \
                analysis_count, first_analyzed_at, analyzed_at \
         FROM channel_analyses \
         ORDER BY analyzed_at DESC, handle ASC \
         LIMIT ?1",
    )
    .bind(i64::from(limit))
    .fetch_all(conn)
    .await?;

    rows.into_iter().map(StoredAnalysis::try_from).collect()
}
