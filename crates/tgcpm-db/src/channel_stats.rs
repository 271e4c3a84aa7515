//! Database operations for `channel_stats`.

use sqlx::SqliteConnection;
use tgcpm_core::ChannelStatsRow;

use crate::{to_count, to_sql_count, DbError};

#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    handle: String,
    title: Option<String>,
    description: Option<String>,
    subscriber_count: i64,
    avg_views: f64,
    posts_per_day: f64,
    total_forwards: i64,
    total_reactions: i64,
    media_ratio: f64,
    is_verified: bool,
    last_updated_epoch: i64,
}

impl TryFrom<StatsRow> for ChannelStatsRow {
    type Error = DbError;

    fn try_from(row: StatsRow) -> Result<Self, DbError> {
        Ok(ChannelStatsRow {
            subscriber_count: to_count(&row.handle, "subscriber_count", row.subscriber_count)?,
            total_forwards: to_count(&row.handle, "total_forwards", row.total_forwards)?,
            total_reactions: to_count(&row.handle, "total_reactions", row.total_reactions)?,
            handle: row.handle,
            title: row.title,
            description: row.description,
            avg_views: row.avg_views,
            posts_per_day: row.posts_per_day,
            media_ratio: row.media_ratio,
            is_verified: row.is_verified,
            last_updated_epoch: row.last_updated_epoch,
        })
    }
}

/// Fetches the cached row for `handle`, if any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure and [`DbError::Corrupt`] for
/// negative stored counts.
pub async fn load(
    conn: &mut SqliteConnection,
    handle: &str,
) -> Result<Option<ChannelStatsRow>, DbError> {
    let row = sqlx::query_as::<_, StatsRow>(
        "SELECT handle, title, description, subscriber_count, avg_views, posts_per_day, \
                total_forwards, total_reactions, media_ratio, is_verified, last_updated_epoch \
         FROM channel_stats WHERE handle = ?1",
    )
    .bind(handle)
    .fetch_optional(conn)
    .await?;

    row.map(ChannelStatsRow::try_from).transpose()
}

/// Inserts or replaces the cached row for `row.handle`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the write fails.
pub async fn upsert(conn: &mut SqliteConnection, row: &ChannelStatsRow) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO channel_stats \
            (handle, title, description, subscriber_count, avg_views, posts_per_day, \
             total_forwards, total_reactions, media_ratio, is_verified, last_updated_epoch) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) \
         ON CONFLICT (handle) DO UPDATE SET \
            title = excluded.title, \
            description = excluded.description, \
            subscriber_count = excluded.subscriber_count, \
            avg_views = excluded.avg_views, \
            posts_per_day = excluded.posts_per_day, \
            total_forwards = excluded.total_forwards, \
            total_reactions = excluded.total_reactions, \
            media_ratio = excluded.media_ratio, \
            is_verified = excluded.is_verified, \
            last_updated_epoch = excluded.last_updated_epoch",
    )
    .bind(&row.handle)
    .bind(&row.title)
    .bind(&row.description)
    .bind(to_sql_count(row.subscriber_count))
    .bind(row.avg_views)
    .bind(row.posts_per_day)
    .bind(to_sql_count(row.total_forwards))
    .bind(to_sql_count(row.total_reactions))
    .bind(row.media_ratio)
    .bind(row.is_verified)
    .bind(row.last_updated_epoch)
    .execute(conn)
    .await?;
    Ok(())
}
