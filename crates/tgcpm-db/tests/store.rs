//! `SqliteStore` against a throwaway database file per test.

use chrono::{TimeZone, Utc};
use tgcpm_core::{AnalysisRecord, AuditSink, ChannelStatsRow, ChannelStatsStore, Niche, StoreError};
use tgcpm_db::{analyses, SqliteStore};

struct TempDb {
    path: std::path::PathBuf,
    store: SqliteStore,
}

impl TempDb {
    async fn migrated() -> Self {
        let path = std::env::temp_dir().join(format!("tgcpm-{}.db", uuid::Uuid::new_v4()));
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let store = SqliteStore::new(&url).unwrap();
        store.run_migrations().await.unwrap();
        Self { path, store }
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn stats_row(handle: &str) -> ChannelStatsRow {
    ChannelStatsRow {
        handle: handle.to_string(),
        title: Some("Gadget Lab".to_string()),
        description: None,
        subscriber_count: 42_000,
        avg_views: 9_100.5,
        posts_per_day: 2.25,
        total_forwards: 120,
        total_reactions: 3_400,
        media_ratio: 0.7,
        is_verified: true,
        last_updated_epoch: 1_741_600_000,
    }
}

fn analysis(handle: &str, competitive_cpm: f64) -> AnalysisRecord {
    AnalysisRecord {
        handle: handle.to_string(),
        subscribers: 42_000,
        niche: Niche::Tech,
        eligible: true,
        competitive_cpm,
        engagement_rate: 21.67,
        posts_per_day: 2.25,
        total_reactions: 3_400,
        total_forwards: 120,
        media_ratio: 0.7,
        is_verified: true,
    }
}

#[tokio::test]
async fn migrations_apply_once() {
    let db = TempDb::migrated().await;
    assert_eq!(db.store.run_migrations().await.unwrap(), 0);
    db.store.health_check().await.unwrap();
}

#[tokio::test]
async fn missing_cache_row_is_none() {
    let db = TempDb::migrated().await;
    assert_eq!(db.store.load("nobody").await.unwrap(), None);
}

#[tokio::test]
async fn cache_row_round_trips_and_upsert_replaces() {
    let db = TempDb::migrated().await;
    let mut row = stats_row("gadgetlab");
    db.store.upsert_channel_stats(&row).await.unwrap();
    assert_eq!(db.store.load("gadgetlab").await.unwrap(), Some(row.clone()));

    row.subscriber_count = 43_500;
    row.description = Some("Reviews and teardowns".to_string());
    row.last_updated_epoch += 3_600;
    db.store.upsert_channel_stats(&row).await.unwrap();
    assert_eq!(db.store.load("gadgetlab").await.unwrap(), Some(row));
}

#[tokio::test]
async fn negative_counts_surface_as_corrupt_rows() {
    let db = TempDb::migrated().await;
    let mut conn = db.store.connect().await.unwrap();
    sqlx::query(
        "INSERT INTO channel_stats (handle, subscriber_count, last_updated_epoch) \
         VALUES ('broken', -5, 0)",
    )
    .execute(&mut conn)
    .await
    .unwrap();

    let err = db.store.load("broken").await.unwrap_err();
    assert!(
        matches!(err, StoreError::Corrupt { ref handle, .. } if handle == "broken"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn repeated_analyses_increment_count_and_keep_latest_values() {
    let db = TempDb::migrated().await;
    db.store.record(&analysis("gadgetlab", 0.31)).await.unwrap();
    db.store.record(&analysis("gadgetlab", 0.36)).await.unwrap();

    let recent = db.store.list_recent_analyses(10).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].analysis_count, 2);
    assert_eq!(recent[0].record, analysis("gadgetlab", 0.36));
    assert!(recent[0].first_analyzed_at <= recent[0].analyzed_at);
}

#[tokio::test]
async fn recent_analyses_are_newest_first_and_limited() {
    let db = TempDb::migrated().await;
    let mut conn = db.store.connect().await.unwrap();
    for (i, handle) in ["alpha", "bravo", "charlie"].into_iter().enumerate() {
        let at = Utc
            .with_ymd_and_hms(2025, 3, 10, 12, u32::try_from(i).unwrap(), 0)
            .unwrap();
        analyses::record(&mut conn, &analysis(handle, 0.2), at)
            .await
            .unwrap();
    }

    let recent = db.store.list_recent_analyses(2).await.unwrap();
    let handles: Vec<&str> = recent.iter().map(|a| a.record.handle.as_str()).collect();
    assert_eq!(handles, vec!["charlie", "bravo"]);
}
