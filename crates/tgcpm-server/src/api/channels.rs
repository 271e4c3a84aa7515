use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Local;
use serde::Serialize;
use tgcpm_core::normalize_handle;
use tgcpm_engine::{
    activity_level, engagement_tier, format_time_ago, AnalysisOutcome, ChannelAnalysis,
};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct AnalysisData {
    #[serde(flatten)]
    analysis: ChannelAnalysis,
    labels: ReportLabels,
    usd: UsdPrices,
}

#[derive(Debug, Serialize)]
struct ReportLabels {
    engagement_tier: &'static str,
    activity_level: &'static str,
    last_post: String,
}

#[derive(Debug, Serialize)]
struct UsdPrices {
    ton_usd: f64,
    conservative: f64,
    competitive: f64,
    aggressive: f64,
}

pub(super) async fn analyze_channel(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
) -> Result<Json<ApiResponse<AnalysisData>>, ApiError> {
    let analysis = match state.analyzer.analyze(&handle).await {
        AnalysisOutcome::Found(analysis) => *analysis,
        AnalysisOutcome::NotFound => {
            return Err(ApiError::new(
                req_id.0,
                "not_found",
                format!(
                    "no analytics available for @{}; check the handle and that the channel is public",
                    normalize_handle(&handle)
                ),
            ));
        }
        AnalysisOutcome::InvalidHandle => {
            return Err(ApiError::new(
                req_id.0,
                "invalid_handle",
                "channel handle must not be empty",
            ));
        }
    };

    let ton_usd = state.ton_price.usd_or_fallback().await;
    let metrics = &analysis.channel.metrics;
    let rec = &analysis.recommendation;

    let labels = ReportLabels {
        engagement_tier: engagement_tier(metrics.engagement_rate),
        activity_level: activity_level(metrics.posts_per_day),
        last_post: format_time_ago(metrics.last_post_at, Local::now().naive_local()),
    };
    let usd = UsdPrices {
        ton_usd,
        conservative: rec.conservative * ton_usd,
        competitive: rec.competitive * ton_usd,
        aggressive: rec.aggressive * ton_usd,
    };

    Ok(Json(ApiResponse {
        data: AnalysisData {
            analysis,
            labels,
            usd,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
