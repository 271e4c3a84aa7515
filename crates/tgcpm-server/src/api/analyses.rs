use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use tgcpm_db::StoredAnalysis;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AnalysesQuery {
    pub limit: Option<i64>,
}

pub(super) async fn list_recent_analyses(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AnalysesQuery>,
) -> Result<Json<ApiResponse<Vec<StoredAnalysis>>>, ApiError> {
    let rows = state
        .store
        .list_recent_analyses(normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows,
        meta: ResponseMeta::new(req_id.0),
    }))
}
