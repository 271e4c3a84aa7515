use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tgcpm_engine::{market_rates as rate_card, MarketRates, GENERAL_NICHE};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

pub(super) async fn market_rates(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(niche): Path<String>,
) -> Json<ApiResponse<MarketRates>> {
    respond(&state, req_id, &niche).await
}

pub(super) async fn general_market_rates(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<MarketRates>> {
    respond(&state, req_id, GENERAL_NICHE).await
}

async fn respond(state: &AppState, req_id: RequestId, niche: &str) -> Json<ApiResponse<MarketRates>> {
    let ton_usd = state.ton_price.usd_or_fallback().await;
    Json(ApiResponse {
        data: rate_card(niche, ton_usd),
        meta: ResponseMeta::new(req_id.0),
    })
}
