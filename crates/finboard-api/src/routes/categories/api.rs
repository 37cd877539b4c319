//! Categories API endpoints

use axum::extract::{Path, State};
use axum::Json;
use finboard_core::{CategoriesResponse, EvolutionResponse};

use crate::error::ApiResult;
use crate::AppState;

pub async fn api_categories(state: State<AppState>) -> Json<CategoriesResponse> {
    let ledger = state.ledger.read().await;
    let categories = ledger.categories();
    Json(CategoriesResponse {
        total_count: categories.len(),
        categories,
    })
}

/// Full monthly series of one category with its trend
pub async fn api_category_evolution(
    state: State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<EvolutionResponse>> {
    let ledger = state.ledger.read().await;
    let evolution = ledger.category_evolution(&name)?;
    let trend = finboard_core::classify_trend(&evolution);
    Ok(Json(EvolutionResponse { evolution, trend }))
}
