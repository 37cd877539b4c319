//! Months API endpoints

use axum::extract::{Path, State};
use axum::Json;
use finboard_core::table::is_month_key;
use finboard_core::{FlowGraph, MonthReport, MonthsResponse, NetWorthSnapshot, ScoreResponse};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Reject month keys that cannot name a column before hitting the ledger
fn check_month(month: &str) -> ApiResult<()> {
    if is_month_key(month) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!("'{}' is not a YYYY-MM month", month)))
    }
}

pub async fn api_months(state: State<AppState>) -> Json<MonthsResponse> {
    let ledger = state.ledger.read().await;
    Json(MonthsResponse {
        months: ledger.months().to_vec(),
        default_month: ledger.default_month().ok(),
    })
}

pub async fn api_month(state: State<AppState>, Path(month): Path<String>) -> ApiResult<Json<MonthReport>> {
    check_month(&month)?;
    let ledger = state.ledger.read().await;
    let aggregate = ledger.month_aggregate(&month)?;
    Ok(Json(MonthReport::new(aggregate)))
}

pub async fn api_month_flow(state: State<AppState>, Path(month): Path<String>) -> ApiResult<Json<FlowGraph>> {
    check_month(&month)?;
    let ledger = state.ledger.read().await;
    Ok(Json(ledger.flow_graph(&month)?))
}

pub async fn api_month_score(state: State<AppState>, Path(month): Path<String>) -> ApiResult<Json<ScoreResponse>> {
    check_month(&month)?;
    let ledger = state.ledger.read().await;
    let report = ledger.score_report(&month)?;
    let grade = report.grade();
    Ok(Json(ScoreResponse { report, grade }))
}

pub async fn api_month_net_worth(
    state: State<AppState>,
    Path(month): Path<String>,
) -> ApiResult<Json<NetWorthSnapshot>> {
    check_month(&month)?;
    let ledger = state.ledger.read().await;
    Ok(Json(ledger.net_worth(&month)?))
}
