//! HTTP handlers for production planning endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::{ProductionPlan, ProductionPlanInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::recipe::SearchQuery;
use crate::services::production::PlanDetail;
use crate::services::ProductionService;
use crate::AppState;

pub async fn list_plans(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<ProductionPlan>>> {
    let service = ProductionService::new(state.store);
    Ok(Json(service.list(query.q.as_deref()).await?))
}

/// Get a plan with its items, required ingredients and financials
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PlanDetail>> {
    let service = ProductionService::new(state.store);
    Ok(Json(service.detail(id).await?))
}

pub async fn create_plan(
    State(state): State<AppState>,
    Json(input): Json<ProductionPlanInput>,
) -> AppResult<(StatusCode, Json<ProductionPlan>)> {
    let service = ProductionService::new(state.store);
    let plan = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn update_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProductionPlanInput>,
) -> AppResult<Json<ProductionPlan>> {
    let service = ProductionService::new(state.store);
    Ok(Json(service.update(id, input).await?))
}

pub async fn delete_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = ProductionService::new(state.store);
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
