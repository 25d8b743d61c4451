//! HTTP handlers for ingredient inventory endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{Ingredient, IngredientInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::IngredientService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct IngredientQuery {
    pub q: Option<String>,
    /// `low` restricts the list to ingredients below their minimum stock
    pub filter: Option<String>,
}

/// List ingredients
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientQuery>,
) -> AppResult<Json<Vec<Ingredient>>> {
    let service = IngredientService::new(state.store);
    let low_stock_only = query.filter.as_deref() == Some("low");
    let ingredients = service.list(query.q.as_deref(), low_stock_only).await?;
    Ok(Json(ingredients))
}

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Ingredient>> {
    let service = IngredientService::new(state.store);
    Ok(Json(service.get(id).await?))
}

pub async fn create_ingredient(
    State(state): State<AppState>,
    Json(input): Json<IngredientInput>,
) -> AppResult<(StatusCode, Json<Ingredient>)> {
    let service = IngredientService::new(state.store);
    let ingredient = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

pub async fn update_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<IngredientInput>,
) -> AppResult<Json<Ingredient>> {
    let service = IngredientService::new(state.store);
    Ok(Json(service.update(id, input).await?))
}

pub async fn delete_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = IngredientService::new(state.store);
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
