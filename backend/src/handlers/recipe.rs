//! HTTP handlers for recipe endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{Recipe, RecipeCosting, RecipeDetail, RecipeInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::recipe::{ScanRecipeInput, ScanResult};
use crate::services::RecipeService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Recipe>>> {
    let service = RecipeService::new(state.store);
    Ok(Json(service.list(query.q.as_deref()).await?))
}

/// Get a recipe with its bill of materials
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RecipeDetail>> {
    let service = RecipeService::new(state.store);
    Ok(Json(service.get(id).await?))
}

pub async fn create_recipe(
    State(state): State<AppState>,
    Json(input): Json<RecipeInput>,
) -> AppResult<(StatusCode, Json<Recipe>)> {
    let service = RecipeService::new(state.store);
    let recipe = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<RecipeInput>,
) -> AppResult<Json<Recipe>> {
    let service = RecipeService::new(state.store);
    Ok(Json(service.update(id, input).await?))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = RecipeService::new(state.store);
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Unit cost and margin of a recipe
pub async fn get_recipe_costing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RecipeCosting>> {
    let service = RecipeService::new(state.store);
    Ok(Json(service.costing(id).await?))
}

/// Suggest a recipe from pasted text without saving it
pub async fn scan_recipe(
    State(state): State<AppState>,
    Json(input): Json<ScanRecipeInput>,
) -> AppResult<Json<ScanResult>> {
    let service = RecipeService::new(state.store);
    Ok(Json(service.scan(input).await?))
}
