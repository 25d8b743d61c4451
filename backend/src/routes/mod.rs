//! Route definitions for the bakery operations platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/ingredients", ingredient_routes())
        .nest("/recipes", recipe_routes())
        .nest("/production", production_routes())
        .nest("/reports", report_routes())
}

/// Ingredient inventory routes
fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_ingredients).post(handlers::create_ingredient),
        )
        .route(
            "/:id",
            get(handlers::get_ingredient)
                .put(handlers::update_ingredient)
                .delete(handlers::delete_ingredient),
        )
}

/// Recipe routes
fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_recipes).post(handlers::create_recipe))
        .route("/scan", post(handlers::scan_recipe))
        .route(
            "/:id",
            get(handlers::get_recipe)
                .put(handlers::update_recipe)
                .delete(handlers::delete_recipe),
        )
        .route("/:id/costing", get(handlers::get_recipe_costing))
}

/// Production planning routes
fn production_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_plans).post(handlers::create_plan))
        .route(
            "/:id",
            get(handlers::get_plan)
                .put(handlers::update_plan)
                .delete(handlers::delete_plan),
        )
}

/// Reporting routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/overview", get(handlers::get_overview))
        .route("/production/:id", get(handlers::get_production_report))
        .route("/inventory", get(handlers::get_inventory_report))
        .route("/recipes", get(handlers::get_recipe_costing_report))
        .route("/export/xero", post(handlers::export_to_xero))
}
