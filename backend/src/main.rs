//! Bakery Operations Platform - Backend Server
//!
//! Ingredient inventory, recipes with bills of materials, production planning and
//! reporting for a small bakery.

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;
mod store;

pub use config::Config;

use external::{AccountingExporter, MockXeroExporter};
use store::{DemoStore, PgStore, SharedStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: Arc<Config>,
    pub exporter: Arc<dyn AccountingExporter>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    // Initialize tracing
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "bakery_server=debug,tower_http=debug,sqlx=warn".into()),
    );
    if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Bakery Operations Server");
    tracing::info!("Environment: {}", config.environment);

    let store = connect_store(&config).await?;
    tracing::info!("Using {} store", store.kind());

    // Create application state
    let state = AppState {
        store,
        exporter: Arc::new(MockXeroExporter::from_config(&config.accounting)),
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Pick the data store: PostgreSQL when a URL is configured, the demo fixture otherwise
async fn connect_store(config: &Config) -> anyhow::Result<SharedStore> {
    let url = match config.database.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url,
        _ => {
            if config.is_production() {
                anyhow::bail!(error::AppError::Configuration(
                    "database.url is required in production".to_string()
                ));
            }
            tracing::warn!("No database URL configured, serving demo data; writes are not saved");
            return Ok(Arc::new(DemoStore::new()));
        }
    };

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    Ok(Arc::new(PgStore::new(db_pool)))
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Bakery Operations Platform API v1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let config = Config::default();
        create_app(AppState {
            store: Arc::new(DemoStore::new()),
            exporter: Arc::new(MockXeroExporter::new(Duration::ZERO)),
            config: Arc::new(config),
        })
    }

    async fn send(request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let (status, body) = send(Request::get(uri).body(Body::empty()).unwrap()).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn send_json(method: Method, uri: &str, payload: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        let (status, body) = send(request).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health_reports_demo_store() {
        let (status, body) = get_json("/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["store"], "demo");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_low_stock_filter() {
        let (status, body) = get_json("/api/v1/ingredients?filter=low").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Butter"]);
    }

    #[tokio::test]
    async fn test_plan_detail_includes_requirements() {
        let uri = format!("/api/v1/production/{}", DemoStore::WEEKEND_SPECIAL);
        let (status, body) = get_json(&uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Weekend Special");
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["required_ingredients"][0]["name"], "Flour");
        assert_eq!(body["shortage_count"], 0);
    }

    #[tokio::test]
    async fn test_unknown_plan_is_404() {
        let uri = format!("/api/v1/production/{}", uuid::Uuid::from_u128(0xbad));
        let (status, body) = get_json(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_create_ingredient_validation_error() {
        let (status, body) = send_json(
            Method::POST,
            "/api/v1/ingredients",
            json!({
                "name": "Eggs",
                "unit": "dozen",
                "cost_per_unit": "-1",
                "current_stock": "12",
                "min_stock": "4"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "cost_per_unit");
    }

    #[tokio::test]
    async fn test_create_plan_returns_created() {
        let (status, body) = send_json(
            Method::POST,
            "/api/v1/production",
            json!({
                "name": "Bake Sale",
                "date": "2024-06-01",
                "status": "scheduled",
                "items": [{ "recipe_id": DemoStore::CHOCOLATE_CAKE, "quantity": "3" }]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "scheduled");
    }

    #[tokio::test]
    async fn test_create_plan_accepts_any_status_casing() {
        let (status, body) = send_json(
            Method::POST,
            "/api/v1/production",
            json!({
                "name": "Bake Sale",
                "date": "2024-06-01",
                "status": "In_Progress",
                "items": [{ "recipe_id": DemoStore::CHOCOLATE_CAKE, "quantity": "3" }]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "in progress");
    }

    #[tokio::test]
    async fn test_create_plan_rejects_unstorable_quantity() {
        let (status, body) = send_json(
            Method::POST,
            "/api/v1/production",
            json!({
                "name": "Bake Sale",
                "date": "2024-06-01",
                "status": "Scheduled",
                "items": [{ "recipe_id": DemoStore::CHOCOLATE_CAKE, "quantity": "0.00001" }]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "items[0].quantity");
        assert_eq!(body["error"]["message"], "Use at most 4 decimal places.");
    }

    #[tokio::test]
    async fn test_delete_ingredient_in_use_conflicts() {
        let uri = format!("/api/v1/ingredients/{}", DemoStore::FLOUR);
        let (status, body) = send_json(Method::DELETE, &uri, Value::Null).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");

        let uri = format!("/api/v1/ingredients/{}", DemoStore::BUTTER);
        let (status, _) = send_json(Method::DELETE, &uri, Value::Null).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_scan_recipe() {
        let (status, body) = send_json(
            Method::POST,
            "/api/v1/recipes/scan",
            json!({ "text": "Sugar Cookies\nIngredients\n1 cup sugar\nInstructions\nBake" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["extracted"]["name"], "Sugar Cookies");
        assert_eq!(body["matched_count"], 1);
    }

    #[tokio::test]
    async fn test_production_report_csv() {
        let uri = format!(
            "/api/v1/reports/production/{}?format=csv",
            DemoStore::WEEKEND_SPECIAL
        );
        let response = app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).starts_with("ingredient,required"));
    }

    #[tokio::test]
    async fn test_dashboard_and_export() {
        let (status, body) = get_json("/api/v1/reports/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["low_stock_count"], 1);

        let (status, body) = send_json(Method::POST, "/api/v1/reports/export/xero", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["mocked"], true);
    }
}
