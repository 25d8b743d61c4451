//! Reporting handlers for dashboards and data export

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::RecipeCosting;
use uuid::Uuid;

use crate::error::AppResult;
use crate::external::ExportReceipt;
use crate::services::reporting::{DashboardMetrics, InventoryReport, ReportsOverview};
use crate::services::{RecipeService, ReportingService};
use crate::AppState;

#[derive(Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>, // "json" or "csv"
}

/// Get dashboard metrics
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardMetrics>> {
    let service = ReportingService::new(state.store);
    let metrics = service.get_dashboard_metrics().await?;
    Ok(Json(metrics))
}

pub async fn get_overview(State(state): State<AppState>) -> AppResult<Json<ReportsOverview>> {
    let service = ReportingService::new(state.store);
    Ok(Json(service.get_overview().await?))
}

/// Get a production report as JSON or CSV
pub async fn get_production_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.store);
    let report = service.get_production_report(id).await?;

    if query.format.as_deref() == Some("csv") {
        let rows = ReportingService::production_report_rows(&report)?;
        let csv = ReportingService::export_to_csv(&rows)?;
        let disposition = format!(
            "attachment; filename=\"production_report_{}.csv\"",
            report.detail.plan.date
        );
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(report).into_response())
    }
}

pub async fn get_inventory_report(
    State(state): State<AppState>,
) -> AppResult<Json<InventoryReport>> {
    let service = ReportingService::new(state.store);
    Ok(Json(service.get_inventory_report().await?))
}

/// Costing of every recipe
pub async fn get_recipe_costing_report(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RecipeCosting>>> {
    let service = RecipeService::new(state.store);
    Ok(Json(service.costing_all().await?))
}

/// Run the accounting export
pub async fn export_to_xero(State(state): State<AppState>) -> AppResult<Json<ExportReceipt>> {
    let receipt = state.exporter.export().await?;
    tracing::info!("Accounting export to {} finished", receipt.provider);
    Ok(Json(receipt))
}
