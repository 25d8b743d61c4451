//! Reporting service for dashboards and data export
//! Provides summary counts, production and inventory reports, and CSV output

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{AmountOverflow, PlanStatus, ProductionPlan};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::production::{PlanDetail, ProductionService};
use crate::store::SharedStore;

/// Number of plans shown on the overview
const RECENT_PLAN_LIMIT: i64 = 5;

#[derive(Clone)]
pub struct ReportingService {
    store: SharedStore,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub ingredient_count: usize,
    pub recipe_count: usize,
    pub plan_count: i64,
    pub low_stock_count: usize,
}

/// Reports overview: counts plus the most recent plans
#[derive(Debug, Serialize)]
pub struct ReportsOverview {
    pub ingredient_count: usize,
    pub recipe_count: usize,
    pub completed_plan_count: i64,
    pub recent_plans: Vec<ProductionPlan>,
}

/// Printable production report for one plan
#[derive(Debug, Serialize)]
pub struct ProductionReport {
    pub report_date: NaiveDate,
    #[serde(flatten)]
    pub detail: PlanDetail,
}

/// One CSV row of a production report
#[derive(Debug, Serialize)]
pub struct ProductionReportRow {
    pub ingredient: String,
    pub required: String,
    pub in_stock: Decimal,
    pub cost_per_unit: Decimal,
    pub total_cost: Decimal,
    pub status: &'static str,
}

/// Stock level and value of one ingredient
#[derive(Debug, Serialize)]
pub struct InventoryReportLine {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub current_stock: Decimal,
    pub min_stock: Decimal,
    pub cost_per_unit: Decimal,
    pub stock_value: Decimal,
    pub low_stock: bool,
}

#[derive(Debug, Serialize)]
pub struct InventoryReport {
    pub lines: Vec<InventoryReportLine>,
    pub total_value: Decimal,
    pub low_stock_count: usize,
}

impl ReportingService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Get dashboard metrics
    pub async fn get_dashboard_metrics(&self) -> AppResult<DashboardMetrics> {
        let ingredients = self.store.list_ingredients(false).await?;
        let recipes = self.store.list_recipes().await?;
        let plan_count = self.store.count_plans(None).await?;
        let low_stock_count = self.store.list_ingredients(true).await?.len();

        Ok(DashboardMetrics {
            ingredient_count: ingredients.len(),
            recipe_count: recipes.len(),
            plan_count,
            low_stock_count,
        })
    }

    pub async fn get_overview(&self) -> AppResult<ReportsOverview> {
        let ingredient_count = self.store.list_ingredients(false).await?.len();
        let recipe_count = self.store.list_recipes().await?.len();
        let completed_plan_count = self.store.count_plans(Some(PlanStatus::Completed)).await?;
        let recent_plans = self.store.list_plans(Some(RECENT_PLAN_LIMIT)).await?;

        Ok(ReportsOverview {
            ingredient_count,
            recipe_count,
            completed_plan_count,
            recent_plans,
        })
    }

    /// Production report dated today
    pub async fn get_production_report(&self, plan_id: Uuid) -> AppResult<ProductionReport> {
        let detail = ProductionService::new(self.store.clone())
            .detail(plan_id)
            .await?;

        Ok(ProductionReport {
            report_date: Utc::now().date_naive(),
            detail,
        })
    }

    /// Required-ingredient rows of a production report, for CSV export
    pub fn production_report_rows(report: &ProductionReport) -> AppResult<Vec<ProductionReportRow>> {
        report
            .detail
            .requirements
            .required_ingredients
            .iter()
            .map(|ingredient| -> AppResult<ProductionReportRow> {
                Ok(ProductionReportRow {
                    ingredient: ingredient.name.clone(),
                    required: ingredient.quantity_display(),
                    in_stock: ingredient.current_stock,
                    cost_per_unit: ingredient.cost_per_unit,
                    total_cost: ingredient
                        .line_cost()
                        .ok_or(AmountOverflow("ingredient cost"))?,
                    status: if ingredient.shortage { "Shortage" } else { "OK" },
                })
            })
            .collect()
    }

    pub async fn get_inventory_report(&self) -> AppResult<InventoryReport> {
        let ingredients = self.store.list_ingredients(false).await?;

        let mut lines = Vec::with_capacity(ingredients.len());
        let mut total_value = Decimal::ZERO;
        for i in ingredients {
            let stock_value = i.stock_value().ok_or(AmountOverflow("stock value"))?;
            total_value = total_value
                .checked_add(stock_value)
                .ok_or(AmountOverflow("inventory value"))?;
            lines.push(InventoryReportLine {
                stock_value,
                low_stock: i.is_low_stock(),
                id: i.id,
                name: i.name,
                unit: i.unit,
                current_stock: i.current_stock,
                min_stock: i.min_stock,
                cost_per_unit: i.cost_per_unit,
            });
        }

        Ok(InventoryReport {
            total_value,
            low_stock_count: lines.iter().filter(|l| l.low_stock).count(),
            lines,
        })
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
    }
}
