//! Production planning service

use std::collections::HashSet;

use serde::Serialize;
use shared::{
    validate_plan_amounts, PlanRequirements, ProductionLine, ProductionPlan, ProductionPlanInput,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::SharedStore;

#[derive(Clone)]
pub struct ProductionService {
    store: SharedStore,
}

/// A plan with its items, consolidated ingredient requirements and financials
#[derive(Debug, Clone, Serialize)]
pub struct PlanDetail {
    #[serde(flatten)]
    pub plan: ProductionPlan,
    pub items: Vec<ProductionLine>,
    #[serde(flatten)]
    pub requirements: PlanRequirements,
}

impl ProductionService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// List plans newest first, filtered by name or notes
    pub async fn list(&self, query: Option<&str>) -> AppResult<Vec<ProductionPlan>> {
        let plans = self.store.list_plans(None).await?;

        Ok(match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => plans.into_iter().filter(|p| p.matches(q)).collect(),
            None => plans,
        })
    }

    /// Load a plan and evaluate what it needs from stock
    pub async fn detail(&self, id: Uuid) -> AppResult<PlanDetail> {
        let plan = self
            .store
            .get_plan(id)
            .await?
            .ok_or_else(|| AppError::not_found("Production plan"))?;
        let items = self.store.plan_lines(id).await?;

        let mut recipe_ids: Vec<Uuid> = Vec::with_capacity(items.len());
        for item in &items {
            if !recipe_ids.contains(&item.recipe.id) {
                recipe_ids.push(item.recipe.id);
            }
        }
        let bill_of_materials = self.store.bill_of_materials(&recipe_ids).await?;

        let requirements = PlanRequirements::evaluate(&items, &bill_of_materials)?;
        if requirements.shortage_count > 0 {
            tracing::debug!(
                "Plan {} is short on {} ingredients",
                id,
                requirements.shortage_count
            );
        }

        Ok(PlanDetail {
            plan,
            items,
            requirements,
        })
    }

    pub async fn create(&self, input: ProductionPlanInput) -> AppResult<ProductionPlan> {
        self.check_input(&input).await?;

        let plan = self.store.create_plan(&input).await?;
        tracing::info!(
            "Created production plan {} ({}) for {}",
            plan.name,
            plan.id,
            plan.date
        );

        Ok(plan)
    }

    /// Overwrite a plan and replace all of its items
    pub async fn update(&self, id: Uuid, input: ProductionPlanInput) -> AppResult<ProductionPlan> {
        self.check_input(&input).await?;

        let plan = self
            .store
            .update_plan(id, &input)
            .await?
            .ok_or_else(|| AppError::not_found("Production plan"))?;
        tracing::info!("Updated production plan {} ({})", id, plan.status);

        Ok(plan)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete_plan(id).await? {
            return Err(AppError::not_found("Production plan"));
        }
        tracing::info!("Deleted production plan {}", id);
        Ok(())
    }

    async fn check_input(&self, input: &ProductionPlanInput) -> AppResult<()> {
        input.validate()?;
        validate_plan_amounts(input)?;

        let known: HashSet<Uuid> = self
            .store
            .list_recipes()
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();

        if let Some(i) = input
            .items
            .iter()
            .position(|item| !known.contains(&item.recipe_id))
        {
            return Err(AppError::validation(
                format!("items[{}].recipe_id", i),
                "Unknown recipe",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DemoStore;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use shared::{PlanStatus, ProductionItemInput};
    use std::sync::Arc;

    fn service() -> ProductionService {
        ProductionService::new(Arc::new(DemoStore::new()))
    }

    fn wedding(recipe_id: Uuid) -> ProductionPlanInput {
        ProductionPlanInput {
            name: "Wedding".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            status: PlanStatus::Draft,
            notes: String::new(),
            items: vec![ProductionItemInput {
                recipe_id,
                quantity: Decimal::new(3, 0),
            }],
        }
    }

    #[tokio::test]
    async fn test_weekend_special_detail() {
        let detail = service().detail(DemoStore::WEEKEND_SPECIAL).await.unwrap();

        assert_eq!(detail.items.len(), 2);
        assert_eq!(detail.requirements.required_ingredients.len(), 2);
        assert_eq!(detail.requirements.financials.total_value, Decimal::new(1850, 0));
        assert_eq!(detail.requirements.financials.total_cost, Decimal::new(265, 0));
        assert_eq!(detail.requirements.financials.profit, Decimal::new(1585, 0));
        assert_eq!(detail.requirements.shortage_count, 0);
    }

    #[tokio::test]
    async fn test_plan_without_items_has_zero_margin() {
        let detail = service().detail(DemoStore::CORPORATE_ORDER).await.unwrap();

        assert!(detail.items.is_empty());
        assert!(detail.requirements.required_ingredients.is_empty());
        assert_eq!(detail.requirements.financials.profit_margin, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_detail_serializes_flat() {
        let detail = service().detail(DemoStore::WEEKEND_SPECIAL).await.unwrap();
        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["name"], "Weekend Special");
        assert_eq!(json["status"], "scheduled");
        assert!(json["required_ingredients"].is_array());
        assert!(json["financials"]["total_value"].is_string());
    }

    #[tokio::test]
    async fn test_search_by_notes() {
        let found = service().list(Some("abc corp")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, DemoStore::CORPORATE_ORDER);
    }

    #[tokio::test]
    async fn test_unknown_plan_is_not_found() {
        let result = service().detail(Uuid::from_u128(0xbad)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_recipe() {
        let result = service().create(wedding(Uuid::from_u128(0xbad))).await;
        match result {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "items[0].recipe_id"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_existing_plan() {
        let plan = service()
            .update(DemoStore::CORPORATE_ORDER, wedding(DemoStore::CHOCOLATE_CAKE))
            .await
            .unwrap();
        assert_eq!(plan.id, DemoStore::CORPORATE_ORDER);
        assert_eq!(plan.name, "Wedding");
    }
}
