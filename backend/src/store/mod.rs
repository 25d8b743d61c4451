//! Data access for the bakery tables
//!
//! Services depend on [`BakeryStore`] only. The concrete store is picked once at
//! startup: [`PgStore`] when a database URL is configured, [`DemoStore`] otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    BillOfMaterialsLine, Ingredient, IngredientInput, PlanStatus, ProductionLine,
    ProductionPlan, ProductionPlanInput, Recipe, RecipeIngredient, RecipeInput,
};
use uuid::Uuid;

use crate::error::AppResult;

mod demo;
mod postgres;

pub use demo::DemoStore;
pub use postgres::PgStore;

/// Store handle held by the application state and every service
pub type SharedStore = Arc<dyn BakeryStore>;

/// Select/insert/update/delete access to ingredients, recipes and production plans.
///
/// `get_*`, `update_*` return `None` and `delete_*` return `false` when the id does
/// not exist. Updates of recipes and plans replace all child lines.
#[async_trait]
pub trait BakeryStore: Send + Sync {
    /// Short name for logs and the health endpoint
    fn kind(&self) -> &'static str;

    async fn ping(&self) -> AppResult<()>;

    // Ingredients
    async fn list_ingredients(&self, low_stock_only: bool) -> AppResult<Vec<Ingredient>>;
    async fn get_ingredient(&self, id: Uuid) -> AppResult<Option<Ingredient>>;
    async fn create_ingredient(&self, input: &IngredientInput) -> AppResult<Ingredient>;
    async fn update_ingredient(
        &self,
        id: Uuid,
        input: &IngredientInput,
    ) -> AppResult<Option<Ingredient>>;
    async fn delete_ingredient(&self, id: Uuid) -> AppResult<bool>;

    // Recipes
    async fn list_recipes(&self) -> AppResult<Vec<Recipe>>;
    async fn get_recipe(&self, id: Uuid) -> AppResult<Option<Recipe>>;
    async fn recipe_lines(&self, recipe_id: Uuid) -> AppResult<Vec<RecipeIngredient>>;
    async fn create_recipe(&self, input: &RecipeInput) -> AppResult<Recipe>;
    async fn update_recipe(&self, id: Uuid, input: &RecipeInput) -> AppResult<Option<Recipe>>;
    async fn delete_recipe(&self, id: Uuid) -> AppResult<bool>;

    /// Bill-of-materials rows joined with their ingredient, for the given recipes
    async fn bill_of_materials(&self, recipe_ids: &[Uuid]) -> AppResult<Vec<BillOfMaterialsLine>>;

    // Production plans
    /// Plans ordered by date, newest first
    async fn list_plans(&self, limit: Option<i64>) -> AppResult<Vec<ProductionPlan>>;
    async fn count_plans(&self, status: Option<PlanStatus>) -> AppResult<i64>;
    async fn get_plan(&self, id: Uuid) -> AppResult<Option<ProductionPlan>>;
    /// Items of a plan joined with their recipe
    async fn plan_lines(&self, plan_id: Uuid) -> AppResult<Vec<ProductionLine>>;
    async fn create_plan(&self, input: &ProductionPlanInput) -> AppResult<ProductionPlan>;
    async fn update_plan(
        &self,
        id: Uuid,
        input: &ProductionPlanInput,
    ) -> AppResult<Option<ProductionPlan>>;
    async fn delete_plan(&self, id: Uuid) -> AppResult<bool>;
}
