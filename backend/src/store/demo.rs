//! In-memory fixture store used when no database is configured
//!
//! Reads are served from a fixed set of ingredients, recipes and plans. Writes are
//! accepted and echoed back with a placeholder id but nothing is kept. Deleting an
//! ingredient a recipe uses, or a recipe a plan uses, is refused with the same conflict
//! the database foreign keys raise.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    BillOfMaterialsLine, Ingredient, IngredientInput, IngredientSnapshot, PlanStatus,
    ProductionItem, ProductionLine, ProductionPlan, ProductionPlanInput, Recipe,
    RecipeIngredient, RecipeInput,
};
use uuid::Uuid;

use super::BakeryStore;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct DemoStore {
    ingredients: Vec<Ingredient>,
    recipes: Vec<Recipe>,
    recipe_lines: Vec<RecipeIngredient>,
    plans: Vec<ProductionPlan>,
    items: Vec<ProductionItem>,
}

impl DemoStore {
    pub const FLOUR: Uuid = Uuid::from_u128(0x101);
    pub const SUGAR: Uuid = Uuid::from_u128(0x102);
    pub const BUTTER: Uuid = Uuid::from_u128(0x103);
    pub const CHOCOLATE_CAKE: Uuid = Uuid::from_u128(0x201);
    pub const VANILLA_CUPCAKES: Uuid = Uuid::from_u128(0x202);
    pub const WEEKEND_SPECIAL: Uuid = Uuid::from_u128(0x301);
    pub const CORPORATE_ORDER: Uuid = Uuid::from_u128(0x302);

    /// Build the fixture with every plan dated today
    pub fn new() -> Self {
        Self::with_date(Utc::now().date_naive())
    }

    pub fn with_date(date: NaiveDate) -> Self {
        let now = Utc::now();

        let ingredients = vec![
            ingredient(Self::FLOUR, "Flour", Decimal::new(155, 1), 25, 10, now),
            ingredient(Self::SUGAR, "Sugar", Decimal::new(220, 1), 20, 8, now),
            ingredient(Self::BUTTER, "Butter", Decimal::new(1200, 1), 5, 10, now),
        ];

        let recipes = vec![
            Recipe {
                id: Self::CHOCOLATE_CAKE,
                name: "Chocolate Cake".to_string(),
                description: "Rich chocolate cake".to_string(),
                instructions: "Mix and bake".to_string(),
                selling_price: Decimal::new(250, 0),
                created_at: now,
                updated_at: now,
            },
            Recipe {
                id: Self::VANILLA_CUPCAKES,
                name: "Vanilla Cupcakes".to_string(),
                description: "Light and fluffy".to_string(),
                instructions: "Mix and bake in cups".to_string(),
                selling_price: Decimal::new(25, 0),
                created_at: now,
                updated_at: now,
            },
        ];

        let recipe_lines = vec![
            RecipeIngredient {
                id: Uuid::from_u128(0x401),
                recipe_id: Self::CHOCOLATE_CAKE,
                ingredient_id: Self::FLOUR,
                quantity: Decimal::new(2, 0),
            },
            RecipeIngredient {
                id: Uuid::from_u128(0x402),
                recipe_id: Self::CHOCOLATE_CAKE,
                ingredient_id: Self::SUGAR,
                quantity: Decimal::ONE,
            },
        ];

        let plans = vec![
            ProductionPlan {
                id: Self::WEEKEND_SPECIAL,
                name: "Weekend Special".to_string(),
                date,
                status: PlanStatus::Scheduled,
                notes: "For weekend".to_string(),
                created_at: now,
                updated_at: now,
            },
            ProductionPlan {
                id: Self::CORPORATE_ORDER,
                name: "Corporate Order".to_string(),
                date,
                status: PlanStatus::InProgress,
                notes: "For ABC Corp".to_string(),
                created_at: now,
                updated_at: now,
            },
        ];

        let items = vec![
            ProductionItem {
                id: Uuid::from_u128(0x501),
                production_plan_id: Self::WEEKEND_SPECIAL,
                recipe_id: Self::CHOCOLATE_CAKE,
                quantity: Decimal::new(5, 0),
            },
            ProductionItem {
                id: Uuid::from_u128(0x502),
                production_plan_id: Self::WEEKEND_SPECIAL,
                recipe_id: Self::VANILLA_CUPCAKES,
                quantity: Decimal::new(24, 0),
            },
        ];

        Self {
            ingredients,
            recipes,
            recipe_lines,
            plans,
            items,
        }
    }

    fn ingredient_by_id(&self, id: Uuid) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.id == id)
    }

    fn recipe_by_id(&self, id: Uuid) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    fn plan_by_id(&self, id: Uuid) -> Option<&ProductionPlan> {
        self.plans.iter().find(|p| p.id == id)
    }

    fn discarded_write(action: &str, resource: &str, id: Uuid) {
        tracing::warn!(
            "Demo store: {} of {} {} accepted but not persisted",
            action,
            resource,
            id
        );
    }
}

impl Default for DemoStore {
    fn default() -> Self {
        Self::new()
    }
}

fn ingredient(
    id: Uuid,
    name: &str,
    cost_per_unit: Decimal,
    stock: i64,
    min_stock: i64,
    now: DateTime<Utc>,
) -> Ingredient {
    Ingredient {
        id,
        name: name.to_string(),
        unit: "kg".to_string(),
        cost_per_unit,
        current_stock: Decimal::new(stock, 0),
        min_stock: Decimal::new(min_stock, 0),
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl BakeryStore for DemoStore {
    fn kind(&self) -> &'static str {
        "demo"
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn list_ingredients(&self, low_stock_only: bool) -> AppResult<Vec<Ingredient>> {
        let mut ingredients: Vec<Ingredient> = self
            .ingredients
            .iter()
            .filter(|i| !low_stock_only || i.is_low_stock())
            .cloned()
            .collect();
        ingredients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ingredients)
    }

    async fn get_ingredient(&self, id: Uuid) -> AppResult<Option<Ingredient>> {
        Ok(self.ingredient_by_id(id).cloned())
    }

    async fn create_ingredient(&self, input: &IngredientInput) -> AppResult<Ingredient> {
        Self::discarded_write("create", "ingredient", Uuid::nil());
        Ok(input.clone().into_ingredient(Uuid::nil(), Utc::now()))
    }

    async fn update_ingredient(
        &self,
        id: Uuid,
        input: &IngredientInput,
    ) -> AppResult<Option<Ingredient>> {
        let Some(existing) = self.ingredient_by_id(id) else {
            return Ok(None);
        };
        Self::discarded_write("update", "ingredient", id);
        Ok(Some(input.clone().into_ingredient(id, existing.created_at)))
    }

    async fn delete_ingredient(&self, id: Uuid) -> AppResult<bool> {
        if self.recipe_lines.iter().any(|line| line.ingredient_id == id) {
            return Err(AppError::referenced("Ingredient"));
        }
        let exists = self.ingredient_by_id(id).is_some();
        if exists {
            Self::discarded_write("delete", "ingredient", id);
        }
        Ok(exists)
    }

    async fn list_recipes(&self) -> AppResult<Vec<Recipe>> {
        let mut recipes = self.recipes.clone();
        recipes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(recipes)
    }

    async fn get_recipe(&self, id: Uuid) -> AppResult<Option<Recipe>> {
        Ok(self.recipe_by_id(id).cloned())
    }

    async fn recipe_lines(&self, recipe_id: Uuid) -> AppResult<Vec<RecipeIngredient>> {
        Ok(self
            .recipe_lines
            .iter()
            .filter(|line| line.recipe_id == recipe_id)
            .cloned()
            .collect())
    }

    async fn create_recipe(&self, input: &RecipeInput) -> AppResult<Recipe> {
        Self::discarded_write("create", "recipe", Uuid::nil());
        Ok(input.to_recipe(Uuid::nil(), Utc::now()))
    }

    async fn update_recipe(&self, id: Uuid, input: &RecipeInput) -> AppResult<Option<Recipe>> {
        let Some(existing) = self.recipe_by_id(id) else {
            return Ok(None);
        };
        Self::discarded_write("update", "recipe", id);
        Ok(Some(input.to_recipe(id, existing.created_at)))
    }

    async fn delete_recipe(&self, id: Uuid) -> AppResult<bool> {
        if self.items.iter().any(|item| item.recipe_id == id) {
            return Err(AppError::referenced("Recipe"));
        }
        let exists = self.recipe_by_id(id).is_some();
        if exists {
            Self::discarded_write("delete", "recipe", id);
        }
        Ok(exists)
    }

    async fn bill_of_materials(&self, recipe_ids: &[Uuid]) -> AppResult<Vec<BillOfMaterialsLine>> {
        Ok(self
            .recipe_lines
            .iter()
            .filter(|line| recipe_ids.contains(&line.recipe_id))
            .filter_map(|line| {
                self.ingredient_by_id(line.ingredient_id)
                    .map(|ingredient| BillOfMaterialsLine {
                        recipe_id: line.recipe_id,
                        ingredient: IngredientSnapshot::from(ingredient),
                        quantity: line.quantity,
                    })
            })
            .collect())
    }

    async fn list_plans(&self, limit: Option<i64>) -> AppResult<Vec<ProductionPlan>> {
        let mut plans = self.plans.clone();
        plans.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(limit) = limit {
            plans.truncate(usize::try_from(limit).unwrap_or(0));
        }
        Ok(plans)
    }

    async fn count_plans(&self, status: Option<PlanStatus>) -> AppResult<i64> {
        let count = self
            .plans
            .iter()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .count();
        Ok(count as i64)
    }

    async fn get_plan(&self, id: Uuid) -> AppResult<Option<ProductionPlan>> {
        Ok(self.plan_by_id(id).cloned())
    }

    async fn plan_lines(&self, plan_id: Uuid) -> AppResult<Vec<ProductionLine>> {
        Ok(self
            .items
            .iter()
            .filter(|item| item.production_plan_id == plan_id)
            .filter_map(|item| {
                self.recipe_by_id(item.recipe_id).map(|recipe| ProductionLine {
                    id: item.id,
                    recipe: recipe.summary(),
                    quantity: item.quantity,
                })
            })
            .collect())
    }

    async fn create_plan(&self, input: &ProductionPlanInput) -> AppResult<ProductionPlan> {
        Self::discarded_write("create", "production plan", Uuid::nil());
        Ok(input.to_plan(Uuid::nil(), Utc::now()))
    }

    async fn update_plan(
        &self,
        id: Uuid,
        input: &ProductionPlanInput,
    ) -> AppResult<Option<ProductionPlan>> {
        let Some(existing) = self.plan_by_id(id) else {
            return Ok(None);
        };
        Self::discarded_write("update", "production plan", id);
        Ok(Some(input.to_plan(id, existing.created_at)))
    }

    async fn delete_plan(&self, id: Uuid) -> AppResult<bool> {
        let exists = self.plan_by_id(id).is_some();
        if exists {
            Self::discarded_write("delete", "production plan", id);
        }
        Ok(exists)
    }
}
