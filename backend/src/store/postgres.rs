//! PostgreSQL store backed by sqlx

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    BillOfMaterialsLine, Ingredient, IngredientInput, IngredientSnapshot, PlanStatus,
    ProductionLine, ProductionPlan, ProductionPlanInput, Recipe, RecipeIngredient, RecipeInput,
    RecipeSummary,
};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::BakeryStore;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const INGREDIENT_COLUMNS: &str =
    "id, name, unit, cost_per_unit, current_stock, min_stock, created_at, updated_at";
const RECIPE_COLUMNS: &str =
    "id, name, description, instructions, selling_price, created_at, updated_at";
const PLAN_COLUMNS: &str = "id, name, date, status, notes, created_at, updated_at";

#[derive(Debug, FromRow)]
struct IngredientRow {
    id: Uuid,
    name: String,
    unit: String,
    cost_per_unit: Decimal,
    current_stock: Decimal,
    min_stock: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Ingredient {
            id: row.id,
            name: row.name,
            unit: row.unit,
            cost_per_unit: row.cost_per_unit,
            current_stock: row.current_stock,
            min_stock: row.min_stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct RecipeRow {
    id: Uuid,
    name: String,
    description: String,
    instructions: String,
    selling_price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Recipe {
            id: row.id,
            name: row.name,
            description: row.description,
            instructions: row.instructions,
            selling_price: row.selling_price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct RecipeIngredientRow {
    id: Uuid,
    recipe_id: Uuid,
    ingredient_id: Uuid,
    quantity: Decimal,
}

/// Row for the bill-of-materials join
#[derive(Debug, FromRow)]
struct BomRow {
    recipe_id: Uuid,
    ingredient_id: Uuid,
    name: String,
    unit: String,
    cost_per_unit: Decimal,
    current_stock: Decimal,
    quantity: Decimal,
}

#[derive(Debug, FromRow)]
struct PlanRow {
    id: Uuid,
    name: String,
    date: NaiveDate,
    status: String,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PlanRow> for ProductionPlan {
    type Error = AppError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<PlanStatus>()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(ProductionPlan {
            id: row.id,
            name: row.name,
            date: row.date,
            status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Row for the production items / recipes join
#[derive(Debug, FromRow)]
struct PlanLineRow {
    id: Uuid,
    quantity: Decimal,
    recipe_id: Uuid,
    recipe_name: String,
    selling_price: Decimal,
}

impl PgStore {
    async fn insert_recipe_lines(
        tx: &mut Transaction<'_, Postgres>,
        recipe_id: Uuid,
        input: &RecipeInput,
    ) -> AppResult<()> {
        for (position, line) in input.ingredients.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(recipe_id)
            .bind(line.ingredient_id)
            .bind(line.quantity)
            .bind(position as i32)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::from_write(e, "Ingredient"))?;
        }
        Ok(())
    }

    async fn insert_plan_items(
        tx: &mut Transaction<'_, Postgres>,
        plan_id: Uuid,
        input: &ProductionPlanInput,
    ) -> AppResult<()> {
        for (position, item) in input.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO production_items (production_plan_id, recipe_id, quantity, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(plan_id)
            .bind(item.recipe_id)
            .bind(item.quantity)
            .bind(position as i32)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::from_write(e, "Recipe"))?;
        }
        Ok(())
    }
}

#[async_trait]
impl BakeryStore for PgStore {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn list_ingredients(&self, low_stock_only: bool) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, IngredientRow>(&format!(
            r#"
            SELECT {INGREDIENT_COLUMNS}
            FROM ingredients
            WHERE ($1 = false OR current_stock < min_stock)
            ORDER BY name
            "#
        ))
        .bind(low_stock_only)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    async fn get_ingredient(&self, id: Uuid) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Ingredient::from))
    }

    async fn create_ingredient(&self, input: &IngredientInput) -> AppResult<Ingredient> {
        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            r#"
            INSERT INTO ingredients (name, unit, cost_per_unit, current_stock, min_stock)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {INGREDIENT_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.unit)
        .bind(input.cost_per_unit)
        .bind(input.current_stock)
        .bind(input.min_stock)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn update_ingredient(
        &self,
        id: Uuid,
        input: &IngredientInput,
    ) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query_as::<_, IngredientRow>(&format!(
            r#"
            UPDATE ingredients
            SET name = $1, unit = $2, cost_per_unit = $3, current_stock = $4, min_stock = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING {INGREDIENT_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.unit)
        .bind(input.cost_per_unit)
        .bind(input.current_stock)
        .bind(input.min_stock)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Ingredient::from))
    }

    async fn delete_ingredient(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "Ingredient"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_recipes(&self) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY name"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    async fn get_recipe(&self, id: Uuid) -> AppResult<Option<Recipe>> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Recipe::from))
    }

    async fn recipe_lines(&self, recipe_id: Uuid) -> AppResult<Vec<RecipeIngredient>> {
        let rows = sqlx::query_as::<_, RecipeIngredientRow>(
            r#"
            SELECT id, recipe_id, ingredient_id, quantity
            FROM recipe_ingredients
            WHERE recipe_id = $1
            ORDER BY position
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| RecipeIngredient {
                id: r.id,
                recipe_id: r.recipe_id,
                ingredient_id: r.ingredient_id,
                quantity: r.quantity,
            })
            .collect())
    }

    async fn create_recipe(&self, input: &RecipeInput) -> AppResult<Recipe> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            r#"
            INSERT INTO recipes (name, description, instructions, selling_price)
            VALUES ($1, $2, $3, $4)
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.instructions)
        .bind(input.selling_price)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_recipe_lines(&mut tx, row.id, input).await?;
        tx.commit().await?;

        Ok(row.into())
    }

    async fn update_recipe(&self, id: Uuid, input: &RecipeInput) -> AppResult<Option<Recipe>> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            r#"
            UPDATE recipes
            SET name = $1, description = $2, instructions = $3, selling_price = $4,
                updated_at = NOW()
            WHERE id = $5
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.instructions)
        .bind(input.selling_price)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::insert_recipe_lines(&mut tx, id, input).await?;
        tx.commit().await?;

        Ok(Some(row.into()))
    }

    async fn delete_recipe(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, "Recipe"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn bill_of_materials(&self, recipe_ids: &[Uuid]) -> AppResult<Vec<BillOfMaterialsLine>> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, BomRow>(
            r#"
            SELECT ri.recipe_id, i.id AS ingredient_id, i.name, i.unit, i.cost_per_unit,
                   i.current_stock, ri.quantity
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ANY($1)
            ORDER BY ri.recipe_id, ri.position
            "#,
        )
        .bind(recipe_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| BillOfMaterialsLine {
                recipe_id: r.recipe_id,
                ingredient: IngredientSnapshot {
                    id: r.ingredient_id,
                    name: r.name,
                    unit: r.unit,
                    cost_per_unit: r.cost_per_unit,
                    current_stock: r.current_stock,
                },
                quantity: r.quantity,
            })
            .collect())
    }

    async fn list_plans(&self, limit: Option<i64>) -> AppResult<Vec<ProductionPlan>> {
        let rows = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            SELECT {PLAN_COLUMNS}
            FROM production_plans
            ORDER BY date DESC, created_at DESC
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ProductionPlan::try_from).collect()
    }

    async fn count_plans(&self, status: Option<PlanStatus>) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM production_plans WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    async fn get_plan(&self, id: Uuid) -> AppResult<Option<ProductionPlan>> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM production_plans WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(ProductionPlan::try_from).transpose()
    }

    async fn plan_lines(&self, plan_id: Uuid) -> AppResult<Vec<ProductionLine>> {
        let rows = sqlx::query_as::<_, PlanLineRow>(
            r#"
            SELECT pi.id, pi.quantity, r.id AS recipe_id, r.name AS recipe_name, r.selling_price
            FROM production_items pi
            JOIN recipes r ON r.id = pi.recipe_id
            WHERE pi.production_plan_id = $1
            ORDER BY pi.position
            "#,
        )
        .bind(plan_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ProductionLine {
                id: r.id,
                recipe: RecipeSummary {
                    id: r.recipe_id,
                    name: r.recipe_name,
                    selling_price: r.selling_price,
                },
                quantity: r.quantity,
            })
            .collect())
    }

    async fn create_plan(&self, input: &ProductionPlanInput) -> AppResult<ProductionPlan> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            INSERT INTO production_plans (name, date, status, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(input.date)
        .bind(input.status.as_str())
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_plan_items(&mut tx, row.id, input).await?;
        tx.commit().await?;

        row.try_into()
    }

    async fn update_plan(
        &self,
        id: Uuid,
        input: &ProductionPlanInput,
    ) -> AppResult<Option<ProductionPlan>> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            UPDATE production_plans
            SET name = $1, date = $2, status = $3, notes = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(input.date)
        .bind(input.status.as_str())
        .bind(&input.notes)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM production_items WHERE production_plan_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::insert_plan_items(&mut tx, id, input).await?;
        tx.commit().await?;

        row.try_into().map(Some)
    }

    async fn delete_plan(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM production_plans WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
