//! Recipe service: recipes with their bill of materials, costing and text scanning

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use shared::{
    cost_recipe, extract_recipe, validate_recipe_amounts, CatalogEntry, ExtractedRecipe, Recipe,
    RecipeCosting, RecipeDetail, RecipeInput,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::SharedStore;

#[derive(Clone)]
pub struct RecipeService {
    store: SharedStore,
}

/// Input for scanning pasted recipe text
#[derive(Debug, Deserialize)]
pub struct ScanRecipeInput {
    pub text: String,
}

/// Suggested recipe from scanned text. Nothing is saved until the draft is submitted
/// as a regular recipe.
#[derive(Debug, Serialize)]
pub struct ScanResult {
    pub extracted: ExtractedRecipe,
    pub matched_count: usize,
    pub draft: RecipeInput,
}

impl RecipeService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// List recipes by name, filtered by name or description
    pub async fn list(&self, query: Option<&str>) -> AppResult<Vec<Recipe>> {
        let recipes = self.store.list_recipes().await?;

        Ok(match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => recipes.into_iter().filter(|r| r.matches(q)).collect(),
            None => recipes,
        })
    }

    /// Get a recipe with its bill-of-materials lines
    pub async fn get(&self, id: Uuid) -> AppResult<RecipeDetail> {
        let recipe = self
            .store
            .get_recipe(id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))?;
        let ingredients = self.store.recipe_lines(id).await?;

        Ok(RecipeDetail { recipe, ingredients })
    }

    pub async fn create(&self, input: RecipeInput) -> AppResult<Recipe> {
        self.check_input(&input).await?;

        let recipe = self.store.create_recipe(&input).await?;
        tracing::info!(
            "Created recipe {} ({}) with {} ingredients",
            recipe.name,
            recipe.id,
            input.ingredients.len()
        );

        Ok(recipe)
    }

    /// Overwrite a recipe and replace all of its lines
    pub async fn update(&self, id: Uuid, input: RecipeInput) -> AppResult<Recipe> {
        self.check_input(&input).await?;

        let recipe = self
            .store
            .update_recipe(id, &input)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))?;
        tracing::info!("Updated recipe {}", id);

        Ok(recipe)
    }

    /// Delete a recipe and its lines. Fails with a conflict while a plan still uses it.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete_recipe(id).await? {
            return Err(AppError::not_found("Recipe"));
        }
        tracing::info!("Deleted recipe {}", id);
        Ok(())
    }

    /// Unit cost and margin of one recipe
    pub async fn costing(&self, id: Uuid) -> AppResult<RecipeCosting> {
        let recipe = self
            .store
            .get_recipe(id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))?;
        let bill_of_materials = self.store.bill_of_materials(&[id]).await?;

        Ok(cost_recipe(&recipe.summary(), &bill_of_materials)?)
    }

    /// Unit cost and margin of every recipe, in name order
    pub async fn costing_all(&self) -> AppResult<Vec<RecipeCosting>> {
        let recipes = self.store.list_recipes().await?;
        let ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
        let bill_of_materials = self.store.bill_of_materials(&ids).await?;

        recipes
            .iter()
            .map(|recipe| cost_recipe(&recipe.summary(), &bill_of_materials).map_err(AppError::from))
            .collect()
    }

    /// Suggest a recipe from pasted text, matched against the ingredient catalog
    pub async fn scan(&self, input: ScanRecipeInput) -> AppResult<ScanResult> {
        let ingredients = self.store.list_ingredients(false).await?;
        let catalog: Vec<CatalogEntry> = ingredients.iter().map(CatalogEntry::from).collect();

        let extracted = extract_recipe(&input.text, &catalog)
            .ok_or_else(|| AppError::validation("text", "No recipe text to scan"))?;
        let matched_count = extracted.matched_count();
        tracing::debug!(
            "Scanned recipe {}: {} of {} lines matched",
            extracted.name,
            matched_count,
            extracted.ingredients.len()
        );

        Ok(ScanResult {
            draft: extracted.clone().into_recipe_input(),
            matched_count,
            extracted,
        })
    }

    async fn check_input(&self, input: &RecipeInput) -> AppResult<()> {
        input.validate()?;
        validate_recipe_amounts(input)?;

        let known: HashSet<Uuid> = self
            .store
            .list_ingredients(false)
            .await?
            .into_iter()
            .map(|i| i.id)
            .collect();

        if let Some(i) = input
            .ingredients
            .iter()
            .position(|line| !known.contains(&line.ingredient_id))
        {
            return Err(AppError::validation(
                format!("ingredients[{}].ingredient_id", i),
                "Unknown ingredient",
            ));
        }
        Ok(())
    }
}
