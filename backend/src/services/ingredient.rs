//! Ingredient inventory service

use shared::{validate_ingredient_amounts, CatalogEntry, Ingredient, IngredientInput};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::SharedStore;

/// Ingredient service for stock records and the parser catalog
#[derive(Clone)]
pub struct IngredientService {
    store: SharedStore,
}

impl IngredientService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// List ingredients by name, optionally filtered by a search term and to low stock only
    pub async fn list(&self, query: Option<&str>, low_stock_only: bool) -> AppResult<Vec<Ingredient>> {
        let ingredients = self.store.list_ingredients(low_stock_only).await?;

        Ok(match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => ingredients.into_iter().filter(|i| i.matches(q)).collect(),
            None => ingredients,
        })
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Ingredient> {
        self.store
            .get_ingredient(id)
            .await?
            .ok_or_else(|| AppError::not_found("Ingredient"))
    }

    pub async fn create(&self, input: IngredientInput) -> AppResult<Ingredient> {
        input.validate()?;
        validate_ingredient_amounts(&input)?;

        let ingredient = self.store.create_ingredient(&input).await?;
        tracing::info!("Created ingredient {} ({})", ingredient.name, ingredient.id);

        Ok(ingredient)
    }

    pub async fn update(&self, id: Uuid, input: IngredientInput) -> AppResult<Ingredient> {
        input.validate()?;
        validate_ingredient_amounts(&input)?;

        let ingredient = self
            .store
            .update_ingredient(id, &input)
            .await?
            .ok_or_else(|| AppError::not_found("Ingredient"))?;
        tracing::info!("Updated ingredient {}", id);

        Ok(ingredient)
    }

    /// Delete an ingredient. Fails with a conflict while a recipe still uses it.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete_ingredient(id).await? {
            return Err(AppError::not_found("Ingredient"));
        }
        tracing::info!("Deleted ingredient {}", id);
        Ok(())
    }

    /// Known ingredients for suggesting matches in scanned recipe text
    pub async fn catalog(&self) -> AppResult<Vec<CatalogEntry>> {
        let ingredients = self.store.list_ingredients(false).await?;
        Ok(ingredients.iter().map(CatalogEntry::from).collect())
    }
}
