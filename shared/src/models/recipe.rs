//! Recipe and bill-of-materials models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::contains_ignore_case;

/// A sellable recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub selling_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    pub fn matches(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query) || contains_ignore_case(&self.description, query)
    }

    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            name: self.name.clone(),
            selling_price: self.selling_price,
        }
    }
}

/// The recipe fields a production line needs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub name: String,
    pub selling_price: Decimal,
}

/// One bill-of-materials line: `quantity` of the ingredient per unit of recipe output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeIngredient {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
}

/// A recipe together with its bill-of-materials lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredient>,
}

/// Input line for a recipe form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeIngredientInput {
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
}

/// Input for creating or fully overwriting a recipe and its lines
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecipeInput {
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    pub selling_price: Decimal,
    #[validate(length(min = 1, message = "Add at least one ingredient"))]
    pub ingredients: Vec<RecipeIngredientInput>,
}

impl RecipeInput {
    pub fn to_recipe(&self, id: Uuid, created_at: DateTime<Utc>) -> Recipe {
        Recipe {
            id,
            name: self.name.clone(),
            description: self.description.clone(),
            instructions: self.instructions.clone(),
            selling_price: self.selling_price,
            created_at,
            updated_at: Utc::now(),
        }
    }

    pub fn to_lines(&self, recipe_id: Uuid) -> Vec<RecipeIngredient> {
        self.ingredients
            .iter()
            .map(|line| RecipeIngredient {
                id: Uuid::new_v4(),
                recipe_id,
                ingredient_id: line.ingredient_id,
                quantity: line.quantity,
            })
            .collect()
    }
}

/// A bill-of-materials row joined with its ingredient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillOfMaterialsLine {
    pub recipe_id: Uuid,
    pub ingredient: super::IngredientSnapshot,
    pub quantity: Decimal,
}
