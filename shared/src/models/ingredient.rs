//! Ingredient inventory models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::contains_ignore_case;

/// An ingredient held in stock
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    /// Free-text unit of measure (e.g. "kg"); never converted
    pub unit: String,
    pub cost_per_unit: Decimal,
    pub current_stock: Decimal,
    /// Reorder threshold, in the same unit as `current_stock`
    pub min_stock: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    pub fn is_low_stock(&self) -> bool {
        self.current_stock < self.min_stock
    }

    /// Value of the stock on hand at the current unit cost, `None` on overflow
    pub fn stock_value(&self) -> Option<Decimal> {
        self.current_stock.checked_mul(self.cost_per_unit)
    }

    pub fn matches(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query)
    }
}

/// Input for creating or fully overwriting an ingredient
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IngredientInput {
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    pub name: String,
    #[validate(length(min = 1, message = "Unit is required."))]
    pub unit: String,
    pub cost_per_unit: Decimal,
    pub current_stock: Decimal,
    pub min_stock: Decimal,
}

impl IngredientInput {
    /// Materialize the input as an ingredient with the given id and timestamps
    pub fn into_ingredient(self, id: Uuid, created_at: DateTime<Utc>) -> Ingredient {
        Ingredient {
            id,
            name: self.name,
            unit: self.unit,
            cost_per_unit: self.cost_per_unit,
            current_stock: self.current_stock,
            min_stock: self.min_stock,
            created_at,
            updated_at: Utc::now(),
        }
    }
}

/// The ingredient attributes the requirements aggregator carries along
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientSnapshot {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub cost_per_unit: Decimal,
    pub current_stock: Decimal,
}

impl From<&Ingredient> for IngredientSnapshot {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.clone(),
            unit: ingredient.unit.clone(),
            cost_per_unit: ingredient.cost_per_unit,
            current_stock: ingredient.current_stock,
        }
    }
}
