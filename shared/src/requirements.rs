//! Production requirements aggregation
//!
//! Consolidates the ingredient quantities a production plan needs across all of its
//! line items, flags shortages against stock on hand, and derives the plan's
//! sale value, ingredient cost, profit and margin.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{BillOfMaterialsLine, IngredientSnapshot, ProductionLine};

/// A quantity or money total left the range a `Decimal` can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} is too large to compute")]
pub struct AmountOverflow(pub &'static str);

/// Total quantity of one ingredient needed by a plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequiredIngredient {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub cost_per_unit: Decimal,
    pub current_stock: Decimal,
    pub quantity: Decimal,
    /// Required quantity strictly exceeds stock on hand
    pub shortage: bool,
}

impl RequiredIngredient {
    fn seed(ingredient: &IngredientSnapshot, quantity: Decimal) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.clone(),
            unit: ingredient.unit.clone(),
            cost_per_unit: ingredient.cost_per_unit,
            current_stock: ingredient.current_stock,
            quantity,
            shortage: false,
        }
    }

    pub fn is_shortage(&self) -> bool {
        self.quantity > self.current_stock
    }

    /// `None` when the product does not fit in a `Decimal`
    pub fn line_cost(&self) -> Option<Decimal> {
        self.cost_per_unit.checked_mul(self.quantity)
    }

    /// Quantity with two-decimal precision followed by the unit, e.g. "1.25 kg"
    pub fn quantity_display(&self) -> String {
        format!("{:.2} {}", self.quantity.round_dp(2), self.unit)
            .trim_end()
            .to_string()
    }
}

/// Sum the per-unit bill of materials of every item into one record per ingredient.
///
/// Records come out in the order each ingredient was first encountered while walking
/// `items` and, within an item, the matching `bill_of_materials` rows. Items without
/// matching rows and rows for recipes not in `items` contribute nothing.
/// Fails instead of panicking when a quantity overflows.
pub fn aggregate_requirements(
    items: &[ProductionLine],
    bill_of_materials: &[BillOfMaterialsLine],
) -> Result<Vec<RequiredIngredient>, AmountOverflow> {
    let mut required: Vec<RequiredIngredient> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for item in items {
        for row in bill_of_materials
            .iter()
            .filter(|row| row.recipe_id == item.recipe.id)
        {
            let quantity = row
                .quantity
                .checked_mul(item.quantity)
                .ok_or(AmountOverflow("required quantity"))?;
            match index.get(&row.ingredient.id) {
                Some(&position) => {
                    let total = &mut required[position].quantity;
                    *total = total
                        .checked_add(quantity)
                        .ok_or(AmountOverflow("required quantity"))?;
                }
                None => {
                    index.insert(row.ingredient.id, required.len());
                    required.push(RequiredIngredient::seed(&row.ingredient, quantity));
                }
            }
        }
    }

    for ingredient in &mut required {
        ingredient.shortage = ingredient.is_shortage();
    }

    Ok(required)
}

fn checked_total(
    mut amounts: impl Iterator<Item = Option<Decimal>>,
    what: &'static str,
) -> Result<Decimal, AmountOverflow> {
    amounts.try_fold(Decimal::ZERO, |total, amount| {
        amount
            .and_then(|amount| total.checked_add(amount))
            .ok_or(AmountOverflow(what))
    })
}

/// Monetary summary of a production plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlanFinancials {
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
    /// Profit as a percentage of total value; zero when there is no revenue
    pub profit_margin: Decimal,
}

impl PlanFinancials {
    pub fn compute(
        items: &[ProductionLine],
        required: &[RequiredIngredient],
    ) -> Result<Self, AmountOverflow> {
        let total_value = checked_total(items.iter().map(ProductionLine::line_value), "total value")?;
        let total_cost =
            checked_total(required.iter().map(RequiredIngredient::line_cost), "total cost")?;
        Self::from_totals(total_value, total_cost)
    }

    pub fn from_totals(total_value: Decimal, total_cost: Decimal) -> Result<Self, AmountOverflow> {
        let profit = total_value
            .checked_sub(total_cost)
            .ok_or(AmountOverflow("profit"))?;
        Ok(Self {
            total_value,
            total_cost,
            profit,
            profit_margin: margin_percent(profit, total_value)?,
        })
    }

    /// Margin rounded to one decimal place, as shown on reports
    pub fn margin_display(&self) -> String {
        format!("{:.1}%", self.profit_margin.round_dp(1))
    }
}

fn margin_percent(profit: Decimal, total_value: Decimal) -> Result<Decimal, AmountOverflow> {
    if total_value <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    profit
        .checked_div(total_value)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(AmountOverflow("profit margin"))
}

/// Everything a plan view needs: consolidated requirements plus financials
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanRequirements {
    pub required_ingredients: Vec<RequiredIngredient>,
    pub financials: PlanFinancials,
    pub shortage_count: usize,
}

impl PlanRequirements {
    pub fn evaluate(
        items: &[ProductionLine],
        bill_of_materials: &[BillOfMaterialsLine],
    ) -> Result<Self, AmountOverflow> {
        let required_ingredients = aggregate_requirements(items, bill_of_materials)?;
        let financials = PlanFinancials::compute(items, &required_ingredients)?;
        let shortage_count = required_ingredients.iter().filter(|r| r.shortage).count();

        Ok(Self {
            required_ingredients,
            financials,
            shortage_count,
        })
    }

    pub fn shortages(&self) -> impl Iterator<Item = &RequiredIngredient> {
        self.required_ingredients.iter().filter(|r| r.shortage)
    }
}
