//! Per-recipe cost analysis

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{BillOfMaterialsLine, ProductionLine, RecipeSummary};
use crate::requirements::{aggregate_requirements, AmountOverflow, PlanFinancials, RequiredIngredient};

/// Ingredient cost and margin of producing one unit of a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeCosting {
    pub recipe_id: Uuid,
    pub name: String,
    pub selling_price: Decimal,
    pub unit_cost: Decimal,
    pub profit: Decimal,
    pub profit_margin: Decimal,
    pub lines: Vec<RequiredIngredient>,
}

/// Cost a single unit of `recipe`. This is the plan aggregation for one item of
/// quantity 1, so rows for other recipes are ignored the same way.
pub fn cost_recipe(
    recipe: &RecipeSummary,
    bill_of_materials: &[BillOfMaterialsLine],
) -> Result<RecipeCosting, AmountOverflow> {
    let unit = [ProductionLine {
        id: recipe.id,
        recipe: recipe.clone(),
        quantity: Decimal::ONE,
    }];
    let lines = aggregate_requirements(&unit, bill_of_materials)?;
    let financials = PlanFinancials::compute(&unit, &lines)?;

    Ok(RecipeCosting {
        recipe_id: recipe.id,
        name: recipe.name.clone(),
        selling_price: recipe.selling_price,
        unit_cost: financials.total_cost,
        profit: financials.profit,
        profit_margin: financials.profit_margin,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientSnapshot;

    #[test]
    fn test_cost_recipe() {
        let cake = RecipeSummary {
            id: Uuid::from_u128(1),
            name: "Chocolate Cake".to_string(),
            selling_price: Decimal::new(250, 0),
        };
        let flour = IngredientSnapshot {
            id: Uuid::from_u128(10),
            name: "Flour".to_string(),
            unit: "kg".to_string(),
            cost_per_unit: Decimal::new(155, 1),
            current_stock: Decimal::new(25, 0),
        };
        let sugar = IngredientSnapshot {
            id: Uuid::from_u128(11),
            name: "Sugar".to_string(),
            unit: "kg".to_string(),
            cost_per_unit: Decimal::new(22, 0),
            current_stock: Decimal::new(20, 0),
        };
        let bom = vec![
            BillOfMaterialsLine {
                recipe_id: cake.id,
                ingredient: flour,
                quantity: Decimal::new(2, 0),
            },
            BillOfMaterialsLine {
                recipe_id: cake.id,
                ingredient: sugar,
                quantity: Decimal::ONE,
            },
        ];

        let costing = cost_recipe(&cake, &bom).unwrap();

        // 2 * 15.5 + 1 * 22 = 53
        assert_eq!(costing.unit_cost, Decimal::new(53, 0));
        assert_eq!(costing.profit, Decimal::new(197, 0));
        assert_eq!(costing.profit_margin, Decimal::new(788, 1));
        assert_eq!(costing.lines.len(), 2);
    }

    #[test]
    fn test_cost_recipe_without_lines() {
        let bread = RecipeSummary {
            id: Uuid::from_u128(3),
            name: "Bread".to_string(),
            selling_price: Decimal::new(40, 0),
        };

        let costing = cost_recipe(&bread, &[]).unwrap();

        assert_eq!(costing.unit_cost, Decimal::ZERO);
        assert_eq!(costing.profit_margin, Decimal::ONE_HUNDRED);
        assert!(costing.lines.is_empty());
    }

    #[test]
    fn test_cost_recipe_overflow() {
        let cake = RecipeSummary {
            id: Uuid::from_u128(1),
            name: "Chocolate Cake".to_string(),
            selling_price: Decimal::new(250, 0),
        };
        let gold = IngredientSnapshot {
            id: Uuid::from_u128(12),
            name: "Gold Leaf".to_string(),
            unit: "g".to_string(),
            cost_per_unit: Decimal::MAX,
            current_stock: Decimal::ONE,
        };
        let bom = vec![BillOfMaterialsLine {
            recipe_id: cake.id,
            ingredient: gold,
            quantity: Decimal::new(2, 0),
        }];

        assert_eq!(cost_recipe(&cake, &bom), Err(AmountOverflow("total cost")));
    }
}
