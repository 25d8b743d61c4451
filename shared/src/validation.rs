//! Validation utilities for the bakery operations platform
//!
//! String lengths and required collections are checked by the `validator` derives on the
//! input types; the numeric rules live here because `Decimal` fields need explicit checks.
//! Quantities, costs and stock levels are stored as NUMERIC(12,4) and prices as
//! NUMERIC(12,2), so amounts are also held to those scales and ranges.

use rust_decimal::Decimal;

use crate::models::{IngredientInput, ProductionPlanInput, RecipeInput};

/// A failed rule with the input field it applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: &'static str,
}

impl FieldViolation {
    fn new(field: impl Into<String>, message: &'static str) -> Self {
        Self {
            field: field.into(),
            message,
        }
    }
}

// ============================================================================
// Quantity and money rules
// ============================================================================

/// Validate a strictly positive amount (costs, recipe and production quantities)
pub fn validate_positive(value: Decimal) -> Result<(), &'static str> {
    if value <= Decimal::ZERO {
        return Err("Must be a positive number.");
    }
    Ok(())
}

/// Validate an amount that may be zero (stock levels, selling price)
pub fn validate_non_negative(value: Decimal) -> Result<(), &'static str> {
    if value < Decimal::ZERO {
        return Err("Cannot be negative.");
    }
    Ok(())
}

/// Exclusive upper bound on the magnitude of a NUMERIC(12,4) amount
pub const QUANTITY_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Exclusive upper bound on the magnitude of a NUMERIC(12,2) price
pub const PRICE_LIMIT: Decimal = Decimal::from_parts(0x540B_E400, 2, 0, false, 0);

/// Validate a quantity, cost or stock level fits four decimal places below 100,000,000
pub fn validate_quantity_precision(value: Decimal) -> Result<(), &'static str> {
    if value.normalize().scale() > 4 {
        return Err("Use at most 4 decimal places.");
    }
    if value.abs() >= QUANTITY_LIMIT {
        return Err("Must be less than 100,000,000.");
    }
    Ok(())
}

/// Validate a price fits two decimal places below 10,000,000,000
pub fn validate_price_precision(value: Decimal) -> Result<(), &'static str> {
    if value.normalize().scale() > 2 {
        return Err("Use at most 2 decimal places.");
    }
    if value.abs() >= PRICE_LIMIT {
        return Err("Must be less than 10,000,000,000.");
    }
    Ok(())
}

/// Validate a free-text field is not blank once trimmed
pub fn validate_not_blank(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("Cannot be blank.");
    }
    Ok(())
}

// ============================================================================
// Form rules
// ============================================================================

pub fn validate_ingredient_amounts(input: &IngredientInput) -> Result<(), FieldViolation> {
    validate_not_blank(&input.name).map_err(|m| FieldViolation::new("name", m))?;
    validate_not_blank(&input.unit).map_err(|m| FieldViolation::new("unit", m))?;
    validate_positive(input.cost_per_unit)
        .map_err(|_| FieldViolation::new("cost_per_unit", "Cost must be a positive number."))?;
    validate_quantity_precision(input.cost_per_unit)
        .map_err(|m| FieldViolation::new("cost_per_unit", m))?;
    validate_non_negative(input.current_stock)
        .map_err(|_| FieldViolation::new("current_stock", "Stock cannot be negative."))?;
    validate_quantity_precision(input.current_stock)
        .map_err(|m| FieldViolation::new("current_stock", m))?;
    validate_non_negative(input.min_stock)
        .map_err(|_| FieldViolation::new("min_stock", "Minimum stock cannot be negative."))?;
    validate_quantity_precision(input.min_stock)
        .map_err(|m| FieldViolation::new("min_stock", m))?;
    Ok(())
}

pub fn validate_recipe_amounts(input: &RecipeInput) -> Result<(), FieldViolation> {
    validate_not_blank(&input.name).map_err(|m| FieldViolation::new("name", m))?;
    validate_non_negative(input.selling_price)
        .map_err(|_| FieldViolation::new("selling_price", "Selling price cannot be negative."))?;
    validate_price_precision(input.selling_price)
        .map_err(|m| FieldViolation::new("selling_price", m))?;
    for (i, line) in input.ingredients.iter().enumerate() {
        let field = || format!("ingredients[{}].quantity", i);
        validate_positive(line.quantity)
            .map_err(|_| FieldViolation::new(field(), "Quantity must be positive"))?;
        validate_quantity_precision(line.quantity).map_err(|m| FieldViolation::new(field(), m))?;
    }
    Ok(())
}

pub fn validate_plan_amounts(input: &ProductionPlanInput) -> Result<(), FieldViolation> {
    validate_not_blank(&input.name).map_err(|m| FieldViolation::new("name", m))?;
    for (i, item) in input.items.iter().enumerate() {
        let field = || format!("items[{}].quantity", i);
        validate_positive(item.quantity)
            .map_err(|_| FieldViolation::new(field(), "Quantity must be positive"))?;
        validate_quantity_precision(item.quantity).map_err(|m| FieldViolation::new(field(), m))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductionItemInput, RecipeIngredientInput};
    use chrono::NaiveDate;
    use uuid::Uuid;
    use validator::Validate;

    fn flour() -> IngredientInput {
        IngredientInput {
            name: "Flour".to_string(),
            unit: "kg".to_string(),
            cost_per_unit: Decimal::new(155, 1),
            current_stock: Decimal::new(25, 0),
            min_stock: Decimal::new(10, 0),
        }
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(Decimal::new(1, 2)).is_ok());
        assert!(validate_positive(Decimal::ZERO).is_err());
        assert!(validate_positive(Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(Decimal::ZERO).is_ok());
        assert!(validate_non_negative(Decimal::new(-1, 1)).is_err());
    }

    #[test]
    fn test_quantity_precision() {
        assert!(validate_quantity_precision(Decimal::new(1, 4)).is_ok());
        assert!(validate_quantity_precision(Decimal::new(12_500_000, 5)).is_ok());
        assert!(validate_quantity_precision(Decimal::new(99_999_999_9999, 4)).is_ok());
        assert_eq!(
            validate_quantity_precision(Decimal::new(1, 5)),
            Err("Use at most 4 decimal places.")
        );
        assert_eq!(
            validate_quantity_precision(QUANTITY_LIMIT),
            Err("Must be less than 100,000,000.")
        );
        assert!(validate_quantity_precision(-QUANTITY_LIMIT).is_err());
    }

    #[test]
    fn test_price_precision() {
        assert_eq!(PRICE_LIMIT, Decimal::new(10_000_000_000, 0));
        assert!(validate_price_precision(Decimal::new(299, 2)).is_ok());
        assert!(validate_price_precision(Decimal::new(2_500, 3)).is_ok());
        assert_eq!(
            validate_price_precision(Decimal::new(2_999, 3)),
            Err("Use at most 2 decimal places.")
        );
        assert_eq!(
            validate_price_precision(PRICE_LIMIT),
            Err("Must be less than 10,000,000,000.")
        );
    }

    #[test]
    fn test_ingredient_rules() {
        assert!(validate_ingredient_amounts(&flour()).is_ok());

        let free = IngredientInput {
            cost_per_unit: Decimal::ZERO,
            ..flour()
        };
        let violation = validate_ingredient_amounts(&free).unwrap_err();
        assert_eq!(violation.field, "cost_per_unit");

        let negative = IngredientInput {
            min_stock: Decimal::new(-5, 0),
            ..flour()
        };
        assert_eq!(validate_ingredient_amounts(&negative).unwrap_err().field, "min_stock");

        let blank_unit = IngredientInput {
            unit: "  ".to_string(),
            ..flour()
        };
        assert_eq!(validate_ingredient_amounts(&blank_unit).unwrap_err().field, "unit");

        let overstocked = IngredientInput {
            current_stock: QUANTITY_LIMIT,
            ..flour()
        };
        let violation = validate_ingredient_amounts(&overstocked).unwrap_err();
        assert_eq!(violation.field, "current_stock");
        assert_eq!(violation.message, "Must be less than 100,000,000.");

        let fine_cost = IngredientInput {
            cost_per_unit: Decimal::new(1, 5),
            ..flour()
        };
        assert_eq!(validate_ingredient_amounts(&fine_cost).unwrap_err().field, "cost_per_unit");
    }

    #[test]
    fn test_ingredient_derive_rules() {
        let short = IngredientInput {
            name: "F".to_string(),
            ..flour()
        };
        let errors = short.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let no_unit = IngredientInput {
            unit: String::new(),
            ..flour()
        };
        assert!(no_unit.validate().is_err());
        assert!(flour().validate().is_ok());
    }

    #[test]
    fn test_recipe_rules() {
        let recipe = RecipeInput {
            name: "Chocolate Cake".to_string(),
            description: String::new(),
            instructions: String::new(),
            selling_price: Decimal::ZERO,
            ingredients: vec![RecipeIngredientInput {
                ingredient_id: Uuid::new_v4(),
                quantity: Decimal::ZERO,
            }],
        };
        let violation = validate_recipe_amounts(&recipe).unwrap_err();
        assert_eq!(violation.field, "ingredients[0].quantity");

        let unrounded = RecipeInput {
            selling_price: Decimal::new(2_999, 3),
            ..recipe.clone()
        };
        let violation = validate_recipe_amounts(&unrounded).unwrap_err();
        assert_eq!(violation.field, "selling_price");
        assert_eq!(violation.message, "Use at most 2 decimal places.");

        let pinch = RecipeInput {
            selling_price: Decimal::new(3, 0),
            ingredients: vec![RecipeIngredientInput {
                ingredient_id: Uuid::new_v4(),
                quantity: Decimal::new(1, 5),
            }],
            ..recipe.clone()
        };
        let violation = validate_recipe_amounts(&pinch).unwrap_err();
        assert_eq!(violation.field, "ingredients[0].quantity");
        assert_eq!(violation.message, "Use at most 4 decimal places.");

        let empty = RecipeInput {
            ingredients: vec![],
            ..recipe
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_plan_rules() {
        let plan = ProductionPlanInput {
            name: "Weekend Special".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            status: Default::default(),
            notes: String::new(),
            items: vec![ProductionItemInput {
                recipe_id: Uuid::new_v4(),
                quantity: Decimal::new(25, 1),
            }],
        };
        assert!(plan.validate().is_ok());
        assert!(validate_plan_amounts(&plan).is_ok());

        let negative = ProductionPlanInput {
            items: vec![ProductionItemInput {
                recipe_id: Uuid::new_v4(),
                quantity: Decimal::new(-1, 0),
            }],
            ..plan
        };
        assert_eq!(validate_plan_amounts(&negative).unwrap_err().field, "items[0].quantity");

        let tiny = ProductionPlanInput {
            items: vec![ProductionItemInput {
                recipe_id: Uuid::new_v4(),
                quantity: Decimal::new(1, 5),
            }],
            ..negative.clone()
        };
        let violation = validate_plan_amounts(&tiny).unwrap_err();
        assert_eq!(violation.field, "items[0].quantity");
        assert_eq!(violation.message, "Use at most 4 decimal places.");

        let huge = ProductionPlanInput {
            items: vec![ProductionItemInput {
                recipe_id: Uuid::new_v4(),
                quantity: QUANTITY_LIMIT,
            }],
            ..negative
        };
        assert_eq!(
            validate_plan_amounts(&huge).unwrap_err().message,
            "Must be less than 100,000,000."
        );
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Amounts a NUMERIC(12,4) column stores exactly
    fn storable_quantity() -> impl Strategy<Value = Decimal> {
        (-99_999_999_9999i64..=99_999_999_9999i64).prop_map(|n| Decimal::new(n, 4))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_storable_quantities_pass(value in storable_quantity()) {
            prop_assert!(validate_quantity_precision(value).is_ok());
        }

        /// A fifth significant decimal digit is always rejected
        #[test]
        fn prop_fifth_decimal_rejected(value in storable_quantity(), digit in 1i64..=9) {
            let finer = value + Decimal::new(digit, 5);
            prop_assert_eq!(
                validate_quantity_precision(finer),
                Err("Use at most 4 decimal places.")
            );
        }

        #[test]
        fn prop_out_of_range_rejected(extra in 0i64..1_000_000_000) {
            let value = QUANTITY_LIMIT + Decimal::new(extra, 4);
            prop_assert!(validate_quantity_precision(value).is_err());
            prop_assert!(validate_quantity_precision(-value).is_err());
        }
    }
}
