//! WebAssembly module for the Bakery Operations Platform
//!
//! Provides client-side computation for:
//! - Production plan requirements and financials
//! - Recipe costing
//! - Recipe text scanning
//! - Form validation before submit

use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::requirements::*;
pub use shared::validation::*;

use shared::{cost_recipe, extract_recipe, CatalogEntry};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {}

/// Log to the browser console and hand back a JS `Error` for the caller to catch
fn js_error(message: impl std::fmt::Display) -> JsValue {
    let message = message.to_string();
    web_sys::console::warn_1(&JsValue::from_str(&message));
    js_sys::Error::new(&message).into()
}

fn from_json<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| js_error(format!("Invalid {} JSON: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_error)
}

/// Evaluate a plan: consolidated ingredient requirements, financials and shortage count
#[wasm_bindgen]
pub fn evaluate_plan(items_json: &str, bill_of_materials_json: &str) -> Result<String, JsValue> {
    let items: Vec<ProductionLine> = from_json(items_json, "items")?;
    let bill_of_materials: Vec<BillOfMaterialsLine> =
        from_json(bill_of_materials_json, "bill of materials")?;

    to_json(&PlanRequirements::evaluate(&items, &bill_of_materials).map_err(js_error)?)
}

/// Unit cost and margin of one recipe
#[wasm_bindgen]
pub fn cost_recipe_json(recipe_json: &str, bill_of_materials_json: &str) -> Result<String, JsValue> {
    let recipe: RecipeSummary = from_json(recipe_json, "recipe")?;
    let bill_of_materials: Vec<BillOfMaterialsLine> =
        from_json(bill_of_materials_json, "bill of materials")?;

    to_json(&cost_recipe(&recipe, &bill_of_materials).map_err(js_error)?)
}

/// Suggest a recipe from pasted text. Returns "null" when the text is blank.
#[wasm_bindgen]
pub fn scan_recipe_text(text: &str, catalog_json: &str) -> Result<String, JsValue> {
    let catalog: Vec<CatalogEntry> = from_json(catalog_json, "catalog")?;
    to_json(&extract_recipe(text, &catalog))
}

/// Profit margin as shown on reports, e.g. "78.8%", or "-" when the totals overflow
#[wasm_bindgen]
pub fn format_margin(total_value: f64, total_cost: f64) -> String {
    let value = Decimal::try_from(total_value).unwrap_or(Decimal::ZERO);
    let cost = Decimal::try_from(total_cost).unwrap_or(Decimal::ZERO);
    PlanFinancials::from_totals(value, cost)
        .map(|financials| financials.margin_display())
        .unwrap_or_else(|_| "-".to_string())
}

/// Whether stock is below its reorder threshold
#[wasm_bindgen]
pub fn is_low_stock(current_stock: f64, min_stock: f64) -> bool {
    current_stock < min_stock
}

/// First validation message for an ingredient form, or an empty string when valid
#[wasm_bindgen]
pub fn validate_ingredient_form(input_json: &str) -> Result<String, JsValue> {
    let input: IngredientInput = from_json(input_json, "ingredient")?;
    Ok(validate_ingredient_amounts(&input)
        .err()
        .map(|v| format!("{}: {}", v.field, v.message))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_evaluate_plan() {
        let cake = json!({ "id": "00000000-0000-0000-0000-000000000001", "name": "Chocolate Cake", "selling_price": "250" });
        let items = json!([{ "id": "00000000-0000-0000-0000-000000000009", "recipe": cake, "quantity": "2" }]);
        let bom = json!([
            {
                "recipe_id": "00000000-0000-0000-0000-000000000001",
                "ingredient": { "id": "00000000-0000-0000-0000-00000000000a", "name": "Flour", "unit": "kg", "cost_per_unit": "15.5", "current_stock": "25" },
                "quantity": "2"
            },
            {
                "recipe_id": "00000000-0000-0000-0000-000000000001",
                "ingredient": { "id": "00000000-0000-0000-0000-00000000000b", "name": "Sugar", "unit": "kg", "cost_per_unit": "22", "current_stock": "20" },
                "quantity": "1"
            }
        ]);

        let out = evaluate_plan(&items.to_string(), &bom.to_string()).unwrap();
        let result: PlanRequirements = serde_json::from_str(&out).unwrap();

        assert_eq!(result.financials.total_cost, Decimal::new(106, 0));
        assert_eq!(result.financials.margin_display(), "78.8%");
        assert_eq!(result.shortage_count, 0);
    }

    #[test]
    fn test_scan_recipe_text() {
        let catalog = json!([{ "id": "00000000-0000-0000-0000-00000000000a", "name": "Flour", "unit": "kg" }]);
        let out = scan_recipe_text("Bread\n500 g flour\n1 tsp salt", &catalog.to_string()).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["name"], "Bread");
        assert_eq!(value["ingredients"][0]["matched_id"], "00000000-0000-0000-0000-00000000000a");
        assert!(value["ingredients"][1].get("matched_id").is_none());

        assert_eq!(scan_recipe_text("   ", "[]").unwrap(), "null");
    }

    #[test]
    fn test_format_margin() {
        assert_eq!(format_margin(500.0, 106.0), "78.8%");
        assert_eq!(format_margin(0.0, 10.0), "0.0%");
        assert_eq!(format_margin(7e28, -7e28), "-");
    }

    #[test]
    fn test_low_stock() {
        assert!(is_low_stock(5.0, 10.0));
        assert!(!is_low_stock(10.0, 10.0));
    }

    #[test]
    fn test_validate_ingredient_form() {
        let valid = json!({ "name": "Flour", "unit": "kg", "cost_per_unit": "15.5", "current_stock": "25", "min_stock": "10" });
        assert_eq!(validate_ingredient_form(&valid.to_string()).unwrap(), "");

        let free = json!({ "name": "Flour", "unit": "kg", "cost_per_unit": "0", "current_stock": "25", "min_stock": "10" });
        assert_eq!(
            validate_ingredient_form(&free.to_string()).unwrap(),
            "cost_per_unit: Cost must be a positive number."
        );
    }
}
