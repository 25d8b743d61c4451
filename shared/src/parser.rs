//! Best-effort recipe extraction from pasted text
//!
//! The output is a suggestion for a person to review before a recipe is created.
//! Nothing here is authoritative: quantities may be misread and catalog matches are
//! loose substring hits.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Ingredient, RecipeIngredientInput, RecipeInput};

/// A catalog entry the parser can link extracted lines to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
}

impl From<&Ingredient> for CatalogEntry {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.clone(),
            unit: ingredient.unit.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedIngredient {
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    /// Suggested catalog ingredient, if any name overlaps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedRecipe {
    pub name: String,
    pub ingredients: Vec<ExtractedIngredient>,
    pub instructions: String,
}

impl ExtractedRecipe {
    /// Draft recipe form built from the matched lines only. Selling price starts at zero.
    pub fn into_recipe_input(self) -> RecipeInput {
        let ingredients = self
            .ingredients
            .iter()
            .filter_map(|line| {
                line.matched_id.map(|ingredient_id| RecipeIngredientInput {
                    ingredient_id,
                    quantity: line.quantity,
                })
            })
            .collect();

        RecipeInput {
            name: self.name,
            description: String::new(),
            instructions: self.instructions,
            selling_price: Decimal::ZERO,
            ingredients,
        }
    }

    pub fn matched_count(&self) -> usize {
        self.ingredients.iter().filter(|i| i.matched_id.is_some()).count()
    }
}

const INSTRUCTION_HEADERS: [&str; 3] = ["instructions", "directions", "method"];

fn ingredient_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([\d./]+)\s*([a-zA-Z]+)?\s+(.+)$").expect("ingredient line pattern is valid")
    })
}

/// Extract a recipe name, ingredient lines and instructions from `text`.
///
/// Returns `None` when the text has no non-blank line.
pub fn extract_recipe(text: &str, catalog: &[CatalogEntry]) -> Option<ExtractedRecipe> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let name = lines.first()?.to_string();

    let ingredients_header = lines
        .iter()
        .position(|line| line.to_lowercase().contains("ingredients"));
    let instructions_header = lines.iter().position(|line| {
        let lower = line.to_lowercase();
        INSTRUCTION_HEADERS.iter().any(|header| lower.contains(header))
    });

    let start = ingredients_header.map_or(1, |i| i + 1);
    let end = instructions_header
        .filter(|&i| i > 0)
        .unwrap_or(lines.len())
        .max(start);

    let ingredients = lines[start.min(lines.len())..end.min(lines.len())]
        .iter()
        .map(|line| parse_ingredient_line(line, catalog))
        .collect();

    let instructions = match instructions_header {
        Some(i) => lines[i + 1..].join("\n"),
        None => String::new(),
    };

    Some(ExtractedRecipe {
        name,
        ingredients,
        instructions,
    })
}

/// Parse one `<quantity> [unit] <name>` line, falling back to the whole line as a
/// name with quantity 1.
pub fn parse_ingredient_line(line: &str, catalog: &[CatalogEntry]) -> ExtractedIngredient {
    let line = line.trim();
    let parsed = ingredient_line_pattern().captures(line).and_then(|caps| {
        let quantity = parse_quantity(caps.get(1)?.as_str())?;
        let unit = caps.get(2).map_or("", |m| m.as_str()).to_string();
        let name = caps.get(3)?.as_str().trim().to_string();
        Some((quantity, unit, name))
    });

    match parsed {
        Some((quantity, unit, name)) => ExtractedIngredient {
            matched_id: suggest_match(&name, catalog),
            name,
            quantity,
            unit,
        },
        None => ExtractedIngredient {
            name: line.to_string(),
            quantity: Decimal::ONE,
            unit: String::new(),
            matched_id: None,
        },
    }
}

/// Parse "2", "0.5" or "3/4"
pub fn parse_quantity(raw: &str) -> Option<Decimal> {
    match raw.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator = Decimal::from_str(numerator).ok()?;
            let denominator = Decimal::from_str(denominator).ok()?;
            numerator.checked_div(denominator)
        }
        None => Decimal::from_str(raw).ok(),
    }
}

/// First catalog entry whose name contains, or is contained in, `name` (case-insensitive)
pub fn suggest_match(name: &str, catalog: &[CatalogEntry]) -> Option<Uuid> {
    let needle = name.to_lowercase();
    if needle.is_empty() {
        return None;
    }
    catalog
        .iter()
        .filter(|entry| !entry.name.trim().is_empty())
        .find(|entry| {
            let candidate = entry.name.to_lowercase();
            candidate.contains(&needle) || needle.contains(&candidate)
        })
        .map(|entry| entry.id)
}
