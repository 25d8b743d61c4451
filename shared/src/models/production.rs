//! Production planning models

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use super::{contains_ignore_case, RecipeSummary};

/// Status of a production plan. Deserializes through `FromStr`, so any casing and
/// "in_progress" are accepted; serializes as the lowercase stored form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PlanStatus {
    #[default]
    Draft,
    Scheduled,
    #[serde(rename = "in progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl PlanStatus {
    pub const ALL: [PlanStatus; 5] = [
        PlanStatus::Draft,
        PlanStatus::Scheduled,
        PlanStatus::InProgress,
        PlanStatus::Completed,
        PlanStatus::Cancelled,
    ];

    /// Stored and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Scheduled => "scheduled",
            PlanStatus::InProgress => "in progress",
            PlanStatus::Completed => "completed",
            PlanStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanStatus::Draft => write!(f, "Draft"),
            PlanStatus::Scheduled => write!(f, "Scheduled"),
            PlanStatus::InProgress => write!(f, "In Progress"),
            PlanStatus::Completed => write!(f, "Completed"),
            PlanStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown production plan status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for PlanStatus {
    type Err = UnknownStatus;

    /// Case-insensitive; accepts both "in progress" and "in_progress"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', " ");
        PlanStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for PlanStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A scheduled batch of recipes to produce on a date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionPlan {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub status: PlanStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductionPlan {
    pub fn matches(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query) || contains_ignore_case(&self.notes, query)
    }
}

/// A stored production line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionItem {
    pub id: Uuid,
    pub production_plan_id: Uuid,
    pub recipe_id: Uuid,
    pub quantity: Decimal,
}

/// A production line item joined with the recipe it produces
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionLine {
    pub id: Uuid,
    pub recipe: RecipeSummary,
    /// Units of the recipe to produce; fractional batches are allowed
    pub quantity: Decimal,
}

impl ProductionLine {
    /// `None` when the product does not fit in a `Decimal`
    pub fn line_value(&self) -> Option<Decimal> {
        self.recipe.selling_price.checked_mul(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionItemInput {
    pub recipe_id: Uuid,
    pub quantity: Decimal,
}

/// Input for creating or fully overwriting a plan and its items
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductionPlanInput {
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: PlanStatus,
    #[serde(default)]
    pub notes: String,
    #[validate(length(min = 1, message = "Add at least one item"))]
    pub items: Vec<ProductionItemInput>,
}

impl ProductionPlanInput {
    pub fn to_plan(&self, id: Uuid, created_at: DateTime<Utc>) -> ProductionPlan {
        ProductionPlan {
            id,
            name: self.name.clone(),
            date: self.date,
            status: self.status,
            notes: self.notes.clone(),
            created_at,
            updated_at: Utc::now(),
        }
    }

    pub fn to_items(&self, plan_id: Uuid) -> Vec<ProductionItem> {
        self.items
            .iter()
            .map(|item| ProductionItem {
                id: Uuid::new_v4(),
                production_plan_id: plan_id,
                recipe_id: item.recipe_id,
                quantity: item.quantity,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("Draft".parse::<PlanStatus>(), Ok(PlanStatus::Draft));
        assert_eq!("IN PROGRESS".parse::<PlanStatus>(), Ok(PlanStatus::InProgress));
        assert_eq!("in_progress".parse::<PlanStatus>(), Ok(PlanStatus::InProgress));
        assert_eq!(" completed ".parse::<PlanStatus>(), Ok(PlanStatus::Completed));
        assert!("archived".parse::<PlanStatus>().is_err());
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&PlanStatus::InProgress).unwrap();
        assert_eq!(json, "\"in progress\"");

        let parsed: PlanStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, PlanStatus::Cancelled);
    }

    #[test]
    fn test_status_deserialize_ignores_case() {
        let input = r#"["Scheduled", "in_progress", "IN PROGRESS", " Draft "]"#;
        let parsed: Vec<PlanStatus> = serde_json::from_str(input).unwrap();
        assert_eq!(
            parsed,
            vec![
                PlanStatus::Scheduled,
                PlanStatus::InProgress,
                PlanStatus::InProgress,
                PlanStatus::Draft
            ]
        );

        let err = serde_json::from_str::<PlanStatus>("\"archived\"").unwrap_err();
        assert!(err.to_string().contains("unknown production plan status: archived"));
    }

    #[test]
    fn test_status_as_str_round_trips() {
        for status in PlanStatus::ALL {
            assert_eq!(status.as_str().parse::<PlanStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_plan_search_matches_name_or_notes() {
        let plan = ProductionPlan {
            id: Uuid::new_v4(),
            name: "Weekend Special".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            status: PlanStatus::Scheduled,
            notes: "For ABC Corp".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(plan.matches("weekend"));
        assert!(plan.matches("abc"));
        assert!(plan.matches(""));
        assert!(!plan.matches("wedding"));
    }
}
