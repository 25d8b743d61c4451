//! Business logic services for the bakery operations platform

pub mod ingredient;
pub mod production;
pub mod recipe;
pub mod reporting;

pub use ingredient::IngredientService;
pub use production::ProductionService;
pub use recipe::RecipeService;
pub use reporting::ReportingService;
