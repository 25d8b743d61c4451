//! Shared types and domain logic for the bakery operations platform
//!
//! This crate holds everything that is pure computation: models, input validation,
//! production requirements aggregation, recipe costing and the recipe text parser.
//! It is used by the backend and, through WebAssembly, by the browser.

pub mod costing;
pub mod models;
pub mod parser;
pub mod requirements;
pub mod validation;

pub use costing::*;
pub use models::*;
pub use parser::*;
pub use requirements::*;
pub use validation::*;
