//! HTTP request handlers

pub mod health;
pub mod ingredient;
pub mod production;
pub mod recipe;
pub mod reporting;

pub use health::*;
pub use ingredient::*;
pub use production::*;
pub use recipe::*;
pub use reporting::*;
