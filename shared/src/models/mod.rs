//! Domain models for the bakery operations platform

mod ingredient;
mod production;
mod recipe;

pub use ingredient::*;
pub use production::*;
pub use recipe::*;

/// Case-insensitive substring match used by the list search boxes.
/// An empty query matches everything.
pub(crate) fn contains_ignore_case(haystack: &str, query: &str) -> bool {
    haystack.to_lowercase().contains(&query.to_lowercase())
}
