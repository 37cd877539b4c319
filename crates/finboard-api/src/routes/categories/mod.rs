//! Category routes - category list and per-category evolution

pub mod api;

pub use api::{api_categories, api_category_evolution};
