//! Route modules for the API server
//!
//! - months: per-month aggregate, flow graph, score and net worth
//! - categories: category list and evolution
//!
//! Each module keeps its handlers in `api.rs` and re-exports them from `mod.rs`.

pub mod categories;
pub mod months;
