//! Month routes - aggregate, flow graph, score and net worth per month

pub mod api;

pub use api::{api_month, api_month_flow, api_month_net_worth, api_month_score, api_months};
