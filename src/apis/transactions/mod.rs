//! APIs and models for the gateway transaction actions.

mod api;
mod model;

pub use api::TransactionsApi;
pub use model::*;
