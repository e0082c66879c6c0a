//! Credentials attached to every gateway request.

mod model;

pub use model::*;
