//! HTTP inbound adapter exposing the route surface.

pub mod auth;
pub mod books;
pub mod error;
pub mod reviews;
pub mod routes;
pub mod search;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::{ApiError, ApiResult};
