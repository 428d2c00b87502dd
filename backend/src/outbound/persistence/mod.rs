//! SQLite persistence adapters built on Diesel.
//!
//! Sync Diesel queries are bridged into the async domain ports via
//! `tokio::task::spawn_blocking`; rows are owned types so nothing borrowed
//! crosses the thread boundary.

pub mod diesel_book_repository;
pub mod diesel_review_repository;
pub mod diesel_user_repository;
mod error_map;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_book_repository::DieselBookRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, MIGRATIONS, PoolConfig, PoolError};
