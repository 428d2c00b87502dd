//! Google Books metadata adapter.

mod dto;
pub mod http_source;

pub use http_source::{DEFAULT_ENDPOINT, GoogleBooksSource};
