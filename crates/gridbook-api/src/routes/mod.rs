//! Route modules for the API server
//!
//! Each module follows a consistent structure:
//! - api.rs: JSON API endpoints
//! - page.rs: HTML page rendering

pub mod accounts;
pub mod transactions;
