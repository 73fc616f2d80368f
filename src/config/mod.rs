//! Configuration modules for the Ardoise API.
//!
//! Each submodule handles a specific aspect of configuration, typically
//! loaded from environment variables:
//!
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: PostgreSQL database connection pool initialization
//! - [`jwt`]: JWT verification configuration
//! - [`rate_limit`]: API rate limiting configuration

pub mod cors;
pub mod database;
pub mod jwt;
pub mod rate_limit;
