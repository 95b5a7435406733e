//! Utility functions for common operations.
//!
//! - **URL validation**: scheme checks and private-network filtering for
//!   feed source URLs

mod url_validator;

pub use url_validator::{validate_url, UrlValidationError};
