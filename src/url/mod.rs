//! URL handling module for Gleaner
//!
//! This module provides the URL validator (syntax and admission policy), link
//! normalization, and host extraction. Everything here is a pure function of its
//! inputs: malformed input yields `false` / `None`, never an error.

mod domain;
mod normalize;
mod validator;

// Re-export main functions
pub use domain::extract_host;
pub use normalize::normalize_link;
pub use validator::{is_valid_url, should_scrape, UrlPolicy, SKIPPED_EXTENSIONS};
