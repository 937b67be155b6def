//! Search layer facade.
//!
//! - **[`query`]**: case-insensitive substring evaluation with a category facet.

pub mod query;
