//! Core engine - platform-agnostic bang resolution.
//!
//! - [`table`]: the tag -> URL template mapping
//! - [`resolve`]: turning a raw query into a destination URL

pub mod resolve;
pub mod table;

pub use resolve::{build_search_url, encode_component, resolve, Resolution, Rule, MAX_QUERY_CHARS};
pub use table::{Bang, BangTable, FALLBACK_TAG, TEMPLATE_PLACEHOLDER};
