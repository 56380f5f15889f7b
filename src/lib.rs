//! bangs - search with shortcuts.
//!
//! A query like `!g rust` or `rust w!` is resolved against a table of search
//! engine URL templates; anything else goes to a default engine.
//!
//! # Architecture
//!
//! - [`core`] - The bang table and the resolver (pure, total)
//! - [`storage`] - Preference storage for the default bang
//! - [`config`] - Configuration loading, custom bangs
//! - [`executor`] - Resolve a query and act on the result
//! - [`platform`] - Opening URLs in the browser
//! - [`server`] - HTTP redirector for use as a browser search engine
//! - [`cli`] - Command-line front-end
//!
//! # Example
//!
//! ```
//! use bangs::core::resolve;
//!
//! assert_eq!(
//!     resolve("!g hello world", None),
//!     "https://www.google.com/search?q=hello%20world"
//! );
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod executor;
pub mod logging;
pub mod platform;
pub mod server;
pub mod storage;

mod error;

// Re-export commonly used types for convenience
pub use crate::core::{resolve, Bang, BangTable, Resolution, Rule};
pub use config::Config;
pub use error::{BangError, BangResult};
pub use executor::{ExecutionAction, Searcher};
pub use platform::Navigator;
pub use storage::{FileStore, MemoryStore, PreferenceStore};
