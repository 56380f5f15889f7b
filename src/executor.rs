//! Search execution - resolve a query, then act on the result

use crate::core::{BangTable, Resolution};
use crate::error::BangResult;
use crate::platform::Navigator;
use crate::storage::{PreferenceStore, DEFAULT_BANG_KEY};

/// The action to perform for a resolved query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionAction {
    /// Open a URL in the browser
    OpenUrl { url: String },

    /// Write the URL to stdout
    PrintUrl { url: String },
}

impl ExecutionAction {
    pub fn url(&self) -> &str {
        match self {
            ExecutionAction::OpenUrl { url } | ExecutionAction::PrintUrl { url } => url,
        }
    }
}

/// Where the default bang comes from when no explicit bang matches
pub enum DefaultSource<'a> {
    /// Read the stored preference
    Store(&'a dyn PreferenceStore),
    /// Use this tag, ignoring the store
    Tag(String),
}

/// Resolves queries against a table and a default-bang source
pub struct Searcher<'a> {
    table: &'a BangTable,
    default: DefaultSource<'a>,
}

impl<'a> Searcher<'a> {
    pub fn new(table: &'a BangTable, store: &'a dyn PreferenceStore) -> Self {
        Self {
            table,
            default: DefaultSource::Store(store),
        }
    }

    /// Override the stored default for this searcher
    pub fn with_default_tag(mut self, tag: impl Into<String>) -> Self {
        self.default = DefaultSource::Tag(tag.into());
        self
    }

    pub fn resolve(&self, query: &str) -> Resolution {
        let resolution = self.table.resolve_detailed(query, || match &self.default {
            DefaultSource::Store(store) => store.get(DEFAULT_BANG_KEY),
            DefaultSource::Tag(tag) => Some(tag.clone()),
        });

        tracing::debug!(
            rule = ?resolution.rule,
            tag = %resolution.tag,
            term = %resolution.term,
            "Resolved query"
        );
        resolution
    }

    /// Decide what to do with `query`
    pub fn plan(&self, query: &str, print_only: bool) -> ExecutionAction {
        let url = self.resolve(query).url;
        if print_only {
            ExecutionAction::PrintUrl { url }
        } else {
            ExecutionAction::OpenUrl { url }
        }
    }
}

/// Carry out an action. Printing always goes to `printer`, opening to
/// `browser`.
pub fn execute(
    action: &ExecutionAction,
    browser: &dyn Navigator,
    printer: &dyn Navigator,
) -> BangResult<()> {
    match action {
        ExecutionAction::OpenUrl { url } => {
            tracing::info!(%url, "Opening");
            browser.open_url(url)
        }
        ExecutionAction::PrintUrl { url } => printer.open_url(url),
    }
}
