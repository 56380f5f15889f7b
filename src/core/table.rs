//! The bang table: tag -> URL template.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{BangError, BangResult};

/// Placeholder replaced by the encoded search term.
pub const TEMPLATE_PLACEHOLDER: &str = "{{{s}}}";

/// Tag used when no valid default is configured.
pub const FALLBACK_TAG: &str = "d";

const FALLBACK_URL: &str = "https://lite.duckduckgo.com/lite?q={{{s}}}&kl=us-en";

/// (tag, template, description)
const BUILTIN_BANGS: &[(&str, &str, &str)] = &[
    (
        "al",
        "https://kiwix.tristanhavelick.com/search?content=archlinux_en_all_nopic_2022-05&pattern={{{s}}}",
        "Arch Linux wiki (Kiwix)",
    ),
    ("cl", "https://denver.craigslist.org/search/?query={{{s}}}", "Craigslist Denver"),
    (FALLBACK_TAG, FALLBACK_URL, "DuckDuckGo Lite"),
    (
        "e",
        "https://www.ebay.com/sch/i.html?_nkw={{{s}}}&rt=nc&LH_ItemCondition=4",
        "eBay (used)",
    ),
    ("jw", "https://www.justwatch.com/us/search?q={{{s}}}", "JustWatch"),
    ("k", "https://kiwix.tristanhavelick.com/search?pattern={{{s}}}", "Kiwix"),
    ("m", "https://search.marginalia.nu/search?query={{{s}}}", "Marginalia"),
    (
        "py",
        "https://kiwix.tristanhavelick.com/search?content=python-3.10.2&pattern={{{s}}}",
        "Python docs (Kiwix)",
    ),
    ("sg", "https://app.thestorygraph.com/browse?search_term={{{s}}}", "The StoryGraph"),
    (
        "ytt",
        "https://youtranscript.tristanhavelick.com/search?search_term={{{s}}}",
        "YouTube transcripts",
    ),
    ("x", "https://searxng.tristanhavelick.com/search?q={{{s}}}", "SearXNG"),
    ("gh", "https://github.com/search?q={{{s}}}", "GitHub search"),
    ("ghr", "https://github.com/{{{s}}}", "GitHub repository"),
    ("wb", "https://web.archive.org/web/{{{s}}}", "Wayback Machine"),
    ("g", "https://www.google.com/search?q={{{s}}}", "Google"),
    ("ddg", "https://duckduckgo.com/?q={{{s}}}", "DuckDuckGo"),
    ("a", "https://www.amazon.com/s?k={{{s}}}", "Amazon"),
    ("pypi", "https://pypi.org/search/?q={{{s}}}", "PyPI"),
    (
        "w",
        "https://en.wikipedia.org/wiki/Special:Search?search={{{s}}}",
        "Wikipedia",
    ),
];

static BUILTIN: Lazy<BangTable> = Lazy::new(|| {
    BangTable::from_bangs(
        BUILTIN_BANGS
            .iter()
            .map(|(tag, url, description)| Bang::new(*tag, *url).with_description(*description)),
    )
});

static FALLBACK: Lazy<Bang> = Lazy::new(|| Bang::new(FALLBACK_TAG, FALLBACK_URL));

/// A single search shortcut.
///
/// Also the shape of a `[[bangs]]` entry in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bang {
    pub tag: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Bang {
    pub fn new(tag: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            url: url.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check the tag is usable in `!tag` form and the template has exactly
    /// one placeholder.
    pub fn validate(&self) -> BangResult<()> {
        let invalid = |reason: &str| BangError::InvalidBang {
            tag: self.tag.clone(),
            reason: reason.to_string(),
        };

        if self.tag.is_empty() {
            return Err(invalid("tag is empty"));
        }
        if self.tag.chars().any(char::is_whitespace) {
            return Err(invalid("tag contains whitespace"));
        }
        if self.tag.starts_with('!') {
            return Err(invalid("tag must not start with '!'"));
        }
        match self.url.matches(TEMPLATE_PLACEHOLDER).count() {
            1 => Ok(()),
            0 => Err(invalid("template has no {{{s}}} placeholder")),
            _ => Err(invalid("template has more than one {{{s}}} placeholder")),
        }
    }

    /// Substitute the encoded search term into this bang's template.
    pub fn build_url(&self, term: &str) -> String {
        super::resolve::build_search_url(&self.url, term)
    }
}

/// Immutable mapping from tag to [`Bang`].
#[derive(Debug, Clone, Default)]
pub struct BangTable {
    bangs: HashMap<String, Bang>,
}

impl BangTable {
    /// The built-in table, shared process-wide.
    pub fn builtin() -> &'static BangTable {
        &BUILTIN
    }

    fn from_bangs(bangs: impl IntoIterator<Item = Bang>) -> Self {
        Self {
            bangs: bangs.into_iter().map(|b| (b.tag.clone(), b)).collect(),
        }
    }

    /// Built-in bangs plus user-defined ones.
    ///
    /// A user bang with an existing tag replaces the built-in template.
    /// Invalid user bangs are skipped.
    pub fn with_custom<'a>(custom: impl IntoIterator<Item = &'a Bang>) -> Self {
        let mut table = BUILTIN.clone();

        for bang in custom {
            if let Err(e) = bang.validate() {
                tracing::warn!("Skipping custom bang: {}", e);
                continue;
            }
            if table.bangs.contains_key(&bang.tag) {
                tracing::debug!(tag = %bang.tag, "Custom bang overrides built-in");
            }
            table.bangs.insert(bang.tag.clone(), bang.clone());
        }

        table
    }

    pub fn get(&self, tag: &str) -> Option<&Bang> {
        self.bangs.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.bangs.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.bangs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bangs.is_empty()
    }

    /// All bangs ordered by tag.
    pub fn sorted(&self) -> Vec<&Bang> {
        let mut bangs: Vec<&Bang> = self.bangs.values().collect();
        bangs.sort_by(|a, b| a.tag.cmp(&b.tag));
        bangs
    }

    /// The bang to use when nothing explicit matched.
    ///
    /// `tag` wins if it is in the table, otherwise the fallback tag is used.
    pub fn default_bang(&self, tag: Option<&str>) -> &Bang {
        tag.and_then(|t| self.get(t))
            .or_else(|| self.get(FALLBACK_TAG))
            .unwrap_or(&*FALLBACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_are_valid() {
        let table = BangTable::builtin();
        assert_eq!(table.len(), BUILTIN_BANGS.len());
        for bang in table.sorted() {
            assert!(bang.validate().is_ok(), "invalid builtin: {}", bang.tag);
        }
    }

    #[test]
    fn test_sorted_by_tag() {
        let tags: Vec<&str> = BangTable::builtin()
            .sorted()
            .into_iter()
            .map(|b| b.tag.as_str())
            .collect();
        let mut expected = tags.clone();
        expected.sort();
        assert_eq!(tags, expected);
        assert_eq!(tags.first(), Some(&"a"));
    }

    #[test]
    fn test_default_bang_selection() {
        let table = BangTable::builtin();
        assert_eq!(table.default_bang(Some("g")).tag, "g");
        assert_eq!(table.default_bang(Some("nope")).tag, FALLBACK_TAG);
        assert_eq!(table.default_bang(Some("")).tag, FALLBACK_TAG);
        assert_eq!(table.default_bang(None).tag, FALLBACK_TAG);
    }

    #[test]
    fn test_validate_rejects_bad_bangs() {
        assert!(Bang::new("", "https://x/{{{s}}}").validate().is_err());
        assert!(Bang::new("a b", "https://x/{{{s}}}").validate().is_err());
        assert!(Bang::new("!a", "https://x/{{{s}}}").validate().is_err());
        assert!(Bang::new("a", "https://x/").validate().is_err());
        assert!(Bang::new("a", "https://x/{{{s}}}/{{{s}}}").validate().is_err());
        assert!(Bang::new("rs", "https://docs.rs/{{{s}}}").validate().is_ok());
    }

    #[test]
    fn test_with_custom_adds_and_overrides() {
        let custom = vec![
            Bang::new("rs", "https://docs.rs/{{{s}}}"),
            Bang::new("g", "https://www.google.de/search?q={{{s}}}"),
            Bang::new("broken", "https://example.com/"),
        ];
        let table = BangTable::with_custom(&custom);

        assert_eq!(table.len(), BangTable::builtin().len() + 1);
        assert!(table.contains("rs"));
        assert!(!table.contains("broken"));
        assert_eq!(
            table.get("g").map(|b| b.url.as_str()),
            Some("https://www.google.de/search?q={{{s}}}")
        );
    }

    #[test]
    fn test_fallback_survives_empty_table() {
        let table = BangTable::default();
        assert!(table.is_empty());
        assert_eq!(table.default_bang(Some("g")).url, FALLBACK_URL);
    }
}
