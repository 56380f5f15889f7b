//! Bang resolution: raw query -> destination URL.
//!
//! Rules, in order:
//!
//! 1. Trim, then cut the query to [`MAX_QUERY_CHARS`] characters.
//! 2. `!tag term` (prefix form). A lone `!tag` with no space is searched
//!    verbatim with the default engine.
//! 3. `term tag!` (suffix form). The `tag!` must end the query.
//! 4. Anything else, including unknown tags, goes to the default engine with
//!    the whole query as the search term.
//!
//! Resolution is total: every input produces a URL.

use once_cell::sync::Lazy;
use regex::Regex;

use super::table::{Bang, BangTable, TEMPLATE_PLACEHOLDER};

/// Longest query (in characters) considered for resolution.
pub const MAX_QUERY_CHARS: usize = 2000;

/// `<text><whitespace><word>!` anchored at both ends.
///
/// `.` excludes line terminators, `\w` is ASCII-only and whitespace is the
/// ECMAScript set, matching how browsers interpret the same pattern.
static SUFFIX_BANG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([^\n\r\x{2028}\x{2029}]+)[\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]+([0-9A-Za-z_]+)!$",
    )
    .expect("suffix bang pattern is valid")
});

/// ECMAScript whitespace: Unicode `White_Space` without U+0085, plus the
/// byte order mark.
fn is_js_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

/// Characters `encodeURIComponent` leaves alone but `urlencoding` escapes.
const COMPONENT_UNRESERVED: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Which rule produced a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Prefix,
    Suffix,
    Fallback,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Prefix => "prefix",
            Rule::Suffix => "suffix",
            Rule::Fallback => "fallback",
        }
    }
}

/// A resolved query with the details of how it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub rule: Rule,
    pub tag: String,
    pub term: String,
    pub url: String,
}

impl Resolution {
    fn new(rule: Rule, bang: &Bang, term: &str) -> Self {
        Self {
            rule,
            tag: bang.tag.clone(),
            term: term.to_string(),
            url: bang.build_url(term),
        }
    }
}

/// Percent-encode `term` the way `encodeURIComponent` does.
pub fn encode_component(term: &str) -> String {
    let mut encoded = urlencoding::encode(term).into_owned();
    for (escaped, literal) in COMPONENT_UNRESERVED {
        if encoded.contains(escaped) {
            encoded = encoded.replace(escaped, literal);
        }
    }
    encoded
}

/// Substitute an encoded search term into a template.
///
/// Encoded slashes are restored so templates with the placeholder in the
/// path (`https://github.com/{{{s}}}`) get real path segments.
pub fn build_search_url(template: &str, term: &str) -> String {
    let encoded = encode_component(term).replace("%2F", "/");
    template.replace(TEMPLATE_PLACEHOLDER, &encoded)
}

/// Resolve against the built-in table.
pub fn resolve(query: &str, default_tag: Option<&str>) -> String {
    BangTable::builtin().resolve(query, default_tag)
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

impl BangTable {
    /// Resolve `query` to a destination URL.
    ///
    /// `default_tag` is used when no explicit bang matches; an unknown or
    /// missing tag means the fallback engine.
    pub fn resolve(&self, query: &str, default_tag: Option<&str>) -> String {
        self.resolve_detailed(query, || default_tag.map(str::to_string))
            .url
    }

    /// Resolve `query`, reporting which rule fired.
    ///
    /// `default_tag` is only called when the default engine is needed, so a
    /// stored preference is read at most once and not at all when an explicit
    /// bang matches.
    pub fn resolve_detailed<F>(&self, query: &str, default_tag: F) -> Resolution
    where
        F: FnOnce() -> Option<String>,
    {
        let query = truncate_chars(query.trim_matches(is_js_whitespace), MAX_QUERY_CHARS);

        if let Some(rest) = query.strip_prefix('!') {
            let Some((tag, term)) = rest.split_once(' ') else {
                return self.fallback(query, default_tag);
            };
            if let Some(bang) = self.get(tag) {
                let term = term.trim_matches(is_js_whitespace);
                return Resolution::new(Rule::Prefix, bang, term);
            }
        }

        if let Some(caps) = SUFFIX_BANG.captures(query) {
            let term = caps.get(1).map_or("", |m| m.as_str());
            let tag = caps.get(2).map_or("", |m| m.as_str());
            if let Some(bang) = self.get(tag) {
                let term = term.trim_matches(is_js_whitespace);
                return Resolution::new(Rule::Suffix, bang, term);
            }
        }

        self.fallback(query, default_tag)
    }

    fn fallback<F>(&self, query: &str, default_tag: F) -> Resolution
    where
        F: FnOnce() -> Option<String>,
    {
        let tag = default_tag();
        let bang = self.default_bang(tag.as_deref());
        Resolution::new(Rule::Fallback, bang, query)
    }
}
