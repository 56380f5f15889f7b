//! `bangs list` and `bangs default`.

use std::io::Write;

use crate::core::BangTable;
use crate::storage::{self, PreferenceStore};

/// Print every bang, marking the current default with `*`.
pub fn list_bangs(
    out: &mut impl Write,
    table: &BangTable,
    store: &dyn PreferenceStore,
) -> anyhow::Result<()> {
    let default = storage::default_bang_tag(store, table);
    let width = table.sorted().iter().map(|b| b.tag.len()).max().unwrap_or(0) + 1;

    for bang in table.sorted() {
        let marker = if bang.tag == default { '*' } else { ' ' };
        let trigger = format!("{}!", bang.tag);
        match &bang.description {
            Some(description) => writeln!(
                out,
                "{marker} {trigger:<width$}  {description}  {url}",
                url = bang.url
            )?,
            None => writeln!(out, "{marker} {trigger:<width$}  {url}", url = bang.url)?,
        }
    }

    Ok(())
}

/// Show the default bang, or change it.
pub fn default_bang(
    out: &mut impl Write,
    table: &BangTable,
    store: &mut dyn PreferenceStore,
    tag: Option<&str>,
    clear: bool,
) -> anyhow::Result<()> {
    if clear {
        storage::clear_default_bang(store)?;
    } else if let Some(tag) = tag {
        storage::set_default_bang(store, table, tag)?;
    }

    writeln!(out, "{}", storage::default_bang_tag(store, table))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Bang, FALLBACK_TAG};
    use crate::storage::{MemoryStore, DEFAULT_BANG_KEY};

    fn output(f: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut buf = Vec::new();
        f(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_list_marks_default() {
        let table = BangTable::builtin();
        let mut store = MemoryStore::new();
        store.set(DEFAULT_BANG_KEY, "w").unwrap();

        let text = output(|buf| list_bangs(buf, table, &store).unwrap());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), table.len());
        assert!(lines[0].starts_with("  a!"));
        let marked: Vec<&&str> = lines.iter().filter(|l| l.starts_with('*')).collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].starts_with("* w!"));
        assert!(marked[0].contains("Wikipedia"));
    }

    #[test]
    fn test_list_without_description() {
        let custom = [Bang::new("zz", "https://example.com/?q={{{s}}}")];
        let table = BangTable::with_custom(&custom);
        let store = MemoryStore::new();

        let text = output(|buf| list_bangs(buf, &table, &store).unwrap());
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("  zz!"));
        assert!(last.ends_with("https://example.com/?q={{{s}}}"));
    }

    #[test]
    fn test_default_show_set_clear() {
        let table = BangTable::builtin();
        let mut store = MemoryStore::new();

        let text = output(|buf| default_bang(buf, table, &mut store, None, false).unwrap());
        assert_eq!(text.trim(), FALLBACK_TAG);

        let text = output(|buf| default_bang(buf, table, &mut store, Some("g"), false).unwrap());
        assert_eq!(text.trim(), "g");
        assert_eq!(store.get(DEFAULT_BANG_KEY), Some("g".to_string()));

        let text = output(|buf| default_bang(buf, table, &mut store, None, true).unwrap());
        assert_eq!(text.trim(), FALLBACK_TAG);
    }

    #[test]
    fn test_default_rejects_unknown() {
        let table = BangTable::builtin();
        let mut store = MemoryStore::new();
        let mut buf = Vec::new();

        assert!(default_bang(&mut buf, table, &mut store, Some("nope"), false).is_err());
        assert!(buf.is_empty());
    }
}
