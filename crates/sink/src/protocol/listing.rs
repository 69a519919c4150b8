//! Directory-style enumeration value types and their index rendering.
//!
//! A listing is an ordered sequence of [`ListingEntry`] values. Entries carry
//! a total order: directories sort before files, entries of the same kind
//! sort lexicographically by name. The sink normalizes a copy of the caller's
//! entries to this order before rendering; caller-visible data is never
//! mutated.

use std::cmp::Ordering;

/// The kind of a listing entry.
///
/// `Directory` orders before `File`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    Directory,
    File,
}

/// One entry of a directory-style enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl ListingEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self { name: name.into(), kind }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, EntryKind::Directory)
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, EntryKind::File)
    }
}

impl PartialOrd for ListingEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ListingEntry {
    /// Directories before files, then lexicographic by name.
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind.cmp(&other.kind).then_with(|| self.name.cmp(&other.name))
    }
}

/// Renders entries as an HTML index document.
///
/// Sorts a copy of the input to the entry total order; directory names are
/// shown with a trailing slash, names are HTML-escaped in both the href and
/// the link text.
pub(crate) fn render_index(entries: &[ListingEntry]) -> String {
    let mut sorted = entries.to_vec();
    sorted.sort();

    let mut out = String::with_capacity(128 + sorted.len() * 48);
    out.push_str("<!DOCTYPE html>\n<html>\n<head><title>Index</title></head>\n<body>\n<ul>\n");
    for entry in &sorted {
        let escaped = escape(&entry.name);
        let suffix = match entry.kind {
            EntryKind::Directory => "/",
            EntryKind::File => "",
        };
        out.push_str("<li><a href=\"");
        out.push_str(&escaped);
        out.push_str(suffix);
        out.push_str("\">");
        out.push_str(&escaped);
        out.push_str(suffix);
        out.push_str("</a></li>\n");
    }
    out.push_str("</ul>\n</body>\n</html>\n");
    out
}

fn escape(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}
