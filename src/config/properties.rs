//! Reader for Java properties sources.
//!
//! Lexing (separators, comments, continuation lines, escapes) is delegated to
//! `java-properties`. Sources are decoded as ISO-8859-1, as Java does.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Key/value pairs, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Create an empty property set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties from text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] with the 1-based line number for malformed
    /// escapes.
    pub fn parse(content: &str) -> Result<Self> {
        Self::read(content.as_bytes())
    }

    /// Parse properties from a reader.
    pub fn read(source: impl std::io::Read) -> Result<Self> {
        let entries = java_properties::read(source).map_err(|e| Error::ConfigParse {
            line: e.line_number().unwrap_or(0),
            message: e.to_string(),
        })?;
        Ok(Self { entries: entries.into_iter().collect() })
    }

    /// Read and parse a properties file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::read(std::io::BufReader::new(file))
    }

    /// Look up a raw value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Overlay `other` on top of this set; keys in `other` win.
    pub fn merge(&mut self, other: &Properties) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let props = Properties::parse(
            "# printer\nprinter.name = Index Everest\n\nprinter.mode: normalprinter\n! bang comment\n",
        )
        .unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("printer.name"), Some("Index Everest"));
        assert_eq!(props.get("printer.mode"), Some("normalprinter"));
    }

    #[test]
    fn test_value_may_contain_separator() {
        let props = Properties::parse("a=b=c").unwrap();
        assert_eq!(props.get("a"), Some("b=c"));
    }

    #[test]
    fn test_continuation_lines() {
        let props = Properties::parse("printer.name = Index \\\n   Everest\nx=1").unwrap();
        assert_eq!(props.get("printer.name"), Some("Index Everest"));
        assert_eq!(props.get("x"), Some("1"));
    }

    #[test]
    fn test_escaped_trailing_backslash_is_not_continuation() {
        let props = Properties::parse("printer.brailletable = C:\\\\\nprinter.mode = normalprinter\n").unwrap();
        assert_eq!(props.get("printer.brailletable"), Some("C:\\"));
        assert_eq!(props.get("printer.mode"), Some("normalprinter"));
    }

    #[test]
    fn test_whitespace_separator() {
        let props = Properties::parse("printer.name Index Everest\n").unwrap();
        assert_eq!(props.get("printer.name"), Some("Index Everest"));
    }

    #[test]
    fn test_escaped_separator_in_key() {
        let props = Properties::parse("a\\:b = c\n").unwrap();
        assert_eq!(props.get("a:b"), Some("c"));
    }

    #[test]
    fn test_malformed_escape_reports_line() {
        let err = Properties::parse("a=1\nb=\\uZZZZ\n").unwrap_err();
        match err {
            Error::ConfigParse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = Properties::parse("a=1\nb=2").unwrap();
        let user = Properties::parse("b=3\nc=4").unwrap();
        base.merge(&user);
        assert_eq!(base.get("a"), Some("1"));
        assert_eq!(base.get("b"), Some("3"));
        assert_eq!(base.get("c"), Some("4"));
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "format.A4.page.width = 210").unwrap();
        let props = Properties::load(file.path()).unwrap();
        assert_eq!(props.get("format.A4.page.width"), Some("210"));
    }
}
