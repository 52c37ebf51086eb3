//! INFO status-report parser
//!
//! Turns the line-oriented `INFO` payload into a typed field tree.
//! The report format is unversioned and must be treated as unstable:
//! parsing never fails, it degrades. Lines that fit no known shape
//! land in an ordered raw bucket instead of being dropped.

use std::collections::HashMap;

use super::value::{coerce, Value};

/// The pseudo-command whose key itself contains the field separator.
/// `cmdstat_host:<addr>:calls=...` is the only INFO line where the
/// first colon does not delimit key from value.
const HOST_PSEUDO_COMMAND: &str = "cmdstat_host";

/// Parsed status report: field name -> typed value, plus the raw
/// bucket of lines that contained no separator.
#[derive(Debug, Clone, Default)]
pub struct InfoTree {
    fields: HashMap<String, Value>,
    raw: Vec<String>,
}

impl InfoTree {
    /// Look up a field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Look up an integer field
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(Value::as_i64)
    }

    /// Look up a numeric field, widening integers
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(Value::as_f64)
    }

    /// Look up a string field
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Calls counter for one `cmdstat_<name>` entry, if present
    pub fn command_calls(&self, cmdstat_key: &str) -> Option<i64> {
        self.fields
            .get(cmdstat_key)
            .and_then(Value::as_map)
            .and_then(|m| m.get("calls"))
            .and_then(Value::as_i64)
    }

    /// Lines that could not be classified as any field, in input order
    pub fn raw_lines(&self) -> &[String] {
        &self.raw
    }

    /// Number of parsed fields (raw bucket excluded)
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parse one raw status-report payload into an [`InfoTree`].
///
/// Invalid UTF-8 is replaced, blank lines and `#` comments are
/// skipped, and a line is split at its first colon — except for the
/// host pseudo-command, whose value may itself contain colons: there
/// the split happens at the last colon instead.
pub fn parse_info(raw: &[u8]) -> InfoTree {
    let text = String::from_utf8_lossy(raw);
    let mut tree = InfoTree::default();

    for line in text.lines() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once(':') {
            Some((key, value)) => {
                let (key, value) = if key == HOST_PSEUDO_COMMAND {
                    // Safe: split_once succeeded, so a colon exists
                    line.rsplit_once(':').unwrap()
                } else {
                    (key, value)
                };
                tree.fields.insert(key.to_string(), coerce(value));
            }
            None => tree.raw.push(line.to_string()),
        }
    }

    tree
}
