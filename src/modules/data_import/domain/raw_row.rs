use std::collections::HashMap;

pub const ID_COLUMN: &str = "id";
pub const NAME_COLUMN: &str = "name";
pub const DATE_COLUMN: &str = "date";

/// Header cells are matched case-insensitively, surrounding whitespace ignored.
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// One spreadsheet line as read, keyed by normalized header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut row = Self::new();
        for (column, value) in pairs {
            row.insert(column.as_ref(), value);
        }
        row
    }

    pub fn insert(&mut self, column: &str, value: impl Into<String>) {
        self.fields.insert(normalize_header(column), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|v| v.is_empty())
    }
}
