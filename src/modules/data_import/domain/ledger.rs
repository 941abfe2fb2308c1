use serde::Serialize;
use std::collections::BTreeMap;

/// Messages for one failing line, in the order the rules reported them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub line: u64,
    pub messages: Vec<String>,
}

impl ValidationErrors {
    pub fn new(line: u64, messages: Vec<String>) -> Self {
        Self { line, messages }
    }
}

/// Failing lines of one run, kept in ascending line order.
#[derive(Debug, Default)]
pub struct ErrorLedger {
    entries: BTreeMap<u64, Vec<String>>,
}

impl ErrorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, errors: ValidationErrors) {
        self.entries
            .entry(errors.line)
            .or_default()
            .extend(errors.messages);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of failing lines
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn messages(&self, line: u64) -> Option<&[String]> {
        self.entries.get(&line).map(Vec::as_slice)
    }

    /// One `Line <n>: <msg>, <msg>` line per entry
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(line, messages)| format!("Line {}: {}\n", line, messages.join(", ")))
            .collect()
    }
}
