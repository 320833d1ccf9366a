// file: src/models/query.rs
// description: query record produced by the query batch reader

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Position in the query source, starting at 1.
    pub id: u32,
    /// Argument of the record-start tag, verbatim. Never used as the run id.
    pub label: String,
    pub text: String,
}

impl QueryRecord {
    pub fn new(id: u32, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            text: String::new(),
        }
    }

    pub fn append_line(&mut self, line: &str) {
        self.text.push(' ');
        self.text.push_str(line);
    }
}
