// file: src/models/document.rs
// description: corpus document record assembled by the record parser
// reference: internal data structures

use serde::{Deserialize, Serialize};

/// Text section of a corpus record, selected by a section tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordField {
    Title,
    Author,
    Bibliography,
    Content,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    pub bibliography: String,
    pub content: String,
}

impl DocumentRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Appends one content line to `field`, followed by a single space.
    pub fn append(&mut self, field: RecordField, line: &str) {
        let target = self.field_mut(field);
        target.push_str(line);
        target.push(' ');
    }

    fn field_mut(&mut self, field: RecordField) -> &mut String {
        match field {
            RecordField::Title => &mut self.title,
            RecordField::Author => &mut self.author,
            RecordField::Bibliography => &mut self.bibliography,
            RecordField::Content => &mut self.content,
        }
    }
}
