// file: src/parser/tags.rs
// description: classification of collection lines into tags and content
// reference: Cranfield collection line format

use crate::models::RecordField;

pub const RECORD_START: &str = ".I";

/// What a single line of a collection file means to the readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `.I`, with the text following the tag and its separator.
    RecordStart(&'a str),
    /// `.T`, `.A`, `.B` or `.W`.
    Section(RecordField),
    Content(&'a str),
}

/// Classifies a line by its first two characters.
///
/// Lines shorter than a tag, or starting with a multi-byte character, are
/// content.
pub fn classify(line: &str) -> LineKind<'_> {
    let Some(tag) = line.get(..2) else {
        return LineKind::Content(line);
    };

    match tag {
        RECORD_START => LineKind::RecordStart(tag_argument(&line[2..])),
        ".T" => LineKind::Section(RecordField::Title),
        ".A" => LineKind::Section(RecordField::Author),
        ".B" => LineKind::Section(RecordField::Bibliography),
        ".W" => LineKind::Section(RecordField::Content),
        _ => LineKind::Content(line),
    }
}

// Drops the single separator after the tag, keeps everything else verbatim.
fn tag_argument(rest: &str) -> &str {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => chars.as_str(),
        _ => rest,
    }
}
