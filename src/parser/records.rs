// file: src/parser/records.rs
// description: streaming parser turning a tagged corpus into document records
// reference: Cranfield collection format (.I/.T/.A/.B/.W)

use crate::error::{PipelineError, Result};
use crate::models::{DocumentRecord, RecordField};
use crate::parser::tags::{LineKind, classify};
use std::io::{BufRead, Lines};
use tracing::debug;

/// Field receiving content lines. `NoActiveRecord` until a section tag is
/// seen after the current record started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    NoActiveRecord,
    Field(RecordField),
}

/// Effect of a single line on the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<'a> {
    StartRecord(&'a str),
    Enter(RecordField),
    Append(RecordField, &'a str),
    Discard,
}

impl ParserState {
    pub fn transition<'a>(self, line: LineKind<'a>) -> (ParserState, Transition<'a>) {
        match (self, line) {
            (_, LineKind::RecordStart(id)) => {
                (ParserState::NoActiveRecord, Transition::StartRecord(id))
            }
            (_, LineKind::Section(field)) => (ParserState::Field(field), Transition::Enter(field)),
            (ParserState::Field(field), LineKind::Content(text)) => {
                (self, Transition::Append(field, text))
            }
            (ParserState::NoActiveRecord, LineKind::Content(_)) => (self, Transition::Discard),
        }
    }
}

/// Lazy iterator over the document records of one corpus source.
///
/// Yields at most one error, after which it is exhausted.
pub struct RecordParser<R> {
    lines: Lines<R>,
    origin: String,
    line_number: usize,
    state: ParserState,
    current: Option<DocumentRecord>,
    finished: bool,
}

impl<R: BufRead> RecordParser<R> {
    pub fn new(reader: R, origin: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            origin: origin.into(),
            line_number: 0,
            state: ParserState::NoActiveRecord,
            current: None,
            finished: false,
        }
    }

    fn fail(&mut self, error: PipelineError) -> Option<Result<DocumentRecord>> {
        self.finished = true;
        self.current = None;
        Some(Err(error))
    }

    fn emit(&self, record: DocumentRecord) -> Option<Result<DocumentRecord>> {
        debug!("Parsed document {} from {}", record.id, self.origin);
        Some(Ok(record))
    }
}

impl<R: BufRead> Iterator for RecordParser<R> {
    type Item = Result<DocumentRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(source)) => {
                    let origin = self.origin.clone();
                    return self.fail(PipelineError::SourceRead { origin, source });
                }
                None => {
                    self.finished = true;
                    let record = self.current.take()?;
                    return self.emit(record);
                }
            };
            self.line_number += 1;

            let (next_state, transition) = self.state.transition(classify(&line));
            self.state = next_state;

            match transition {
                Transition::StartRecord(id) => {
                    if id.trim().is_empty() {
                        let error = PipelineError::MalformedRecord {
                            origin: self.origin.clone(),
                            line: self.line_number,
                            message: "record start tag without an id".to_string(),
                        };
                        return self.fail(error);
                    }

                    let completed = self.current.replace(DocumentRecord::new(id));
                    if let Some(record) = completed {
                        return self.emit(record);
                    }
                }
                Transition::Append(field, text) => {
                    if let Some(record) = self.current.as_mut() {
                        record.append(field, text);
                    }
                }
                Transition::Enter(_) | Transition::Discard => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{self, Cursor, Read};

    fn parse(input: &str) -> Vec<Result<DocumentRecord>> {
        RecordParser::new(Cursor::new(input.as_bytes().to_vec()), "test corpus").collect()
    }

    fn parse_ok(input: &str) -> Vec<DocumentRecord> {
        parse(input)
            .into_iter()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_two_record_corpus() {
        let records = parse_ok(".I 1\n.T\nAlpha\n.W\nfoo bar\n.I 2\n.T\nBeta\n.W\nbaz");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].title, "Alpha ");
        assert_eq!(records[0].content, "foo bar ");
        assert_eq!(records[1].id, "2");
        assert_eq!(records[1].title, "Beta ");
        assert_eq!(records[1].content, "baz ");
    }

    #[test]
    fn test_all_sections_accumulate() {
        let input = "\
.I 1
.T
experimental investigation of the aerodynamics of a
wing in a slipstream .
.A
brenckman,m.
.B
j. ae. scs. 25, 1958, 324.
.W
experimental investigation of the aerodynamics of a
wing in a slipstream .
";
        let records = parse_ok(input);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(
            record.title,
            "experimental investigation of the aerodynamics of a wing in a slipstream . "
        );
        assert_eq!(record.author, "brenckman,m. ");
        assert_eq!(record.bibliography, "j. ae. scs. 25, 1958, 324. ");
        assert_eq!(record.content, record.title);
    }

    #[test]
    fn test_empty_corpus() {
        assert!(parse("").is_empty());
        assert!(parse("no tags here\n.T\nstill none\n").is_empty());
    }

    #[test]
    fn test_record_count_matches_start_tags() {
        let input = (1..=25)
            .map(|i| format!(".I {i}\n.W\nbody {i}\n"))
            .collect::<String>();

        let records = parse_ok(&input);

        assert_eq!(records.len(), 25);
        assert_eq!(records.last().unwrap().id, "25");
        assert_eq!(records.last().unwrap().content, "body 25 ");
    }

    #[test]
    fn test_last_record_emitted_without_trailing_tag() {
        let records = parse_ok(".I 9\n.W\nonly record");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "only record ");
    }

    #[test]
    fn test_content_before_section_tag_is_discarded() {
        let records = parse_ok("preamble\n.I 1\nloose line\n.T\ntitle\n");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "title ");
        assert!(records[0].content.is_empty());
        assert!(records[0].author.is_empty());
    }

    #[test]
    fn test_fields_reset_between_records() {
        let records = parse_ok(".I 1\n.A\nsmith\n.I 2\n.W\ntext\n");

        assert_eq!(records[0].author, "smith ");
        assert!(records[1].author.is_empty());
        assert_eq!(records[1].content, "text ");
    }

    #[test]
    fn test_record_start_resets_active_field() {
        let records = parse_ok(".I 1\n.W\nfirst\n.I 2\nstray\n.W\nsecond\n");

        assert_eq!(records[1].content, "second ");
    }

    #[test]
    fn test_consecutive_tags_and_short_lines() {
        let records = parse_ok(".I 1\n.T\n.A\n.B\n.W\n\nx\n.\n");

        assert_eq!(records.len(), 1);
        assert!(records[0].title.is_empty());
        assert_eq!(records[0].content, " x . ");
    }

    #[test]
    fn test_id_kept_verbatim() {
        let records = parse_ok(".I doc 12\n.W\nx\n.I  7\n");
        assert_eq!(records[0].id, "doc 12");
        assert_eq!(records[1].id, " 7");
    }

    #[test]
    fn test_crlf_line_endings() {
        let records = parse_ok(".I 1\r\n.T\r\nAlpha\r\n");
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].title, "Alpha ");
    }

    #[test]
    fn test_empty_id_aborts_batch() {
        let results = parse(".I 1\n.W\nok\n.I\n.W\nlost\n.I 3\n");

        assert_eq!(results.len(), 1);
        match &results[0] {
            Err(PipelineError::MalformedRecord { line, .. }) => assert_eq!(*line, 4),
            other => panic!("expected malformed record, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_first_id_rejected() {
        let results = parse(".I   \n.W\ntext\n");
        assert!(matches!(
            results.as_slice(),
            [Err(PipelineError::MalformedRecord { line: 1, .. })]
        ));
    }

    #[test]
    fn test_invalid_utf8_is_source_error() {
        let mut bytes = b".I 1\n.W\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);

        let results: Vec<_> = RecordParser::new(Cursor::new(bytes), "bad corpus").collect();

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(PipelineError::SourceRead { .. })));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk went away"))
        }
    }

    #[test]
    fn test_read_failure_ends_iteration() {
        let mut parser = RecordParser::new(io::BufReader::new(FailingReader), "broken");

        assert!(matches!(parser.next(), Some(Err(PipelineError::SourceRead { .. }))));
        assert!(parser.next().is_none());
    }

    #[test]
    fn test_transition_table() {
        use RecordField::*;

        let state = ParserState::NoActiveRecord;
        assert_eq!(
            state.transition(LineKind::Content("x")),
            (ParserState::NoActiveRecord, Transition::Discard)
        );
        assert_eq!(
            state.transition(LineKind::Section(Author)),
            (ParserState::Field(Author), Transition::Enter(Author))
        );

        let state = ParserState::Field(Title);
        assert_eq!(
            state.transition(LineKind::Content("x")),
            (ParserState::Field(Title), Transition::Append(Title, "x"))
        );
        assert_eq!(
            state.transition(LineKind::Section(Content)),
            (ParserState::Field(Content), Transition::Enter(Content))
        );
        assert_eq!(
            state.transition(LineKind::RecordStart("5")),
            (ParserState::NoActiveRecord, Transition::StartRecord("5"))
        );
    }
}
