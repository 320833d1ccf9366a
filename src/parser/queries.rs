// file: src/parser/queries.rs
// description: streaming reader for tagged query collections
// reference: Cranfield query format (cran.qry)

use crate::error::{PipelineError, Result};
use crate::models::QueryRecord;
use crate::parser::tags::{LineKind, classify};
use std::io::{BufRead, Lines};

/// Lazy iterator over the queries of one query source.
///
/// Only `.I` is a tag here; every other line belongs to the query text.
/// Query ids count up from 1 in reading order.
pub struct QueryBatchReader<R> {
    lines: Lines<R>,
    origin: String,
    next_id: u32,
    current: Option<QueryRecord>,
    finished: bool,
}

impl<R: BufRead> QueryBatchReader<R> {
    pub fn new(reader: R, origin: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            origin: origin.into(),
            next_id: 1,
            current: None,
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for QueryBatchReader<R> {
    type Item = Result<QueryRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(source)) => {
                    self.finished = true;
                    self.current = None;
                    return Some(Err(PipelineError::SourceRead {
                        origin: self.origin.clone(),
                        source,
                    }));
                }
                None => {
                    self.finished = true;
                    return self.current.take().map(Ok);
                }
            };

            match classify(&line) {
                LineKind::RecordStart(label) => {
                    let query = QueryRecord::new(self.next_id, label);
                    self.next_id += 1;
                    if let Some(completed) = self.current.replace(query) {
                        return Some(Ok(completed));
                    }
                }
                _ => {
                    if let Some(query) = self.current.as_mut() {
                        query.append_line(&line);
                    }
                }
            }
        }
    }
}
