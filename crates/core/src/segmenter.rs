use std::io::{BufRead, ErrorKind};

use tracing::debug;

use crate::{InputError, RawStatement, Result, SourceLocation};

pub const STATEMENT_TERMINATOR: char = ';';

/// Splits a dump into terminator-delimited statements, one line at a time.
///
/// Lines that are blank or start with a denylisted prefix are dropped before
/// they reach the statement buffer. A statement ends on the first line whose
/// trimmed text ends with [`STATEMENT_TERMINATOR`]. Terminators inside string
/// literals are not special-cased, and a split can never be undone.
pub struct StatementSegmenter<R> {
    reader: R,
    denylist: Vec<String>,
    line: Vec<u8>,
    buffer: String,
    line_number: usize,
    statement_start: usize,
    finished: bool,
}

impl<R: BufRead> StatementSegmenter<R> {
    pub fn new(reader: R, denylist: Vec<String>) -> Self {
        Self {
            reader,
            denylist,
            line: Vec::new(),
            buffer: String::new(),
            line_number: 0,
            statement_start: 0,
            finished: false,
        }
    }

    #[must_use]
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    fn read_line(&mut self) -> std::result::Result<usize, std::io::Error> {
        self.line.clear();
        loop {
            match self.reader.read_until(b'\n', &mut self.line) {
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }

    fn discard_unterminated_tail(&mut self) {
        let tail = self.buffer.trim();
        if !tail.is_empty() {
            debug!(
                line = self.statement_start,
                bytes = tail.len(),
                "discarding unterminated statement at end of input"
            );
        }
        self.buffer.clear();
    }
}

impl<R: BufRead> Iterator for StatementSegmenter<R> {
    type Item = Result<RawStatement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.read_line() {
                Ok(0) => {
                    self.finished = true;
                    self.discard_unterminated_tail();
                    return None;
                }
                Ok(_) => {}
                Err(source) => {
                    self.finished = true;
                    return Some(Err(InputError::Read {
                        line: self.line_number + 1,
                        source,
                    }
                    .into()));
                }
            }
            self.line_number += 1;

            let text = String::from_utf8_lossy(&self.line);
            let trimmed = text.trim();
            if trimmed.is_empty() || is_denied(&self.denylist, trimmed) {
                continue;
            }

            if self.buffer.is_empty() {
                self.statement_start = self.line_number;
            }
            self.buffer.push_str(&text);

            if trimmed.ends_with(STATEMENT_TERMINATOR) {
                let statement = std::mem::take(&mut self.buffer);
                return Some(Ok(RawStatement::new(
                    statement.trim(),
                    SourceLocation::line(self.statement_start),
                )));
            }
        }
    }
}

fn is_denied(denylist: &[String], trimmed_line: &str) -> bool {
    denylist
        .iter()
        .any(|prefix| trimmed_line.starts_with(prefix.as_str()))
}
