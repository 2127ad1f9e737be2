//! Line-by-line access to a flat file with one line of lookahead.

use std::io::BufRead;

use flatseq_core::{FlatseqError, Result};

/// One physical line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number.
    pub number: u32,
    /// Line text without the trailing `\n` / `\r\n`.
    pub text: String,
}

impl Line {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Reads numbered lines from a [`BufRead`], supporting a single line of
/// peek or push-back.
///
/// Invalid UTF-8 is decoded lossily rather than failing the read.
#[derive(Debug)]
pub struct LineCursor<R> {
    reader: R,
    line_number: u32,
    pending: Option<Line>,
    buf: Vec<u8>,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            pending: None,
            buf: Vec::new(),
        }
    }

    /// Number of the last physical line read from the underlying reader.
    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    /// Look at the next line without consuming it.
    pub fn peek_line(&mut self) -> Result<Option<&Line>> {
        if self.pending.is_none() {
            self.pending = self.read_physical()?;
        }
        Ok(self.pending.as_ref())
    }

    /// Consume and return the next line; `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<Line>> {
        match self.pending.take() {
            Some(line) => Ok(Some(line)),
            None => self.read_physical(),
        }
    }

    /// Return `line` to the cursor so the next read yields it again.
    ///
    /// Only one line may be pending; pushing back a second is an error.
    pub fn push_back(&mut self, line: Line) -> Result<()> {
        if self.pending.is_some() {
            return Err(FlatseqError::InvalidInput(format!(
                "cannot push back line {}: line {} is already pending",
                line.number,
                self.pending.as_ref().map_or(0, |l| l.number)
            )));
        }
        self.pending = Some(line);
        Ok(())
    }

    fn read_physical(&mut self) -> Result<Option<Line>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
            self.buf.pop();
        }
        self.line_number += 1;
        let text = String::from_utf8_lossy(&self.buf).into_owned();
        Ok(Some(Line::new(self.line_number, text)))
    }
}
