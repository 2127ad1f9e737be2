//! Lazy record iteration over a flat file.

use std::io::BufRead;
use std::iter::FusedIterator;
use std::path::Path;

use log::{debug, warn};

use flatseq_core::compress::open_path;
use flatseq_core::{Diagnostics, Dialect, FlatseqError, Result};
use flatseq_record::Record;

use crate::assembler::RecordAssembler;
use crate::config::ReaderConfig;
use crate::cursor::LineCursor;
use crate::embl::EmblSyntax;
use crate::genbank::GenbankSyntax;

/// Iterator over the records of one input, each with its own diagnostics.
///
/// Malformed records are still yielded; only an I/O failure is returned as
/// `Err`, after which the stream ends.
#[derive(Debug)]
pub struct RecordStream<R> {
    cursor: LineCursor<R>,
    config: ReaderConfig,
    records: usize,
    finished: bool,
}

impl<R: BufRead> RecordStream<R> {
    pub fn new(reader: R, config: ReaderConfig) -> Self {
        Self {
            cursor: LineCursor::new(reader),
            config,
            records: 0,
            finished: false,
        }
    }

    /// Choose the dialect from the first non-blank line.
    ///
    /// Empty input yields an empty EMBL stream.
    pub fn autodetect(reader: R) -> Result<Self> {
        let mut cursor = LineCursor::new(reader);
        let dialect = loop {
            let Some(line) = cursor.peek_line()? else {
                break Dialect::default();
            };
            if !line.is_blank() {
                break Dialect::detect(&line.text).ok_or_else(|| {
                    FlatseqError::Parse(format!(
                        "line {}: not an EMBL or GenBank record start",
                        line.number
                    ))
                })?;
            }
            cursor.next_line()?;
        };
        debug!("detected {dialect} input");
        Ok(Self {
            cursor,
            config: ReaderConfig::new(dialect),
            records: 0,
            finished: false,
        })
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Records yielded so far.
    pub fn records_read(&self) -> usize {
        self.records
    }

    fn read_next(&mut self) -> Result<Option<(Record, Diagnostics)>> {
        match self.config.dialect {
            Dialect::Embl => {
                RecordAssembler::<EmblSyntax>::new(self.config).next_record(&mut self.cursor)
            }
            Dialect::GenBank => {
                RecordAssembler::<GenbankSyntax>::new(self.config).next_record(&mut self.cursor)
            }
        }
    }
}

impl RecordStream<Box<dyn BufRead>> {
    /// Open a file, decompressing gzip transparently.
    pub fn from_path(path: impl AsRef<Path>, config: ReaderConfig) -> Result<Self> {
        Ok(Self::new(open_path(path)?, config))
    }
}

impl<R: BufRead> Iterator for RecordStream<R> {
    type Item = Result<(Record, Diagnostics)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_next() {
            Ok(Some(entry)) => {
                self.records += 1;
                Some(Ok(entry))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                warn!(
                    "stream stopped at line {} after {} records: {e}",
                    self.cursor.line_number(),
                    self.records
                );
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> FusedIterator for RecordStream<R> {}
