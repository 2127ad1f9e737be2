//! EMBL and GenBank flat-file reading and writing.
//!
//! - **Reading** — [`RecordStream`] yields one [`Record`] at a time with its
//!   [`Diagnostics`]; a malformed record never stops the stream
//! - **Writing** — [`EmblWriter`] and [`GenbankWriter`] reproduce canonical
//!   input byte for byte and normalize everything else
//! - **Configuration** — [`ReaderConfig`] picks the dialect and which bulky
//!   blocks to decode
//!
//! Block readers, the line cursor and the record assembler are public for
//! callers that need to drive parsing themselves.

pub mod assembler;
pub mod block;
pub mod config;
pub mod cursor;
pub mod embl;
pub mod embl_write;
pub mod feature_table;
pub mod genbank;
pub mod genbank_write;
pub mod stream;
pub mod writer;

use std::path::Path;

use flatseq_core::{Diagnostics, Result};
use flatseq_record::Record;

pub use config::ReaderConfig;
pub use embl_write::EmblWriter;
pub use genbank_write::GenbankWriter;
pub use stream::RecordStream;
pub use writer::{write_record, write_records, write_records_with, RecordWriter};

fn collect_all<R: std::io::BufRead>(
    stream: RecordStream<R>,
) -> Result<Vec<(Record, Diagnostics)>> {
    stream.collect()
}

/// Parse every EMBL record in `input`.
pub fn parse_embl_str(input: &str) -> Result<Vec<(Record, Diagnostics)>> {
    collect_all(RecordStream::new(input.as_bytes(), ReaderConfig::embl()))
}

/// Parse every EMBL record in a (possibly gzip-compressed) file.
pub fn parse_embl(path: impl AsRef<Path>) -> Result<Vec<(Record, Diagnostics)>> {
    collect_all(RecordStream::from_path(path, ReaderConfig::embl())?)
}

/// Parse every GenBank record in `input`.
pub fn parse_genbank_str(input: &str) -> Result<Vec<(Record, Diagnostics)>> {
    collect_all(RecordStream::new(input.as_bytes(), ReaderConfig::genbank()))
}

/// Parse every GenBank record in a (possibly gzip-compressed) file.
pub fn parse_genbank(path: impl AsRef<Path>) -> Result<Vec<(Record, Diagnostics)>> {
    collect_all(RecordStream::from_path(path, ReaderConfig::genbank())?)
}

/// Write EMBL records back to back.
pub fn write_embl<'a>(records: impl IntoIterator<Item = &'a Record>) -> Result<String> {
    write_records_with(&EmblWriter, records)
}

/// Write GenBank records back to back.
pub fn write_genbank<'a>(records: impl IntoIterator<Item = &'a Record>) -> Result<String> {
    write_records_with(&GenbankWriter, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatseq_core::{Dialect, FlatseqError};

    #[test]
    fn string_entry_points() {
        let parsed =
            parse_embl_str("ID   A1; SV 1; linear; DNA; STD; PRO; 0 BP.\nDE   x\n//\n").unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].0.dialect, Dialect::Embl);

        let records: Vec<Record> = parsed.into_iter().map(|(r, _)| r).collect();
        assert!(matches!(write_genbank(&records), Err(FlatseqError::DialectMismatch { .. })));
        assert!(write_embl(&records).unwrap().ends_with("//\n"));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(parse_genbank("/nonexistent/x.gb"), Err(FlatseqError::Io(_))));
    }
}
