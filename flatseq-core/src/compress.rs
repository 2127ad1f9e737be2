//! Transparent input decompression.
//!
//! Flat files are routinely distributed gzip-compressed (`.dat.gz`,
//! `.gbff.gz`). [`open_path`] sniffs the magic bytes and hands back a
//! buffered reader over the decoded text either way.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::{FlatseqError, Result};

/// Supported compression algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Gzip,
}

/// Detect the compression algorithm from the magic bytes of `data`.
///
/// Returns `None` if the data does not match a known format.
pub fn detect_algorithm(data: &[u8]) -> Option<Algorithm> {
    if data.len() >= 2 && data[..2] == [0x1F, 0x8B] {
        Some(Algorithm::Gzip)
    } else {
        None
    }
}

/// Wrap `reader`, decoding gzip (including multi-member/BGZF) if present.
pub fn decode_reader<R: Read + 'static>(reader: R) -> Result<Box<dyn BufRead>> {
    let mut buffered = BufReader::new(reader);
    let algorithm = detect_algorithm(buffered.fill_buf()?);
    Ok(match algorithm {
        Some(Algorithm::Gzip) => Box::new(BufReader::new(MultiGzDecoder::new(buffered))),
        None => Box::new(buffered),
    })
}

/// Open a (possibly gzip-compressed) text file for line reading.
pub fn open_path(path: impl AsRef<Path>) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        FlatseqError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    decode_reader(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    #[test]
    fn detect_gzip_magic() {
        assert_eq!(detect_algorithm(&[0x1F, 0x8B, 0x08]), Some(Algorithm::Gzip));
        assert_eq!(detect_algorithm(b"ID   X"), None);
        assert_eq!(detect_algorithm(&[0x1F]), None);
    }

    #[test]
    fn open_plain_and_gzip() {
        let text = "ID   X56734;\n//\n";

        let mut plain = tempfile::NamedTempFile::new().unwrap();
        plain.write_all(text.as_bytes()).unwrap();
        plain.flush().unwrap();
        let mut decoded = String::new();
        open_path(plain.path()).unwrap().read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, text);

        let mut gz = tempfile::NamedTempFile::new().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        gz.write_all(&encoder.finish().unwrap()).unwrap();
        gz.flush().unwrap();
        let mut decoded = String::new();
        open_path(gz.path()).unwrap().read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, text);
    }

    #[test]
    fn open_missing_file() {
        let err = open_path("/nonexistent/flatseq/input.embl").err().unwrap();
        assert!(matches!(err, FlatseqError::Io(_)));
        assert!(err.to_string().contains("input.embl"));
    }
}
