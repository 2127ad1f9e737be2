//! Record serialization shared by both dialects.

use flatseq_core::{Dialect, FlatseqError, Result};
use flatseq_record::qualifier::joins_without_space;
use flatseq_record::{Feature, Qualifier, Record};

use crate::embl_write::EmblWriter;
use crate::feature_table::KEY_WIDTH;
use crate::genbank_write::GenbankWriter;

/// Serializes records of one dialect.
pub trait RecordWriter {
    fn dialect(&self) -> Dialect;

    /// Render `record` as flat-file text, terminator included.
    fn write(&self, record: &Record) -> Result<String>;

    /// Reject records of the other dialect.
    fn check_dialect(&self, record: &Record) -> Result<()> {
        if record.dialect == self.dialect() {
            Ok(())
        } else {
            Err(FlatseqError::DialectMismatch {
                expected: self.dialect(),
                found: record.dialect,
            })
        }
    }
}

/// Write a record in its own dialect.
pub fn write_record(record: &Record) -> Result<String> {
    match record.dialect {
        Dialect::Embl => EmblWriter.write(record),
        Dialect::GenBank => GenbankWriter.write(record),
    }
}

/// Write several records back to back, each in its own dialect.
pub fn write_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Result<String> {
    concat(records, write_record)
}

/// Write several records back to back with one writer. Fails on the first
/// record of the other dialect.
pub fn write_records_with<'a>(
    writer: &dyn RecordWriter,
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<String> {
    concat(records, |record| writer.write(record))
}

fn concat<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    write: impl Fn(&Record) -> Result<String>,
) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&write(record)?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Wrapping
// ---------------------------------------------------------------------------

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Greedy word wrap at spaces. A word longer than `width` gets a line of
/// its own and is never split. Always returns at least one line.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if char_len(&current) + 1 + char_len(word) <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lines of preformatted text: kept as written when they fit, word-wrapped
/// otherwise.
pub fn wrap_preformatted(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for line in text.split('\n') {
        let line = line.trim_end();
        if char_len(line) <= width {
            lines.push(line.to_string());
        } else {
            lines.extend(wrap_words(line, width));
        }
    }
    lines
}

/// Greedy wrap breaking only after `separator`, as used for locations.
pub fn wrap_after(text: &str, width: usize, separator: char) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for piece in text.split_inclusive(separator) {
        if !current.is_empty() && char_len(&current) + char_len(piece) > width {
            lines.push(std::mem::take(&mut current));
        }
        current.push_str(piece);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cut `text` into lines of exactly `width` characters, moving a cut
/// earlier when it would leave whitespace at either side of the break. The
/// first line keeps at least `keep` characters.
pub fn wrap_exact(text: &str, width: usize, keep: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let bad_cut = |cut: usize| chars[cut].is_whitespace() || chars[cut - 1].is_whitespace();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut line_width = width.max(keep).max(1);
    while chars.len() - start > line_width {
        let full = start + line_width;
        let floor = if start == 0 { keep.max(1) } else { start + 1 };
        let mut cut = full;
        while cut > floor && bad_cut(cut) {
            cut -= 1;
        }
        if bad_cut(cut) {
            cut = full;
        }
        lines.push(chars[start..cut].iter().collect());
        start = cut;
        line_width = width.max(1);
    }
    lines.push(chars[start..].iter().collect());
    lines
}

// ---------------------------------------------------------------------------
// Feature table
// ---------------------------------------------------------------------------

/// Sort position of a feature key: `source` first, everything else after.
pub fn feature_priority(name: &str) -> u8 {
    match name {
        "source" => 0,
        _ => 1,
    }
}

/// Features in canonical order: priority, then smallest start coordinate,
/// then input order.
pub fn sorted_features(features: &[Feature]) -> Vec<&Feature> {
    let mut sorted: Vec<&Feature> = features.iter().collect();
    sorted.sort_by_key(|f| {
        (
            feature_priority(&f.name),
            f.locations.min_position().unwrap_or(u64::MAX),
        )
    });
    sorted
}

/// Text lines of a qualifier wrapped to `width`.
pub fn qualifier_lines(qualifier: &Qualifier, width: usize) -> Vec<String> {
    let text = qualifier.flat_text();
    if joins_without_space(&qualifier.name) {
        let opening = qualifier.name.chars().count() + if qualifier.quoted { 3 } else { 2 };
        wrap_exact(&text, width, opening)
    } else {
        wrap_words(&text, width)
    }
}

/// Feature table lines, each starting with `prefix` (`"FT   "` or five
/// spaces), with text wrapped to `width` columns after the key.
pub fn feature_table_lines(features: &[Feature], prefix: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for feature in sorted_features(features) {
        let location = if feature.locations.is_empty() {
            vec![String::new()]
        } else {
            wrap_after(&feature.locations.to_string(), width, ',')
        };
        let mut key = feature.name.as_str();
        let texts = location
            .into_iter()
            .chain(feature.qualifiers.iter().flat_map(|q| qualifier_lines(q, width)));
        for text in texts {
            let line = format!("{prefix}{key:<key_width$}{text}", key_width = KEY_WIDTH);
            lines.push(line.trim_end().to_string());
            key = "";
        }
    }
    lines
}
