//! GenBank serialization.
//!
//! Keywords occupy the first 12 columns and content runs to column 79.
//! Sub-keywords such as `AUTHORS` or `ORGANISM` are indented inside the
//! keyword columns; feature lines start their key at column 6.

use flatseq_core::{Dialect, Result, Sequence};
use flatseq_record::record::format_flat_date;
use flatseq_record::{Record, Reference, SequenceBlock};

use crate::writer::{feature_table_lines, wrap_after, wrap_preformatted, wrap_words, RecordWriter};

/// Columns reserved for the keyword.
pub const KEYWORD_WIDTH: usize = 12;

/// Content width after the keyword columns.
pub const CONTENT_WIDTH: usize = 67;

/// Width of feature location and qualifier text.
pub const FEATURE_TEXT_WIDTH: usize = 58;

const BASES_PER_LINE: usize = 60;

/// Writes records as GenBank flat files.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenbankWriter;

/// `keyword` on the first line, blank keyword columns on the rest.
fn keyword_lines(keyword: &str, lines: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut head = keyword;
    lines
        .into_iter()
        .map(|line| {
            let out = format!("{head:<width$}{line}", width = KEYWORD_WIDTH);
            head = "";
            out.trim_end().to_string()
        })
        .collect()
}

fn sub_keyword(keyword: &str) -> String {
    format!("  {keyword:<10}")
}

fn locus_line(record: &Record) -> String {
    let id = record.identification.clone().unwrap_or_default();
    let name = id
        .name
        .as_deref()
        .or_else(|| record.primary_accession())
        .unwrap_or("XXX");
    let length = id
        .sequence_length
        .or_else(|| record.sequence.as_ref().map(|s| s.len() as u64))
        .unwrap_or(0);
    let strand = id
        .strandedness
        .as_deref()
        .map_or_else(String::new, |s| format!("{s}-"));
    let molecule = id.molecule_type.as_deref().unwrap_or("DNA");
    let topology = id.topology.map_or_else(String::new, |t| t.to_string());
    let division = id.division.as_deref().unwrap_or("UNA");
    let date = id.date.map_or_else(String::new, format_flat_date);
    let line = format!(
        "LOCUS       {name:<16} {length:>11} bp {strand:<3}{molecule:<6}  {topology:<8} {division} {date}"
    );
    line.trim_end().to_string()
}

/// `a, b and c`.
fn format_authors(authors: &[String]) -> String {
    match authors.split_last() {
        Some((last, head)) if !head.is_empty() => format!("{} and {last}", head.join(", ")),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

fn reference_lines(reference: &Reference, index: usize) -> Vec<String> {
    let number = reference.number.unwrap_or(index as u32 + 1);
    let mut heading = number.to_string();
    if !reference.positions.is_empty() {
        let ranges: Vec<String> = reference
            .positions
            .iter()
            .map(|(b, e)| format!("{b} to {e}"))
            .collect();
        heading.push_str(&format!("  (bases {})", ranges.join("; ")));
    } else if let Some(note) = &reference.heading_note {
        heading.push_str(&format!("  {note}"));
    }
    let mut lines = keyword_lines("REFERENCE", [heading]);

    if !reference.authors.is_empty() {
        let authors = format_authors(&reference.authors);
        lines.extend(keyword_lines(&sub_keyword("AUTHORS"), wrap_words(&authors, CONTENT_WIDTH)));
    }
    if let Some(group) = &reference.group {
        lines.extend(keyword_lines(&sub_keyword("CONSRTM"), wrap_words(group, CONTENT_WIDTH)));
    }
    if let Some(title) = &reference.title {
        lines.extend(keyword_lines(&sub_keyword("TITLE"), wrap_words(title, CONTENT_WIDTH)));
    }
    if !reference.location_lines.is_empty() {
        let journal = reference.location_lines.join("\n");
        lines.extend(keyword_lines(
            &sub_keyword("JOURNAL"),
            wrap_preformatted(&journal, CONTENT_WIDTH),
        ));
    }
    for xref in &reference.cross_references {
        let keyword = match xref.database.to_ascii_uppercase().as_str() {
            "MEDLINE" => sub_keyword("MEDLINE"),
            "PUBMED" => "   PUBMED   ".to_string(),
            _ => continue,
        };
        lines.push(format!("{keyword}{}", xref.primary_id));
    }
    if let Some(remark) = &reference.comment {
        lines.extend(keyword_lines(&sub_keyword("REMARK"), wrap_words(remark, CONTENT_WIDTH)));
    }
    lines
}

fn origin_lines(sequence: &SequenceBlock) -> Vec<String> {
    let mut lines = vec!["ORIGIN".to_string()];
    for (i, chunk) in sequence.as_bytes().chunks(BASES_PER_LINE).enumerate() {
        let groups: Vec<String> = chunk
            .chunks(10)
            .map(|g| String::from_utf8_lossy(g).into_owned())
            .collect();
        lines.push(format!("{:>9} {}", i * BASES_PER_LINE + 1, groups.join(" ")));
    }
    lines
}

impl RecordWriter for GenbankWriter {
    fn dialect(&self) -> Dialect {
        Dialect::GenBank
    }

    fn write(&self, record: &Record) -> Result<String> {
        self.check_dialect(record)?;
        let mut lines = vec![locus_line(record)];

        let description = record.description_text().unwrap_or_default();
        lines.extend(keyword_lines("DEFINITION", wrap_words(description, CONTENT_WIDTH)));

        if let Some(ac) = &record.accessions {
            let all: Vec<&str> = ac.all().collect();
            lines.extend(keyword_lines("ACCESSION", wrap_words(&all.join(" "), CONTENT_WIDTH)));
        }

        if let Some(version) = &record.version {
            let mut text = version.to_string();
            if let Some(gi) = &version.gi {
                text.push_str(&format!("  GI:{gi}"));
            }
            lines.extend(keyword_lines("VERSION", [text]));
        }

        if let Some(dblink) = &record.project_links {
            let links = dblink.links.iter().flat_map(|l| {
                wrap_words(&format!("{}: {}", l.database, l.ids.join(", ")), CONTENT_WIDTH)
            });
            lines.extend(keyword_lines("DBLINK", links));
        }

        if let Some(kw) = &record.keywords {
            let text = format!("{}.", kw.keywords.join("; "));
            lines.extend(keyword_lines("KEYWORDS", wrap_words(&text, CONTENT_WIDTH)));
        }

        if let Some(os) = &record.organism {
            let source = os.source.clone().unwrap_or_else(|| os.display_name());
            lines.extend(keyword_lines("SOURCE", wrap_words(&source, CONTENT_WIDTH)));
            let mut organism = vec![os.scientific_name.clone()];
            if !os.lineage.is_empty() {
                organism.extend(wrap_words(&format!("{}.", os.lineage.join("; ")), CONTENT_WIDTH));
            }
            lines.extend(keyword_lines(&sub_keyword("ORGANISM"), organism));
        }

        for (i, reference) in record.references.iter().enumerate() {
            lines.extend(reference_lines(reference, i));
        }

        for unknown in &record.unknown_blocks {
            lines.extend(unknown.lines.iter().cloned());
        }

        if let Some(comment) = &record.comment {
            lines.extend(keyword_lines("COMMENT", wrap_preformatted(&comment.text, CONTENT_WIDTH)));
        }

        if !record.features.is_empty() {
            lines.push("FEATURES             Location/Qualifiers".to_string());
            lines.extend(feature_table_lines(&record.features, "     ", FEATURE_TEXT_WIDTH));
        }

        if let Some(contig) = record.contig.as_ref().filter(|c| !c.is_empty()) {
            let joined = wrap_after(&contig.to_string(), CONTENT_WIDTH, ',');
            lines.extend(keyword_lines("CONTIG", joined));
        }

        if let Some(sequence) = &record.sequence {
            lines.extend(origin_lines(sequence));
        }

        let mut out = String::new();
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str("//\n");
        Ok(out)
    }
}
