//! EMBL serialization.
//!
//! Lines are at most 80 columns: a tag padded to five columns followed by up
//! to 75 columns of content. Blocks are separated by `XX` lines and the
//! record ends with `//`.

use flatseq_core::{Dialect, Result, Sequence};
use flatseq_record::record::format_flat_date;
use flatseq_record::{Record, Reference, SequenceBlock};

use crate::embl::ABSENT;
use crate::writer::{feature_table_lines, wrap_after, wrap_preformatted, wrap_words, RecordWriter};

/// Maximum content width after the tag columns.
pub const CONTENT_WIDTH: usize = 75;

/// Width of feature location and qualifier text.
pub const FEATURE_TEXT_WIDTH: usize = 59;

/// Bases per sequence data line.
const BASES_PER_LINE: usize = 60;

/// Writes records as EMBL flat files.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmblWriter;

fn tagged(tag: &str, lines: impl IntoIterator<Item = String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| format!("{tag:<5}{line}").trim_end().to_string())
        .collect()
}

fn or_absent(value: Option<&str>) -> &str {
    value.unwrap_or(ABSENT)
}

fn id_line(record: &Record) -> String {
    let id = record.identification.clone().unwrap_or_default();
    let version = id
        .sequence_version
        .map_or_else(|| ABSENT.to_string(), |v| v.to_string());
    let topology = id.topology.map_or_else(|| ABSENT.to_string(), |t| t.to_string());
    let length = id
        .sequence_length
        .or_else(|| record.sequence.as_ref().map(|s| s.len() as u64))
        .unwrap_or(0);
    format!(
        "ID   {}; SV {}; {}; {}; {}; {}; {} BP.",
        or_absent(id.name.as_deref()),
        version,
        topology,
        or_absent(id.molecule_type.as_deref()),
        or_absent(id.data_class.as_deref()),
        or_absent(id.division.as_deref()),
        length
    )
}

fn reference_lines(reference: &Reference, index: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "RN   [{}]",
        reference.number.unwrap_or(index as u32 + 1)
    )];
    if let Some(comment) = &reference.comment {
        lines.extend(tagged("RC", wrap_words(comment, CONTENT_WIDTH)));
    }
    if !reference.positions.is_empty() {
        let spans: Vec<String> = reference
            .positions
            .iter()
            .map(|(b, e)| format!("{b}-{e}"))
            .collect();
        lines.extend(tagged("RP", wrap_words(&spans.join(", "), CONTENT_WIDTH)));
    }
    for xref in &reference.cross_references {
        lines.extend(tagged("RX", wrap_words(&xref.to_string(), CONTENT_WIDTH)));
    }
    if let Some(group) = &reference.group {
        lines.extend(tagged("RG", wrap_words(group, CONTENT_WIDTH)));
    }
    if !reference.authors.is_empty() {
        let authors = format!("{};", reference.authors.join(", "));
        lines.extend(tagged("RA", wrap_words(&authors, CONTENT_WIDTH)));
    }
    let title = match &reference.title {
        Some(title) => format!("\"{title}\";"),
        None => ";".to_string(),
    };
    lines.extend(tagged("RT", wrap_words(&title, CONTENT_WIDTH)));
    if !reference.location_lines.is_empty() {
        let location = reference.location_lines.join("\n");
        lines.extend(tagged("RL", wrap_preformatted(&location, CONTENT_WIDTH)));
    }
    lines
}

fn sequence_lines(sequence: &SequenceBlock) -> Vec<String> {
    let counts = sequence.base_counts();
    let mut lines = vec![format!(
        "SQ   Sequence {} BP; {} A; {} C; {} G; {} T; {} other;",
        sequence.len(),
        counts.a,
        counts.c,
        counts.g,
        counts.t,
        counts.other
    )];
    let mut written = 0;
    for chunk in sequence.as_bytes().chunks(BASES_PER_LINE) {
        written += chunk.len();
        let groups: Vec<String> = chunk
            .chunks(10)
            .map(|g| String::from_utf8_lossy(g).into_owned())
            .collect();
        lines.push(format!("     {:<65}{:>10}", groups.join(" "), written));
    }
    lines
}

impl RecordWriter for EmblWriter {
    fn dialect(&self) -> Dialect {
        Dialect::Embl
    }

    fn write(&self, record: &Record) -> Result<String> {
        self.check_dialect(record)?;
        let mut blocks: Vec<Vec<String>> = vec![vec![id_line(record)]];

        if let Some(ac) = &record.accessions {
            let mut items = vec![format!("{};", or_absent(ac.primary.as_deref()))];
            items.extend(ac.secondaries.iter().map(|a| format!("{a};")));
            blocks.push(tagged("AC", wrap_words(&items.join(" "), CONTENT_WIDTH)));
        }

        if let Some(pr) = &record.project_links {
            let items: Vec<String> = pr
                .links
                .iter()
                .flat_map(|l| l.ids.iter().map(move |id| format!("{}:{id};", l.database)))
                .collect();
            blocks.push(tagged("PR", wrap_words(&items.join(" "), CONTENT_WIDTH)));
        }

        if let Some(dt) = &record.dates {
            let mut lines = Vec::new();
            if let Some(created) = dt.created {
                lines.push(format!(
                    "DT   {} (Rel. {}, Created)",
                    format_flat_date(created),
                    dt.created_release.unwrap_or(0)
                ));
            }
            if let Some(updated) = dt.updated {
                lines.push(format!(
                    "DT   {} (Rel. {}, Last updated, Version {})",
                    format_flat_date(updated),
                    dt.updated_release.unwrap_or(0),
                    dt.entry_version.unwrap_or(1)
                ));
            }
            if !lines.is_empty() {
                blocks.push(lines);
            }
        }

        let description = record.description_text().unwrap_or_default();
        blocks.push(tagged("DE", wrap_words(description, CONTENT_WIDTH)));

        if let Some(kw) = &record.keywords {
            let text = format!("{}.", kw.keywords.join("; "));
            blocks.push(tagged("KW", wrap_words(&text, CONTENT_WIDTH)));
        }

        if let Some(os) = &record.organism {
            let mut lines = tagged("OS", wrap_words(&os.display_name(), CONTENT_WIDTH));
            if !os.lineage.is_empty() {
                let text = format!("{}.", os.lineage.join("; "));
                lines.extend(tagged("OC", wrap_words(&text, CONTENT_WIDTH)));
            }
            if let Some(organelle) = &os.organelle {
                lines.extend(tagged("OG", wrap_words(organelle, CONTENT_WIDTH)));
            }
            blocks.push(lines);
        }

        for (i, reference) in record.references.iter().enumerate() {
            blocks.push(reference_lines(reference, i));
        }

        if !record.cross_references.is_empty() {
            blocks.push(
                record
                    .cross_references
                    .iter()
                    .flat_map(|x| tagged("DR", wrap_words(&x.to_string(), CONTENT_WIDTH)))
                    .collect(),
            );
        }

        for unknown in &record.unknown_blocks {
            blocks.push(unknown.lines.clone());
        }

        if let Some(cc) = &record.comment {
            blocks.push(tagged("CC", wrap_preformatted(&cc.text, CONTENT_WIDTH)));
        }

        if !record.features.is_empty() {
            let mut lines = vec![
                "FH   Key             Location/Qualifiers".to_string(),
                "FH".to_string(),
            ];
            lines.extend(feature_table_lines(&record.features, "FT   ", FEATURE_TEXT_WIDTH));
            blocks.push(lines);
        }

        if let Some(co) = record.contig.as_ref().filter(|c| !c.is_empty()) {
            blocks.push(tagged("CO", wrap_after(&co.to_string(), CONTENT_WIDTH, ',')));
        }

        if let Some(sq) = &record.sequence {
            blocks.push(sequence_lines(sq));
        }

        let mut out = String::new();
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                out.push_str("XX\n");
            }
            for line in block {
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str("//\n");
        Ok(out)
    }
}
