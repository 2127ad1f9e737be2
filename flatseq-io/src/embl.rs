//! EMBL line layout and block readers.
//!
//! EMBL lines carry a two-letter tag in columns 1–2 with content from
//! column 6. Consecutive lines with the same tag form a block; the
//! reference lines `RN`/`RC`/`RP`/`RX`/`RG`/`RA`/`RT`/`RL` and the organism
//! lines `OS`/`OC`/`OG` each form one block family. `XX` lines only
//! separate blocks.

use std::io::BufRead;

use flatseq_core::{codes, Dialect, Diagnostics, Origin, Result};
use flatseq_record::record::parse_flat_date;
use flatseq_record::{
    Accessions, CrossReference, Dates, DbLink, DbLinks, Identification, Keywords, Organism,
    Reference, SequenceBlock, Text, Topology,
};

use crate::assembler::BlockSyntax;
use crate::block::{
    column_prefix, column_slice, contents, join_comment_lines, join_free_text, read_contig,
    read_residues, split_common_name, split_list, unquote, Block, BlockReader, BlockRule, Fragment,
    LineKind, Occurrence, TaggedLine,
};
use crate::cursor::{Line, LineCursor};
use crate::feature_table::read_feature_table;

/// Column where EMBL line content starts.
pub const CONTENT_COLUMN: usize = 5;

/// Placeholder written where a value is intentionally absent.
pub const ABSENT: &str = "XXX";

/// EMBL block rules in canonical order.
pub static RULES: [BlockRule; 14] = [
    BlockRule::new("ID", Occurrence::ExactlyOnce, 0),
    BlockRule::new("AC", Occurrence::AtMostOnce, 1),
    BlockRule::new("PR", Occurrence::AtMostOnce, 2),
    BlockRule::new("DT", Occurrence::AtMostOnce, 3),
    BlockRule::new("DE", Occurrence::ExactlyOnce, 4),
    BlockRule::new("KW", Occurrence::AtMostOnce, 5),
    BlockRule::new("OS", Occurrence::AtMostOnce, 6),
    BlockRule::new("RN", Occurrence::Any, 7),
    BlockRule::new("DR", Occurrence::AtMostOnce, 8),
    BlockRule::new("CC", Occurrence::AtMostOnce, 9),
    BlockRule::new("FH", Occurrence::AtMostOnce, 11),
    BlockRule::new("FT", Occurrence::AtMostOnce, 12),
    BlockRule::new("CO", Occurrence::AtMostOnce, 13),
    BlockRule::new("SQ", Occurrence::AtMostOnce, 14),
];

/// EMBL line layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmblSyntax;

fn tagged(tag: &str, line: Line) -> TaggedLine {
    let content = column_slice(&line.text, CONTENT_COLUMN).to_string();
    TaggedLine::new(tag, line.number, content, line.text)
}

impl BlockSyntax for EmblSyntax {
    const DIALECT: Dialect = Dialect::Embl;

    fn classify(text: &str) -> LineKind {
        if text.trim().is_empty() {
            LineKind::Blank
        } else if text.starts_with("//") {
            LineKind::Terminator
        } else if text.starts_with(char::is_whitespace) {
            LineKind::Untagged
        } else {
            LineKind::Tagged(column_prefix(text, 2).trim_end().to_string())
        }
    }

    fn family(tag: &str) -> &str {
        match tag {
            "RC" | "RP" | "RX" | "RG" | "RA" | "RT" | "RL" => "RN",
            "OC" | "OG" => "OS",
            other => other,
        }
    }

    fn collect<R: BufRead>(cursor: &mut LineCursor<R>, first: Line, tag: &str) -> Result<Block> {
        let family = Self::family(tag).to_string();
        let mut block = Block::new(family.as_str(), tagged(tag, first));

        if family == "SQ" {
            loop {
                let next = match cursor.peek_line()? {
                    Some(next) => Self::classify(&next.text),
                    None => break,
                };
                if next != LineKind::Untagged {
                    break;
                }
                let Some(line) = cursor.next_line()? else { break };
                block.push(TaggedLine::new("", line.number, line.text.clone(), line.text));
            }
            return Ok(block);
        }

        loop {
            let next_tag = match cursor.peek_line()? {
                Some(next) => match Self::classify(&next.text) {
                    LineKind::Tagged(t) => t,
                    _ => break,
                },
                None => break,
            };
            if Self::family(&next_tag) != family || next_tag == "RN" {
                break;
            }
            let Some(line) = cursor.next_line()? else { break };
            block.push(tagged(&next_tag, line));
        }
        Ok(block)
    }

    fn rules() -> &'static [BlockRule] {
        &RULES
    }

    fn reader(tag: &str) -> Option<&'static dyn BlockReader> {
        let reader: &'static dyn BlockReader = match tag {
            "ID" => &IdReader,
            "AC" => &AcReader,
            "PR" => &PrReader,
            "DT" => &DtReader,
            "DE" => &DeReader,
            "KW" => &KwReader,
            "OS" => &OsReader,
            "RN" => &RnReader,
            "DR" => &DrReader,
            "CC" => &CcReader,
            "FH" => &FhReader,
            "FT" => &FtReader,
            "CO" => &CoReader,
            "SQ" => &SqReader,
            _ => return None,
        };
        Some(reader)
    }

    fn record_start() -> &'static str {
        "ID"
    }

    fn is_spacer(tag: &str) -> bool {
        tag == "XX"
    }

    fn is_sequence(tag: &str) -> bool {
        tag == "SQ"
    }

    fn is_features(tag: &str) -> bool {
        tag == "FT"
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A field value, or `None` when blank or the `XXX` placeholder.
fn present(field: &str) -> Option<String> {
    let field = field.trim();
    (!field.is_empty() && field != ABSENT).then(|| field.to_string())
}

/// `DB; primary[; secondary].`
pub(crate) fn parse_cross_reference(text: &str) -> Option<CrossReference> {
    let text = text.trim();
    let text = text.strip_suffix('.').unwrap_or(text);
    let mut parts = text.split(';').map(str::trim);
    let database = parts.next().filter(|s| !s.is_empty())?;
    let primary = parts.next().filter(|s| !s.is_empty())?;
    let rest: Vec<&str> = parts.filter(|s| !s.is_empty()).collect();
    let mut xref = CrossReference::new(database, primary);
    if !rest.is_empty() {
        xref.secondary_id = Some(rest.join("; "));
    }
    Some(xref)
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

struct IdReader;

impl BlockReader for IdReader {
    fn tag(&self) -> &'static str {
        "ID"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let origin = block.origin;
        let text = block.lines.first()?.content.trim();
        let text = text.strip_suffix('.').unwrap_or(text);
        let fields: Vec<&str> = text.split(';').map(str::trim).collect();

        let mut id = Identification {
            name: fields.first().and_then(|f| present(f)),
            origin,
            ..Default::default()
        };
        if fields.len() != 7 {
            diagnostics.error(
                codes::INVALID_ID_LINE,
                origin,
                format!("ID line has {} fields, expected 7", fields.len()),
            );
            return Some(Fragment::Identification(id));
        }

        match fields[1].strip_prefix("SV").map(str::trim) {
            Some(ABSENT) => {}
            Some(v) => match v.parse() {
                Ok(v) => id.sequence_version = Some(v),
                Err(_) => diagnostics.error(
                    codes::INVALID_SEQUENCE_VERSION,
                    origin,
                    format!("Invalid sequence version '{v}'"),
                ),
            },
            None => diagnostics.error(
                codes::INVALID_SEQUENCE_VERSION,
                origin,
                format!("Expected 'SV <version>', found '{}'", fields[1]),
            ),
        }

        if let Some(topology) = present(fields[2]) {
            match topology.parse::<Topology>() {
                Ok(t) => id.topology = Some(t),
                Err(e) => diagnostics.error(
                    codes::INVALID_ID_LINE,
                    origin,
                    format!("Invalid ID line: {e}"),
                ),
            }
        }
        id.molecule_type = present(fields[3]);
        id.data_class = present(fields[4]);
        id.division = present(fields[5]);

        let length = fields[6].strip_suffix("BP").unwrap_or(fields[6]).trim();
        if length != ABSENT {
            match length.parse() {
                Ok(n) => id.sequence_length = Some(n),
                Err(_) => diagnostics.error(
                    codes::INVALID_SEQUENCE_LENGTH,
                    origin,
                    format!("Invalid sequence length '{length}'"),
                ),
            }
        }

        Some(Fragment::Identification(id))
    }
}

struct AcReader;

impl BlockReader for AcReader {
    fn tag(&self) -> &'static str {
        "AC"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let text = join_free_text(contents(&block.lines));
        let items: Vec<&str> = text
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        if items.is_empty() {
            diagnostics.warning(codes::EMPTY_ACCESSION, block.origin, "Empty accession list");
        }
        let mut items = items.into_iter();
        let primary = items.next().and_then(present);
        Some(Fragment::Accessions(Accessions {
            primary,
            secondaries: items.filter_map(present).collect(),
            origin: block.origin,
        }))
    }
}

struct PrReader;

impl BlockReader for PrReader {
    fn tag(&self) -> &'static str {
        "PR"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let text = join_free_text(contents(&block.lines));
        let mut links: Vec<DbLink> = Vec::new();
        for item in text.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let Some((database, id)) = item.split_once(':') else {
                diagnostics.error(
                    codes::INVALID_CROSS_REFERENCE,
                    block.origin,
                    format!("Expected 'database:identifier', found '{item}'"),
                );
                continue;
            };
            let (database, id) = (database.trim(), id.trim().to_string());
            match links.iter_mut().find(|l| l.database == database) {
                Some(link) => link.ids.push(id),
                None => links.push(DbLink {
                    database: database.to_string(),
                    ids: vec![id],
                }),
            }
        }
        Some(Fragment::ProjectLinks(DbLinks {
            links,
            origin: block.origin,
        }))
    }
}

struct DtReader;

impl BlockReader for DtReader {
    fn tag(&self) -> &'static str {
        "DT"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let mut dates = Dates {
            origin: block.origin,
            ..Default::default()
        };
        for line in &block.lines {
            let origin = Origin::line(line.number);
            let text = line.content.trim();
            let Some((date_text, rest)) = text.split_once(char::is_whitespace) else {
                diagnostics.error(
                    codes::INVALID_DATE_LINE,
                    origin,
                    format!("Malformed DT line '{text}'"),
                );
                continue;
            };
            let Some(date) = parse_flat_date(date_text) else {
                diagnostics.error(
                    codes::INVALID_DATE_LINE,
                    origin,
                    format!("Invalid date '{date_text}'"),
                );
                continue;
            };
            let rest = rest.trim().trim_start_matches('(').trim_end_matches(')');
            let parts: Vec<&str> = rest.split(',').map(str::trim).collect();

            let release = match parts.first().and_then(|p| p.strip_prefix("Rel.")) {
                Some(r) => match r.trim().parse::<u32>() {
                    Ok(r) => Some(r),
                    Err(_) => {
                        diagnostics.error(
                            codes::INVALID_RELEASE,
                            origin,
                            format!("Invalid release number '{}'", r.trim()),
                        );
                        None
                    }
                },
                None => None,
            };

            match parts.get(1).copied() {
                Some("Created") => {
                    dates.created = Some(date);
                    dates.created_release = release;
                }
                Some("Last updated") => {
                    dates.updated = Some(date);
                    dates.updated_release = release;
                    if let Some(v) = parts.get(2).and_then(|p| p.strip_prefix("Version")) {
                        match v.trim().parse() {
                            Ok(v) => dates.entry_version = Some(v),
                            Err(_) => diagnostics.error(
                                codes::INVALID_RELEASE,
                                origin,
                                format!("Invalid entry version '{}'", v.trim()),
                            ),
                        }
                    }
                }
                _ => diagnostics.error(
                    codes::INVALID_DATE_LINE,
                    origin,
                    format!("Malformed DT line '{text}'"),
                ),
            }
        }
        Some(Fragment::Dates(dates))
    }
}

struct DeReader;

impl BlockReader for DeReader {
    fn tag(&self) -> &'static str {
        "DE"
    }

    fn read(&self, block: &Block, _diagnostics: &mut Diagnostics) -> Option<Fragment> {
        Some(Fragment::Description(Text {
            text: join_free_text(contents(&block.lines)),
            origin: block.origin,
        }))
    }
}

struct KwReader;

impl BlockReader for KwReader {
    fn tag(&self) -> &'static str {
        "KW"
    }

    fn read(&self, block: &Block, _diagnostics: &mut Diagnostics) -> Option<Fragment> {
        Some(Fragment::Keywords(Keywords {
            keywords: split_list(&join_free_text(contents(&block.lines))),
            origin: block.origin,
        }))
    }
}

struct OsReader;

impl BlockReader for OsReader {
    fn tag(&self) -> &'static str {
        "OS"
    }

    fn read(&self, block: &Block, _diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let name = join_free_text(contents(block.tagged("OS")));
        let (scientific_name, common_name) = split_common_name(&name);
        let organelle = join_free_text(contents(block.tagged("OG")));
        Some(Fragment::Organism(Organism {
            scientific_name,
            common_name,
            lineage: split_list(&join_free_text(contents(block.tagged("OC")))),
            organelle: (!organelle.is_empty()).then_some(organelle),
            source: None,
            origin: block.origin,
        }))
    }
}

struct RnReader;

impl BlockReader for RnReader {
    fn tag(&self) -> &'static str {
        "RN"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let mut reference = Reference {
            origin: block.origin,
            ..Default::default()
        };

        for line in block.tagged("RN") {
            let text = line.content.trim();
            let number = text.trim_start_matches('[').trim_end_matches(']').trim();
            match number.parse() {
                Ok(n) => reference.number = Some(n),
                Err(_) => diagnostics.error(
                    codes::INVALID_REFERENCE_NUMBER,
                    Origin::line(line.number),
                    format!("Invalid reference number '{text}'"),
                ),
            }
        }

        if block.tagged("RC").next().is_some() {
            reference.comment = Some(join_free_text(contents(block.tagged("RC"))));
        }

        if let Some(origin) = block.origin_of("RP") {
            let text = join_free_text(contents(block.tagged("RP")));
            for span in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let parsed = span
                    .split_once('-')
                    .and_then(|(b, e)| Some((b.trim().parse().ok()?, e.trim().parse().ok()?)));
                match parsed {
                    Some(span) => reference.positions.push(span),
                    None => diagnostics.error(
                        codes::INVALID_REFERENCE_POSITION,
                        origin,
                        format!("Invalid reference position '{span}'"),
                    ),
                }
            }
        }

        for line in block.tagged("RX") {
            match parse_cross_reference(&line.content) {
                Some(mut xref) => {
                    xref.origin = Origin::line(line.number);
                    reference.cross_references.push(xref);
                }
                None => diagnostics.error(
                    codes::INVALID_CROSS_REFERENCE,
                    Origin::line(line.number),
                    format!("Malformed cross-reference '{}'", line.content.trim()),
                ),
            }
        }

        if block.tagged("RG").next().is_some() {
            reference.group = Some(join_free_text(contents(block.tagged("RG"))));
        }

        let authors = join_free_text(contents(block.tagged("RA")));
        let authors = authors.strip_suffix(';').unwrap_or(&authors);
        reference.authors = authors
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect();

        let title = join_free_text(contents(block.tagged("RT")));
        let title = title.strip_suffix(';').unwrap_or(&title).trim();
        let title = unquote(title);
        reference.title = (!title.is_empty()).then(|| title.to_string());

        reference.location_lines = block
            .tagged("RL")
            .map(|l| l.content.trim_end().to_string())
            .collect();

        Some(Fragment::Reference(reference))
    }
}

struct DrReader;

impl BlockReader for DrReader {
    fn tag(&self) -> &'static str {
        "DR"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let mut xrefs = Vec::new();
        for line in &block.lines {
            match parse_cross_reference(&line.content) {
                Some(mut xref) => {
                    xref.origin = Origin::line(line.number);
                    xrefs.push(xref);
                }
                None => diagnostics.error(
                    codes::INVALID_CROSS_REFERENCE,
                    Origin::line(line.number),
                    format!("Malformed cross-reference '{}'", line.content.trim()),
                ),
            }
        }
        Some(Fragment::CrossReferences(xrefs))
    }
}

struct CcReader;

impl BlockReader for CcReader {
    fn tag(&self) -> &'static str {
        "CC"
    }

    fn read(&self, block: &Block, _diagnostics: &mut Diagnostics) -> Option<Fragment> {
        Some(Fragment::Comment(Text {
            text: join_comment_lines(contents(&block.lines)),
            origin: block.origin,
        }))
    }
}

/// The `FH` header only labels the columns of the feature table.
struct FhReader;

impl BlockReader for FhReader {
    fn tag(&self) -> &'static str {
        "FH"
    }

    fn read(&self, _block: &Block, _diagnostics: &mut Diagnostics) -> Option<Fragment> {
        None
    }
}

struct FtReader;

impl BlockReader for FtReader {
    fn tag(&self) -> &'static str {
        "FT"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let lines = block.lines.iter().map(|l| (l.number, l.content.as_str()));
        Some(Fragment::Features(read_feature_table(lines, diagnostics)))
    }
}

struct CoReader;

impl BlockReader for CoReader {
    fn tag(&self) -> &'static str {
        "CO"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        Some(Fragment::Contig(read_contig(block, diagnostics)))
    }
}

struct SqReader;

impl BlockReader for SqReader {
    fn tag(&self) -> &'static str {
        "SQ"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let header = block.lines.first()?;
        let header_text = header.content.trim();
        let declared = header_text
            .strip_prefix("Sequence")
            .and_then(|rest| rest.split(';').next())
            .map(|n| n.trim().trim_end_matches("BP").trim())
            .and_then(|n| n.parse::<u64>().ok());
        if declared.is_none() {
            diagnostics.error(
                codes::INVALID_SEQUENCE_HEADER,
                Origin::line(header.number),
                format!("Malformed sequence header '{header_text}'"),
            );
        }

        let bases = read_residues(block.lines.iter().skip(1), diagnostics);
        if let Some(n) = declared {
            if n != bases.len() as u64 {
                diagnostics.warning(
                    codes::SEQUENCE_LENGTH_MISMATCH,
                    block.origin,
                    format!("Sequence header declares {n} bases but {} were read", bases.len()),
                );
            }
        }

        Some(Fragment::Sequence(SequenceBlock {
            bases,
            declared_length: declared,
            origin: block.origin,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatseq_core::Severity;

    fn block(text: &str) -> Block {
        let mut cursor = LineCursor::new(text.as_bytes());
        let first = cursor.next_line().unwrap().unwrap();
        let LineKind::Tagged(tag) = EmblSyntax::classify(&first.text) else {
            panic!("not a tagged line");
        };
        EmblSyntax::collect(&mut cursor, first, &tag).unwrap()
    }

    fn read(text: &str) -> (Option<Fragment>, Diagnostics) {
        let block = block(text);
        let mut diagnostics = Diagnostics::new();
        let reader = EmblSyntax::reader(&block.tag).unwrap();
        assert_eq!(reader.tag(), block.tag);
        (reader.read(&block, &mut diagnostics), diagnostics)
    }

    #[test]
    fn classify_lines() {
        assert_eq!(EmblSyntax::classify("ID   X56734;"), LineKind::Tagged("ID".into()));
        assert_eq!(EmblSyntax::classify("XX"), LineKind::Tagged("XX".into()));
        assert_eq!(EmblSyntax::classify("//"), LineKind::Terminator);
        assert_eq!(EmblSyntax::classify("   "), LineKind::Blank);
        assert_eq!(EmblSyntax::classify("     acgt      4"), LineKind::Untagged);
    }

    #[test]
    fn reference_family_collects_together() {
        let b = block("RN   [1]\nRP   1-1859\nRA   Smith J.;\nRN   [2]\n");
        assert_eq!(b.tag, "RN");
        assert_eq!(b.lines.len(), 3);
        assert_eq!(b.origin, Origin::new(1, 3));
    }

    #[test]
    fn sequence_absorbs_data_lines() {
        let b = block("SQ   Sequence 4 BP;\n     acgt    4\n//\n");
        assert_eq!(b.lines.len(), 2);
        assert_eq!(b.lines[1].tag, "");
    }

    #[test]
    fn id_line() {
        let (fragment, d) = read("ID   X56734; SV 1; linear; mRNA; STD; PLN; 1859 BP.");
        assert!(d.is_empty());
        let Some(Fragment::Identification(id)) = fragment else { panic!() };
        assert_eq!(id.name.as_deref(), Some("X56734"));
        assert_eq!(id.sequence_version, Some(1));
        assert_eq!(id.topology, Some(Topology::Linear));
        assert_eq!(id.molecule_type.as_deref(), Some("mRNA"));
        assert_eq!(id.data_class.as_deref(), Some("STD"));
        assert_eq!(id.division.as_deref(), Some("PLN"));
        assert_eq!(id.sequence_length, Some(1859));
    }

    #[test]
    fn id_placeholders_are_absent() {
        let (fragment, d) = read("ID   XXX; SV XXX; circular; genomic DNA; XXX; XXX; 10 BP.");
        assert!(d.is_empty());
        let Some(Fragment::Identification(id)) = fragment else { panic!() };
        assert_eq!(id.name, None);
        assert_eq!(id.sequence_version, None);
        assert_eq!(id.data_class, None);
        assert_eq!(id.molecule_type.as_deref(), Some("genomic DNA"));
    }

    #[test]
    fn id_bad_numbers() {
        let (fragment, d) = read("ID   X1; SV one; linear; DNA; STD; PLN; many BP.");
        let Some(Fragment::Identification(id)) = fragment else { panic!() };
        assert_eq!(id.name.as_deref(), Some("X1"));
        assert_eq!(id.sequence_length, None);
        assert_eq!(d.with_code(codes::INVALID_SEQUENCE_VERSION).count(), 1);
        assert_eq!(d.with_code(codes::INVALID_SEQUENCE_LENGTH).count(), 1);

        let (_, d) = read("ID   X1; linear; DNA.");
        assert_eq!(d.with_code(codes::INVALID_ID_LINE).count(), 1);
    }

    #[test]
    fn accessions() {
        let (fragment, _) = read("AC   X56734; S46826;\nAC   Z00001;");
        let Some(Fragment::Accessions(ac)) = fragment else { panic!() };
        assert_eq!(ac.primary.as_deref(), Some("X56734"));
        assert_eq!(ac.secondaries, ["S46826", "Z00001"]);
        assert_eq!(ac.origin, Origin::new(1, 2));

        let (fragment, d) = read("AC   XXX;");
        let Some(Fragment::Accessions(ac)) = fragment else { panic!() };
        assert_eq!(ac.primary, None);
        assert!(d.is_empty());

        let (_, d) = read("AC   ;");
        assert_eq!(d.with_code(codes::EMPTY_ACCESSION).count(), 1);
    }

    #[test]
    fn project() {
        let (fragment, _) = read("PR   Project:PRJNA1; Project:PRJNA2;");
        let Some(Fragment::ProjectLinks(pr)) = fragment else { panic!() };
        assert_eq!(pr.ids("Project").unwrap(), ["PRJNA1", "PRJNA2"]);
    }

    #[test]
    fn dates() {
        let (fragment, d) = read(
            "DT   12-SEP-1991 (Rel. 29, Created)\nDT   13-NOV-2006 (Rel. 89, Last updated, Version 3)",
        );
        assert!(d.is_empty());
        let Some(Fragment::Dates(dt)) = fragment else { panic!() };
        assert_eq!(dt.created, parse_flat_date("12-SEP-1991"));
        assert_eq!(dt.created_release, Some(29));
        assert_eq!(dt.updated_release, Some(89));
        assert_eq!(dt.entry_version, Some(3));

        let (_, d) = read(
            "DT   32-SEP-1991 (Rel. 29, Created)\nDT   13-NOV-2006 (Rel. x, Last updated, Version 3)",
        );
        assert_eq!(d.with_code(codes::INVALID_DATE_LINE).count(), 1);
        assert_eq!(d.with_code(codes::INVALID_RELEASE).count(), 1);
    }

    #[test]
    fn organism() {
        let (fragment, _) = read(
            "OS   Kluyveromyces lactis (yeast)\nOC   Eukaryota; Fungi; Ascomycota;\nOC   Saccharomycetes.\nOG   Mitochondrion",
        );
        let Some(Fragment::Organism(os)) = fragment else { panic!() };
        assert_eq!(os.scientific_name, "Kluyveromyces lactis");
        assert_eq!(os.common_name.as_deref(), Some("yeast"));
        assert_eq!(os.lineage, ["Eukaryota", "Fungi", "Ascomycota", "Saccharomycetes"]);
        assert_eq!(os.organelle.as_deref(), Some("Mitochondrion"));
    }

    #[test]
    fn reference() {
        let (fragment, d) = read(
            "RN   [1]\n\
             RP   1-1859\n\
             RX   DOI; 10.1002/yea.320080605.\n\
             RX   PUBMED; 1907511.\n\
             RA   Mulder W., Scholten I.H.,\n\
             RA   Grivell L.A.;\n\
             RT   \"Sequence of the HSP78 gene\";\n\
             RL   Yeast 8:1-10(1991).",
        );
        assert!(d.is_empty(), "{d:?}");
        let Some(Fragment::Reference(r)) = fragment else { panic!() };
        assert_eq!(r.number, Some(1));
        assert_eq!(r.positions, [(1, 1859)]);
        assert_eq!(r.cross_references.len(), 2);
        assert_eq!(r.cross_reference("PUBMED").unwrap().primary_id, "1907511");
        assert_eq!(r.cross_references[1].origin, Origin::line(4));
        assert_eq!(r.authors, ["Mulder W.", "Scholten I.H.", "Grivell L.A."]);
        assert_eq!(r.title.as_deref(), Some("Sequence of the HSP78 gene"));
        assert_eq!(r.location_lines, ["Yeast 8:1-10(1991)."]);
        assert_eq!(r.origin, Origin::new(1, 8));
    }

    #[test]
    fn reference_errors_and_empty_title() {
        let (fragment, d) = read("RN   [x]\nRP   1-a\nRX   nonsense\nRT   ;\nRL   Submitted.");
        let Some(Fragment::Reference(r)) = fragment else { panic!() };
        assert_eq!(r.number, None);
        assert_eq!(r.title, None);
        assert_eq!(d.with_code(codes::INVALID_REFERENCE_NUMBER).count(), 1);
        assert_eq!(d.with_code(codes::INVALID_REFERENCE_POSITION).count(), 1);
        assert_eq!(d.with_code(codes::INVALID_CROSS_REFERENCE).count(), 1);
    }

    #[test]
    fn cross_references() {
        let (fragment, _) =
            read("DR   MD5; 1e51ca3a5450c43524b9185c236cc5cc.\nDR   EuropePMC; PMC1; 2.");
        let Some(Fragment::CrossReferences(x)) = fragment else { panic!() };
        assert_eq!(x.len(), 2);
        assert_eq!(x[0].database, "MD5");
        assert_eq!(x[1].secondary_id.as_deref(), Some("2"));
    }

    #[test]
    fn comment_keeps_lines() {
        let (fragment, _) = read("CC   first line\nCC\nCC   third line");
        let Some(Fragment::Comment(cc)) = fragment else { panic!() };
        assert_eq!(cc.text, "first line\n\nthird line");
    }

    #[test]
    fn contig_with_gaps() {
        let (fragment, d) = read("CO   join(AB000001.1:1..100,gap(50),\nCO   AB000002.1:1..20)");
        assert!(d.is_empty());
        let Some(Fragment::Contig(co)) = fragment else { panic!() };
        assert!(co.has_gaps());
        assert_eq!(co.len(), 3);

        let (fragment, d) = read("CO   join(AB000001.1:1..100,gap(");
        let Some(Fragment::Contig(co)) = fragment else { panic!() };
        assert!(co.is_empty());
        assert_eq!(d.with_code(codes::INVALID_CONTIG).count(), 1);
    }

    #[test]
    fn sequence() {
        let (fragment, d) = read(
            "SQ   Sequence 14 BP; 4 A; 4 C; 3 G; 3 T; 0 other;\n     aaccggttac  gtca                                                     14",
        );
        let Some(Fragment::Sequence(sq)) = fragment else { panic!() };
        assert_eq!(sq.bases, b"aaccggttacgtca");
        assert_eq!(sq.declared_length, Some(14));
        assert!(d.is_empty());

        let (_, d) = read("SQ   Sequence 9 BP;\n     ac!gt     4");
        assert_eq!(d.with_code(codes::INVALID_SEQUENCE_CHARACTER).count(), 1);
        let mismatch = d.with_code(codes::SEQUENCE_LENGTH_MISMATCH).next().unwrap();
        assert_eq!(mismatch.severity, Severity::Warning);

        let (_, d) = read("SQ   Sequences galore");
        assert_eq!(d.with_code(codes::INVALID_SEQUENCE_HEADER).count(), 1);
    }
}
