//! GenBank line layout and block readers.
//!
//! A keyword in columns 1–12 opens a block, with content from column 13.
//! Indented sub-keywords (`ORGANISM`, `AUTHORS`, `TITLE`, ...) belong to the
//! enclosing block, and lines whose first 12 columns are blank continue the
//! line above. Under `FEATURES` and `ORIGIN` every indented line belongs to
//! the block.

use std::io::BufRead;

use flatseq_core::{codes, Dialect, Diagnostics, Origin, Result};
use flatseq_record::record::parse_flat_date;
use flatseq_record::{
    Accessions, CrossReference, DbLink, DbLinks, Identification, Keywords, Organism, Reference,
    SequenceBlock, Text, Topology, Version,
};

use crate::assembler::BlockSyntax;
use crate::block::{
    column_prefix, column_slice, contents, join_comment_lines, join_free_text, read_contig,
    read_residues, split_common_name, split_list, Block, BlockReader, BlockRule, Fragment,
    LineKind, Occurrence, TaggedLine,
};
use crate::cursor::{Line, LineCursor};
use crate::feature_table::read_feature_table;

/// Column where keyword content starts.
pub const CONTENT_COLUMN: usize = 12;

/// Column where feature table lines start their key.
const FEATURE_LINE_COLUMN: usize = 5;

/// GenBank block rules in canonical order.
pub static RULES: [BlockRule; 12] = [
    BlockRule::new("LOCUS", Occurrence::ExactlyOnce, 0),
    BlockRule::new("DEFINITION", Occurrence::ExactlyOnce, 1),
    BlockRule::new("ACCESSION", Occurrence::AtMostOnce, 2),
    BlockRule::new("VERSION", Occurrence::AtMostOnce, 3),
    BlockRule::new("DBLINK", Occurrence::AtMostOnce, 4),
    BlockRule::new("KEYWORDS", Occurrence::AtMostOnce, 5),
    BlockRule::new("SOURCE", Occurrence::AtMostOnce, 6),
    BlockRule::new("REFERENCE", Occurrence::Any, 7),
    BlockRule::new("COMMENT", Occurrence::AtMostOnce, 8),
    BlockRule::new("FEATURES", Occurrence::AtMostOnce, 9),
    BlockRule::new("CONTIG", Occurrence::AtMostOnce, 10),
    BlockRule::new("ORIGIN", Occurrence::AtMostOnce, 11),
];

/// GenBank line layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenbankSyntax;

impl BlockSyntax for GenbankSyntax {
    const DIALECT: Dialect = Dialect::GenBank;

    fn classify(text: &str) -> LineKind {
        if text.trim().is_empty() {
            LineKind::Blank
        } else if text.starts_with("//") {
            LineKind::Terminator
        } else if text.starts_with(char::is_whitespace) {
            LineKind::Untagged
        } else {
            let keyword = text.split_whitespace().next().unwrap_or_default();
            LineKind::Tagged(keyword.to_string())
        }
    }

    fn collect<R: BufRead>(cursor: &mut LineCursor<R>, first: Line, tag: &str) -> Result<Block> {
        let content = column_slice(&first.text, CONTENT_COLUMN).to_string();
        let mut block = Block::new(tag, TaggedLine::new(tag, first.number, content, first.text));
        let verbatim = tag == "FEATURES" || tag == "ORIGIN";
        // Blank lines are paragraph breaks inside COMMENT.
        let keeps_blank = tag == "COMMENT";
        let mut current = tag.to_string();

        loop {
            let next = match cursor.peek_line()? {
                Some(next) => Self::classify(&next.text),
                None => break,
            };
            let blank = next == LineKind::Blank && keeps_blank;
            if next != LineKind::Untagged && !blank {
                break;
            }
            let Some(line) = cursor.next_line()? else { break };

            if blank {
                block.push(TaggedLine::new(current.as_str(), line.number, "", line.text));
                continue;
            }

            if verbatim {
                let content = column_slice(&line.text, FEATURE_LINE_COLUMN).to_string();
                block.push(TaggedLine::new("", line.number, content, line.text));
                continue;
            }

            let head = column_prefix(&line.text, CONTENT_COLUMN).trim();
            if !head.is_empty() {
                current = head.to_string();
            }
            let content = column_slice(&line.text, CONTENT_COLUMN).to_string();
            block.push(TaggedLine::new(current.as_str(), line.number, content, line.text));
        }
        Ok(block)
    }

    fn rules() -> &'static [BlockRule] {
        &RULES
    }

    fn reader(tag: &str) -> Option<&'static dyn BlockReader> {
        let reader: &'static dyn BlockReader = match tag {
            "LOCUS" => &LocusReader,
            "DEFINITION" => &DefinitionReader,
            "ACCESSION" => &AccessionReader,
            "VERSION" => &VersionReader,
            "DBLINK" => &DblinkReader,
            "KEYWORDS" => &KeywordsReader,
            "SOURCE" => &SourceReader,
            "REFERENCE" => &ReferenceReader,
            "COMMENT" => &CommentReader,
            "FEATURES" => &FeaturesReader,
            "CONTIG" => &ContigReader,
            "ORIGIN" => &OriginReader,
            _ => return None,
        };
        Some(reader)
    }

    fn record_start() -> &'static str {
        "LOCUS"
    }

    fn is_sequence(tag: &str) -> bool {
        tag == "ORIGIN"
    }

    fn is_features(tag: &str) -> bool {
        tag == "FEATURES"
    }
}

/// `a, b, c and d` → `[a, b, c, d]`.
pub(crate) fn split_authors(text: &str) -> Vec<String> {
    let text = text.trim();
    let (head, last) = match text.rsplit_once(" and ") {
        Some((head, last)) => (head, Some(last)),
        None => (text, None),
    };
    head.split(", ")
        .chain(last)
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

struct LocusReader;

impl BlockReader for LocusReader {
    fn tag(&self) -> &'static str {
        "LOCUS"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let origin = block.origin;
        let tokens: Vec<&str> = block.lines.first()?.content.split_whitespace().collect();
        let mut id = Identification {
            name: tokens.first().map(|s| s.to_string()),
            origin,
            ..Default::default()
        };
        if tokens.len() < 3 {
            diagnostics.error(
                codes::INVALID_ID_LINE,
                origin,
                "LOCUS line needs at least a name, a length and a unit",
            );
            return Some(Fragment::Identification(id));
        }

        match tokens[1].parse() {
            Ok(n) => id.sequence_length = Some(n),
            Err(_) => diagnostics.error(
                codes::INVALID_SEQUENCE_LENGTH,
                origin,
                format!("Invalid sequence length '{}'", tokens[1]),
            ),
        }
        if tokens[2] != "bp" && tokens[2] != "aa" {
            diagnostics.error(
                codes::INVALID_ID_LINE,
                origin,
                format!("Expected 'bp' or 'aa' after the length, found '{}'", tokens[2]),
            );
        }

        let mut rest = &tokens[3..];
        if let Some((last, head)) = rest.split_last() {
            if let Some(date) = parse_flat_date(last) {
                id.date = Some(date);
                rest = head;
            } else if last.matches('-').count() == 2 {
                diagnostics.error(codes::INVALID_ID_DATE, origin, format!("Invalid date '{last}'"));
                rest = head;
            }
        }

        let mut fields = rest.iter().copied().peekable();
        if let Some(molecule) = fields.next() {
            match molecule.split_once('-') {
                Some((strand @ ("ss" | "ds" | "ms"), molecule)) => {
                    id.strandedness = Some(strand.to_string());
                    id.molecule_type = Some(molecule.to_string());
                }
                _ => id.molecule_type = Some(molecule.to_string()),
            }
        }
        if let Some(topology) = fields.peek().and_then(|t| t.parse::<Topology>().ok()) {
            id.topology = Some(topology);
            fields.next();
        }
        id.division = fields.next().map(str::to_string);

        Some(Fragment::Identification(id))
    }
}

struct DefinitionReader;

impl BlockReader for DefinitionReader {
    fn tag(&self) -> &'static str {
        "DEFINITION"
    }

    fn read(&self, block: &Block, _diagnostics: &mut Diagnostics) -> Option<Fragment> {
        Some(Fragment::Description(Text {
            text: join_free_text(contents(&block.lines)),
            origin: block.origin,
        }))
    }
}

struct AccessionReader;

impl BlockReader for AccessionReader {
    fn tag(&self) -> &'static str {
        "ACCESSION"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let mut items = block
            .lines
            .iter()
            .flat_map(|l| l.content.split_whitespace())
            .map(str::to_string);
        let primary = items.next();
        if primary.is_none() {
            diagnostics.warning(codes::EMPTY_ACCESSION, block.origin, "Empty accession list");
        }
        Some(Fragment::Accessions(Accessions {
            primary,
            secondaries: items.collect(),
            origin: block.origin,
        }))
    }
}

struct VersionReader;

impl BlockReader for VersionReader {
    fn tag(&self) -> &'static str {
        "VERSION"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let mut tokens = block.lines.iter().flat_map(|l| l.content.split_whitespace());
        let Some(first) = tokens.next() else {
            diagnostics.error(codes::INVALID_SEQUENCE_VERSION, block.origin, "Empty VERSION line");
            return None;
        };
        let mut version = Version {
            accession: first.to_string(),
            origin: block.origin,
            ..Default::default()
        };
        if let Some((accession, number)) = first.rsplit_once('.') {
            match number.parse() {
                Ok(n) => {
                    version.accession = accession.to_string();
                    version.version = Some(n);
                }
                Err(_) => diagnostics.error(
                    codes::INVALID_SEQUENCE_VERSION,
                    block.origin,
                    format!("Invalid sequence version '{number}'"),
                ),
            }
        }
        version.gi = tokens
            .find_map(|t| t.strip_prefix("GI:"))
            .map(str::to_string);
        Some(Fragment::Version(version))
    }
}

struct DblinkReader;

impl BlockReader for DblinkReader {
    fn tag(&self) -> &'static str {
        "DBLINK"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let mut links: Vec<DbLink> = Vec::new();
        for line in &block.lines {
            let text = line.content.trim();
            let (database, ids) = match text.split_once(':') {
                Some((database, ids)) => (Some(database.trim()), ids),
                None => (None, text),
            };
            let ids = ids
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            if let Some(database) = database {
                links.push(DbLink {
                    database: database.to_string(),
                    ids: ids.collect(),
                });
            } else if let Some(link) = links.last_mut() {
                link.ids.extend(ids);
            } else {
                diagnostics.error(
                    codes::INVALID_CROSS_REFERENCE,
                    Origin::line(line.number),
                    format!("Expected 'database: identifier', found '{text}'"),
                );
            }
        }
        Some(Fragment::ProjectLinks(DbLinks {
            links,
            origin: block.origin,
        }))
    }
}

struct KeywordsReader;

impl BlockReader for KeywordsReader {
    fn tag(&self) -> &'static str {
        "KEYWORDS"
    }

    fn read(&self, block: &Block, _diagnostics: &mut Diagnostics) -> Option<Fragment> {
        Some(Fragment::Keywords(Keywords {
            keywords: split_list(&join_free_text(contents(&block.lines))),
            origin: block.origin,
        }))
    }
}

struct SourceReader;

impl BlockReader for SourceReader {
    fn tag(&self) -> &'static str {
        "SOURCE"
    }

    fn read(&self, block: &Block, _diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let source = join_free_text(contents(block.tagged("SOURCE")));
        let mut organism_lines = block.tagged("ORGANISM");
        let scientific = organism_lines.next().map(|l| join_free_text([l.content.as_str()]));
        let lineage = split_list(&join_free_text(contents(organism_lines)));

        let (name, common) = split_common_name(&source);
        let (scientific_name, common_name, source) = match scientific {
            Some(scientific) if scientific == name => (scientific, common, None),
            Some(scientific) if source.is_empty() => (scientific, None, None),
            Some(scientific) => (scientific, None, Some(source)),
            None => (name, common, None),
        };

        Some(Fragment::Organism(Organism {
            scientific_name,
            common_name,
            lineage,
            organelle: None,
            source,
            origin: block.origin,
        }))
    }
}

struct ReferenceReader;

impl BlockReader for ReferenceReader {
    fn tag(&self) -> &'static str {
        "REFERENCE"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let mut reference = Reference {
            origin: block.origin,
            ..Default::default()
        };
        let heading_origin = block.origin_of("REFERENCE").unwrap_or(block.origin);
        let heading = join_free_text(contents(block.tagged("REFERENCE")));
        let (number, span) = heading.split_once(' ').unwrap_or((heading.as_str(), ""));

        match number.parse() {
            Ok(n) => reference.number = Some(n),
            Err(_) => diagnostics.error(
                codes::INVALID_REFERENCE_NUMBER,
                heading_origin,
                format!("Invalid reference number '{number}'"),
            ),
        }

        let written = span.trim();
        let span = written.trim_start_matches('(').trim_end_matches(')');
        let ranges = span
            .strip_prefix("bases")
            .or_else(|| span.strip_prefix("residues"));
        if ranges.is_none() && !written.is_empty() {
            reference.heading_note = Some(written.to_string());
        }
        if let Some(ranges) = ranges {
            for range in ranges.split(';').map(str::trim).filter(|s| !s.is_empty()) {
                let parsed = range
                    .split_once(" to ")
                    .and_then(|(b, e)| Some((b.trim().parse().ok()?, e.trim().parse().ok()?)));
                match parsed {
                    Some(range) => reference.positions.push(range),
                    None => diagnostics.error(
                        codes::INVALID_REFERENCE_POSITION,
                        heading_origin,
                        format!("Invalid reference position '{range}'"),
                    ),
                }
            }
        }

        reference.authors = split_authors(&join_free_text(contents(block.tagged("AUTHORS"))));
        if block.tagged("CONSRTM").next().is_some() {
            reference.group = Some(join_free_text(contents(block.tagged("CONSRTM"))));
        }
        if block.tagged("TITLE").next().is_some() {
            reference.title = Some(join_free_text(contents(block.tagged("TITLE"))));
        }
        reference.location_lines = block
            .tagged("JOURNAL")
            .map(|l| l.content.trim().to_string())
            .collect();
        for database in ["MEDLINE", "PUBMED"] {
            for line in block.tagged(database) {
                let id = line.content.trim();
                if id.is_empty() {
                    continue;
                }
                let mut xref = CrossReference::new(database, id);
                xref.origin = Origin::line(line.number);
                reference.cross_references.push(xref);
            }
        }
        if block.tagged("REMARK").next().is_some() {
            reference.comment = Some(join_free_text(contents(block.tagged("REMARK"))));
        }

        Some(Fragment::Reference(reference))
    }
}

struct CommentReader;

impl BlockReader for CommentReader {
    fn tag(&self) -> &'static str {
        "COMMENT"
    }

    fn read(&self, block: &Block, _diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let text = join_comment_lines(contents(&block.lines));
        let end = block
            .lines
            .iter()
            .rposition(|l| !l.content.trim().is_empty())
            .map_or(block.origin.last_line, |i| block.lines[i].number);
        Some(Fragment::Comment(Text {
            text: text.trim_end_matches('\n').to_string(),
            origin: Origin::new(block.origin.first_line, end),
        }))
    }
}

struct FeaturesReader;

impl BlockReader for FeaturesReader {
    fn tag(&self) -> &'static str {
        "FEATURES"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let lines = block
            .lines
            .iter()
            .skip(1)
            .map(|l| (l.number, l.content.as_str()));
        Some(Fragment::Features(read_feature_table(lines, diagnostics)))
    }
}

struct ContigReader;

impl BlockReader for ContigReader {
    fn tag(&self) -> &'static str {
        "CONTIG"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        Some(Fragment::Contig(read_contig(block, diagnostics)))
    }
}

struct OriginReader;

impl BlockReader for OriginReader {
    fn tag(&self) -> &'static str {
        "ORIGIN"
    }

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment> {
        let bases = read_residues(block.lines.iter().skip(1), diagnostics);
        Some(Fragment::Sequence(SequenceBlock {
            bases,
            declared_length: None,
            origin: block.origin,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str) -> Block {
        let mut cursor = LineCursor::new(text.as_bytes());
        let first = cursor.next_line().unwrap().unwrap();
        let LineKind::Tagged(tag) = GenbankSyntax::classify(&first.text) else {
            panic!("not a keyword line");
        };
        GenbankSyntax::collect(&mut cursor, first, &tag).unwrap()
    }

    fn read(text: &str) -> (Option<Fragment>, Diagnostics) {
        let block = block(text);
        let mut diagnostics = Diagnostics::new();
        let reader = GenbankSyntax::reader(&block.tag).unwrap();
        assert_eq!(reader.tag(), block.tag);
        (reader.read(&block, &mut diagnostics), diagnostics)
    }

    #[test]
    fn sub_keywords_and_continuations() {
        let b = block(
            "REFERENCE   1  (bases 1 to 5028)\n\
             \x20 AUTHORS   Roemer,T., Madden,K., Chang,J. and\n\
             \x20           Snyder,M.\n\
             \x20 TITLE     Selection of axial growth sites\n\
             \x20  PUBMED   8846915\n\
             COMMENT     next block",
        );
        let tags: Vec<&str> = b.lines.iter().map(|l| l.tag.as_str()).collect();
        assert_eq!(tags, ["REFERENCE", "AUTHORS", "AUTHORS", "TITLE", "PUBMED"]);
        assert_eq!(b.lines[2].content, "Snyder,M.");
        assert_eq!(b.origin, Origin::new(1, 5));
    }

    #[test]
    fn locus_line() {
        let (fragment, d) =
            read("LOCUS       SCU49845                5028 bp    DNA     linear   PLN 21-JUN-1999");
        assert!(d.is_empty(), "{d:?}");
        let Some(Fragment::Identification(id)) = fragment else { panic!() };
        assert_eq!(id.name.as_deref(), Some("SCU49845"));
        assert_eq!(id.sequence_length, Some(5028));
        assert_eq!(id.molecule_type.as_deref(), Some("DNA"));
        assert_eq!(id.topology, Some(Topology::Linear));
        assert_eq!(id.division.as_deref(), Some("PLN"));
        assert_eq!(id.date, parse_flat_date("21-JUN-1999"));
    }

    #[test]
    fn locus_strandedness_and_bad_fields() {
        let (fragment, _) =
            read("LOCUS       AB1                      120 bp ss-RNA           VRL 01-JAN-2000");
        let Some(Fragment::Identification(id)) = fragment else { panic!() };
        assert_eq!(id.strandedness.as_deref(), Some("ss"));
        assert_eq!(id.molecule_type.as_deref(), Some("RNA"));
        assert_eq!(id.topology, None);
        assert_eq!(id.division.as_deref(), Some("VRL"));

        let (_, d) = read("LOCUS       AB1      lots bp DNA linear VRL 41-JAN-2000");
        assert_eq!(d.with_code(codes::INVALID_SEQUENCE_LENGTH).count(), 1);
        assert_eq!(d.with_code(codes::INVALID_ID_DATE).count(), 1);

        let (_, d) = read("LOCUS       AB1");
        assert_eq!(d.with_code(codes::INVALID_ID_LINE).count(), 1);
    }

    #[test]
    fn accession_and_version() {
        let (fragment, _) = read("ACCESSION   U49845 U00001\n            U00002");
        let Some(Fragment::Accessions(ac)) = fragment else { panic!() };
        assert_eq!(ac.primary.as_deref(), Some("U49845"));
        assert_eq!(ac.secondaries, ["U00001", "U00002"]);

        let (fragment, _) = read("VERSION     U49845.1  GI:1293613");
        let Some(Fragment::Version(v)) = fragment else { panic!() };
        assert_eq!(v.accession, "U49845");
        assert_eq!(v.version, Some(1));
        assert_eq!(v.gi.as_deref(), Some("1293613"));
    }

    #[test]
    fn dblink() {
        let (fragment, _) =
            read("DBLINK      BioProject: PRJNA1\n            BioSample: SAMN1, SAMN2");
        let Some(Fragment::ProjectLinks(links)) = fragment else { panic!() };
        assert_eq!(links.ids("BioProject").unwrap(), ["PRJNA1"]);
        assert_eq!(links.ids("BioSample").unwrap(), ["SAMN1", "SAMN2"]);
    }

    #[test]
    fn source_and_organism() {
        let (fragment, _) = read(
            "SOURCE      Saccharomyces cerevisiae (baker's yeast)\n\
             \x20 ORGANISM  Saccharomyces cerevisiae\n\
             \x20           Eukaryota; Fungi; Dikarya; Ascomycota;\n\
             \x20           Saccharomyces.",
        );
        let Some(Fragment::Organism(o)) = fragment else { panic!() };
        assert_eq!(o.scientific_name, "Saccharomyces cerevisiae");
        assert_eq!(o.common_name.as_deref(), Some("baker's yeast"));
        assert_eq!(o.lineage, ["Eukaryota", "Fungi", "Dikarya", "Ascomycota", "Saccharomyces"]);
        assert_eq!(o.source, None);

        let (fragment, _) =
            read("SOURCE      mitochondrion Homo sapiens\n  ORGANISM  Homo sapiens");
        let Some(Fragment::Organism(o)) = fragment else { panic!() };
        assert_eq!(o.source.as_deref(), Some("mitochondrion Homo sapiens"));
    }

    #[test]
    fn reference() {
        let (fragment, d) = read(
            "REFERENCE   1  (bases 1 to 5028)\n\
             \x20 AUTHORS   Roemer,T., Madden,K., Chang,J. and Snyder,M.\n\
             \x20 TITLE     Selection of axial growth sites in yeast requires Axl2p, a novel\n\
             \x20           plasma membrane glycoprotein\n\
             \x20 JOURNAL   Genes Dev. 10 (7), 777-793 (1996)\n\
             \x20  PUBMED   8846915",
        );
        assert!(d.is_empty(), "{d:?}");
        let Some(Fragment::Reference(r)) = fragment else { panic!() };
        assert_eq!(r.number, Some(1));
        assert_eq!(r.positions, [(1, 5028)]);
        assert_eq!(r.authors, ["Roemer,T.", "Madden,K.", "Chang,J.", "Snyder,M."]);
        assert_eq!(
            r.title.as_deref(),
            Some("Selection of axial growth sites in yeast requires Axl2p, a novel plasma membrane glycoprotein")
        );
        assert_eq!(r.location_lines, ["Genes Dev. 10 (7), 777-793 (1996)"]);
        assert_eq!(r.cross_reference("PUBMED").unwrap().primary_id, "8846915");
        assert_eq!(r.cross_references[0].origin, Origin::line(6));
    }

    #[test]
    fn reference_heading_note() {
        let (fragment, d) = read("REFERENCE   2  (sites)\n  AUTHORS   Doe,A.");
        assert!(d.is_empty(), "{d:?}");
        let Some(Fragment::Reference(r)) = fragment else { panic!() };
        assert_eq!(r.number, Some(2));
        assert!(r.positions.is_empty());
        assert_eq!(r.heading_note.as_deref(), Some("(sites)"));

        let (fragment, _) = read("REFERENCE   3  (bases 1 to 10)");
        let Some(Fragment::Reference(r)) = fragment else { panic!() };
        assert_eq!(r.heading_note, None);
    }

    #[test]
    fn reference_errors() {
        let (_, d) = read("REFERENCE   one  (bases 1 to x)");
        assert_eq!(d.with_code(codes::INVALID_REFERENCE_NUMBER).count(), 1);
        assert_eq!(d.with_code(codes::INVALID_REFERENCE_POSITION).count(), 1);
    }

    #[test]
    fn authors() {
        assert_eq!(split_authors("Smith,J."), ["Smith,J."]);
        assert_eq!(split_authors("Smith,J. and Doe,A."), ["Smith,J.", "Doe,A."]);
        assert!(split_authors("").is_empty());
    }

    #[test]
    fn features_and_origin() {
        let (fragment, d) = read(
            "FEATURES             Location/Qualifiers\n\
             \x20    source          1..20\n\
             \x20                    /organism=\"Saccharomyces cerevisiae\"\n\
             \x20    gene            <1..>20\n\
             \x20                    /gene=\"AXL2\"",
        );
        assert!(d.is_empty(), "{d:?}");
        let Some(Fragment::Features(features)) = fragment else { panic!() };
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].origin, Origin::new(2, 3));
        assert_eq!(features[1].qualifier_value("gene"), Some("AXL2"));

        let (fragment, d) = read(
            "ORIGIN\n        1 gatcctccat atatacaacg\n       21 tatctc",
        );
        assert!(d.is_empty());
        let Some(Fragment::Sequence(sq)) = fragment else { panic!() };
        assert_eq!(sq.bases, b"gatcctccatatatacaacgtatctc");
    }

    #[test]
    fn comment_keeps_paragraphs() {
        let (fragment, _) = read(
            "COMMENT     First paragraph.\n\n            Second paragraph.\n\n",
        );
        let Some(Fragment::Comment(c)) = fragment else { panic!() };
        assert_eq!(c.text, "First paragraph.\n\nSecond paragraph.");
        assert_eq!(c.origin, Origin::new(1, 3));
    }
}
