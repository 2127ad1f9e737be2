//! Blocks of tagged lines and the readers that decode them.

use flatseq_core::{codes, Diagnostics, Located, Origin};
use flatseq_record::{
    Accessions, CompoundLocation, CrossReference, Dates, DbLinks, Feature, Identification,
    Keywords, LocationParser, LocationText, Organism, Reference, SequenceBlock, Text, Version,
};

/// How a physical line is classified before block collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// `//`
    Terminator,
    /// A line starting with a tag or keyword.
    Tagged(String),
    /// An indented line with no tag of its own.
    Untagged,
}

/// One line of a block with its tag columns separated from its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLine {
    /// Line tag (`RA`, `AUTHORS`, ...). Continuation lines carry the tag of
    /// the line they continue; sequence and feature lines carry `""`.
    pub tag: String,
    pub number: u32,
    /// Text after the tag columns.
    pub content: String,
    /// The line as read.
    pub raw: String,
}

impl TaggedLine {
    pub fn new(
        tag: impl Into<String>,
        number: u32,
        content: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            number,
            content: content.into(),
            raw: raw.into(),
        }
    }
}

/// Consecutive lines belonging to one logical section of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Tag of the block family (`RN` for a whole reference, `OS` for the
    /// organism lines, `SOURCE`, ...).
    pub tag: String,
    pub lines: Vec<TaggedLine>,
    pub origin: Origin,
}

impl Block {
    pub fn new(tag: impl Into<String>, first: TaggedLine) -> Self {
        let origin = Origin::line(first.number);
        Self {
            tag: tag.into(),
            lines: vec![first],
            origin,
        }
    }

    pub fn push(&mut self, line: TaggedLine) {
        self.origin = self.origin.span(Origin::line(line.number));
        self.lines.push(line);
    }

    /// Whether every line's content is blank.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.content.trim().is_empty())
    }

    /// Lines carrying `tag`.
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TaggedLine> + 'a {
        self.lines.iter().filter(move |l| l.tag == tag)
    }

    /// Origin covering the lines carrying `tag`.
    pub fn origin_of(&self, tag: &str) -> Option<Origin> {
        Origin::covering(self.tagged(tag).map(|l| Origin::line(l.number)))
    }
}

impl Located for Block {
    fn origin(&self) -> Origin {
        self.origin
    }
}

/// A decoded block, ready to be placed into a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Identification(Identification),
    Accessions(Accessions),
    Version(Version),
    ProjectLinks(DbLinks),
    Dates(Dates),
    Description(Text),
    Keywords(Keywords),
    Organism(Organism),
    Reference(Reference),
    CrossReferences(Vec<CrossReference>),
    Comment(Text),
    Features(Vec<Feature>),
    Contig(CompoundLocation),
    Sequence(SequenceBlock),
}

/// Decodes one kind of block.
///
/// Data problems are reported to `diagnostics`; the reader still returns
/// whatever it could decode. `None` means the block carries nothing the
/// record keeps.
pub trait BlockReader: Sync {
    /// Tag of the block family this reader decodes.
    fn tag(&self) -> &'static str;

    fn read(&self, block: &Block, diagnostics: &mut Diagnostics) -> Option<Fragment>;
}

/// How often a block may occur in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    ExactlyOnce,
    AtMostOnce,
    Any,
}

/// Multiplicity and canonical position of a known block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRule {
    pub tag: &'static str,
    pub occurrence: Occurrence,
    pub rank: u8,
}

impl BlockRule {
    pub const fn new(tag: &'static str, occurrence: Occurrence, rank: u8) -> Self {
        Self { tag, occurrence, rank }
    }
}

// ---------------------------------------------------------------------------
// Text helpers shared by both dialects
// ---------------------------------------------------------------------------

/// Text from character column `column` (0-based) onwards.
pub fn column_slice(text: &str, column: usize) -> &str {
    match text.char_indices().nth(column) {
        Some((i, _)) => &text[i..],
        None => "",
    }
}

/// Text before character column `column`.
pub fn column_prefix(text: &str, column: usize) -> &str {
    match text.char_indices().nth(column) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

/// Content of each line.
pub fn contents<'a>(
    lines: impl IntoIterator<Item = &'a TaggedLine>,
) -> impl Iterator<Item = &'a str> {
    lines.into_iter().map(|l| l.content.as_str())
}

/// Free text: lines joined with single spaces, whitespace runs collapsed.
pub fn join_free_text<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let mut words = Vec::new();
    for line in lines {
        words.extend(line.split_whitespace());
    }
    words.join(" ")
}

/// Comment text: line structure kept, trailing whitespace dropped.
pub fn join_comment_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    lines
        .into_iter()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A `;`-separated list closed by `.`, as in `KW` and `OC` lines.
pub fn split_list(text: &str) -> Vec<String> {
    let text = text.trim();
    let text = text.strip_suffix('.').unwrap_or(text);
    text.split(';')
        .map(|item| item.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|item| !item.is_empty())
        .collect()
}

/// Strip one pair of surrounding double quotes, if present.
pub fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

/// Residues from sequence data lines: letters kept, digits and whitespace
/// dropped. Any other character is reported through `invalid`.
pub fn collect_residues<'a>(
    lines: impl IntoIterator<Item = &'a TaggedLine>,
    mut invalid: impl FnMut(&TaggedLine, char),
) -> Vec<u8> {
    let mut bases = Vec::new();
    for line in lines {
        for ch in line.content.chars() {
            if ch.is_ascii_alphabetic() || ch == '*' || ch == '-' {
                bases.push(ch as u8);
            } else if !ch.is_ascii_digit() && !ch.is_whitespace() {
                invalid(line, ch);
            }
        }
    }
    bases
}

/// `Homo sapiens (human)` → scientific and common name.
pub fn split_common_name(text: &str) -> (String, Option<String>) {
    if let Some(body) = text.strip_suffix(')') {
        if let Some(i) = body.rfind(" (") {
            return (body[..i].to_string(), Some(body[i + 2..].to_string()));
        }
    }
    (text.to_string(), None)
}

/// Parse contig lines shared by `CO` and `CONTIG`.
pub fn read_contig(block: &Block, diagnostics: &mut Diagnostics) -> CompoundLocation {
    let mut text = LocationText::new();
    for line in &block.lines {
        text.push_line(line.number, &line.content);
    }
    match LocationParser::contig().parse(&text) {
        Ok(contig) => contig,
        Err(e) => {
            diagnostics.error(
                codes::INVALID_CONTIG,
                block.origin,
                format!("Invalid contig location '{}': {e}", text.as_str()),
            );
            CompoundLocation::empty(block.origin)
        }
    }
}

/// Residues of sequence data lines, with one `SQ.2` error per offending line.
pub fn read_residues<'a>(
    lines: impl IntoIterator<Item = &'a TaggedLine>,
    diagnostics: &mut Diagnostics,
) -> Vec<u8> {
    let mut reported = 0;
    collect_residues(lines, |line, ch| {
        if reported != line.number {
            reported = line.number;
            diagnostics.error(
                codes::INVALID_SEQUENCE_CHARACTER,
                Origin::line(line.number),
                format!("Invalid sequence character '{ch}'"),
            );
        }
    })
}
