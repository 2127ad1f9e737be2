//! The record model shared by both dialects, and its builder.

use core::fmt;
use core::str::FromStr;

use chrono::NaiveDate;
use flatseq_core::{Dialect, Located, Origin, Sequence};

use crate::feature::Feature;
use crate::location::CompoundLocation;
use crate::reference::{CrossReference, Reference};

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Parse a `DD-MMM-YYYY` flat-file date (month name in any case).
pub fn parse_flat_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%d-%b-%Y").ok()
}

/// Format a date as `DD-MMM-YYYY` with an upper-case month.
pub fn format_flat_date(date: NaiveDate) -> String {
    date.format("%d-%b-%Y").to_string().to_uppercase()
}

// ---------------------------------------------------------------------------
// Identification
// ---------------------------------------------------------------------------

/// Molecule topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Topology {
    Linear,
    Circular,
}

impl FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Topology::Linear),
            "circular" => Ok(Topology::Circular),
            other => Err(format!("unknown topology '{other}'")),
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Linear => f.write_str("linear"),
            Topology::Circular => f.write_str("circular"),
        }
    }
}

/// The `ID` / `LOCUS` line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identification {
    /// Primary accession (EMBL) or locus name (GenBank).
    pub name: Option<String>,
    /// `SV` number.
    pub sequence_version: Option<u32>,
    pub topology: Option<Topology>,
    /// Molecule type (e.g. "genomic DNA", "mRNA").
    pub molecule_type: Option<String>,
    /// GenBank strandedness prefix of the molecule type ("ss", "ds", "ms").
    pub strandedness: Option<String>,
    /// EMBL data class (e.g. "STD", "CON").
    pub data_class: Option<String>,
    /// Taxonomic division (e.g. "PLN", "BCT").
    pub division: Option<String>,
    /// Declared sequence length in bases.
    pub sequence_length: Option<u64>,
    /// GenBank LOCUS date.
    pub date: Option<NaiveDate>,
    pub origin: Origin,
}

// ---------------------------------------------------------------------------
// Header blocks
// ---------------------------------------------------------------------------

/// `AC` / `ACCESSION`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Accessions {
    /// `None` when the block held only the `XXX` placeholder.
    pub primary: Option<String>,
    pub secondaries: Vec<String>,
    pub origin: Origin,
}

impl Accessions {
    /// Primary followed by secondaries.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.primary
            .iter()
            .chain(self.secondaries.iter())
            .map(String::as_str)
    }
}

/// GenBank `VERSION`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Version {
    pub accession: String,
    pub version: Option<u32>,
    /// Legacy `GI:` identifier written after the accession.
    pub gi: Option<String>,
    pub origin: Origin,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.accession)?;
        if let Some(v) = self.version {
            write!(f, ".{v}")?;
        }
        Ok(())
    }
}

/// One database and its identifiers in a project link block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DbLink {
    pub database: String,
    pub ids: Vec<String>,
}

/// `PR` / `DBLINK`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DbLinks {
    pub links: Vec<DbLink>,
    pub origin: Origin,
}

impl DbLinks {
    /// Identifiers listed for `database`.
    pub fn ids(&self, database: &str) -> Option<&[String]> {
        self.links
            .iter()
            .find(|l| l.database == database)
            .map(|l| l.ids.as_slice())
    }
}

/// EMBL `DT` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dates {
    /// First public date.
    pub created: Option<NaiveDate>,
    pub created_release: Option<u32>,
    pub updated: Option<NaiveDate>,
    pub updated_release: Option<u32>,
    /// Entry version on the "Last updated" line.
    pub entry_version: Option<u32>,
    pub origin: Origin,
}

/// A free-text block (`DE`, `CC`, `DEFINITION`, `COMMENT`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Text {
    pub text: String,
    pub origin: Origin,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: Origin::default(),
        }
    }
}

/// `KW` / `KEYWORDS`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keywords {
    pub keywords: Vec<String>,
    pub origin: Origin,
}

/// `OS`/`OC`/`OG` or `SOURCE`/`ORGANISM`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Organism {
    pub scientific_name: String,
    pub common_name: Option<String>,
    /// Taxonomic lineage from the root.
    pub lineage: Vec<String>,
    /// `OG` organelle.
    pub organelle: Option<String>,
    /// GenBank `SOURCE` line text when it differs from the composed name.
    pub source: Option<String>,
    pub origin: Origin,
}

impl Organism {
    /// `Scientific name (common name)`.
    pub fn display_name(&self) -> String {
        match &self.common_name {
            Some(common) => format!("{} ({common})", self.scientific_name),
            None => self.scientific_name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sequence
// ---------------------------------------------------------------------------

/// Base composition as reported on an EMBL `SQ` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BaseCounts {
    pub a: u64,
    pub c: u64,
    pub g: u64,
    pub t: u64,
    pub other: u64,
}

impl BaseCounts {
    pub fn total(&self) -> u64 {
        self.a + self.c + self.g + self.t + self.other
    }
}

/// `SQ` / `ORIGIN`: the residues exactly as written, without spacing or
/// position numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequenceBlock {
    pub bases: Vec<u8>,
    /// Length stated on the `SQ` header line.
    pub declared_length: Option<u64>,
    pub origin: Origin,
}

impl SequenceBlock {
    pub fn new(bases: impl Into<Vec<u8>>) -> Self {
        Self {
            bases: bases.into(),
            declared_length: None,
            origin: Origin::default(),
        }
    }

    pub fn base_counts(&self) -> BaseCounts {
        let mut counts = BaseCounts::default();
        for b in &self.bases {
            match b.to_ascii_lowercase() {
                b'a' => counts.a += 1,
                b'c' => counts.c += 1,
                b'g' => counts.g += 1,
                b't' | b'u' => counts.t += 1,
                _ => counts.other += 1,
            }
        }
        counts
    }
}

impl Sequence for SequenceBlock {
    fn as_bytes(&self) -> &[u8] {
        &self.bases
    }
}

/// A block with a tag the reader does not interpret, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnknownBlock {
    pub tag: String,
    /// Line content after the tag columns.
    pub lines: Vec<String>,
    pub origin: Origin,
}

macro_rules! impl_located {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Located for $ty {
                fn origin(&self) -> Origin {
                    self.origin
                }
            }
        )*
    };
}

impl_located!(
    Identification,
    Accessions,
    Version,
    DbLinks,
    Dates,
    Text,
    Keywords,
    Organism,
    SequenceBlock,
    UnknownBlock,
);

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One EMBL or GenBank entry. Each block is optional and remembers its
/// source lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    pub dialect: Dialect,
    pub identification: Option<Identification>,
    pub accessions: Option<Accessions>,
    pub version: Option<Version>,
    pub project_links: Option<DbLinks>,
    pub dates: Option<Dates>,
    pub description: Option<Text>,
    pub keywords: Option<Keywords>,
    pub organism: Option<Organism>,
    pub references: Vec<Reference>,
    pub cross_references: Vec<CrossReference>,
    pub comment: Option<Text>,
    pub features: Vec<Feature>,
    /// Assembly of the sequence from other entries; elements may be gaps.
    pub contig: Option<CompoundLocation>,
    pub sequence: Option<SequenceBlock>,
    pub unknown_blocks: Vec<UnknownBlock>,
    /// First line through the `//` terminator.
    pub origin: Origin,
}

impl Record {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Primary accession, falling back to the identification name.
    pub fn primary_accession(&self) -> Option<&str> {
        self.accessions
            .as_ref()
            .and_then(|a| a.primary.as_deref())
            .or_else(|| self.identification.as_ref().and_then(|i| i.name.as_deref()))
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_ref().map(|t| t.text.as_str())
    }

    /// Features called `name`.
    pub fn features_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Feature> + 'a {
        self.features.iter().filter(move |f| f.name == name)
    }

    /// Length of the sequence if present, else the declared length.
    pub fn sequence_length(&self) -> Option<u64> {
        self.sequence
            .as_ref()
            .map(|s| s.len() as u64)
            .or_else(|| self.identification.as_ref().and_then(|i| i.sequence_length))
    }
}

impl Located for Record {
    fn origin(&self) -> Origin {
        self.origin
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects blocks while a record is being read, then yields the finished
/// [`Record`].
///
/// Single-valued blocks keep their first occurrence: a later `set_*` call
/// for a block that is already present is ignored and returns `false`.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: Record,
}

fn set_once<T>(slot: &mut Option<T>, value: T) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(value);
    true
}

impl RecordBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            record: Record::new(dialect),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.record.dialect
    }

    pub fn set_identification(&mut self, value: Identification) -> bool {
        set_once(&mut self.record.identification, value)
    }

    pub fn set_accessions(&mut self, value: Accessions) -> bool {
        set_once(&mut self.record.accessions, value)
    }

    pub fn set_version(&mut self, value: Version) -> bool {
        set_once(&mut self.record.version, value)
    }

    pub fn set_project_links(&mut self, value: DbLinks) -> bool {
        set_once(&mut self.record.project_links, value)
    }

    pub fn set_dates(&mut self, value: Dates) -> bool {
        set_once(&mut self.record.dates, value)
    }

    pub fn set_description(&mut self, value: Text) -> bool {
        set_once(&mut self.record.description, value)
    }

    pub fn set_keywords(&mut self, value: Keywords) -> bool {
        set_once(&mut self.record.keywords, value)
    }

    pub fn set_organism(&mut self, value: Organism) -> bool {
        set_once(&mut self.record.organism, value)
    }

    pub fn set_comment(&mut self, value: Text) -> bool {
        set_once(&mut self.record.comment, value)
    }

    pub fn set_contig(&mut self, value: CompoundLocation) -> bool {
        set_once(&mut self.record.contig, value)
    }

    pub fn set_sequence(&mut self, value: SequenceBlock) -> bool {
        set_once(&mut self.record.sequence, value)
    }

    pub fn add_reference(&mut self, reference: Reference) {
        self.record.references.push(reference);
    }

    pub fn add_cross_references(
        &mut self,
        cross_references: impl IntoIterator<Item = CrossReference>,
    ) {
        self.record.cross_references.extend(cross_references);
    }

    /// Append features; repeated feature tables accumulate.
    pub fn add_features(&mut self, features: impl IntoIterator<Item = Feature>) {
        self.record.features.extend(features);
    }

    pub fn add_unknown(&mut self, block: UnknownBlock) {
        self.record.unknown_blocks.push(block);
    }

    pub fn set_origin(&mut self, origin: Origin) {
        self.record.origin = origin;
    }

    pub fn build(self) -> Record {
        self.record
    }
}
