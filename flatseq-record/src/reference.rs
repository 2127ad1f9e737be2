//! Literature references and database cross-references.

use core::fmt;

use flatseq_core::{Located, Origin};

/// A link into another database, as carried by EMBL `RX`/`DR` lines and
/// GenBank `PUBMED` lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossReference {
    /// Database name (e.g. "PUBMED", "DOI", "MD5").
    pub database: String,
    /// Identifier in that database.
    pub primary_id: String,
    /// Optional secondary identifier.
    pub secondary_id: Option<String>,
    pub origin: Origin,
}

impl CrossReference {
    pub fn new(database: impl Into<String>, primary_id: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            primary_id: primary_id.into(),
            secondary_id: None,
            origin: Origin::default(),
        }
    }

    pub fn with_secondary(mut self, secondary_id: impl Into<String>) -> Self {
        self.secondary_id = Some(secondary_id.into());
        self
    }
}

impl Located for CrossReference {
    fn origin(&self) -> Origin {
        self.origin
    }
}

/// `DB; primary; secondary.`
impl fmt::Display for CrossReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; {}", self.database, self.primary_id)?;
        if let Some(secondary) = &self.secondary_id {
            write!(f, "; {secondary}")?;
        }
        f.write_str(".")
    }
}

/// A citation attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reference {
    /// Reference number (`RN [n]`, `REFERENCE n`).
    pub number: Option<u32>,
    /// Free-text comment (`RC`, `REMARK`).
    pub comment: Option<String>,
    /// Sequence spans the reference applies to (`RP`, `(bases a to b)`).
    pub positions: Vec<(u64, u64)>,
    /// Heading text after a GenBank reference number that is not a span of
    /// bases, such as `(sites)`. Kept as written.
    pub heading_note: Option<String>,
    /// Literature database links (`RX`, `PUBMED`).
    pub cross_references: Vec<CrossReference>,
    /// Consortium (`RG`, `CONSRTM`).
    pub group: Option<String>,
    /// Author names, in order.
    pub authors: Vec<String>,
    /// Title; `None` for an empty `RT ;` line or a missing `TITLE`.
    pub title: Option<String>,
    /// Journal citation lines (`RL`, `JOURNAL`), line structure kept.
    pub location_lines: Vec<String>,
    pub origin: Origin,
}

impl Reference {
    pub fn new(number: u32) -> Self {
        Self {
            number: Some(number),
            ..Self::default()
        }
    }

    /// Cross-reference into `database`, compared case-insensitively.
    pub fn cross_reference(&self, database: &str) -> Option<&CrossReference> {
        self.cross_references
            .iter()
            .find(|x| x.database.eq_ignore_ascii_case(database))
    }
}

impl Located for Reference {
    fn origin(&self) -> Origin {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_reference_display() {
        assert_eq!(CrossReference::new("PUBMED", "1907511").to_string(), "PUBMED; 1907511.");
        assert_eq!(
            CrossReference::new("UniProtKB/Swiss-Prot", "P12345")
                .with_secondary("ABC_HUMAN")
                .to_string(),
            "UniProtKB/Swiss-Prot; P12345; ABC_HUMAN."
        );
    }

    #[test]
    fn cross_reference_lookup() {
        let mut reference = Reference::new(1);
        reference.cross_references.push(CrossReference::new("DOI", "10.1000/1"));
        reference.cross_references.push(CrossReference::new("PUBMED", "42"));
        assert_eq!(reference.cross_reference("pubmed").map(|x| x.primary_id.as_str()), Some("42"));
        assert!(reference.cross_reference("AGRICOLA").is_none());
        assert_eq!(reference.number, Some(1));
    }
}
