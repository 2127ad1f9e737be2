//! Severity-tagged parse diagnostics.
//!
//! Every data-level problem found while reading a record is appended to the
//! record's [`Diagnostics`] instead of aborting the parse. Each entry carries
//! a stable code from [`codes`], the [`Origin`] it refers to, and an English
//! message. External rule engines key off the codes, so they never change
//! meaning between releases.

use core::fmt;
use std::borrow::Cow;

use crate::Origin;

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// The value could not be interpreted and was replaced by a placeholder.
    Error,
    /// The input was accepted but likely does not match intent.
    Warning,
    /// An automatic correction was applied (reported by rule engines).
    Fix,
    /// Informational, e.g. lenient acceptance of unusual layout.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Fix => write!(f, "FIX"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// Stable code, one of the constants in [`codes`].
    pub code: Cow<'static, str>,
    pub severity: Severity,
    /// Source lines the diagnostic refers to.
    pub origin: Origin,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}): {}",
            self.severity, self.code, self.origin, self.message
        )
    }
}

/// Ordered collection of diagnostics for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Append a diagnostic built from its parts.
    pub fn report(
        &mut self,
        code: &'static str,
        severity: Severity,
        origin: Origin,
        message: impl Into<String>,
    ) {
        self.entries.push(Diagnostic {
            code: Cow::Borrowed(code),
            severity,
            origin,
            message: message.into(),
        });
    }

    pub fn error(&mut self, code: &'static str, origin: Origin, message: impl Into<String>) {
        self.report(code, Severity::Error, origin, message);
    }

    pub fn warning(&mut self, code: &'static str, origin: Origin, message: impl Into<String>) {
        self.report(code, Severity::Warning, origin, message);
    }

    pub fn info(&mut self, code: &'static str, origin: Origin, message: impl Into<String>) {
        self.report(code, Severity::Info, origin, message);
    }

    pub fn fix(&mut self, code: &'static str, origin: Origin, message: impl Into<String>) {
        self.report(code, Severity::Fix, origin, message);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// All diagnostics carrying `code`.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.entries.iter().filter(move |d| d.code == code)
    }

    /// Number of diagnostics at `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Stable diagnostic codes.
///
/// The prefix names the block family the code belongs to; `FF` codes are
/// structural (record-level) problems.
pub mod codes {
    /// Block must occur exactly once.
    pub const BLOCK_EXACTLY_ONCE: &str = "FF.1";
    /// Block must not occur more than once.
    pub const BLOCK_AT_MOST_ONCE: &str = "FF.2";
    /// Record is not terminated by `//`.
    pub const MISSING_TERMINATOR: &str = "FF.3";
    /// Unknown line type kept in the catch-all.
    pub const UNKNOWN_LINE_TYPE: &str = "FF.4";
    /// Block appears out of canonical order.
    pub const BLOCK_OUT_OF_ORDER: &str = "FF.5";
    /// Line outside any block was ignored.
    pub const STRAY_LINE: &str = "FF.6";

    /// Malformed identification (ID/LOCUS) line.
    pub const INVALID_ID_LINE: &str = "ID.1";
    /// Sequence length is not a number.
    pub const INVALID_SEQUENCE_LENGTH: &str = "ID.2";
    /// Sequence version is not a number.
    pub const INVALID_SEQUENCE_VERSION: &str = "ID.3";
    /// Identification date is not a valid date.
    pub const INVALID_ID_DATE: &str = "ID.4";

    /// Accession block contains no accession.
    pub const EMPTY_ACCESSION: &str = "AC.1";

    /// Malformed DT line.
    pub const INVALID_DATE_LINE: &str = "DT.1";
    /// Release or entry version in a DT line is not a number.
    pub const INVALID_RELEASE: &str = "DT.2";

    /// Reference number is not a number.
    pub const INVALID_REFERENCE_NUMBER: &str = "RN.1";
    /// Reference position is not a `begin-end` pair of numbers.
    pub const INVALID_REFERENCE_POSITION: &str = "RP.1";
    /// Malformed cross-reference.
    pub const INVALID_CROSS_REFERENCE: &str = "RX.1";

    /// Feature location expression could not be parsed.
    pub const INVALID_LOCATION: &str = "FT.1";
    /// Quoted qualifier value is never closed.
    pub const UNTERMINATED_QUALIFIER: &str = "FT.2";
    /// Feature line without a key or location.
    pub const INVALID_FEATURE_LINE: &str = "FT.3";
    /// Continuation line that belongs to no qualifier.
    pub const ORPHAN_QUALIFIER_LINE: &str = "FT.4";
    /// Qualifier name contains invalid characters.
    pub const INVALID_QUALIFIER_NAME: &str = "FT.5";

    /// Contig location expression could not be parsed.
    pub const INVALID_CONTIG: &str = "CO.1";

    /// Sequence length differs from the length declared in the header.
    pub const SEQUENCE_LENGTH_MISMATCH: &str = "SQ.1";
    /// Sequence data contains a character that is not a base.
    pub const INVALID_SEQUENCE_CHARACTER: &str = "SQ.2";
    /// Sequence header line is malformed.
    pub const INVALID_SEQUENCE_HEADER: &str = "SQ.3";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_query() {
        let mut diags = Diagnostics::new();
        diags.error(codes::INVALID_LOCATION, Origin::new(3, 4), "bad location");
        diags.info(codes::UNKNOWN_LINE_TYPE, Origin::line(9), "unknown line type \"ZZ\"");
        diags.warning(codes::STRAY_LINE, Origin::line(10), "stray line");

        assert_eq!(diags.len(), 3);
        assert!(diags.has_errors());
        assert_eq!(diags.count(Severity::Info), 1);
        assert_eq!(diags.with_code("FT.1").count(), 1);
        assert_eq!(diags.with_code("FF.1").count(), 0);
    }

    #[test]
    fn order_is_preserved() {
        let mut a = Diagnostics::new();
        a.info(codes::BLOCK_OUT_OF_ORDER, Origin::line(1), "first");
        let mut b = Diagnostics::new();
        b.fix("XX.9", Origin::line(2), "second");
        a.extend(b);
        let messages: Vec<&str> = a.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, ["first", "second"]);
        assert!(!a.has_errors());
    }

    #[test]
    fn display_format() {
        let mut diags = Diagnostics::new();
        diags.error(
            codes::BLOCK_EXACTLY_ONCE,
            Origin::new(2, 6),
            "Block DE must occur exactly once",
        );
        let d = diags.iter().next().unwrap();
        assert_eq!(d.to_string(), "ERROR FF.1 (lines 2-6): Block DE must occur exactly once");
    }
}
