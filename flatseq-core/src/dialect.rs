//! Flat-file dialects.

use core::fmt;

/// The two line layouts sharing one record model.
///
/// EMBL tags occupy columns 1–2 with content from column 6; GenBank
/// keywords occupy columns 1–12 with content from column 13. Both place the
/// feature key at column 6 and feature text at column 22.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dialect {
    #[default]
    Embl,
    GenBank,
}

impl Dialect {
    /// Guess the dialect from the first non-blank line of a file.
    ///
    /// ```
    /// # use flatseq_core::Dialect;
    /// assert_eq!(Dialect::detect("ID   X56734; SV 1; linear;"), Some(Dialect::Embl));
    /// assert_eq!(Dialect::detect("LOCUS       X56734"), Some(Dialect::GenBank));
    /// assert_eq!(Dialect::detect(">fasta"), None);
    /// ```
    pub fn detect(first_line: &str) -> Option<Dialect> {
        if first_line.starts_with("ID   ") || first_line == "ID" {
            Some(Dialect::Embl)
        } else if first_line.starts_with("LOCUS") {
            Some(Dialect::GenBank)
        } else {
            None
        }
    }

    /// Maximum length of a written line.
    pub fn line_width(&self) -> usize {
        match self {
            Dialect::Embl => 80,
            Dialect::GenBank => 79,
        }
    }

    /// Column (0-based) where block content starts.
    pub fn content_column(&self) -> usize {
        match self {
            Dialect::Embl => 5,
            Dialect::GenBank => 12,
        }
    }

    /// Column (0-based) where feature locations and qualifiers start.
    pub fn feature_column(&self) -> usize {
        21
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Embl => write!(f, "EMBL"),
            Dialect::GenBank => write!(f, "GenBank"),
        }
    }
}
