//! Reader configuration.

use flatseq_core::Dialect;

/// Configuration for flat-file reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReaderConfig {
    /// Line layout of the input.
    pub dialect: Dialect,
    /// Decode `SQ` / `ORIGIN` blocks. When `false` the block is still
    /// checked for multiplicity but the record carries no sequence.
    pub read_sequence: bool,
    /// Decode `FT` / `FEATURES` blocks.
    pub read_features: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Embl,
            read_sequence: true,
            read_features: true,
        }
    }
}

impl ReaderConfig {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    pub fn embl() -> Self {
        Self::new(Dialect::Embl)
    }

    pub fn genbank() -> Self {
        Self::new(Dialect::GenBank)
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_sequence(mut self, read_sequence: bool) -> Self {
        self.read_sequence = read_sequence;
        self
    }

    pub fn with_features(mut self, read_features: bool) -> Self {
        self.read_features = read_features;
        self
    }
}
