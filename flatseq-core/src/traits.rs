//! Core trait definitions for flatseq.

use crate::Origin;

/// A parsed value that remembers which source lines it came from.
pub trait Located {
    /// The source line span of this value.
    fn origin(&self) -> Origin;
}

/// A biological sequence (DNA, RNA, protein) held as raw residue bytes.
pub trait Sequence {
    /// The raw byte representation of the sequence.
    fn as_bytes(&self) -> &[u8];

    /// Length in residues/bases.
    fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the sequence is empty.
    fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}
