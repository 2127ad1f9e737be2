//! Feature and contig locations.
//!
//! A feature's position on a sequence is a [`CompoundLocation`]: an ordered
//! `join` (operationally contiguous) or `order` (grouping only) of
//! [`Location`] elements. Coordinates are 1-based and inclusive, exactly as
//! written in the flat file.

use core::fmt;

use flatseq_core::{Located, Origin};

/// What a single location element points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocationKind {
    /// `156`
    LocalBase { position: u64 },
    /// `4..156`
    LocalRange { begin: u64, end: u64 },
    /// `4^5`
    LocalBetween { begin: u64, end: u64 },
    /// `A00001.5:156`
    RemoteBase {
        accession: String,
        version: Option<u32>,
        position: u64,
    },
    /// `A00001.5:4..156`
    RemoteRange {
        accession: String,
        version: Option<u32>,
        begin: u64,
        end: u64,
    },
    /// `A00001.5:4^5`
    RemoteBetween {
        accession: String,
        version: Option<u32>,
        begin: u64,
        end: u64,
    },
    /// `gap(100)` or `gap(unk100)`; only valid in contig assembly lines.
    Gap { length: u64, unknown_length: bool },
}

/// One element of a compound location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub kind: LocationKind,
    /// Element-level `complement(...)`.
    pub complement: bool,
    /// `<` on the begin position.
    pub left_partial: bool,
    /// `>` on the end position.
    pub right_partial: bool,
    pub origin: Origin,
}

impl Location {
    /// A plain, forward, non-partial element.
    pub fn new(kind: LocationKind, origin: Origin) -> Self {
        Self {
            kind,
            complement: false,
            left_partial: false,
            right_partial: false,
            origin,
        }
    }

    pub fn local_range(begin: u64, end: u64) -> Self {
        Self::new(LocationKind::LocalRange { begin, end }, Origin::default())
    }

    pub fn local_base(position: u64) -> Self {
        Self::new(LocationKind::LocalBase { position }, Origin::default())
    }

    pub fn with_complement(mut self, complement: bool) -> Self {
        self.complement = complement;
        self
    }

    /// First coordinate, or `None` for gaps.
    pub fn begin(&self) -> Option<u64> {
        match &self.kind {
            LocationKind::LocalBase { position } | LocationKind::RemoteBase { position, .. } => {
                Some(*position)
            }
            LocationKind::LocalRange { begin, .. }
            | LocationKind::LocalBetween { begin, .. }
            | LocationKind::RemoteRange { begin, .. }
            | LocationKind::RemoteBetween { begin, .. } => Some(*begin),
            LocationKind::Gap { .. } => None,
        }
    }

    /// Last coordinate, or `None` for gaps.
    pub fn end(&self) -> Option<u64> {
        match &self.kind {
            LocationKind::LocalBase { position } | LocationKind::RemoteBase { position, .. } => {
                Some(*position)
            }
            LocationKind::LocalRange { end, .. }
            | LocationKind::LocalBetween { end, .. }
            | LocationKind::RemoteRange { end, .. }
            | LocationKind::RemoteBetween { end, .. } => Some(*end),
            LocationKind::Gap { .. } => None,
        }
    }

    /// Whether this element refers to another record's sequence.
    pub fn is_remote(&self) -> bool {
        matches!(
            self.kind,
            LocationKind::RemoteBase { .. }
                | LocationKind::RemoteRange { .. }
                | LocationKind::RemoteBetween { .. }
        )
    }

    pub fn is_gap(&self) -> bool {
        matches!(self.kind, LocationKind::Gap { .. })
    }

    /// Accession and version of a remote element.
    pub fn accession(&self) -> Option<(&str, Option<u32>)> {
        match &self.kind {
            LocationKind::RemoteBase { accession, version, .. }
            | LocationKind::RemoteRange { accession, version, .. }
            | LocationKind::RemoteBetween { accession, version, .. } => {
                Some((accession.as_str(), *version))
            }
            _ => None,
        }
    }

    /// Number of bases spanned (gaps report their length).
    pub fn len(&self) -> u64 {
        match &self.kind {
            LocationKind::LocalBase { .. } | LocationKind::RemoteBase { .. } => 1,
            LocationKind::LocalBetween { .. } | LocationKind::RemoteBetween { .. } => 0,
            LocationKind::LocalRange { begin, end }
            | LocationKind::RemoteRange { begin, end, .. } => {
                end.saturating_sub(*begin) + 1
            }
            LocationKind::Gap { length, .. } => *length,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fmt_partial(&self, f: &mut fmt::Formatter<'_>, left: bool, right: bool) -> fmt::Result {
        if self.complement {
            f.write_str("complement(")?;
        }
        if let Some((accession, version)) = self.accession() {
            f.write_str(accession)?;
            if let Some(v) = version {
                write!(f, ".{v}")?;
            }
            f.write_str(":")?;
        }
        match &self.kind {
            LocationKind::LocalBase { position } | LocationKind::RemoteBase { position, .. } => {
                if left {
                    f.write_str("<")?;
                } else if right {
                    f.write_str(">")?;
                }
                write!(f, "{position}")?;
            }
            LocationKind::LocalRange { begin, end }
            | LocationKind::RemoteRange { begin, end, .. } => {
                if left {
                    f.write_str("<")?;
                }
                write!(f, "{begin}..")?;
                if right {
                    f.write_str(">")?;
                }
                write!(f, "{end}")?;
            }
            LocationKind::LocalBetween { begin, end }
            | LocationKind::RemoteBetween { begin, end, .. } => {
                write!(f, "{begin}^{end}")?;
            }
            LocationKind::Gap { length, unknown_length } => {
                if *unknown_length {
                    write!(f, "gap(unk{length})")?;
                } else {
                    write!(f, "gap({length})")?;
                }
            }
        }
        if self.complement {
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl Located for Location {
    fn origin(&self) -> Origin {
        self.origin
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_partial(f, self.left_partial, self.right_partial)
    }
}

/// How the elements of a compound location relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompoundKind {
    /// `join(...)`: elements are joined into one contiguous molecule.
    #[default]
    Join,
    /// `order(...)`: elements are grouped, with no claim of contiguity.
    Order,
}

/// A feature's complete location expression.
///
/// A lone element written without `join`/`order` is held as a
/// single-element [`CompoundKind::Join`] and printed back without the
/// keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompoundLocation {
    pub kind: CompoundKind,
    pub locations: Vec<Location>,
    /// `complement(...)` around the whole expression.
    pub complement: bool,
    /// The syntactically first position carried `<`.
    pub left_partial: bool,
    /// The syntactically last position carried `>`.
    pub right_partial: bool,
    pub origin: Origin,
}

impl CompoundLocation {
    /// A compound over `locations` with partial flags derived from the
    /// first and last element.
    pub fn new(kind: CompoundKind, locations: Vec<Location>, origin: Origin) -> Self {
        let left_partial = locations.first().is_some_and(|l| l.left_partial);
        let right_partial = locations.last().is_some_and(|l| l.right_partial);
        Self {
            kind,
            locations,
            complement: false,
            left_partial,
            right_partial,
            origin,
        }
    }

    /// Placeholder for an expression that could not be parsed.
    pub fn empty(origin: Origin) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Smallest coordinate among local elements, falling back to remote
    /// elements when there are none.
    pub fn min_position(&self) -> Option<u64> {
        let local = self
            .locations
            .iter()
            .filter(|l| !l.is_remote())
            .filter_map(Location::begin)
            .min();
        local.or_else(|| self.locations.iter().filter_map(Location::begin).min())
    }

    /// Largest local coordinate.
    pub fn max_position(&self) -> Option<u64> {
        self.locations
            .iter()
            .filter(|l| !l.is_remote())
            .filter_map(Location::end)
            .max()
    }

    /// Whether any element is a contig gap.
    pub fn has_gaps(&self) -> bool {
        self.locations.iter().any(Location::is_gap)
    }

    /// Canonical text of every element, honouring the compound's partial
    /// flags on the first and last element.
    pub fn element_texts(&self) -> Vec<String> {
        let last = self.locations.len().saturating_sub(1);
        self.locations
            .iter()
            .enumerate()
            .map(|(i, loc)| {
                let left = loc.left_partial || (i == 0 && self.left_partial);
                let right = loc.right_partial || (i == last && self.right_partial);
                PartialDisplay { loc, left, right }.to_string()
            })
            .collect()
    }

    /// Whether the `join`/`order` keyword is written.
    pub fn has_operator(&self) -> bool {
        self.locations.len() != 1 || self.kind == CompoundKind::Order
    }
}

struct PartialDisplay<'a> {
    loc: &'a Location,
    left: bool,
    right: bool,
}

impl fmt::Display for PartialDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.loc.fmt_partial(f, self.left, self.right)
    }
}

impl Located for CompoundLocation {
    fn origin(&self) -> Origin {
        self.origin
    }
}

impl fmt::Display for CompoundLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.complement {
            f.write_str("complement(")?;
        }
        let elements = self.element_texts().join(",");
        if self.has_operator() {
            match self.kind {
                CompoundKind::Join => write!(f, "join({elements})")?,
                CompoundKind::Order => write!(f, "order({elements})")?,
            }
        } else {
            f.write_str(&elements)?;
        }
        if self.complement {
            f.write_str(")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(begin: u64, end: u64) -> Location {
        Location::new(
            LocationKind::RemoteRange {
                accession: "A00001".into(),
                version: Some(5),
                begin,
                end,
            },
            Origin::line(1),
        )
    }

    #[test]
    fn display_elements() {
        assert_eq!(Location::local_base(156).to_string(), "156");
        assert_eq!(Location::local_range(4, 156).to_string(), "4..156");
        assert_eq!(
            Location::local_range(4, 156).with_complement(true).to_string(),
            "complement(4..156)"
        );
        assert_eq!(remote(34, 45).to_string(), "A00001.5:34..45");

        let between =
            Location::new(LocationKind::LocalBetween { begin: 4, end: 5 }, Origin::line(1));
        assert_eq!(between.to_string(), "4^5");

        let gap = Location::new(
            LocationKind::Gap { length: 100, unknown_length: true },
            Origin::line(1),
        );
        assert_eq!(gap.to_string(), "gap(unk100)");
    }

    #[test]
    fn display_partials() {
        let mut loc = Location::local_range(4, 156);
        loc.left_partial = true;
        assert_eq!(loc.to_string(), "<4..156");
        loc.left_partial = false;
        loc.right_partial = true;
        assert_eq!(loc.to_string(), "4..>156");
    }

    #[test]
    fn single_join_prints_bare() {
        let compound = CompoundLocation::new(
            CompoundKind::Join,
            vec![Location::local_range(1, 10)],
            Origin::line(1),
        );
        assert_eq!(compound.to_string(), "1..10");

        let order = CompoundLocation::new(
            CompoundKind::Order,
            vec![Location::local_range(1, 10)],
            Origin::line(1),
        );
        assert_eq!(order.to_string(), "order(1..10)");
    }

    #[test]
    fn compound_flags_apply_to_ends() {
        let mut compound = CompoundLocation::new(
            CompoundKind::Join,
            vec![Location::local_range(1, 10), Location::local_range(20, 30)],
            Origin::line(1),
        );
        compound.left_partial = true;
        compound.right_partial = true;
        compound.complement = true;
        assert_eq!(compound.to_string(), "complement(join(<1..10,20..>30))");
    }

    #[test]
    fn positions() {
        let compound = CompoundLocation::new(
            CompoundKind::Join,
            vec![remote(2, 3), Location::local_range(40, 50), Location::local_base(12)],
            Origin::line(1),
        );
        assert_eq!(compound.min_position(), Some(12));
        assert_eq!(compound.max_position(), Some(50));
        assert_eq!(Location::local_range(4, 13).len(), 10);
        assert!(CompoundLocation::empty(Origin::line(2)).is_empty());
    }
}
