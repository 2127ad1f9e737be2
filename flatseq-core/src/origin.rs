//! Source provenance for parsed values.

use core::fmt;

/// The span of physical source lines a parsed value came from.
///
/// Line numbers are 1-based and inclusive. `first_line <= last_line`
/// always holds; [`Origin::new`] orders its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Origin {
    pub first_line: u32,
    pub last_line: u32,
}

impl Origin {
    /// Create an origin covering `first..=last`.
    pub fn new(first: u32, last: u32) -> Self {
        if first <= last {
            Self { first_line: first, last_line: last }
        } else {
            Self { first_line: last, last_line: first }
        }
    }

    /// An origin covering a single line.
    pub fn line(line: u32) -> Self {
        Self { first_line: line, last_line: line }
    }

    /// The smallest origin covering both `self` and `other`.
    pub fn span(&self, other: Origin) -> Origin {
        Origin {
            first_line: self.first_line.min(other.first_line),
            last_line: self.last_line.max(other.last_line),
        }
    }

    /// Smallest origin covering every origin in `origins`, or `None` if empty.
    pub fn covering(origins: impl IntoIterator<Item = Origin>) -> Option<Origin> {
        origins.into_iter().reduce(|acc, o| acc.span(o))
    }

    /// Whether `line` lies within this origin.
    pub fn contains(&self, line: u32) -> bool {
        self.first_line <= line && line <= self.last_line
    }

    /// Number of physical lines covered.
    pub fn line_count(&self) -> u32 {
        self.last_line - self.first_line + 1
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first_line == self.last_line {
            write!(f, "line {}", self.first_line)
        } else {
            write!(f, "lines {}-{}", self.first_line, self.last_line)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_orders_lines() {
        let o = Origin::new(7, 3);
        assert_eq!(o.first_line, 3);
        assert_eq!(o.last_line, 7);
        assert_eq!(o.line_count(), 5);
    }

    #[test]
    fn span_covers_both() {
        let a = Origin::new(4, 6);
        let b = Origin::line(12);
        assert_eq!(a.span(b), Origin::new(4, 12));
        assert_eq!(b.span(a), Origin::new(4, 12));
    }

    #[test]
    fn covering_many() {
        let all = [Origin::line(9), Origin::new(2, 3), Origin::line(5)];
        assert_eq!(Origin::covering(all), Some(Origin::new(2, 9)));
        assert_eq!(Origin::covering(Vec::new()), None);
    }

    #[test]
    fn display() {
        assert_eq!(Origin::line(3).to_string(), "line 3");
        assert_eq!(Origin::new(3, 8).to_string(), "lines 3-8");
        assert!(Origin::new(3, 8).contains(8));
        assert!(!Origin::new(3, 8).contains(9));
    }
}
