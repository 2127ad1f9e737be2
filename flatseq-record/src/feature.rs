//! Feature table entries.

use flatseq_core::{Located, Origin};

use crate::location::CompoundLocation;
use crate::qualifier::Qualifier;

/// A feature from an `FT` / `FEATURES` table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    /// Feature key (e.g. "source", "gene", "CDS").
    pub name: String,
    /// Where the feature lies. Empty when the location text did not parse.
    pub locations: CompoundLocation,
    /// Qualifiers in the order they were written.
    pub qualifiers: Vec<Qualifier>,
    /// Lines from the key line through the last qualifier line.
    pub origin: Origin,
}

impl Feature {
    pub fn new(name: impl Into<String>, locations: CompoundLocation) -> Self {
        Self {
            name: name.into(),
            locations,
            qualifiers: Vec::new(),
            origin: Origin::default(),
        }
    }

    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    /// First qualifier called `name`.
    pub fn qualifier(&self, name: &str) -> Option<&Qualifier> {
        self.qualifiers.iter().find(|q| q.name == name)
    }

    /// Every qualifier called `name`, in order.
    pub fn qualifiers_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Qualifier> + 'a {
        self.qualifiers.iter().filter(move |q| q.name == name)
    }

    /// Value of the first qualifier called `name`.
    pub fn qualifier_value(&self, name: &str) -> Option<&str> {
        self.qualifier(name).and_then(Qualifier::value)
    }

    pub fn is_source(&self) -> bool {
        self.name == "source"
    }
}

impl Located for Feature {
    fn origin(&self) -> Origin {
        self.origin
    }
}
