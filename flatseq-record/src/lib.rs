//! Record model for EMBL and GenBank flat files.
//!
//! - **Locations** — [`Location`], [`CompoundLocation`] and the
//!   [`location_parser`] for the feature location grammar
//! - **Qualifiers** — [`Qualifier`] and the [`QualifierAssembler`] that
//!   rebuilds wrapped, quoted values
//! - **Records** — [`Record`] with its blocks, built through [`RecordBuilder`]
//! - **Rules** — the [`Rule`] / [`RuleSet`] seam for external validation

pub mod feature;
pub mod location;
pub mod location_parser;
pub mod qualifier;
pub mod record;
pub mod reference;
pub mod rule;

pub use feature::Feature;
pub use location::{CompoundKind, CompoundLocation, Location, LocationKind};
pub use location_parser::{parse_location, LocationError, LocationParser, LocationText};
pub use qualifier::{Qualifier, QualifierAssembler, NO_SPACE_QUALIFIERS};
pub use record::{
    Accessions, BaseCounts, Dates, DbLink, DbLinks, Identification, Keywords, Organism, Record,
    RecordBuilder, SequenceBlock, Text, Topology, UnknownBlock, Version,
};
pub use reference::{CrossReference, Reference};
pub use rule::{Rule, RuleSet};
