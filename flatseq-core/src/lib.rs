//! Shared primitives for the flatseq flat-file toolkit.
//!
//! `flatseq-core` provides the foundation the record model and the
//! EMBL/GenBank reader and writer build on:
//!
//! - **Error types** — [`FlatseqError`] and [`Result`] for I/O and misuse failures
//! - **Origins** — [`Origin`], the first/last source line span carried by parsed values
//! - **Diagnostics** — [`Diagnostics`], severity-tagged messages keyed by stable [`codes`]
//! - **Dialects** — [`Dialect`], EMBL or GenBank line layout
//! - **Traits** — [`Located`] and [`Sequence`]
//! - **Input** — transparent gzip detection via [`compress::open_path`]

pub mod compress;
pub mod diagnostics;
pub mod dialect;
pub mod error;
pub mod origin;
pub mod traits;

pub use diagnostics::{codes, Diagnostic, Diagnostics, Severity};
pub use dialect::Dialect;
pub use error::{FlatseqError, Result};
pub use origin::Origin;
pub use traits::*;
