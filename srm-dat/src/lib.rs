//! DAT catalog ingestion and checksum matching.
//!
//! Parse a Logiqx XML DAT with [`Datafile`] (or [`Catalog::load`]), build a
//! [`ChecksumIndex`] over its games, and classify on-disk files with
//! [`ChecksumIndex::match_file`].

pub mod dat;
pub mod error;
mod fields;
pub mod hasher;
pub mod index;
pub mod matcher;
pub mod model;

pub use dat::{Datafile, Games};
pub use error::{DatError, RecordKind};
pub use hasher::{FileHashes, hash_file, hash_file_with_cancel, hash_file_with_progress, hash_reader};
pub use index::{ChecksumIndex, ChecksumIndexBuilder, RomMatch};
pub use matcher::MatchOutcome;
pub use model::{Catalog, Game, Header, Rom};
