use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::AtomicBool;

use crate::error::DatError;
use crate::hasher::{FileHashes, hash_file, hash_file_with_cancel};
use crate::index::{ChecksumIndex, RomMatch};
use crate::model::Rom;

/// Result of matching a file against the checksum index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome<'a> {
    /// Exactly one catalog entry has these checksums.
    Unique(RomMatch<'a>),
    /// Several entries share the checksums, in no particular order.
    /// The caller decides which one applies.
    Ambiguous(Vec<RomMatch<'a>>),
    Unmatched,
}

impl<'a> MatchOutcome<'a> {
    pub fn is_match(&self) -> bool {
        !matches!(self, Self::Unmatched)
    }

    /// All candidate entries (empty when unmatched).
    pub fn candidates(&self) -> Vec<RomMatch<'a>> {
        match self {
            Self::Unique(m) => vec![*m],
            Self::Ambiguous(ms) => ms.clone(),
            Self::Unmatched => Vec::new(),
        }
    }
}

impl ChecksumIndex {
    /// Classify already computed file hashes using the CRC32 and MD5 indices.
    ///
    /// When both indices return entries they must share at least one pair, and
    /// an entry is only kept if none of its listed CRC32/MD5 values contradict
    /// the file. Anything else is reported as [`DatError::InconsistentMatch`].
    pub fn classify(&self, hashes: &FileHashes) -> Result<MatchOutcome<'_>, DatError> {
        let by_crc = self.lookup_by_crc(&hashes.crc32);
        let by_md5 = self.lookup_by_md5(&hashes.md5);

        if !by_crc.is_empty() && !by_md5.is_empty() && !by_crc.iter().any(|m| by_md5.contains(m)) {
            return Err(inconsistent(hashes, &by_crc, &by_md5));
        }

        let mut seen = HashSet::new();
        let candidates: Vec<RomMatch<'_>> = by_crc
            .iter()
            .chain(by_md5.iter())
            .filter(|m| seen.insert(**m))
            .filter(|m| agrees_with(m.rom, hashes))
            .copied()
            .collect();

        if candidates.is_empty() && !(by_crc.is_empty() && by_md5.is_empty()) {
            return Err(inconsistent(hashes, &by_crc, &by_md5));
        }

        Ok(match candidates.len() {
            0 => MatchOutcome::Unmatched,
            1 => MatchOutcome::Unique(candidates[0]),
            _ => MatchOutcome::Ambiguous(candidates),
        })
    }

    /// Hash a file and classify it. Performs no writes.
    pub fn match_file(&self, path: &Path) -> Result<MatchOutcome<'_>, DatError> {
        let hashes = hash_file(path)?;
        self.classify(&hashes)
    }

    /// Like [`match_file`](Self::match_file), abortable between read chunks.
    pub fn match_file_with_cancel(
        &self,
        path: &Path,
        cancel: &AtomicBool,
    ) -> Result<MatchOutcome<'_>, DatError> {
        let hashes = hash_file_with_cancel(path, cancel)?;
        self.classify(&hashes)
    }
}

/// A ROM agrees with the file unless it lists a CRC32 or MD5 that differs.
fn agrees_with(rom: &Rom, hashes: &FileHashes) -> bool {
    (rom.crc.is_empty() || rom.crc == hashes.crc32) && (rom.md5.is_empty() || rom.md5 == hashes.md5)
}

fn inconsistent(hashes: &FileHashes, by_crc: &[RomMatch<'_>], by_md5: &[RomMatch<'_>]) -> DatError {
    DatError::InconsistentMatch {
        crc32: hashes.crc32.clone(),
        md5: hashes.md5.clone(),
        by_crc: describe(by_crc),
        by_md5: describe(by_md5),
    }
}

fn describe(matches: &[RomMatch<'_>]) -> Vec<String> {
    matches
        .iter()
        .map(|m| format!("{}/{}", m.game.name, m.rom.name))
        .collect()
}

#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod tests;
