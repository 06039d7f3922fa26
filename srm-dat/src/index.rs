//! Checksum index for fast CRC32/MD5/SHA1 lookups over a parsed catalog.
//!
//! Each digest maps to every (game, rom) pair that lists it, so ROMs shared
//! across games (BIOS files, clone families) are all reported. The index is
//! assembled with [`ChecksumIndexBuilder`] and is read-only afterwards, so it
//! can be shared between threads without locking.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::model::{Catalog, Game, Rom, normalize_digest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RomRef {
    game: usize,
    rom: usize,
}

/// A catalog entry found by a lookup.
///
/// Two matches are equal when they point at the same ROM record of the same
/// game in the index.
#[derive(Debug, Clone, Copy)]
pub struct RomMatch<'a> {
    /// Index into [`ChecksumIndex::games`]
    pub game_index: usize,
    /// Index of the ROM within the game
    pub rom_index: usize,
    pub game: &'a Game,
    pub rom: &'a Rom,
}

impl PartialEq for RomMatch<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.game_index == other.game_index && self.rom_index == other.rom_index
    }
}

impl Eq for RomMatch<'_> {}

impl Hash for RomMatch<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.game_index.hash(state);
        self.rom_index.hash(state);
    }
}

/// Accumulates games for a [`ChecksumIndex`].
///
/// Games can be added as a [`Games`](crate::dat::Games) iterator streams them,
/// or all at once; [`build`](Self::build) freezes the result.
#[derive(Debug, Default)]
pub struct ChecksumIndexBuilder {
    games: Vec<Game>,
    by_crc: HashMap<String, Vec<RomRef>>,
    by_md5: HashMap<String, Vec<RomRef>>,
    by_sha1: HashMap<String, Vec<RomRef>>,
    rom_count: usize,
}

impl ChecksumIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_game(&mut self, game: Game) {
        let gi = self.games.len();
        for (ri, rom) in game.roms.iter().enumerate() {
            self.rom_count += 1;
            if !rom.has_checksums() {
                log::debug!(
                    "ROM '{}' in game '{}' has no checksums, not indexed",
                    rom.name,
                    game.name
                );
                continue;
            }
            let entry = RomRef { game: gi, rom: ri };
            insert(&mut self.by_crc, &rom.crc, entry, &game.roms);
            insert(&mut self.by_md5, &rom.md5, entry, &game.roms);
            insert(&mut self.by_sha1, &rom.sha1, entry, &game.roms);
        }
        self.games.push(game);
    }

    pub fn build(self) -> ChecksumIndex {
        ChecksumIndex {
            games: self.games,
            by_crc: self.by_crc,
            by_md5: self.by_md5,
            by_sha1: self.by_sha1,
            rom_count: self.rom_count,
        }
    }
}

/// Add `entry` under `digest` unless the digest is empty or an identical ROM
/// of the same game is already there.
fn insert(map: &mut HashMap<String, Vec<RomRef>>, digest: &str, entry: RomRef, roms: &[Rom]) {
    if digest.is_empty() {
        return;
    }
    let refs = map.entry(digest.to_string()).or_default();
    // A game's entries are appended together, so only the tail can hold one.
    let duplicate = refs
        .iter()
        .rev()
        .take_while(|r| r.game == entry.game)
        .any(|r| roms[r.rom] == roms[entry.rom]);
    if !duplicate {
        refs.push(entry);
    }
}

/// Read-only digest → (game, rom) lookups over a fully realized catalog.
#[derive(Debug)]
pub struct ChecksumIndex {
    games: Vec<Game>,
    by_crc: HashMap<String, Vec<RomRef>>,
    by_md5: HashMap<String, Vec<RomRef>>,
    by_sha1: HashMap<String, Vec<RomRef>>,
    rom_count: usize,
}

impl ChecksumIndex {
    pub fn from_games(games: Vec<Game>) -> Self {
        games.into_iter().collect()
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self::from_games(catalog.games)
    }

    /// Every pair whose ROM lists this CRC32. Empty when there is none.
    pub fn lookup_by_crc(&self, crc: &str) -> Vec<RomMatch<'_>> {
        self.lookup(&self.by_crc, crc)
    }

    /// Every pair whose ROM lists this MD5. Empty when there is none.
    pub fn lookup_by_md5(&self, md5: &str) -> Vec<RomMatch<'_>> {
        self.lookup(&self.by_md5, md5)
    }

    /// Every pair whose ROM lists this SHA1. Empty when there is none.
    pub fn lookup_by_sha1(&self, sha1: &str) -> Vec<RomMatch<'_>> {
        self.lookup(&self.by_sha1, sha1)
    }

    fn lookup(&self, map: &HashMap<String, Vec<RomRef>>, digest: &str) -> Vec<RomMatch<'_>> {
        map.get(&normalize_digest(digest))
            .map(|refs| refs.iter().map(|r| self.resolve(*r)).collect())
            .unwrap_or_default()
    }

    fn resolve(&self, r: RomRef) -> RomMatch<'_> {
        let game = &self.games[r.game];
        RomMatch {
            game_index: r.game,
            rom_index: r.rom,
            game,
            rom: &game.roms[r.rom],
        }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Total ROM records seen, including ones without checksums.
    pub fn rom_count(&self) -> usize {
        self.rom_count
    }

    /// Number of distinct CRC32 digests.
    pub fn crc_count(&self) -> usize {
        self.by_crc.len()
    }

    pub fn md5_count(&self) -> usize {
        self.by_md5.len()
    }

    pub fn sha1_count(&self) -> usize {
        self.by_sha1.len()
    }
}

impl FromIterator<Game> for ChecksumIndex {
    fn from_iter<I: IntoIterator<Item = Game>>(iter: I) -> Self {
        let mut builder = ChecksumIndexBuilder::new();
        for game in iter {
            builder.add_game(game);
        }
        builder.build()
    }
}

#[cfg(test)]
#[path = "tests/index_tests.rs"]
mod tests;
