use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::{DatError, RecordKind};
use crate::fields::{Element, FieldSource, FieldSpec, extract};

const HEADER_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldSource::Child),
    FieldSpec::required("description", FieldSource::Child),
    FieldSpec::required("version", FieldSource::Child),
    FieldSpec::required("author", FieldSource::Child),
    FieldSpec::optional("date", "", FieldSource::Child),
    FieldSpec::optional("homepage", "", FieldSource::Child),
    FieldSpec::optional("url", "", FieldSource::Child),
];

const GAME_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldSource::Either),
    FieldSpec::required("description", FieldSource::Either),
    FieldSpec::optional("cloneof", "", FieldSource::Either),
    FieldSpec::optional("romof", "", FieldSource::Either),
    FieldSpec::optional("isbios", "no", FieldSource::Either),
    FieldSpec::optional("manufacturer", "", FieldSource::Either),
    FieldSpec::optional("year", "", FieldSource::Either),
];

const ROM_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldSource::Either),
    FieldSpec::required("size", FieldSource::Either),
    FieldSpec::optional("crc", "", FieldSource::Either),
    FieldSpec::optional("md5", "", FieldSource::Either),
    FieldSpec::optional("sha1", "", FieldSource::Either),
    FieldSpec::optional("merge", "", FieldSource::Either),
];

/// Catalog metadata from the DAT `<header>` element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Header {
    /// Official name of the DAT
    pub name: String,
    /// Extended name
    pub description: String,
    /// e.g. "0.2.97.42" or "20171226-085946"
    pub version: String,
    /// Contributors or release group
    pub author: String,
    pub date: String,
    pub homepage: String,
    pub url: String,
}

impl Header {
    pub(crate) fn from_element(element: &Element) -> Result<Self, DatError> {
        let mut f = extract(element, HEADER_FIELDS, RecordKind::Header)?;
        Ok(Self {
            name: f.take("name"),
            description: f.take("description"),
            version: f.take("version"),
            author: f.take("author"),
            date: f.take("date"),
            homepage: f.take("homepage"),
            url: f.take("url"),
        })
    }
}

/// A single ROM file required by a game.
///
/// Equality and hashing cover every field, so two records with the same
/// checksum but different names are distinct values. Use [`Rom::same_file`]
/// to ask whether two records describe the same physical file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rom {
    pub name: String,
    pub size: u64,
    /// CRC32 (lowercase hex), empty if the DAT doesn't list one
    pub crc: String,
    /// MD5 (lowercase hex), empty if absent
    pub md5: String,
    /// SHA1 (lowercase hex), empty if absent
    pub sha1: String,
    /// Name of the parent game's file this ROM is merged from, empty if none
    pub merge: String,
}

impl Rom {
    pub(crate) fn from_element(element: &Element) -> Result<Self, DatError> {
        let mut f = extract(element, ROM_FIELDS, RecordKind::Rom)?;
        let name = f.take("name");
        let size = f.take("size");
        let size = size.trim().parse().map_err(|_| {
            DatError::malformed(format!("Invalid size '{size}' for ROM '{name}'"))
        })?;

        Ok(Self {
            name,
            size,
            crc: normalize_digest(&f.take("crc")),
            md5: normalize_digest(&f.take("md5")),
            sha1: normalize_digest(&f.take("sha1")),
            merge: f.take("merge"),
        })
    }

    /// Whether any checksum is listed. ROMs without one can't be verified.
    pub fn has_checksums(&self) -> bool {
        !(self.crc.is_empty() && self.md5.is_empty() && self.sha1.is_empty())
    }

    /// Whether both records share a non-empty checksum of the same kind.
    pub fn same_file(&self, other: &Rom) -> bool {
        let same = |a: &str, b: &str| !a.is_empty() && a == b;
        same(&self.crc, &other.crc) || same(&self.md5, &other.md5) || same(&self.sha1, &other.sha1)
    }

    pub fn is_merged(&self) -> bool {
        !self.merge.is_empty()
    }
}

/// A game (or machine) entry with the ROMs it requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Game {
    pub name: String,
    /// Common name, often the same as `name`
    pub description: String,
    /// Every `<rom>` record of the game in document order, duplicates included
    pub roms: Vec<Rom>,
    /// Parent game this is a clone of, empty if none
    pub cloneof: String,
    /// Parent game whose ROMs this one uses, empty if none
    pub romof: String,
    pub isbios: bool,
    pub manufacturer: String,
    pub year: String,
}

impl Game {
    /// Build a game from its element.
    ///
    /// ROM records missing a required field are dropped and returned alongside
    /// the game so the caller can report them.
    pub(crate) fn from_element(element: &Element) -> Result<(Self, Vec<DatError>), DatError> {
        let mut f = extract(element, GAME_FIELDS, RecordKind::Game)?;
        let mut game = Self {
            name: f.take("name"),
            description: f.take("description"),
            roms: Vec::new(),
            cloneof: f.take("cloneof"),
            romof: f.take("romof"),
            isbios: parse_bool(&f.take("isbios")),
            manufacturer: f.take("manufacturer"),
            year: f.take("year"),
        };

        let mut problems = Vec::new();
        for rom_element in element.descendants_named("rom") {
            match Rom::from_element(rom_element) {
                Ok(rom) => {
                    if game.roms.contains(&rom) {
                        log::debug!("Duplicate ROM '{}' in game '{}'", rom.name, game.name);
                    }
                    game.roms.push(rom);
                }
                Err(e) if e.is_recoverable() => {
                    log::warn!("Skipping ROM in game '{}': {e}", game.name);
                    problems.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok((game, problems))
    }

    /// The ROM records as a set, collapsing exact duplicates.
    pub fn unique_roms(&self) -> HashSet<&Rom> {
        self.roms.iter().collect()
    }

    /// Parent game name: `cloneof`, falling back to `romof`.
    pub fn parent(&self) -> Option<&str> {
        [self.cloneof.as_str(), self.romof.as_str()]
            .into_iter()
            .find(|name| !name.is_empty())
    }

    pub fn is_clone(&self) -> bool {
        !self.cloneof.is_empty()
    }

    pub fn total_size(&self) -> u64 {
        self.roms.iter().map(|rom| rom.size).sum()
    }
}

/// A fully drained catalog: header, every well-formed game, and the records
/// that had to be skipped.
#[derive(Debug)]
pub struct Catalog {
    pub header: Header,
    pub games: Vec<Game>,
    /// Recoverable [`DatError::IncompleteRecord`] errors met while parsing
    pub problems: Vec<DatError>,
}

impl Catalog {
    pub fn game(&self, name: &str) -> Option<&Game> {
        self.games.iter().find(|game| game.name == name)
    }

    pub fn rom_count(&self) -> usize {
        self.games.iter().map(|game| game.roms.len()).sum()
    }

    /// Games whose `cloneof` or `romof` names a game that isn't in the catalog,
    /// paired with the missing name.
    pub fn broken_parent_refs(&self) -> Vec<(&Game, &str)> {
        let names: HashSet<&str> = self.games.iter().map(|g| g.name.as_str()).collect();
        let mut broken = Vec::new();
        for game in &self.games {
            for parent in [game.cloneof.as_str(), game.romof.as_str()] {
                if !parent.is_empty() && !names.contains(parent) {
                    broken.push((game, parent));
                    break;
                }
            }
        }
        broken
    }

    /// Clone games grouped under the name of their parent.
    pub fn clones_by_parent(&self) -> HashMap<&str, Vec<&Game>> {
        let mut families: HashMap<&str, Vec<&Game>> = HashMap::new();
        for game in self.games.iter().filter(|g| g.is_clone()) {
            families.entry(game.cloneof.as_str()).or_default().push(game);
        }
        families
    }
}

/// Lowercase hex digests so lookups are case-insensitive.
pub(crate) fn normalize_digest(digest: &str) -> String {
    digest.trim().to_ascii_lowercase()
}

fn parse_bool(value: &str) -> bool {
    ["yes", "true", "1"]
        .iter()
        .any(|t| value.trim().eq_ignore_ascii_case(t))
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
