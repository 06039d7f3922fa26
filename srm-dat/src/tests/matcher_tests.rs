use super::*;
use std::io::{Read, Write};

use crate::model::Game;

const FOX: &[u8] = b"The quick brown fox jumps over the lazy dog";
const FOX_CRC: &str = "414fa339";
const FOX_MD5: &str = "9e107d9d372bb6826bd81d3542a419d6";

fn rom(name: &str, crc: &str, md5: &str) -> Rom {
    Rom {
        name: name.into(),
        size: 1024,
        crc: crc.into(),
        md5: md5.into(),
        ..Rom::default()
    }
}

fn game(name: &str, roms: Vec<Rom>) -> Game {
    Game {
        name: name.into(),
        description: name.into(),
        roms,
        ..Game::default()
    }
}

fn hashes(crc32: &str, md5: &str) -> FileHashes {
    FileHashes {
        crc32: crc32.into(),
        md5: md5.into(),
        sha1: String::new(),
        size: 1024,
    }
}

fn arcade_index() -> ChecksumIndex {
    ChecksumIndex::from_games(vec![
        game(
            "gtmrb",
            vec![
                rom("mmp0x1.u514", "6c163f12", ""),
                rom("mm-200-402-s0.bin", "c0ab3efc", ""),
            ],
        ),
        game(
            "gtmr",
            vec![
                rom("u2.bin", "031799f7", ""),
                rom("mm-200-402-s0.bin", "c0ab3efc", ""),
            ],
        ),
    ])
}

#[test]
fn test_unique_match() {
    let index = arcade_index();
    let outcome = index
        .classify(&hashes("6c163f12", "00000000000000000000000000000000"))
        .unwrap();
    match outcome {
        MatchOutcome::Unique(m) => {
            assert_eq!(m.game.name, "gtmrb");
            assert_eq!(m.rom.name, "mmp0x1.u514");
        }
        other => panic!("expected Unique, got {other:?}"),
    }
}

#[test]
fn test_shared_rom_is_ambiguous() {
    let index = arcade_index();
    let outcome = index.classify(&hashes("c0ab3efc", "")).unwrap();
    let MatchOutcome::Ambiguous(candidates) = &outcome else {
        panic!("expected Ambiguous, got {outcome:?}");
    };
    let mut games: Vec<&str> = candidates.iter().map(|m| m.game.name.as_str()).collect();
    games.sort();
    assert_eq!(games, vec!["gtmr", "gtmrb"]);
    assert!(outcome.is_match());
    assert_eq!(outcome.candidates().len(), 2);
}

#[test]
fn test_unknown_file_is_unmatched() {
    let index = arcade_index();
    let outcome = index.classify(&hashes("ffffffff", FOX_MD5)).unwrap();
    assert_eq!(outcome, MatchOutcome::Unmatched);
    assert!(!outcome.is_match());
    assert!(outcome.candidates().is_empty());
}

#[test]
fn test_disjoint_lookups_are_inconsistent() {
    let index = ChecksumIndex::from_games(vec![
        game("by-crc", vec![rom("a.bin", "11111111", "")]),
        game("by-md5", vec![rom("b.bin", "", "22222222222222222222222222222222")]),
    ]);
    let err = index
        .classify(&hashes("11111111", "22222222222222222222222222222222"))
        .unwrap_err();
    match err {
        DatError::InconsistentMatch {
            crc32,
            by_crc,
            by_md5,
            ..
        } => {
            assert_eq!(crc32, "11111111");
            assert_eq!(by_crc, vec!["by-crc/a.bin".to_string()]);
            assert_eq!(by_md5, vec!["by-md5/b.bin".to_string()]);
        }
        other => panic!("expected InconsistentMatch, got {other:?}"),
    }
}

#[test]
fn test_contradicting_md5_is_inconsistent() {
    let index = ChecksumIndex::from_games(vec![game(
        "listed",
        vec![rom("a.bin", "11111111", "33333333333333333333333333333333")],
    )]);
    // CRC hits, but the listed MD5 disagrees with the file.
    let result = index.classify(&hashes("11111111", "44444444444444444444444444444444"));
    assert!(matches!(result, Err(DatError::InconsistentMatch { .. })));
}

#[test]
fn test_md5_narrows_crc_collision() {
    let index = ChecksumIndex::from_games(vec![
        game("first", vec![rom("a.bin", "55555555", "66666666666666666666666666666666")]),
        game("second", vec![rom("b.bin", "55555555", "77777777777777777777777777777777")]),
    ]);
    let outcome = index
        .classify(&hashes("55555555", "66666666666666666666666666666666"))
        .unwrap();
    match outcome {
        MatchOutcome::Unique(m) => assert_eq!(m.game.name, "first"),
        other => panic!("expected Unique, got {other:?}"),
    }
}

#[test]
fn test_both_digests_hitting_same_rom_is_unique() {
    let index = ChecksumIndex::from_games(vec![game(
        "Battletoads (Japan)",
        vec![rom("Battletoads (Japan).gb", FOX_CRC, FOX_MD5)],
    )]);
    let outcome = index.classify(&hashes(FOX_CRC, FOX_MD5)).unwrap();
    assert!(matches!(outcome, MatchOutcome::Unique(_)));
}

#[test]
fn test_match_file_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FOX).unwrap();
    file.flush().unwrap();

    let index = ChecksumIndex::from_games(vec![
        game("fox", vec![rom("fox.txt", FOX_CRC, FOX_MD5)]),
        game("other", vec![rom("other.txt", "12121212", "")]),
    ]);
    match index.match_file(file.path()).unwrap() {
        MatchOutcome::Unique(m) => {
            assert_eq!(m.game.name, "fox");
            assert_eq!(m.rom.name, "fox.txt");
        }
        other => panic!("expected Unique, got {other:?}"),
    }

    // Matching only reads the file.
    let mut contents = Vec::new();
    std::fs::File::open(file.path())
        .unwrap()
        .read_to_end(&mut contents)
        .unwrap();
    assert_eq!(contents, FOX);
}

#[test]
fn test_match_directory_is_not_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let index = arcade_index();
    assert!(matches!(
        index.match_file(dir.path()),
        Err(DatError::NotAFile(_))
    ));
}

#[test]
fn test_match_file_cancelled() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FOX).unwrap();
    file.flush().unwrap();

    let cancel = AtomicBool::new(true);
    let index = arcade_index();
    assert!(matches!(
        index.match_file_with_cancel(file.path(), &cancel),
        Err(DatError::Cancelled)
    ));
}
