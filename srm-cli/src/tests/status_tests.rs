use super::*;
use std::io::Write;

use srm_dat::{Game, Rom};

const FOX: &[u8] = b"The quick brown fox jumps over the lazy dog";

fn fox_index() -> ChecksumIndex {
    ChecksumIndex::from_games(vec![Game {
        name: "fox".into(),
        description: "fox".into(),
        roms: vec![Rom {
            name: "fox.txt".into(),
            size: FOX.len() as u64,
            crc: "414fa339".into(),
            md5: "9e107d9d372bb6826bd81d3542a419d6".into(),
            ..Rom::default()
        }],
        ..Game::default()
    }])
}

fn temp_file_with(data: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_matched_report() {
    let index = fox_index();
    let file = temp_file_with(FOX);
    let result = check_file(&index, file.path(), true);
    let report = FileReport::new(file.path(), &result);

    assert_eq!(report.status, "matched");
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["candidates"][0]["game"], "fox");
    assert_eq!(json["candidates"][0]["rom"], "fox.txt");
    assert_eq!(json["candidates"][0]["size"], 43);
    assert!(json.get("error").is_none());
}

#[test]
fn test_unmatched_report_has_no_candidates() {
    let index = fox_index();
    let file = temp_file_with(b"something else");
    let result = check_file(&index, file.path(), true);
    let report = FileReport::new(file.path(), &result);

    assert_eq!(report.status, "unmatched");
    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("candidates").is_none());
    assert!(json.get("error").is_none());
}

#[test]
fn test_error_report() {
    let index = fox_index();
    let dir = tempfile::tempdir().unwrap();
    let result = check_file(&index, dir.path(), true);
    let report = FileReport::new(dir.path(), &result);

    assert_eq!(report.status, "error");
    assert!(report.error.unwrap().contains("Not a regular file"));
}

#[test]
fn test_tally() {
    let index = fox_index();
    let fox = temp_file_with(FOX);
    let other = temp_file_with(b"other");
    let dir = tempfile::tempdir().unwrap();

    let mut tally = Tally::default();
    for path in [fox.path(), other.path(), dir.path()] {
        tally.record(&check_file(&index, path, true));
    }
    assert_eq!(
        tally,
        Tally {
            matched: 1,
            ambiguous: 0,
            unmatched: 1,
            errors: 1,
        }
    );
}

#[test]
fn test_file_name() {
    assert_eq!(file_name(Path::new("/roms/gb/Battletoads (Japan).gb")), "Battletoads (Japan).gb");
}
