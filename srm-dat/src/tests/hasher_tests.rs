use super::*;
use std::cell::RefCell;
use std::io::{Cursor, Write};

const FOX: &[u8] = b"The quick brown fox jumps over the lazy dog";

fn temp_file_with(data: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}

/// Yields its data, then raises the cancel flag after the first chunk.
struct CancelAfterFirstRead<'a> {
    inner: Cursor<Vec<u8>>,
    cancel: &'a AtomicBool,
}

impl Read for CancelAfterFirstRead<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.cancel.store(true, Ordering::Relaxed);
        Ok(n)
    }
}

#[test]
fn test_known_digests() {
    let file = temp_file_with(FOX);
    let hashes = hash_file(file.path()).unwrap();
    assert_eq!(hashes.crc32, "414fa339");
    assert_eq!(hashes.md5, "9e107d9d372bb6826bd81d3542a419d6");
    assert_eq!(hashes.sha1, "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12");
    assert_eq!(hashes.size, FOX.len() as u64);
}

#[test]
fn test_empty_file() {
    let file = temp_file_with(&[]);
    let hashes = hash_file(file.path()).unwrap();
    assert_eq!(hashes.crc32, "00000000");
    assert_eq!(hashes.md5, "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(hashes.sha1, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    assert_eq!(hashes.size, 0);
}

#[test]
fn test_multi_chunk_matches_one_shot() {
    // Not a multiple of the chunk size, so the last read is partial.
    let data: Vec<u8> = (0..CHUNK_SIZE * 3 + 517).map(|i| (i % 251) as u8).collect();
    let file = temp_file_with(&data);
    let hashes = hash_file(file.path()).unwrap();

    assert_eq!(hashes.crc32, format!("{:08x}", crc32fast::hash(&data)));
    assert_eq!(hashes.md5, format!("{:x}", md5::compute(&data)));
    assert_eq!(hashes.sha1, format!("{:x}", sha1::Sha1::digest(&data)));
    assert_eq!(hashes.size, data.len() as u64);
}

#[test]
fn test_crc_is_eight_hex_digits() {
    let hashes = hash_reader(&mut Cursor::new(vec![0u8]), None).unwrap();
    assert_eq!(hashes.crc32, "d202ef8d");
    let hashes = hash_reader(&mut Cursor::new(b"a".to_vec()), None).unwrap();
    assert_eq!(hashes.crc32.len(), 8);
    assert_eq!(hashes.crc32, "e8b7be43");
}

#[test]
fn test_reader_and_file_agree() {
    let file = temp_file_with(FOX);
    let from_file = hash_file(file.path()).unwrap();
    let from_reader = hash_reader(&mut Cursor::new(FOX.to_vec()), None).unwrap();
    assert_eq!(from_file, from_reader);
}

#[test]
fn test_directory_is_not_a_file() {
    let dir = tempfile::tempdir().unwrap();
    match hash_file(dir.path()) {
        Err(DatError::NotAFile(path)) => assert_eq!(path, dir.path()),
        other => panic!("expected NotAFile, got {other:?}"),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = hash_file(&dir.path().join("nope.bin"));
    assert!(matches!(result, Err(DatError::Io(_))));
}

#[test]
fn test_cancel_before_start() {
    let file = temp_file_with(FOX);
    let cancel = AtomicBool::new(true);
    assert!(matches!(
        hash_file_with_cancel(file.path(), &cancel),
        Err(DatError::Cancelled)
    ));
}

#[test]
fn test_cancel_between_chunks() {
    let cancel = AtomicBool::new(false);
    let mut reader = CancelAfterFirstRead {
        inner: Cursor::new(vec![0x5Au8; CHUNK_SIZE * 4]),
        cancel: &cancel,
    };
    assert!(matches!(
        hash_reader(&mut reader, Some(&cancel)),
        Err(DatError::Cancelled)
    ));
    // Only the first chunk was consumed.
    assert_eq!(reader.inner.position(), CHUNK_SIZE as u64);
}

#[test]
fn test_progress_reports_every_chunk() {
    let data = vec![7u8; CHUNK_SIZE * 2 + 10];
    let file = temp_file_with(&data);
    let calls = RefCell::new(Vec::new());

    let hashes = hash_file_with_progress(file.path(), None, &|done, total| {
        calls.borrow_mut().push((done, total))
    })
    .unwrap();

    let total = data.len() as u64;
    assert_eq!(hashes.size, total);
    let calls = calls.into_inner();
    assert_eq!(
        calls,
        vec![
            (CHUNK_SIZE as u64, total),
            (CHUNK_SIZE as u64 * 2, total),
            (total, total),
        ]
    );
}

#[test]
fn test_concurrent_hashing() {
    let files: Vec<_> = (0..4u8)
        .map(|i| temp_file_with(&vec![i; CHUNK_SIZE + i as usize]))
        .collect();
    let expected: Vec<_> = files.iter().map(|f| hash_file(f.path()).unwrap()).collect();

    let results: Vec<FileHashes> = std::thread::scope(|s| {
        let handles: Vec<_> = files
            .iter()
            .map(|f| s.spawn(move || hash_file(f.path()).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results, expected);
}
