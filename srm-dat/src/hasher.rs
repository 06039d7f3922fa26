use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use sha1::Digest;

use crate::error::DatError;

const CHUNK_SIZE: usize = 32 * 1024; // 32 KB

/// Hash results for a file. All digests are lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileHashes {
    /// 8 hex chars, zero-padded
    pub crc32: String,
    pub md5: String,
    pub sha1: String,
    /// Number of bytes hashed
    pub size: u64,
}

/// Compute CRC32, MD5 and SHA1 of a file in a single streaming pass.
///
/// Fails with [`DatError::NotAFile`] for directories and other non-regular
/// files without reading anything.
pub fn hash_file(path: &Path) -> Result<FileHashes, DatError> {
    let (mut file, _) = open_regular_file(path)?;
    hash_stream(&mut file, None, None)
}

/// Like [`hash_file`], but gives up with [`DatError::Cancelled`] once
/// `cancel` is set. The flag is checked before every chunk.
pub fn hash_file_with_cancel(path: &Path, cancel: &AtomicBool) -> Result<FileHashes, DatError> {
    let (mut file, _) = open_regular_file(path)?;
    hash_stream(&mut file, Some(cancel), None)
}

/// Hash a file, reporting progress after each chunk.
/// The callback receives (bytes_processed, total_bytes).
pub fn hash_file_with_progress(
    path: &Path,
    cancel: Option<&AtomicBool>,
    progress: &dyn Fn(u64, u64),
) -> Result<FileHashes, DatError> {
    let (mut file, total) = open_regular_file(path)?;
    hash_stream(&mut file, cancel, Some((progress, total)))
}

/// Hash everything a reader yields.
pub fn hash_reader<R: Read>(
    reader: &mut R,
    cancel: Option<&AtomicBool>,
) -> Result<FileHashes, DatError> {
    hash_stream(reader, cancel, None)
}

fn open_regular_file(path: &Path) -> Result<(File, u64), DatError> {
    let meta = std::fs::metadata(path)?;
    if !meta.is_file() {
        return Err(DatError::NotAFile(path.to_path_buf()));
    }
    let file = File::open(path)?;
    Ok((file, meta.len()))
}

fn hash_stream<R: Read + ?Sized>(
    reader: &mut R,
    cancel: Option<&AtomicBool>,
    progress: Option<(&dyn Fn(u64, u64), u64)>,
) -> Result<FileHashes, DatError> {
    let mut crc = crc32fast::Hasher::new();
    let mut md5_ctx = md5::Context::new();
    let mut sha = sha1::Sha1::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut processed: u64 = 0;

    loop {
        if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
            return Err(DatError::Cancelled);
        }
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        crc.update(&buf[..n]);
        md5_ctx.consume(&buf[..n]);
        sha.update(&buf[..n]);
        processed += n as u64;
        if let Some((report, total)) = progress {
            report(processed, total);
        }
    }

    Ok(FileHashes {
        crc32: format!("{:08x}", crc.finalize()),
        md5: format!("{:x}", md5_ctx.compute()),
        sha1: format!("{:x}", sha.finalize()),
        size: processed,
    })
}

#[cfg(test)]
#[path = "tests/hasher_tests.rs"]
mod tests;
