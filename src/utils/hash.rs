use anyhow::{Context, Result};
use memmap2::MmapOptions;
use std::fs::File;
use std::path::Path;
use xxhash_rust::xxh3::xxh3_128;

/// Files at or above this size are mapped instead of read into memory.
pub const MMAP_THRESHOLD: u64 = 1_048_576;

/// Fingerprint a byte slice as 32 lowercase hex characters (xxHash3-128).
#[must_use]
pub fn fingerprint_bytes(data: &[u8]) -> String {
    let hash = xxh3_128(data);
    format!("{hash:032x}")
}

/// Fingerprint the full contents of a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, stat'ed or read.
pub fn fingerprint_file(path: &Path) -> Result<String> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to stat {}", path.display()))?;

    if metadata.len() == 0 {
        return Ok(fingerprint_bytes(b""));
    }

    if metadata.len() < MMAP_THRESHOLD {
        let content =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(fingerprint_bytes(&content))
    } else {
        // SAFETY: the map is read-only and dropped before returning. A concurrent
        // writer can only change which bytes get hashed.
        let mmap = unsafe { MmapOptions::new().map(&file) }
            .with_context(|| format!("Failed to map {}", path.display()))?;
        Ok(fingerprint_bytes(&mmap))
    }
}
