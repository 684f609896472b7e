use std::borrow::Cow;
use std::fs::File;
use std::io::Result;
use std::path::Path;

use encoding_rs::{UTF_8, WINDOWS_1252};
use memchr::memchr_iter;
use memmap2::Mmap;

/// A memory-mapped log file with precomputed line boundaries.
///
/// Lines are decoded on demand, so both analysis passes can walk the file
/// without holding a decoded copy in memory. See [`decode_line`] for the
/// encoding rules.
pub struct LogFile {
    mmap: Mmap,
    line_ranges: Vec<(usize, usize)>,
}

impl LogFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let line_ranges = line_ranges(mmap.as_ref());
        Ok(Self { mmap, line_ranges })
    }

    pub fn line_count(&self) -> usize {
        self.line_ranges.len()
    }

    pub fn byte_len(&self) -> u64 {
        self.mmap.len() as u64
    }

    /// Iterate `(line_number, line)` pairs; line numbers are 1-based.
    pub fn lines(&self) -> impl Iterator<Item = (u64, Cow<'_, str>)> + '_ {
        let bytes = self.mmap.as_ref();
        self.line_ranges
            .iter()
            .enumerate()
            .map(move |(idx, &(start, end))| {
                (idx as u64 + 1, decode_line(&bytes[start..end]))
            })
    }
}

/// Decode one line as UTF-8 when it is valid UTF-8, else as Windows-1252.
///
/// Both pure ASCII and UTF-8 lines borrow from the map. Windows-1252 maps
/// every byte, so the fallback never fails. A legacy line whose high bytes
/// happen to form valid UTF-8 is read as UTF-8.
fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    UTF_8
        .decode_without_bom_handling_and_without_replacement(bytes)
        .unwrap_or_else(|| WINDOWS_1252.decode_without_bom_handling(bytes).0)
}

/// Find all line boundaries, excluding the `\n` terminator.
///
/// Empty lines are kept so line numbers match what an editor shows.
fn line_ranges(bytes: &[u8]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for end in memchr_iter(b'\n', bytes) {
        ranges.push((start, end));
        start = end + 1;
    }
    if start < bytes.len() {
        ranges.push((start, bytes.len()));
    }
    ranges
}
