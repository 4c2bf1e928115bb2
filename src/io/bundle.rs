//! A bundle is a directory of graph files. Entries are processed in name order,
//! possibly split in consecutive chunks to bound the memory used by one parallel pass.

use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::errors::{GraphashError, Result};


/// regular files of a directory sorted by file name. A path to a file is a bundle of one entry.
pub fn list_bundle(dir: &Path) -> Result<Vec<PathBuf>> {
    if dir.is_file() {
        return Ok(vec![dir.to_path_buf()]);
    }
    let mut entries = Vec::<PathBuf>::new();
    let read_dir = std::fs::read_dir(dir).map_err(|e| GraphashError::io(dir, e))?;
    for entry in read_dir {
        let entry = entry.map_err(|e| GraphashError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            entries.push(path);
        }
    }
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    log::debug!("bundle {:?} has {} entries", dir.as_os_str(), entries.len());
    Ok(entries)
} // end of list_bundle


/// splits 0..nb_items in at most nb_chunks consecutive non empty ranges of sizes differing by at most 1
pub fn chunk_ranges(nb_items: usize, nb_chunks: usize) -> Vec<Range<usize>> {
    let nb_chunks = nb_chunks.max(1).min(nb_items.max(1));
    let base = nb_items / nb_chunks;
    let remainder = nb_items % nb_chunks;
    let mut ranges = Vec::with_capacity(nb_chunks);
    let mut start = 0;
    for i in 0..nb_chunks {
        let len = base + if i < remainder { 1 } else { 0 };
        if len == 0 {
            continue;
        }
        ranges.push(start..start + len);
        start += len;
    }
    ranges
} // end of chunk_ranges


// end of mod tests
