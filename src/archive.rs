//! Indexed archive codec
//!
//! Every catalog and save slot is stored as a pair of files sharing a base name:
//! an index (`.IDX`) holding little-endian `u32` cumulative end offsets, and a blob
//! (`.GRP`) holding the concatenated record bytes. Record `i` spans
//! `[offset[i-1], offset[i])` of the blob with `offset[-1] = 0`.
//!
//! An offset of zero is read as "end of blob". That lets the final record use 0 as
//! "remainder", but a non-final record whose true end is 0 cannot be told apart from
//! "rest of file". The codec keeps that behaviour as-is since save files depend on it.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, info};
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// One record of an archive, opaque to the codec
pub type Record = Vec<u8>;

/// Build the `(index, blob)` path pair for an archive base name such as `data/R1`
pub fn archive_paths(base: &Path) -> (PathBuf, PathBuf) {
    (base.with_extension("IDX"), base.with_extension("GRP"))
}

/// Split a blob into records according to an index buffer
pub fn decode(index: &[u8], blob: &[u8]) -> Vec<Record> {
    let count = index.len() / 4;
    let mut cursor = Cursor::new(index);
    let mut records = Vec::with_capacity(count);
    let mut begin = 0usize;

    for i in 0..count {
        // The index length was checked against count, the read cannot fail
        let raw = match cursor.read_u32::<LittleEndian>() {
            Ok(v) => v as usize,
            Err(_) => break,
        };
        let end = if raw == 0 { blob.len() } else { raw.min(blob.len()) };
        if end <= begin {
            debug!("archive record {} is empty ({} <= {})", i, end, begin);
            records.push(Vec::new());
            continue;
        }
        records.push(blob[begin..end].to_vec());
        begin = end;
    }

    records
}

/// Produce `(index, blob)` buffers for a list of records
pub fn encode(records: &[Record]) -> (Vec<u8>, Vec<u8>) {
    let total: usize = records.iter().map(|r| r.len()).sum();
    let mut blob = Vec::with_capacity(total);
    let mut index = Vec::with_capacity(records.len() * 4);

    for record in records {
        blob.extend_from_slice(record);
        // Writing into a Vec never fails
        let _ = index.write_u32::<LittleEndian>(blob.len() as u32);
    }

    (index, blob)
}

/// Load an archive from its index and blob files
pub fn load(index_path: &Path, blob_path: &Path) -> Result<Vec<Record>, String> {
    let index = read_file(index_path)?;
    let blob = read_file(blob_path)?;
    let records = decode(&index, &blob);
    info!(
        "Loaded {} records ({} bytes) from {:?}",
        records.len(),
        blob.len(),
        blob_path
    );
    Ok(records)
}

/// Load an archive by base name (`R1` → `R1.IDX` + `R1.GRP`)
pub fn load_base(base: &Path) -> Result<Vec<Record>, String> {
    let (idx, grp) = archive_paths(base);
    load(&idx, &grp)
}

/// Write an archive to its index and blob files, replacing both
pub fn save(index_path: &Path, blob_path: &Path, records: &[Record]) -> Result<(), String> {
    let (index, blob) = encode(records);
    write_file(blob_path, &blob)?;
    write_file(index_path, &index)?;
    info!("Saved {} records to {:?}", records.len(), blob_path);
    Ok(())
}

/// Save an archive by base name
pub fn save_base(base: &Path, records: &[Record]) -> Result<(), String> {
    let (idx, grp) = archive_paths(base);
    save(&idx, &grp, records)
}

fn read_file(path: &Path) -> Result<Vec<u8>, String> {
    let mut file = File::open(path).map_err(|e| format!("Failed to open {:?}: {}", path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
    Ok(bytes)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), String> {
    let mut file =
        File::create(path).map_err(|e| format!("Failed to create {:?}: {}", path, e))?;
    file.write_all(bytes)
        .map_err(|e| format!("Failed to write {:?}: {}", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("R1");
        let records = vec![vec![1u8, 2, 3], vec![4u8], vec![5u8, 6, 7, 8, 9]];

        save_base(&base, &records).unwrap();
        let loaded = load_base(&base).unwrap();

        assert_eq!(loaded, records);
    }

    #[test]
    fn test_index_holds_cumulative_offsets() {
        let (index, blob) = encode(&[vec![0xAA; 3], vec![0xBB; 5]]);
        assert_eq!(index, vec![3, 0, 0, 0, 8, 0, 0, 0]);
        assert_eq!(blob.len(), 8);
    }

    #[test]
    fn test_zero_final_offset_means_rest_of_blob() {
        let index = [4u8, 0, 0, 0, 0, 0, 0, 0];
        let blob = [1u8, 2, 3, 4, 5, 6];
        let records = decode(&index, &blob);
        assert_eq!(records, vec![vec![1, 2, 3, 4], vec![5, 6]]);
    }

    #[test]
    fn test_empty_leading_record_swallows_blob() {
        // A leading zero-length record writes offset 0, which reads back as "rest of file"
        let (index, blob) = encode(&[vec![], vec![7u8, 8]]);
        let records = decode(&index, &blob);
        assert_eq!(records[0], vec![7, 8]);
        assert!(records[1].is_empty());
    }

    #[test]
    fn test_non_increasing_offset_gives_empty_record() {
        let index = [4u8, 0, 0, 0, 2, 0, 0, 0, 6, 0, 0, 0];
        let blob = [1u8, 2, 3, 4, 5, 6];
        let records = decode(&index, &blob);
        assert_eq!(records.len(), 3);
        assert!(records[1].is_empty());
        assert_eq!(records[2], vec![5, 6]);
    }

    #[test]
    fn test_missing_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_base(&dir.path().join("NOPE"));
        assert!(result.is_err());
    }
}
