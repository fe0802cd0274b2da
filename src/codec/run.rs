//! Key-group run codec
//!
//! Encodes and decodes an ordered map of key groups as a flat sequence of
//! runs: `[key][count][count × record]`, repeated until end of stream.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use crate::error::{Result, SpillError};

use super::record::BinRecord;
use super::RUN_HEADER_SIZE;

/// Write all key groups to a stream, one run per key, in ascending key order.
///
/// Empty groups are never a legal state and are not written; the map is
/// expected to contain at least one record per key.
pub fn write_groups<W: Write>(
    writer: &mut W,
    groups: &BTreeMap<i64, Vec<BinRecord>>,
) -> Result<()> {
    for (key, records) in groups {
        writer.write_all(&key.to_be_bytes())?;
        writer.write_all(&(records.len() as i32).to_be_bytes())?;
        for record in records {
            record.write_to(writer)?;
        }
    }
    Ok(())
}

/// Read runs from a stream until end of file, merging into `groups`.
///
/// Records for a key already present in `groups` (from an earlier run in the
/// same stream, or pre-seeded by the caller) are appended, not replaced.
/// A cleanly exhausted stream terminates the loop; a partial run header or a
/// truncated run body is a [`SpillError::PageCorruption`].
pub fn read_groups<R: Read>(
    reader: &mut R,
    groups: &mut BTreeMap<i64, Vec<BinRecord>>,
) -> Result<()> {
    let mut header = [0u8; RUN_HEADER_SIZE];

    while read_header_or_eof(reader, &mut header)? {
        let key = i64::from_be_bytes(header[0..8].try_into().unwrap());
        let count = i32::from_be_bytes(header[8..12].try_into().unwrap());

        if count <= 0 {
            return Err(SpillError::PageCorruption(format!(
                "run for key {} has invalid record count {}",
                key, count
            )));
        }

        let records = groups.entry(key).or_default();
        records.reserve(count as usize);
        for _ in 0..count {
            records.push(BinRecord::read_from(key, reader)?);
        }
    }

    Ok(())
}

/// Fill `buf` with the next run header.
///
/// Returns `Ok(false)` on a clean end of stream (zero bytes available, the
/// normal terminator), `Ok(true)` when the header was fully read, and a
/// corruption error when the stream ends partway through the header.
fn read_header_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                if filled == 0 {
                    return Ok(false);
                }
                return Err(SpillError::PageCorruption(format!(
                    "truncated run header: expected {} bytes, got {}",
                    buf.len(),
                    filled
                )));
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(SpillError::Io(e)),
        }
    }
    Ok(true)
}
