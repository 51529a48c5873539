// Patch application: replay delta records against a target that initially
// holds the reference content, mutating it in place.
//
// Skips are relative forward seeks (the skipped ranges are already correct
// in the target); literals overwrite at the cursor. After the last record
// the target is truncated to the cursor, since the delta has no record kind
// for "delete the remainder".

use std::io::{Read, SeekFrom};

use crate::engine::SeekTarget;
use crate::error::Result;
use crate::format::{BLOCK_SIZE, DeltaReader};

/// Statistics returned by `apply_patch()`.
#[derive(Debug, Clone, Default)]
pub struct PatchStats {
    /// Final target length in bytes.
    pub output_len: u64,
    /// Bytes carried over from the reference content.
    pub skipped_bytes: u64,
    /// Bytes overwritten from literal data.
    pub literal_bytes: u64,
    /// Records applied.
    pub records: u64,
}

/// Apply `delta` to `target` in place. On return the target holds exactly
/// the stream the delta was encoded from.
pub fn apply_patch<R: Read, T: SeekTarget>(delta: R, target: &mut T) -> Result<PatchStats> {
    let mut reader = DeltaReader::new(delta)?;
    let mut buf = vec![0u8; BLOCK_SIZE];
    let mut stats = PatchStats::default();

    let mut cursor = target.seek(SeekFrom::Start(0))?;

    while let Some(head) = reader.next_head()? {
        cursor = target.seek(SeekFrom::Current(i64::from(head.skip)))?;
        stats.skipped_bytes += u64::from(head.skip);

        let len = head.literal_len as usize;
        if len > 0 {
            reader.read_literal(len, &mut buf)?;
            target.write_all(&buf[..len])?;
            cursor += len as u64;
            stats.literal_bytes += len as u64;
        }
        stats.records += 1;
    }

    // The new content may be shorter than the reference content.
    target.truncate(cursor)?;
    target.flush()?;
    stats.output_len = cursor;

    log::debug!(
        "patch: {} bytes out, {} skipped, {} literal, {} records",
        stats.output_len,
        stats.skipped_bytes,
        stats.literal_bytes,
        stats.records
    );
    Ok(stats)
}
