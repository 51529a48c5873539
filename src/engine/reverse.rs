// Reverse-delta generation: walk the forward delta against a reference
// stream that still holds the pre-patch content and capture the bytes the
// forward patch is about to overwrite.
//
// Each reverse record mirrors a forward record's skip/size framing, but its
// payload is the original reference content at that position. If the forward
// patch truncates a longer reference, the remaining tail is drained into
// skip-0 literal records so the reverse patch can restore it.

use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::Result;
use crate::format::delta as codec;
use crate::format::{BLOCK_SIZE, DeltaReader};

/// Statistics returned by `generate_reverse_delta()`.
#[derive(Debug, Clone, Default)]
pub struct ReverseStats {
    /// Reference (pre-patch) stream length in bytes.
    pub reference_len: u64,
    /// Original bytes captured into the reverse delta.
    pub captured_bytes: u64,
    /// Records written.
    pub records: u64,
}

/// Produce a delta that undoes `delta`.
///
/// `reference` must still hold the pre-patch content; generating a reverse
/// delta from a target the forward patch has already mutated is undefined.
/// Applying the result with the patch engine against the post-patch content
/// restores the pre-patch content exactly, including its original length.
pub fn generate_reverse_delta<T: Read + Seek, R: Read, W: Write>(
    reference: &mut T,
    delta: R,
    out: &mut W,
) -> Result<ReverseStats> {
    let mut reader = DeltaReader::new(delta)?;
    codec::write_magic(out)?;

    let reference_len = reference.seek(SeekFrom::End(0))?;
    let mut pos = reference.seek(SeekFrom::Start(0))?;

    let mut fwd_buf = vec![0u8; BLOCK_SIZE];
    let mut orig_buf = vec![0u8; BLOCK_SIZE];
    let mut stats = ReverseStats {
        reference_len,
        ..Default::default()
    };

    while pos < reference_len {
        let Some(head) = reader.next_head()? else {
            // Forward stream exhausted before the reference end: the patch
            // truncated the reference. Drain the tail as literal records.
            while pos < reference_len {
                let n = ((reference_len - pos) as usize).min(BLOCK_SIZE);
                reference.read_exact(&mut orig_buf[..n])?;
                codec::write_record(out, 0, &orig_buf[..n])?;
                pos += n as u64;
                stats.captured_bytes += n as u64;
                stats.records += 1;
            }
            break;
        };

        // The forward literal itself is not part of the reverse delta, but
        // it must still be consumed from the stream.
        let fwd_len = head.literal_len as usize;
        if fwd_len > 0 {
            reader.read_literal(fwd_len, &mut fwd_buf)?;
        }

        // Clamp the skip so the cursor lands at the reference end at most.
        let skip = u64::from(head.skip).min(reference_len - pos);
        pos = reference.seek(SeekFrom::Current(skip as i64))?;

        // Clamp the capture size to the bytes that actually exist.
        let size = (fwd_len as u64).min(reference_len - pos) as usize;
        if size > 0 {
            reference.read_exact(&mut orig_buf[..size])?;
            pos += size as u64;
        }

        codec::write_record(out, skip as u32, &orig_buf[..size])?;
        if skip != 0 || size != 0 {
            stats.captured_bytes += size as u64;
            stats.records += 1;
        }
    }

    log::debug!(
        "reverse-delta: {} reference bytes, {} captured, {} records",
        stats.reference_len,
        stats.captured_bytes,
        stats.records
    );
    Ok(stats)
}
