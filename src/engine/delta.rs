// Delta encoding: lock-step positional comparison of the new stream against
// a reference signature.
//
// Block i of the input is compared against signature entry i only; there is
// no search across block offsets and no resynchronization after a
// non-block-aligned insertion or deletion. A block matches when its digest
// and its true length both equal the reference entry's.

use std::io::{Read, Write};

use crate::chunk::{Chunker, block_digest};
use crate::error::Result;
use crate::format::delta as codec;
use crate::format::{BLOCK_SIZE, SignatureReader};

/// Configuration for the delta encoder.
#[derive(Debug, Clone)]
pub struct DeltaOptions {
    /// Ceiling for the accumulated skip of a single record. A skip-only
    /// record is forced once the pending skip comes within one block size of
    /// this value, so the next accumulation cannot overflow the 4-byte wire
    /// field. Lowering it does not change the format, only record framing.
    pub max_skip: u32,
}

impl Default for DeltaOptions {
    fn default() -> Self {
        Self { max_skip: u32::MAX }
    }
}

/// Statistics returned by `encode_delta()`.
#[derive(Debug, Clone, Default)]
pub struct DeltaStats {
    /// Input (new file) length in bytes.
    pub input_len: u64,
    /// Bytes carried over from the reference via skips.
    pub matched_bytes: u64,
    /// Bytes emitted as literal data.
    pub literal_bytes: u64,
    /// Records written.
    pub records: u64,
}

/// Encode a delta that transforms the signature's reference stream into
/// `input`, with default options.
pub fn encode_delta<R: Read, S: Read, W: Write>(
    input: R,
    signature: S,
    delta: &mut W,
) -> Result<DeltaStats> {
    encode_delta_with_options(input, signature, delta, &DeltaOptions::default())
}

/// Encode with custom options.
pub fn encode_delta_with_options<R: Read, S: Read, W: Write>(
    input: R,
    signature: S,
    delta: &mut W,
    opts: &DeltaOptions,
) -> Result<DeltaStats> {
    let mut sig = SignatureReader::new(signature)?;
    codec::write_magic(delta)?;

    let mut chunker = Chunker::new(input);
    let mut stats = DeltaStats::default();
    let mut skip: u32 = 0;
    let flush_threshold = opts.max_skip.saturating_sub(BLOCK_SIZE as u32);

    while let Some(block) = chunker.next_block()? {
        // Once the signature is exhausted (all entries consumed), every
        // remaining input block is encoded as literal.
        let entry = sig.next_entry()?;
        stats.input_len += block.len as u64;

        let digest = block_digest(block.data);
        let matches = entry.is_some_and(|e| e.digest == digest && e.len as usize == block.len);

        if matches {
            skip += block.len as u32;
            stats.matched_bytes += block.len as u64;
        } else {
            // Flush the accumulated skip together with this block's literal.
            if skip != 0 || block.len != 0 {
                stats.records += 1;
            }
            codec::write_record(delta, skip, block.content())?;
            stats.literal_bytes += block.len as u64;
            skip = 0;
        }

        // Pending skip is within one block of the ceiling: force a
        // skip-only flush so the next accumulation cannot overflow.
        if skip >= flush_threshold {
            codec::write_record(delta, skip, &[])?;
            stats.records += 1;
            skip = 0;
        }

        if block.is_terminal() {
            // Final flush: the record stream must account for the full
            // reconstructed length.
            if skip != 0 {
                codec::write_record(delta, skip, &[])?;
                stats.records += 1;
            }
            break;
        }
    }

    log::debug!(
        "delta: {} bytes in, {} matched, {} literal, {} records",
        stats.input_len,
        stats.matched_bytes,
        stats.literal_bytes,
        stats.records
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::build_signature;
    use crate::format::{DeltaReader, MAGIC_DELTA};
    use std::io::Cursor;

    fn signature_of(data: &[u8]) -> Vec<u8> {
        let mut sig = Vec::new();
        build_signature(Cursor::new(data), &mut sig).unwrap();
        sig
    }

    fn delta_of(input: &[u8], sig: &[u8]) -> (Vec<u8>, DeltaStats) {
        let mut out = Vec::new();
        let stats = encode_delta(Cursor::new(input), Cursor::new(sig), &mut out).unwrap();
        (out, stats)
    }

    /// Collect `(skip, literal)` pairs from an encoded delta.
    fn records(delta: &[u8]) -> Vec<(u32, Vec<u8>)> {
        let mut reader = DeltaReader::new(Cursor::new(delta)).unwrap();
        let mut out = Vec::new();
        let mut buf = vec![0u8; BLOCK_SIZE];
        while let Some(head) = reader.next_head().unwrap() {
            let len = head.literal_len as usize;
            reader.read_literal(len, &mut buf).unwrap();
            out.push((head.skip, buf[..len].to_vec()));
        }
        out
    }

    #[test]
    fn identical_input_is_one_skip_record() {
        let data = vec![0x42u8; BLOCK_SIZE + 500];
        let sig = signature_of(&data);
        let (delta, stats) = delta_of(&data, &sig);

        assert_eq!(records(&delta), vec![(data.len() as u32, Vec::new())]);
        assert_eq!(delta.len(), MAGIC_DELTA.len() + 8);
        assert_eq!(stats.matched_bytes, data.len() as u64);
        assert_eq!(stats.literal_bytes, 0);
    }

    #[test]
    fn changed_tail_becomes_skip_then_literal() {
        let mut a = vec![0x11u8; BLOCK_SIZE + 600];
        let sig = signature_of(&a);
        let tail = a.len() - 10;
        a[tail..].fill(0x99);
        let (delta, stats) = delta_of(&a, &sig);

        let recs = records(&delta);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].0, BLOCK_SIZE as u32);
        assert_eq!(recs[0].1, a[BLOCK_SIZE..]);
        assert_eq!(stats.matched_bytes, BLOCK_SIZE as u64);
        assert_eq!(stats.literal_bytes, 600);
    }

    #[test]
    fn empty_reference_forces_all_literal() {
        let sig = signature_of(b"");
        let input = vec![0x77u8; BLOCK_SIZE + 3];
        let (delta, stats) = delta_of(&input, &sig);

        let recs = records(&delta);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].0, 0);
        assert_eq!(recs[0].1.len(), BLOCK_SIZE);
        assert_eq!(recs[1].1.len(), 3);
        assert_eq!(stats.literal_bytes, input.len() as u64);
        assert_eq!(stats.matched_bytes, 0);
    }

    #[test]
    fn empty_input_against_any_reference_is_empty_record_stream() {
        let reference = vec![0xEEu8; 3 * BLOCK_SIZE + 17];
        let sig = signature_of(&reference);
        let (delta, stats) = delta_of(b"", &sig);

        assert!(records(&delta).is_empty());
        assert_eq!(delta.len(), MAGIC_DELTA.len());
        assert_eq!(stats.records, 0);
    }

    #[test]
    fn low_skip_ceiling_forces_intermediate_flushes() {
        let data = vec![0xA5u8; 4 * BLOCK_SIZE + 9];
        let sig = signature_of(&data);

        let mut delta = Vec::new();
        let opts = DeltaOptions {
            max_skip: 2 * BLOCK_SIZE as u32,
        };
        encode_delta_with_options(Cursor::new(&data[..]), Cursor::new(&sig[..]), &mut delta, &opts)
            .unwrap();

        let recs = records(&delta);
        assert!(recs.len() > 1, "expected forced skip-only flushes");
        assert!(recs.iter().all(|(_, lit)| lit.is_empty()));
        let total: u64 = recs.iter().map(|(s, _)| *s as u64).sum();
        assert_eq!(total, data.len() as u64);
        assert!(recs.iter().all(|(s, _)| *s < 2 * BLOCK_SIZE as u32));
    }

    #[test]
    fn length_mismatch_defeats_digest_match() {
        // Reference ends exactly at one block; input has the same first
        // block but continues. The terminal entries differ in length, so the
        // input's tail must be literal.
        let reference = vec![0x31u8; BLOCK_SIZE];
        let sig = signature_of(&reference);
        let mut input = reference.clone();
        input.extend_from_slice(&[1, 2, 3, 4]);
        let (delta, _) = delta_of(&input, &sig);

        let recs = records(&delta);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].0, BLOCK_SIZE as u32);
        assert_eq!(recs[0].1, &[1, 2, 3, 4]);
    }
}
