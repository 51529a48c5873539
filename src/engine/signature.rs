// Signature generation: one digest per block of the reference stream, then
// the true length of the final short block.

use std::io::{Read, Write};

use crate::chunk::{Chunker, block_digest};
use crate::error::Result;
use crate::format::signature as codec;

/// Statistics returned by `build_signature()`.
#[derive(Debug, Clone)]
pub struct SignatureStats {
    /// Reference stream length in bytes.
    pub input_len: u64,
    /// Number of blocks digested (including the terminal short block).
    pub blocks: u64,
}

/// Stream `input` through the chunker and write its signature to `output`.
///
/// Every signature ends with exactly one digest followed by one trailing
/// length, both describing the same final block; an empty input produces a
/// signature with a single digest and a trailing length of zero.
pub fn build_signature<R: Read, W: Write>(input: R, output: &mut W) -> Result<SignatureStats> {
    codec::write_magic(output)?;

    let mut chunker = Chunker::new(input);
    let mut stats = SignatureStats {
        input_len: 0,
        blocks: 0,
    };

    while let Some(block) = chunker.next_block()? {
        codec::write_digest(output, &block_digest(block.data))?;
        stats.input_len += block.len as u64;
        stats.blocks += 1;

        if block.is_terminal() {
            codec::write_terminal_len(output, block.len as u32)?;
            break;
        }
    }

    log::debug!(
        "signature: {} bytes in, {} blocks",
        stats.input_len,
        stats.blocks
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{BLOCK_SIZE, DIGEST_SIZE, MAGIC_SIG, SignatureReader};
    use std::io::Cursor;

    fn signature_of(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        build_signature(Cursor::new(data), &mut out).unwrap();
        out
    }

    #[test]
    fn empty_input_has_one_digest_and_zero_length() {
        let sig = signature_of(b"");
        assert_eq!(sig.len(), MAGIC_SIG.len() + DIGEST_SIZE + 4);
        assert_eq!(&sig[sig.len() - 4..], &0u32.to_le_bytes());
    }

    #[test]
    fn two_block_input_has_two_digests() {
        let data = vec![3u8; BLOCK_SIZE + 100];
        let sig = signature_of(&data);
        assert_eq!(sig.len(), MAGIC_SIG.len() + 2 * DIGEST_SIZE + 4);
        assert_eq!(&sig[sig.len() - 4..], &100u32.to_le_bytes());
    }

    #[test]
    fn exact_multiple_gets_empty_terminal_entry() {
        let data = vec![1u8; 2 * BLOCK_SIZE];
        let sig = signature_of(&data);
        // Two full-block digests plus the empty terminal block's digest.
        assert_eq!(sig.len(), MAGIC_SIG.len() + 3 * DIGEST_SIZE + 4);
        assert_eq!(&sig[sig.len() - 4..], &0u32.to_le_bytes());
    }

    #[test]
    fn reader_recovers_block_lengths() {
        let data = vec![9u8; BLOCK_SIZE + 7];
        let sig = signature_of(&data);
        let mut reader = SignatureReader::new(Cursor::new(sig)).unwrap();

        let mut total = 0u64;
        while let Some(entry) = reader.next_entry().unwrap() {
            total += entry.len as u64;
        }
        assert_eq!(total, data.len() as u64);
    }

    #[test]
    fn stats_count_blocks_and_bytes() {
        let data = vec![5u8; BLOCK_SIZE + 1];
        let mut out = Vec::new();
        let stats = build_signature(Cursor::new(&data[..]), &mut out).unwrap();
        assert_eq!(stats.input_len, data.len() as u64);
        assert_eq!(stats.blocks, 2);
    }
}
