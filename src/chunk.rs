// Fixed-size block chunking and block digests.
//
// Both signature generation and delta encoding walk their input through the
// same chunker so that hashing is always computed over a full-size,
// zero-padded buffer. The sequence terminates after the first short block,
// which includes a final empty block when the stream length is an exact
// multiple of the block size — every stream yields at least one block.

use std::io::{self, Read};

use sha1::{Digest, Sha1};

use crate::format::{BLOCK_SIZE, DIGEST_SIZE};

// ---------------------------------------------------------------------------
// Chunker
// ---------------------------------------------------------------------------

/// One chunked block: `data` is always the full padded block-size buffer,
/// `len` is the number of bytes actually read (0..=BLOCK_SIZE).
#[derive(Debug)]
pub struct Block<'a> {
    pub data: &'a [u8],
    pub len: usize,
}

impl Block<'_> {
    /// True when this is the stream's terminal (short) block.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.len < BLOCK_SIZE
    }

    /// The real (unpadded) content of the block.
    #[inline]
    pub fn content(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

/// Forward-only block reader over any `Read` source.
///
/// The internal buffer is reused across blocks; `next_block()` lends it out
/// one block at a time.
pub struct Chunker<R> {
    reader: R,
    buf: Vec<u8>,
    done: bool,
}

impl<R: Read> Chunker<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: vec![0u8; BLOCK_SIZE],
            done: false,
        }
    }

    /// Read the next block, zero-padding the tail when fewer than
    /// `BLOCK_SIZE` bytes remain. Returns `None` once the terminal block has
    /// been yielded.
    pub fn next_block(&mut self) -> io::Result<Option<Block<'_>>> {
        if self.done {
            return Ok(None);
        }

        let len = read_full(&mut self.reader, &mut self.buf)?;
        if len < BLOCK_SIZE {
            // Padding must deterministically zero the unused tail so two
            // blocks with equal content hash identically.
            self.buf[len..].fill(0);
            self.done = true;
        }

        Ok(Some(Block {
            data: &self.buf,
            len,
        }))
    }
}

/// Read until `buf` is full or EOF; returns the number of bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

// ---------------------------------------------------------------------------
// Block digest
// ---------------------------------------------------------------------------

/// SHA-1 digest of a padded block buffer.
///
/// Must be applied to the full padded buffer, never to `data[..len]`.
pub fn block_digest(data: &[u8]) -> [u8; DIGEST_SIZE] {
    debug_assert_eq!(data.len(), BLOCK_SIZE);
    let mut hasher = Sha1::new();
    hasher.update(data);
    hasher.finalize().into()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
