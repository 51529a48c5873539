// Signature stream format: magic, one 20-byte digest per block, terminated
// by one final digest followed by a 4-byte little-endian trailing length.
//
// The format carries no entry count, so a reader cannot know that the entry
// it is looking at is the terminal one until it has seen the field after it.
// `SignatureReader` keeps exactly one raw field of lookahead and classifies
// it by its byte count: 20 bytes is a digest, 4 bytes is the trailing length,
// anything else is corrupt.

use std::io::{self, Read, Write};

use crate::error::{Error, Result};
use crate::format::{BLOCK_SIZE, DIGEST_SIZE, MAGIC_SIG};

// ---------------------------------------------------------------------------
// Write path
// ---------------------------------------------------------------------------

pub fn write_magic<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(MAGIC_SIG)
}

pub fn write_digest<W: Write>(w: &mut W, digest: &[u8; DIGEST_SIZE]) -> io::Result<()> {
    w.write_all(digest)
}

/// Emit the trailing length of the final block (0..BLOCK_SIZE-1).
pub fn write_terminal_len<W: Write>(w: &mut W, len: u32) -> io::Result<()> {
    debug_assert!((len as usize) < BLOCK_SIZE);
    w.write_all(&len.to_le_bytes())
}

// ---------------------------------------------------------------------------
// Read path
// ---------------------------------------------------------------------------

/// One decoded signature entry.
///
/// `len` is the true byte length of the block this entry describes:
/// `BLOCK_SIZE` for every entry except the last, the trailing length
/// (0..BLOCK_SIZE-1) for the terminal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureEntry {
    pub digest: [u8; DIGEST_SIZE],
    pub len: u32,
}

impl SignatureEntry {
    /// True for the last entry of the stream (the short final block).
    #[inline]
    pub fn is_terminal(&self) -> bool {
        (self.len as usize) < BLOCK_SIZE
    }
}

/// Streaming signature reader with one field of lookahead.
///
/// Used internally by the delta encoder; after the terminal entry has been
/// returned, `next_entry()` yields `None` forever, forcing every later input
/// block into literal encoding.
#[derive(Debug)]
pub struct SignatureReader<R> {
    reader: R,
    pending: Option<[u8; DIGEST_SIZE]>,
}

impl<R: Read> SignatureReader<R> {
    /// Validate the magic header and prime the lookahead with the first
    /// field, which must be a digest (every signature holds at least one).
    pub fn new(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; MAGIC_SIG.len()];
        let n = read_up_to(&mut reader, &mut magic)?;
        if n != MAGIC_SIG.len() || magic != *MAGIC_SIG {
            return Err(Error::CorruptSignature("bad magic header".into()));
        }

        let mut field = [0u8; DIGEST_SIZE];
        let n = read_up_to(&mut reader, &mut field)?;
        if n != DIGEST_SIZE {
            return Err(Error::CorruptSignature(format!(
                "expected a {DIGEST_SIZE}-byte digest after the header, got {n} bytes"
            )));
        }

        Ok(Self {
            reader,
            pending: Some(field),
        })
    }

    /// Return the entry for the next block, or `None` once the terminal
    /// entry has been consumed.
    pub fn next_entry(&mut self) -> Result<Option<SignatureEntry>> {
        let Some(digest) = self.pending.take() else {
            return Ok(None);
        };

        // Advance the lookahead; its size tells us whether `digest` belongs
        // to a full block or to the terminal short block.
        let mut field = [0u8; DIGEST_SIZE];
        let n = read_up_to(&mut self.reader, &mut field)?;
        let len = match n {
            DIGEST_SIZE => {
                self.pending = Some(field);
                BLOCK_SIZE as u32
            }
            4 => {
                let len = u32::from_le_bytes([field[0], field[1], field[2], field[3]]);
                if len as usize >= BLOCK_SIZE {
                    return Err(Error::CorruptSignature(format!(
                        "terminal length {len} is not below the block size {BLOCK_SIZE}"
                    )));
                }
                len
            }
            n => {
                return Err(Error::CorruptSignature(format!(
                    "unrecognized field size {n} (expected {DIGEST_SIZE} or 4)"
                )));
            }
        };

        Ok(Some(SignatureEntry { digest, len }))
    }
}

/// Read until `buf` is full or EOF; returns the number of bytes read.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
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
// Tests
// ---------------------------------------------------------------------------
