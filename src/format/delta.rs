// Delta stream format: magic, then zero or more
// `(skip: u32 LE, literal_len: u32 LE, literal bytes)` records.
//
// There is no record count or terminator; the stream ends when the 4-byte
// skip field of the next record cannot be read at all. A partially read skip
// field is truncation, not end-of-stream.

use std::io::{self, Read, Write};

use crate::error::{Error, Result};
use crate::format::{BLOCK_SIZE, MAGIC_DELTA};

// ---------------------------------------------------------------------------
// Write path
// ---------------------------------------------------------------------------

pub fn write_magic<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(MAGIC_DELTA)
}

/// Emit one `(skip, literal)` record. The all-zero record is a no-op and is
/// suppressed entirely.
pub fn write_record<W: Write>(w: &mut W, skip: u32, literal: &[u8]) -> io::Result<()> {
    if skip == 0 && literal.is_empty() {
        return Ok(());
    }
    w.write_all(&skip.to_le_bytes())?;
    w.write_all(&(literal.len() as u32).to_le_bytes())?;
    if !literal.is_empty() {
        w.write_all(literal)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read path
// ---------------------------------------------------------------------------

/// Header fields of one delta record; the literal bytes (if any) are read
/// separately into a caller-supplied buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHead {
    pub skip: u32,
    pub literal_len: u32,
}

/// Streaming delta record reader.
#[derive(Debug)]
pub struct DeltaReader<R> {
    reader: R,
}

impl<R: Read> DeltaReader<R> {
    /// Validate the magic header.
    pub fn new(mut reader: R) -> Result<Self> {
        let mut magic = vec![0u8; MAGIC_DELTA.len()];
        let n = read_up_to(&mut reader, &mut magic)?;
        if n != MAGIC_DELTA.len() || magic != MAGIC_DELTA {
            return Err(Error::CorruptDelta("bad magic header".into()));
        }
        Ok(Self { reader })
    }

    /// Read the next record head. `Ok(None)` on clean end-of-stream (the
    /// skip field could not be read at all).
    pub fn next_head(&mut self) -> Result<Option<RecordHead>> {
        let mut skip_buf = [0u8; 4];
        match read_up_to(&mut self.reader, &mut skip_buf)? {
            0 => return Ok(None),
            4 => {}
            _ => return Err(Error::TruncatedInput { what: "record skip field" }),
        }
        let skip = u32::from_le_bytes(skip_buf);

        let mut len_buf = [0u8; 4];
        if read_up_to(&mut self.reader, &mut len_buf)? != 4 {
            return Err(Error::TruncatedInput { what: "record length field" });
        }
        let literal_len = u32::from_le_bytes(len_buf);

        // Sanity bound, not a protocol limit: no encoder emits a literal
        // longer than one block.
        if literal_len as usize > BLOCK_SIZE {
            return Err(Error::CorruptDelta(format!(
                "literal length {literal_len} exceeds the block size {BLOCK_SIZE}"
            )));
        }

        Ok(Some(RecordHead { skip, literal_len }))
    }

    /// Read a record's literal bytes into `buf[..len]`.
    pub fn read_literal(&mut self, len: usize, buf: &mut [u8]) -> Result<()> {
        if read_up_to(&mut self.reader, &mut buf[..len])? != len {
            return Err(Error::TruncatedInput { what: "record literal" });
        }
        Ok(())
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
