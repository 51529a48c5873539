// Shared error type for the signature/delta formats and the four engines.
//
// Every run either completes or aborts with the first error encountered;
// nothing is retried. I/O failures propagate unchanged from the stream layer.

use std::io;

/// Errors produced while reading or writing signature/delta streams.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying stream failure (file not found, permission, disk full, ...).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The signature stream is malformed: bad magic, an unrecognized
    /// lookahead field size, or a terminal length at or above the block size.
    #[error("corrupt signature: {0}")]
    CorruptSignature(String),

    /// The delta stream is malformed: bad magic, or a literal length
    /// exceeding the block size.
    #[error("corrupt delta: {0}")]
    CorruptDelta(String),

    /// A declared field or literal could not be fully read before
    /// end-of-stream.
    #[error("truncated input while reading {what}")]
    TruncatedInput { what: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
