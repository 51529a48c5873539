// Shared wire-format constants for the signature and delta streams.
//
// All fixed-width integers in both formats are 4-byte little-endian.

pub mod delta;
pub mod signature;

/// Block size B. Matching is aligned to multiples of this size; the final
/// block of any stream may be shorter and is zero-padded before hashing.
pub const BLOCK_SIZE: usize = 16 * 1024;

/// Size of a block digest (SHA-1).
pub const DIGEST_SIZE: usize = 20;

/// Magic bytes opening every signature stream.
pub const MAGIC_SIG: &[u8] = b"BSSIG01";

/// Magic bytes opening every delta stream.
pub const MAGIC_DELTA: &[u8] = b"BSDELTA01";

pub use delta::{DeltaReader, write_record};
pub use signature::{SignatureEntry, SignatureReader};
