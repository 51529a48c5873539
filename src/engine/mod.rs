// The four engines: signature generation, delta encoding, patch application,
// reverse-delta generation.
//
// Each engine is a pure function of its input streams: it takes abstract
// readable/writable/seekable capabilities, performs one linear pass, and
// returns a small stats struct. No state is shared between runs.

pub mod delta;
pub mod patch;
pub mod reverse;
pub mod signature;

use std::fs::File;
use std::io::{self, Cursor, Seek, Write};

pub use delta::{DeltaOptions, DeltaStats, encode_delta, encode_delta_with_options};
pub use patch::{PatchStats, apply_patch};
pub use reverse::{ReverseStats, generate_reverse_delta};
pub use signature::{SignatureStats, build_signature};

/// Mutable patch target: in-place writes, forward seeks, and truncation to a
/// final length. Implemented for real files and for in-memory buffers so the
/// patch engine is testable without a filesystem.
pub trait SeekTarget: Write + Seek {
    /// Set the target's length to `len`, extending with zeros if needed.
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl SeekTarget for File {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

impl SeekTarget for Cursor<Vec<u8>> {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.get_mut().resize(len as usize, 0);
        Ok(())
    }
}

impl<T: SeekTarget + ?Sized> SeekTarget for &mut T {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        (**self).truncate(len)
    }
}
