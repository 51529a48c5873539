//! Blocksync: block-aligned binary delta toolkit.
//!
//! The crate provides:
//! - Signature generation, delta encoding, in-place patching, and
//!   reverse-delta (rollback) generation (`engine`)
//! - The signature/delta wire formats (`format`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! Matching is block-aligned: a chunk of the new file matches only when its
//! content coincides with the chunk at the same block index of the reference
//! file. There is no rolling-hash resynchronization.
//!
//! # Quick Start
//!
//! ```
//! use std::io::Cursor;
//! use blocksync::engine::{apply_patch, build_signature, encode_delta};
//!
//! let old = b"the old file contents".to_vec();
//! let new = b"the new file contents, somewhat longer".to_vec();
//!
//! let mut signature = Vec::new();
//! build_signature(Cursor::new(&old[..]), &mut signature).unwrap();
//!
//! let mut delta = Vec::new();
//! encode_delta(Cursor::new(&new[..]), Cursor::new(&signature[..]), &mut delta).unwrap();
//!
//! // Patch a copy of the old content in place.
//! let mut target = Cursor::new(old.clone());
//! apply_patch(Cursor::new(&delta[..]), &mut target).unwrap();
//! assert_eq!(target.into_inner(), new);
//! ```

pub mod chunk;
pub mod engine;
pub mod error;
pub mod format;
pub mod io;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
