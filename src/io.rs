// File-level helpers for the four engines.
//
// Resolves paths (or `None` = the appropriate standard stream) to buffered
// readers/writers and runs the corresponding engine. The CLI layer calls
// these; the engines themselves never open files.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::engine::{
    DeltaStats, PatchStats, ReverseStats, SignatureStats, apply_patch, build_signature,
    encode_delta, generate_reverse_delta,
};
use crate::error::Result;

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

fn open_input(path: Option<&Path>) -> io::Result<Box<dyn Read>> {
    Ok(match path {
        Some(path) => Box::new(BufReader::with_capacity(BUF_SIZE, File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    })
}

fn create_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::with_capacity(BUF_SIZE, File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

/// Generate a signature of `input` (default stdin) into `signature`
/// (default stdout).
pub fn signature_file(input: Option<&Path>, signature: Option<&Path>) -> Result<SignatureStats> {
    let input = open_input(input)?;
    let mut output = create_output(signature)?;
    let stats = build_signature(input, &mut output)?;
    output.flush()?;
    Ok(stats)
}

/// Encode a delta of the new file `input` against `signature` (default
/// stdin) into `delta` (default stdout). The new file must be a real path;
/// only the signature may arrive on a pipe.
pub fn delta_file(
    input: &Path,
    signature: Option<&Path>,
    delta: Option<&Path>,
) -> Result<DeltaStats> {
    let input = BufReader::with_capacity(BUF_SIZE, File::open(input)?);
    let signature = open_input(signature)?;
    let mut output = create_output(delta)?;
    let stats = encode_delta(input, signature, &mut output)?;
    output.flush()?;
    Ok(stats)
}

/// Apply `delta` (default stdin) to `target` in place.
pub fn patch_file(target: &Path, delta: Option<&Path>) -> Result<PatchStats> {
    let delta = open_input(delta)?;
    let mut target = OpenOptions::new().write(true).create(true).open(target)?;
    apply_patch(delta, &mut target)
}

/// Generate a reverse delta from the pre-patch `target` and the forward
/// `delta` (default stdin) into `reverse` (default stdout). The target is
/// opened read-only and must not have been patched yet.
pub fn reverse_delta_file(
    target: &Path,
    delta: Option<&Path>,
    reverse: Option<&Path>,
) -> Result<ReverseStats> {
    let mut target = BufReader::with_capacity(BUF_SIZE, File::open(target)?);
    let delta = open_input(delta)?;
    let mut output = create_output(reverse)?;
    let stats = generate_reverse_delta(&mut target, delta, &mut output)?;
    output.flush()?;
    Ok(stats)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp_file(name: &str, data: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join("blocksync_io_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    fn cleanup_temp_files(paths: &[&Path]) {
        for p in paths {
            let _ = std::fs::remove_file(p);
        }
    }

    #[test]
    fn file_pipeline_roundtrip() {
        let old_data: Vec<u8> = (0..40_000u32).map(|i| (i % 251) as u8).collect();
        let mut new_data = old_data.clone();
        new_data.truncate(30_000);
        new_data.extend_from_slice(b"fresh tail bytes");

        let old_path = write_temp_file("old.bin", &old_data);
        let sig_path = write_temp_file("old.sig", b"");
        let new_path = write_temp_file("new.bin", &new_data);
        let delta_path = write_temp_file("fwd.delta", b"");
        let rev_path = write_temp_file("rev.delta", b"");
        let work_path = write_temp_file("work.bin", &old_data);

        let sig_stats = signature_file(Some(&old_path), Some(&sig_path)).unwrap();
        assert_eq!(sig_stats.input_len, old_data.len() as u64);

        let delta_stats = delta_file(&new_path, Some(&sig_path), Some(&delta_path)).unwrap();
        assert_eq!(delta_stats.input_len, new_data.len() as u64);

        // Reverse delta is generated from the still-unpatched copy.
        let rev_stats =
            reverse_delta_file(&work_path, Some(&delta_path), Some(&rev_path)).unwrap();
        assert_eq!(rev_stats.reference_len, old_data.len() as u64);

        let patch_stats = patch_file(&work_path, Some(&delta_path)).unwrap();
        assert_eq!(patch_stats.output_len, new_data.len() as u64);
        assert_eq!(std::fs::read(&work_path).unwrap(), new_data);

        patch_file(&work_path, Some(&rev_path)).unwrap();
        assert_eq!(std::fs::read(&work_path).unwrap(), old_data);

        cleanup_temp_files(&[
            &old_path,
            &sig_path,
            &new_path,
            &delta_path,
            &rev_path,
            &work_path,
        ]);
    }

    #[test]
    fn missing_input_file_propagates_io_error() {
        let err = delta_file(Path::new("/nonexistent/blocksync-in"), None, None).unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }
}
