// Command-line interface for blocksync.
//
// Thin glue only: resolves paths, invokes the engines through the file-level
// helpers, and maps failures to a non-zero exit code. No file content is
// validated here.

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::io::{delta_file, patch_file, reverse_delta_file, signature_file};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Block-aligned binary delta toolkit.
#[derive(Parser, Debug)]
#[command(
    name = "blocksync",
    version,
    about = "Block-aligned binary delta toolkit: signatures, deltas, in-place patching, reverse deltas",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Generate a signature of a reference file.
    #[command(visible_alias = "sig")]
    Signature {
        /// Reference file (default: stdin).
        #[arg(value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,

        /// Signature output file (default: stdout).
        #[arg(value_hint = ValueHint::FilePath)]
        signature: Option<PathBuf>,
    },

    /// Encode a delta of a new file against a reference signature.
    Delta {
        /// New file to encode.
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,

        /// Reference signature file (default: stdin).
        #[arg(value_hint = ValueHint::FilePath)]
        signature: Option<PathBuf>,

        /// Delta output file (default: stdout).
        #[arg(value_hint = ValueHint::FilePath)]
        delta: Option<PathBuf>,
    },

    /// Apply a delta to a target file in place.
    Patch {
        /// Target file holding the reference content; patched in place.
        #[arg(value_hint = ValueHint::FilePath)]
        target: PathBuf,

        /// Delta input file (default: stdin).
        #[arg(value_hint = ValueHint::FilePath)]
        delta: Option<PathBuf>,
    },

    /// Generate a reverse delta that undoes a forward delta.
    ///
    /// The target must still hold the pre-patch content.
    #[command(name = "reverse-delta", visible_alias = "rev")]
    ReverseDelta {
        /// Target file still holding the pre-patch content (read-only).
        #[arg(value_hint = ValueHint::FilePath)]
        target: PathBuf,

        /// Forward delta input file (default: stdin).
        #[arg(value_hint = ValueHint::FilePath)]
        delta: Option<PathBuf>,

        /// Reverse delta output file (default: stdout).
        #[arg(value_hint = ValueHint::FilePath)]
        reverse_delta: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

struct OutputOptions {
    quiet: bool,
    verbose: u8,
    json_output: bool,
}

fn cmd_signature(
    input: Option<&PathBuf>,
    signature: Option<&PathBuf>,
    out: &OutputOptions,
) -> i32 {
    match signature_file(input.map(|p| p.as_path()), signature.map(|p| p.as_path())) {
        Ok(stats) => {
            if out.verbose > 0 && !out.quiet {
                eprintln!(
                    "blocksync: signature: {} bytes in, {} blocks",
                    stats.input_len, stats.blocks
                );
            }
            if out.json_output {
                let json = serde_json::json!({
                    "command": "signature",
                    "input_len": stats.input_len,
                    "blocks": stats.blocks,
                });
                eprintln!("{json:#}");
            }
            0
        }
        Err(e) => {
            eprintln!("blocksync: signature: {e}");
            1
        }
    }
}

fn cmd_delta(
    input: &PathBuf,
    signature: Option<&PathBuf>,
    delta: Option<&PathBuf>,
    out: &OutputOptions,
) -> i32 {
    match delta_file(
        input,
        signature.map(|p| p.as_path()),
        delta.map(|p| p.as_path()),
    ) {
        Ok(stats) => {
            if out.verbose > 0 && !out.quiet {
                eprintln!(
                    "blocksync: delta: {} bytes in, {} matched, {} literal, {} records",
                    stats.input_len, stats.matched_bytes, stats.literal_bytes, stats.records
                );
            }
            if out.json_output {
                let json = serde_json::json!({
                    "command": "delta",
                    "input_len": stats.input_len,
                    "matched_bytes": stats.matched_bytes,
                    "literal_bytes": stats.literal_bytes,
                    "records": stats.records,
                });
                eprintln!("{json:#}");
            }
            0
        }
        Err(e) => {
            eprintln!("blocksync: delta: {e}");
            1
        }
    }
}

fn cmd_patch(target: &PathBuf, delta: Option<&PathBuf>, out: &OutputOptions) -> i32 {
    match patch_file(target, delta.map(|p| p.as_path())) {
        Ok(stats) => {
            if out.verbose > 0 && !out.quiet {
                eprintln!(
                    "blocksync: patch: {} bytes out, {} skipped, {} literal, {} records",
                    stats.output_len, stats.skipped_bytes, stats.literal_bytes, stats.records
                );
            }
            if out.json_output {
                let json = serde_json::json!({
                    "command": "patch",
                    "output_len": stats.output_len,
                    "skipped_bytes": stats.skipped_bytes,
                    "literal_bytes": stats.literal_bytes,
                    "records": stats.records,
                });
                eprintln!("{json:#}");
            }
            0
        }
        Err(e) => {
            eprintln!("blocksync: patch: {e}");
            1
        }
    }
}

fn cmd_reverse_delta(
    target: &PathBuf,
    delta: Option<&PathBuf>,
    reverse: Option<&PathBuf>,
    out: &OutputOptions,
) -> i32 {
    match reverse_delta_file(
        target,
        delta.map(|p| p.as_path()),
        reverse.map(|p| p.as_path()),
    ) {
        Ok(stats) => {
            if out.verbose > 0 && !out.quiet {
                eprintln!(
                    "blocksync: reverse-delta: {} reference bytes, {} captured, {} records",
                    stats.reference_len, stats.captured_bytes, stats.records
                );
            }
            if out.json_output {
                let json = serde_json::json!({
                    "command": "reverse-delta",
                    "reference_len": stats.reference_len,
                    "captured_bytes": stats.captured_bytes,
                    "records": stats.records,
                });
                eprintln!("{json:#}");
            }
            0
        }
        Err(e) => {
            eprintln!("blocksync: reverse-delta: {e}");
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let out = OutputOptions {
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
    };

    let exit_code = match &cli.command {
        Cmd::Signature { input, signature } => {
            cmd_signature(input.as_ref(), signature.as_ref(), &out)
        }
        Cmd::Delta {
            input,
            signature,
            delta,
        } => cmd_delta(input, signature.as_ref(), delta.as_ref(), &out),
        Cmd::Patch { target, delta } => cmd_patch(target, delta.as_ref(), &out),
        Cmd::ReverseDelta {
            target,
            delta,
            reverse_delta,
        } => cmd_reverse_delta(target, delta.as_ref(), reverse_delta.as_ref(), &out),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
