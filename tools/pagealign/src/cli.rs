//! Command-line interface definitions for pagealign.

use std::path::PathBuf;

use clap::Parser;

/// Rewrite the alignment of every PT_LOAD segment in an ELF image.
///
/// Defaults to 16384 bytes, the alignment shared libraries need to load on
/// devices with 16 KiB pages.
#[derive(Parser)]
#[command(name = "pagealign", version, about)]
pub struct Cli {
    /// ELF shared object or executable to read.
    pub input: PathBuf,

    /// Where to write the realigned image (may be the same as INPUT).
    #[arg(required_unless_present = "check")]
    pub output: Option<PathBuf>,

    /// Target PT_LOAD alignment in bytes (decimal or 0x-prefixed hex).
    #[arg(long, short = 'a', value_parser = parse_alignment)]
    pub alignment: Option<u64>,

    /// TOML configuration file.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Report PT_LOAD alignment without writing; fail if any segment differs.
    #[arg(long, conflicts_with = "output")]
    pub check: bool,

    /// Print errors only.
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print per-segment details and timings.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Parses a decimal or `0x` hex alignment and requires a power of two.
pub fn parse_alignment(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    }
    .map_err(|e| format!("`{s}` is not a number: {e}"))?;

    pagealign_elf::validate_alignment(value).map_err(|e| e.to_string())
}
