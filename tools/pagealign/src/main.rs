//! ELF page-alignment tool.
//!
//! Sets `p_align` of every `PT_LOAD` program header in an ELF shared object
//! or executable to a target alignment (16384 by default, for 16 KiB page
//! devices) and writes the result. Every other byte is copied unchanged.
//!
//! Usage:
//!   pagealign <INPUT> <OUTPUT>          - realign to 16384 bytes
//!   pagealign -a 0x10000 <IN> <OUT>     - realign to another power of two
//!   pagealign --check <INPUT>           - report only, exit 1 if misaligned

mod cli;
mod config;
mod output;
mod report;
mod verbose;

use std::io::ErrorKind as IoErrorKind;
use std::path::Path;
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use clap::error::ErrorKind;

use crate::verbose::{Timer, dprintln, vprintln};

fn main() -> Result<()> {
    let cli = parse_args();
    verbose::init(cli.quiet, cli.verbose);

    let config = cli
        .config
        .as_deref()
        .map(config::Config::load)
        .transpose()?;
    let alignment = config::resolve_alignment(cli.alignment, config.as_ref())?;
    vprintln!("Target alignment: {alignment} bytes");

    let image = read_input(&cli.input)?;

    if cli.check {
        return cmd_check(&cli.input, &image, alignment);
    }
    let output = cli.output.as_deref().context("no output path given")?;
    cmd_align(&cli.input, output, image, alignment)
}

/// Parse the command line. Usage errors exit 1 like every other failure;
/// `--help` and `--version` keep clap's behaviour.
fn parse_args() -> cli::Cli {
    match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    }
}

/// Read the whole input image.
fn read_input(path: &Path) -> Result<Vec<u8>> {
    let _t = Timer::start("read");
    match std::fs::read(path) {
        Ok(image) => Ok(image),
        Err(e) if e.kind() == IoErrorKind::NotFound => {
            bail!("input file does not exist: {}", path.display())
        }
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

/// Realign `image` and write it to `output`.
fn cmd_align(input: &Path, output: &Path, image: Vec<u8>, alignment: u64) -> Result<()> {
    let inspection = report::inspect(input, &image)?;
    report::print_header(input, &inspection);
    report::warn_byte_order(input, &inspection);
    report::warn_incongruent(input, &inspection, alignment);

    let (image, updated) = {
        let _t = Timer::start("realign");
        pagealign_elf::realign(image, alignment).map_err(|e| report::elf_error(input, e))?
    };
    report::print_transitions(&inspection, alignment);

    {
        let _t = Timer::start("write");
        output::write_atomic(output, &image)?;
    }

    dprintln!(
        "Aligned {updated} PT_LOAD segment(s) in {} to {alignment} bytes -> {}",
        input.display(),
        output.display()
    );
    Ok(())
}

/// Report whether every `PT_LOAD` segment already has `alignment`.
fn cmd_check(input: &Path, image: &[u8], alignment: u64) -> Result<()> {
    let inspection = report::inspect(input, image)?;
    report::print_header(input, &inspection);
    report::warn_byte_order(input, &inspection);
    report::print_check(input, &inspection, alignment);

    let total = inspection.loads.len();
    let misaligned = inspection
        .loads
        .iter()
        .filter(|s| !s.is_aligned_to(alignment))
        .count();
    if misaligned > 0 {
        bail!(
            "{}: {misaligned} of {total} PT_LOAD segment(s) not aligned to {alignment} bytes",
            input.display()
        );
    }

    dprintln!(
        "{}: all {total} PT_LOAD segment(s) aligned to {alignment} bytes",
        input.display()
    );
    Ok(())
}
