//! Segment reports and warnings.

use std::path::Path;

use anyhow::{Result, anyhow};
use pagealign_elf::{ByteOrder, ElfError, ElfIdent, ProgramHeader, ProgramHeaderTable};

use crate::verbose::{dprintln, vprintln, vwarn};

/// What the tool learned about an image before touching it.
pub struct Inspection {
    /// Parsed identification bytes.
    pub ident: ElfIdent,
    /// Location of the program-header table.
    pub table: ProgramHeaderTable,
    /// `PT_LOAD` entries as they were read.
    pub loads: Vec<ProgramHeader>,
}

/// Attach the image path to a library error.
pub fn elf_error(path: &Path, e: ElfError) -> anyhow::Error {
    anyhow!("{}: {e}", path.display())
}

/// Identify `image` and collect its `PT_LOAD` entries.
pub fn inspect(path: &Path, image: &[u8]) -> Result<Inspection> {
    let ident = ElfIdent::parse(image).map_err(|e| elf_error(path, e))?;
    let table = ProgramHeaderTable::locate(image, ident).map_err(|e| elf_error(path, e))?;
    let loads = table.load_segments(image).collect();
    Ok(Inspection {
        ident,
        table,
        loads,
    })
}

/// One-line summary of the table, verbose only.
pub fn print_header(path: &Path, inspection: &Inspection) {
    let table = &inspection.table;
    vprintln!(
        "{}: {}, {} program header(s) at {:#x}, {} bytes each, {} PT_LOAD",
        path.display(),
        inspection.ident.class,
        table.len(),
        table.offset(),
        table.entry_size(),
        inspection.loads.len(),
    );
}

/// Warn when `EI_DATA` disagrees with the little-endian field access.
pub fn warn_byte_order(path: &Path, inspection: &Inspection) {
    match inspection.ident.byte_order {
        ByteOrder::Little => {}
        ByteOrder::Big => vwarn!(
            "{}: EI_DATA claims big-endian; fields are read and written little-endian",
            path.display()
        ),
        ByteOrder::Unknown(byte) => vwarn!(
            "{}: unknown EI_DATA encoding {byte}; fields are read and written little-endian",
            path.display()
        ),
    }
}

/// Warn about segments the loader cannot map at `alignment` even after
/// `p_align` is rewritten.
pub fn warn_incongruent(path: &Path, inspection: &Inspection, alignment: u64) {
    for seg in inspection.loads.iter().filter(|s| !s.is_congruent(alignment)) {
        vwarn!(
            "{}: PT_LOAD #{} has p_vaddr {:#x} and p_offset {:#x}, not congruent modulo {alignment}",
            path.display(),
            seg.index,
            seg.p_vaddr,
            seg.p_offset,
        );
    }
}

fn table_heading() {
    vprintln!(
        "  {:>3}  {:>12}  {:>12}  {:>10}  {:>8}",
        "idx",
        "offset",
        "vaddr",
        "filesz",
        "align"
    );
}

/// Per-segment old -> new alignment table, verbose only.
pub fn print_transitions(inspection: &Inspection, alignment: u64) {
    if inspection.loads.is_empty() {
        return;
    }
    table_heading();
    for seg in &inspection.loads {
        let marker = if seg.is_aligned_to(alignment) { "" } else { " *" };
        vprintln!(
            "  {:>3}  {:>#12x}  {:>#12x}  {:>#10x}  {:>8} -> {alignment}{marker}",
            seg.index,
            seg.p_offset,
            seg.p_vaddr,
            seg.p_filesz,
            seg.p_align,
        );
    }
}

/// Per-segment check results at default verbosity.
pub fn print_check(path: &Path, inspection: &Inspection, alignment: u64) {
    for seg in &inspection.loads {
        let status = if seg.is_aligned_to(alignment) {
            "ok"
        } else {
            "MISALIGNED"
        };
        dprintln!(
            "{}: PT_LOAD #{} vaddr {:#x} p_align {} {status}",
            path.display(),
            seg.index,
            seg.p_vaddr,
            seg.p_align,
        );
    }
}
