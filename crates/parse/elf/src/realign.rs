//! `PT_LOAD` alignment rewriting.
//!
//! The transformation is pure: it takes an image buffer and an alignment,
//! and rewrites `p_align` of every `PT_LOAD` entry in place. All validation
//! happens before the first write, so a failed call leaves the buffer
//! exactly as it was.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::error::ElfError;
use crate::header::ElfClass;
use crate::phdr::{PT_LOAD, ProgramHeaderTable};

/// Alignment required for 16 KiB page-size compliance.
pub const DEFAULT_ALIGNMENT: u64 = 16384;

/// What a realignment pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealignSummary {
    /// Class of the rewritten image.
    pub class: ElfClass,
    /// Number of `PT_LOAD` entries whose `p_align` was written.
    pub segments_updated: usize,
    /// How many of those previously held a different value.
    pub segments_changed: usize,
}

/// Checks that `alignment` is a non-zero power of two.
///
/// The realignment itself accepts any value that fits the field; callers
/// that take alignments from users should run them through this first.
///
/// # Errors
///
/// [`ElfError::InvalidAlignment`] otherwise.
pub fn validate_alignment(alignment: u64) -> Result<u64, ElfError> {
    if alignment.is_power_of_two() {
        Ok(alignment)
    } else {
        Err(ElfError::InvalidAlignment(alignment))
    }
}

/// Sets `p_align` of every `PT_LOAD` entry in `image` to `alignment`.
///
/// Non-`PT_LOAD` entries, section headers and segment contents are left
/// byte-identical, and the buffer length never changes.
///
/// # Errors
///
/// - [`ElfError::NotAnElfFile`] if the magic does not match.
/// - [`ElfError::UnsupportedElfClass`] if `EI_CLASS` is not 1 or 2.
/// - [`ElfError::TruncatedOrCorruptHeader`] if the program-header table does
///   not fit in `image`.
/// - [`ElfError::InvalidAlignment`] if the table is non-empty and
///   `alignment` does not fit in the class's `p_align` field (ELF32 only).
///
/// On error `image` is unmodified.
pub fn realign_in_place(image: &mut [u8], alignment: u64) -> Result<RealignSummary, ElfError> {
    let table = ProgramHeaderTable::parse(image)?;
    let layout = table.layout();

    if !table.is_empty() && alignment > layout.p_align.width.max_value() {
        return Err(ElfError::InvalidAlignment(alignment));
    }

    let mut summary = RealignSummary {
        class: table.class(),
        segments_updated: 0,
        segments_changed: 0,
    };

    for index in 0..table.len() {
        let base = table.entry_offset(index);
        if layout.p_type.read(image, base) != u64::from(PT_LOAD) {
            continue;
        }
        if layout.p_align.read(image, base) != alignment {
            layout.p_align.write(image, base, alignment);
            summary.segments_changed += 1;
        }
        summary.segments_updated += 1;
    }

    Ok(summary)
}

/// Owned-buffer form of [`realign_in_place`].
///
/// Consumes the image and hands it back together with the number of
/// `PT_LOAD` entries updated.
///
/// # Errors
///
/// Same as [`realign_in_place`]; the buffer is dropped on error.
#[cfg(feature = "alloc")]
pub fn realign(mut image: Vec<u8>, alignment: u64) -> Result<(Vec<u8>, usize), ElfError> {
    let summary = realign_in_place(&mut image, alignment)?;
    Ok((image, summary.segments_updated))
}
