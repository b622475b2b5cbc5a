//! `pagealign-elf` --- a standalone, `no_std` ELF program-header realigner.
//!
//! Locates the program-header table of an ELF32 or ELF64 image and rewrites
//! the `p_align` field of every `PT_LOAD` entry, leaving every other byte of
//! the image untouched. This is what shared objects need to load on systems
//! with 16 KiB pages.
//!
//! Only the program-header table is ever touched. Sections, symbols,
//! relocations and dynamic entries are not parsed.
//!
//! # Usage
//!
//! ```ignore
//! let image = std::fs::read("libwallet.so")?;
//! let (image, updated) = pagealign_elf::realign(image, pagealign_elf::DEFAULT_ALIGNMENT)?;
//! std::fs::write("libwallet-aligned.so", image)?;
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod header;
pub mod layout;
pub mod phdr;
pub mod realign;

#[cfg(test)]
mod fixture;

pub use error::ElfError;
pub use header::{ByteOrder, ElfClass, ElfIdent};
pub use layout::{ClassLayout, ELF32_LAYOUT, ELF64_LAYOUT, Field, FieldWidth};
pub use phdr::{PT_LOAD, ProgramHeader, ProgramHeaderTable, ProgramHeaders, segment_type_name};
#[cfg(feature = "alloc")]
pub use realign::realign;
pub use realign::{DEFAULT_ALIGNMENT, RealignSummary, realign_in_place, validate_alignment};
