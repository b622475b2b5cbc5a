//! Synthetic ELF images for unit tests.
//!
//! Images are laid out as: ELF header, program-header table immediately
//! after it, then a fixed payload pattern standing in for segment data.

use crate::header::{ELF_MAGIC, ELFCLASS32, ELFCLASS64, ELFDATA2LSB, ElfClass, put_le_u16};
use crate::layout::ClassLayout;
use crate::phdr::{PT_DYNAMIC, PT_LOAD};

/// Readable.
pub(crate) const PF_R: u32 = 4;

/// Bytes of fake segment data appended after the table.
pub(crate) const PAYLOAD: [u8; 48] = [0xa5; 48];

/// Description of one program-header entry to emit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Segment {
    pub(crate) p_type: u32,
    pub(crate) p_flags: u32,
    pub(crate) p_offset: u64,
    pub(crate) p_vaddr: u64,
    pub(crate) p_filesz: u64,
    pub(crate) p_memsz: u64,
    pub(crate) p_align: u64,
}

impl Segment {
    pub(crate) fn of_type(p_type: u32) -> Self {
        Self {
            p_type,
            p_flags: 0,
            p_offset: 0,
            p_vaddr: 0,
            p_filesz: 0,
            p_memsz: 0,
            p_align: 8,
        }
    }

    pub(crate) fn load(p_align: u64) -> Self {
        Self {
            p_flags: PF_R,
            p_align,
            ..Self::of_type(PT_LOAD)
        }
    }

    pub(crate) fn dynamic() -> Self {
        Self {
            p_offset: 0x2e00,
            p_vaddr: 0x3e00,
            p_filesz: 0x1a0,
            p_memsz: 0x1a0,
            ..Self::of_type(PT_DYNAMIC)
        }
    }

    pub(crate) fn at(self, p_offset: u64, p_vaddr: u64) -> Self {
        Self {
            p_offset,
            p_vaddr,
            ..self
        }
    }

    pub(crate) fn sized(self, p_filesz: u64, p_memsz: u64) -> Self {
        Self {
            p_filesz,
            p_memsz,
            ..self
        }
    }
}

fn header_size(class: ElfClass) -> usize {
    match class {
        ElfClass::Elf32 => 52,
        ElfClass::Elf64 => 64,
    }
}

/// Builds an image whose entries are `entry_size` bytes apart.
pub(crate) fn with_entry_size(class: ElfClass, segments: &[Segment], entry_size: usize) -> Vec<u8> {
    let layout = ClassLayout::for_class(class);
    let phoff = header_size(class);
    let table_end = phoff + segments.len() * entry_size;

    let mut image = vec![0u8; table_end];
    image[..4].copy_from_slice(&ELF_MAGIC);
    image[4] = match class {
        ElfClass::Elf32 => ELFCLASS32,
        ElfClass::Elf64 => ELFCLASS64,
    };
    image[5] = ELFDATA2LSB;
    image[6] = 1; // EV_CURRENT
    put_le_u16(&mut image, 16, 3); // ET_DYN

    layout.e_phoff.write(&mut image, 0, phoff as u64);
    layout.e_phentsize.write(&mut image, 0, entry_size as u64);
    layout.e_phnum.write(&mut image, 0, segments.len() as u64);

    for (i, seg) in segments.iter().enumerate() {
        let base = phoff + i * entry_size;
        layout.p_type.write(&mut image, base, u64::from(seg.p_type));
        layout.p_flags.write(&mut image, base, u64::from(seg.p_flags));
        layout.p_offset.write(&mut image, base, seg.p_offset);
        layout.p_vaddr.write(&mut image, base, seg.p_vaddr);
        layout.p_filesz.write(&mut image, base, seg.p_filesz);
        layout.p_memsz.write(&mut image, base, seg.p_memsz);
        layout.p_align.write(&mut image, base, seg.p_align);
        // Padding beyond the standard entry gets a recognisable filler.
        image[base + layout.phdr_size..base + entry_size].fill(0x5a);
    }

    image.extend_from_slice(&PAYLOAD);
    image
}

/// Builds an ELF32 image with standard 32-byte entries.
pub(crate) fn elf32(segments: &[Segment]) -> Vec<u8> {
    with_entry_size(ElfClass::Elf32, segments, 32)
}

/// Builds an ELF64 image with standard 56-byte entries.
pub(crate) fn elf64(segments: &[Segment]) -> Vec<u8> {
    with_entry_size(ElfClass::Elf64, segments, 56)
}
