//! Per-class field layouts for the ELF header and program-header entries.
//!
//! ELF32 and ELF64 store the same fields at different offsets and widths.
//! Both layouts are spelled out here side by side; the rest of the crate
//! only ever asks a [`ClassLayout`] where a field lives.
//!
//! | Field         | ELF32 offset | width | ELF64 offset | width |
//! |---------------|--------------|-------|--------------|-------|
//! | `e_phoff`     | 28           | 4     | 32           | 8     |
//! | `e_phentsize` | 42           | 2     | 54           | 2     |
//! | `e_phnum`     | 44           | 2     | 56           | 2     |
//! | `p_type`      | +0           | 4     | +0           | 4     |
//! | `p_flags`     | +24          | 4     | +4           | 4     |
//! | `p_offset`    | +4           | 4     | +8           | 8     |
//! | `p_vaddr`     | +8           | 4     | +16          | 8     |
//! | `p_filesz`    | +16          | 4     | +32          | 8     |
//! | `p_memsz`     | +20          | 4     | +40          | 8     |
//! | `p_align`     | +28          | 4     | +48          | 8     |

use crate::header::{ElfClass, le_u16, le_u32, le_u64, put_le_u16, put_le_u32, put_le_u64};

/// Width of an on-disk integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    /// 2 bytes.
    U16,
    /// 4 bytes.
    U32,
    /// 8 bytes.
    U64,
}

impl FieldWidth {
    /// Size of the field in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
        }
    }

    /// Largest value the field can hold.
    #[must_use]
    pub const fn max_value(self) -> u64 {
        match self {
            Self::U16 => u16::MAX as u64,
            Self::U32 => u32::MAX as u64,
            Self::U64 => u64::MAX,
        }
    }
}

/// A little-endian integer field at a fixed offset from some base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Byte offset relative to the start of the containing structure.
    pub offset: usize,
    /// On-disk width.
    pub width: FieldWidth,
}

impl Field {
    const fn new(offset: usize, width: FieldWidth) -> Self {
        Self { offset, width }
    }

    /// Offset one past the last byte of the field.
    #[must_use]
    pub const fn end(self) -> usize {
        self.offset + self.width.bytes()
    }

    /// Reads the field of the structure starting at `base`, widened to `u64`.
    ///
    /// # Panics
    ///
    /// Panics if the field extends past the end of `data`.
    #[must_use]
    pub fn read(self, data: &[u8], base: usize) -> u64 {
        let at = base + self.offset;
        match self.width {
            FieldWidth::U16 => u64::from(le_u16(data, at)),
            FieldWidth::U32 => u64::from(le_u32(data, at)),
            FieldWidth::U64 => le_u64(data, at),
        }
    }

    /// Writes `value` into the field of the structure starting at `base`.
    ///
    /// Bytes outside the field are never touched. Callers must check
    /// `value <= self.width.max_value()` first.
    ///
    /// # Panics
    ///
    /// Panics if the field extends past the end of `data`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "callers range-check against FieldWidth::max_value"
    )]
    pub fn write(self, data: &mut [u8], base: usize, value: u64) {
        debug_assert!(value <= self.width.max_value());
        let at = base + self.offset;
        match self.width {
            FieldWidth::U16 => put_le_u16(data, at, value as u16),
            FieldWidth::U32 => put_le_u32(data, at, value as u32),
            FieldWidth::U64 => put_le_u64(data, at, value),
        }
    }
}

/// Where each field of interest lives for one ELF class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassLayout {
    /// The class this layout describes.
    pub class: ElfClass,
    /// `e_phoff`: file offset of the program-header table.
    pub e_phoff: Field,
    /// `e_phentsize`: size of one program-header entry.
    pub e_phentsize: Field,
    /// `e_phnum`: number of program-header entries.
    pub e_phnum: Field,
    /// Size of a standard program-header entry; `e_phentsize` may not be smaller.
    pub phdr_size: usize,
    /// `p_type`.
    pub p_type: Field,
    /// `p_flags`.
    pub p_flags: Field,
    /// `p_offset`.
    pub p_offset: Field,
    /// `p_vaddr`.
    pub p_vaddr: Field,
    /// `p_filesz`.
    pub p_filesz: Field,
    /// `p_memsz`.
    pub p_memsz: Field,
    /// `p_align`.
    pub p_align: Field,
}

/// `Elf32_Ehdr` / `Elf32_Phdr` layout.
pub const ELF32_LAYOUT: ClassLayout = ClassLayout {
    class: ElfClass::Elf32,
    e_phoff: Field::new(28, FieldWidth::U32),
    e_phentsize: Field::new(42, FieldWidth::U16),
    e_phnum: Field::new(44, FieldWidth::U16),
    phdr_size: 32,
    p_type: Field::new(0, FieldWidth::U32),
    p_flags: Field::new(24, FieldWidth::U32),
    p_offset: Field::new(4, FieldWidth::U32),
    p_vaddr: Field::new(8, FieldWidth::U32),
    p_filesz: Field::new(16, FieldWidth::U32),
    p_memsz: Field::new(20, FieldWidth::U32),
    p_align: Field::new(28, FieldWidth::U32),
};

/// `Elf64_Ehdr` / `Elf64_Phdr` layout.
pub const ELF64_LAYOUT: ClassLayout = ClassLayout {
    class: ElfClass::Elf64,
    e_phoff: Field::new(32, FieldWidth::U64),
    e_phentsize: Field::new(54, FieldWidth::U16),
    e_phnum: Field::new(56, FieldWidth::U16),
    phdr_size: 56,
    p_type: Field::new(0, FieldWidth::U32),
    p_flags: Field::new(4, FieldWidth::U32),
    p_offset: Field::new(8, FieldWidth::U64),
    p_vaddr: Field::new(16, FieldWidth::U64),
    p_filesz: Field::new(32, FieldWidth::U64),
    p_memsz: Field::new(40, FieldWidth::U64),
    p_align: Field::new(48, FieldWidth::U64),
};

impl ClassLayout {
    /// Selects the layout for `class`.
    #[must_use]
    pub const fn for_class(class: ElfClass) -> &'static Self {
        match class {
            ElfClass::Elf32 => &ELF32_LAYOUT,
            ElfClass::Elf64 => &ELF64_LAYOUT,
        }
    }

    /// Bytes of the ELF header that must be present to locate the table.
    #[must_use]
    pub const fn header_extent(&self) -> usize {
        self.e_phnum.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phdr_fields(layout: &ClassLayout) -> [Field; 7] {
        [
            layout.p_type,
            layout.p_flags,
            layout.p_offset,
            layout.p_vaddr,
            layout.p_filesz,
            layout.p_memsz,
            layout.p_align,
        ]
    }

    #[test]
    fn phdr_fields_fit_in_entry() {
        for layout in [&ELF32_LAYOUT, &ELF64_LAYOUT] {
            for field in phdr_fields(layout) {
                assert!(field.end() <= layout.phdr_size, "{field:?} in {:?}", layout.class);
            }
        }
    }

    #[test]
    fn phdr_fields_do_not_overlap() {
        for layout in [&ELF32_LAYOUT, &ELF64_LAYOUT] {
            let mut covered = [false; 64];
            for field in phdr_fields(layout) {
                for byte in field.offset..field.end() {
                    assert!(!covered[byte], "overlap at {byte} in {:?}", layout.class);
                    covered[byte] = true;
                }
            }
        }
    }

    #[test]
    fn p_align_position_per_class() {
        assert_eq!(ELF32_LAYOUT.p_align, Field::new(28, FieldWidth::U32));
        assert_eq!(ELF64_LAYOUT.p_align, Field::new(48, FieldWidth::U64));
        assert_eq!(ELF32_LAYOUT.header_extent(), 46);
        assert_eq!(ELF64_LAYOUT.header_extent(), 58);
    }

    #[test]
    fn for_class_selects_matching_table() {
        assert_eq!(ClassLayout::for_class(ElfClass::Elf32).class, ElfClass::Elf32);
        assert_eq!(ClassLayout::for_class(ElfClass::Elf64).class, ElfClass::Elf64);
    }

    #[test]
    fn write_touches_only_the_field() {
        let mut buf = [0xaau8; 16];
        Field::new(4, FieldWidth::U32).write(&mut buf, 2, 0x4000);
        assert_eq!(&buf[..6], &[0xaa; 6]);
        assert_eq!(&buf[6..10], &[0x00, 0x40, 0x00, 0x00]);
        assert_eq!(&buf[10..], &[0xaa; 6]);
        assert_eq!(Field::new(4, FieldWidth::U32).read(&buf, 2), 0x4000);
    }
}
