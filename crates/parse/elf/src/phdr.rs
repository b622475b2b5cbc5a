//! Program-header table access.
//!
//! [`ProgramHeaderTable`] records where the table sits inside an image after
//! checking that every entry is in bounds. It does not borrow the image, so
//! the same geometry can drive a read pass and a later write pass over the
//! same buffer.

use crate::error::ElfError;
use crate::header::{ElfClass, ElfIdent};
use crate::layout::ClassLayout;

// ---------------------------------------------------------------------------
// Segment type constants
// ---------------------------------------------------------------------------

/// Unused entry.
pub const PT_NULL: u32 = 0;

/// Loadable segment.
pub const PT_LOAD: u32 = 1;

/// Dynamic linking information.
pub const PT_DYNAMIC: u32 = 2;

/// Program interpreter path.
pub const PT_INTERP: u32 = 3;

/// Auxiliary information.
pub const PT_NOTE: u32 = 4;

/// The program-header table itself.
pub const PT_PHDR: u32 = 6;

/// Thread-local storage template.
pub const PT_TLS: u32 = 7;

/// `.eh_frame_hdr` location.
pub const PT_GNU_EH_FRAME: u32 = 0x6474_e550;

/// Stack executability.
pub const PT_GNU_STACK: u32 = 0x6474_e551;

/// Read-only after relocation.
pub const PT_GNU_RELRO: u32 = 0x6474_e552;

/// ARM exception index table.
pub const PT_ARM_EXIDX: u32 = 0x7000_0001;

/// Short name for a `p_type` value, as `readelf` prints it.
#[must_use]
pub fn segment_type_name(p_type: u32) -> Option<&'static str> {
    Some(match p_type {
        PT_NULL => "NULL",
        PT_LOAD => "LOAD",
        PT_DYNAMIC => "DYNAMIC",
        PT_INTERP => "INTERP",
        PT_NOTE => "NOTE",
        PT_PHDR => "PHDR",
        PT_TLS => "TLS",
        PT_GNU_EH_FRAME => "GNU_EH_FRAME",
        PT_GNU_STACK => "GNU_STACK",
        PT_GNU_RELRO => "GNU_RELRO",
        PT_ARM_EXIDX => "ARM_EXIDX",
        _ => return None,
    })
}

// ---------------------------------------------------------------------------
// ProgramHeaderTable
// ---------------------------------------------------------------------------

/// Bounds-checked location of the program-header table inside an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramHeaderTable {
    layout: &'static ClassLayout,
    offset: usize,
    entry_size: usize,
    count: usize,
}

impl ProgramHeaderTable {
    /// Identifies `data` and locates its program-header table.
    ///
    /// # Errors
    ///
    /// Any error from [`ElfIdent::parse`] or [`ProgramHeaderTable::locate`].
    pub fn parse(data: &[u8]) -> Result<Self, ElfError> {
        let ident = ElfIdent::parse(data)?;
        Self::locate(data, ident)
    }

    /// Reads `e_phoff`, `e_phentsize` and `e_phnum` and checks the table
    /// fits in `data`.
    ///
    /// An empty table (`e_phnum == 0`) is accepted without looking at the
    /// other two fields.
    ///
    /// # Errors
    ///
    /// [`ElfError::TruncatedOrCorruptHeader`] if the header is cut short,
    /// `e_phentsize` is smaller than a standard entry, or any entry extends
    /// past the end of `data`.
    pub fn locate(data: &[u8], ident: ElfIdent) -> Result<Self, ElfError> {
        let layout = ClassLayout::for_class(ident.class);
        if data.len() < layout.header_extent() {
            return Err(ElfError::TruncatedOrCorruptHeader);
        }

        let count = usize::from(read_u16(layout.e_phnum.read(data, 0)));
        let entry_size = usize::from(read_u16(layout.e_phentsize.read(data, 0)));
        let raw_offset = layout.e_phoff.read(data, 0);

        if count == 0 {
            return Ok(Self {
                layout,
                offset: usize::try_from(raw_offset).unwrap_or(0),
                entry_size,
                count,
            });
        }

        if entry_size < layout.phdr_size {
            return Err(ElfError::TruncatedOrCorruptHeader);
        }
        let offset = usize::try_from(raw_offset).map_err(|_| ElfError::TruncatedOrCorruptHeader)?;
        let end = count
            .checked_mul(entry_size)
            .and_then(|len| offset.checked_add(len))
            .ok_or(ElfError::TruncatedOrCorruptHeader)?;
        if end > data.len() {
            return Err(ElfError::TruncatedOrCorruptHeader);
        }

        Ok(Self {
            layout,
            offset,
            entry_size,
            count,
        })
    }

    /// Class of the image the table was located in.
    #[must_use]
    pub fn class(&self) -> ElfClass {
        self.layout.class
    }

    /// Field layout for this table's class.
    #[must_use]
    pub fn layout(&self) -> &'static ClassLayout {
        self.layout
    }

    /// `e_phoff`.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// `e_phentsize`.
    #[must_use]
    pub fn entry_size(&self) -> usize {
        self.entry_size
    }

    /// `e_phnum`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if `e_phnum == 0`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// File offset of entry `index`. Callers keep `index < len()`.
    pub(crate) fn entry_offset(&self, index: usize) -> usize {
        debug_assert!(index < self.count);
        self.offset + index * self.entry_size
    }

    /// Number of leading entries that lie wholly inside `len` bytes.
    fn entries_within(&self, len: usize) -> usize {
        if self.count == 0 || len < self.offset + self.layout.phdr_size {
            return 0;
        }
        let fit = (len - self.offset - self.layout.phdr_size) / self.entry_size + 1;
        fit.min(self.count)
    }

    /// Iterates over every entry.
    ///
    /// `data` should be the image the table was located in. Entries that do
    /// not fit in a shorter `data` are not yielded.
    #[must_use]
    pub fn iter<'a>(&self, data: &'a [u8]) -> ProgramHeaders<'a> {
        ProgramHeaders {
            data,
            table: *self,
            next: 0,
            end: self.entries_within(data.len()),
        }
    }

    /// Iterates over the `PT_LOAD` entries only.
    pub fn load_segments<'a>(&self, data: &'a [u8]) -> impl Iterator<Item = ProgramHeader> + use<'a> {
        self.iter(data).filter(ProgramHeader::is_load)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value was read from a 2-byte field"
)]
fn read_u16(value: u64) -> u16 {
    value as u16
}

// ---------------------------------------------------------------------------
// ProgramHeader
// ---------------------------------------------------------------------------

/// One decoded program-header entry, widened to 64-bit fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramHeader {
    /// Position in the table.
    pub index: usize,
    /// File offset of the entry itself.
    pub file_offset: usize,
    /// Segment type.
    pub p_type: u32,
    /// Segment permissions.
    pub p_flags: u32,
    /// File offset of the segment contents.
    pub p_offset: u64,
    /// Virtual address of the segment.
    pub p_vaddr: u64,
    /// Bytes of the segment in the file.
    pub p_filesz: u64,
    /// Bytes of the segment in memory.
    pub p_memsz: u64,
    /// Alignment.
    pub p_align: u64,
}

impl ProgramHeader {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "p_type and p_flags are 4-byte fields in both classes"
    )]
    fn read(data: &[u8], table: &ProgramHeaderTable, index: usize) -> Self {
        let layout = table.layout;
        let base = table.entry_offset(index);
        Self {
            index,
            file_offset: base,
            p_type: layout.p_type.read(data, base) as u32,
            p_flags: layout.p_flags.read(data, base) as u32,
            p_offset: layout.p_offset.read(data, base),
            p_vaddr: layout.p_vaddr.read(data, base),
            p_filesz: layout.p_filesz.read(data, base),
            p_memsz: layout.p_memsz.read(data, base),
            p_align: layout.p_align.read(data, base),
        }
    }

    /// Returns `true` for `PT_LOAD` entries.
    #[must_use]
    pub fn is_load(&self) -> bool {
        self.p_type == PT_LOAD
    }

    /// Returns `true` if `p_align` already equals `alignment`.
    #[must_use]
    pub fn is_aligned_to(&self, alignment: u64) -> bool {
        self.p_align == alignment
    }

    /// Checks the loader rule `p_vaddr ≡ p_offset (mod alignment)`.
    ///
    /// A segment that fails this cannot be mapped with that alignment even
    /// after `p_align` is rewritten. Alignments of 0 and 1 always pass.
    #[must_use]
    pub fn is_congruent(&self, alignment: u64) -> bool {
        alignment <= 1 || self.p_vaddr % alignment == self.p_offset % alignment
    }

    /// `readelf`-style name of the segment type, if known.
    #[must_use]
    pub fn type_name(&self) -> Option<&'static str> {
        segment_type_name(self.p_type)
    }
}

// ---------------------------------------------------------------------------
// ProgramHeaders
// ---------------------------------------------------------------------------

/// Iterator over the entries of a [`ProgramHeaderTable`].
pub struct ProgramHeaders<'a> {
    data: &'a [u8],
    table: ProgramHeaderTable,
    next: usize,
    end: usize,
}

impl Iterator for ProgramHeaders<'_> {
    type Item = ProgramHeader;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let phdr = ProgramHeader::read(self.data, &self.table, self.next);
        self.next += 1;
        Some(phdr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProgramHeaders<'_> {}
