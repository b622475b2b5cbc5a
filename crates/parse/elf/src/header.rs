//! ELF identification and little-endian byte primitives.

use core::fmt;

use crate::error::ElfError;

/// The four magic bytes every ELF image starts with.
pub const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

/// Index of the class byte in `e_ident`.
pub const EI_CLASS: usize = 4;

/// Index of the data-encoding byte in `e_ident`.
pub const EI_DATA: usize = 5;

/// Invalid class.
pub const ELFCLASSNONE: u8 = 0;

/// 32-bit objects.
pub const ELFCLASS32: u8 = 1;

/// 64-bit objects.
pub const ELFCLASS64: u8 = 2;

/// Two's complement, little-endian.
pub const ELFDATA2LSB: u8 = 1;

/// Two's complement, big-endian.
pub const ELFDATA2MSB: u8 = 2;

/// ELF file class, selecting one of the two header layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfClass {
    /// `ELFCLASS32`.
    Elf32,
    /// `ELFCLASS64`.
    Elf64,
}

impl ElfClass {
    /// Decodes an `EI_CLASS` byte.
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            ELFCLASS32 => Some(Self::Elf32),
            ELFCLASS64 => Some(Self::Elf64),
            _ => None,
        }
    }

    /// Word size in bits.
    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            Self::Elf32 => 32,
            Self::Elf64 => 64,
        }
    }
}

impl fmt::Display for ElfClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ELF{}", self.bits())
    }
}

/// Data encoding claimed by `EI_DATA`.
///
/// Field access is always little-endian; this is reported so callers can
/// warn about images that claim otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// `ELFDATA2LSB`.
    Little,
    /// `ELFDATA2MSB`.
    Big,
    /// Any other value, including `ELFDATANONE`.
    Unknown(u8),
}

impl ByteOrder {
    /// Decodes an `EI_DATA` byte.
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            ELFDATA2LSB => Self::Little,
            ELFDATA2MSB => Self::Big,
            other => Self::Unknown(other),
        }
    }
}

/// The parts of `e_ident` that matter for realignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElfIdent {
    /// Header layout selector.
    pub class: ElfClass,
    /// Claimed data encoding.
    pub byte_order: ByteOrder,
}

impl ElfIdent {
    /// Checks the magic and class bytes at the start of `data`.
    ///
    /// # Errors
    ///
    /// [`ElfError::NotAnElfFile`] if the first four bytes are not the ELF
    /// magic (including images shorter than four bytes),
    /// [`ElfError::TruncatedOrCorruptHeader`] if the image ends before
    /// `EI_CLASS`, and [`ElfError::UnsupportedElfClass`] for any class byte
    /// other than 1 or 2.
    pub fn parse(data: &[u8]) -> Result<Self, ElfError> {
        if data.get(..ELF_MAGIC.len()) != Some(&ELF_MAGIC[..]) {
            return Err(ElfError::NotAnElfFile);
        }

        let class_byte = *data
            .get(EI_CLASS)
            .ok_or(ElfError::TruncatedOrCorruptHeader)?;
        let class =
            ElfClass::from_byte(class_byte).ok_or(ElfError::UnsupportedElfClass(class_byte))?;
        let byte_order = ByteOrder::from_byte(data.get(EI_DATA).copied().unwrap_or(0));

        Ok(Self { class, byte_order })
    }
}

// ---------------------------------------------------------------------------
// Little-endian primitives
// ---------------------------------------------------------------------------

/// Reads a little-endian `u16` at `offset`.
///
/// # Panics
///
/// Panics if `offset + 2 > data.len()`.
#[must_use]
pub fn le_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

/// Reads a little-endian `u32` at `offset`.
///
/// # Panics
///
/// Panics if `offset + 4 > data.len()`.
#[must_use]
pub fn le_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Reads a little-endian `u64` at `offset`.
///
/// # Panics
///
/// Panics if `offset + 8 > data.len()`.
#[must_use]
pub fn le_u64(data: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}

/// Writes `value` as a little-endian `u16` at `offset`.
///
/// # Panics
///
/// Panics if `offset + 2 > data.len()`.
pub fn put_le_u16(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Writes `value` as a little-endian `u32` at `offset`.
///
/// # Panics
///
/// Panics if `offset + 4 > data.len()`.
pub fn put_le_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Writes `value` as a little-endian `u64` at `offset`.
///
/// # Panics
///
/// Panics if `offset + 8 > data.len()`.
pub fn put_le_u64(data: &mut [u8], offset: usize, value: u64) {
    data[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(class: u8, data: u8) -> [u8; 6] {
        [0x7f, b'E', b'L', b'F', class, data]
    }

    #[test]
    fn parse_elf64_little_endian() {
        let id = ElfIdent::parse(&ident(ELFCLASS64, ELFDATA2LSB)).unwrap();
        assert_eq!(id.class, ElfClass::Elf64);
        assert_eq!(id.byte_order, ByteOrder::Little);
    }

    #[test]
    fn parse_elf32_big_endian_is_reported() {
        let id = ElfIdent::parse(&ident(ELFCLASS32, ELFDATA2MSB)).unwrap();
        assert_eq!(id.class, ElfClass::Elf32);
        assert_eq!(id.byte_order, ByteOrder::Big);
    }

    #[test]
    fn bad_magic_rejected() {
        let mut data = ident(ELFCLASS64, ELFDATA2LSB);
        data[1] = b'e';
        assert_eq!(ElfIdent::parse(&data), Err(ElfError::NotAnElfFile));
    }

    #[test]
    fn short_input_is_not_elf() {
        assert_eq!(ElfIdent::parse(&[]), Err(ElfError::NotAnElfFile));
        assert_eq!(ElfIdent::parse(&[0x7f, b'E']), Err(ElfError::NotAnElfFile));
    }

    #[test]
    fn magic_without_class_is_truncated() {
        assert_eq!(
            ElfIdent::parse(&ELF_MAGIC),
            Err(ElfError::TruncatedOrCorruptHeader)
        );
    }

    #[test]
    fn invalid_classes_rejected() {
        for class in [ELFCLASSNONE, 3, 0xff] {
            assert_eq!(
                ElfIdent::parse(&ident(class, ELFDATA2LSB)),
                Err(ElfError::UnsupportedElfClass(class))
            );
        }
    }

    #[test]
    fn missing_data_byte_is_unknown() {
        let data = [0x7f, b'E', b'L', b'F', ELFCLASS32];
        let id = ElfIdent::parse(&data).unwrap();
        assert_eq!(id.byte_order, ByteOrder::Unknown(0));
    }

    #[test]
    fn le_round_trip_at_offset() {
        let mut buf = [0u8; 16];
        put_le_u64(&mut buf, 3, 0x0102_0304_0506_0708);
        assert_eq!(buf[3], 0x08);
        assert_eq!(buf[10], 0x01);
        assert_eq!(le_u64(&buf, 3), 0x0102_0304_0506_0708);

        put_le_u32(&mut buf, 0, 0xdead_beef);
        assert_eq!(le_u32(&buf, 0), 0xdead_beef);
        put_le_u16(&mut buf, 12, 0x4000);
        assert_eq!(le_u16(&buf, 12), 0x4000);
    }

    #[test]
    fn class_display() {
        assert_eq!(ElfClass::Elf32.to_string(), "ELF32");
        assert_eq!(ElfClass::Elf64.to_string(), "ELF64");
    }
}
