//! Error type shared by the parsing and realignment paths.

use core::fmt;

/// Errors that can occur while locating or rewriting program headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfError {
    /// The image does not start with `\x7fELF`.
    NotAnElfFile,
    /// `EI_CLASS` is neither `ELFCLASS32` nor `ELFCLASS64`.
    UnsupportedElfClass(u8),
    /// The ELF header or program-header table does not fit in the image.
    TruncatedOrCorruptHeader,
    /// The requested alignment cannot be used as a `p_align` value.
    InvalidAlignment(u64),
}

impl fmt::Display for ElfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnElfFile => write!(f, "not an ELF file (bad magic)"),
            Self::UnsupportedElfClass(class) => {
                write!(f, "unsupported ELF class {class} (expected 1 or 2)")
            }
            Self::TruncatedOrCorruptHeader => {
                write!(f, "truncated or corrupt ELF header or program-header table")
            }
            Self::InvalidAlignment(align) => write!(
                f,
                "invalid alignment {align}: must be a non-zero power of two that fits p_align"
            ),
        }
    }
}

impl core::error::Error for ElfError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offending_values() {
        assert!(ElfError::UnsupportedElfClass(7).to_string().contains('7'));
        assert!(ElfError::InvalidAlignment(3000).to_string().contains("3000"));
        assert!(ElfError::NotAnElfFile.to_string().contains("not an ELF"));
    }
}
