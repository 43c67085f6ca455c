//! TBDS error handling

use core::fmt;

/// Errors produced while building or scanning a descriptor block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TbdsError {
    /// The backing buffer cannot even hold the header
    BufferTooSmall { capacity: usize },

    /// A payload does not fit the 16-bit length field
    DescriptorTooLarge { len: usize },

    /// Appending would run past the end of the backing buffer
    OutOfSpace { needed: usize, available: usize },

    /// The block does not start with the TBDS magic
    BadMagic(u32),

    /// The block (or a descriptor inside it) ends early
    Truncated { offset: usize },

    /// The recorded total length disagrees with the descriptors present
    LengthMismatch { recorded: u32, actual: u32 },

    /// The recorded descriptor count disagrees with the descriptors present
    CountMismatch { recorded: u16, actual: usize },

    /// The 16-bit descriptor count is exhausted
    TooManyDescriptors,
}

impl TbdsError {
    pub fn description(&self) -> &'static str {
        match self {
            Self::BufferTooSmall { .. } => "TBDS buffer too small for header",
            Self::DescriptorTooLarge { .. } => "TBDS descriptor payload too large",
            Self::OutOfSpace { .. } => "TBDS buffer full",
            Self::BadMagic(_) => "TBDS magic mismatch",
            Self::Truncated { .. } => "TBDS block truncated",
            Self::LengthMismatch { .. } => "TBDS length mismatch",
            Self::CountMismatch { .. } => "TBDS descriptor count mismatch",
            Self::TooManyDescriptors => "TBDS descriptor count overflow",
        }
    }
}

impl fmt::Display for TbdsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { capacity } => {
                write!(f, "{} ({} bytes)", self.description(), capacity)
            }
            Self::DescriptorTooLarge { len } => {
                write!(f, "{} ({} bytes, max {})", self.description(), len, u16::MAX)
            }
            Self::OutOfSpace { needed, available } => write!(
                f,
                "{} (need {} bytes, {} left)",
                self.description(),
                needed,
                available
            ),
            Self::BadMagic(magic) => write!(f, "{} ({:#010x})", self.description(), magic),
            Self::Truncated { offset } => write!(f, "{} at offset {}", self.description(), offset),
            Self::LengthMismatch { recorded, actual } => write!(
                f,
                "{} (header says {}, descriptors end at {})",
                self.description(),
                recorded,
                actual
            ),
            Self::CountMismatch { recorded, actual } => write!(
                f,
                "{} (header says {}, found {})",
                self.description(),
                recorded,
                actual
            ),
            Self::TooManyDescriptors => write!(f, "{} (max {})", self.description(), u16::MAX),
        }
    }
}

pub type Result<T = ()> = core::result::Result<T, TbdsError>;
