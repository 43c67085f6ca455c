// Flat Global Descriptor Table for the 32-bit handoff

use static_assertions::assert_eq_size;

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GdtEntry {
    limit_low: u16,
    base_low: u16,
    base_mid: u8,
    access: u8,
    granularity: u8,
    base_high: u8,
}

assert_eq_size!(GdtEntry, u64);

impl GdtEntry {
    pub const fn new(base: u32, limit: u32, access: u8, gran: u8) -> Self {
        Self {
            limit_low: (limit & 0xFFFF) as u16,
            base_low: (base & 0xFFFF) as u16,
            base_mid: ((base >> 16) & 0xFF) as u8,
            access,
            granularity: (((limit >> 16) & 0x0F) as u8) | (gran & 0xF0),
            base_high: ((base >> 24) & 0xFF) as u8,
        }
    }

    pub const fn null() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// The descriptor as the processor reads it
    pub const fn as_u64(&self) -> u64 {
        (self.limit_low as u64)
            | (self.base_low as u64) << 16
            | (self.base_mid as u64) << 32
            | (self.access as u64) << 40
            | (self.granularity as u64) << 48
            | (self.base_high as u64) << 56
    }

    pub fn access(&self) -> u8 {
        self.access
    }
}

pub const GDT_ACCESS_KERNEL_CODE: u8 = 0x9A;
pub const GDT_ACCESS_KERNEL_DATA: u8 = 0x92;
/// 4 KiB granularity, 32-bit default operand size
pub const GDT_GRANULARITY_4K_32: u8 = 0xC0;

pub const KERNEL_CODE_SELECTOR: u16 = 0x08;
pub const KERNEL_DATA_SELECTOR: u16 = 0x10;

/// Null, 4 GiB ring-0 code, 4 GiB ring-0 data
pub static FLAT_GDT: [GdtEntry; 3] = [
    GdtEntry::null(),
    GdtEntry::new(0, 0xF_FFFF, GDT_ACCESS_KERNEL_CODE, GDT_GRANULARITY_4K_32),
    GdtEntry::new(0, 0xF_FFFF, GDT_ACCESS_KERNEL_DATA, GDT_GRANULARITY_4K_32),
];
