use derive_getters::Getters;

use strandit_core_rs::ngs::Layout;

/// SAM flag based record filter. Unmapped, secondary, supplementary, QC-failed and duplicate
/// records are always excluded. Paired-end libraries additionally require both the "paired" and
/// the "properly paired" flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Getters)]
pub struct ReadFilter {
    inflags: u16,
    exflags: u16,
    minmapq: u8,
}

impl ReadFilter {
    pub const PAIRED: u16 = 0x1;
    pub const PROPER_PAIR: u16 = 0x2;
    pub const UNMAPPED: u16 = 0x4;
    pub const SECONDARY: u16 = 0x100;
    pub const QC_FAIL: u16 = 0x200;
    pub const DUPLICATE: u16 = 0x400;
    pub const SUPPLEMENTARY: u16 = 0x800;

    const ALWAYS_EXCLUDED: u16 = Self::UNMAPPED
        | Self::SECONDARY
        | Self::QC_FAIL
        | Self::DUPLICATE
        | Self::SUPPLEMENTARY;

    pub fn new(layout: Layout, minmapq: u8) -> Self {
        let inflags = match layout {
            Layout::Single => 0,
            Layout::Paired => Self::PAIRED | Self::PROPER_PAIR,
        };
        Self {
            inflags,
            exflags: Self::ALWAYS_EXCLUDED,
            minmapq,
        }
    }

    /// Whether a record with the given flags and mapping quality passes the filter.
    /// Records without a mapping quality (255) are accepted.
    pub fn accepts(&self, flags: u16, mapq: Option<u8>) -> bool {
        flags & self.inflags == self.inflags
            && flags & self.exflags == 0
            && mapq.unwrap_or(u8::MAX) >= self.minmapq
    }
}
