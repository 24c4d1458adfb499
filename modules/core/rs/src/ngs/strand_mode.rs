use std::fmt::Display;

use eyre::{eyre, Report};

/// Convention used to derive the strand of a read pair from the strands of its mates.
/// Has no effect on single-end alignments.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(u8)]
pub enum StrandMode {
    /// Mates are not combined, each one keeps its own strand and interval.
    EachMate = 0,
    /// The pair inherits the strand of the first mate (e.g. ligation-based protocols).
    #[default]
    Mate1 = 1,
    /// The pair inherits the strand of the second mate (e.g. dUTP protocols).
    Mate2 = 2,
}

impl StrandMode {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl Display for StrandMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl TryFrom<i32> for StrandMode {
    type Error = Report;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::EachMate),
            1 => Ok(Self::Mate1),
            2 => Ok(Self::Mate2),
            _ => Err(eyre!("Strand mode must be one of 0, 1 or 2, got {value}")),
        }
    }
}

impl TryFrom<Option<i32>> for StrandMode {
    type Error = Report;

    fn try_from(value: Option<i32>) -> Result<Self, Self::Error> {
        value
            .ok_or_else(|| eyre!("Strand mode must be one of 0, 1 or 2, got NA"))?
            .try_into()
    }
}
