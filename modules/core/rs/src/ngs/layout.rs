use std::fmt::{Display, Formatter};

/// Sequencing layout of a library.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum Layout {
    /// Each source molecule is sequenced only once (single-end sequencing).
    #[default]
    Single,
    /// Each source molecule is sequenced from both ends (paired-end sequencing).
    Paired,
}

impl Display for Layout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Single => write!(f, "Single"),
            Layout::Paired => write!(f, "Paired"),
        }
    }
}
