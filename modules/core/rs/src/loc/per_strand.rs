use derive_getters::Dissolve;
use derive_more::Constructor;

use super::strand::Strand;

/// A struct that holds data for each strand.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Dissolve, Constructor,
)]
pub struct PerStrand<T> {
    pub forward: T,
    pub reverse: T,
}

impl<T> PerStrand<T> {
    pub fn get(&self, strand: Strand) -> &T {
        match strand {
            Strand::Forward => &self.forward,
            Strand::Reverse => &self.reverse,
        }
    }

    pub fn get_mut(&mut self, strand: Strand) -> &mut T {
        match strand {
            Strand::Forward => &mut self.forward,
            Strand::Reverse => &mut self.reverse,
        }
    }

    /// Apply a function to the data on each strand.
    pub fn map<U>(self, mut f: impl FnMut(Strand, T) -> U) -> PerStrand<U> {
        PerStrand {
            forward: f(Strand::Forward, self.forward),
            reverse: f(Strand::Reverse, self.reverse),
        }
    }
}
