use std::fmt::Debug;
use std::hash::Hash;

/// Contig is an object that refers to an actual assembly contig. Depending on the context, can be
/// encoded by a string, a number, etc.
pub trait Contig:
    Hash + PartialEq + Eq + PartialOrd + Ord + Clone + Default + Debug + Send + Sync
{
}

impl<T: Hash + PartialEq + Eq + PartialOrd + Ord + Clone + Default + Debug + Send + Sync> Contig
    for T
{
}

const NON_STANDARD_MARKERS: &[&str] = &["random", "Un", "alt", "hap", "EBV", "decoy"];

/// Whether the contig name looks like a primary assembly chromosome (chr1, 2, chrX, MT, ...)
/// rather than an unplaced scaffold, alternative haplotype or decoy sequence.
pub fn is_standard_contig(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('_')
        && !NON_STANDARD_MARKERS
            .iter()
            .any(|marker| name.contains(marker))
}
