use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;

use crate::loc::{Contig, Interval, Strand};
use crate::ngs::{Layout, StrandMode};
use crate::num::PrimInt;

/// A single effective alignment: where it maps and which strand it is attributed to.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Constructor, Dissolve, Getters)]
pub struct Alignment<Ctg: Contig, Idx: PrimInt> {
    contig: Ctg,
    interval: Interval<Idx>,
    strand: Strand,
}

/// A mapped read (single-end) or a pair of mapped mates (paired-end).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum AlignmentRecord<Ctg: Contig, Idx: PrimInt> {
    Single(Alignment<Ctg, Idx>),
    Paired {
        mate1: Alignment<Ctg, Idx>,
        mate2: Alignment<Ctg, Idx>,
    },
}

impl<Ctg: Contig, Idx: PrimInt> AlignmentRecord<Ctg, Idx> {
    pub fn layout(&self) -> Layout {
        match self {
            AlignmentRecord::Single(_) => Layout::Single,
            AlignmentRecord::Paired { .. } => Layout::Paired,
        }
    }

    /// Append the effective alignments of the record under the given strand mode convention.
    /// Returns the number of appended alignments: single-end records always produce one,
    /// pairs produce one (mate-1/mate-2 conventions) or two (each mate on its own). Pairs with
    /// mates on different contigs can't be collapsed into one interval and produce none.
    pub fn resolve(&self, mode: StrandMode, saveto: &mut Vec<Alignment<Ctg, Idx>>) -> usize {
        match self {
            AlignmentRecord::Single(alignment) => {
                saveto.push(alignment.clone());
                1
            }
            AlignmentRecord::Paired { mate1, mate2 } => match mode {
                StrandMode::EachMate => {
                    saveto.push(mate1.clone());
                    saveto.push(mate2.clone());
                    2
                }
                _ if mate1.contig != mate2.contig => 0,
                StrandMode::Mate1 | StrandMode::Mate2 => {
                    let strand = match mode {
                        StrandMode::Mate2 => mate2.strand,
                        _ => mate1.strand,
                    };
                    saveto.push(Alignment {
                        contig: mate1.contig.clone(),
                        interval: mate1.interval.span(&mate2.interval),
                        strand,
                    });
                    1
                }
            },
        }
    }
}
