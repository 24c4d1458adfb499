use derive_more::{Add, AddAssign};

use strandit_core_rs::loc::Contig;
use strandit_core_rs::num::PrimInt;
use strandit_core_rs::source::Alignment;

use crate::annotation::{AnnotationIndex, Matches};
use crate::result::{StrandednessRow, Warning};

/// Outcome of the two strand-aware queries for one alignment.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct AlignmentOverlap {
    /// Elements on the alignment's own strand.
    pub concordant: Option<Matches>,
    /// Elements on the opposite strand.
    pub discordant: Option<Matches>,
}

impl AlignmentOverlap {
    /// The region carries annotation on both strands.
    pub fn is_ambiguous(&self) -> bool {
        self.concordant.is_some() && self.discordant.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.concordant.is_none() && self.discordant.is_none()
    }
}

/// Accumulated overlap classes. Every counted alignment lands in exactly one class, so
/// `total == concordant + discordant + ambiguous` always holds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Add, AddAssign)]
pub struct OverlapTally {
    concordant: u64,
    discordant: u64,
    ambiguous: u64,
    total: u64,
}

impl OverlapTally {
    pub fn new(concordant: u64, discordant: u64, ambiguous: u64) -> Self {
        Self {
            concordant,
            discordant,
            ambiguous,
            total: concordant + discordant + ambiguous,
        }
    }

    /// Account for one alignment. Alignments without any overlap are not counted.
    pub fn record(&mut self, overlap: &AlignmentOverlap) {
        match (overlap.concordant.is_some(), overlap.discordant.is_some()) {
            (true, true) => self.ambiguous += 1,
            (true, false) => self.concordant += 1,
            (false, true) => self.discordant += 1,
            (false, false) => return,
        }
        self.total += 1;
    }

    pub fn concordant(&self) -> u64 {
        self.concordant
    }

    pub fn discordant(&self) -> u64 {
        self.discordant
    }

    pub fn ambiguous(&self) -> u64 {
        self.ambiguous
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// concordant / (concordant + discordant), undefined when neither class is populated.
    pub fn concordance(&self) -> Option<f64> {
        fraction(self.concordant, self.concordant + self.discordant)
    }

    /// Share of strand-ambiguous alignments among all counted ones.
    pub fn ambiguity(&self) -> Option<f64> {
        fraction(self.ambiguous, self.total)
    }

    pub fn to_row(&self) -> StrandednessRow {
        StrandednessRow {
            strand_mode1_frac: fraction(self.concordant, self.total),
            strand_mode2_frac: fraction(self.discordant, self.total),
            ambiguous_frac: fraction(self.ambiguous, self.total),
            n_alignments_used: self.total,
        }
    }
}

pub(crate) fn fraction(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

/// Classifies alignments as concordant, discordant or ambiguous against an annotation index.
///
/// Each alignment is queried twice: as is (concordant query) and with the strand inverted
/// (discordant query). Multiple hits within one query count once, the first element in index
/// build order represents the match.
#[derive(Clone, Debug)]
pub struct OverlapCounter {
    ambiguity_ceiling: f64,
    scratch: Vec<usize>,
}

impl OverlapCounter {
    pub fn new(ambiguity_ceiling: f64) -> Self {
        Self {
            ambiguity_ceiling,
            scratch: Vec::new(),
        }
    }

    pub fn ambiguity_ceiling(&self) -> f64 {
        self.ambiguity_ceiling
    }

    pub fn overlap<Ctg: Contig, Idx: PrimInt, Elt>(
        &mut self,
        index: &AnnotationIndex<Ctg, Idx, Elt>,
        alignment: &Alignment<Ctg, Idx>,
    ) -> AlignmentOverlap {
        let (contig, interval, strand) =
            (alignment.contig(), *alignment.interval(), *alignment.strand());
        AlignmentOverlap {
            concordant: index.matches(contig, strand, interval, &mut self.scratch),
            discordant: index.matches(contig, strand.flipped(), interval, &mut self.scratch),
        }
    }

    /// Report-all mode: the four overlap counts for the batch.
    pub fn count<Ctg: Contig, Idx: PrimInt, Elt>(
        &mut self,
        index: &AnnotationIndex<Ctg, Idx, Elt>,
        alignments: &[Alignment<Ctg, Idx>],
    ) -> OverlapTally {
        let mut tally = OverlapTally::default();
        for alignment in alignments {
            let overlap = self.overlap(index, alignment);
            tally.record(&overlap);
        }
        tally
    }

    /// Ratio mode: concordant / (concordant + discordant) for the batch, together with the
    /// batch's ambiguity warning if any.
    pub fn ratio<Ctg: Contig, Idx: PrimInt, Elt>(
        &mut self,
        index: &AnnotationIndex<Ctg, Idx, Elt>,
        alignments: &[Alignment<Ctg, Idx>],
    ) -> (Option<f64>, Option<Warning>) {
        let tally = self.count(index, alignments);
        let warning = self.check(&tally);
        if let Some(warning) = &warning {
            log::warn!("{warning}");
        }
        (tally.concordance(), warning)
    }

    /// Data-quality check for a batch: too many alignments fall into regions annotated on
    /// both strands.
    pub fn check(&self, tally: &OverlapTally) -> Option<Warning> {
        match tally.ambiguity() {
            Some(fraction) if fraction > self.ambiguity_ceiling => Some(Warning::HighAmbiguity {
                fraction,
                ceiling: self.ambiguity_ceiling,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Feature;
    use strandit_core_rs::loc::{Interval, Strand};

    fn aln(start: u32, end: u32, strand: Strand) -> Alignment<String, u32> {
        Alignment::new("chr1".to_string(), Interval::new(start, end).unwrap(), strand)
    }

    fn index() -> AnnotationIndex<String, u32, &'static str> {
        let feature = |id, strand, start, end| {
            Feature::new(id, "chr1".to_string(), strand, vec![Interval::new(start, end).unwrap()])
                .unwrap()
        };
        AnnotationIndex::from_features([
            feature("plus", Strand::Forward, 0, 1000),
            feature("plus-2", Strand::Forward, 500, 1000),
            feature("minus", Strand::Reverse, 2000, 3000),
            feature("antisense", Strand::Reverse, 900, 1200),
        ])
    }

    #[test]
    fn test_overlap_classes() {
        let index = index();
        let mut counter = OverlapCounter::new(0.1);

        let overlap = counter.overlap(&index, &aln(600, 700, Strand::Forward));
        assert_eq!(overlap.concordant, Some(Matches { first: 0, elements: 2 }));
        assert_eq!(overlap.discordant, None);

        let overlap = counter.overlap(&index, &aln(2100, 2200, Strand::Forward));
        assert_eq!(overlap.concordant, None);
        assert_eq!(overlap.discordant, Some(Matches { first: 2, elements: 1 }));

        let overlap = counter.overlap(&index, &aln(950, 960, Strand::Reverse));
        assert!(overlap.is_ambiguous());

        assert!(counter.overlap(&index, &aln(5000, 5100, Strand::Forward)).is_empty());
    }

    #[test]
    fn test_count_and_ratio() {
        let index = index();
        let mut counter = OverlapCounter::new(0.1);
        let batch = vec![
            aln(10, 20, Strand::Forward),
            aln(30, 40, Strand::Forward),
            aln(600, 650, Strand::Forward),
            aln(2500, 2600, Strand::Forward),
            aln(950, 960, Strand::Forward),
            aln(4000, 4100, Strand::Reverse),
        ];

        let tally = counter.count(&index, &batch);
        assert_eq!(tally, OverlapTally::new(3, 1, 1));
        assert_eq!(tally.total(), 5);
        let (ratio, warning) = counter.ratio(&index, &batch);
        assert_eq!(ratio, Some(0.75));
        assert!(warning.is_some());

        // 1 of 5 is ambiguous
        assert_eq!(
            counter.check(&tally),
            Some(Warning::HighAmbiguity { fraction: 0.2, ceiling: 0.1 })
        );
        assert_eq!(OverlapCounter::new(0.2).check(&tally), None);
    }

    #[test]
    fn test_ratio_of_ambiguous_batch() {
        let index = index();
        let mut counter = OverlapCounter::new(0.1);
        // [900, 1000) carries annotation on both strands
        let batch: Vec<_> = (0..10).map(|i| aln(900 + i, 950 + i, Strand::Forward)).collect();

        let (ratio, warning) = counter.ratio(&index, &batch);
        assert_eq!(ratio, None);
        assert_eq!(
            warning,
            Some(Warning::HighAmbiguity {
                fraction: 1.0,
                ceiling: 0.1
            })
        );

        let clean: Vec<_> = (0..10).map(|i| aln(10 + i, 60 + i, Strand::Forward)).collect();
        assert_eq!(counter.ratio(&index, &clean), (Some(1.0), None));
    }

    #[test]
    fn test_tally_is_associative() {
        let index = index();
        let mut counter = OverlapCounter::new(0.1);
        let batch: Vec<_> = (0..40)
            .map(|i| {
                let strand = if i % 3 == 0 { Strand::Reverse } else { Strand::Forward };
                aln(i * 80, i * 80 + 50, strand)
            })
            .collect();

        let whole = counter.count(&index, &batch);
        let (left, right) = batch.split_at(17);
        let mut merged = counter.count(&index, left);
        let before = merged;
        merged += counter.count(&index, right);

        assert_eq!(merged, whole);
        assert_eq!(whole.total(), whole.concordant() + whole.discordant() + whole.ambiguous());
        assert!(merged.total() >= before.total() && merged.concordant() >= before.concordant());
    }

    #[test]
    fn test_empty_tally() {
        let tally = OverlapTally::default();
        assert_eq!(tally.concordance(), None);
        assert_eq!(tally.ambiguity(), None);

        let row = tally.to_row();
        assert_eq!(row.strand_mode1_frac, None);
        assert_eq!(row.n_alignments_used, 0);
    }
}
