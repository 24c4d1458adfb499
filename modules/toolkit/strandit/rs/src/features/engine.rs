use std::fmt::Debug;

use derive_getters::Dissolve;
use eyre::{Result, WrapErr};

use strandit_core_rs::loc::Contig;
use strandit_core_rs::num::PrimInt;
use strandit_core_rs::source::AlignmentSource;

use crate::annotation::{AnnotationIndex, Matches};
use crate::config::FeatureConfig;
use crate::overlap::{fraction, OverlapCounter, OverlapTally};
use crate::result::Warning;
use crate::worker::Worker;

use super::binomial::BinomialTest;

/// Per-feature strandedness of one sample. All vectors are indexed like the annotation.
#[derive(Clone, PartialEq, Debug, Dissolve)]
pub struct FeatureStrandedness {
    concordant: Vec<u64>,
    discordant: Vec<u64>,
    strandedness: Vec<Option<f64>>,
    p_values: Vec<f64>,
    warnings: Vec<Warning>,
}

impl FeatureStrandedness {
    pub fn new(
        concordant: Vec<u64>,
        discordant: Vec<u64>,
        test: &BinomialTest,
        warnings: Vec<Warning>,
    ) -> Result<Self> {
        eyre::ensure!(
            concordant.len() == discordant.len(),
            "Concordant and discordant counts have different lengths: {} vs {}",
            concordant.len(),
            discordant.len()
        );

        let strandedness = concordant
            .iter()
            .zip(&discordant)
            .map(|(c, d)| fraction(*c, c + d))
            .collect();
        let p_values = concordant
            .iter()
            .zip(&discordant)
            .map(|(c, d)| test.p_value(*c, *d))
            .collect::<Result<_>>()?;

        Ok(Self {
            concordant,
            discordant,
            strandedness,
            p_values,
            warnings,
        })
    }

    pub fn concordant(&self) -> &[u64] {
        &self.concordant
    }

    pub fn discordant(&self) -> &[u64] {
        &self.discordant
    }

    /// concordant / (concordant + discordant), None for features without any alignment.
    pub fn strandedness(&self) -> &[Option<f64>] {
        &self.strandedness
    }

    pub fn p_values(&self) -> &[f64] {
        &self.p_values
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// Counts concordant and discordant alignments for every annotated feature over a whole sample.
pub struct FeatureStrandednessEngine<'a, Ctg: Contig, Idx: PrimInt, Elt> {
    index: &'a AnnotationIndex<Ctg, Idx, Elt>,
    config: &'a FeatureConfig<Ctg>,
    test: BinomialTest,
}

impl<'a, Ctg: Contig + AsRef<str>, Idx: PrimInt, Elt> FeatureStrandednessEngine<'a, Ctg, Idx, Elt> {
    pub fn new(
        index: &'a AnnotationIndex<Ctg, Idx, Elt>,
        config: &'a FeatureConfig<Ctg>,
    ) -> Result<Self> {
        config.validate()?;
        let test = BinomialTest::new(config.background)?;
        Ok(Self {
            index,
            config,
            test,
        })
    }

    pub fn count<Tag: Debug, Src>(
        &self,
        sample: &Tag,
        source: &Src,
        worker: &mut Worker<Ctg, Idx>,
    ) -> Result<FeatureStrandedness>
    where
        Src: AlignmentSource<Contig = Ctg, Idx = Idx>,
    {
        let config = self.config;
        let mut stream = source
            .open()
            .wrap_err_with(|| format!("Failed to open alignments for sample {sample:?}"))?;

        let mut counter = OverlapCounter::new(config.ambiguity_ceiling);
        let mut concordant = vec![0u64; self.index.len()];
        let mut discordant = vec![0u64; self.index.len()];
        let mut tally = OverlapTally::default();
        let mut max_ambiguity: Option<f64> = None;
        let (mut chunks, mut multimapped) = (0usize, 0u64);

        // Alignments hitting several features in one query can't be attributed to either
        let spread = |matches: &Option<Matches>| matches.is_some_and(|x| x.elements > 1);

        while worker.next_chunk(
            &mut stream,
            config.chunk_size,
            config.strand_mode,
            &config.contigs,
        )? > 0
        {
            let mut batch = OverlapTally::default();
            for alignment in worker.alignments() {
                let overlap = counter.overlap(self.index, alignment);
                batch.record(&overlap);

                if spread(&overlap.concordant) || spread(&overlap.discordant) {
                    multimapped += 1;
                    continue;
                }
                match (overlap.concordant, overlap.discordant) {
                    (Some(c), Some(d)) if config.include_ambiguous => {
                        concordant[c.first] += 1;
                        discordant[d.first] += 1;
                    }
                    (Some(c), None) => concordant[c.first] += 1,
                    (None, Some(d)) => discordant[d.first] += 1,
                    _ => {}
                }
            }

            if let Some(warning) = counter.check(&batch) {
                log::warn!("Sample {sample:?}, chunk {}: {warning}", chunks + 1);
                if let Warning::HighAmbiguity { fraction, .. } = warning {
                    max_ambiguity = Some(max_ambiguity.map_or(fraction, |x| x.max(fraction)));
                }
            }
            tally += batch;
            chunks += 1;
            log::debug!(
                "Sample {sample:?}, chunk {chunks}: {} overlapping alignments in total",
                tally.total()
            );
        }
        drop(stream);

        log::info!(
            "Sample {sample:?}: {} overlapping alignments in {chunks} chunks, {multimapped} \
             discarded for overlapping several features",
            tally.total()
        );

        let warnings = max_ambiguity
            .map(|fraction| Warning::HighAmbiguity {
                fraction,
                ceiling: config.ambiguity_ceiling,
            })
            .into_iter()
            .collect();
        FeatureStrandedness::new(concordant, discordant, &self.test, warnings)
    }
}
