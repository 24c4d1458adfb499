use std::fmt::Debug;

use eyre::{Result, WrapErr};

use strandit_core_rs::loc::Contig;
use strandit_core_rs::ngs::StrandMode;
use strandit_core_rs::num::PrimInt;
use strandit_core_rs::source::AlignmentSource;

use crate::annotation::AnnotationIndex;
use crate::config::InferenceConfig;
use crate::overlap::{OverlapCounter, OverlapTally};
use crate::result::{SampleRow, Warning};
use crate::worker::Worker;

/// Estimates how the alignments of one sample split between the two strand modes.
///
/// The sample is streamed chunk by chunk and folded into a running [`OverlapTally`] until the
/// target number of overlapping alignments is collected or the chunk cap is reached. Pairs are
/// always resolved with the mate-1 convention: discordance under mate-1 is concordance under
/// mate-2, so a single pass measures both modes.
pub struct SampleStrandClassifier<'a, Ctg: Contig, Idx: PrimInt, Elt> {
    index: &'a AnnotationIndex<Ctg, Idx, Elt>,
    config: &'a InferenceConfig<Ctg>,
}

impl<'a, Ctg: Contig + AsRef<str>, Idx: PrimInt, Elt> SampleStrandClassifier<'a, Ctg, Idx, Elt> {
    pub fn new(
        index: &'a AnnotationIndex<Ctg, Idx, Elt>,
        config: &'a InferenceConfig<Ctg>,
    ) -> Self {
        Self { index, config }
    }

    pub fn classify<Tag: Debug, Src>(
        &self,
        sample: Tag,
        source: &Src,
        worker: &mut Worker<Ctg, Idx>,
    ) -> Result<SampleRow<Tag>>
    where
        Src: AlignmentSource<Contig = Ctg, Idx = Idx>,
    {
        let config = self.config;
        let mut stream = source
            .open()
            .wrap_err_with(|| format!("Failed to open alignments for sample {sample:?}"))?;

        let mut counter = OverlapCounter::new(config.ambiguity_ceiling);
        let mut tally = OverlapTally::default();
        let mut chunks = 0;
        let mut max_ambiguity: Option<f64> = None;

        loop {
            worker.next_chunk(
                &mut stream,
                config.chunk_size,
                StrandMode::Mate1,
                &config.contigs,
            )?;
            if worker.alignments().is_empty() {
                break;
            }

            let batch = counter.count(self.index, worker.alignments());
            if let Some(warning) = counter.check(&batch) {
                log::warn!("Sample {sample:?}, chunk {}: {warning}", chunks + 1);
                if let Warning::HighAmbiguity { fraction, .. } = warning {
                    max_ambiguity = Some(max_ambiguity.map_or(fraction, |x| x.max(fraction)));
                }
            }
            tally += batch;
            chunks += 1;
            log::debug!(
                "Sample {sample:?}, chunk {chunks}: {} alignments, {} overlapping in total",
                worker.alignments().len(),
                tally.total()
            );

            if tally.total() >= config.target_alignments || chunks >= config.max_chunks {
                break;
            }
        }
        drop(stream);

        let mut warnings = Vec::new();
        if let Some(fraction) = max_ambiguity {
            warnings.push(Warning::HighAmbiguity {
                fraction,
                ceiling: config.ambiguity_ceiling,
            });
        }
        if chunks >= config.max_chunks && tally.total() < config.target_alignments {
            let warning = Warning::InsufficientData {
                chunks,
                alignments: tally.total(),
                target: config.target_alignments,
            };
            log::warn!("Sample {sample:?}: {warning}");
            warnings.push(warning);
        }
        if tally.total() < config.min_alignments {
            let warning = Warning::LowAlignmentCount {
                alignments: tally.total(),
                minimum: config.min_alignments,
            };
            log::warn!("Sample {sample:?}: {warning}");
            warnings.push(warning);
        }

        let row = tally.to_row();
        log::info!(
            "Sample {sample:?}: mode 1 {:?}, mode 2 {:?}, ambiguous {:?} ({} alignments)",
            row.strand_mode1_frac,
            row.strand_mode2_frac,
            row.ambiguous_frac,
            row.n_alignments_used
        );

        Ok(SampleRow {
            sample,
            row,
            warnings,
        })
    }
}
