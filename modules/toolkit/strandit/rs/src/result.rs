use std::fmt::{Display, Formatter};

use derive_getters::Dissolve;

use crate::inference::StrandModeCall;

/// Non-fatal data-quality diagnostics attached to a sample.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Warning {
    /// Too many alignments fall into regions annotated on both strands.
    HighAmbiguity { fraction: f64, ceiling: f64 },
    /// The chunk cap was reached before collecting the target number of alignments.
    InsufficientData { chunks: usize, alignments: u64, target: u64 },
    /// The final number of used alignments is below the reliability minimum.
    LowAlignmentCount { alignments: u64, minimum: u64 },
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::HighAmbiguity { fraction, ceiling } => write!(
                f,
                "{:.1}% of alignments overlap annotation on both strands (ceiling {:.1}%)",
                fraction * 100.0,
                ceiling * 100.0
            ),
            Warning::InsufficientData {
                chunks,
                alignments,
                target,
            } => write!(
                f,
                "only {alignments} of {target} targeted alignments were collected in {chunks} \
                 chunks"
            ),
            Warning::LowAlignmentCount {
                alignments,
                minimum,
            } => write!(
                f,
                "{alignments} alignments were used, strand inference may be unreliable below \
                 {minimum}"
            ),
        }
    }
}

/// Summary of one sample: how its overlapping alignments split between the strand modes.
/// Fractions are undefined (None) when no alignment overlapped the annotation.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct StrandednessRow {
    pub strand_mode1_frac: Option<f64>,
    pub strand_mode2_frac: Option<f64>,
    pub ambiguous_frac: Option<f64>,
    pub n_alignments_used: u64,
}

#[derive(Clone, PartialEq, Debug, Dissolve)]
pub struct SampleRow<Tag> {
    pub sample: Tag,
    pub row: StrandednessRow,
    pub warnings: Vec<Warning>,
}

/// Dataset-level strand mode together with the per-sample table it was derived from.
#[derive(Clone, PartialEq, Debug, Dissolve)]
pub struct StrandModeResult<Tag> {
    pub call: StrandModeCall<Tag>,
    pub table: Vec<SampleRow<Tag>>,
}
