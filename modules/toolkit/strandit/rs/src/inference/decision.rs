use std::fmt::{Display, Formatter};

use crate::config::DecisionThresholds;
use crate::result::StrandednessRow;

/// Library strand mode called for a sample.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum StrandModeLabel {
    /// Reads follow the strand of the annotated transcript.
    Mode1,
    /// Reads are antisense to the annotated transcript.
    Mode2,
    Unstranded,
    Ambiguous,
}

impl StrandModeLabel {
    /// Integer form of the stranded labels.
    pub fn as_int(&self) -> Option<u8> {
        match self {
            StrandModeLabel::Mode1 => Some(1),
            StrandModeLabel::Mode2 => Some(2),
            StrandModeLabel::Unstranded | StrandModeLabel::Ambiguous => None,
        }
    }
}

impl Display for StrandModeLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let repr = match self {
            StrandModeLabel::Mode1 => "1",
            StrandModeLabel::Mode2 => "2",
            StrandModeLabel::Unstranded => "NA",
            StrandModeLabel::Ambiguous => "ambiguous",
        };
        write!(f, "{repr}")
    }
}

/// Labels for a set of samples: one value when all samples agree, one label per sample otherwise.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum StrandModeCall<Tag> {
    Uniform(StrandModeLabel),
    PerSample(Vec<(Tag, StrandModeLabel)>),
}

impl<Tag> StrandModeCall<Tag> {
    /// Integer representation of the call, available when every label is stranded.
    pub fn as_ints(&self) -> Option<Vec<u8>> {
        match self {
            StrandModeCall::Uniform(label) => label.as_int().map(|x| vec![x]),
            StrandModeCall::PerSample(labels) => labels.iter().map(|(_, x)| x.as_int()).collect(),
        }
    }

    pub fn is_uniform(&self) -> bool {
        matches!(self, StrandModeCall::Uniform(_))
    }
}

/// Stateless labelling of strandedness rows.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct StrandModeDecision {
    thresholds: DecisionThresholds,
}

impl StrandModeDecision {
    pub fn new(thresholds: DecisionThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &DecisionThresholds {
        &self.thresholds
    }

    /// Rules are applied in order and each match overwrites the previous label.
    pub fn label(&self, row: &StrandednessRow) -> StrandModeLabel {
        let t = &self.thresholds;
        let above = |frac: Option<f64>, cutoff: f64| frac.is_some_and(|x| x > cutoff);
        let within = |frac: Option<f64>| {
            frac.is_some_and(|x| x > t.unstranded_low && x < t.unstranded_high)
        };

        let mut label = StrandModeLabel::Ambiguous;
        if above(row.strand_mode1_frac, t.stranded) {
            label = StrandModeLabel::Mode1;
        }
        if above(row.strand_mode2_frac, t.stranded) {
            label = StrandModeLabel::Mode2;
        }
        if within(row.strand_mode1_frac) && within(row.strand_mode2_frac) {
            label = StrandModeLabel::Unstranded;
        }
        label
    }

    pub fn decide<'a, Tag: Clone + 'a>(
        &self,
        rows: impl IntoIterator<Item = (&'a Tag, &'a StrandednessRow)>,
    ) -> StrandModeCall<Tag> {
        let labels: Vec<_> = rows
            .into_iter()
            .map(|(tag, row)| (tag.clone(), self.label(row)))
            .collect();

        match labels.first() {
            Some((_, first)) if labels.iter().all(|(_, x)| x == first) => {
                StrandModeCall::Uniform(*first)
            }
            _ => StrandModeCall::PerSample(labels),
        }
    }
}
