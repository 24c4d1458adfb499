use derive_getters::Dissolve;
use eyre::{ensure, Result};

use strandit_core_rs::loc::Contig;
use strandit_core_rs::num::PrimInt;

use crate::annotation::Feature;

use super::engine::FeatureStrandedness;

/// Features x samples matrix with the strandedness, concordant, discordant and p-value layers.
#[derive(Clone, PartialEq, Debug, Dissolve)]
pub struct FeatureCountTable<Ctg: Contig, Idx: PrimInt, Elt, Tag> {
    features: Vec<Feature<Ctg, Idx, Elt>>,
    samples: Vec<Tag>,
    columns: Vec<FeatureStrandedness>,
}

impl<Ctg: Contig, Idx: PrimInt, Elt, Tag> FeatureCountTable<Ctg, Idx, Elt, Tag> {
    pub fn new(
        features: Vec<Feature<Ctg, Idx, Elt>>,
        samples: Vec<Tag>,
        columns: Vec<FeatureStrandedness>,
    ) -> Result<Self> {
        ensure!(
            samples.len() == columns.len(),
            "Expected one column per sample, got {} columns for {} samples",
            columns.len(),
            samples.len()
        );
        for column in &columns {
            ensure!(
                column.concordant().len() == features.len(),
                "Column has {} rows, expected {}",
                column.concordant().len(),
                features.len()
            );
        }
        Ok(Self {
            features,
            samples,
            columns,
        })
    }

    pub fn features(&self) -> &[Feature<Ctg, Idx, Elt>] {
        &self.features
    }

    pub fn samples(&self) -> &[Tag] {
        &self.samples
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn column(&self, sample: usize) -> &FeatureStrandedness {
        &self.columns[sample]
    }

    pub fn columns(&self) -> &[FeatureStrandedness] {
        &self.columns
    }

    pub fn strandedness(&self, feature: usize, sample: usize) -> Option<f64> {
        self.columns[sample].strandedness()[feature]
    }

    pub fn concordant(&self, feature: usize, sample: usize) -> u64 {
        self.columns[sample].concordant()[feature]
    }

    pub fn discordant(&self, feature: usize, sample: usize) -> u64 {
        self.columns[sample].discordant()[feature]
    }

    pub fn p_value(&self, feature: usize, sample: usize) -> f64 {
        self.columns[sample].p_values()[feature]
    }
}
