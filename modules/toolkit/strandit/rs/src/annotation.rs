use ahash::AHashMap;
use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result};

use strandit_collections_rs::genomic_index::GenomicIndex;
use strandit_collections_rs::interval_tree::{Bits, BitsBuilder};
use strandit_core_rs::loc::{Contig, Interval, Strand};
use strandit_core_rs::num::PrimInt;

use crate::config::ContigFilter;

/// Annotated element (transcript, gene, any feature): a set of disjoint segments on one strand.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Getters, Dissolve)]
pub struct Feature<Ctg: Contig, Idx: PrimInt, Elt> {
    id: Elt,
    contig: Ctg,
    strand: Strand,
    segments: Vec<Interval<Idx>>,
}

impl<Ctg: Contig, Idx: PrimInt, Elt> Feature<Ctg, Idx, Elt> {
    /// Overlapping and touching segments are merged, the stored segments are sorted.
    pub fn new(
        id: Elt,
        contig: Ctg,
        strand: Strand,
        mut segments: Vec<Interval<Idx>>,
    ) -> Result<Self> {
        ensure!(
            !segments.is_empty(),
            "Feature on contig {contig:?} ({strand}) has no segments"
        );
        let total = segments.len();
        let segments = Interval::merge(&mut segments);
        if segments.len() != total {
            log::debug!(
                "Merged {} overlapping segments of a feature on {contig:?}",
                total - segments.len()
            );
        }

        Ok(Self {
            id,
            contig,
            strand,
            segments,
        })
    }
}

/// First element hit by a query (in index build order) and the number of distinct elements hit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Matches {
    pub first: usize,
    pub elements: usize,
}

/// Strand-aware interval index over annotated elements.
///
/// Elements are numbered in the order they were supplied to the builder; this order defines the
/// "first match" when a query overlaps several elements.
#[derive(Clone, Debug, Dissolve)]
pub struct AnnotationIndex<Ctg: Contig, Idx: PrimInt, Elt> {
    features: Vec<Feature<Ctg, Idx, Elt>>,
    index: GenomicIndex<Ctg, Bits<Idx, usize>>,
}

impl<Ctg: Contig, Idx: PrimInt, Elt> AnnotationIndex<Ctg, Idx, Elt> {
    pub fn from_features(features: impl IntoIterator<Item = Feature<Ctg, Idx, Elt>>) -> Self {
        let features: Vec<_> = features.into_iter().collect();

        let mut builder = GenomicIndex::builder::<BitsBuilder<Idx, usize>>();
        for (ind, feature) in features.iter().enumerate() {
            for segment in &feature.segments {
                builder.add(feature.contig.clone(), feature.strand, *segment, ind);
            }
        }

        Self {
            features,
            index: builder.build(),
        }
    }

    /// Build the index from transcript models given as exons: `(transcript id, contig, strand,
    /// exon)`. Exons are grouped by transcript, transcripts keep the order of their first exon.
    pub fn from_transcripts(
        exons: impl IntoIterator<Item = (Elt, Ctg, Strand, Interval<Idx>)>,
    ) -> Result<Self>
    where
        Elt: Clone + Eq + std::hash::Hash,
    {
        let mut order: AHashMap<(Elt, Ctg, Strand), usize> = AHashMap::new();
        let mut groups: Vec<(Elt, Ctg, Strand, Vec<Interval<Idx>>)> = Vec::new();
        for (id, contig, strand, exon) in exons {
            let key = (id, contig, strand);
            match order.get(&key) {
                Some(&ind) => groups[ind].3.push(exon),
                None => {
                    order.insert(key.clone(), groups.len());
                    groups.push((key.0, key.1, key.2, vec![exon]));
                }
            }
        }

        let features = groups
            .into_iter()
            .map(|(id, contig, strand, exons)| Feature::new(id, contig, strand, exons))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_features(features))
    }

    /// Drop elements located on contigs rejected by the filter. Remaining elements keep their
    /// relative order.
    pub fn restrict(self, filter: &ContigFilter<Ctg>) -> Self
    where
        Ctg: AsRef<str>,
    {
        let total = self.features.len();
        let features: Vec<_> = self
            .features
            .into_iter()
            .filter(|feature| filter.keeps(&feature.contig))
            .collect();
        if features.len() != total {
            log::warn!(
                "{} annotated elements were dropped by the contig filter {:?}",
                total - features.len(),
                filter
            );
        }
        Self::from_features(features)
    }

    pub fn features(&self) -> &[Feature<Ctg, Idx, Elt>] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Elements on the given strand overlapping the query. `scratch` is reused between calls
    /// and holds the distinct element indices after the call, in build order.
    pub fn matches(
        &self,
        contig: &Ctg,
        strand: Strand,
        interval: Interval<Idx>,
        scratch: &mut Vec<usize>,
    ) -> Option<Matches> {
        scratch.clear();
        scratch.extend(
            self.index
                .overlap(contig, strand, interval)
                .map(|(_, element)| *element),
        );
        scratch.sort_unstable();
        scratch.dedup();

        scratch.first().map(|first| Matches {
            first: *first,
            elements: scratch.len(),
        })
    }
}
