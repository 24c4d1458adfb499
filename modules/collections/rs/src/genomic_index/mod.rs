use ahash::AHashMap;
use derive_getters::Dissolve;

use strandit_core_rs::loc::{Contig, Interval, PerStrand, Strand};

use crate::interval_tree::{Builder, ITree};

/// Strand-aware genomic index: one interval tree per (contig, strand).
#[derive(Clone, Debug, Dissolve)]
pub struct GenomicIndex<Ctg: Contig, IT: ITree> {
    itrees: AHashMap<Ctg, PerStrand<IT>>,
}

impl<Ctg: Contig, IT: ITree> Default for GenomicIndex<Ctg, IT> {
    fn default() -> Self {
        Self {
            itrees: AHashMap::new(),
        }
    }
}

impl<Ctg: Contig, IT: ITree> GenomicIndex<Ctg, IT> {
    pub fn builder<B>() -> GenomicIndexBuilder<Ctg, B>
    where
        B: Builder<Target = IT> + Default,
    {
        GenomicIndexBuilder::default()
    }

    pub fn get(&self, contig: &Ctg, strand: Strand) -> Option<&IT> {
        self.itrees.get(contig).map(|trees| trees.get(strand))
    }

    /// Total number of indexed intervals across all contigs and strands.
    pub fn len(&self) -> usize {
        self.itrees
            .values()
            .map(|trees| trees.forward.len() + trees.reverse.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries on the given contig and strand that intersect the query interval.
    /// Unknown contigs produce no hits.
    pub fn overlap<'a>(
        &'a self,
        contig: &Ctg,
        strand: Strand,
        interval: Interval<IT::Idx>,
    ) -> impl Iterator<Item = (Interval<IT::Idx>, &'a IT::Data)> + 'a {
        self.get(contig, strand)
            .into_iter()
            .flat_map(move |tree| tree.query(interval))
    }
}

pub struct GenomicIndexBuilder<Ctg: Contig, B: Builder + Default> {
    builders: AHashMap<Ctg, PerStrand<B>>,
}

impl<Ctg: Contig, B: Builder + Default> Default for GenomicIndexBuilder<Ctg, B> {
    fn default() -> Self {
        Self {
            builders: AHashMap::new(),
        }
    }
}

impl<Ctg: Contig, B: Builder + Default> GenomicIndexBuilder<Ctg, B> {
    pub fn add(
        &mut self,
        contig: Ctg,
        strand: Strand,
        interval: Interval<<B::Target as ITree>::Idx>,
        data: <B::Target as ITree>::Data,
    ) -> &mut Self {
        let builder = self.builders.entry(contig).or_default().get_mut(strand);
        *builder = std::mem::take(builder).add(interval, data);
        self
    }

    pub fn build(self) -> GenomicIndex<Ctg, B::Target> {
        let itrees = self
            .builders
            .into_iter()
            .map(|(contig, builders)| (contig, builders.map(|_, builder| builder.build())))
            .collect();
        GenomicIndex { itrees }
    }
}
