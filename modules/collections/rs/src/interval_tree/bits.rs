//! Implementation of an interval tree using the BITS algorithm.
//! Reference: https://doi.org/10.1093/bioinformatics/bts652

use derive_getters::Dissolve;
use itertools::Itertools;

use strandit_core_rs::{
    loc::{Interval, IntervalOp},
    num::PrimInt,
};

use super::tree::{Builder, ITree};

/// A builder for constructing [`Bits`] interval trees.
#[derive(Debug, Clone, Dissolve)]
pub struct BitsBuilder<Idx: PrimInt, Data> {
    records: Vec<(Interval<Idx>, Data)>,
}

impl<Idx: PrimInt, Data> Default for BitsBuilder<Idx, Data> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<Idx: PrimInt, Data> Builder for BitsBuilder<Idx, Data> {
    type Target = Bits<Idx, Data>;

    fn add(mut self, interval: Interval<Idx>, data: Data) -> Self {
        self.records.push((interval, data));
        self
    }

    fn extend(mut self, records: impl IntoIterator<Item = (Interval<Idx>, Data)>) -> Self {
        self.records.extend(records);
        self
    }

    fn build(self) -> Self::Target {
        Bits::new(self.records)
    }
}

/// An immutable interval tree implementation using the BITS algorithm: intervals are stored in
/// flat arrays sorted by start, and queries are a binary search followed by a linear scan.
#[derive(Debug, Clone, PartialEq, Eq, Dissolve)]
pub struct Bits<Idx: PrimInt, Data> {
    // Associated data elements, corresponding to intervals at the same index.
    data: Vec<Data>,
    // Interval start coordinates, sorted.
    starts: Vec<Idx>,
    // Interval end coordinates, corresponding to `starts`.
    ends: Vec<Idx>,
    // The maximum length of any interval in the tree. Used to bound the query scan.
    max_len: Idx,
}

impl<Idx: PrimInt, Data> Default for Bits<Idx, Data> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            starts: Vec::new(),
            ends: Vec::new(),
            max_len: Idx::zero(),
        }
    }
}

impl<Idx: PrimInt, Data> Bits<Idx, Data> {
    /// Creates a new tree from `(Interval, Data)` pairs. Intervals are sorted by their start
    /// coordinates with a stable sort, so the insertion order of ties is preserved.
    pub fn new(iter: impl IntoIterator<Item = (Interval<Idx>, Data)>) -> Self {
        let iter = iter.into_iter();

        let explen = iter.size_hint().0;
        let mut starts = Vec::with_capacity(explen);
        let mut ends = Vec::with_capacity(explen);
        let mut data = Vec::with_capacity(explen);
        let mut max_len = Idx::zero();

        for (interval, idata) in iter.sorted_by_key(|(it, _)| it.start()) {
            starts.push(interval.start());
            ends.push(interval.end());
            data.push(idata);
            max_len = max_len.max(interval.len());
        }

        Self {
            data,
            starts,
            ends,
            max_len,
        }
    }

    #[inline]
    fn lower_bound(&self, start: Idx) -> usize {
        // No interval starting before `start - max_len` can reach the query.
        let boundary = start.saturating_sub(self.max_len);
        self.starts.partition_point(|x| *x < boundary)
    }

    /// Iterator over entries overlapping the given interval, in the order of their start.
    #[inline]
    pub fn query(&self, interval: Interval<Idx>) -> Iter<'_, Idx, Data> {
        Iter {
            query: interval,
            cursor: self.lower_bound(interval.start()),
            bits: self,
        }
    }

    pub fn builder() -> BitsBuilder<Idx, Data> {
        BitsBuilder::default()
    }
}

/// An iterator over overlapping intervals and data references produced by `Bits::query`.
pub struct Iter<'tree, Idx: PrimInt, Data> {
    query: Interval<Idx>,
    // The cursor might be behind the next overlapping interval, but never ahead of it.
    cursor: usize,
    bits: &'tree Bits<Idx, Data>,
}

impl<'tree, Idx: PrimInt, Data> Iterator for Iter<'tree, Idx, Data> {
    type Item = (Interval<Idx>, &'tree Data);

    fn next(&mut self) -> Option<Self::Item> {
        let bits = self.bits;
        while self.cursor < bits.starts.len() {
            let ind = self.cursor;
            if bits.starts[ind] >= self.query.end() {
                // Every remaining interval starts after the query
                self.cursor = bits.starts.len();
                return None;
            }
            self.cursor += 1;

            if bits.ends[ind] > self.query.start() {
                let interval = Interval::new(bits.starts[ind], bits.ends[ind]).ok()?;
                debug_assert!(interval.intersects(&self.query));
                return Some((interval, &bits.data[ind]));
            }
        }
        None
    }
}

impl<Idx: PrimInt, Data> ITree for Bits<Idx, Data> {
    type Idx = Idx;
    type Data = Data;

    fn len(&self) -> usize {
        self.starts.len()
    }

    fn query(
        &self,
        interval: Interval<Self::Idx>,
    ) -> impl Iterator<Item = (Interval<Self::Idx>, &Self::Data)> {
        Bits::query(self, interval)
    }
}
