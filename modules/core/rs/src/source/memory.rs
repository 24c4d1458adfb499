use std::sync::Arc;

use eyre::Result;

use crate::loc::Contig;
use crate::num::PrimInt;

use super::record::AlignmentRecord;
use super::stream::{AlignmentSource, AlignmentStream};

/// Alignment source backed by records that are already in memory. Cloning the source is cheap,
/// all clones and opened streams share the same records.
#[derive(Clone, Debug)]
pub struct InMemory<Ctg: Contig, Idx: PrimInt> {
    records: Arc<Vec<AlignmentRecord<Ctg, Idx>>>,
}

impl<Ctg: Contig, Idx: PrimInt> InMemory<Ctg, Idx> {
    pub fn new(records: Vec<AlignmentRecord<Ctg, Idx>>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<Ctg: Contig, Idx: PrimInt> FromIterator<AlignmentRecord<Ctg, Idx>> for InMemory<Ctg, Idx> {
    fn from_iter<T: IntoIterator<Item = AlignmentRecord<Ctg, Idx>>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug)]
pub struct InMemoryStream<Ctg: Contig, Idx: PrimInt> {
    records: Arc<Vec<AlignmentRecord<Ctg, Idx>>>,
    cursor: usize,
}

impl<Ctg: Contig, Idx: PrimInt> AlignmentStream for InMemoryStream<Ctg, Idx> {
    type Contig = Ctg;
    type Idx = Idx;

    fn read_chunk(
        &mut self,
        max_records: usize,
        saveto: &mut Vec<AlignmentRecord<Ctg, Idx>>,
    ) -> Result<()> {
        saveto.clear();
        let end = self.records.len().min(self.cursor.saturating_add(max_records));
        saveto.extend_from_slice(&self.records[self.cursor..end]);
        self.cursor = end;
        Ok(())
    }
}

impl<Ctg: Contig, Idx: PrimInt> AlignmentSource for InMemory<Ctg, Idx> {
    type Contig = Ctg;
    type Idx = Idx;
    type Stream = InMemoryStream<Ctg, Idx>;

    fn open(&self) -> Result<Self::Stream> {
        Ok(InMemoryStream {
            records: Arc::clone(&self.records),
            cursor: 0,
        })
    }
}
