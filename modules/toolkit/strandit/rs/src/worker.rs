use derive_getters::Dissolve;
use eyre::Result;

use strandit_core_rs::loc::Contig;
use strandit_core_rs::ngs::StrandMode;
use strandit_core_rs::num::PrimInt;
use strandit_core_rs::source::{Alignment, AlignmentRecord, AlignmentStream};

use crate::config::ContigFilter;

/// Per-thread scratch buffers reused across chunks and samples.
#[derive(Debug, Default, Dissolve)]
pub struct Worker<Ctg: Contig, Idx: PrimInt> {
    records: Vec<AlignmentRecord<Ctg, Idx>>,
    alignments: Vec<Alignment<Ctg, Idx>>,
}

impl<Ctg: Contig + AsRef<str>, Idx: PrimInt> Worker<Ctg, Idx> {
    /// Read the next chunk of records and resolve them into effective alignments located on
    /// the kept contigs. Returns the number of raw records read, zero once the stream is
    /// exhausted.
    pub fn next_chunk<St>(
        &mut self,
        stream: &mut St,
        chunk_size: usize,
        mode: StrandMode,
        contigs: &ContigFilter<Ctg>,
    ) -> Result<usize>
    where
        St: AlignmentStream<Contig = Ctg, Idx = Idx>,
    {
        self.records.clear();
        self.alignments.clear();
        stream.read_chunk(chunk_size, &mut self.records)?;

        for record in &self.records {
            record.resolve(mode, &mut self.alignments);
        }
        self.alignments.retain(|x| contigs.keeps(x.contig()));

        Ok(self.records.len())
    }

    pub fn alignments(&self) -> &[Alignment<Ctg, Idx>] {
        &self.alignments
    }
}
