use eyre::Result;

use crate::loc::Contig;
use crate::num::PrimInt;

use super::record::AlignmentRecord;

/// An open, ordered stream of alignment records. The stream is closed when dropped.
pub trait AlignmentStream {
    type Contig: Contig;
    type Idx: PrimInt;

    /// Replace the content of `saveto` with at most `max_records` next records.
    /// Leaving `saveto` empty signals that the stream is exhausted.
    fn read_chunk(
        &mut self,
        max_records: usize,
        saveto: &mut Vec<AlignmentRecord<Self::Contig, Self::Idx>>,
    ) -> Result<()>;
}

/// A handle to the alignments of a single sample. Each call to `open` starts a new stream from
/// the beginning, independent of any other stream opened from the same source.
pub trait AlignmentSource: Send + Sync {
    type Contig: Contig;
    type Idx: PrimInt;
    type Stream: AlignmentStream<Contig = Self::Contig, Idx = Self::Idx>;

    fn open(&self) -> Result<Self::Stream>;
}

impl<S: AlignmentSource + ?Sized> AlignmentSource for &S {
    type Contig = S::Contig;
    type Idx = S::Idx;
    type Stream = S::Stream;

    fn open(&self) -> Result<Self::Stream> {
        (**self).open()
    }
}
