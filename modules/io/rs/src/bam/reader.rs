use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use derive_getters::Getters;
use derive_more::Constructor;
use eyre::{eyre, Result, WrapErr};
use noodles::sam::alignment::record::data::field::{Tag, Value};
use noodles::{bam, bgzf};

use strandit_core_rs::loc::{Interval, Strand};
use strandit_core_rs::ngs::Layout;
use strandit_core_rs::source::{Alignment, AlignmentRecord, AlignmentSource, AlignmentStream};

use super::bundler::{Bundler, MateKey};
use super::cigar;
use super::filter::ReadFilter;

/// Alignment source reading a BAM file sequentially from the beginning.
#[derive(Debug, Clone, Constructor, Getters)]
pub struct Reader {
    filename: PathBuf,
    contigs: Arc<Vec<String>>,
    layout: Layout,
    filter: ReadFilter,
}

impl AlignmentSource for Reader {
    type Contig = String;
    type Idx = u64;
    type Stream = Stream;

    fn open(&self) -> Result<Self::Stream> {
        let file = File::open(&self.filename)
            .wrap_err_with(|| format!("Failed to open {}", self.filename.display()))?;
        let mut inner = bam::io::Reader::new(file);
        inner.read_header()?;

        Ok(Stream {
            filename: self.filename.clone(),
            inner,
            contigs: Arc::clone(&self.contigs),
            layout: self.layout,
            filter: self.filter,
            record: bam::Record::default(),
            bundler: Bundler::default(),
        })
    }
}

/// An open BAM file. The file handle is released when the stream is dropped.
pub struct Stream {
    filename: PathBuf,
    inner: bam::io::Reader<bgzf::io::Reader<File>>,
    contigs: Arc<Vec<String>>,
    layout: Layout,
    filter: ReadFilter,
    record: bam::Record,
    bundler: Bundler<String, u64>,
}

impl Stream {
    fn to_alignment(&self, record: &bam::Record) -> Result<Option<Alignment<String, u64>>> {
        let flags = record.flags();
        let mapq = record.mapping_quality().map(|x| x.get());
        if !self.filter.accepts(u16::from(flags), mapq) {
            return Ok(None);
        }

        let (id, start) = match (
            record.reference_sequence_id().transpose()?,
            record.alignment_start().transpose()?,
        ) {
            (Some(id), Some(start)) => (id, start),
            _ => return Ok(None),
        };
        let contig = self
            .contigs
            .get(id)
            .ok_or_else(|| eyre!("Reference sequence ID {id} is missing in the BAM header"))?;

        let length = cigar::reference_length(record.cigar().iter())?;
        if length == 0 {
            return Ok(None);
        }
        // 1-based closed -> 0-based half-open
        let start = (start.get() - 1) as u64;
        let interval = Interval::new(start, start + length as u64)?;

        let strand = if flags.is_reverse_complemented() {
            Strand::Reverse
        } else {
            Strand::Forward
        };
        Ok(Some(Alignment::new(contig.clone(), interval, strand)))
    }

    fn mate_key(record: &bam::Record) -> Result<MateKey> {
        let name = record.name().map(|name| name.to_vec()).unwrap_or_default();
        let hit_index = match record.data().get(&Tag::HIT_INDEX).transpose()? {
            None => None,
            Some(Value::Int8(x)) => Some(x as i64),
            Some(Value::UInt8(x)) => Some(x as i64),
            Some(Value::Int16(x)) => Some(x as i64),
            Some(Value::UInt16(x)) => Some(x as i64),
            Some(Value::Int32(x)) => Some(x as i64),
            Some(Value::UInt32(x)) => Some(x as i64),
            Some(_) => return Err(eyre!("HI tag must be an integer")),
        };
        Ok((name, hit_index))
    }
}

impl AlignmentStream for Stream {
    type Contig = String;
    type Idx = u64;

    fn read_chunk(
        &mut self,
        max_records: usize,
        saveto: &mut Vec<AlignmentRecord<String, u64>>,
    ) -> Result<()> {
        saveto.clear();
        while saveto.len() < max_records {
            let read = self
                .inner
                .read_record(&mut self.record)
                .wrap_err_with(|| format!("Failed to read {}", self.filename.display()))?;
            if read == 0 {
                if self.bundler.pending() > 0 {
                    log::warn!(
                        "{} mates without a partner were skipped in {}",
                        self.bundler.pending(),
                        self.filename.display()
                    );
                    self.bundler.clear();
                }
                break;
            }

            let alignment = match self.to_alignment(&self.record)? {
                Some(alignment) => alignment,
                None => continue,
            };
            match self.layout {
                Layout::Single => saveto.push(AlignmentRecord::Single(alignment)),
                Layout::Paired => {
                    let key = Self::mate_key(&self.record)?;
                    let is_mate1 = self.record.flags().is_first_segment();
                    if let Some(pair) = self.bundler.push(key, alignment, is_mate1) {
                        saveto.push(pair);
                    }
                }
            }
        }
        Ok(())
    }
}
