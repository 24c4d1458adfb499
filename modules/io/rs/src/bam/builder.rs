use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use eyre::{ensure, Result, WrapErr};
use noodles::bam;

use strandit_core_rs::ngs::Layout;

use super::filter::ReadFilter;
use super::reader::Reader;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderBuilder {
    filename: PathBuf,
    layout: Option<Layout>,
    minmapq: Option<u8>,
}

impl ReaderBuilder {
    pub fn new<T: Into<PathBuf>>(filename: T) -> Self {
        Self {
            filename: filename.into(),
            layout: None,
            minmapq: None,
        }
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_minmapq(mut self, minmapq: u8) -> Self {
        self.minmapq = Some(minmapq);
        self
    }

    /// Validate the file and cache the reference sequence names from its header.
    pub fn build(self) -> Result<Reader> {
        ensure!(
            self.filename.is_file(),
            "BAM file does not exist: {}",
            self.filename.display()
        );

        let file = File::open(&self.filename)
            .wrap_err_with(|| format!("Failed to open {}", self.filename.display()))?;
        let header = bam::io::Reader::new(file)
            .read_header()
            .wrap_err_with(|| format!("Failed to read BAM header: {}", self.filename.display()))?;
        let contigs: Vec<String> = header
            .reference_sequences()
            .keys()
            .map(|name| name.to_string())
            .collect();

        let layout = self.layout.unwrap_or_default();
        Ok(Reader::new(
            self.filename,
            Arc::new(contigs),
            layout,
            ReadFilter::new(layout, self.minmapq.unwrap_or(0)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let result = ReaderBuilder::new("/nonexistent/sample.bam")
            .with_layout(Layout::Paired)
            .with_minmapq(10)
            .build();
        assert!(result.is_err());
    }
}
