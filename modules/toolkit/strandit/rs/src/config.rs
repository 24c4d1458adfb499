use std::fmt::{Debug, Formatter};

use ahash::AHashSet;
use derive_getters::Dissolve;
use eyre::{ensure, Result};

use strandit_core_rs::loc::{is_standard_contig, Contig};
use strandit_core_rs::ngs::StrandMode;

/// Which contigs contribute alignments to the analysis.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum ContigFilter<Ctg: Contig> {
    #[default]
    All,
    /// Primary assembly chromosomes only, see [`is_standard_contig`].
    Standard,
    Only(AHashSet<Ctg>),
}

impl<Ctg: Contig> ContigFilter<Ctg> {
    pub fn only(contigs: impl IntoIterator<Item = Ctg>) -> Self {
        Self::Only(contigs.into_iter().collect())
    }
}

impl<Ctg: Contig + AsRef<str>> ContigFilter<Ctg> {
    pub fn keeps(&self, contig: &Ctg) -> bool {
        match self {
            ContigFilter::All => true,
            ContigFilter::Standard => is_standard_contig(contig.as_ref()),
            ContigFilter::Only(contigs) => contigs.contains(contig),
        }
    }
}

impl<Ctg: Contig> Debug for ContigFilter<Ctg> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ContigFilter::All => write!(f, "All"),
            ContigFilter::Standard => write!(f, "Standard"),
            ContigFilter::Only(contigs) => {
                let mut contigs: Vec<_> = contigs.iter().collect();
                contigs.sort();
                f.debug_tuple("Only").field(&contigs).finish()
            }
        }
    }
}

/// Cut-offs used to label a sample from its strand-mode fractions. All comparisons are strict.
#[derive(Clone, Copy, PartialEq, Debug, Dissolve)]
pub struct DecisionThresholds {
    pub stranded: f64,
    pub unstranded_low: f64,
    pub unstranded_high: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            stranded: 0.90,
            unstranded_low: 0.40,
            unstranded_high: 0.60,
        }
    }
}

impl DecisionThresholds {
    pub fn with_stranded(mut self, stranded: f64) -> Self {
        self.stranded = stranded;
        self
    }

    pub fn with_unstranded(mut self, low: f64, high: f64) -> Self {
        self.unstranded_low = low;
        self.unstranded_high = high;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("stranded", self.stranded),
            ("unstranded_low", self.unstranded_low),
            ("unstranded_high", self.unstranded_high),
        ] {
            ensure!(
                (0.0..=1.0).contains(&value),
                "Decision threshold '{name}' must be within [0, 1], got {value}"
            );
        }
        ensure!(
            self.unstranded_low <= self.unstranded_high,
            "Unstranded range is empty: {} > {}",
            self.unstranded_low,
            self.unstranded_high
        );
        Ok(())
    }
}

/// Parameters of the per-sample library strand-mode inference.
#[derive(Clone, PartialEq, Debug, Dissolve)]
pub struct InferenceConfig<Ctg: Contig> {
    /// Stop reading a sample once this many alignments overlapped the annotation.
    pub target_alignments: u64,
    /// Hard cap on the number of chunks read from one sample.
    pub max_chunks: usize,
    /// Number of records requested from the stream per chunk.
    pub chunk_size: usize,
    /// Samples with fewer overlapping alignments are reported as unreliable.
    pub min_alignments: u64,
    /// Maximum tolerated fraction of strand-ambiguous alignments in a chunk.
    pub ambiguity_ceiling: f64,
    pub contigs: ContigFilter<Ctg>,
    pub thresholds: DecisionThresholds,
}

impl<Ctg: Contig> Default for InferenceConfig<Ctg> {
    fn default() -> Self {
        Self {
            target_alignments: 200_000,
            max_chunks: 10,
            chunk_size: 1_000_000,
            min_alignments: 100_000,
            ambiguity_ceiling: 0.10,
            contigs: ContigFilter::All,
            thresholds: DecisionThresholds::default(),
        }
    }
}

impl<Ctg: Contig> InferenceConfig<Ctg> {
    pub fn with_target_alignments(mut self, target: u64) -> Self {
        self.target_alignments = target;
        self
    }

    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_min_alignments(mut self, min_alignments: u64) -> Self {
        self.min_alignments = min_alignments;
        self
    }

    pub fn with_ambiguity_ceiling(mut self, ceiling: f64) -> Self {
        self.ambiguity_ceiling = ceiling;
        self
    }

    pub fn with_contigs(mut self, contigs: ContigFilter<Ctg>) -> Self {
        self.contigs = contigs;
        self
    }

    pub fn with_thresholds(mut self, thresholds: DecisionThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.chunk_size > 0, "Chunk size must be positive");
        ensure!(self.max_chunks > 0, "Maximum number of chunks must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.ambiguity_ceiling),
            "Ambiguity ceiling must be within [0, 1], got {}",
            self.ambiguity_ceiling
        );
        self.thresholds.validate()
    }
}

/// Parameters of the per-feature strandedness estimation.
#[derive(Clone, PartialEq, Debug, Dissolve)]
pub struct FeatureConfig<Ctg: Contig> {
    /// Convention used to collapse read pairs into effective alignments.
    pub strand_mode: StrandMode,
    /// Credit strand-ambiguous alignments to both the concordant and the discordant feature.
    pub include_ambiguous: bool,
    /// Expected concordant proportion under the null hypothesis of the binomial test.
    pub background: f64,
    pub chunk_size: usize,
    pub ambiguity_ceiling: f64,
    pub contigs: ContigFilter<Ctg>,
}

impl<Ctg: Contig> Default for FeatureConfig<Ctg> {
    fn default() -> Self {
        Self {
            strand_mode: StrandMode::Mate1,
            include_ambiguous: false,
            background: 0.6,
            chunk_size: 1_000_000,
            ambiguity_ceiling: 0.10,
            contigs: ContigFilter::All,
        }
    }
}

impl<Ctg: Contig> FeatureConfig<Ctg> {
    pub fn with_strand_mode(mut self, strand_mode: StrandMode) -> Self {
        self.strand_mode = strand_mode;
        self
    }

    pub fn with_include_ambiguous(mut self, include_ambiguous: bool) -> Self {
        self.include_ambiguous = include_ambiguous;
        self
    }

    pub fn with_background(mut self, background: f64) -> Self {
        self.background = background;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_ambiguity_ceiling(mut self, ceiling: f64) -> Self {
        self.ambiguity_ceiling = ceiling;
        self
    }

    pub fn with_contigs(mut self, contigs: ContigFilter<Ctg>) -> Self {
        self.contigs = contigs;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.chunk_size > 0, "Chunk size must be positive");
        ensure!(
            self.background > 0.0 && self.background < 1.0,
            "Background proportion must be within (0, 1), got {}",
            self.background
        );
        ensure!(
            (0.0..=1.0).contains(&self.ambiguity_ceiling),
            "Ambiguity ceiling must be within [0, 1], got {}",
            self.ambiguity_ceiling
        );
        Ok(())
    }
}
