use eyre::{eyre, Result};
use rayon::ThreadPoolBuilder;

use strandit_core_rs::loc::{Interval, Strand};
use strandit_core_rs::ngs::StrandMode;
use strandit_core_rs::source::{
    Alignment, AlignmentRecord, AlignmentSource, InMemory, InMemoryStream,
};
use strandit_rs::{
    AnnotationIndex, ContigFilter, Engine, Feature, FeatureConfig, InferenceConfig,
    StrandModeCall, StrandModeLabel, Warning,
};

const EPSILON: f64 = 1e-9;

type Index = AnnotationIndex<String, u32, String>;

fn transcripts() -> Result<Index> {
    AnnotationIndex::from_transcripts([
        ("T1".to_string(), "chr1".to_string(), Strand::Forward, Interval::new(0, 400_000)?),
        ("T1".to_string(), "chr1".to_string(), Strand::Forward, Interval::new(500_000, 600_000)?),
        ("T2".to_string(), "chr2".to_string(), Strand::Reverse, Interval::new(0, 10_000)?),
        ("T3".to_string(), "chr3".to_string(), Strand::Forward, Interval::new(0, 10_000)?),
        ("T4".to_string(), "chr3".to_string(), Strand::Reverse, Interval::new(5_000, 10_000)?),
    ])
}

fn single(contig: &str, start: u32, strand: Strand) -> Result<AlignmentRecord<String, u32>> {
    Ok(AlignmentRecord::Single(Alignment::new(
        contig.to_string(),
        Interval::new(start, start + 100)?,
        strand,
    )))
}

fn sample(contig: &str, n: u32, strand: Strand) -> Result<Vec<AlignmentRecord<String, u32>>> {
    (0..n).map(|i| single(contig, i % 300_000, strand)).collect()
}

fn engine(threads: usize) -> Result<Engine<String, u32>> {
    let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
    Ok(Engine::builder().with_thread_pool(pool).build())
}

#[test]
fn test_all_concordant_sample() -> Result<()> {
    let index = transcripts()?;
    let source = InMemory::new(sample("chr1", 1_000, Strand::Forward)?);

    let result =
        engine(1)?.infer_strand_mode(&index, [("S1", source)], &InferenceConfig::default())?;
    let row = &result.table[0].row;
    assert_eq!(row.strand_mode1_frac, Some(1.0));
    assert_eq!(row.strand_mode2_frac, Some(0.0));
    assert_eq!(row.n_alignments_used, 1_000);
    assert_eq!(result.call, StrandModeCall::Uniform(StrandModeLabel::Mode1));
    assert_eq!(result.call.as_ints(), Some(vec![1]));
    Ok(())
}

#[test]
fn test_balanced_sample_is_unstranded() -> Result<()> {
    let index = transcripts()?;
    let mut records = sample("chr1", 500, Strand::Forward)?;
    records.extend(sample("chr1", 500, Strand::Reverse)?);

    let result = engine(1)?.infer_strand_mode(
        &index,
        [("S1", InMemory::new(records))],
        &InferenceConfig::default(),
    )?;
    let row = &result.table[0].row;
    assert!((row.strand_mode1_frac.unwrap() - 0.5).abs() < EPSILON);
    assert!((row.strand_mode2_frac.unwrap() - 0.5).abs() < EPSILON);
    assert_eq!(result.call, StrandModeCall::Uniform(StrandModeLabel::Unstranded));
    assert_eq!(result.call.as_ints(), None);
    Ok(())
}

#[test]
fn test_chunk_cap_before_target() -> Result<()> {
    let index = transcripts()?;
    let source = InMemory::new(sample("chr1", 100_000, Strand::Forward)?);
    let config = InferenceConfig::default().with_chunk_size(5_000);

    let result = engine(1)?.infer_strand_mode(&index, [("S1", source)], &config)?;
    let row = &result.table[0];
    assert_eq!(row.row.n_alignments_used, 50_000);
    assert_eq!(
        row.warnings,
        vec![
            Warning::InsufficientData {
                chunks: 10,
                alignments: 50_000,
                target: 200_000
            },
            Warning::LowAlignmentCount {
                alignments: 50_000,
                minimum: 100_000
            },
        ]
    );
    Ok(())
}

#[test]
fn test_paired_end_dutp_library() -> Result<()> {
    let index = transcripts()?;
    // Mate 1 is antisense to the transcript, mate 2 is sense
    let records = (0..2_000u32)
        .map(|i| {
            Ok(AlignmentRecord::Paired {
                mate1: Alignment::new(
                    "chr1".to_string(),
                    Interval::new(i, i + 50)?,
                    Strand::Reverse,
                ),
                mate2: Alignment::new(
                    "chr1".to_string(),
                    Interval::new(i + 200, i + 250)?,
                    Strand::Forward,
                ),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let result = engine(1)?.infer_strand_mode(
        &index,
        [("S1", InMemory::new(records))],
        &InferenceConfig::default(),
    )?;
    assert_eq!(result.table[0].row.strand_mode2_frac, Some(1.0));
    assert_eq!(result.call, StrandModeCall::Uniform(StrandModeLabel::Mode2));
    Ok(())
}

#[test]
fn test_parallel_samples_keep_order() -> Result<()> {
    let index = transcripts()?;

    // Mixed sample: chr3 carries annotation on both strands in [5000, 10000)
    let mut mixed = sample("chr1", 600, Strand::Forward)?;
    mixed.extend(sample("chr2", 300, Strand::Forward)?);
    for i in 0..100 {
        mixed.push(single("chr3", 5_000 + i, Strand::Forward)?);
    }
    mixed.extend(sample("chrUn_KI270302v1", 1_000, Strand::Forward)?);

    let samples = vec![
        ("sense", InMemory::new(sample("chr1", 3_000, Strand::Forward)?)),
        ("antisense", InMemory::new(sample("chr1", 2_000, Strand::Reverse)?)),
        ("mixed", InMemory::new(mixed)),
    ];
    let config = InferenceConfig::default()
        .with_chunk_size(256)
        .with_contigs(ContigFilter::Standard);

    for threads in [1, 2, 3] {
        let result = engine(threads)?.infer_strand_mode(&index, samples.clone(), &config)?;
        let tags: Vec<_> = result.table.iter().map(|x| x.sample).collect();
        assert_eq!(tags, vec!["sense", "antisense", "mixed"]);
        assert_eq!(
            result.call,
            StrandModeCall::PerSample(vec![
                ("sense", StrandModeLabel::Mode1),
                ("antisense", StrandModeLabel::Mode2),
                ("mixed", StrandModeLabel::Ambiguous),
            ])
        );

        let mixed = &result.table[2];
        assert_eq!(mixed.row.n_alignments_used, 1_000);
        assert!((mixed.row.strand_mode1_frac.unwrap() - 0.6).abs() < EPSILON);
        assert!((mixed.row.strand_mode2_frac.unwrap() - 0.3).abs() < EPSILON);
        assert!((mixed.row.ambiguous_frac.unwrap() - 0.1).abs() < EPSILON);
        // Only the fourth chunk (chr2 + chr3) crosses the ambiguity ceiling
        assert_eq!(
            mixed.warnings,
            vec![
                Warning::HighAmbiguity {
                    fraction: 100.0 / 232.0,
                    ceiling: 0.1
                },
                Warning::LowAlignmentCount {
                    alignments: 1_000,
                    minimum: 100_000
                },
            ]
        );
        for row in &result.table[..2] {
            assert!(!row
                .warnings
                .iter()
                .any(|x| matches!(x, Warning::HighAmbiguity { .. })));
        }

        for row in &result.table {
            let sum = row.row.strand_mode1_frac.unwrap()
                + row.row.strand_mode2_frac.unwrap()
                + row.row.ambiguous_frac.unwrap();
            assert!((sum - 1.0).abs() < EPSILON, "{}: {sum}", row.sample);
        }
    }
    Ok(())
}

#[test]
fn test_sample_without_overlaps() -> Result<()> {
    let index = transcripts()?;
    let source = InMemory::new(sample("chr9", 100, Strand::Forward)?);

    let result =
        engine(1)?.infer_strand_mode(&index, [("S1", source)], &InferenceConfig::default())?;
    let row = &result.table[0].row;
    assert_eq!(row.n_alignments_used, 0);
    assert_eq!(row.strand_mode1_frac, None);
    assert_eq!(result.call, StrandModeCall::Uniform(StrandModeLabel::Ambiguous));
    Ok(())
}

#[derive(Clone)]
enum TestSource {
    Ready(InMemory<String, u32>),
    Broken,
}

impl AlignmentSource for TestSource {
    type Contig = String;
    type Idx = u32;
    type Stream = InMemoryStream<String, u32>;

    fn open(&self) -> Result<Self::Stream> {
        match self {
            TestSource::Ready(source) => source.open(),
            TestSource::Broken => Err(eyre!("Truncated file")),
        }
    }
}

#[test]
fn test_failed_sample_fails_the_run() -> Result<()> {
    let index = transcripts()?;
    let ready = TestSource::Ready(InMemory::new(sample("chr1", 100, Strand::Forward)?));

    for threads in [1, 2] {
        let samples = vec![
            ("ok", ready.clone()),
            ("broken", TestSource::Broken),
            ("ok-2", ready.clone()),
        ];
        let result =
            engine(threads)?.infer_strand_mode(&index, samples, &InferenceConfig::default());
        assert!(result.is_err());
    }
    Ok(())
}

#[test]
fn test_feature_strandedness_table() -> Result<()> {
    let features = vec![
        Feature::new(
            "G1".to_string(),
            "chr1".to_string(),
            Strand::Forward,
            vec![Interval::new(0, 1_000)?],
        )?,
        Feature::new(
            "G2".to_string(),
            "chr1".to_string(),
            Strand::Reverse,
            vec![Interval::new(5_000, 6_000)?, Interval::new(8_000, 9_000)?],
        )?,
        Feature::new(
            "G3".to_string(),
            "chr2".to_string(),
            Strand::Forward,
            vec![Interval::new(0, 1_000)?],
        )?,
    ];
    let index = AnnotationIndex::from_features(features);

    // G1: 90 concordant + 10 discordant, G2: 10 discordant only, G3: nothing
    let mut records = sample("chr1", 90, Strand::Forward)?;
    for i in 0..10 {
        records.push(single("chr1", 10 * i, Strand::Reverse)?);
        records.push(single("chr1", 8_000 + i, Strand::Forward)?);
    }
    let samples = vec![
        ("S1", InMemory::new(records)),
        ("S2", InMemory::new(vec![])),
    ];

    let config = FeatureConfig::default()
        .with_strand_mode(StrandMode::try_from(1i32)?)
        .with_chunk_size(7);
    let table = engine(2)?.feature_strandedness(&index, samples, &config)?;

    assert_eq!(table.n_features(), 3);
    assert_eq!(table.samples(), &["S1", "S2"]);
    assert_eq!(table.features()[1].segments().len(), 2);

    assert_eq!((table.concordant(0, 0), table.discordant(0, 0)), (90, 10));
    assert!((table.strandedness(0, 0).unwrap() - 0.9).abs() < EPSILON);
    assert!(table.p_value(0, 0) < 0.01);

    assert_eq!((table.concordant(1, 0), table.discordant(1, 0)), (0, 10));
    assert_eq!(table.strandedness(1, 0), Some(0.0));
    assert_eq!(table.p_value(1, 0), 0.0);

    assert_eq!(table.strandedness(2, 0), None);
    assert_eq!(table.p_value(2, 0), 0.0);

    assert!(table.column(1).concordant().iter().all(|x| *x == 0));
    assert!(table.column(1).strandedness().iter().all(Option::is_none));
    Ok(())
}

#[test]
fn test_invalid_strand_mode_is_fatal() {
    assert!(StrandMode::try_from(3i32).is_err());
    assert!(StrandMode::try_from(None::<i32>).is_err());
}
