use std::cell::RefCell;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

use eyre::{eyre, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use thread_local::ThreadLocal;

use strandit_core_rs::loc::Contig;
use strandit_core_rs::num::PrimInt;
use strandit_core_rs::parallelism;
use strandit_core_rs::source::AlignmentSource;

use crate::annotation::AnnotationIndex;
use crate::config::{FeatureConfig, InferenceConfig};
use crate::features::{FeatureCountTable, FeatureStrandednessEngine};
use crate::inference::{SampleStrandClassifier, StrandModeDecision};
use crate::result::StrandModeResult;
use crate::worker::Worker;

pub struct EngineBuilder<Ctg: Contig, Idx: PrimInt> {
    thread_pool: Option<ThreadPool>,
    _phantom: PhantomData<(Ctg, Idx)>,
}

impl<Ctg: Contig, Idx: PrimInt> Default for EngineBuilder<Ctg, Idx> {
    fn default() -> Self {
        Self {
            thread_pool: None,
            _phantom: PhantomData,
        }
    }
}

impl<Ctg: Contig, Idx: PrimInt> EngineBuilder<Ctg, Idx> {
    pub fn with_thread_pool(mut self, pool: ThreadPool) -> Self {
        self.thread_pool = Some(pool);
        self
    }

    /// Dedicated pool with the requested number of threads; negative values mean "all but N".
    pub fn with_threads(self, requested: isize) -> Result<Self> {
        let threads = parallelism::available(requested)?;
        let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
        Ok(self.with_thread_pool(pool))
    }

    pub fn build(self) -> Engine<Ctg, Idx> {
        Engine {
            thread_pool: self.thread_pool,
            workers: ThreadLocal::new(),
        }
    }
}

/// Runs the per-sample analyses over a set of samples. Samples are processed independently,
/// in parallel when more than one thread is available; results keep the order of the samples.
pub struct Engine<Ctg: Contig, Idx: PrimInt> {
    thread_pool: Option<ThreadPool>,
    workers: ThreadLocal<RefCell<Worker<Ctg, Idx>>>,
}

impl<Ctg: Contig + AsRef<str>, Idx: PrimInt> Engine<Ctg, Idx> {
    pub fn builder() -> EngineBuilder<Ctg, Idx> {
        EngineBuilder::default()
    }

    /// Infer the library strand mode of every sample and the dataset-level call.
    pub fn infer_strand_mode<Elt, Tag, Src>(
        &mut self,
        index: &AnnotationIndex<Ctg, Idx, Elt>,
        samples: impl IntoIterator<Item = (Tag, Src)>,
        config: &InferenceConfig<Ctg>,
    ) -> Result<StrandModeResult<Tag>>
    where
        Elt: Send + Sync,
        Tag: Clone + Debug + Send + Sync,
        Src: AlignmentSource<Contig = Ctg, Idx = Idx>,
    {
        config.validate()?;
        let samples: Vec<_> = samples.into_iter().collect();

        let classifier = SampleStrandClassifier::new(index, config);
        let table = self.run(&samples, |(tag, source), worker| {
            classifier.classify(tag.clone(), source, worker)
        })?;

        let call = StrandModeDecision::new(config.thresholds)
            .decide(table.iter().map(|x| (&x.sample, &x.row)));
        Ok(StrandModeResult { call, table })
    }

    /// Per-feature strandedness for every sample, stacked into a features x samples table.
    pub fn feature_strandedness<Elt, Tag, Src>(
        &mut self,
        index: &AnnotationIndex<Ctg, Idx, Elt>,
        samples: impl IntoIterator<Item = (Tag, Src)>,
        config: &FeatureConfig<Ctg>,
    ) -> Result<FeatureCountTable<Ctg, Idx, Elt, Tag>>
    where
        Elt: Clone + Send + Sync,
        Tag: Debug + Send + Sync,
        Src: AlignmentSource<Contig = Ctg, Idx = Idx>,
    {
        let engine = FeatureStrandednessEngine::new(index, config)?;
        let samples: Vec<_> = samples.into_iter().collect();

        let columns = self.run(&samples, |(tag, source), worker| {
            engine.count(tag, source, worker)
        })?;

        let tags = samples.into_iter().map(|(tag, _)| tag).collect();
        FeatureCountTable::new(index.features().to_vec(), tags, columns)
    }

    fn run<T, R, F>(&mut self, tasks: &[T], task: F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T, &mut Worker<Ctg, Idx>) -> Result<R> + Sync,
    {
        match &self.thread_pool {
            Some(pool) => pool.install(|| self.fan_out(tasks, &task)),
            None => self.fan_out(tasks, &task),
        }
    }

    fn fan_out<T, R, F>(&self, tasks: &[T], task: &F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T, &mut Worker<Ctg, Idx>) -> Result<R> + Sync,
    {
        let run = |item: &T| {
            let mut worker = self.workers.get_or_default().borrow_mut();
            task(item, &mut worker)
        };

        if tasks.len() <= 1 || rayon::current_num_threads() <= 1 {
            return tasks.iter().map(run).collect();
        }

        let has_failed = AtomicBool::new(false);
        let results: Vec<Option<R>> = tasks
            .par_iter()
            .enumerate()
            .map(|(ind, item)| {
                // Skip the remaining samples if any of the workers has failed
                if has_failed.load(Ordering::Relaxed) {
                    return None;
                }
                match run(item) {
                    Ok(result) => Some(result),
                    Err(err) => {
                        has_failed.store(true, Ordering::Relaxed);
                        log::error!("Sample #{ind} failed: {err:?}");
                        None
                    }
                }
            })
            .collect();

        if has_failed.into_inner() {
            return Err(eyre!("Processing failed for at least one sample. See log for details."));
        }
        Ok(results.into_iter().flatten().collect())
    }
}
