pub use annotation::{AnnotationIndex, Feature, Matches};
pub use config::{ContigFilter, DecisionThresholds, FeatureConfig, InferenceConfig};
pub use engine::{Engine, EngineBuilder};
pub use features::{BinomialTest, FeatureCountTable, FeatureStrandedness, FeatureStrandednessEngine};
pub use inference::{SampleStrandClassifier, StrandModeCall, StrandModeDecision, StrandModeLabel};
pub use overlap::{AlignmentOverlap, OverlapCounter, OverlapTally};
pub use result::{SampleRow, StrandModeResult, StrandednessRow, Warning};
pub use worker::Worker;

mod annotation;
mod config;
mod engine;
mod features;
mod inference;
mod overlap;
mod result;
mod worker;
