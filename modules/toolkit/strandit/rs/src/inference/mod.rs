pub use classifier::SampleStrandClassifier;
pub use decision::{StrandModeCall, StrandModeDecision, StrandModeLabel};

mod classifier;
mod decision;
