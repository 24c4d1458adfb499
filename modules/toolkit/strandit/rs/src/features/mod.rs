pub use binomial::BinomialTest;
pub use engine::{FeatureStrandedness, FeatureStrandednessEngine};
pub use table::FeatureCountTable;

mod binomial;
mod engine;
mod table;
