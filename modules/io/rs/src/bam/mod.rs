pub use builder::ReaderBuilder;
pub use filter::ReadFilter;
pub use reader::{Reader, Stream};

mod builder;
mod bundler;
mod cigar;
mod filter;
mod reader;
