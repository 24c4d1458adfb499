pub use contig::{is_standard_contig, Contig};
pub use interval::{Interval, IntervalOp};
pub use per_strand::PerStrand;
pub use strand::Strand;

mod contig;
mod interval;
mod per_strand;
mod strand;
