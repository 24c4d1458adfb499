pub mod genomic_index;
pub mod interval_tree;
