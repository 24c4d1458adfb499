pub mod bam;
