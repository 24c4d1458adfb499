use std::io;

use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::cigar::Op;

/// Number of reference bases covered by the CIGAR, i.e. the distance between the first and the
/// last aligned reference position (deletions and skipped regions included).
pub fn reference_length(cigar: impl Iterator<Item = io::Result<Op>>) -> io::Result<usize> {
    let mut length = 0;
    for op in cigar {
        let op = op?;
        match op.kind() {
            Kind::Match
            | Kind::SequenceMatch
            | Kind::SequenceMismatch
            | Kind::Deletion
            | Kind::Skip => length += op.len(),
            Kind::Insertion | Kind::SoftClip | Kind::HardClip | Kind::Pad => {}
        }
    }
    Ok(length)
}
