use std::fmt::{Debug, Display};
use std::ops::Range;
use std::rc::Rc;
use std::sync::Arc;

use derive_getters::Dissolve;
use eyre::{eyre, Report, Result};
use impl_tools::autoimpl;

use crate::num::PrimInt;

/// Interval is a half-open genomic region [start, end).
/// Empty intervals (start == end) and intervals with negative length are not allowed.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Dissolve)]
pub struct Interval<Idx: PrimInt> {
    start: Idx,
    end: Idx,
}

/// Trait for types that can be generally viewed as half-open genomic intervals [start, end).
#[autoimpl(for <T: trait + ?Sized> &T, Box<T>, Rc<T>, Arc<T>)]
#[allow(clippy::len_without_is_empty)]
pub trait IntervalOp {
    type Idx: PrimInt;

    fn start(&self) -> Self::Idx;

    fn end(&self) -> Self::Idx;

    fn len(&self) -> Self::Idx {
        self.end() - self.start()
    }

    /// Check if the interval-like object intersects with another interval-like object.
    /// The condition is strict and doesn't allow touching intervals.
    fn intersects(&self, other: &Self) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }

    /// Check if the interval-like object touches another interval-like object.
    fn touches(&self, other: &Self) -> bool {
        self.start() == other.end() || self.end() == other.start()
    }

    fn as_interval(&self) -> Interval<Self::Idx> {
        Interval {
            start: self.start(),
            end: self.end(),
        }
    }
}

impl<T: PrimInt> IntervalOp for Interval<T> {
    type Idx = T;

    #[inline(always)]
    fn start(&self) -> Self::Idx {
        self.start
    }
    #[inline(always)]
    fn end(&self) -> Self::Idx {
        self.end
    }
}

impl<Idx: PrimInt> Interval<Idx> {
    pub fn new(start: Idx, end: Idx) -> Result<Self> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(eyre!("Invalid interval: start ({start:?}) >= end ({end:?})"))
        }
    }

    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Smallest interval covering both intervals, including the gap between them (if any).
    pub fn span(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Merge overlapping and touching intervals. The result is sorted by start coordinate.
    pub fn merge(intervals: &mut [Self]) -> Vec<Self> {
        intervals.sort();

        let mut merged: Vec<Self> = Vec::with_capacity(intervals.len());
        for current in intervals.iter() {
            match merged.last_mut() {
                Some(last) if current.start <= last.end => {
                    last.end = last.end.max(current.end);
                }
                _ => merged.push(*current),
            }
        }
        merged
    }

    pub fn cast<T: PrimInt>(&self) -> Option<Interval<T>> {
        match (T::from(self.start), T::from(self.end)) {
            (Some(start), Some(end)) => Some(Interval { start, end }),
            _ => None,
        }
    }
}

impl<Idx: PrimInt + Display> Display for Interval<Idx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl<Idx: PrimInt> TryFrom<Range<Idx>> for Interval<Idx> {
    type Error = Report;

    fn try_from(value: Range<Idx>) -> Result<Self, Self::Error> {
        Self::new(value.start, value.end)
    }
}

impl<Idx: PrimInt> PartialEq<(Idx, Idx)> for Interval<Idx> {
    fn eq(&self, other: &(Idx, Idx)) -> bool {
        self.start == other.0 && self.end == other.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct() {
        assert_eq!(Interval::new(0, 10).unwrap(), (0, 10));
        assert!(Interval::new(1, 0).is_err());
        assert!(Interval::new(0, 0).is_err());
        assert!(Interval::try_from(5..3).is_err());
    }

    #[test]
    fn test_intersects() {
        let interval = Interval::new(1, 10).unwrap();
        assert!(!interval.intersects(&Interval::new(0, 1).unwrap()));
        assert!(interval.intersects(&Interval::new(0, 2).unwrap()));
        assert!(interval.intersects(&Interval::new(9, 10).unwrap()));
        assert!(!interval.intersects(&Interval::new(10, 11).unwrap()));
        assert!(interval.touches(&Interval::new(10, 11).unwrap()));
    }

    #[test]
    fn test_span() {
        let left = Interval::new(1, 5).unwrap();
        let right = Interval::new(20, 30).unwrap();
        assert_eq!(left.span(&right), (1, 30));
        assert_eq!(right.span(&left), (1, 30));
        assert_eq!(left.span(&left), left);
    }

    #[test]
    fn test_merge() {
        let mut intervals = vec![
            Interval::new(10, 20).unwrap(),
            Interval::new(1, 5).unwrap(),
            Interval::new(5, 7).unwrap(),
            Interval::new(15, 25).unwrap(),
            Interval::new(30, 31).unwrap(),
        ];
        assert_eq!(
            Interval::merge(&mut intervals),
            vec![
                Interval::new(1, 7).unwrap(),
                Interval::new(10, 25).unwrap(),
                Interval::new(30, 31).unwrap(),
            ]
        );
        assert!(Interval::<u32>::merge(&mut []).is_empty());
    }

    #[test]
    fn test_cast() {
        let interval = Interval::new(1u64, 10).unwrap();
        assert_eq!(interval.cast::<i32>(), Some(Interval::new(1, 10).unwrap()));
        assert_eq!(Interval::new(-5i32, 3).unwrap().cast::<u32>(), None);
    }
}
