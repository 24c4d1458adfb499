use strandit_core_rs::{loc::Interval, num::PrimInt};

/// A builder for constructing interval tree data structures.
///
/// Intervals are added incrementally, `build` then produces the final structure optimized for
/// queries. Implementations must keep the relative insertion order of intervals that share the
/// same start coordinate.
pub trait Builder {
    type Target: ITree;

    /// Add an interval and its corresponding element to the tree.
    fn add(
        self,
        interval: Interval<<Self::Target as ITree>::Idx>,
        element: <Self::Target as ITree>::Data,
    ) -> Self;

    /// Extend the tree from an iterator of intervals and their corresponding elements.
    fn extend(
        self,
        data: impl IntoIterator<
            Item = (
                Interval<<Self::Target as ITree>::Idx>,
                <Self::Target as ITree>::Data,
            ),
        >,
    ) -> Self;

    fn build(self) -> Self::Target;
}

/// Interval tree for finding stored intervals that overlap with a query.
pub trait ITree {
    type Idx: PrimInt;
    type Data;

    /// Number of stored intervals.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all entries whose intervals intersect with the query.
    fn query(
        &self,
        interval: Interval<Self::Idx>,
    ) -> impl Iterator<Item = (Interval<Self::Idx>, &Self::Data)>;

    /// Find all entries whose intervals intersect with the query. Results are appended to the
    /// `buffer`, previous content is preserved.
    fn intersect<'tree>(
        &'tree self,
        interval: &Interval<Self::Idx>,
        buffer: &mut Vec<(Interval<Self::Idx>, &'tree Self::Data)>,
    ) {
        buffer.extend(self.query(*interval));
    }
}
