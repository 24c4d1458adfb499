use strandit_core_rs::loc::{Interval, IntervalOp};

use super::tree::{Builder, ITree};

fn intersect<T: ITree<Idx = u32, Data = usize>>(
    tree: &T,
    start: u32,
    end: u32,
) -> Vec<(u32, u32, usize)> {
    let mut buffer = Vec::new();
    tree.intersect(&Interval::new(start, end).unwrap(), &mut buffer);
    buffer
        .into_iter()
        .map(|(it, data)| (it.start(), it.end(), *data))
        .collect()
}

fn empty_tree<B: Builder>(builder: B)
where
    B::Target: ITree<Idx = u32, Data = usize>,
{
    let tree = builder.build();
    assert!(tree.is_empty());
    assert!(intersect(&tree, 5, 15).is_empty());
}

fn single_interval_tree<B: Builder>(builder: B)
where
    B::Target: ITree<Idx = u32, Data = usize>,
{
    let tree = builder.add(Interval::new(10, 20).unwrap(), 1).build();
    assert_eq!(tree.len(), 1);

    // Off-range and touching queries
    for (start, end) in [(5, 9), (21, 25), (0, 10), (20, 30)] {
        assert!(intersect(&tree, start, end).is_empty(), "{start}-{end}");
    }

    // Intersecting queries
    for (start, end) in [(5, 15), (15, 25), (5, 25), (12, 13), (19, 20)] {
        assert_eq!(intersect(&tree, start, end), vec![(10, 20, 1)], "{start}-{end}");
    }
}

fn multi_interval_tree<B: Builder>(builder: B)
where
    B::Target: ITree<Idx = u32, Data = usize>,
{
    let tree = builder
        .extend([
            (Interval::new(10, 20).unwrap(), 3),
            (Interval::new(1, 10).unwrap(), 1),
            (Interval::new(5, 15).unwrap(), 2),
            (Interval::new(100, 1000).unwrap(), 4),
        ])
        .build();
    assert_eq!(tree.len(), 4);

    assert_eq!(
        intersect(&tree, 5, 15),
        vec![(1, 10, 1), (5, 15, 2), (10, 20, 3)]
    );
    assert_eq!(intersect(&tree, 15, 101), vec![(10, 20, 3), (100, 1000, 4)]);
    assert_eq!(intersect(&tree, 500, 501), vec![(100, 1000, 4)]);
    assert!(intersect(&tree, 20, 100).is_empty());

    let mut buffer = Vec::new();
    tree.intersect(&Interval::new(0, 2).unwrap(), &mut buffer);
    tree.intersect(&Interval::new(0, 2).unwrap(), &mut buffer);
    assert_eq!(buffer.len(), 2, "intersect must append to the buffer");
}

pub fn run_all<B: Builder + Clone>(builder: B)
where
    B::Target: ITree<Idx = u32, Data = usize>,
{
    empty_tree(builder.clone());
    single_interval_tree(builder.clone());
    multi_interval_tree(builder);
}
