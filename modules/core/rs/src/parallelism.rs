use std::thread::available_parallelism;

use eyre::Result;

/// Resolve a requested thread count against the `max` threads available on the machine.
/// Positive requests are capped by `max`, zero means a single thread, negative values mean
/// "all but N", e.g. -1 uses every core and -2 leaves one free.
fn resolve(requested: isize, max: usize) -> usize {
    if requested > 0 {
        (requested as usize).min(max)
    } else if requested == 0 {
        1
    } else {
        let spare = requested.unsigned_abs() - 1;
        max.saturating_sub(spare).max(1)
    }
}

/// Number of worker threads to use for the requested parallelism level.
pub fn available(requested: isize) -> Result<usize> {
    let max = available_parallelism()?.get();
    Ok(resolve(requested, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_thread_count() {
        for (requested, max, expected) in [
            (0, 8, 1),
            (1, 8, 1),
            (6, 8, 6),
            (8, 8, 8),
            (100, 8, 8),
            (-1, 8, 8),
            (-2, 8, 7),
            (-8, 8, 1),
            (-20, 8, 1),
        ] {
            assert_eq!(resolve(requested, max), expected, "{requested} of {max}");
        }
    }
}
