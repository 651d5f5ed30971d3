//! Integer partitions of the number of leaves of a tree.
//!
//! A partition of `n` describes how the leaves of a tree are spread
//! across the children of its root. Partitions are generated as
//! ascending compositions, which gives the children of a node a canonical
//! order (by increasing number of leaves). The trivial partition `[n]` is
//! never produced since it would correspond to a unary root.
//!
//! The generation order is load-bearing: shape ranks are computed by
//! counting the trees under every partition that comes before a tree's
//! own partition.

/// Lazy iterator over the ascending partitions of an integer,
/// see [`partitions`].
#[derive(Debug, Clone)]
pub struct Partitions {
    parts: Vec<usize>,
    k: usize,
}

/// Ascending integer partitions of `n`, excluding the partition `[n]` itself.
/// ```
/// use ranktree::partition::partitions;
///
/// let parts: Vec<_> = partitions(4).collect();
/// assert_eq!(parts, vec![vec![1, 1, 1, 1], vec![1, 1, 2], vec![1, 3], vec![2, 2]]);
/// ```
pub fn partitions(n: usize) -> Partitions {
    if n == 0 {
        return Partitions {
            parts: vec![],
            k: 0,
        };
    }

    let mut parts = vec![0; n + 1];
    parts[1] = n;
    Partitions { parts, k: 1 }
}

impl Iterator for Partitions {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.k == 0 {
            return None;
        }

        let a = &mut self.parts;
        let mut k = self.k;
        let x = a[k - 1] + 1;
        let mut y = a[k] - 1;
        k -= 1;
        while x <= y {
            a[k] = x;
            y -= x;
            k += 1;
        }
        a[k] = x + y;
        self.k = k;

        // Reached the single part partition [n]
        if k == 0 {
            return None;
        }

        Some(a[..=k].to_vec())
    }
}

/// Splits `values` into maximal runs of consecutive elements that are `same`
/// as the first element of their run.
/// ```
/// use ranktree::partition::group_by_runs;
///
/// let groups = group_by_runs(&[1, 1, 2, 3, 3], |a, b| a == b);
/// assert_eq!(groups, vec![&[1, 1][..], &[2], &[3, 3]]);
/// ```
pub fn group_by_runs<T>(values: &[T], same: impl Fn(&T, &T) -> bool) -> Vec<&[T]> {
    let mut groups = vec![];
    let mut start = 0;
    for i in 1..=values.len() {
        if i == values.len() || !same(&values[start], &values[i]) {
            groups.push(&values[start..i]);
            start = i;
        }
    }

    groups
}

/// Groups consecutive equal parts of a partition.
pub fn group_partition(part: &[usize]) -> Vec<&[usize]> {
    group_by_runs(part, |a, b| a == b)
}
