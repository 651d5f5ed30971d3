//! Exact integer combinatorics used to rank and unrank trees.
//!
//! All counts and ranks are [`BigUint`]: the number of trees grows
//! super-exponentially with the number of leaves and overflows `u64`
//! well before 30 leaves.
//!
//! Combinations are ordered lexicographically by position in the
//! universe they are drawn from, so `[0, 1]` comes before `[0, 2]`
//! which comes before `[1, 2]`.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::errors::RankError;

/// Number of ways to choose `k` items out of `n`, without order and without replacement.
/// This is 0 when `k > n`.
/// ```
/// use num_bigint::BigUint;
/// use ranktree::combinatorics::comb;
///
/// assert_eq!(comb(5u32, 2), BigUint::from(10u32));
/// assert_eq!(comb(5u32, 5), BigUint::from(1u32));
/// assert_eq!(comb(2u32, 3), BigUint::from(0u32));
/// ```
pub fn comb(n: impl Into<BigUint>, k: usize) -> BigUint {
    let n: BigUint = n.into();
    let k_big = BigUint::from(k);
    if k_big > n {
        return BigUint::zero();
    }

    // C(n, k) == C(n, n - k), iterate over the smaller of the two
    let complement = &n - &k_big;
    let k = complement.to_usize().map_or(k, |c| c.min(k));
    let base = n - k;

    // After step i, res == C(base + i, i) so every division is exact
    let mut res = BigUint::one();
    for i in 1..=k {
        res *= &base + i;
        res /= i;
    }

    res
}

/// Also called multichoose, the number of ways to choose `k` items
/// out of `n` without order but *with* replacement.
/// ```
/// use num_bigint::BigUint;
/// use ranktree::combinatorics::comb_with_replacement;
///
/// assert_eq!(comb_with_replacement(3u32, 2), BigUint::from(6u32));
/// assert_eq!(comb_with_replacement(0u32, 0), BigUint::from(1u32));
/// ```
pub fn comb_with_replacement(n: impl Into<BigUint>, k: usize) -> BigUint {
    let n: BigUint = n.into();
    if k == 0 {
        return BigUint::one();
    }
    if n.is_zero() {
        return BigUint::zero();
    }
    comb(n + k - 1u32, k)
}

/// Rank of `combination` among all the combinations of the same size
/// drawn from `elements`, ordered lexicographically by position in `elements`.
/// ```
/// use num_bigint::BigUint;
/// use ranktree::combinatorics::rank;
///
/// let elements = ['a', 'b', 'c', 'd'];
/// assert_eq!(rank(&['a', 'b'], &elements).unwrap(), BigUint::from(0u32));
/// assert_eq!(rank(&['b', 'd'], &elements).unwrap(), BigUint::from(4u32));
/// ```
pub fn rank<T: PartialEq>(combination: &[T], elements: &[T]) -> Result<BigUint, RankError> {
    let indices = combination
        .iter()
        .map(|x| {
            elements
                .iter()
                .position(|e| e == x)
                .ok_or_else(|| RankError::invalid("combination element missing from universe"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if indices.windows(2).any(|w| w[0] >= w[1]) {
        return Err(RankError::invalid(
            "combination elements must be strictly increasing within the universe",
        ));
    }

    Ok(from_range_rank(&indices, elements.len()))
}

/// Rank of a strictly increasing combination of integers from `[0, n)`
fn from_range_rank(combination: &[usize], n: usize) -> BigUint {
    let mut total = BigUint::zero();
    let mut n = n;
    let mut start = 0;
    // Number of elements removed from the front of the universe
    let mut shift = 0;

    loop {
        let k = combination.len() - start;
        if k == 0 || k == n {
            return total;
        }

        if combination[start] - shift == 0 {
            start += 1;
        } else {
            // Every combination that contains the current first element precedes us
            total += comb(n - 1, k - 1);
        }
        shift += 1;
        n -= 1;
    }
}

/// Combination of `k` items from `elements` with the given lexicographic `rank`.
/// ```
/// use num_bigint::BigUint;
/// use ranktree::combinatorics::unrank;
///
/// let elements = ['a', 'b', 'c', 'd'];
/// let c = unrank(&BigUint::from(4u32), &elements, 2).unwrap();
/// assert_eq!(c, vec!['b', 'd']);
/// ```
pub fn unrank<T: Clone>(rank: &BigUint, elements: &[T], k: usize) -> Result<Vec<T>, RankError> {
    let n = elements.len();
    if k > n {
        return Err(RankError::invalid(format!(
            "cannot choose {k} elements out of {n}"
        )));
    }
    if rank >= &comb(n, k) {
        return Err(RankError::invalid(format!(
            "rank {rank} is out of range for {k}-combinations of {n} elements"
        )));
    }

    let mut rank = rank.clone();
    let mut k = k;
    let mut chosen = Vec::with_capacity(k);
    for (i, element) in elements.iter().enumerate() {
        if k == 0 {
            break;
        }
        // Number of combinations that include this element
        let including = comb(n - i - 1, k - 1);
        if rank < including {
            chosen.push(element.clone());
            k -= 1;
        } else {
            rank -= including;
        }
    }

    Ok(chosen)
}

/// Rank of a non-decreasing `combination` among all the combinations with
/// replacement of the same size drawn from `[0, n)`.
/// ```
/// use num_bigint::BigUint;
/// use ranktree::combinatorics::with_replacement_rank;
///
/// let c = [BigUint::from(1u32), BigUint::from(2u32)];
/// // [0,0] [0,1] [0,2] [1,1] [1,2] [2,2]
/// assert_eq!(with_replacement_rank(&c, &BigUint::from(3u32)).unwrap(), BigUint::from(4u32));
/// ```
pub fn with_replacement_rank(combination: &[BigUint], n: &BigUint) -> Result<BigUint, RankError> {
    if combination.iter().any(|x| x >= n) {
        return Err(RankError::invalid(format!(
            "combination values must be smaller than {n}"
        )));
    }
    if combination.windows(2).any(|w| w[0] > w[1]) {
        return Err(RankError::invalid("combination must be non-decreasing"));
    }

    Ok(with_replacement_rank_unchecked(combination, n))
}

/// Same as [`with_replacement_rank`] for input that is already known to be valid.
pub(crate) fn with_replacement_rank_unchecked(combination: &[BigUint], n: &BigUint) -> BigUint {
    let mut total = BigUint::zero();
    let mut n = n.clone();
    let mut base = BigUint::zero();

    for (i, x) in combination.iter().enumerate() {
        let k = combination.len() - i;
        let j = x - &base;
        // Multisets whose minimum is smaller than j:
        // sum_{i < j} mc(n - i, k - 1) == mc(n, k) - mc(n - j, k)
        total += comb_with_replacement(n.clone(), k) - comb_with_replacement(&n - &j, k);
        n -= &j;
        base = x.clone();
    }

    total
}

/// Combination with replacement of `k` integers from `[0, n)` with the given lexicographic `rank`.
/// ```
/// use num_bigint::BigUint;
/// use ranktree::combinatorics::with_replacement_unrank;
///
/// let c = with_replacement_unrank(&BigUint::from(4u32), &BigUint::from(3u32), 2).unwrap();
/// assert_eq!(c, vec![BigUint::from(1u32), BigUint::from(2u32)]);
/// ```
pub fn with_replacement_unrank(
    rank: &BigUint,
    n: &BigUint,
    k: usize,
) -> Result<Vec<BigUint>, RankError> {
    if rank >= &comb_with_replacement(n.clone(), k) {
        return Err(RankError::invalid(format!(
            "rank {rank} is out of range for {k}-multisets of {n} elements"
        )));
    }

    let mut rank = rank.clone();
    let mut n = n.clone();
    let mut base = BigUint::zero();
    let mut chosen = Vec::with_capacity(k);

    for k in (1..=k).rev() {
        let all = comb_with_replacement(n.clone(), k);
        // Smallest j such that fewer than `all - rank` multisets have a minimum > j,
        // mc(n - j - 1, k) is decreasing in j
        let target = &all - &rank;
        let (mut lo, mut hi) = (BigUint::zero(), &n - 1u32);
        while lo < hi {
            let mid: BigUint = (&lo + &hi) / 2u32;
            if comb_with_replacement(&n - &mid - 1u32, k) < target {
                hi = mid;
            } else {
                lo = mid + 1u32;
            }
        }
        let j = lo;

        rank -= all - comb_with_replacement(&n - &j, k);
        base += &j;
        n -= &j;
        chosen.push(base.clone());
    }

    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn big(values: &[usize]) -> Vec<BigUint> {
        values.iter().map(|&v| BigUint::from(v)).collect()
    }

    #[test]
    fn binomial_coefficients() {
        let pascal = [
            vec![1],
            vec![1, 1],
            vec![1, 2, 1],
            vec![1, 3, 3, 1],
            vec![1, 4, 6, 4, 1],
            vec![1, 5, 10, 10, 5, 1],
        ];
        for (n, row) in pascal.iter().enumerate() {
            for (k, expected) in row.iter().enumerate() {
                assert_eq!(comb(n, k), BigUint::from(*expected as u32), "C({n},{k})");
            }
            assert!(comb(n, n + 1).is_zero());
        }
    }

    #[test]
    fn binomial_does_not_overflow() {
        // C(100, 50) does not fit in a u64
        let expected: BigUint = "100891344545564193334812497256".parse().unwrap();
        assert_eq!(comb(100u32, 50), expected);
    }

    #[test]
    fn multichoose() {
        assert_eq!(comb_with_replacement(1u32, 5), BigUint::one());
        assert_eq!(comb_with_replacement(4u32, 2), BigUint::from(10u32));
        assert!(comb_with_replacement(0u32, 3).is_zero());
    }

    #[test]
    fn combination_rank_unrank() {
        for n in 0..11 {
            let nums: Vec<usize> = (0..n).collect();
            for k in 0..n {
                for (expected, c) in nums.iter().copied().combinations(k).enumerate() {
                    let expected = BigUint::from(expected);
                    assert_eq!(rank(&c, &nums).unwrap(), expected);
                    assert_eq!(unrank(&expected, &nums, k).unwrap(), c);
                }
            }
        }
    }

    #[test]
    fn combination_with_replacement_rank_unrank() {
        for n in 0..9 {
            let n_big = BigUint::from(n);
            for k in 0..n {
                for (expected, c) in (0..n).combinations_with_replacement(k).enumerate() {
                    let expected = BigUint::from(expected);
                    let c = big(&c);
                    assert_eq!(with_replacement_rank(&c, &n_big).unwrap(), expected);
                    assert_eq!(with_replacement_unrank(&expected, &n_big, k).unwrap(), c);
                }
            }
        }
    }

    #[test]
    fn rank_rejects_malformed_combinations() {
        let nums = [0, 1, 2, 3];
        assert!(matches!(
            rank(&[1, 7], &nums),
            Err(RankError::InvalidArgument(_))
        ));
        assert!(matches!(
            rank(&[2, 1], &nums),
            Err(RankError::InvalidArgument(_))
        ));
        assert!(matches!(
            rank(&[1, 1], &nums),
            Err(RankError::InvalidArgument(_))
        ));
    }

    #[test]
    fn unrank_rejects_out_of_range() {
        let nums = [0, 1, 2, 3];
        assert!(unrank(&BigUint::from(6u32), &nums, 2).is_err());
        assert!(unrank(&BigUint::zero(), &nums, 5).is_err());
        assert!(with_replacement_unrank(&BigUint::from(10u32), &BigUint::from(4u32), 2).is_err());
        assert!(with_replacement_unrank(&BigUint::zero(), &BigUint::zero(), 1).is_err());
    }

    #[test]
    fn with_replacement_rank_rejects_malformed() {
        let n = BigUint::from(3u32);
        assert!(with_replacement_rank(&big(&[2, 1]), &n).is_err());
        assert!(with_replacement_rank(&big(&[0, 3]), &n).is_err());
    }

    #[test]
    fn with_replacement_large_universe() {
        // Universe far too big to be scanned element by element
        let n: BigUint = "1000000000000000000000000".parse().unwrap();
        let c = vec![
            BigUint::from(3u32),
            "999999999999999999999998".parse().unwrap(),
            "999999999999999999999999".parse().unwrap(),
        ];
        let r = with_replacement_rank(&c, &n).unwrap();
        assert_eq!(with_replacement_unrank(&r, &n, 3).unwrap(), c);
    }
}
