//! Permutations of `0..n` and their generation.

use itertools::Itertools;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::PermutationError;

/// A bijection of `0..n`, stored as its image list: `p[i]` is the image of `i`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    /// Build a permutation from its images.
    ///
    /// # Errors
    /// [`PermutationError::NotABijection`] if some value repeats or is out of range.
    pub fn new(values: impl IntoIterator<Item = usize>) -> Result<Self, PermutationError> {
        let vec: Vec<usize> = values.into_iter().collect();
        let n = vec.len();
        let mut seen = vec![false; n];

        for &value in &vec {
            if value >= n || seen[value] {
                return Err(PermutationError::NotABijection(n));
            }
            seen[value] = true;
        }

        Ok(Self(vec))
    }

    /// The identity on `size` points.
    #[must_use]
    pub fn identity(size: usize) -> Self {
        Self((0..size).collect())
    }

    /// A uniformly random permutation (Fisher-Yates).
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut images: Vec<usize> = (0..size).collect();
        images.shuffle(rng);
        Self(images)
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the permutation of zero points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Image of `i`.
    #[must_use]
    pub fn apply(&self, i: usize) -> usize {
        self.0[i]
    }

    /// Image list.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// True when every point is fixed.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &v)| i == v)
    }

    /// The inverse permutation.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.0.len()];
        for (i, &v) in self.0.iter().enumerate() {
            inv[v] = i;
        }
        Self(inv)
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    ///
    /// # Errors
    /// [`PermutationError::SizeMismatch`] if the two act on different point sets.
    pub fn compose(&self, other: &Self) -> Result<Self, PermutationError> {
        if self.len() != other.len() {
            return Err(PermutationError::SizeMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(Self(other.0.iter().map(|&i| self.0[i]).collect()))
    }
}

/// `n!`, or `None` when it does not fit in a `u128`.
#[must_use]
pub fn factorial(n: usize) -> Option<u128> {
    (2..=n as u128).try_fold(1u128, u128::checked_mul)
}

/// Every permutation of `0..n` in lexicographic order of image lists.
pub fn all_permutations(n: usize) -> impl Iterator<Item = Permutation> {
    (0..n).permutations(n).map(Permutation)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_valid_permutations() {
        assert!(Permutation::new([0, 1, 2]).is_ok());
        assert!(Permutation::new([2, 0, 1]).is_ok());
        assert!(Permutation::new([1, 0]).is_ok());
        assert!(Permutation::new(vec![0]).is_ok());
        assert!(Permutation::new(Vec::<usize>::new()).is_ok());
    }

    #[test]
    fn test_invalid_permutations() {
        assert!(Permutation::new([0, 2]).is_err());
        assert!(Permutation::new([0, 1, 1]).is_err());
        assert!(Permutation::new([0, 1, 3]).is_err());
        assert!(Permutation::new([1, 2, 3]).is_err());
        assert!(Permutation::new([0, 0, 1]).is_err());
    }

    #[test]
    fn inverse_and_compose() {
        let p = Permutation::new([2, 0, 3, 1]).unwrap();
        let id = p.compose(&p.inverse()).unwrap();
        assert!(id.is_identity());
        assert!(p.inverse().compose(&p).unwrap().is_identity());

        let q = Permutation::new([1, 0, 2, 3]).unwrap();
        let pq = p.compose(&q).unwrap();
        for i in 0..4 {
            assert_eq!(pq.apply(i), p.apply(q.apply(i)));
        }
    }

    #[test]
    fn compose_rejects_mismatched_sizes() {
        let p = Permutation::identity(2);
        let q = Permutation::identity(3);
        assert!(p.compose(&q).is_err());
    }

    #[test]
    fn factorial_values() {
        assert_eq!(factorial(0), Some(1));
        assert_eq!(factorial(1), Some(1));
        assert_eq!(factorial(8), Some(40_320));
        assert_eq!(factorial(34).map(|f| f > 0), Some(true));
        assert_eq!(factorial(40), None);
    }

    #[test]
    fn all_permutations_is_lexicographic_and_complete() {
        let perms: Vec<_> = all_permutations(3).collect();
        assert_eq!(perms.len(), 6);
        assert!(perms[0].is_identity());
        assert_eq!(perms[5].as_slice(), &[2, 1, 0]);
        assert!(perms.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(all_permutations(0).count(), 1);
    }

    #[test]
    fn random_permutation_is_valid() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        for _ in 0..50 {
            let p = Permutation::random(7, &mut rng);
            assert!(Permutation::new(p.as_slice().iter().copied()).is_ok());
        }
    }
}
