use itertools::Itertools;
use rand::{
    seq::SliceRandom,
    Rng,
};

use crate::rules::{
    Card,
    Deal,
};

/// Draws `k` elements of `population` without replacement, in random order.
/// Returns a full random permutation if `k` is not smaller than the population.
pub fn sample<T: Clone, R: Rng + ?Sized>(population: &[T], k: usize, rng: &mut R) -> Vec<T> {
    let mut pool = population.to_vec();
    let (chosen, _rest) = pool.partial_shuffle(rng, k);
    chosen.to_vec()
}

/// Every ordering of `population`, in lexicographic order of positions.
pub fn permutations<T: Clone>(population: &[T]) -> Vec<Vec<T>> {
    population.iter().cloned().permutations(population.len()).collect()
}

pub fn deal<R: Rng + ?Sized>(rng: &mut R) -> Deal {
    let cards = sample(&Card::DECK, 2, rng);
    [cards[0], cards[1]]
}

/// All 6 ordered deals of the deck. The undealt card is implied by each deal,
/// so every ordering of the deck maps to exactly one entry.
pub fn all_deals() -> Vec<Deal> {
    permutations(&Card::DECK).into_iter().map(|cards| [cards[0], cards[1]]).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use more_asserts::{
        assert_gt,
        assert_lt,
    };
    use rand::{
        rngs::StdRng,
        SeedableRng,
    };

    use super::*;

    #[test]
    fn test_sample_size() {
        let mut rng = StdRng::seed_from_u64(7);
        let population = [1, 2, 3, 4, 5];
        assert_eq!(2, sample(&population, 2, &mut rng).len());
        assert_eq!(0, sample(&population, 0, &mut rng).len());

        let mut all = sample(&population, 10, &mut rng);
        assert_eq!(5, all.len());
        all.sort();
        assert_eq!(population.to_vec(), all);
    }

    #[test]
    fn test_sample_has_no_duplicates() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let cards = sample(&Card::DECK, 2, &mut rng);
            assert_ne!(cards[0], cards[1]);
        }
    }

    #[test]
    fn test_sample_is_uniform() {
        let mut rng = StdRng::seed_from_u64(3);
        let n = 60_000;
        let mut counts: HashMap<Deal, usize> = HashMap::new();
        for _ in 0..n {
            *counts.entry(deal(&mut rng)).or_default() += 1;
        }

        // All 6 ordered deals, each close to n / 6.
        assert_eq!(6, counts.len());
        let expected = n as f64 / 6.0;
        for count in counts.values() {
            assert_gt!(*count as f64, expected * 0.95);
            assert_lt!(*count as f64, expected * 1.05);
        }
    }

    #[test]
    fn test_sample_is_deterministic_for_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            assert_eq!(deal(&mut a), deal(&mut b));
        }
    }

    #[test]
    fn test_permutations() {
        let perms = permutations(&['a', 'b', 'c']);
        assert_eq!(6, perms.len());
        assert_eq!(vec!['a', 'b', 'c'], perms[0]);
        assert_eq!(vec!['c', 'b', 'a'], perms[5]);

        let deals = all_deals();
        assert_eq!(6, deals.len());
        for (i, d) in deals.iter().enumerate() {
            assert_ne!(d[0], d[1]);
            assert!(!deals[i + 1..].contains(d));
        }
    }
}
