//! Adaptive bit-flip mutation.
//!
//! Rates depend on each genome's own last tree-width relative to the bound,
//! `x = tree_width / bound`. Below the bound, genomes mostly grow; above it,
//! removals dominate and additions become rare.

use super::population::Genome;
use rand::Rng;

/// Probability of dropping a present edge at relative width `x`.
///
/// `(x / 10)²` below the bound, `log10(x) / 3 + 0.01` at or above it.
pub fn removal_probability(x: f64) -> f64 {
    if x < 1.0 {
        (x / 10.0).powi(2)
    } else {
        x.log10() / 3.0 + 0.01
    }
}

/// Probability of adding an absent edge at relative width `x`.
///
/// `((x - 1) / 2)² + 0.01` below the bound, `0.01 / (x + 0.01)` at or above it.
pub fn addition_probability(x: f64) -> f64 {
    if x < 1.0 {
        ((x - 1.0) / 2.0).powi(2) + 0.01
    } else {
        0.01 / (x + 0.01)
    }
}

/// Flips bits of `genome` in place, one independent draw per bit.
pub fn mutate_genome<R: Rng>(genome: &mut Genome, tree_width: usize, bound: usize, rng: &mut R) {
    let x = tree_width as f64 / bound as f64;
    let remove = removal_probability(x);
    let add = addition_probability(x);
    for bit in genome.as_mut_slice() {
        let p = if *bit { remove } else { add };
        if rng.random::<f64>() < p {
            *bit = !*bit;
        }
    }
}

/// Mutates every genome using the tree-width measured for its slot.
///
/// # Panics
/// Panics if `tree_widths` is shorter than `population`.
pub fn mutate_population<R: Rng>(
    population: &mut [Genome],
    tree_widths: &[usize],
    bound: usize,
    rng: &mut R,
) {
    assert!(tree_widths.len() >= population.len(), "one tree-width per genome");
    for (genome, &tw) in population.iter_mut().zip(tree_widths) {
        mutate_genome(genome, tw, bound, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rates_below_bound() {
        assert_eq!(removal_probability(0.0), 0.0);
        assert!((removal_probability(0.5) - 0.0025).abs() < 1e-12);
        assert!((addition_probability(0.0) - 0.26).abs() < 1e-12);
        assert!((addition_probability(0.5) - 0.0725).abs() < 1e-12);
    }

    #[test]
    fn test_rates_at_and_above_bound() {
        assert!((removal_probability(1.0) - 0.01).abs() < 1e-12);
        assert!((addition_probability(1.0) - 0.01 / 1.01).abs() < 1e-12);
        assert!((removal_probability(10.0) - (1.0 / 3.0 + 0.01)).abs() < 1e-12);
        assert!(removal_probability(2.0) > removal_probability(1.5));
        assert!(addition_probability(2.0) < addition_probability(1.5));
    }

    #[test]
    fn test_addition_floor_keeps_exploring() {
        for i in 0..100 {
            let x = i as f64 / 100.0;
            assert!(addition_probability(x) >= 0.01);
        }
    }

    #[test]
    fn test_edgeless_genome_grows() {
        // x = 0: removal is impossible, addition runs at 26%.
        let mut rng = StdRng::seed_from_u64(42);
        let mut genome = Genome::empty(1000);
        mutate_genome(&mut genome, 0, 3, &mut rng);
        let ones = genome.count_ones();
        assert!((200..320).contains(&ones), "ones {ones}");
    }

    #[test]
    fn test_overfull_genome_shrinks() {
        // x = 10: removal ~34%, addition ~0.1%.
        let mut rng = StdRng::seed_from_u64(42);
        let mut genome: Genome = std::iter::repeat(true).take(1000).collect();
        mutate_genome(&mut genome, 10, 1, &mut rng);
        let removed = 1000 - genome.count_ones();
        assert!((280..400).contains(&removed), "removed {removed}");
    }

    #[test]
    fn test_population_uses_own_widths() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut pop = vec![Genome::empty(500), Genome::empty(500)];
        // Slot 0 far over the bound adds almost nothing; slot 1 at 0 adds a lot.
        mutate_population(&mut pop, &[20, 0], 2, &mut rng);
        assert!(pop[0].count_ones() < 10);
        assert!(pop[1].count_ones() > 80);
    }
}
