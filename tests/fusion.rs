//! End-to-end fusion through the public API.

use dag_fusion::consensus::{alpha_order, full_union, Reconciled};
use dag_fusion::fusion::{CrossoverStrategy, FusionConfig, FusionRunner};
use dag_fusion::graph::{
    Dag, DagDistance, Edge, ExactTreeWidth, MinFillTreeWidth, MoralHammingDistance,
    StructuralHammingDistance, TreeWidth,
};
use dag_fusion::FusionError;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const ASIA: [&str; 8] = [
    "asia", "tub", "smoke", "lung", "bronc", "either", "xray", "dysp",
];

fn asia(edges: &[(usize, usize)]) -> Dag {
    Dag::from_edges(ASIA, edges.iter().map(|&(a, b)| Edge::new(a, b))).unwrap()
}

/// Three noisy variants of the Asia network, one with reversed arcs.
fn asia_variants() -> Vec<Dag> {
    vec![
        // Reference structure.
        asia(&[(0, 1), (2, 3), (2, 4), (1, 5), (3, 5), (5, 6), (5, 7), (4, 7)]),
        // Missing asia -> tub, extra smoke -> dysp.
        asia(&[(2, 3), (2, 4), (1, 5), (3, 5), (5, 6), (5, 7), (4, 7), (2, 7)]),
        // Two reversed arcs and an extra lung -> xray.
        asia(&[(1, 0), (3, 2), (2, 4), (1, 5), (3, 5), (5, 6), (5, 7), (4, 7), (3, 6)]),
    ]
}

#[test]
fn fuses_asia_variants_under_bound() {
    init_logging();
    let inputs = asia_variants();
    let config = FusionConfig::default()
        .with_max_tree_width(2)
        .with_iterations(60)
        .with_population_size(12)
        .with_seed(2024);

    let result = FusionRunner::run(&inputs, &config).unwrap();
    for dag in Reconciled::from_dags(&inputs).unwrap().dags {
        assert!(dag.is_consistent_with(&result.alpha));
    }
    assert!(result.full_union.is_consistent_with(&result.alpha));

    let greedy_fitness = MoralHammingDistance.distance(&result.greedy_dag, &result.full_union);
    let best = result.require_feasible().unwrap();
    assert!(best.tree_width <= 2);
    assert!(best.fitness <= greedy_fitness);
    assert_eq!(best.dag.names(), inputs[0].names());
}

#[test]
fn custom_oracles() {
    init_logging();
    let inputs = asia_variants();
    let config = FusionConfig::default()
        .with_max_tree_width(2)
        .with_iterations(30)
        .with_crossover(CrossoverStrategy::Roulette)
        .with_seed(5);

    let result = FusionRunner::run_with(
        &inputs,
        &config,
        &MinFillTreeWidth,
        &StructuralHammingDistance,
    )
    .unwrap();
    let best = result.best.clone().unwrap();
    // Min-fill over-estimates, so the exact width is within the bound too.
    assert!(best.tree_width <= 2);
    assert!(ExactTreeWidth::default().tree_width(&best.dag).unwrap() <= 2);
    assert_eq!(
        best.fitness,
        StructuralHammingDistance.distance(&best.dag, &result.full_union)
    );
}

#[test]
fn single_input_within_bound_is_returned_unchanged() {
    init_logging();
    let input = asia(&[(0, 1), (2, 3), (2, 4), (1, 5), (3, 5), (5, 6), (5, 7), (4, 7)]);
    assert_eq!(ExactTreeWidth::default().tree_width(&input).unwrap(), 2);

    let config = FusionConfig::default()
        .with_max_tree_width(2)
        .with_iterations(10)
        .with_seed(1);
    let alpha = alpha_order(std::slice::from_ref(&input)).unwrap();
    assert!(input.is_consistent_with(&alpha));

    let result = FusionRunner::run(std::slice::from_ref(&input), &config).unwrap();
    assert_eq!(result.best_fitness(), Some(0.0));
    assert_eq!(result.best_dag(), Some(&input));
}

#[test]
fn rejects_inputs_out_of_order() {
    let inputs = asia_variants();
    let identity: Vec<_> = inputs[0].nodes().collect();
    assert_eq!(
        full_union(&identity, &inputs),
        Err(FusionError::OrderMismatch { index: 2 })
    );
}
