use curv_core::rng::RngHandle;
use curv_core::WeightedGraph;
use curv_graph::{gen_random_geometric, normalize_weights, randomize_edge_weights, GraphImpl};
use curv_ricci::{
    all_pairs_shortest_paths, compute_ollivier, neighbor_mass, wasserstein_distance,
    MASS_TOLERANCE,
};
use proptest::prelude::*;

#[test]
fn weight_scale_does_not_change_curvature() {
    for seed in 0..5u64 {
        let curvature_at = |scale: f64| {
            let mut rng = RngHandle::from_seed(seed);
            let (mut graph, _) = gen_random_geometric(40, 0.35, &mut rng).unwrap();
            randomize_edge_weights(&mut graph, 0.1 * scale, 10.1 * scale, &mut rng.substream(1))
                .unwrap();
            compute_ollivier(&mut graph, 0.0, true).unwrap()
        };
        let base = curvature_at(1.0);
        assert!(base.values().all(|value| value.is_finite()));
        for scale in [1e3, 1e5, 1e7] {
            let values = curvature_at(scale);
            assert_eq!(values.len(), base.len());
            for (edge, value) in values {
                assert!(value.is_finite(), "seed {seed} scale {scale}");
                assert!(
                    (value - base[&edge]).abs() < 1e-6,
                    "seed {seed} scale {scale}: {value} vs {}",
                    base[&edge]
                );
            }
        }
    }
}

fn geometric(seed: u64, n_nodes: usize) -> GraphImpl {
    let mut rng = RngHandle::from_seed(seed);
    let (mut graph, _) = gen_random_geometric(n_nodes, 0.45, &mut rng).unwrap();
    normalize_weights(&mut graph, true).unwrap();
    graph
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn neighbour_mass_is_a_distribution(
        seed in any::<u64>(),
        n_nodes in 2usize..12,
        idleness in 0.0f64..=1.0,
    ) {
        let graph = geometric(seed, n_nodes);
        let (index, _) = all_pairs_shortest_paths(&graph).unwrap();
        for node in graph.nodes() {
            if graph.degree(node).unwrap() == 0 {
                continue;
            }
            let mass = neighbor_mass(&graph, &index, node, idleness).unwrap();
            let total: f64 = mass.iter().sum();
            prop_assert!((total - 1.0).abs() <= MASS_TOLERANCE);
            prop_assert!(mass.iter().all(|m| *m >= 0.0));
        }
    }

    #[test]
    fn identical_measures_cost_nothing(seed in any::<u64>(), n_nodes in 2usize..12) {
        let graph = geometric(seed, n_nodes);
        let (index, distances) = all_pairs_shortest_paths(&graph).unwrap();
        for node in graph.nodes() {
            if graph.degree(node).unwrap() == 0 {
                continue;
            }
            let mass = neighbor_mass(&graph, &index, node, 0.3).unwrap();
            let cost = wasserstein_distance(&mass, &mass, &distances).unwrap();
            prop_assert!(cost.abs() < 1e-12);
        }
    }

    #[test]
    fn curvature_is_finite_and_at_most_one(
        seed in any::<u64>(),
        n_nodes in 2usize..12,
        idleness in 0.0f64..=1.0,
    ) {
        let mut graph = geometric(seed, n_nodes);
        let values = compute_ollivier(&mut graph, idleness, true).unwrap();
        prop_assert_eq!(values.len(), graph.edge_count());
        for value in values.values() {
            prop_assert!(value.is_finite());
            prop_assert!(*value <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn transport_cost_is_symmetric(seed in any::<u64>(), n_nodes in 3usize..12) {
        let graph = geometric(seed, n_nodes);
        let (index, distances) = all_pairs_shortest_paths(&graph).unwrap();
        for edge in graph.edges() {
            let (a, b) = graph.endpoints(edge).unwrap();
            let mu_a = neighbor_mass(&graph, &index, a, 0.0).unwrap();
            let mu_b = neighbor_mass(&graph, &index, b, 0.0).unwrap();
            let forward = wasserstein_distance(&mu_a, &mu_b, &distances).unwrap();
            let backward = wasserstein_distance(&mu_b, &mu_a, &distances).unwrap();
            prop_assert!((forward - backward).abs() < 1e-9);
        }
    }
}
