use curv_core::rng::RngHandle;
use curv_core::WeightedGraph;
use curv_graph::{
    canonical_hash, complete_graph, cycle_graph, gen_random_geometric, path_graph,
    randomize_edge_weights, star_graph,
};

#[test]
fn geometric_graph_is_deterministic() {
    let (a, pos_a) = gen_random_geometric(60, 0.2, &mut RngHandle::from_seed(11)).unwrap();
    let (b, pos_b) = gen_random_geometric(60, 0.2, &mut RngHandle::from_seed(11)).unwrap();
    assert_eq!(pos_a, pos_b);
    assert_eq!(canonical_hash(&a).unwrap(), canonical_hash(&b).unwrap());
}

#[test]
fn geometric_edges_respect_radius() {
    let radius = 0.3;
    let (graph, positions) = gen_random_geometric(40, radius, &mut RngHandle::from_seed(3)).unwrap();
    let nodes: Vec<_> = graph.nodes().collect();
    for (i, a) in nodes.iter().enumerate() {
        for (j, b) in nodes.iter().enumerate().skip(i + 1) {
            let dx = positions[i][0] - positions[j][0];
            let dy = positions[i][1] - positions[j][1];
            let close = (dx * dx + dy * dy).sqrt() <= radius;
            assert_eq!(graph.edge_between(*a, *b).is_some(), close);
        }
    }
}

#[test]
fn geometric_rejects_bad_input() {
    let mut rng = RngHandle::from_seed(0);
    assert_eq!(
        gen_random_geometric(0, 0.1, &mut rng).unwrap_err().code(),
        "empty-graph"
    );
    assert_eq!(
        gen_random_geometric(5, f64::NAN, &mut rng).unwrap_err().code(),
        "invalid-radius"
    );
}

#[test]
fn named_shapes_have_expected_sizes() {
    assert_eq!(path_graph(5).unwrap().edge_count(), 4);
    assert_eq!(cycle_graph(5).unwrap().edge_count(), 5);
    assert_eq!(complete_graph(5).unwrap().edge_count(), 10);
    let star = star_graph(4).unwrap();
    assert_eq!(star.edge_count(), 4);
    assert_eq!(star.degree(curv_core::NodeId::from_raw(0)).unwrap(), 4);
    assert_eq!(cycle_graph(2).unwrap_err().code(), "cycle-too-short");
}

#[test]
fn random_weights_stay_in_range_and_replay() {
    let mut first = complete_graph(6).unwrap();
    let mut second = first.clone();
    let parent = RngHandle::from_seed(21);
    randomize_edge_weights(&mut first, 0.5, 2.5, &mut parent.substream(1)).unwrap();
    randomize_edge_weights(&mut second, 0.5, 2.5, &mut parent.substream(1)).unwrap();
    for edge in first.edges() {
        let weight = first.edge_weight(edge).unwrap().unwrap();
        assert!((0.5..2.5).contains(&weight));
        assert_eq!(second.edge_weight(edge).unwrap(), Some(weight));
    }
    let err = randomize_edge_weights(&mut first, 0.0, 1.0, &mut parent.substream(2)).unwrap_err();
    assert_eq!(err.code(), "invalid-weight-range");
}
