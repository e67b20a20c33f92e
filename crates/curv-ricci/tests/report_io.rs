use std::collections::BTreeMap;

use curv_core::{CurvatureKind, NodeId, WeightedGraph};
use curv_graph::GraphImpl;
use curv_ricci::{
    compute_forman, compute_ollivier, provenance_for, CurvatureConfig, CurvatureReport,
    DEFAULT_PRECISION,
};
use tempfile::tempdir;

fn triangle() -> GraphImpl {
    let mut graph = GraphImpl::new();
    let nodes: Vec<NodeId> = (0..3).map(|_| graph.add_node(None)).collect();
    graph.add_edge(nodes[0], nodes[1], None).unwrap();
    graph.add_edge(nodes[1], nodes[2], None).unwrap();
    graph.add_edge(nodes[0], nodes[2], None).unwrap();
    graph
}

fn report_for(graph: &GraphImpl) -> CurvatureReport {
    let provenance = provenance_for(graph, &CurvatureConfig::default(), Some(11)).unwrap();
    CurvatureReport::from_graph(graph, provenance).unwrap()
}

#[test]
fn report_summarizes_both_measures() {
    let mut graph = triangle();
    compute_forman(&mut graph, true).unwrap();
    compute_ollivier(&mut graph, 0.0, true).unwrap();
    let report = report_for(&graph);

    assert_eq!(report.nodes, 3);
    assert_eq!(report.edges.len(), 3);
    assert_eq!(report.forman.count, 3);
    assert_eq!(report.forman.mean, Some(0.0));
    assert_eq!(report.ollivier.unreachable, 0);
    let mean = report.ollivier.mean.unwrap();
    assert!((mean - 0.5).abs() < 1e-9);
    assert_eq!(report.provenance.seed, Some(11));
    assert_eq!(report.provenance.graph_hash.len(), 64);
}

#[test]
fn json_file_round_trip() {
    let mut graph = triangle();
    compute_forman(&mut graph, true).unwrap();
    let report = report_for(&graph);

    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    report.write_json(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(CurvatureReport::from_json(&text).unwrap(), report);
    assert!(report.edges.iter().all(|row| row.ollivier.is_none()));
}

#[test]
fn unreachable_values_are_labelled() {
    let mut graph = triangle();
    compute_forman(&mut graph, true).unwrap();
    let values: BTreeMap<_, _> = graph.edges().map(|edge| (edge, f64::NEG_INFINITY)).collect();
    graph
        .apply_curvature(CurvatureKind::Ollivier, &values)
        .unwrap();
    let report = report_for(&graph);

    assert_eq!(report.ollivier.unreachable, 3);
    assert_eq!(report.ollivier.mean, None);
    let json = report.to_json().unwrap();
    assert!(json.contains("\"-inf\""));
    assert_eq!(CurvatureReport::from_json(&json).unwrap(), report);
}

#[test]
fn csv_rows_use_fixed_precision() {
    let mut graph = triangle();
    compute_forman(&mut graph, true).unwrap();
    compute_ollivier(&mut graph, 0.0, true).unwrap();
    let report = report_for(&graph);

    let mut buffer = Vec::new();
    report.write_csv(&mut buffer, DEFAULT_PRECISION).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "edge,source,target,weight,forman,ollivier");
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "0,0,1,1.00000,0.00000,0.50000");
}
