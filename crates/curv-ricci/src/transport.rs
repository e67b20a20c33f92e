//! Discrete optimal transport between two mass vectors.
//!
//! Given probability vectors `a` and `b` of length `n` and an `n × n`
//! non-negative cost matrix `C`, the transport problem asks for the joint
//! distribution `γ` with row marginal `a` and column marginal `b` minimizing
//! `Σ γ[i][j] · C[i][j]`. The optimum is the 1-Wasserstein (earth mover's)
//! distance when `C` is a metric.
//!
//! [`NetworkFlowSolver`] returns the exact optimum. [`SinkhornSolver`] returns
//! an entropy-regularized approximation and marks its plans as inexact.
//!
//! [`SinkhornSolver`]: crate::SinkhornSolver

use curv_core::errors::{CurvError, ErrorInfo};

use crate::shortest_paths::DistanceMatrix;

/// Absolute tolerance on the total mass of each marginal.
pub const MASS_TOLERANCE: f64 = 1e-9;

/// Residual capacity below which an arc counts as saturated.
const FLOW_EPSILON: f64 = 1e-12;

/// Mass moved from one row to one column of the cost matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flow {
    /// Index into the source distribution.
    pub from: usize,
    /// Index into the target distribution.
    pub to: usize,
    /// Amount of mass moved.
    pub mass: f64,
}

/// Result of a transport solve.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportPlan {
    /// Non-zero entries of the coupling.
    pub flows: Vec<Flow>,
    /// Total transport cost; `f64::INFINITY` when no finite plan exists.
    pub cost: f64,
    /// Augmentations (exact) or scaling sweeps (Sinkhorn) performed.
    pub iterations: usize,
    /// `‖γ·1 − a‖₁ + ‖γᵀ·1 − b‖₁` of the returned coupling.
    pub marginal_error: f64,
    /// Whether `cost` is the exact optimum.
    pub exact: bool,
}

impl TransportPlan {
    /// Returns true when some mass could only move along unreachable pairs.
    pub fn is_unreachable(&self) -> bool {
        self.cost.is_infinite()
    }
}

/// Minimum-cost transportation between two discrete distributions.
pub trait TransportSolver: Send + Sync {
    /// Solves the transport problem for `source → target` under `cost`.
    fn solve(
        &self,
        source: &[f64],
        target: &[f64],
        cost: &DistanceMatrix,
    ) -> Result<TransportPlan, CurvError>;

    /// Returns whether the solver computes the exact optimum.
    fn is_exact(&self) -> bool;
}

/// Exact solver based on successive shortest augmenting paths.
///
/// The transportation problem is solved as a min-cost flow on the bipartite
/// network `s → supply rows → demand columns → t`. Only rows and columns with
/// positive mass enter the network, and unreachable pairs get no arc, so an
/// infinite cost is reported only when some mass genuinely cannot move.
///
/// Augmenting paths come from Dijkstra over reduced costs with node
/// potentials. Reduced costs are clamped at zero, so rounding at large cost
/// magnitudes can never produce a negative cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkFlowSolver;

impl NetworkFlowSolver {
    /// Creates the solver.
    pub fn new() -> Self {
        Self
    }
}

impl TransportSolver for NetworkFlowSolver {
    fn solve(
        &self,
        source: &[f64],
        target: &[f64],
        cost: &DistanceMatrix,
    ) -> Result<TransportPlan, CurvError> {
        validate_problem(source, target, cost)?;
        let rows = support(source);
        let cols = support(target);

        let first_col = 2 + rows.len();
        let mut network = FlowNetwork::new(first_col + cols.len());
        for (r, &i) in rows.iter().enumerate() {
            network.add_arc(SOURCE, 2 + r, source[i], 0.0);
        }
        for (c, &j) in cols.iter().enumerate() {
            network.add_arc(first_col + c, SINK, target[j], 0.0);
        }
        let mut couplings = Vec::with_capacity(rows.len() * cols.len());
        for (r, &i) in rows.iter().enumerate() {
            for (c, &j) in cols.iter().enumerate() {
                let weight = cost.get(i, j);
                if weight.is_finite() {
                    let arc = network.add_arc(2 + r, first_col + c, f64::INFINITY, weight);
                    couplings.push((i, j, 2 + r, arc));
                }
            }
        }

        let supply: f64 = rows.iter().map(|&i| source[i]).sum();
        let demand: f64 = cols.iter().map(|&j| target[j]).sum();
        let mut remaining = supply.min(demand);
        let mut iterations = 0usize;
        let mut stranded = false;
        let mut potential = vec![0.0; network.arcs.len()];
        while remaining > FLOW_EPSILON {
            let Some(path) = network.shortest_path(SOURCE, SINK, &mut potential)? else {
                stranded = remaining > MASS_TOLERANCE;
                break;
            };
            let amount = path
                .iter()
                .map(|&(node, arc)| network.arcs[node][arc].capacity)
                .fold(remaining, f64::min);
            for &(node, arc) in &path {
                network.push(node, arc, amount);
            }
            remaining -= amount;
            iterations += 1;
        }

        let flows: Vec<Flow> = couplings
            .iter()
            .filter_map(|&(i, j, node, arc)| {
                let mass = network.flow_on(node, arc);
                (mass > FLOW_EPSILON).then_some(Flow { from: i, to: j, mass })
            })
            .collect();
        let total = if stranded {
            f64::INFINITY
        } else {
            flows.iter().map(|f| f.mass * cost.get(f.from, f.to)).sum()
        };
        Ok(TransportPlan {
            marginal_error: marginal_error(&flows, source, target),
            flows,
            cost: total,
            iterations,
            exact: true,
        })
    }

    fn is_exact(&self) -> bool {
        true
    }
}

/// Exact 1-Wasserstein distance between two distributions.
pub fn wasserstein_distance(
    source: &[f64],
    target: &[f64],
    cost: &DistanceMatrix,
) -> Result<f64, CurvError> {
    Ok(NetworkFlowSolver.solve(source, target, cost)?.cost)
}

/// Checks lengths, masses and costs of a transport problem.
pub(crate) fn validate_problem(
    source: &[f64],
    target: &[f64],
    cost: &DistanceMatrix,
) -> Result<(), CurvError> {
    if source.len() != target.len() || source.len() != cost.size() {
        return Err(transport_error(
            ErrorInfo::new(
                "length-mismatch",
                "distributions and cost matrix must share one dimension",
            )
            .with_context("source", source.len().to_string())
            .with_context("target", target.len().to_string())
            .with_context("cost", cost.size().to_string()),
        ));
    }
    for (label, mass) in [("source", source), ("target", target)] {
        if let Some((idx, value)) = mass
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.is_finite() && **v >= 0.0))
        {
            return Err(transport_error(
                ErrorInfo::new("invalid-mass", "masses must be finite and non-negative")
                    .with_context("distribution", label)
                    .with_context("index", idx.to_string())
                    .with_context("value", value.to_string()),
            ));
        }
        let total: f64 = mass.iter().sum();
        if (total - 1.0).abs() > MASS_TOLERANCE {
            return Err(transport_error(
                ErrorInfo::new("mass-mismatch", "distribution must sum to one")
                    .with_context("distribution", label)
                    .with_context("total", total.to_string()),
            ));
        }
    }
    for i in support(source) {
        for j in support(target) {
            let value = cost.get(i, j);
            if value.is_nan() || value < 0.0 {
                return Err(transport_error(
                    ErrorInfo::new("invalid-cost", "costs must be non-negative")
                        .with_context("row", i.to_string())
                        .with_context("col", j.to_string())
                        .with_context("value", value.to_string()),
                ));
            }
        }
    }
    Ok(())
}

/// Indices carrying positive mass.
pub(crate) fn support(mass: &[f64]) -> Vec<usize> {
    mass.iter()
        .enumerate()
        .filter(|(_, m)| **m > 0.0)
        .map(|(i, _)| i)
        .collect()
}

pub(crate) fn marginal_error(flows: &[Flow], source: &[f64], target: &[f64]) -> f64 {
    let mut rows = vec![0.0; source.len()];
    let mut cols = vec![0.0; target.len()];
    for flow in flows {
        rows[flow.from] += flow.mass;
        cols[flow.to] += flow.mass;
    }
    let row_error: f64 = rows.iter().zip(source).map(|(r, a)| (r - a).abs()).sum();
    let col_error: f64 = cols.iter().zip(target).map(|(c, b)| (c - b).abs()).sum();
    row_error + col_error
}

pub(crate) fn transport_error(info: ErrorInfo) -> CurvError {
    CurvError::Transport(info)
}

const SOURCE: usize = 0;
const SINK: usize = 1;

#[derive(Debug, Clone)]
struct Arc {
    to: usize,
    rev: usize,
    capacity: f64,
    cost: f64,
}

/// Residual network stored as adjacency lists of paired arcs.
#[derive(Debug, Clone)]
struct FlowNetwork {
    arcs: Vec<Vec<Arc>>,
}

impl FlowNetwork {
    fn new(nodes: usize) -> Self {
        Self {
            arcs: vec![Vec::new(); nodes],
        }
    }

    /// Adds `from → to` and its zero-capacity reverse arc; returns the forward arc index.
    fn add_arc(&mut self, from: usize, to: usize, capacity: f64, cost: f64) -> usize {
        let forward = self.arcs[from].len();
        let backward = self.arcs[to].len();
        self.arcs[from].push(Arc {
            to,
            rev: backward,
            capacity,
            cost,
        });
        self.arcs[to].push(Arc {
            to: from,
            rev: forward,
            capacity: 0.0,
            cost: -cost,
        });
        forward
    }

    fn push(&mut self, from: usize, arc: usize, amount: f64) {
        let (to, rev) = {
            let forward = &mut self.arcs[from][arc];
            forward.capacity -= amount;
            (forward.to, forward.rev)
        };
        self.arcs[to][rev].capacity += amount;
    }

    /// Flow currently carried by a forward arc.
    fn flow_on(&self, from: usize, arc: usize) -> f64 {
        let forward = &self.arcs[from][arc];
        self.arcs[forward.to][forward.rev].capacity
    }

    /// Dijkstra over residual arcs using reduced costs
    /// `cost + potential[u] − potential[v]`, then folds the distances into
    /// `potential`. Returns `Ok(None)` when `to` cannot be reached.
    fn shortest_path(
        &self,
        from: usize,
        to: usize,
        potential: &mut [f64],
    ) -> Result<Option<Vec<(usize, usize)>>, CurvError> {
        let n = self.arcs.len();
        let mut dist = vec![f64::INFINITY; n];
        let mut prev: Vec<Option<(usize, usize)>> = vec![None; n];
        let mut done = vec![false; n];
        dist[from] = 0.0;
        while let Some(node) = (0..n)
            .filter(|&v| !done[v] && dist[v].is_finite())
            .min_by(|&a, &b| dist[a].total_cmp(&dist[b]))
        {
            done[node] = true;
            for (idx, arc) in self.arcs[node].iter().enumerate() {
                if arc.capacity <= FLOW_EPSILON || done[arc.to] {
                    continue;
                }
                let reduced = (arc.cost + potential[node] - potential[arc.to]).max(0.0);
                let candidate = dist[node] + reduced;
                if candidate < dist[arc.to] {
                    dist[arc.to] = candidate;
                    prev[arc.to] = Some((node, idx));
                }
            }
        }
        if dist[to].is_infinite() {
            return Ok(None);
        }

        let cap = dist[to];
        for (p, d) in potential.iter_mut().zip(&dist) {
            *p += d.min(cap);
        }

        let mut path = Vec::new();
        let mut node = to;
        while node != from {
            let step = match prev[node] {
                Some(step) if path.len() < n => step,
                _ => return Err(degenerate(node)),
            };
            path.push(step);
            node = step.0;
        }
        path.reverse();
        Ok(Some(path))
    }
}

fn degenerate(node: usize) -> CurvError {
    transport_error(
        ErrorInfo::new("solver-degenerate", "augmenting path could not be rebuilt")
            .with_context("node", node.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_metric(n: usize) -> DistanceMatrix {
        let rows = (0..n)
            .map(|i| (0..n).map(|j| (i as f64 - j as f64).abs()).collect())
            .collect();
        DistanceMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn moves_point_mass_along_the_line() {
        let cost = line_metric(4);
        let plan = NetworkFlowSolver
            .solve(&[1.0, 0.0, 0.0, 0.0], &[0.0, 0.0, 0.0, 1.0], &cost)
            .unwrap();
        assert!((plan.cost - 3.0).abs() < 1e-12);
        assert_eq!(plan.flows.len(), 1);
        assert!(plan.exact);
    }

    #[test]
    fn splits_mass_optimally() {
        // Uniform on {0, 1} to uniform on {2, 3}: each half travels two steps.
        let cost = line_metric(4);
        let plan = NetworkFlowSolver
            .solve(&[0.5, 0.5, 0.0, 0.0], &[0.0, 0.0, 0.5, 0.5], &cost)
            .unwrap();
        assert!((plan.cost - 2.0).abs() < 1e-12);
        assert!(plan.marginal_error < 1e-12);
    }

    #[test]
    fn reroutes_when_greedy_choice_is_wrong() {
        // Greedy would send row 0 to its cheapest column 0 and force row 1
        // onto the expensive pair; the optimum crosses over instead.
        let cost = DistanceMatrix::from_rows(vec![
            vec![1.0, 2.0],
            vec![10.0, 20.0],
        ])
        .unwrap();
        let plan = NetworkFlowSolver
            .solve(&[0.5, 0.5], &[0.5, 0.5], &cost)
            .unwrap();
        // 0→0 + 1→1 = 10.5, 0→1 + 1→0 = 6.0
        assert!((plan.cost - 6.0).abs() < 1e-12);
        assert!(plan.iterations >= 2);
    }

    #[test]
    fn disconnected_support_is_unreachable() {
        let cost = DistanceMatrix::from_rows(vec![
            vec![0.0, f64::INFINITY],
            vec![f64::INFINITY, 0.0],
        ])
        .unwrap();
        let plan = NetworkFlowSolver
            .solve(&[1.0, 0.0], &[0.0, 1.0], &cost)
            .unwrap();
        assert!(plan.is_unreachable());
        assert_eq!(plan.cost, f64::INFINITY);
    }

    #[test]
    fn large_fractional_costs_match_the_line_closed_form() {
        // On a line, W1 is the integral of |F_a − F_b| between neighbouring points.
        let positions: [f64; 8] = [0.0, 0.37, 1.91, 2.03, 4.58, 5.11, 7.29, 9.64];
        let source = [0.125, 0.0, 0.25, 0.125, 0.0, 0.25, 0.125, 0.125];
        let target = [0.0, 0.25, 0.0, 0.125, 0.375, 0.0, 0.125, 0.125];
        for scale in [1.0, 1e3, 1e5, 1e7, 1e9] {
            let rows = positions
                .iter()
                .map(|a| positions.iter().map(|b| (a - b).abs() * scale * 1.3).collect())
                .collect();
            let cost = DistanceMatrix::from_rows(rows).unwrap();

            let (mut fa, mut fb, mut expected) = (0.0f64, 0.0f64, 0.0f64);
            for i in 0..positions.len() - 1 {
                fa += source[i];
                fb += target[i];
                expected += (fa - fb).abs() * (positions[i + 1] - positions[i]) * scale * 1.3;
            }

            let plan = NetworkFlowSolver.solve(&source, &target, &cost).unwrap();
            assert!(!plan.is_unreachable(), "scale {scale}");
            assert!(plan.marginal_error < 1e-9, "scale {scale}");
            assert!(
                ((plan.cost - expected) / expected).abs() < 1e-9,
                "scale {scale}: {} vs {expected}",
                plan.cost
            );
        }
    }

    #[test]
    fn infinite_costs_outside_the_support_are_ignored() {
        let cost = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, f64::INFINITY],
            vec![1.0, 0.0, f64::INFINITY],
            vec![f64::INFINITY, f64::INFINITY, 0.0],
        ])
        .unwrap();
        let distance = wasserstein_distance(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0], &cost).unwrap();
        assert_eq!(distance, 1.0);
    }

    #[test]
    fn rejects_malformed_problems() {
        let cost = line_metric(3);
        let err = NetworkFlowSolver
            .solve(&[1.0, 0.0], &[0.0, 1.0], &cost)
            .unwrap_err();
        assert_eq!(err.code(), "length-mismatch");

        let err = NetworkFlowSolver
            .solve(&[0.5, 0.0, 0.0], &[0.0, 1.0, 0.0], &cost)
            .unwrap_err();
        assert_eq!(err.code(), "mass-mismatch");

        let err = NetworkFlowSolver
            .solve(&[1.5, -0.5, 0.0], &[0.0, 1.0, 0.0], &cost)
            .unwrap_err();
        assert_eq!(err.code(), "invalid-mass");

        let negative = DistanceMatrix::from_rows(vec![vec![0.0, -1.0], vec![-1.0, 0.0]]).unwrap();
        let err = NetworkFlowSolver
            .solve(&[1.0, 0.0], &[0.0, 1.0], &negative)
            .unwrap_err();
        assert_eq!(err.code(), "invalid-cost");
    }
}
