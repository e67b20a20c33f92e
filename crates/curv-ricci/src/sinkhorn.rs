//! Log-domain Sinkhorn iterations for entropy-regularized transport.
//!
//! The result approximates the exact optimum and every plan it returns has
//! `exact == false`. Curvature computed through this solver is not comparable
//! bit-for-bit with curvature from [`NetworkFlowSolver`](crate::NetworkFlowSolver).

use curv_core::errors::{CurvError, ErrorInfo};

use crate::shortest_paths::DistanceMatrix;
use crate::transport::{
    marginal_error, support, transport_error, validate_problem, Flow, TransportPlan,
    TransportSolver,
};

/// Entropy-regularized transport solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinkhornSolver {
    regularization: f64,
    max_iterations: usize,
    threshold: f64,
}

impl SinkhornSolver {
    /// Creates a solver with regularization `ε` and an iteration budget.
    pub fn new(regularization: f64, max_iterations: usize) -> Self {
        Self {
            regularization,
            max_iterations,
            threshold: 1e-9,
        }
    }

    /// Sets the row-marginal error below which the iteration stops.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Rejects non-positive parameters.
    pub fn validate(&self) -> Result<(), CurvError> {
        let checks = [
            ("regularization", self.regularization),
            ("threshold", self.threshold),
        ];
        for (name, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(CurvError::Config(
                    ErrorInfo::new("invalid-solver", format!("{name} must be positive"))
                        .with_context(name, value.to_string()),
                ));
            }
        }
        if self.max_iterations == 0 {
            return Err(CurvError::Config(ErrorInfo::new(
                "invalid-solver",
                "max_iterations must be at least one",
            )));
        }
        Ok(())
    }
}

impl TransportSolver for SinkhornSolver {
    fn solve(
        &self,
        source: &[f64],
        target: &[f64],
        cost: &DistanceMatrix,
    ) -> Result<TransportPlan, CurvError> {
        self.validate()?;
        validate_problem(source, target, cost)?;
        let rows = support(source);
        let cols = support(target);
        let kernel: Vec<Vec<f64>> = rows
            .iter()
            .map(|&i| {
                cols.iter()
                    .map(|&j| -cost.get(i, j) / self.regularization)
                    .collect()
            })
            .collect();
        let log_a: Vec<f64> = rows.iter().map(|&i| source[i].ln()).collect();
        let log_b: Vec<f64> = cols.iter().map(|&j| target[j].ln()).collect();
        let mut log_u = vec![0.0; rows.len()];
        let mut log_v = vec![0.0; cols.len()];

        let mut error = f64::INFINITY;
        let mut iterations = 0;
        while iterations < self.max_iterations {
            iterations += 1;
            for r in 0..rows.len() {
                let lse = log_sum_exp(kernel[r].iter().zip(&log_v).map(|(k, v)| k + v));
                if lse == f64::NEG_INFINITY {
                    return Ok(unreachable_plan(iterations));
                }
                log_u[r] = log_a[r] - lse;
            }
            for c in 0..cols.len() {
                let lse = log_sum_exp(kernel.iter().zip(&log_u).map(|(k, u)| k[c] + u));
                if lse == f64::NEG_INFINITY {
                    return Ok(unreachable_plan(iterations));
                }
                log_v[c] = log_b[c] - lse;
            }
            error = rows
                .iter()
                .enumerate()
                .map(|(r, &i)| {
                    let mass: f64 = (0..cols.len())
                        .map(|c| (log_u[r] + kernel[r][c] + log_v[c]).exp())
                        .sum();
                    (mass - source[i]).abs()
                })
                .sum();
            if error < self.threshold {
                break;
            }
        }
        if error >= self.threshold {
            return Err(transport_error(
                ErrorInfo::new("not-converged", "sinkhorn iterations did not converge")
                    .with_context("iterations", iterations.to_string())
                    .with_context("marginal_error", error.to_string())
                    .with_hint("raise max_iterations or regularization, or use the exact solver"),
            ));
        }

        let mut flows = Vec::new();
        for (r, &i) in rows.iter().enumerate() {
            for (c, &j) in cols.iter().enumerate() {
                let mass = (log_u[r] + kernel[r][c] + log_v[c]).exp();
                if mass > 0.0 {
                    flows.push(Flow {
                        from: i,
                        to: j,
                        mass,
                    });
                }
            }
        }
        let total = flows.iter().map(|f| f.mass * cost.get(f.from, f.to)).sum();
        Ok(TransportPlan {
            marginal_error: marginal_error(&flows, source, target),
            flows,
            cost: total,
            iterations,
            exact: false,
        })
    }

    fn is_exact(&self) -> bool {
        false
    }
}

fn unreachable_plan(iterations: usize) -> TransportPlan {
    TransportPlan {
        flows: Vec::new(),
        cost: f64::INFINITY,
        iterations,
        marginal_error: f64::INFINITY,
        exact: false,
    }
}

fn log_sum_exp(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return max;
    }
    max + values.map(|v| (v - max).exp()).sum::<f64>().ln()
}
