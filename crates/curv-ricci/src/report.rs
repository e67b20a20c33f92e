//! Per-edge curvature reports with JSON and CSV writers.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use curv_core::errors::{CurvError, ErrorInfo};
use curv_core::{float_repr, RunProvenance, SchemaVersion, WeightedGraph};
use curv_graph::{canonical_hash, GraphImpl};
use serde::{Deserialize, Serialize};

use crate::config::CurvatureConfig;

/// Schema of [`CurvatureReport`] payloads.
pub const REPORT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Decimal places used for CSV values unless the caller asks otherwise.
pub const DEFAULT_PRECISION: usize = 5;

/// One edge of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRow {
    /// Raw edge id.
    pub edge: u64,
    /// Lower endpoint id.
    pub source: u64,
    /// Upper endpoint id.
    pub target: u64,
    /// Edge weight, if assigned.
    pub weight: Option<f64>,
    /// Forman-Ricci curvature, if computed.
    #[serde(default, with = "float_repr")]
    pub forman: Option<f64>,
    /// Ollivier-Ricci curvature, if computed.
    #[serde(default, with = "float_repr")]
    pub ollivier: Option<f64>,
}

/// Summary statistics for one curvature measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MeasureSummary {
    /// Edges carrying a finite value.
    pub count: usize,
    /// Edges whose value is non-finite.
    pub unreachable: usize,
    /// Smallest finite value.
    pub min: Option<f64>,
    /// Largest finite value.
    pub max: Option<f64>,
    /// Mean of the finite values.
    pub mean: Option<f64>,
}

impl MeasureSummary {
    /// Summarizes the present values; missing values are skipped.
    pub fn from_values(values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let mut summary = Self::default();
        let mut sum = 0.0;
        for value in values.into_iter().flatten() {
            if !value.is_finite() {
                summary.unreachable += 1;
                continue;
            }
            summary.count += 1;
            sum += value;
            summary.min = Some(summary.min.map_or(value, |m| m.min(value)));
            summary.max = Some(summary.max.map_or(value, |m| m.max(value)));
        }
        if summary.count > 0 {
            summary.mean = Some(sum / summary.count as f64);
        }
        summary
    }
}

/// Curvature values of a graph together with their provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvatureReport {
    /// Report schema.
    #[serde(default)]
    pub schema_version: SchemaVersion,
    /// Hashes and versions of the run.
    pub provenance: RunProvenance,
    /// Number of live vertices.
    pub nodes: usize,
    /// Rows ordered by edge id.
    pub edges: Vec<EdgeRow>,
    /// Forman summary.
    pub forman: MeasureSummary,
    /// Ollivier summary.
    pub ollivier: MeasureSummary,
}

impl CurvatureReport {
    /// Collects every edge of `graph` into a report.
    pub fn from_graph(graph: &GraphImpl, provenance: RunProvenance) -> Result<Self, CurvError> {
        let mut edges = Vec::with_capacity(graph.edge_count());
        for edge in graph.edges() {
            let (source, target) = graph.endpoints(edge)?;
            let attrs = graph.edge_attributes(edge)?;
            edges.push(EdgeRow {
                edge: edge.as_raw(),
                source: source.as_raw(),
                target: target.as_raw(),
                weight: attrs.weight,
                forman: attrs.forman,
                ollivier: attrs.ollivier,
            });
        }
        let forman = MeasureSummary::from_values(edges.iter().map(|row| row.forman));
        let ollivier = MeasureSummary::from_values(edges.iter().map(|row| row.ollivier));
        Ok(Self {
            schema_version: REPORT_SCHEMA,
            provenance,
            nodes: graph.node_count(),
            edges,
            forman,
            ollivier,
        })
    }

    /// Pretty-printed JSON encoding.
    pub fn to_json(&self) -> Result<String, CurvError> {
        serde_json::to_string_pretty(self).map_err(|err| serde_error("report-json", err))
    }

    /// Parses a report written by [`CurvatureReport::to_json`].
    pub fn from_json(json: &str) -> Result<Self, CurvError> {
        serde_json::from_str(json).map_err(|err| serde_error("report-json", err))
    }

    /// Writes the JSON encoding to `path`.
    pub fn write_json(&self, path: &Path) -> Result<(), CurvError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|err| {
            CurvError::Serde(
                ErrorInfo::new("write-report", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Writes one CSV row per edge with values rounded to `precision` decimals.
    pub fn write_csv<W: Write>(&self, writer: W, precision: usize) -> Result<(), CurvError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["edge", "source", "target", "weight", "forman", "ollivier"])
            .map_err(|err| serde_error("report-csv", err))?;
        for row in &self.edges {
            csv.write_record([
                row.edge.to_string(),
                row.source.to_string(),
                row.target.to_string(),
                format_label(row.weight, precision),
                format_label(row.forman, precision),
                format_label(row.ollivier, precision),
            ])
            .map_err(|err| serde_error("report-csv", err))?;
        }
        csv.flush().map_err(|err| serde_error("report-csv", err))
    }
}

/// Formats a value for display: fixed decimals, a label for non-finite values,
/// and an empty string when absent.
pub fn format_label(value: Option<f64>, precision: usize) -> String {
    match value {
        None => String::new(),
        Some(v) if v.is_finite() => format!("{v:.precision$}"),
        Some(v) => float_repr::label(v).to_string(),
    }
}

/// Builds the provenance record for a pass over `graph` with `config`.
pub fn provenance_for(
    graph: &GraphImpl,
    config: &CurvatureConfig,
    seed: Option<u64>,
) -> Result<RunProvenance, CurvError> {
    let mut tool_versions = BTreeMap::new();
    tool_versions.insert(
        env!("CARGO_PKG_NAME").to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    Ok(RunProvenance {
        graph_hash: canonical_hash(graph)?,
        config_hash: config.fingerprint()?,
        seed,
        tool_versions,
    })
}

fn serde_error(code: &str, err: impl ToString) -> CurvError {
    CurvError::Serde(ErrorInfo::new(code, err.to_string()))
}
