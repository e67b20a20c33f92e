use serde::{Deserialize, Serialize};

/// Snapshot of the typed attributes stored on a single edge.
///
/// `forman` and `ollivier` are owned by independent passes; either may be
/// absent when its calculator never ran.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EdgeAttributes {
    /// Edge weight, `None` until set by the caller or the normalizer.
    pub weight: Option<f64>,
    /// Forman-Ricci curvature from the most recent Forman pass.
    pub forman: Option<f64>,
    /// Ollivier-Ricci curvature from the most recent Ollivier pass.
    pub ollivier: Option<f64>,
}

/// Identifies which curvature attribute a pass writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurvatureKind {
    /// Forman-Ricci curvature.
    Forman,
    /// Ollivier-Ricci curvature.
    Ollivier,
}

impl CurvatureKind {
    /// Returns the attribute label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            CurvatureKind::Forman => "forman",
            CurvatureKind::Ollivier => "ollivier",
        }
    }
}
