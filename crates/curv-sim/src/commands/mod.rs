pub mod curvature;
pub mod generate;
