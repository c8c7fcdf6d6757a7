pub mod anomaly;
pub mod geometry;
pub mod sampling;
