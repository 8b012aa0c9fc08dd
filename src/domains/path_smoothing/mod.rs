pub mod blend;
pub mod bspline;
pub mod clearance;
pub mod pipeline;
pub mod ports;
pub mod repulsion;
pub mod report;
pub mod scenario;
pub mod spline;
pub mod types;
pub mod workspace;

pub use blend::{blend, BlendCurve};
pub use clearance::{analyze, ClearanceReport};
pub use pipeline::*;
pub use ports::*;
pub use repulsion::{repel, repel_from_obstacles, RepulsionParams};
pub use report::SmoothingReport;
pub use scenario::{validate_name, Scenario};
pub use spline::{fit_spline, SmoothingSpline, SplineOptions};
pub use types::*;
pub use workspace::*;
