pub mod logger;
pub mod path_smoothing;

pub use logger::*;
pub use path_smoothing::*;
