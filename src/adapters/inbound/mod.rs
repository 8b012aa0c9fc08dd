pub mod scenario_files;

pub use scenario_files::*;
