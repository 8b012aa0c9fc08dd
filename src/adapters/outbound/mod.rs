pub mod fanout_logger;
pub mod file_logger;
pub mod geojson_sink;
pub mod memory_sink;
pub mod tracing_logger;

pub use fanout_logger::*;
pub use file_logger::*;
pub use geojson_sink::*;
pub use memory_sink::*;
pub use tracing_logger::*;
