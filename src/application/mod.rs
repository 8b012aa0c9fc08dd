pub mod smoothing_service;

pub use smoothing_service::*;
