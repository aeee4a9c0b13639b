pub mod calibrator;
pub mod config;
pub mod selector;

pub use calibrator::*;
pub use config::*;
pub use selector::*;
