pub mod alpha_beta;
pub mod evaluation;
pub mod move_ordering;
pub mod tiers;

pub use alpha_beta::*;
pub use evaluation::*;
pub use move_ordering::*;
pub use tiers::*;
