pub mod chart;
pub mod filter;
pub mod record;

pub use chart::*;
pub use filter::*;
pub use record::*;
