pub mod dates;
pub mod types;

pub use types::*;
