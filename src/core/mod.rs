pub mod board;
pub mod types;

pub use board::*;
pub use types::*;
