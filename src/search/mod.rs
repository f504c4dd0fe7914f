pub mod alpha_beta;
pub mod config;
pub mod evaluation;
pub mod opening;
pub mod selector;

pub use alpha_beta::*;
pub use config::*;
pub use evaluation::*;
pub use opening::*;
pub use selector::*;
