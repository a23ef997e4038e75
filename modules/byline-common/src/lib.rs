pub mod error;
pub mod types;

pub use error::BylineError;
pub use types::*;
