pub mod config;
pub mod entropy;
pub mod error;

pub use config::*;
pub use entropy::*;
pub use error::*;
