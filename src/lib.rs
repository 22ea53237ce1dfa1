pub mod config;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod optimizer;
pub mod oracle;
pub mod random;
pub mod scorer;
// cmd and reports are binary modules (see main.rs).

pub use error::{MetroResult, MetropolisError};
pub use random::RandomSource;
