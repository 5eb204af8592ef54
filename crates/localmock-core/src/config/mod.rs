//! Configuration loading: engine options and the file formats shared by
//! options, route tables and mock definitions.

pub mod error;
pub mod options;
pub mod parser;

pub use error::ConfigError;
pub use options::MockOptions;
