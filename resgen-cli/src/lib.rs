//! CLI library for testing purposes

pub mod config;
pub mod path_glob;
pub mod validation;

pub use config::ConfigFile;
pub use path_glob::expand_includes;
