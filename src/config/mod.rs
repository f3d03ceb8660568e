//! Configuration management module.
//!
//! Handles YAML configuration loading, key-path lookup, and resolution of
//! each setting against its default.

mod service;
mod settings;
mod tree;
mod types;
mod validation;

pub use service::ConfigService;
pub use settings::Settings;
pub use tree::ConfigTree;
pub use types::{ConfigDefaults, ResolvedSettings};
pub use validation::validate;
