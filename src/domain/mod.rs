//! Domain layer containing shared building blocks.
//!
//! This module contains:
//! - Error types
//! - Destination directory preparation
//! - Logger with rotation

pub mod destination;
mod error;
pub mod logger;

pub use error::ConfigError;
