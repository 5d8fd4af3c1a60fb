//! Configuration loading and management for the Bill Split Engine.
//!
//! This module loads engine settings from YAML files: engine metadata,
//! the server bind address, and the currency symbols accepted in amounts.
//!
//! # Example
//!
//! ```no_run
//! use bill_split_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded engine: {}", config.engine().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineConfig, EngineFile, EngineMetadata, ParsingConfig, ServerConfig};
