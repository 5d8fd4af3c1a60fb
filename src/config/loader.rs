//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::calculation::AmountParser;
use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, EngineFile, EngineMetadata, ParsingConfig, ServerConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/default/
/// ├── engine.yaml    # Engine metadata and server address
/// └── parsing.yaml   # Amount parsing settings
/// ```
///
/// # Example
///
/// ```no_run
/// use bill_split_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Serving {} on {}", loader.engine().name, loader.bind_address());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
    amount_parser: AmountParser,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any required field is missing from the configuration
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine_file = Self::load_yaml::<EngineFile>(&path.join("engine.yaml"))?;
        let parsing = Self::load_yaml::<ParsingConfig>(&path.join("parsing.yaml"))?;

        Ok(Self::from_config(EngineConfig::new(
            engine_file.engine,
            engine_file.server,
            parsing,
        )))
    }

    /// Builds a loader from an already-assembled configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        let amount_parser = AmountParser::new(config.parsing().currency_symbols.clone());
        Self {
            config,
            amount_parser,
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the engine metadata.
    pub fn engine(&self) -> &EngineMetadata {
        self.config.engine()
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        self.config.server()
    }

    /// Returns the `host:port` string the server should bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server().host, self.server().port)
    }

    /// Returns the amount parser configured with this bill's currency symbols.
    pub fn amount_parser(&self) -> &AmountParser {
        &self.amount_parser
    }
}
