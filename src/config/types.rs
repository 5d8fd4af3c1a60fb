//! Configuration types for the bill split engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::Deserialize;

/// Metadata about the engine build.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineMetadata {
    /// The name reported by the API.
    pub name: String,
    /// The version stamped on every allocation response.
    pub version: String,
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host or IP address to bind.
    pub host: String,
    /// TCP port to bind.
    pub port: u16,
}

/// Structure of `engine.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineFile {
    /// Engine metadata.
    pub engine: EngineMetadata,
    /// Server settings.
    pub server: ServerConfig,
}

/// Structure of `parsing.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsingConfig {
    /// Currency symbols stripped from the front of entered amounts.
    #[serde(default)]
    pub currency_symbols: Vec<String>,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    metadata: EngineMetadata,
    server: ServerConfig,
    parsing: ParsingConfig,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(metadata: EngineMetadata, server: ServerConfig, parsing: ParsingConfig) -> Self {
        Self {
            metadata,
            server,
            parsing,
        }
    }

    /// Returns the engine metadata.
    pub fn engine(&self) -> &EngineMetadata {
        &self.metadata
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    /// Returns the parsing settings.
    pub fn parsing(&self) -> &ParsingConfig {
        &self.parsing
    }
}
