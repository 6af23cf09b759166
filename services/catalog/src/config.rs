//! Catalog service configuration

use anyhow::Result;
use std::env;

/// Which storage backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

/// Catalog service configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Selected storage backend
    pub backend: StorageBackend,
}

impl CatalogConfig {
    /// Create a new CatalogConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDR`: listen address (default: "0.0.0.0:8080")
    /// - `STORAGE_BACKEND`: "memory" or "postgres" (default: "memory")
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let backend = match env::var("STORAGE_BACKEND").as_deref() {
            Ok("postgres") => StorageBackend::Postgres,
            Ok("memory") | Err(_) => StorageBackend::Memory,
            Ok(other) => anyhow::bail!("Unknown STORAGE_BACKEND: {}", other),
        };

        Ok(Self { bind_addr, backend })
    }
}
