//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating repository instances based on
//! runtime configuration.

use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
    /// Conventional relational store (provided by the host application)
    External,
}

impl FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "external" | "sql" => Ok(Self::External),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from the `REPOSITORY_TYPE` environment variable.
    /// Defaults to Local.
    pub fn from_env() -> Self {
        std::env::var("REPOSITORY_TYPE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Self::Local)
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use crewbook::db::{RepositoryFactory, RepositoryType};
///
/// let repo = RepositoryFactory::create(RepositoryType::Local).unwrap();
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// The external variant is wired up by the host application, which owns
    /// the concrete store; requesting it here is a configuration error.
    pub fn create(repo_type: RepositoryType) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::External => Err(RepositoryError::configuration(
                "External repository must be supplied by the host application",
            )),
        }
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    ///
    /// Reads the `REPOSITORY_TYPE` environment variable; defaults to Local.
    pub fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        Self::create(RepositoryType::from_env())
    }
}
