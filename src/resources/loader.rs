//! Aggregate loading from disk for debug tooling.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::compiler::params::ConfigParams;
use crate::resources::aggregate::VirtualServerAggregate;

/// Error type for loading compiler inputs from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load a routing aggregate from a JSON file.
pub fn load_aggregate(path: &Path) -> Result<VirtualServerAggregate, LoadError> {
    let content = fs::read_to_string(path)?;
    let aggregate = serde_json::from_str(&content)?;
    Ok(aggregate)
}

/// Load global configuration parameters from a JSON file.
pub fn load_params(path: &Path) -> Result<ConfigParams, LoadError> {
    let content = fs::read_to_string(path)?;
    let params = serde_json::from_str(&content)?;
    Ok(params)
}
