//! Weighted traffic splitting.
//!
//! # Responsibilities
//! - Turn an ordered weight list into a distribution table
//! - Emit the synthetic internal locations the distribution dispatches to
//!
//! # Design Decisions
//! - Distribution source is `$request_id` so the choice is per-request and
//!   uniformly random
//! - Weights are emitted verbatim in order; summing to 100 is an input
//!   contract, not re-normalized here

use std::collections::HashMap;

use crate::compiler::names::{UpstreamNamer, VariableNamer};
use crate::compiler::params::ConfigParams;
use crate::compiler::routes::generate_location;
use crate::document::config::{Distribution, InternalRedirectLocation, Location, SplitClient};
use crate::resources::virtual_server::{Split, Upstream};

/// Everything one split route compiles to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SplitRouteCfg {
    pub split_client: SplitClient,
    pub locations: Vec<Location>,
    pub redirect: InternalRedirectLocation,
}

/// Compiles one split route at the given route index.
pub(crate) fn compile_split_route(
    path: &str,
    splits: &[Split],
    namer: &UpstreamNamer,
    upstream_catalog: &HashMap<String, Upstream>,
    variable_namer: &VariableNamer,
    index: usize,
    params: &ConfigParams,
) -> SplitRouteCfg {
    let variable = variable_namer.split_client_variable(index);

    let mut distributions = Vec::with_capacity(splits.len());
    let mut locations = Vec::with_capacity(splits.len());
    for (i, split) in splits.iter().enumerate() {
        let location_path = format!("@splits_{}_split_{}", index, i);
        distributions.push(Distribution {
            weight: format!("{}%", split.weight),
            value: location_path.clone(),
        });

        let upstream_name = namer.name_for(&split.upstream);
        let upstream = upstream_catalog.get(&upstream_name).cloned().unwrap_or_default();
        locations.push(generate_location(&location_path, &upstream_name, &upstream, params));
    }

    SplitRouteCfg {
        split_client: SplitClient {
            source: "$request_id".to_string(),
            variable: variable.clone(),
            distributions,
        },
        locations,
        redirect: InternalRedirectLocation {
            path: path.to_string(),
            destination: variable,
        },
    }
}
