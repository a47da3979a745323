//! Generated configuration document.
//!
//! # Responsibilities
//! - Model every block the renderer emits, one field per configuration line
//!
//! # Design Decisions
//! - The renderer performs no semantic transformation, so field values and
//!   ordering here are the compiler's contract
//! - `PartialEq` on everything: documents are compared whole in tests
//! - Health-check headers use a `BTreeMap` so rendering order is stable

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The complete configuration document for one virtual server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct VirtualServerDocument {
    /// Named backend pools, unique by name across the document.
    pub upstreams: Vec<UpstreamBlock>,

    /// Lookup tables, in generation order.
    pub maps: Vec<Map>,

    /// Weighted-distribution tables, in generation order.
    pub split_clients: Vec<SplitClient>,

    pub server: Server,
}

/// A backend pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamBlock {
    pub name: String,

    /// Resolved servers in input order. `None` means the pool is populated
    /// out-of-band (dynamic backend-pool mode); `Some(vec![])` is the
    /// explicit empty marker for a fail-closed external-name pool.
    pub servers: Option<Vec<UpstreamServer>>,

    /// Load-balancing method; empty selects the engine default.
    pub lb_method: String,

    /// Resolve server addresses at run time via DNS.
    pub resolve: bool,

    /// Keep-alive connection count; 0 disables keep-alive.
    pub keepalive: u32,

    pub max_fails: u32,
    pub max_conns: u32,
    pub fail_timeout: String,
    pub slow_start: String,
    pub upstream_zone_size: String,
    pub queue: Option<Queue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamServer {
    pub address: String,
}

/// Connection queue of a backend pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Queue {
    pub size: u32,
    pub timeout: String,
}

/// A lookup table mapping a source value to a result (first match wins,
/// `default` last).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Map {
    pub source: String,
    pub variable: String,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Parameter {
    pub value: String,
    pub result: String,
}

/// A weighted-distribution table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SplitClient {
    pub source: String,
    pub variable: String,
    pub distributions: Vec<Distribution>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Distribution {
    pub weight: String,
    pub value: String,
}

/// The server block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Server {
    pub server_name: String,

    /// Status zone, equal to the host.
    pub status_zone: String,

    pub proxy_protocol: bool,
    pub ssl: Option<Ssl>,
    pub redirect_to_https_based_on_x_forwarded_proto: bool,
    pub server_tokens: String,
    pub set_real_ip_from: Vec<String>,
    pub real_ip_header: String,
    pub real_ip_recursive: bool,
    pub snippets: Vec<String>,

    /// Status-match blocks referenced by health checks.
    pub status_matches: Vec<StatusMatch>,

    /// Health-check blocks, one per backend with checks enabled.
    pub health_checks: Vec<HealthCheckBlock>,

    /// Route paths redirected to their dispatch variable.
    pub internal_redirect_locations: Vec<InternalRedirectLocation>,

    /// Location entries in generation order.
    pub locations: Vec<Location>,
}

/// TLS termination settings of the server block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Ssl {
    pub http2: bool,
    pub certificate: String,
    pub certificate_key: String,
    pub ciphers: String,
    pub redirect_to_https: bool,
}

/// A proxying location entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Location {
    pub path: String,
    pub snippets: Vec<String>,
    pub proxy_connect_timeout: String,
    pub proxy_read_timeout: String,
    pub proxy_send_timeout: String,
    pub client_max_body_size: String,
    pub proxy_max_temp_file_size: String,
    pub proxy_buffering: bool,
    pub proxy_buffers: String,
    pub proxy_buffer_size: String,
    pub proxy_pass: String,
    pub proxy_next_upstream: String,
    pub proxy_next_upstream_timeout: String,
    pub proxy_next_upstream_tries: u32,
    pub has_keepalive: bool,
}

/// Redirects a route path to the variable that picks its destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct InternalRedirectLocation {
    pub path: String,
    pub destination: String,
}

/// A status-match block: which response statuses a health check accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusMatch {
    pub name: String,
    pub code: String,
}

/// A health-check block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckBlock {
    pub name: String,
    pub uri: String,
    pub interval: String,
    pub jitter: String,
    pub fails: u32,
    pub passes: u32,
    pub port: Option<u16>,
    pub proxy_connect_timeout: String,
    pub proxy_read_timeout: String,
    pub proxy_send_timeout: String,
    pub proxy_pass: String,
    pub headers: BTreeMap<String, String>,
    /// Name of the status-match block, when one is configured.
    pub status_match: Option<String>,
}
