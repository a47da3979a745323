//! Routing resource definitions.
//!
//! # Responsibilities
//! - Define the CRD-shaped routing objects the controller watches
//! - Classify routes into exactly one action (pass, split, rules, delegate)
//!
//! # Design Decisions
//! - All types derive Serde traits; field names follow the Kubernetes
//!   camelCase JSON convention
//! - Per-backend overrides are `Option`s so "unset" stays distinct from an
//!   explicit zero/empty value (keepalive 0 disables, keepalive unset
//!   inherits the global default)
//! - `Condition` is a closed sum type: one variant per supported source kind

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identity of a watched object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
}

/// The primary routing object: one virtual host with its backends and routes.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct VirtualServer {
    pub metadata: ObjectMeta,
    pub spec: VirtualServerSpec,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualServerSpec {
    /// Host this server answers for. Also used as the status zone name.
    pub host: String,

    /// TLS termination settings. No TLS block is generated when absent.
    pub tls: Option<Tls>,

    /// Backend declarations, unique by name within this object.
    pub upstreams: Vec<Upstream>,

    /// Routes in declaration order.
    pub routes: Vec<Route>,
}

/// A delegated sub-route object contributing backends and routes under a
/// path owned by a [`VirtualServer`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct VirtualServerRoute {
    pub metadata: ObjectMeta,
    pub spec: VirtualServerRouteSpec,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualServerRouteSpec {
    pub host: String,
    pub upstreams: Vec<Upstream>,
    pub subroutes: Vec<Route>,
}

/// TLS termination settings for a virtual server.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Tls {
    /// Name of the secret holding the certificate and key.
    pub secret: String,
}

/// A backend declaration: a service reference plus per-backend overrides.
///
/// Every override falls back to the global [`ConfigParams`] value when unset.
///
/// [`ConfigParams`]: crate::compiler::params::ConfigParams
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Upstream {
    /// Logical name, unique within the owning object.
    pub name: String,

    /// Target service name.
    pub service: String,

    /// Target service port.
    pub port: u16,

    /// Optional label subselector narrowing the service's endpoints.
    /// Order-independent; serialized into the endpoint-lookup key in sorted
    /// key order.
    pub subselector: BTreeMap<String, String>,

    /// Load-balancing method. `round_robin` is the engine default and is
    /// emitted as an empty string.
    pub lb_method: Option<String>,

    /// TLS towards the backend (selects the `https` proxy scheme).
    pub tls: UpstreamTls,

    /// Active health-check settings (dynamic backend-pool mode).
    pub health_check: Option<HealthCheck>,

    /// Connection queue (dynamic backend-pool mode).
    pub queue: Option<UpstreamQueue>,

    /// Slow-start duration. Incompatible with hashing LB methods.
    pub slow_start: Option<String>,

    /// Keep-alive connection count. `Some(0)` disables keep-alive, which is
    /// distinct from unset.
    pub keepalive: Option<u32>,

    pub max_fails: Option<u32>,
    pub max_conns: Option<u32>,
    pub fail_timeout: Option<String>,

    pub proxy_connect_timeout: Option<String>,
    pub proxy_read_timeout: Option<String>,
    pub proxy_send_timeout: Option<String>,
    pub proxy_next_upstream: Option<String>,
    pub proxy_next_upstream_timeout: Option<String>,
    pub proxy_next_upstream_tries: u32,
    pub client_max_body_size: Option<String>,
    pub proxy_buffering: Option<bool>,
    pub proxy_buffers: Option<UpstreamBuffers>,
    pub proxy_buffer_size: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamTls {
    pub enable: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamBuffers {
    pub number: u32,
    pub size: String,
}

/// Active health-check settings for a backend.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthCheck {
    pub enable: bool,
    pub path: Option<String>,
    pub interval: Option<String>,
    pub jitter: Option<String>,
    pub fails: Option<u32>,
    pub passes: Option<u32>,
    pub port: Option<u16>,
    pub connect_timeout: Option<String>,
    pub send_timeout: Option<String>,
    pub read_timeout: Option<String>,
    pub headers: Vec<Header>,
    /// Expression describing which response statuses count as healthy.
    pub status_match: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Connection queue settings for a backend.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamQueue {
    pub size: u32,
    pub timeout: Option<String>,
}

/// A route: a path plus exactly one populated action variant.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Route {
    pub path: String,

    /// Direct backend reference.
    pub upstream: Option<String>,

    /// Weighted traffic split.
    pub splits: Vec<Split>,

    /// Condition-based routing rules.
    pub rules: Option<Rules>,

    /// Delegates this path to a [`VirtualServerRoute`] (`namespace/name`).
    pub route: Option<String>,
}

/// The single action a [`Route`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction<'a> {
    /// Proxy directly to the named backend.
    Pass(&'a str),
    /// Distribute by weight over several backends.
    Split(&'a [Split]),
    /// Dispatch on request conditions.
    Rules(&'a Rules),
    /// Hand the path over to a delegated sub-route object.
    Delegate(&'a str),
}

impl Route {
    /// Classifies the route into its action.
    ///
    /// Returns `None` when zero or more than one variant is populated; the
    /// caller reports that as a warning and skips the route.
    pub fn action(&self) -> Option<RouteAction<'_>> {
        let mut action = None;
        let mut populated = 0;

        if let Some(upstream) = self.upstream.as_deref() {
            if !upstream.is_empty() {
                action = Some(RouteAction::Pass(upstream));
                populated += 1;
            }
        }
        if !self.splits.is_empty() {
            action = Some(RouteAction::Split(&self.splits));
            populated += 1;
        }
        if let Some(rules) = &self.rules {
            action = Some(RouteAction::Rules(rules));
            populated += 1;
        }
        if let Some(target) = self.route.as_deref() {
            if !target.is_empty() {
                action = Some(RouteAction::Delegate(target));
                populated += 1;
            }
        }

        if populated == 1 {
            action
        } else {
            None
        }
    }
}

/// One weighted alternative of a split route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Split {
    pub weight: u32,
    pub upstream: String,
}

/// Condition-based routing: ordered conditions, ordered matches, and the
/// backend used when no match succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rules {
    pub conditions: Vec<Condition>,
    pub matches: Vec<Match>,
    pub default_upstream: String,
}

/// Where a condition reads its value from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// A request header, e.g. `x-version`.
    Header(String),
    /// A cookie name.
    Cookie(String),
    /// A query argument name.
    Argument(String),
    /// A raw proxy variable, e.g. `$request_method`.
    Variable(String),
}

/// One match clause: one value per condition, positionally aligned, plus the
/// target backend. Values may carry a leading `!` negation marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Match {
    pub values: Vec<String>,
    pub upstream: String,
}
