//! Per-backend pool and auxiliary generation.
//!
//! # Responsibilities
//! - Assemble the pool block for one backend declaration
//! - Derive the auxiliary settings: LB method, keep-alive, slow start,
//!   connection queue, health check

use crate::compiler::params::ConfigParams;
use crate::compiler::routes::string_or;
use crate::compiler::warnings::{ObjectRef, Warnings};
use crate::document::config::{HealthCheckBlock, Queue, UpstreamBlock, UpstreamServer};
use crate::resources::virtual_server::{Upstream, UpstreamQueue};

/// Queue timeout applied when a queue declares none.
pub(crate) const DEFAULT_QUEUE_TIMEOUT: &str = "60s";

/// LB methods that hash requests and therefore cannot ramp a returning
/// server up gradually.
const SLOW_START_INCOMPATIBLE_LB_METHODS: [&str; 6] = [
    "random",
    "ip_hash",
    "random two",
    "random two least_conn",
    "random two least_time=header",
    "random two least_time=last_byte",
];

/// Assembles the pool block for one backend.
///
/// `addresses` is the resolver output: `None` leaves the server list absent
/// for out-of-band population.
pub(crate) fn generate_upstream(
    owner: &ObjectRef,
    name: &str,
    upstream: &Upstream,
    is_external: bool,
    addresses: Option<Vec<String>>,
    params: &ConfigParams,
    dynamic_upstreams: bool,
    warnings: &mut Warnings,
) -> UpstreamBlock {
    let servers = addresses.map(|addresses| {
        addresses
            .into_iter()
            .map(|address| UpstreamServer { address })
            .collect()
    });
    let lb_method = generate_lb_method(upstream.lb_method.as_deref(), &params.lb_method);
    let slow_start = generate_slow_start(owner, upstream, &lb_method, dynamic_upstreams, warnings);

    UpstreamBlock {
        name: name.to_string(),
        servers,
        lb_method,
        resolve: is_external,
        keepalive: upstream.keepalive.unwrap_or(params.keepalive),
        max_fails: upstream.max_fails.unwrap_or(params.max_fails),
        max_conns: upstream.max_conns.unwrap_or(params.max_conns),
        fail_timeout: string_or(upstream.fail_timeout.as_deref(), &params.fail_timeout),
        slow_start,
        upstream_zone_size: params.upstream_zone_size.clone(),
        queue: generate_queue(upstream.queue.as_ref(), dynamic_upstreams, DEFAULT_QUEUE_TIMEOUT),
    }
}

/// Resolves the LB method: the engine's implicit default (`round_robin`)
/// renders as an empty string so no directive is emitted.
pub(crate) fn generate_lb_method(method: Option<&str>, default: &str) -> String {
    match method {
        None | Some("") => default.to_string(),
        Some("round_robin") => String::new(),
        Some(method) => method.to_string(),
    }
}

/// Effective keep-alive count; an explicit 0 override disables keep-alive.
pub(crate) fn upstream_has_keepalive(upstream: &Upstream, params: &ConfigParams) -> bool {
    upstream.keepalive.unwrap_or(params.keepalive) != 0
}

/// Slow-start duration, cleared with a warning when the LB method hashes
/// requests. Only available in the dynamic backend-pool mode.
pub(crate) fn generate_slow_start(
    owner: &ObjectRef,
    upstream: &Upstream,
    lb_method: &str,
    dynamic_upstreams: bool,
    warnings: &mut Warnings,
) -> String {
    if !dynamic_upstreams {
        return String::new();
    }
    let slow_start = match upstream.slow_start.as_deref() {
        Some(slow_start) if !slow_start.is_empty() => slow_start,
        _ => return String::new(),
    };

    let incompatible = SLOW_START_INCOMPATIBLE_LB_METHODS.contains(&lb_method)
        || lb_method.starts_with("hash");
    if incompatible {
        warnings.add(
            owner,
            format!(
                "Slow start will be disabled for upstream {} because the load balancing method '{}' is incompatible with slow start",
                upstream.name, lb_method
            ),
        );
        return String::new();
    }

    slow_start.to_string()
}

/// Connection queue block. Only available in the dynamic backend-pool mode;
/// the timeout defaults when the declaration leaves it unset.
pub(crate) fn generate_queue(
    queue: Option<&UpstreamQueue>,
    dynamic_upstreams: bool,
    default_timeout: &str,
) -> Option<Queue> {
    if !dynamic_upstreams {
        return None;
    }
    let queue = queue?;
    Some(Queue {
        size: queue.size,
        timeout: string_or(queue.timeout.as_deref(), default_timeout),
    })
}

/// Health-check block seeded with the engine defaults.
pub(crate) fn health_check_with_defaults(
    upstream: &Upstream,
    upstream_name: &str,
    params: &ConfigParams,
) -> HealthCheckBlock {
    HealthCheckBlock {
        name: upstream_name.to_string(),
        uri: "/".to_string(),
        interval: "5s".to_string(),
        jitter: "0s".to_string(),
        fails: 1,
        passes: 1,
        port: None,
        proxy_connect_timeout: string_or(
            upstream.proxy_connect_timeout.as_deref(),
            &params.proxy_connect_timeout,
        ),
        proxy_read_timeout: string_or(
            upstream.proxy_read_timeout.as_deref(),
            &params.proxy_read_timeout,
        ),
        proxy_send_timeout: string_or(
            upstream.proxy_send_timeout.as_deref(),
            &params.proxy_send_timeout,
        ),
        proxy_pass: format!("http://{}", upstream_name),
        headers: Default::default(),
        status_match: None,
    }
}

/// Health-check block for one backend, `None` unless checks are enabled.
pub(crate) fn generate_health_check(
    upstream: &Upstream,
    upstream_name: &str,
    params: &ConfigParams,
) -> Option<HealthCheckBlock> {
    let hc = upstream.health_check.as_ref()?;
    if !hc.enable {
        return None;
    }

    let mut block = health_check_with_defaults(upstream, upstream_name, params);

    if let Some(path) = hc.path.as_deref() {
        if !path.is_empty() {
            block.uri = path.to_string();
        }
    }
    if let Some(interval) = hc.interval.as_deref() {
        if !interval.is_empty() {
            block.interval = interval.to_string();
        }
    }
    if let Some(jitter) = hc.jitter.as_deref() {
        if !jitter.is_empty() {
            block.jitter = jitter.to_string();
        }
    }
    if let Some(fails) = hc.fails {
        if fails > 0 {
            block.fails = fails;
        }
    }
    if let Some(passes) = hc.passes {
        if passes > 0 {
            block.passes = passes;
        }
    }
    if let Some(port) = hc.port {
        if port > 0 {
            block.port = Some(port);
        }
    }
    if let Some(timeout) = hc.connect_timeout.as_deref() {
        if !timeout.is_empty() {
            block.proxy_connect_timeout = timeout.to_string();
        }
    }
    if let Some(timeout) = hc.send_timeout.as_deref() {
        if !timeout.is_empty() {
            block.proxy_send_timeout = timeout.to_string();
        }
    }
    if let Some(timeout) = hc.read_timeout.as_deref() {
        if !timeout.is_empty() {
            block.proxy_read_timeout = timeout.to_string();
        }
    }
    for header in &hc.headers {
        block.headers.insert(header.name.clone(), header.value.clone());
    }
    if hc.status_match.as_deref().is_some_and(|expr| !expr.is_empty()) {
        block.status_match = Some(format!("{}_match", upstream_name));
    }

    Some(block)
}
