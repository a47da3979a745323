//! Endpoint resolution.
//!
//! # Responsibilities
//! - Map a backend declaration to the concrete addresses of its pool
//! - Apply the fallback and external-name policies
//!
//! # Design Decisions
//! - Address order mirrors the input list; nothing is sorted or synthesized
//!   beyond the literal sentinel
//! - An empty pool is invalid in the target format, so a backend with no
//!   live endpoints fails closed through the 502 sentinel instead

use crate::compiler::names::endpoints_key;
use crate::compiler::warnings::{ObjectRef, Warnings};
use crate::resources::aggregate::VirtualServerAggregate;
use crate::resources::virtual_server::Upstream;

/// Placeholder server for a pool with no live endpoints: requests reach a
/// socket that always answers 502.
pub const ALWAYS_502_SERVER: &str = "unix:/var/run/nginx-502-server.sock";

/// Resolves a backend declaration to its pool addresses.
///
/// Returns `None` when the pool is to be populated out-of-band (dynamic
/// backend-pool mode with a resolver); otherwise `Some` with the addresses,
/// the 502 sentinel, or the explicit empty list for an unusable
/// external-name service.
pub(crate) fn resolve_endpoints(
    owner: &ObjectRef,
    owner_namespace: &str,
    upstream: &Upstream,
    aggregate: &VirtualServerAggregate,
    dynamic_upstreams: bool,
    resolver_configured: bool,
    warnings: &mut Warnings,
) -> Option<Vec<String>> {
    let key = endpoints_key(
        owner_namespace,
        &upstream.service,
        &upstream.subselector,
        upstream.port,
    );
    let found = aggregate.endpoints.get(&key);

    if dynamic_upstreams && resolver_configured {
        // Pools are reconfigured at run time; an empty result is deferred,
        // not an error.
        return found.filter(|addresses| !addresses.is_empty()).cloned();
    }

    if aggregate.is_external_name_service(owner_namespace, &upstream.service) {
        if !resolver_configured {
            warnings.add(
                owner,
                format!(
                    "ExternalName service {} in upstream {} will be ignored: no resolver is configured",
                    upstream.service, upstream.name
                ),
            );
        }
        return Some(Vec::new());
    }

    match found {
        Some(addresses) if !addresses.is_empty() => Some(addresses.clone()),
        _ if !dynamic_upstreams => {
            tracing::debug!(key = %key, "no live endpoints, falling back to the 502 sentinel");
            Some(vec![ALWAYS_502_SERVER.to_string()])
        }
        _ => None,
    }
}
