//! Top-level configuration assembly.
//!
//! # Responsibilities
//! - Resolve every backend declaration into a named pool exactly once
//! - Iterate routes in declaration order, splicing delegated sub-routes in
//!   at their delegation point
//! - Assemble the final document and accumulate warnings
//!
//! # Design Decisions
//! - Purely functional per call: all working state (name tables, warning
//!   list, document) lives in a per-call session, so concurrent
//!   compilations of different aggregates never interfere
//! - Every effective route consumes one monotonically increasing index used
//!   for all generated names, keeping names a pure function of declared
//!   positions
//! - A misconfigured route is skipped with a warning; it never blocks the
//!   rest of the document

use std::collections::{HashMap, HashSet};

use crate::compiler::endpoints::resolve_endpoints;
use crate::compiler::names::{UpstreamNamer, VariableNamer};
use crate::compiler::params::ConfigParams;
use crate::compiler::routes::generate_location;
use crate::compiler::rules::{compile_rules_route, MAX_RULE_MATCHES};
use crate::compiler::splits::compile_split_route;
use crate::compiler::upstreams::{generate_health_check, generate_upstream};
use crate::compiler::warnings::{ObjectRef, Warnings};
use crate::document::config::{
    HealthCheckBlock, InternalRedirectLocation, Location, Map, Server, SplitClient, Ssl,
    StatusMatch, UpstreamBlock, VirtualServerDocument,
};
use crate::resources::aggregate::VirtualServerAggregate;
use crate::resources::virtual_server::{Route, RouteAction, Tls, Upstream};

/// Certificate path substituted when a referenced TLS secret was never
/// materialized; combined with the `NULL` cipher suite it guarantees no
/// handshake can complete.
const MISSING_SECRET_CERT_FILE: &str = "/etc/nginx/secrets/default";

/// Compiles routing aggregates into configuration documents.
///
/// One configurator carries the controller-wide parameters and mode flags;
/// it holds no per-compilation state, so a single instance may serve
/// concurrent compilations.
#[derive(Debug, Clone)]
pub struct VirtualServerConfigurator {
    params: ConfigParams,
    dynamic_upstreams: bool,
    resolver_configured: bool,
}

impl VirtualServerConfigurator {
    pub fn new(params: ConfigParams, dynamic_upstreams: bool, resolver_configured: bool) -> Self {
        Self {
            params,
            dynamic_upstreams,
            resolver_configured,
        }
    }

    /// Compiles one aggregate into its document and warning list.
    ///
    /// `tls_cert_file` is the certificate bundle materialized by the secret
    /// collaborator; empty means the referenced secret was not resolved.
    pub fn compile(
        &self,
        aggregate: &VirtualServerAggregate,
        tls_cert_file: &str,
    ) -> (VirtualServerDocument, Warnings) {
        let mut session = CompileSession::new(self, aggregate);
        session.compile_pools();
        session.compile_routes();
        session.finish(tls_cert_file)
    }
}

/// Working state of one compilation, discarded when the document is built.
struct CompileSession<'a> {
    params: &'a ConfigParams,
    dynamic_upstreams: bool,
    resolver_configured: bool,
    aggregate: &'a VirtualServerAggregate,

    vs_ref: ObjectRef,
    vs_namer: UpstreamNamer,
    variable_namer: VariableNamer,

    pools: Vec<UpstreamBlock>,
    health_checks: Vec<HealthCheckBlock>,
    status_matches: Vec<StatusMatch>,
    catalog: HashMap<String, Upstream>,
    seen_pool_names: HashSet<String>,

    locations: Vec<Location>,
    redirects: Vec<InternalRedirectLocation>,
    split_clients: Vec<SplitClient>,
    maps: Vec<Map>,
    route_index: usize,

    warnings: Warnings,
}

impl<'a> CompileSession<'a> {
    fn new(
        configurator: &'a VirtualServerConfigurator,
        aggregate: &'a VirtualServerAggregate,
    ) -> Self {
        let vs = &aggregate.virtual_server;
        Self {
            params: &configurator.params,
            dynamic_upstreams: configurator.dynamic_upstreams,
            resolver_configured: configurator.resolver_configured,
            aggregate,
            vs_ref: ObjectRef::virtual_server(vs),
            vs_namer: UpstreamNamer::for_virtual_server(vs),
            variable_namer: VariableNamer::new(vs),
            pools: Vec::new(),
            health_checks: Vec::new(),
            status_matches: Vec::new(),
            catalog: HashMap::new(),
            seen_pool_names: HashSet::new(),
            locations: Vec::new(),
            redirects: Vec::new(),
            split_clients: Vec::new(),
            maps: Vec::new(),
            route_index: 0,
            warnings: Warnings::new(),
        }
    }

    /// Pools: primary declarations first, then each sub-route object's,
    /// de-duplicated by generated name (first wins).
    fn compile_pools(&mut self) {
        let aggregate = self.aggregate;
        let vs = &aggregate.virtual_server;

        let owner = self.vs_ref.clone();
        let namer = self.vs_namer.clone();
        for upstream in &vs.spec.upstreams {
            self.compile_pool(upstream, &owner, &vs.metadata.namespace, &namer);
        }

        for vsr in &aggregate.virtual_server_routes {
            let owner = ObjectRef::virtual_server_route(vsr);
            let namer = UpstreamNamer::for_virtual_server_route(vs, vsr);
            for upstream in &vsr.spec.upstreams {
                self.compile_pool(upstream, &owner, &vsr.metadata.namespace, &namer);
            }
        }
    }

    fn compile_pool(
        &mut self,
        upstream: &Upstream,
        owner: &ObjectRef,
        owner_namespace: &str,
        namer: &UpstreamNamer,
    ) {
        let name = namer.name_for(&upstream.name);
        if !self.seen_pool_names.insert(name.clone()) {
            tracing::debug!(name = %name, "duplicate pool name, keeping the first declaration");
            return;
        }

        let addresses = resolve_endpoints(
            owner,
            owner_namespace,
            upstream,
            self.aggregate,
            self.dynamic_upstreams,
            self.resolver_configured,
            &mut self.warnings,
        );
        let is_external = self
            .aggregate
            .is_external_name_service(owner_namespace, &upstream.service);
        self.pools.push(generate_upstream(
            owner,
            &name,
            upstream,
            is_external,
            addresses,
            self.params,
            self.dynamic_upstreams,
            &mut self.warnings,
        ));

        if let Some(block) = generate_health_check(upstream, &name, self.params) {
            if let (Some(match_name), Some(expression)) = (
                block.status_match.as_ref(),
                upstream
                    .health_check
                    .as_ref()
                    .and_then(|hc| hc.status_match.as_ref()),
            ) {
                self.status_matches.push(StatusMatch {
                    name: match_name.clone(),
                    code: expression.clone(),
                });
            }
            self.health_checks.push(block);
        }

        self.catalog.insert(name, upstream.clone());
    }

    /// Routes: declaration order, delegations spliced in place.
    fn compile_routes(&mut self) {
        let aggregate = self.aggregate;
        let vs = &aggregate.virtual_server;

        for route in &vs.spec.routes {
            if let Some(RouteAction::Delegate(reference)) = route.action() {
                match aggregate.route_object(reference) {
                    Some(vsr) => {
                        let owner = ObjectRef::virtual_server_route(vsr);
                        let namer = UpstreamNamer::for_virtual_server_route(vs, vsr);
                        for subroute in &vsr.spec.subroutes {
                            self.compile_effective_route(subroute, &owner, &namer);
                        }
                    }
                    None => {
                        let owner = self.vs_ref.clone();
                        self.warnings.add(
                            &owner,
                            format!(
                                "Route {} references a missing sub-route object {}",
                                route.path, reference
                            ),
                        );
                    }
                }
                continue;
            }

            let owner = self.vs_ref.clone();
            let namer = self.vs_namer.clone();
            self.compile_effective_route(route, &owner, &namer);
        }
    }

    /// Compiles one effective route (a primary route or a spliced
    /// sub-route); every effective route consumes one route index.
    fn compile_effective_route(
        &mut self,
        route: &Route,
        owner: &ObjectRef,
        namer: &UpstreamNamer,
    ) {
        let index = self.route_index;
        self.route_index += 1;

        match route.action() {
            Some(RouteAction::Pass(upstream)) => {
                let upstream_name = namer.name_for(upstream);
                let upstream = self.lookup(&upstream_name);
                self.locations.push(generate_location(
                    &route.path,
                    &upstream_name,
                    &upstream,
                    self.params,
                ));
            }
            Some(RouteAction::Split(splits)) => {
                let cfg = compile_split_route(
                    &route.path,
                    splits,
                    namer,
                    &self.catalog,
                    &self.variable_namer,
                    index,
                    self.params,
                );
                self.split_clients.push(cfg.split_client);
                self.locations.extend(cfg.locations);
                self.redirects.push(cfg.redirect);
            }
            Some(RouteAction::Rules(rules)) => {
                if rules.matches.len() > MAX_RULE_MATCHES {
                    self.warnings.add(
                        owner,
                        format!(
                            "Route {} ignored: {} matches exceed the supported maximum of {}",
                            route.path,
                            rules.matches.len(),
                            MAX_RULE_MATCHES
                        ),
                    );
                    return;
                }
                let cfg = compile_rules_route(
                    &route.path,
                    rules,
                    namer,
                    &self.catalog,
                    &self.variable_namer,
                    index,
                    self.params,
                );
                self.maps.extend(cfg.maps);
                self.locations.extend(cfg.locations);
                self.redirects.push(cfg.redirect);
            }
            Some(RouteAction::Delegate(_)) => {
                // Delegation is resolved before routes reach this point; a
                // sub-route cannot delegate further.
                self.warnings.add(
                    owner,
                    format!("Route {} ignored: delegation is not allowed here", route.path),
                );
            }
            None => {
                self.warnings.add(
                    owner,
                    format!(
                        "Route {} ignored: exactly one of upstream, splits, rules or route must be set",
                        route.path
                    ),
                );
            }
        }
    }

    /// Backend declaration under the generated pool name; defaults when the
    /// route references an undeclared backend.
    fn lookup(&self, upstream_name: &str) -> Upstream {
        self.catalog
            .get(upstream_name)
            .cloned()
            .unwrap_or_default()
    }

    fn finish(self, tls_cert_file: &str) -> (VirtualServerDocument, Warnings) {
        let vs = &self.aggregate.virtual_server;
        let params = self.params;

        let document = VirtualServerDocument {
            upstreams: self.pools,
            maps: self.maps,
            split_clients: self.split_clients,
            server: Server {
                server_name: vs.spec.host.clone(),
                status_zone: vs.spec.host.clone(),
                proxy_protocol: params.proxy_protocol,
                ssl: generate_ssl_config(vs.spec.tls.as_ref(), tls_cert_file, params),
                redirect_to_https_based_on_x_forwarded_proto: params.redirect_to_https,
                server_tokens: params.server_tokens.clone(),
                set_real_ip_from: params.set_real_ip_from.clone(),
                real_ip_header: params.real_ip_header.clone(),
                real_ip_recursive: params.real_ip_recursive,
                snippets: params.server_snippets.clone(),
                status_matches: self.status_matches,
                health_checks: self.health_checks,
                internal_redirect_locations: self.redirects,
                locations: self.locations,
            },
        };

        (document, self.warnings)
    }
}

/// TLS settings of the server block.
///
/// No TLS configured yields no block. TLS configured but the secret never
/// materialized yields an intentionally broken block so misconfiguration
/// cannot silently serve plaintext.
pub(crate) fn generate_ssl_config(
    tls: Option<&Tls>,
    tls_cert_file: &str,
    params: &ConfigParams,
) -> Option<Ssl> {
    let tls = tls?;
    if tls.secret.is_empty() {
        return None;
    }

    let (certificate, ciphers) = if tls_cert_file.is_empty() {
        (MISSING_SECRET_CERT_FILE.to_string(), "NULL".to_string())
    } else {
        (tls_cert_file.to_string(), String::new())
    };

    Some(Ssl {
        http2: params.http2,
        certificate: certificate.clone(),
        certificate_key: certificate,
        ciphers,
        redirect_to_https: params.ssl_redirect,
    })
}
