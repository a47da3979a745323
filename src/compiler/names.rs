//! Deterministic name generation.
//!
//! # Responsibilities
//! - Derive backend-pool names and internal variable names from object
//!   identity and declared indices
//! - Build endpoint-lookup keys
//!
//! # Design Decisions
//! - Names are pure functions of (namespace, name, index); never derived
//!   from pointers or allocation order, so repeated compilation of the same
//!   input yields the same names
//! - Two backends with the same logical name in different owner chains can
//!   never collide: the chain components are part of the name
//! - Only variable names are sanitized; pool names may keep dashes

use std::collections::BTreeMap;

use crate::resources::virtual_server::{VirtualServer, VirtualServerRoute};

/// Builds the endpoint-lookup key for a service reference.
///
/// `namespace/service:port`, with the sorted subselector spliced in as
/// `_k1=v1,k2=v2` when present.
pub fn endpoints_key(
    namespace: &str,
    service: &str,
    subselector: &BTreeMap<String, String>,
    port: u16,
) -> String {
    if subselector.is_empty() {
        return format!("{}/{}:{}", namespace, service, port);
    }
    let selector = subselector
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(",");
    format!("{}/{}_{}:{}", namespace, service, selector, port)
}

/// Key marking a service as externally resolved.
pub fn external_name_service_key(namespace: &str, service: &str) -> String {
    format!("{}/{}", namespace, service)
}

/// Replaces characters that are illegal in variable names.
pub(crate) fn safe_variable_fragment(value: &str) -> String {
    value.replace(['-', '.'], "_")
}

/// Derives backend-pool names from an owner chain.
#[derive(Debug, Clone)]
pub struct UpstreamNamer {
    prefix: String,
}

impl UpstreamNamer {
    /// Namer for backends declared on the primary object.
    pub fn for_virtual_server(vs: &VirtualServer) -> Self {
        Self {
            prefix: format!("vs_{}_{}", vs.metadata.namespace, vs.metadata.name),
        }
    }

    /// Namer for backends declared on a delegated sub-route object; the
    /// owner chain keeps both identities.
    pub fn for_virtual_server_route(vs: &VirtualServer, vsr: &VirtualServerRoute) -> Self {
        Self {
            prefix: format!(
                "vs_{}_{}_vsr_{}_{}",
                vs.metadata.namespace,
                vs.metadata.name,
                vsr.metadata.namespace,
                vsr.metadata.name
            ),
        }
    }

    pub fn name_for(&self, upstream: &str) -> String {
        format!("{}_{}", self.prefix, upstream)
    }
}

/// Derives internal variable names for one primary object.
#[derive(Debug, Clone)]
pub struct VariableNamer {
    safe_ns_name: String,
}

impl VariableNamer {
    pub fn new(vs: &VirtualServer) -> Self {
        Self {
            safe_ns_name: safe_variable_fragment(&format!(
                "{}_{}",
                vs.metadata.namespace, vs.metadata.name
            )),
        }
    }

    /// Variable selecting the split destination of the indexed route.
    pub fn split_client_variable(&self, index: usize) -> String {
        format!("$vs_{}_splits_{}", self.safe_ns_name, index)
    }

    /// Variable holding the result of one condition of one match.
    pub fn rules_map_variable(
        &self,
        rules_index: usize,
        match_index: usize,
        condition_index: usize,
    ) -> String {
        format!(
            "$vs_{}_rules_{}_match_{}_cond_{}",
            self.safe_ns_name, rules_index, match_index, condition_index
        )
    }

    /// Variable selecting the winning match of the indexed rule-set.
    pub fn rules_main_map_variable(&self, rules_index: usize) -> String {
        format!("$vs_{}_rules_{}", self.safe_ns_name, rules_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::virtual_server::ObjectMeta;

    fn virtual_server(namespace: &str, name: &str) -> VirtualServer {
        VirtualServer {
            metadata: ObjectMeta {
                name: name.to_string(),
                namespace: namespace.to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoints_key() {
        let key = endpoints_key("default", "test", &BTreeMap::new(), 80);
        assert_eq!(key, "default/test:80");

        let subselector = BTreeMap::from([("version".to_string(), "v1".to_string())]);
        let key = endpoints_key("default", "test", &subselector, 80);
        assert_eq!(key, "default/test_version=v1:80");
    }

    #[test]
    fn test_endpoints_key_sorts_subselector() {
        let subselector = BTreeMap::from([
            ("tier".to_string(), "backend".to_string()),
            ("app".to_string(), "tea".to_string()),
        ]);
        let key = endpoints_key("default", "test", &subselector, 8080);
        assert_eq!(key, "default/test_app=tea,tier=backend:8080");
    }

    #[test]
    fn test_upstream_namer_for_virtual_server() {
        let vs = virtual_server("default", "cafe");
        let namer = UpstreamNamer::for_virtual_server(&vs);
        assert_eq!(namer.name_for("test"), "vs_default_cafe_test");
    }

    #[test]
    fn test_upstream_namer_for_virtual_server_route() {
        let vs = virtual_server("default", "cafe");
        let vsr = VirtualServerRoute {
            metadata: ObjectMeta {
                name: "coffee".to_string(),
                namespace: "default".to_string(),
            },
            ..Default::default()
        };
        let namer = UpstreamNamer::for_virtual_server_route(&vs, &vsr);
        assert_eq!(
            namer.name_for("test"),
            "vs_default_cafe_vsr_default_coffee_test"
        );
    }

    #[test]
    fn test_pool_names_keep_dashes() {
        let vs = virtual_server("default", "cafe");
        let namer = UpstreamNamer::for_virtual_server(&vs);
        assert_eq!(namer.name_for("tea-latest"), "vs_default_cafe_tea-latest");
    }

    #[test]
    fn test_variable_namer_sanitizes_ns_name() {
        let vs = virtual_server("default", "cafe-test");
        let namer = VariableNamer::new(&vs);
        assert_eq!(namer.split_client_variable(0), "$vs_default_cafe_test_splits_0");
    }

    #[test]
    fn test_variable_namer() {
        let vs = virtual_server("default", "cafe");
        let namer = VariableNamer::new(&vs);

        assert_eq!(namer.split_client_variable(0), "$vs_default_cafe_splits_0");
        assert_eq!(
            namer.rules_map_variable(1, 2, 3),
            "$vs_default_cafe_rules_1_match_2_cond_3"
        );
        assert_eq!(namer.rules_main_map_variable(2), "$vs_default_cafe_rules_2");
    }
}
