//! The routing aggregate: everything one compilation reads.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::compiler::names::external_name_service_key;
use crate::resources::virtual_server::{VirtualServer, VirtualServerRoute};

/// Immutable input for one compilation: the primary routing object, its
/// delegated sub-route objects, and the live endpoint data gathered by the
/// watch collaborator.
///
/// The two map fields are only ever looked up by key, never iterated, so
/// their unordered nature cannot leak into the generated document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualServerAggregate {
    pub virtual_server: VirtualServer,

    /// Sub-route objects referenced by delegation routes.
    pub virtual_server_routes: Vec<VirtualServerRoute>,

    /// `namespace/service[_subselector]:port` to live addresses, in the
    /// order the endpoints collaborator discovered them.
    pub endpoints: HashMap<String, Vec<String>>,

    /// `namespace/service` keys of services resolved externally via DNS.
    pub external_name_services: HashSet<String>,
}

impl VirtualServerAggregate {
    /// Whether the service is resolved externally (DNS) rather than through
    /// cluster endpoints.
    pub fn is_external_name_service(&self, namespace: &str, service: &str) -> bool {
        self.external_name_services
            .contains(&external_name_service_key(namespace, service))
    }

    /// Looks up a delegated sub-route object by its `namespace/name`
    /// reference.
    pub fn route_object(&self, reference: &str) -> Option<&VirtualServerRoute> {
        self.virtual_server_routes.iter().find(|vsr| {
            let meta = &vsr.metadata;
            reference
                .split_once('/')
                .is_some_and(|(namespace, name)| meta.namespace == namespace && meta.name == name)
        })
    }
}

impl fmt::Display for VirtualServerAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meta = &self.virtual_server.metadata;
        write!(f, "{}/{}", meta.namespace, meta.name)
    }
}
