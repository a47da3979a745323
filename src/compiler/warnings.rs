//! Warning accumulation.
//!
//! # Responsibilities
//! - Carry recoverable per-object anomalies to the caller in a stable order
//!
//! # Design Decisions
//! - One `Warnings` value is allocated per compilation and threaded through
//!   every sub-compiler as `&mut`; nothing is process-wide
//! - Entries keep insertion order so repeated compilations report warnings
//!   identically

use std::fmt;

use crate::resources::virtual_server::{VirtualServer, VirtualServerRoute};

/// Identity of the object a warning belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub kind: &'static str,
    pub namespace: String,
    pub name: String,
}

impl ObjectRef {
    pub fn virtual_server(vs: &VirtualServer) -> Self {
        Self {
            kind: "VirtualServer",
            namespace: vs.metadata.namespace.clone(),
            name: vs.metadata.name.clone(),
        }
    }

    pub fn virtual_server_route(vsr: &VirtualServerRoute) -> Self {
        Self {
            kind: "VirtualServerRoute",
            namespace: vsr.metadata.namespace.clone(),
            name: vsr.metadata.name.clone(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// One recoverable anomaly, attributed to the object that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub object: ObjectRef,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.object, self.message)
    }
}

/// Ordered collection of warnings from one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings {
    entries: Vec<Warning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: &ObjectRef, message: impl Into<String>) {
        self.entries.push(Warning {
            object: object.clone(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.entries.iter()
    }

    /// Renders every warning to a human-readable line, in insertion order.
    pub fn into_messages(self) -> Vec<String> {
        self.entries.iter().map(Warning::to_string).collect()
    }
}
