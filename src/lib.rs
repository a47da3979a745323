//! Configuration compiler for a Kubernetes-native reverse proxy.
//!
//! Translates a declarative routing specification (a `VirtualServer`, its
//! delegated `VirtualServerRoute`s, and live endpoint data) into a complete
//! configuration document for the proxy engine, plus an ordered list of
//! non-fatal warnings.
//!
//! # Architecture Overview
//!
//! ```text
//!   watch/informer ──▶ resources::VirtualServerAggregate
//!                              │
//!                              ▼
//!                  compiler::VirtualServerConfigurator
//!                    names · endpoints · splits · rules · routes
//!                              │
//!                              ▼
//!        document::VirtualServerDocument + compiler::Warnings
//!                              │
//!                              ▼
//!                      render/reload collaborator
//! ```
//!
//! The compiler performs no I/O and holds no shared mutable state; repeated
//! compilation of an unchanged aggregate produces a byte-identical document,
//! so the surrounding controller can skip needless proxy reloads.

pub mod compiler;
pub mod document;
pub mod resources;

pub use compiler::configurator::VirtualServerConfigurator;
pub use compiler::params::ConfigParams;
pub use compiler::warnings::Warnings;
pub use document::config::VirtualServerDocument;
pub use resources::aggregate::VirtualServerAggregate;
