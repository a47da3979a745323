//! The configuration compiler.
//!
//! # Data Flow
//! ```text
//! VirtualServerAggregate (+ ConfigParams, TLS file name, mode flags)
//!     → configurator.rs (orchestration, upstream collection, route splicing)
//!         → endpoints.rs (backend → addresses, fallback policies)
//!         → splits.rs    (weighted splits → distribution tables)
//!         → rules.rs     (condition matches → chained lookup tables)
//!         → routes.rs    (location generation)
//!         all naming via names.rs
//!     → VirtualServerDocument + Warnings
//! ```
//!
//! # Design Decisions
//! - Purely functional per invocation; no shared mutable state, no I/O
//! - Deterministic: iteration follows input declaration order everywhere,
//!   so an unchanged input compiles to a byte-identical document

pub mod configurator;
pub mod endpoints;
pub mod names;
pub mod params;
pub mod routes;
pub mod rules;
pub mod splits;
pub mod upstreams;
pub mod warnings;

pub use configurator::VirtualServerConfigurator;
pub use endpoints::ALWAYS_502_SERVER;
pub use params::ConfigParams;
pub use warnings::{ObjectRef, Warning, Warnings};
