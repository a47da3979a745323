//! Input data model.
//!
//! # Data Flow
//! ```text
//! watch/informer collaborator
//!     → VirtualServer + VirtualServerRoutes + endpoint data
//!     → VirtualServerAggregate (immutable for one compilation)
//!     → compiler
//! ```
//!
//! # Design Decisions
//! - Resources mirror the CRD JSON shape (camelCase, serde defaults)
//! - The aggregate is read-only input; the compiler never mutates it

pub mod aggregate;
pub mod loader;
pub mod virtual_server;

pub use aggregate::VirtualServerAggregate;
pub use virtual_server::{Route, RouteAction, Upstream, VirtualServer, VirtualServerRoute};
