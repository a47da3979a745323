//! Output data model: the document handed to the render/reload collaborator.

pub mod config;

pub use config::{
    Distribution, HealthCheckBlock, InternalRedirectLocation, Location, Map, Parameter, Queue,
    Server, SplitClient, Ssl, StatusMatch, UpstreamBlock, UpstreamServer, VirtualServerDocument,
};
