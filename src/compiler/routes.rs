//! Location generation and per-field fallback helpers.
//!
//! # Responsibilities
//! - Build the location entry for a (path, backend) pair
//! - Resolve per-backend overrides against the global parameters
//!
//! # Design Decisions
//! - Route dispatch itself is an exhaustive match over [`RouteAction`] in
//!   the configurator; this module only knows how to emit one location
//!
//! [`RouteAction`]: crate::resources::virtual_server::RouteAction

use crate::compiler::params::ConfigParams;
use crate::compiler::upstreams::upstream_has_keepalive;
use crate::document::config::Location;
use crate::resources::virtual_server::{Upstream, UpstreamBuffers};

/// Picks the override when set and non-empty, the fallback otherwise.
pub(crate) fn string_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => fallback.to_string(),
    }
}

/// Renders a buffers override, falling back to the preformatted default.
pub(crate) fn buffers_or(buffers: Option<&UpstreamBuffers>, fallback: &str) -> String {
    match buffers {
        Some(buffers) => format!("{} {}", buffers.number, buffers.size),
        None => fallback.to_string(),
    }
}

/// Proxy scheme towards the backend.
pub(crate) fn proxy_pass_protocol(tls_enabled: bool) -> &'static str {
    if tls_enabled {
        "https"
    } else {
        "http"
    }
}

/// Builds the location entry proxying `path` to the named pool, with the
/// backend's overrides layered over the global parameters.
pub(crate) fn generate_location(
    path: &str,
    upstream_name: &str,
    upstream: &Upstream,
    params: &ConfigParams,
) -> Location {
    Location {
        path: path.to_string(),
        snippets: params.location_snippets.clone(),
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
        client_max_body_size: string_or(
            upstream.client_max_body_size.as_deref(),
            &params.client_max_body_size,
        ),
        proxy_max_temp_file_size: params.proxy_max_temp_file_size.clone(),
        proxy_buffering: upstream.proxy_buffering.unwrap_or(params.proxy_buffering),
        proxy_buffers: buffers_or(upstream.proxy_buffers.as_ref(), &params.proxy_buffers),
        proxy_buffer_size: string_or(upstream.proxy_buffer_size.as_deref(), &params.proxy_buffer_size),
        proxy_pass: format!(
            "{}://{}",
            proxy_pass_protocol(upstream.tls.enable),
            upstream_name
        ),
        proxy_next_upstream: string_or(upstream.proxy_next_upstream.as_deref(), "error timeout"),
        proxy_next_upstream_timeout: string_or(
            upstream.proxy_next_upstream_timeout.as_deref(),
            "0s",
        ),
        proxy_next_upstream_tries: upstream.proxy_next_upstream_tries,
        has_keepalive: upstream_has_keepalive(upstream, params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_pass_protocol() {
        assert_eq!(proxy_pass_protocol(false), "http");
        assert_eq!(proxy_pass_protocol(true), "https");
    }

    #[test]
    fn test_string_or() {
        assert_eq!(string_or(Some("http_404"), "error timeout"), "http_404");
        assert_eq!(string_or(Some(""), "error timeout"), "error timeout");
        assert_eq!(string_or(None, "error timeout"), "error timeout");
    }

    #[test]
    fn test_buffers_or() {
        assert_eq!(buffers_or(None, "8 4k"), "8 4k");
        let buffers = UpstreamBuffers {
            number: 8,
            size: "16K".to_string(),
        };
        assert_eq!(buffers_or(Some(&buffers), "8 4k"), "8 16K");
    }

    #[test]
    fn test_generate_location_from_params() {
        let params = ConfigParams {
            proxy_connect_timeout: "30s".to_string(),
            proxy_read_timeout: "31s".to_string(),
            proxy_send_timeout: "32s".to_string(),
            client_max_body_size: "1m".to_string(),
            proxy_max_temp_file_size: "1024m".to_string(),
            proxy_buffering: true,
            proxy_buffers: "8 4k".to_string(),
            proxy_buffer_size: "4k".to_string(),
            location_snippets: vec!["# location snippet".to_string()],
            ..Default::default()
        };

        let result = generate_location("/", "test-upstream", &Upstream::default(), &params);

        let expected = Location {
            path: "/".to_string(),
            snippets: vec!["# location snippet".to_string()],
            proxy_connect_timeout: "30s".to_string(),
            proxy_read_timeout: "31s".to_string(),
            proxy_send_timeout: "32s".to_string(),
            client_max_body_size: "1m".to_string(),
            proxy_max_temp_file_size: "1024m".to_string(),
            proxy_buffering: true,
            proxy_buffers: "8 4k".to_string(),
            proxy_buffer_size: "4k".to_string(),
            proxy_pass: "http://test-upstream".to_string(),
            proxy_next_upstream: "error timeout".to_string(),
            proxy_next_upstream_timeout: "0s".to_string(),
            proxy_next_upstream_tries: 0,
            has_keepalive: false,
        };
        assert_eq!(result, expected);
    }

    #[test]
    fn test_generate_location_upstream_overrides_win() {
        let params = ConfigParams::default();
        let upstream = Upstream {
            proxy_read_timeout: Some("5s".to_string()),
            proxy_next_upstream: Some("http_502".to_string()),
            proxy_next_upstream_tries: 2,
            tls: crate::resources::virtual_server::UpstreamTls { enable: true },
            ..Default::default()
        };

        let location = generate_location("/tea", "tea-upstream", &upstream, &params);
        assert_eq!(location.proxy_read_timeout, "5s");
        assert_eq!(location.proxy_connect_timeout, "60s");
        assert_eq!(location.proxy_next_upstream, "http_502");
        assert_eq!(location.proxy_next_upstream_tries, 2);
        assert_eq!(location.proxy_pass, "https://tea-upstream");
    }
}
