//! Global configuration parameters.
//!
//! One instance is built by the controller from its ConfigMap and shared by
//! every compilation; per-backend overrides on [`Upstream`] take precedence
//! over these values.
//!
//! [`Upstream`]: crate::resources::virtual_server::Upstream

use serde::{Deserialize, Serialize};

/// Controller-wide defaults applied wherever a resource leaves a knob unset.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigParams {
    /// `server_tokens` policy for the server block.
    pub server_tokens: String,

    pub proxy_connect_timeout: String,
    pub proxy_read_timeout: String,
    pub proxy_send_timeout: String,
    pub client_max_body_size: String,
    pub proxy_max_temp_file_size: String,
    pub proxy_buffering: bool,
    pub proxy_buffers: String,
    pub proxy_buffer_size: String,

    /// Snippet lines inserted verbatim into every location.
    pub location_snippets: Vec<String>,

    /// Snippet lines inserted verbatim into the server block.
    pub server_snippets: Vec<String>,

    /// Default load-balancing method.
    pub lb_method: String,

    /// Default keep-alive connection count; 0 disables keep-alive.
    pub keepalive: u32,

    pub max_fails: u32,
    pub max_conns: u32,
    pub fail_timeout: String,

    /// Shared-memory zone size of each backend pool.
    pub upstream_zone_size: String,

    pub proxy_protocol: bool,
    pub set_real_ip_from: Vec<String>,
    pub real_ip_header: String,
    pub real_ip_recursive: bool,

    /// Redirect plain HTTP based on `X-Forwarded-Proto`.
    pub redirect_to_https: bool,

    /// Redirect plain HTTP on the TLS-enabled server.
    pub ssl_redirect: bool,

    /// Enable HTTP/2 on the TLS-enabled server.
    pub http2: bool,
}

impl Default for ConfigParams {
    fn default() -> Self {
        Self {
            server_tokens: "on".to_string(),
            proxy_connect_timeout: "60s".to_string(),
            proxy_read_timeout: "60s".to_string(),
            proxy_send_timeout: "60s".to_string(),
            client_max_body_size: "1m".to_string(),
            proxy_max_temp_file_size: "1024m".to_string(),
            proxy_buffering: true,
            proxy_buffers: "8 4k".to_string(),
            proxy_buffer_size: "4k".to_string(),
            location_snippets: Vec::new(),
            server_snippets: Vec::new(),
            lb_method: "random two least_conn".to_string(),
            keepalive: 0,
            max_fails: 1,
            max_conns: 0,
            fail_timeout: "10s".to_string(),
            upstream_zone_size: "256k".to_string(),
            proxy_protocol: false,
            set_real_ip_from: Vec::new(),
            real_ip_header: "X-Real-IP".to_string(),
            real_ip_recursive: false,
            redirect_to_https: false,
            ssl_redirect: false,
            http2: false,
        }
    }
}
