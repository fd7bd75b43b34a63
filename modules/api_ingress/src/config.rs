use serde::{Deserialize, Serialize};

/// API ingress configuration, read from the `modules.api_ingress` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    /// Serve `/openapi.json` and `/docs`.
    #[serde(default = "default_enable_docs")]
    pub enable_docs: bool,
    #[serde(default)]
    pub cors_enabled: bool,
    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: u64,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            enable_docs: default_enable_docs(),
            cors_enabled: false,
            request_timeout_sec: default_request_timeout_sec(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

fn default_enable_docs() -> bool {
    true
}

fn default_request_timeout_sec() -> u64 {
    30
}

fn default_body_limit_bytes() -> usize {
    16 * 1024 * 1024
}
