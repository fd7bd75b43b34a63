use serde::{Deserialize, Serialize};

/// Configuration for the teachers module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeachersConfig {
    /// Upper bound for firstname/lastname, in characters.
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Scheme+authority used for `Location` headers, e.g. "https://school.example".
    /// When unset, it is derived from the request's `Host` header.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl Default for TeachersConfig {
    fn default() -> Self {
        Self {
            max_name_length: default_max_name_length(),
            public_base_url: None,
        }
    }
}

fn default_max_name_length() -> usize {
    50
}
