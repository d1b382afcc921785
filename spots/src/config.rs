use shared::ChainTable;

pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";
/// Server-side `[timeout:N]` directive, in seconds.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u32 = 25;

/// Overpass endpoint, overridable at build time through `OVERPASS_ENDPOINT`.
pub fn default_endpoint() -> String {
    if let Some(url) = option_env!("OVERPASS_ENDPOINT") {
        return url.trim().to_string();
    }
    DEFAULT_ENDPOINT.to_string()
}

#[derive(Debug, Clone)]
pub struct OverpassConfig {
    pub endpoint: String,
    pub timeout_secs: u32,
    pub chains: ChainTable,
}

impl OverpassConfig {
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            chains: ChainTable::default(),
        }
    }
}
