use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the upstream outlet data/search service.
    ///
    /// Optional at startup: the proxy surfaces its absence per request.
    pub api_url: Option<String>,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub upstream_timeout_secs: u64,
    pub upstream_user_agent: String,
    /// Radius used to decide which outlets count as neighbors.
    pub neighbor_radius_km: f64,
}

impl AppConfig {
    #[must_use]
    pub fn has_api_url(&self) -> bool {
        self.api_url.is_some()
    }
}
