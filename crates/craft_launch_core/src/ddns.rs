/// Update endpoint for the one supported provider.
pub const GOOGLE_DDNS_ENDPOINT: &str = "domains.google.com";

/// Ambient configuration for the dynamic-DNS update, read once per invocation
/// by the entry point and passed explicitly into the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdnsConfig {
    pub username: String,
    pub password: String,
    pub domain: String,
    pub provider: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DdnsProvider {
    Google,
}

impl DdnsProvider {
    /// Maps the configured provider selector to a supported provider.
    /// Anything other than `"google"` is unrecognized and the handler no-ops.
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "google" => Some(Self::Google),
            _ => None,
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Google => GOOGLE_DDNS_ENDPOINT,
        }
    }
}

/// Builds the `/nic/update` request URL with basic credentials embedded.
/// Only called once a public address has been resolved.
pub fn update_url(config: &DdnsConfig, provider: DdnsProvider, address: &str) -> String {
    format!(
        "https://{}:{}@{}/nic/update?hostname={}&myip={}",
        config.username,
        config.password,
        provider.endpoint(),
        config.domain,
        address,
    )
}
