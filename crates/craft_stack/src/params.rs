use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_GAME_PORT: u16 = 25565;
pub const DEFAULT_RCON_PORT: u16 = 25575;
pub const DEFAULT_VOLUME_SIZE_GIB: u32 = 20;
pub const DEFAULT_DDNS_PROVIDER: &str = "google";

/// Everything the deploy supplies; the surrounding infrastructure evaluates
/// the synthesized graph, so these are the only inputs the stack has.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeployParams {
    pub server_name: String,
    /// Spot bid, in the provider's string-decimal convention.
    pub spot_price: String,
    pub instance_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    /// Tag of the game-server container image.
    pub image_tag: String,
    /// Environment passed through to the server container unchanged.
    #[serde(default)]
    pub container_env: BTreeMap<String, String>,
    pub rcon: RconParams,
    #[serde(default = "default_game_port")]
    pub game_port: u16,
    #[serde(default = "default_volume_size_gib")]
    pub volume_size_gib: u32,
    /// Zone pinning for the persistent volume and the subnet that joins it.
    pub availability_zone: String,
    /// Presence wires the launch-notification → dynamic-DNS path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainParams>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RconParams {
    #[serde(default = "default_rcon_port")]
    pub port: u16,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DomainParams {
    pub username: String,
    pub password: String,
    pub domain: String,
    #[serde(default = "default_ddns_provider")]
    pub provider: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn default_game_port() -> u16 {
    DEFAULT_GAME_PORT
}

pub fn default_rcon_port() -> u16 {
    DEFAULT_RCON_PORT
}

pub fn default_volume_size_gib() -> u32 {
    DEFAULT_VOLUME_SIZE_GIB
}

pub fn default_ddns_provider() -> String {
    DEFAULT_DDNS_PROVIDER.to_string()
}

pub fn normalize_params(params: DeployParams) -> Result<DeployParams, ValidationError> {
    let server_name = params.server_name.trim().to_string();
    if server_name.is_empty() {
        return Err(ValidationError::new("server_name cannot be empty"));
    }
    if !server_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ValidationError::new(
            "server_name must be alphanumeric with dashes",
        ));
    }

    let spot_price = params.spot_price.trim().to_string();
    match spot_price.parse::<f64>() {
        Ok(value) if value > 0.0 => {}
        _ => {
            return Err(ValidationError::new(
                "spot_price must be a positive decimal string",
            ));
        }
    }

    if params.instance_type.trim().is_empty() {
        return Err(ValidationError::new("instance_type cannot be empty"));
    }

    if params.image_tag.trim().is_empty() {
        return Err(ValidationError::new("image_tag cannot be empty"));
    }

    if params.rcon.password.trim().is_empty() {
        return Err(ValidationError::new("rcon password cannot be empty"));
    }

    if params.volume_size_gib == 0 {
        return Err(ValidationError::new(
            "volume_size_gib must be a positive integer",
        ));
    }

    if params.availability_zone.trim().is_empty() {
        return Err(ValidationError::new("availability_zone cannot be empty"));
    }

    if let Some(domain) = &params.domain {
        if domain.domain.trim().is_empty() {
            return Err(ValidationError::new(
                "domain settings require a target hostname",
            ));
        }
    }

    Ok(DeployParams {
        server_name,
        spot_price,
        ..params
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> DeployParams {
        DeployParams {
            server_name: "overworld".to_string(),
            spot_price: "0.04".to_string(),
            instance_type: "m5.large".to_string(),
            key_name: None,
            image_tag: "latest".to_string(),
            container_env: BTreeMap::new(),
            rcon: RconParams {
                port: DEFAULT_RCON_PORT,
                password: "hunter2".to_string(),
            },
            game_port: DEFAULT_GAME_PORT,
            volume_size_gib: DEFAULT_VOLUME_SIZE_GIB,
            availability_zone: "eu-west-1a".to_string(),
            domain: None,
        }
    }

    #[test]
    fn normalize_params_trims_the_server_name() {
        let mut input = params();
        input.server_name = " overworld ".to_string();

        let normalized = normalize_params(input).expect("params should pass");
        assert_eq!(normalized.server_name, "overworld");
    }

    #[test]
    fn normalize_params_rejects_non_positive_spot_price() {
        let mut input = params();
        input.spot_price = "0".to_string();

        let error = normalize_params(input).expect_err("params should fail");
        assert_eq!(error.message(), "spot_price must be a positive decimal string");
    }

    #[test]
    fn normalize_params_rejects_invalid_server_name_characters() {
        let mut input = params();
        input.server_name = "over world".to_string();

        let error = normalize_params(input).expect_err("params should fail");
        assert_eq!(error.message(), "server_name must be alphanumeric with dashes");
    }

    #[test]
    fn normalize_params_rejects_blank_rcon_password() {
        let mut input = params();
        input.rcon.password = "  ".to_string();

        let error = normalize_params(input).expect_err("params should fail");
        assert_eq!(error.message(), "rcon password cannot be empty");
    }

    #[test]
    fn normalize_params_rejects_domain_block_without_hostname() {
        let mut input = params();
        input.domain = Some(DomainParams {
            username: "u".to_string(),
            password: "p".to_string(),
            domain: "".to_string(),
            provider: default_ddns_provider(),
        });

        let error = normalize_params(input).expect_err("params should fail");
        assert_eq!(error.message(), "domain settings require a target hostname");
    }

    #[test]
    fn deserializes_with_defaults_applied() {
        let input: DeployParams = serde_json::from_str(
            r#"{
                "server_name": "overworld",
                "spot_price": "0.04",
                "instance_type": "m5.large",
                "image_tag": "java17",
                "rcon": {"password": "hunter2"},
                "availability_zone": "eu-west-1a"
            }"#,
        )
        .expect("params should deserialize");

        assert_eq!(input.game_port, DEFAULT_GAME_PORT);
        assert_eq!(input.rcon.port, DEFAULT_RCON_PORT);
        assert_eq!(input.volume_size_gib, DEFAULT_VOLUME_SIZE_GIB);
        assert!(input.domain.is_none());
    }
}
