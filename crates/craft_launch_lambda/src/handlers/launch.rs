use craft_launch_core::contract::parse_launch_notification;
use craft_launch_core::ddns::{update_url, DdnsConfig, DdnsProvider};
use craft_launch_core::disposition::{FailureStage, SkipReason, UpdateDisposition};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::adapters::dns_update::DnsUpdater;
use crate::adapters::instance_lookup::InstanceAddressResolver;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaunchHookResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

/// Converts one lifecycle notification into a best-effort dynamic-DNS update.
///
/// Always returns status 200: the lifecycle transition this hook is attached
/// to must never be blocked or retried because of a DNS-update failure.
/// Internal outcomes are distinguished in the logs only.
pub fn handle_launch_event(
    event: &Value,
    config: &DdnsConfig,
    resolver: &dyn InstanceAddressResolver,
    updater: &dyn DnsUpdater,
) -> LaunchHookResponse {
    let disposition = resolve_disposition(event, config, resolver, updater);
    match &disposition {
        UpdateDisposition::Updated { address } => log_launch_info(
            "update_sent",
            json!({
                "domain": config.domain.clone(),
                "address": address.clone(),
            }),
        ),
        UpdateDisposition::Skipped { .. } => log_launch_info(
            "update_skipped",
            serde_json::to_value(&disposition).expect("disposition should serialize"),
        ),
        UpdateDisposition::Absorbed { .. } => log_launch_error(
            "update_absorbed",
            serde_json::to_value(&disposition).expect("disposition should serialize"),
        ),
    }

    LaunchHookResponse { status_code: 200 }
}

/// Pure decision path: every branch maps to a disposition, never to an error.
pub fn resolve_disposition(
    event: &Value,
    config: &DdnsConfig,
    resolver: &dyn InstanceAddressResolver,
    updater: &dyn DnsUpdater,
) -> UpdateDisposition {
    let Some(provider) = DdnsProvider::from_selector(&config.provider) else {
        return UpdateDisposition::Skipped {
            reason: SkipReason::UnsupportedProvider,
        };
    };

    let notification = match parse_launch_notification(event) {
        Ok(value) => value,
        Err(error) => {
            return UpdateDisposition::Absorbed {
                stage: FailureStage::Parse,
                message: error.message().to_string(),
            };
        }
    };

    let address = match resolver.public_ip(&notification.instance_id) {
        Ok(value) => value,
        Err(message) => {
            return UpdateDisposition::Absorbed {
                stage: FailureStage::Describe,
                message,
            };
        }
    };

    let Some(address) = address else {
        return UpdateDisposition::Skipped {
            reason: SkipReason::NoPublicAddress,
        };
    };

    match updater.send_update(&update_url(config, provider, &address)) {
        Ok(()) => UpdateDisposition::Updated { address },
        Err(message) => UpdateDisposition::Absorbed {
            stage: FailureStage::Update,
            message,
        },
    }
}

fn log_launch_info(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "launch_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_launch_error(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "launch_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct StubResolver {
        address: Result<Option<String>, String>,
        queries: Mutex<Vec<String>>,
    }

    impl StubResolver {
        fn returning(address: Result<Option<String>, String>) -> Self {
            Self {
                address,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().expect("poisoned mutex").clone()
        }
    }

    impl InstanceAddressResolver for StubResolver {
        fn public_ip(&self, instance_id: &str) -> Result<Option<String>, String> {
            self.queries
                .lock()
                .expect("poisoned mutex")
                .push(instance_id.to_string());
            self.address.clone()
        }
    }

    struct CapturingUpdater {
        urls: Mutex<Vec<String>>,
        failure: Option<String>,
    }

    impl CapturingUpdater {
        fn new() -> Self {
            Self {
                urls: Mutex::new(Vec::new()),
                failure: None,
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                urls: Mutex::new(Vec::new()),
                failure: Some(message.to_string()),
            }
        }

        fn urls(&self) -> Vec<String> {
            self.urls.lock().expect("poisoned mutex").clone()
        }
    }

    impl DnsUpdater for CapturingUpdater {
        fn send_update(&self, url: &str) -> Result<(), String> {
            self.urls
                .lock()
                .expect("poisoned mutex")
                .push(url.to_string());
            match &self.failure {
                Some(message) => Err(message.clone()),
                None => Ok(()),
            }
        }
    }

    fn config() -> DdnsConfig {
        DdnsConfig {
            username: "u".to_string(),
            password: "p".to_string(),
            domain: "example.test".to_string(),
            provider: "google".to_string(),
        }
    }

    fn launch_event(instance_id: &str) -> Value {
        json!({
            "Records": [
                {"Sns": {"Message": format!("{{\"EC2InstanceId\":\"{instance_id}\"}}")}}
            ]
        })
    }

    #[test]
    fn unsupported_provider_skips_without_outbound_calls() {
        let resolver = StubResolver::returning(Ok(Some("203.0.113.5".to_string())));
        let updater = CapturingUpdater::new();
        let mut config = config();
        config.provider = "route53".to_string();

        let response =
            handle_launch_event(&launch_event("i-0abc123"), &config, &resolver, &updater);

        assert_eq!(response.status_code, 200);
        assert!(resolver.queries().is_empty());
        assert!(updater.urls().is_empty());
    }

    #[test]
    fn missing_public_address_skips_the_dns_update() {
        let resolver = StubResolver::returning(Ok(None));
        let updater = CapturingUpdater::new();

        let disposition =
            resolve_disposition(&launch_event("i-0abc123"), &config(), &resolver, &updater);

        assert_eq!(
            disposition,
            UpdateDisposition::Skipped {
                reason: SkipReason::NoPublicAddress
            }
        );
        assert_eq!(resolver.queries(), vec!["i-0abc123".to_string()]);
        assert!(updater.urls().is_empty());

        let response =
            handle_launch_event(&launch_event("i-0abc123"), &config(), &resolver, &updater);
        assert_eq!(response.status_code, 200);
    }

    #[test]
    fn resolved_address_issues_exactly_one_update() {
        let resolver = StubResolver::returning(Ok(Some("203.0.113.5".to_string())));
        let updater = CapturingUpdater::new();

        let response =
            handle_launch_event(&launch_event("i-0abc123"), &config(), &resolver, &updater);

        assert_eq!(response.status_code, 200);
        assert_eq!(
            updater.urls(),
            vec![
                "https://u:p@domains.google.com/nic/update?hostname=example.test&myip=203.0.113.5"
                    .to_string()
            ]
        );
    }

    #[test]
    fn describe_failure_is_absorbed_without_an_update() {
        let resolver = StubResolver::returning(Err("api unreachable".to_string()));
        let updater = CapturingUpdater::new();

        let disposition =
            resolve_disposition(&launch_event("i-0abc123"), &config(), &resolver, &updater);

        assert_eq!(
            disposition,
            UpdateDisposition::Absorbed {
                stage: FailureStage::Describe,
                message: "api unreachable".to_string(),
            }
        );
        assert!(updater.urls().is_empty());

        let response =
            handle_launch_event(&launch_event("i-0abc123"), &config(), &resolver, &updater);
        assert_eq!(response.status_code, 200);
    }

    #[test]
    fn update_failure_still_returns_success() {
        let resolver = StubResolver::returning(Ok(Some("203.0.113.5".to_string())));
        let updater = CapturingUpdater::failing("endpoint returned 500");

        let response =
            handle_launch_event(&launch_event("i-0abc123"), &config(), &resolver, &updater);

        assert_eq!(response.status_code, 200);
        assert_eq!(updater.urls().len(), 1);
    }

    #[test]
    fn malformed_body_is_absorbed_without_outbound_calls() {
        let resolver = StubResolver::returning(Ok(Some("203.0.113.5".to_string())));
        let updater = CapturingUpdater::new();
        let event = json!({
            "Records": [{"Sns": {"Message": "{\"LifecycleHookName\":\"on-launch\"}"}}]
        });

        let disposition = resolve_disposition(&event, &config(), &resolver, &updater);

        assert!(matches!(
            disposition,
            UpdateDisposition::Absorbed {
                stage: FailureStage::Parse,
                ..
            }
        ));
        assert!(resolver.queries().is_empty());
        assert!(updater.urls().is_empty());

        let response = handle_launch_event(&event, &config(), &resolver, &updater);
        assert_eq!(response.status_code, 200);
    }

    #[test]
    fn response_serializes_with_the_lambda_proxy_key() {
        let rendered = serde_json::to_value(LaunchHookResponse { status_code: 200 })
            .expect("response should serialize");

        assert_eq!(rendered, json!({"statusCode": 200}));
    }
}
