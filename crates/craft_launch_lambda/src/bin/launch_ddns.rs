use std::time::Duration;

use craft_launch_core::ddns::DdnsConfig;
use craft_launch_lambda::adapters::dns_update::DnsUpdater;
use craft_launch_lambda::adapters::instance_lookup::InstanceAddressResolver;
use craft_launch_lambda::handlers::launch::{handle_launch_event, LaunchHookResponse};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

const UPDATE_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

struct Ec2AddressResolver {
    ec2_client: aws_sdk_ec2::Client,
}

impl InstanceAddressResolver for Ec2AddressResolver {
    fn public_ip(&self, instance_id: &str) -> Result<Option<String>, String> {
        let client = self.ec2_client.clone();
        let instance_id = instance_id.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .describe_instances()
                    .instance_ids(instance_id)
                    .send()
                    .await
                    .map_err(|error| format!("failed to describe instance: {error}"))?;

                Ok(output
                    .reservations()
                    .first()
                    .and_then(|reservation| reservation.instances().first())
                    .and_then(|instance| instance.public_ip_address())
                    .map(|address| address.to_string()))
            })
        })
    }
}

struct HttpDnsUpdater {
    request_timeout: Duration,
}

impl DnsUpdater for HttpDnsUpdater {
    // The blocking client lives entirely inside block_in_place; it must not
    // be built, used, or dropped on an async worker.
    fn send_update(&self, url: &str) -> Result<(), String> {
        let request_timeout = self.request_timeout;
        let url = url.to_string();

        tokio::task::block_in_place(move || {
            let client = reqwest::blocking::Client::builder()
                .timeout(request_timeout)
                .build()
                .map_err(|error| format!("failed to build http client: {error}"))?;

            let response = client
                .get(&url)
                .send()
                .map_err(|error| format!("failed to reach ddns endpoint: {error}"))?;

            let status = response.status();
            if !status.is_success() {
                return Err(format!("ddns endpoint returned {status}"));
            }
            Ok(())
        })
    }
}

fn env_or_empty(key: &str) -> String {
    std::env::var(key).unwrap_or_default()
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<LaunchHookResponse, Error> {
    let config = DdnsConfig {
        username: env_or_empty("username"),
        password: env_or_empty("password"),
        domain: env_or_empty("domain"),
        provider: env_or_empty("provider"),
    };

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let resolver = Ec2AddressResolver {
        ec2_client: aws_sdk_ec2::Client::new(&aws_config),
    };
    let updater = HttpDnsUpdater {
        request_timeout: UPDATE_REQUEST_TIMEOUT,
    };

    Ok(handle_launch_event(
        &event.payload,
        &config,
        &resolver,
        &updater,
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
