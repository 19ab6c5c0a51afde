use serde_json::{json, Value};

use crate::params::DeployParams;
use crate::storage::data_mount_path;
use crate::template::{reference, Resource, Template};

/// Game-server image; the deploy selects the tag.
pub const SERVER_IMAGE_REPOSITORY: &str = "itzg/minecraft-server";

pub const CONTAINER_NAME: &str = "server";
pub const DATA_VOLUME_NAME: &str = "data";
pub const CONTAINER_DATA_PATH: &str = "/data";
pub const MEMORY_RESERVATION_MIB: u32 = 1024;

fn container_environment(params: &DeployParams) -> Vec<Value> {
    let mut environment: Vec<Value> = params
        .container_env
        .iter()
        .map(|(name, value)| json!({ "Name": name, "Value": value }))
        .collect();
    environment.push(json!({ "Name": "RCON_PORT", "Value": params.rcon.port.to_string() }));
    environment.push(json!({ "Name": "RCON_PASSWORD", "Value": params.rcon.password.clone() }));
    environment
}

/// Container cluster, the task definition over the mounted volume, and a
/// service that never runs two copies at once.
pub fn declare(params: &DeployParams, template: &mut Template) {
    template.resources.insert(
        "Cluster".to_string(),
        Resource::new(
            "AWS::ECS::Cluster",
            json!({ "ClusterName": params.server_name.clone() }),
        ),
    );

    template.resources.insert(
        "TaskDefinition".to_string(),
        Resource::new(
            "AWS::ECS::TaskDefinition",
            json!({
                "Family": format!("{}-server", params.server_name),
                "RequiresCompatibilities": ["EC2"],
                "ContainerDefinitions": [{
                    "Name": CONTAINER_NAME,
                    "Image": format!("{SERVER_IMAGE_REPOSITORY}:{}", params.image_tag),
                    "Essential": true,
                    "MemoryReservation": MEMORY_RESERVATION_MIB,
                    "Environment": container_environment(params),
                    "PortMappings": [
                        {
                            "ContainerPort": params.game_port,
                            "HostPort": params.game_port,
                            "Protocol": "tcp",
                        },
                        {
                            "ContainerPort": params.game_port,
                            "HostPort": params.game_port,
                            "Protocol": "udp",
                        },
                        {
                            "ContainerPort": params.rcon.port,
                            "HostPort": params.rcon.port,
                            "Protocol": "tcp",
                        },
                    ],
                    "MountPoints": [{
                        "SourceVolume": DATA_VOLUME_NAME,
                        "ContainerPath": CONTAINER_DATA_PATH,
                    }],
                }],
                "Volumes": [{
                    "Name": DATA_VOLUME_NAME,
                    "Host": { "SourcePath": data_mount_path(params) },
                }],
            }),
        ),
    );

    // Single instance, single task: no healthy copy is kept around during a
    // deployment, the replacement takes over the volume instead.
    template.resources.insert(
        "Service".to_string(),
        Resource::new(
            "AWS::ECS::Service",
            json!({
                "Cluster": reference("Cluster"),
                "TaskDefinition": reference("TaskDefinition"),
                "LaunchType": "EC2",
                "DesiredCount": 1,
                "DeploymentConfiguration": {
                    "MaximumPercent": 100,
                    "MinimumHealthyPercent": 0,
                },
            }),
        ),
    );

    template.outputs.insert(
        "ClusterName".to_string(),
        json!({
            "Description": "Container cluster running the server task",
            "Value": reference("Cluster"),
        }),
    );
}
