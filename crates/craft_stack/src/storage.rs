use serde_json::json;

use crate::params::DeployParams;
use crate::template::{reference, Resource, Template};

/// Device the boot script attaches the volume under.
pub const DATA_DEVICE: &str = "/dev/xvdf";

/// Host path the volume is mounted on; the task definition maps it into the
/// container.
pub fn data_mount_path(params: &DeployParams) -> String {
    format!("/opt/{}/data", params.server_name)
}

/// Persistent world data. Retained on teardown: the volume outlives any one
/// spot instance and any one stack.
pub fn declare(params: &DeployParams, template: &mut Template) {
    template.resources.insert(
        "DataVolume".to_string(),
        Resource::new(
            "AWS::EC2::Volume",
            json!({
                "AvailabilityZone": params.availability_zone.clone(),
                "Size": params.volume_size_gib,
                "VolumeType": "gp3",
                "Tags": [{"Key": "Name", "Value": format!("{}-data", params.server_name)}],
            }),
        )
        .retain(),
    );

    template.outputs.insert(
        "DataVolumeId".to_string(),
        json!({
            "Description": "Persistent world-data volume, retained across stacks",
            "Value": reference("DataVolume"),
        }),
    );
}
