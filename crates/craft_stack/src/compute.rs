use serde_json::json;

use crate::params::DeployParams;
use crate::storage::{data_mount_path, DATA_DEVICE};
use crate::template::{reference, Resource, Template};

/// SSM path of the recommended container-optimized image.
pub const ECS_AMI_PARAMETER: &str =
    "/aws/service/ecs/optimized-ami/amazon-linux-2/recommended/image_id";

/// Boot script: join the cluster, attach the persistent volume, wait for the
/// device, create a filesystem on first use, and mount it. Rendered through
/// `Fn::Sub`, so `${Cluster}`, `${DataVolume}`, and `${AWS::Region}` are
/// intra-template references resolved at deploy time.
pub fn boot_script(params: &DeployParams) -> String {
    let mount_path = data_mount_path(params);
    format!(
        "#!/bin/bash -xe\n\
         echo \"ECS_CLUSTER=${{Cluster}}\" >> /etc/ecs/ecs.config\n\
         INSTANCE_ID=$(curl -s http://169.254.169.254/latest/meta-data/instance-id)\n\
         aws ec2 attach-volume --region ${{AWS::Region}} --volume-id ${{DataVolume}} --instance-id $INSTANCE_ID --device {DATA_DEVICE}\n\
         while [ ! -e {DATA_DEVICE} ]; do sleep 1; done\n\
         if ! blkid {DATA_DEVICE}; then mkfs -t ext4 {DATA_DEVICE}; fi\n\
         mkdir -p {mount_path}\n\
         mount {DATA_DEVICE} {mount_path}\n"
    )
}

/// Spot-priced launch configuration plus the 0/1 scaling group, and the
/// instance role the boot script needs for the volume attach.
pub fn declare(params: &DeployParams, template: &mut Template) {
    template.parameters.insert(
        "EcsAmiId".to_string(),
        json!({
            "Type": "AWS::SSM::Parameter::Value<AWS::EC2::Image::Id>",
            "Default": ECS_AMI_PARAMETER,
            "Description": "Container-optimized image resolved at deploy time",
        }),
    );

    template.resources.insert(
        "InstanceRole".to_string(),
        Resource::new(
            "AWS::IAM::Role",
            json!({
                "AssumeRolePolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Effect": "Allow",
                        "Principal": {"Service": "ec2.amazonaws.com"},
                        "Action": "sts:AssumeRole",
                    }],
                },
                "ManagedPolicyArns": [
                    "arn:aws:iam::aws:policy/service-role/AmazonEC2ContainerServiceforEC2Role",
                ],
                "Policies": [{
                    "PolicyName": "attach-data-volume",
                    "PolicyDocument": {
                        "Version": "2012-10-17",
                        "Statement": [{
                            "Effect": "Allow",
                            "Action": ["ec2:AttachVolume", "ec2:DescribeVolumes"],
                            "Resource": "*",
                        }],
                    },
                }],
            }),
        ),
    );

    template.resources.insert(
        "InstanceProfile".to_string(),
        Resource::new(
            "AWS::IAM::InstanceProfile",
            json!({ "Roles": [reference("InstanceRole")] }),
        ),
    );

    let mut launch_properties = json!({
        "ImageId": reference("EcsAmiId"),
        "InstanceType": params.instance_type.clone(),
        "SpotPrice": params.spot_price.clone(),
        "IamInstanceProfile": reference("InstanceProfile"),
        "SecurityGroups": [reference("ServerSecurityGroup")],
        "AssociatePublicIpAddress": true,
        "UserData": {"Fn::Base64": {"Fn::Sub": boot_script(params)}},
    });
    if let Some(key_name) = &params.key_name {
        launch_properties["KeyName"] = json!(key_name);
    }

    template.resources.insert(
        "LaunchConfiguration".to_string(),
        Resource::new("AWS::AutoScaling::LaunchConfiguration", launch_properties),
    );

    // One instance at most; scale-to-zero turns the server off without
    // touching the rest of the stack.
    template.resources.insert(
        "ScalingGroup".to_string(),
        Resource::new(
            "AWS::AutoScaling::AutoScalingGroup",
            json!({
                "MinSize": "0",
                "MaxSize": "1",
                "DesiredCapacity": "1",
                "LaunchConfigurationName": reference("LaunchConfiguration"),
                "VPCZoneIdentifier": [reference("PublicSubnet")],
                "Tags": [{
                    "Key": "Name",
                    "Value": format!("{}-server", params.server_name),
                    "PropagateAtLaunch": true,
                }],
            }),
        )
        .depends_on("GatewayAttachment"),
    );

    template.outputs.insert(
        "ScalingGroupName".to_string(),
        json!({
            "Description": "Set desired capacity to 0 to stop the server, 1 to start it",
            "Value": reference("ScalingGroup"),
        }),
    );
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::params::{DeployParams, RconParams};

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
                port: 25575,
                password: "hunter2".to_string(),
            },
            game_port: 25565,
            volume_size_gib: 20,
            availability_zone: "eu-west-1a".to_string(),
            domain: None,
        }
    }

    #[test]
    fn boot_script_attaches_waits_formats_once_and_mounts() {
        let script = boot_script(&params());

        assert!(script.contains("aws ec2 attach-volume"));
        assert!(script.contains("--volume-id ${DataVolume}"));
        assert!(script.contains("while [ ! -e /dev/xvdf ]"));
        assert!(script.contains("if ! blkid /dev/xvdf; then mkfs -t ext4 /dev/xvdf; fi"));
        assert!(script.contains("mount /dev/xvdf /opt/overworld/data"));

        let attach = script.find("attach-volume").expect("attach step present");
        let format = script.find("mkfs").expect("format step present");
        let mount = script.find("\nmount ").expect("mount step present");
        assert!(attach < format && format < mount);
    }

    #[test]
    fn boot_script_joins_the_cluster_before_attaching() {
        let script = boot_script(&params());
        let join = script.find("ECS_CLUSTER=${Cluster}").expect("join step present");
        let attach = script.find("attach-volume").expect("attach step present");
        assert!(join < attach);
    }
}
