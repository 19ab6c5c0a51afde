use serde_json::json;

use crate::params::DeployParams;
use crate::template::{reference, Resource, Template};

pub const VPC_CIDR: &str = "10.100.0.0/16";
pub const PUBLIC_SUBNET_CIDR: &str = "10.100.0.0/24";

/// VPC, one public subnet pinned to the volume's availability zone, internet
/// gateway, and the security perimeter for the game and RCON ports.
pub fn declare(params: &DeployParams, template: &mut Template) {
    template.resources.insert(
        "Vpc".to_string(),
        Resource::new(
            "AWS::EC2::VPC",
            json!({
                "CidrBlock": VPC_CIDR,
                "EnableDnsSupport": true,
                "EnableDnsHostnames": true,
                "Tags": [{"Key": "Name", "Value": format!("{}-vpc", params.server_name)}],
            }),
        ),
    );

    template.resources.insert(
        "InternetGateway".to_string(),
        Resource::new("AWS::EC2::InternetGateway", json!({})),
    );

    template.resources.insert(
        "GatewayAttachment".to_string(),
        Resource::new(
            "AWS::EC2::VPCGatewayAttachment",
            json!({
                "VpcId": reference("Vpc"),
                "InternetGatewayId": reference("InternetGateway"),
            }),
        ),
    );

    // The subnet joins the zone the volume lives in, otherwise the instance
    // cannot attach it.
    template.resources.insert(
        "PublicSubnet".to_string(),
        Resource::new(
            "AWS::EC2::Subnet",
            json!({
                "VpcId": reference("Vpc"),
                "CidrBlock": PUBLIC_SUBNET_CIDR,
                "AvailabilityZone": params.availability_zone.clone(),
                "MapPublicIpOnLaunch": true,
            }),
        ),
    );

    template.resources.insert(
        "PublicRouteTable".to_string(),
        Resource::new(
            "AWS::EC2::RouteTable",
            json!({ "VpcId": reference("Vpc") }),
        ),
    );

    template.resources.insert(
        "PublicRoute".to_string(),
        Resource::new(
            "AWS::EC2::Route",
            json!({
                "RouteTableId": reference("PublicRouteTable"),
                "DestinationCidrBlock": "0.0.0.0/0",
                "GatewayId": reference("InternetGateway"),
            }),
        )
        .depends_on("GatewayAttachment"),
    );

    template.resources.insert(
        "PublicSubnetRouteAssociation".to_string(),
        Resource::new(
            "AWS::EC2::SubnetRouteTableAssociation",
            json!({
                "SubnetId": reference("PublicSubnet"),
                "RouteTableId": reference("PublicRouteTable"),
            }),
        ),
    );

    template.resources.insert(
        "ServerSecurityGroup".to_string(),
        Resource::new(
            "AWS::EC2::SecurityGroup",
            json!({
                "GroupDescription": format!("{} game server perimeter", params.server_name),
                "VpcId": reference("Vpc"),
                "SecurityGroupIngress": [
                    {
                        "IpProtocol": "tcp",
                        "FromPort": params.game_port,
                        "ToPort": params.game_port,
                        "CidrIp": "0.0.0.0/0",
                    },
                    {
                        "IpProtocol": "udp",
                        "FromPort": params.game_port,
                        "ToPort": params.game_port,
                        "CidrIp": "0.0.0.0/0",
                    },
                    {
                        "IpProtocol": "tcp",
                        "FromPort": params.rcon.port,
                        "ToPort": params.rcon.port,
                        "CidrIp": "0.0.0.0/0",
                    },
                ],
                "SecurityGroupEgress": [
                    {"IpProtocol": "-1", "CidrIp": "0.0.0.0/0"},
                ],
            }),
        ),
    );
}
