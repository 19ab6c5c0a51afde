use serde_json::json;

use crate::params::DeployParams;
use crate::template::{get_att, reference, Resource, Template};

/// The hook's own timing guard; the handler imposes none of its own.
pub const LIFECYCLE_HEARTBEAT_SECONDS: u32 = 30;
pub const LAUNCHING_TRANSITION: &str = "autoscaling:EC2_INSTANCE_LAUNCHING";

/// Launch-notification path: a lifecycle hook on the scaling group publishes
/// to a topic, which invokes the dynamic-DNS update function. Only declared
/// when the deploy supplies a domain settings block.
pub fn declare(params: &DeployParams, template: &mut Template) {
    let Some(domain) = &params.domain else {
        return;
    };

    template.parameters.insert(
        "DdnsCodeBucket".to_string(),
        json!({
            "Type": "String",
            "Description": "Bucket holding the packaged update-function zip",
        }),
    );
    template.parameters.insert(
        "DdnsCodeKey".to_string(),
        json!({
            "Type": "String",
            "Description": "Object key of the packaged update-function zip",
        }),
    );

    template.resources.insert(
        "LaunchTopic".to_string(),
        Resource::new("AWS::SNS::Topic", json!({})),
    );

    template.resources.insert(
        "LifecycleNotificationRole".to_string(),
        Resource::new(
            "AWS::IAM::Role",
            json!({
                "AssumeRolePolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Effect": "Allow",
                        "Principal": {"Service": "autoscaling.amazonaws.com"},
                        "Action": "sts:AssumeRole",
                    }],
                },
                "Policies": [{
                    "PolicyName": "publish-launch-notifications",
                    "PolicyDocument": {
                        "Version": "2012-10-17",
                        "Statement": [{
                            "Effect": "Allow",
                            "Action": "sns:Publish",
                            "Resource": reference("LaunchTopic"),
                        }],
                    },
                }],
            }),
        ),
    );

    // CONTINUE on timeout: a missed DNS update must never hold up the launch.
    template.resources.insert(
        "LaunchLifecycleHook".to_string(),
        Resource::new(
            "AWS::AutoScaling::LifecycleHook",
            json!({
                "AutoScalingGroupName": reference("ScalingGroup"),
                "LifecycleTransition": LAUNCHING_TRANSITION,
                "DefaultResult": "CONTINUE",
                "HeartbeatTimeout": LIFECYCLE_HEARTBEAT_SECONDS,
                "NotificationTargetARN": reference("LaunchTopic"),
                "RoleARN": get_att("LifecycleNotificationRole", "Arn"),
            }),
        ),
    );

    template.resources.insert(
        "DdnsFunctionRole".to_string(),
        Resource::new(
            "AWS::IAM::Role",
            json!({
                "AssumeRolePolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Effect": "Allow",
                        "Principal": {"Service": "lambda.amazonaws.com"},
                        "Action": "sts:AssumeRole",
                    }],
                },
                "ManagedPolicyArns": [
                    "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole",
                ],
                "Policies": [{
                    "PolicyName": "describe-launched-instance",
                    "PolicyDocument": {
                        "Version": "2012-10-17",
                        "Statement": [{
                            "Effect": "Allow",
                            "Action": "ec2:DescribeInstances",
                            "Resource": "*",
                        }],
                    },
                }],
            }),
        ),
    );

    template.resources.insert(
        "DdnsFunction".to_string(),
        Resource::new(
            "AWS::Lambda::Function",
            json!({
                "Runtime": "provided.al2023",
                "Handler": "bootstrap",
                "MemorySize": 128,
                "Timeout": LIFECYCLE_HEARTBEAT_SECONDS,
                "Role": get_att("DdnsFunctionRole", "Arn"),
                "Code": {
                    "S3Bucket": reference("DdnsCodeBucket"),
                    "S3Key": reference("DdnsCodeKey"),
                },
                "Environment": {
                    "Variables": {
                        "username": domain.username.clone(),
                        "password": domain.password.clone(),
                        "domain": domain.domain.clone(),
                        "provider": domain.provider.clone(),
                    },
                },
            }),
        ),
    );

    template.resources.insert(
        "DdnsSubscription".to_string(),
        Resource::new(
            "AWS::SNS::Subscription",
            json!({
                "Protocol": "lambda",
                "TopicArn": reference("LaunchTopic"),
                "Endpoint": get_att("DdnsFunction", "Arn"),
            }),
        ),
    );

    template.resources.insert(
        "DdnsInvokePermission".to_string(),
        Resource::new(
            "AWS::Lambda::Permission",
            json!({
                "Action": "lambda:InvokeFunction",
                "FunctionName": reference("DdnsFunction"),
                "Principal": "sns.amazonaws.com",
                "SourceArn": reference("LaunchTopic"),
            }),
        ),
    );

    template.outputs.insert(
        "LaunchTopicArn".to_string(),
        json!({
            "Description": "Topic the launching-state lifecycle hook publishes to",
            "Value": reference("LaunchTopic"),
        }),
    );
}
