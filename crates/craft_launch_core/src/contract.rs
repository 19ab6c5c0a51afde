use serde::Deserialize;
use serde_json::Value;

/// Inbound notification envelope, as delivered by the lifecycle hook's
/// notification topic. Each record's `Message` is itself a serialized JSON
/// document describing the lifecycle transition.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LaunchEnvelope {
    #[serde(rename = "Records")]
    pub records: Vec<LaunchRecord>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LaunchRecord {
    #[serde(rename = "Sns")]
    pub sns: SnsNotification,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SnsNotification {
    #[serde(rename = "Message")]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
struct LifecycleMessage {
    #[serde(rename = "EC2InstanceId")]
    ec2_instance_id: String,
}

/// One lifecycle event, reduced to the single field the handler needs.
/// Constructed fresh per invocation and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchNotification {
    pub instance_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

/// Extracts the instance identifier from the first record's message body.
pub fn parse_launch_notification(event: &Value) -> Result<LaunchNotification, ParseError> {
    let envelope: LaunchEnvelope = serde_json::from_value(event.clone())
        .map_err(|error| ParseError::new(format!("Malformed notification envelope: {error}")))?;

    let record = envelope
        .records
        .first()
        .ok_or_else(|| ParseError::new("Notification envelope contains no records"))?;

    let message: LifecycleMessage = serde_json::from_str(&record.sns.message)
        .map_err(|error| ParseError::new(format!("Malformed lifecycle message body: {error}")))?;

    let instance_id = message.ec2_instance_id.trim().to_string();
    if instance_id.is_empty() {
        return Err(ParseError::new("EC2InstanceId cannot be empty"));
    }

    Ok(LaunchNotification { instance_id })
}
