use serde::Serialize;

/// What a single invocation actually did. The invoking infrastructure always
/// sees success; this taxonomy exists so logs can tell a genuine update apart
/// from a skip or an absorbed failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateDisposition {
    Skipped { reason: SkipReason },
    Updated { address: String },
    Absorbed { stage: FailureStage, message: String },
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Configured provider selector is not a supported value.
    UnsupportedProvider,
    /// The instance has no public address yet; expected at notification time.
    NoPublicAddress,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Parse,
    Describe,
    Update,
}
