use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// One declared resource. Properties are kept as plain JSON so fragments can
/// use intrinsic references without a type per provider resource.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    #[serde(rename = "Properties")]
    pub properties: Value,
    #[serde(rename = "DependsOn", skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(rename = "DeletionPolicy", skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<String>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, properties: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties,
            depends_on: Vec::new(),
            deletion_policy: None,
        }
    }

    pub fn depends_on(mut self, logical_id: impl Into<String>) -> Self {
        self.depends_on.push(logical_id.into());
        self
    }

    /// Survives stack teardown; used for the world-data volume.
    pub fn retain(mut self) -> Self {
        self.deletion_policy = Some("Retain".to_string());
        self
    }
}

pub type Resources = BTreeMap<String, Resource>;
pub type Parameters = BTreeMap<String, Value>;
pub type Outputs = BTreeMap<String, Value>;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Parameters", skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: Parameters,
    #[serde(rename = "Resources")]
    pub resources: Resources,
    #[serde(rename = "Outputs", skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: Outputs,
}

impl Template {
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).expect("serialization of template should not fail")
    }
}

/// Intrinsic reference to another resource in the same graph.
pub fn reference(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

pub fn stable_template_json(value: impl Serialize) -> String {
    serde_json::to_string(&value).expect("serialization of template value should not fail")
}

/// SHA-256 over the stable rendering; logged at synth time so two deploys of
/// identical parameters are recognizably the same graph.
pub fn template_fingerprint(template: &Template) -> String {
    let mut hasher = Sha256::new();
    hasher.update(stable_template_json(template));
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_with(description: &str) -> Template {
        let mut resources = Resources::new();
        resources.insert(
            "DataVolume".to_string(),
            Resource::new("AWS::EC2::Volume", json!({ "Size": 20 })).retain(),
        );
        Template {
            format_version: TEMPLATE_FORMAT_VERSION.to_string(),
            description: description.to_string(),
            parameters: Parameters::new(),
            resources,
            outputs: Outputs::new(),
        }
    }

    #[test]
    fn renders_deletion_policy_and_omits_empty_sections() {
        let rendered: Value = serde_json::from_str(&template_with("test").to_json_pretty())
            .expect("template should render as json");

        assert_eq!(rendered["Resources"]["DataVolume"]["DeletionPolicy"], "Retain");
        assert!(rendered.get("Parameters").is_none());
        assert!(rendered.get("Outputs").is_none());
        assert!(rendered["Resources"]["DataVolume"].get("DependsOn").is_none());
    }

    #[test]
    fn fingerprint_is_stable_for_identical_templates() {
        assert_eq!(
            template_fingerprint(&template_with("test")),
            template_fingerprint(&template_with("test"))
        );
        assert_ne!(
            template_fingerprint(&template_with("test")),
            template_fingerprint(&template_with("other"))
        );
    }
}
