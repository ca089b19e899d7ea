//! Test fixture generators: stack snapshot directories written to a temp dir.
#![allow(dead_code)]

use serde_json::{Value, json};
use std::path::{Path, PathBuf};

pub const WORKER_ROLE: &str = "Worker";
pub const WORKER_PHYSICAL_ID: &str = "live-modav-Worker-AB12CD";
pub const INGEST_QUEUE: &str = "arn:aws:sqs:eu-west-1:111:modav-ingest-XYZ123";

/// Builder for one stack directory.
pub struct StackFixture {
    name: String,
    summaries: Vec<Value>,
    resources: serde_json::Map<String, Value>,
    parameters: serde_json::Map<String, Value>,
    values: Vec<Value>,
}

impl StackFixture {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            summaries: Vec::new(),
            resources: serde_json::Map::new(),
            parameters: serde_json::Map::new(),
            values: Vec::new(),
        }
    }

    /// Inventory record plus matching template resource.
    pub fn resource(mut self, logical: &str, physical: &str, ty: &str) -> Self {
        self.summaries.push(json!({
            "LogicalResourceId": logical,
            "PhysicalResourceId": physical,
            "ResourceStatus": "CREATE_COMPLETE",
            "ResourceType": ty,
        }));
        self.resources
            .entry(logical.to_string())
            .or_insert_with(|| json!({"Type": ty, "Properties": {}}));
        self
    }

    pub fn role(self, logical: &str, physical: &str) -> Self {
        self.resource(logical, physical, "AWS::IAM::Role")
    }

    pub fn user(self, logical: &str, physical: &str) -> Self {
        self.resource(logical, physical, "AWS::IAM::User")
    }

    /// `AWS::IAM::Policy` attached to the given roles.
    pub fn role_policy(mut self, logical: &str, roles: &[&str], statements: Value) -> Self {
        let roles: Vec<Value> = roles.iter().map(|r| json!({"Ref": r})).collect();
        self.resources.insert(
            logical.to_string(),
            json!({
                "Type": "AWS::IAM::Policy",
                "Properties": {
                    "PolicyName": logical,
                    "Roles": roles,
                    "PolicyDocument": {"Version": "2012-10-17", "Statement": statements}
                }
            }),
        );
        self
    }

    /// Template resource with any properties (no inventory record).
    pub fn template_resource(mut self, logical: &str, body: Value) -> Self {
        self.resources.insert(logical.to_string(), body);
        self
    }

    pub fn parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters
            .insert(key.to_string(), json!({"Type": "String"}));
        self.values
            .push(json!({"ParameterKey": key, "ParameterValue": value}));
        self
    }

    pub fn write(&self, root: &Path) -> PathBuf {
        let dir = root.join(&self.name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("resources.json"),
            json!({"StackResourceSummaries": self.summaries}).to_string(),
        )
        .unwrap();
        std::fs::write(
            dir.join("template.json"),
            json!({
                "AWSTemplateFormatVersion": "2010-09-09",
                "Parameters": self.parameters,
                "Resources": self.resources,
            })
            .to_string(),
        )
        .unwrap();
        std::fs::write(
            dir.join("description.json"),
            json!({"Stacks": [{"StackName": self.name, "Parameters": self.values}]}).to_string(),
        )
        .unwrap();
        dir
    }
}

pub fn allow(actions: &[&str], resource: Value) -> Value {
    json!({"Effect": "Allow", "Action": actions, "Resource": resource})
}

/// The single-role stack used by the end-to-end scenario.
pub fn modav_core_stack() -> StackFixture {
    StackFixture::new("live-modav-core")
        .role(WORKER_ROLE, WORKER_PHYSICAL_ID)
        .role_policy(
            "WorkerPolicy",
            &[WORKER_ROLE],
            json!([allow(&["sqs:SendMessage"], json!(INGEST_QUEUE))]),
        )
}

pub fn write_subscriptions(path: &Path, subscriptions: Value) {
    std::fs::write(path, json!({"Subscriptions": subscriptions}).to_string()).unwrap();
}

pub fn subscription(protocol: &str, topic: &str, endpoint: &str) -> Value {
    json!({
        "SubscriptionArn": format!("{topic}:0000"),
        "Owner": "111",
        "Protocol": protocol,
        "Endpoint": endpoint,
        "TopicArn": topic,
    })
}
