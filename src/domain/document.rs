//! Serde models of the per-stack JSON documents and the subscription dump.
//!
//! The shapes follow what the provider's command line tool writes:
//! `resources.json` holds `StackResourceSummaries`, `template.json` holds the
//! template body, `description.json` holds `Stacks[0]`.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A field that the template language allows as either one value or a list.
///
/// `Many` is tried first so that `OneOrMany<Value>` keeps arrays as lists.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(v) => v,
            OneOrMany::One(v) => vec![v],
        }
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::Many(v) => v,
            OneOrMany::One(v) => std::slice::from_ref(v),
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// `resources.json`
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceInventory {
    #[serde(rename = "StackResourceSummaries")]
    pub summaries: Vec<ResourceSummary>,
}

/// One inventory record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResourceSummary {
    #[serde(rename = "LogicalResourceId")]
    pub logical_id: String,
    /// Absent for resources whose creation failed.
    #[serde(rename = "PhysicalResourceId", default)]
    pub physical_id: Option<String>,
    #[serde(rename = "ResourceType")]
    pub resource_type: String,
}

/// `template.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Template {
    #[serde(rename = "Resources")]
    pub resources: BTreeMap<String, TemplateResource>,
    #[serde(rename = "Parameters", default)]
    pub parameters: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateResource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    #[serde(rename = "Properties", default)]
    pub properties: Value,
}

/// Properties of an `AWS::IAM::Policy` resource; only the parts the graph needs.
///
/// The document stays raw until a policy is known to name the actor at hand,
/// so an unusual document in one policy does not affect the others.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyProperties {
    #[serde(rename = "Roles", default)]
    pub roles: OneOrMany<Value>,
    #[serde(rename = "Users", default)]
    pub users: OneOrMany<Value>,
    #[serde(rename = "PolicyDocument", default)]
    pub document: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Statement", default)]
    pub statements: OneOrMany<AccessStatement>,
}

/// One entry of a policy document's `Statement` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccessStatement {
    #[serde(rename = "Effect", default)]
    pub effect: Option<String>,
    #[serde(rename = "Action", default)]
    pub actions: OneOrMany<ActionExpr>,
    #[serde(rename = "Resource", default)]
    pub resources: OneOrMany<ResourceExpr>,
}

impl AccessStatement {
    pub fn is_allow(&self) -> bool {
        self.effect.as_deref() == Some("Allow")
    }

    pub fn has_action(&self, action: &str) -> bool {
        self.actions.as_slice().iter().any(|a| a.is(action))
    }
}

/// A statement `Action` entry. Intrinsics such as `Fn::If` are kept
/// uninterpreted and match no action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ActionExpr {
    Name(String),
    Other(Value),
}

impl ActionExpr {
    pub fn is(&self, action: &str) -> bool {
        matches!(self, ActionExpr::Name(name) if name == action)
    }
}

/// A statement `Resource` entry: a literal address, a `{"Ref": ..}`, or any
/// other intrinsic (`Fn::Join`, `Fn::GetAtt`, ...) which is left uninterpreted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResourceExpr {
    Literal(String),
    Ref {
        #[serde(rename = "Ref")]
        target: String,
    },
    Other(Value),
}

/// `description.json`
#[derive(Debug, Clone, Deserialize)]
pub struct StackDescriptions {
    #[serde(rename = "Stacks")]
    pub stacks: Vec<StackDescription>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StackDescription {
    #[serde(rename = "Parameters", default)]
    pub parameters: Vec<ParameterValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParameterValue {
    #[serde(rename = "ParameterKey")]
    pub key: String,
    #[serde(rename = "ParameterValue", default)]
    pub value: Option<String>,
}

/// Subscription dump as written by `sns list-subscriptions`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionDump {
    #[serde(rename = "Subscriptions")]
    pub subscriptions: Vec<Subscription>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Subscription {
    #[serde(rename = "Protocol", default)]
    pub protocol: String,
    #[serde(rename = "TopicArn", default)]
    pub topic_arn: String,
    #[serde(rename = "Endpoint", default)]
    pub endpoint: String,
}
