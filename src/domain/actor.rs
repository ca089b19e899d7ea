use crate::domain::document::{AccessStatement, PolicyDocument, PolicyProperties, ResourceSummary};
use crate::domain::error::DocumentError;
use crate::domain::stack::{Stack, TEMPLATE_FILE};
use serde_json::Value;

pub const IAM_USER: &str = "AWS::IAM::User";
pub const IAM_ROLE: &str = "AWS::IAM::Role";
pub const IAM_POLICY: &str = "AWS::IAM::Policy";

/// Yields the IAM principals of a stack.
pub struct ActorEnumerator<'a> {
    stack: &'a Stack,
}

impl<'a> ActorEnumerator<'a> {
    pub fn new(stack: &'a Stack) -> Self {
        Self { stack }
    }

    /// One actor per `AWS::IAM::User` / `AWS::IAM::Role`, sorted by logical id.
    pub fn actors(&self) -> Result<Vec<Actor<'a>>, DocumentError> {
        let stack: &'a Stack = self.stack;
        let mut actors: Vec<Actor<'a>> = stack
            .resources()?
            .iter()
            .filter(|r| is_actor_type(&r.resource_type))
            .map(|r| Actor::new(stack, r))
            .collect();
        actors.sort_by(|a, b| a.logical_id().cmp(b.logical_id()));
        Ok(actors)
    }
}

pub fn is_actor_type(resource_type: &str) -> bool {
    resource_type == IAM_USER || resource_type == IAM_ROLE
}

/// An IAM user or role that holds access to other resources.
#[derive(Debug, Clone, Copy)]
pub struct Actor<'a> {
    stack: &'a Stack,
    resource: &'a ResourceSummary,
}

impl<'a> Actor<'a> {
    pub fn new(stack: &'a Stack, resource: &'a ResourceSummary) -> Self {
        Self { stack, resource }
    }

    pub fn stack(&self) -> &'a Stack {
        self.stack
    }

    /// Graph key: the physical id with hyphens turned into underscores.
    /// Falls back to the logical id when the resource was never created.
    pub fn node_id(&self) -> String {
        self.resource
            .physical_id
            .as_deref()
            .unwrap_or(&self.resource.logical_id)
            .replace('-', "_")
    }

    pub fn logical_id(&self) -> &'a str {
        &self.resource.logical_id
    }

    pub fn resource_type(&self) -> &'a str {
        &self.resource.resource_type
    }

    /// Statements of every `AWS::IAM::Policy` in the template that names this
    /// actor in `Roles` or `Users`. Policies are visited in ascending key order,
    /// statements keep document order. Only the documents of those policies
    /// are decoded.
    pub fn policy_statements(&self) -> Result<Vec<AccessStatement>, DocumentError> {
        let template = self.stack.template()?;
        let malformed = |key: &str, reason: String| {
            DocumentError::malformed(
                self.stack.dir().join(TEMPLATE_FILE),
                format!("policy {key}: {reason}"),
            )
        };
        let mut statements = Vec::new();

        for (key, resource) in &template.resources {
            if resource.resource_type != IAM_POLICY {
                continue;
            }
            let properties: PolicyProperties = serde_json::from_value(resource.properties.clone())
                .map_err(|e| malformed(key, e.to_string()))?;
            if !self.is_named_by(&properties) {
                continue;
            }
            let document = properties
                .document
                .ok_or_else(|| malformed(key, "missing PolicyDocument".to_string()))?;
            let document: PolicyDocument =
                serde_json::from_value(document).map_err(|e| malformed(key, e.to_string()))?;
            statements.extend(document.statements.into_vec());
        }

        Ok(statements)
    }

    fn is_named_by(&self, properties: &PolicyProperties) -> bool {
        properties
            .roles
            .as_slice()
            .iter()
            .chain(properties.users.as_slice())
            .any(|r| ref_target(r) == Some(self.logical_id()))
    }
}

fn ref_target(value: &Value) -> Option<&str> {
    value.get("Ref").and_then(Value::as_str)
}
