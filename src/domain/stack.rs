use crate::domain::actor::{Actor, ActorEnumerator};
use crate::domain::document::{
    ResourceInventory, ResourceSummary, StackDescription, StackDescriptions, Template,
};
use crate::domain::error::{DocumentError, read_json};
use regex::Regex;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const RESOURCES_FILE: &str = "resources.json";
pub const TEMPLATE_FILE: &str = "template.json";
pub const DESCRIPTION_FILE: &str = "description.json";

/// Deployment environment inferred from a stack name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Int,
    Test,
    Live,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Int => "int",
            Environment::Test => "test",
            Environment::Live => "live",
        }
    }

    /// Parse a lower- or mixed-case tag (`"live"`, `"Test"`, ...).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "int" => Some(Environment::Int),
            "test" => Some(Environment::Test),
            "live" => Some(Environment::Live),
            _ => None,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered environment rules; the first one that matches wins.
fn environment_rules() -> &'static [Regex; 3] {
    static RULES: OnceLock<[Regex; 3]> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            Regex::new(r"(?i)^(int|test|live)-").expect("dashed prefix regex"),
            Regex::new(r"^(Int|Test|Live)[A-Z]").expect("camel prefix regex"),
            Regex::new(r"^Sky(Test|Live)").expect("sky prefix regex"),
        ]
    })
}

/// Classify a stack name into its environment, or `None` when no rule applies.
pub fn guess_environment(name: &str) -> Option<Environment> {
    environment_rules()
        .iter()
        .find_map(|re| re.captures(name))
        .and_then(|caps| caps.get(1))
        .and_then(|m| Environment::from_tag(m.as_str()))
}

/// One deployed stack backed by a directory of three JSON documents.
///
/// Documents are read on first access and cached for the lifetime of the
/// handle. A failed load is not cached, so the error is reported again on
/// the next access.
pub struct Stack {
    name: String,
    dir: PathBuf,
    resources: OnceCell<Vec<ResourceSummary>>,
    template: OnceCell<Template>,
    description: OnceCell<StackDescription>,
    parameters: OnceCell<HashMap<String, Option<String>>>,
}

impl Stack {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            resources: OnceCell::new(),
            template: OnceCell::new(),
            description: OnceCell::new(),
            parameters: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn resources(&self) -> Result<&[ResourceSummary], DocumentError> {
        if let Some(resources) = self.resources.get() {
            return Ok(resources);
        }
        let inventory: ResourceInventory = read_json(&self.dir.join(RESOURCES_FILE))?;
        Ok(self.resources.get_or_init(|| inventory.summaries))
    }

    pub fn template(&self) -> Result<&Template, DocumentError> {
        if let Some(template) = self.template.get() {
            return Ok(template);
        }
        let template: Template = read_json(&self.dir.join(TEMPLATE_FILE))?;
        Ok(self.template.get_or_init(|| template))
    }

    pub fn description(&self) -> Result<&StackDescription, DocumentError> {
        if let Some(description) = self.description.get() {
            return Ok(description);
        }
        let path = self.dir.join(DESCRIPTION_FILE);
        let described: StackDescriptions = read_json(&path)?;
        let first = described
            .stacks
            .into_iter()
            .next()
            .ok_or_else(|| DocumentError::malformed(&path, "Stacks list is empty"))?;
        Ok(self.description.get_or_init(|| first))
    }

    /// Physical id of the resource with the given logical id, if it has one.
    pub fn get_physical_id(&self, logical_id: &str) -> Result<Option<&str>, DocumentError> {
        Ok(self
            .resources()?
            .iter()
            .find(|r| r.logical_id == logical_id)
            .and_then(|r| r.physical_id.as_deref()))
    }

    /// Deployed value of a stack parameter.
    pub fn get_parameter_value(&self, key: &str) -> Result<Option<&str>, DocumentError> {
        let parameters = match self.parameters.get() {
            Some(p) => p,
            None => {
                let map = self
                    .description()?
                    .parameters
                    .iter()
                    .map(|p| (p.key.clone(), p.value.clone()))
                    .collect();
                self.parameters.get_or_init(|| map)
            }
        };
        Ok(parameters.get(key).and_then(|v| v.as_deref()))
    }

    pub fn guess_environment(&self) -> Option<Environment> {
        guess_environment(&self.name)
    }

    /// IAM users and roles of this stack, in ascending logical-id order.
    pub fn actors(&self) -> Result<Vec<Actor<'_>>, DocumentError> {
        ActorEnumerator::new(self).actors()
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("name", &self.name)
            .field("dir", &self.dir)
            .finish()
    }
}
