use crate::adapters::policy::{LiveDomainScope, UnfilteredScope};
use crate::domain::ports::ScopePolicy;
use crate::domain::stack::Environment;
use anyhow::{Context as _, Result};
use std::path::PathBuf;

pub const DEFAULT_STACKS_DIR: &str = "./stacks";
pub const DEFAULT_SUBSCRIPTIONS: &str = "./list-subscriptions.json";

/// Run configuration, assembled by the CLI.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory with one subdirectory per stack.
    pub stacks_dir: PathBuf,
    /// Subscription dump file.
    pub subscriptions: PathBuf,
    pub environment: Environment,
    /// Name keywords a stack or subscription must mention to be in scope.
    pub keywords: Vec<String>,
    /// Ignore environment and keyword scoping entirely.
    pub unfiltered: bool,
    /// Embed `//` trace comments in the rendered graph.
    pub annotate: bool,
    /// Treat a missing or malformed subscription dump as fatal.
    pub require_subscriptions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stacks_dir: PathBuf::from(DEFAULT_STACKS_DIR),
            subscriptions: PathBuf::from(DEFAULT_SUBSCRIPTIONS),
            environment: Environment::Live,
            keywords: LiveDomainScope::DEFAULT_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            unfiltered: false,
            annotate: false,
            require_subscriptions: false,
        }
    }
}

impl Settings {
    pub fn scope(&self) -> Result<Box<dyn ScopePolicy>> {
        if self.unfiltered {
            return Ok(Box::new(UnfilteredScope));
        }
        let scope = LiveDomainScope::new(self.environment, &self.keywords)
            .with_context(|| format!("Invalid scope keywords: {:?}", self.keywords))?;
        Ok(Box::new(scope))
    }
}
