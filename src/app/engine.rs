use crate::adapters::fs::{FsStackRepository, FsSubscriptionSource};
use crate::app::settings::Settings;
use crate::domain::builder::{BuildReport, GraphBuilder};
use crate::domain::document::Subscription;
use crate::domain::ports::{StackSource, SubscriptionSource};
use anyhow::{Context as _, Result};
use tracing::{info, warn};

/// Rendered graph plus the build report it came from.
#[derive(Debug)]
pub struct Generated {
    pub dot: String,
    pub report: BuildReport,
}

/// Drives one run: enumerate stacks, build the graph, overlay subscriptions, render.
pub struct GraphEngine {
    settings: Settings,
}

impl GraphEngine {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Run against the directories named in the settings.
    pub fn generate(&self) -> Result<Generated> {
        let stacks = FsStackRepository::new(&self.settings.stacks_dir);
        let subscriptions = FsSubscriptionSource::new(&self.settings.subscriptions);
        self.generate_from(&stacks, &subscriptions)
    }

    pub fn generate_from(
        &self,
        stack_source: &dyn StackSource,
        subscription_source: &dyn SubscriptionSource,
    ) -> Result<Generated> {
        let stacks = stack_source
            .stacks()
            .context("Failed to enumerate stacks")?;
        let subscriptions = self.load_subscriptions(subscription_source)?;

        let builder = GraphBuilder::new(self.settings.scope()?);
        let report = builder.build(&stacks, &subscriptions);

        info!(
            stacks = stacks.len(),
            processed = report.processed.len(),
            out_of_scope = report.out_of_scope.len(),
            failed = report.failed.len(),
            nodes = report.graph.node_count(),
            edges = report.graph.edge_count(),
            "graph built"
        );

        let dot = if self.settings.annotate {
            report.graph.render_with_comments(&report.trace)
        } else {
            report.graph.render()
        };

        Ok(Generated { dot, report })
    }

    fn load_subscriptions(&self, source: &dyn SubscriptionSource) -> Result<Vec<Subscription>> {
        match source.subscriptions() {
            Ok(subscriptions) => Ok(subscriptions),
            Err(err) if !self.settings.require_subscriptions => {
                warn!(error = %err, "continuing without subscription overlay");
                Ok(Vec::new())
            }
            Err(err) => Err(err).context("Failed to load subscriptions"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DocumentError;
    use crate::domain::stack::Stack;

    struct NoStacks;

    impl StackSource for NoStacks {
        fn stacks(&self) -> Result<Vec<Stack>, DocumentError> {
            Ok(Vec::new())
        }
    }

    struct MissingDump;

    impl SubscriptionSource for MissingDump {
        fn subscriptions(&self) -> Result<Vec<Subscription>, DocumentError> {
            Err(DocumentError::NotFound {
                path: "list-subscriptions.json".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    #[test]
    fn test_missing_subscriptions_are_optional_by_default() {
        let engine = GraphEngine::new(Settings::default());
        let generated = engine.generate_from(&NoStacks, &MissingDump).unwrap();
        assert_eq!(generated.dot, "digraph aws {\n}\n");
    }

    #[test]
    fn test_required_subscriptions_fail_the_run() {
        let engine = GraphEngine::new(Settings {
            require_subscriptions: true,
            ..Settings::default()
        });
        let err = engine.generate_from(&NoStacks, &MissingDump).unwrap_err();
        assert!(format!("{err:#}").contains("list-subscriptions.json"));
    }

    #[test]
    fn test_missing_stack_root_fails_the_run() {
        let engine = GraphEngine::new(Settings {
            stacks_dir: "/nonexistent/stacks".into(),
            ..Settings::default()
        });
        let err = engine.generate().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/stacks"));
    }
}
