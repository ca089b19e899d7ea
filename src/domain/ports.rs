use crate::domain::document::Subscription;
use crate::domain::error::DocumentError;
use crate::domain::stack::{Environment, Stack};

/// Stack enumeration port (implemented by Infrastructure)
pub trait StackSource {
    fn stacks(&self) -> Result<Vec<Stack>, DocumentError>;
}

/// Subscription dump port
pub trait SubscriptionSource {
    fn subscriptions(&self) -> Result<Vec<Subscription>, DocumentError>;
}

/// Deployment-specific scoping rules: which stacks and subscriptions belong in
/// the graph. Kept out of the graph engine so naming conventions can vary.
pub trait ScopePolicy: Send + Sync {
    fn includes_stack(&self, name: &str, environment: Option<Environment>) -> bool;

    /// Called only for queue-delivery subscriptions.
    fn includes_subscription(&self, topic_arn: &str, endpoint: &str) -> bool;

    fn name(&self) -> &str;
}
