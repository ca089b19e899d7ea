use crate::domain::ports::ScopePolicy;
use crate::domain::stack::Environment;

/// Accepts every stack and every queue subscription.
#[derive(Debug, Default)]
pub struct UnfilteredScope;

impl ScopePolicy for UnfilteredScope {
    fn includes_stack(&self, _name: &str, _environment: Option<Environment>) -> bool {
        true
    }

    fn includes_subscription(&self, _topic_arn: &str, _endpoint: &str) -> bool {
        true
    }

    fn name(&self) -> &str {
        "unfiltered"
    }
}
