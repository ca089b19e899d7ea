use crate::domain::classifier::node_key;
use crate::domain::document::Subscription;
use crate::domain::graph::{AccessGraph, Attributes};
use crate::domain::ports::ScopePolicy;
use tracing::debug;

/// Delivery protocol of topic → queue subscriptions.
pub const QUEUE_PROTOCOL: &str = "sqs";

/// Adds topic → queue edges from push subscriptions.
pub struct SubscriptionOverlay<'a> {
    scope: &'a dyn ScopePolicy,
}

impl<'a> SubscriptionOverlay<'a> {
    pub fn new(scope: &'a dyn ScopePolicy) -> Self {
        Self { scope }
    }

    pub fn keeps(&self, subscription: &Subscription) -> bool {
        subscription.protocol == QUEUE_PROTOCOL
            && self
                .scope
                .includes_subscription(&subscription.topic_arn, &subscription.endpoint)
    }

    /// Apply every kept subscription; returns the edges written.
    pub fn apply(&self, graph: &mut AccessGraph, subscriptions: &[Subscription]) -> Vec<String> {
        let mut applied = Vec::new();
        for subscription in subscriptions.iter().filter(|s| self.keeps(s)) {
            debug!(
                topic = %subscription.topic_arn,
                endpoint = %subscription.endpoint,
                "subscription edge"
            );
            graph.add_edge(
                &node_key(&subscription.topic_arn),
                &node_key(&subscription.endpoint),
                Attributes::new(),
            );
            applied.push(format!(
                "sns {} -> {}",
                subscription.topic_arn, subscription.endpoint
            ));
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stack::Environment;

    struct AcceptAll;

    impl ScopePolicy for AcceptAll {
        fn includes_stack(&self, _name: &str, _environment: Option<Environment>) -> bool {
            true
        }
        fn includes_subscription(&self, _topic_arn: &str, endpoint: &str) -> bool {
            !endpoint.contains("skip")
        }
        fn name(&self) -> &str {
            "accept-all"
        }
    }

    fn sub(protocol: &str, topic: &str, endpoint: &str) -> Subscription {
        Subscription {
            protocol: protocol.to_string(),
            topic_arn: topic.to_string(),
            endpoint: endpoint.to_string(),
        }
    }

    #[test]
    fn test_queue_subscription_adds_one_edge() {
        let mut graph = AccessGraph::new();
        let applied = SubscriptionOverlay::new(&AcceptAll).apply(
            &mut graph,
            &[sub(
                "sqs",
                "arn:aws:sns:eu-west-1:111:live-modav-events",
                "arn:aws:sqs:eu-west-1:111:live-modav-ingest",
            )],
        );

        assert_eq!(applied.len(), 1);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(
            graph.edge(
                "arn_aws_sns_eu_west_1_111_live_modav_events",
                "arn_aws_sqs_eu_west_1_111_live_modav_ingest"
            ),
            Some(&Attributes::new())
        );
    }

    #[test]
    fn test_other_protocols_and_scope_rejections_are_dropped() {
        let mut graph = AccessGraph::new();
        SubscriptionOverlay::new(&AcceptAll).apply(
            &mut graph,
            &[
                sub("https", "arn:aws:sns:eu-west-1:111:t", "https://example"),
                sub("email", "arn:aws:sns:eu-west-1:111:t", "arn:aws:sqs:eu-west-1:111:q"),
                sub("sqs", "arn:aws:sns:eu-west-1:111:t", "arn:aws:sqs:eu-west-1:111:skip"),
            ],
        );
        assert!(graph.is_empty());
    }
}
