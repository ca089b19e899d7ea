use crate::domain::actor::Actor;
use crate::domain::classifier::{ClassifiedResource, ResourceKind, classify};
use crate::domain::document::{AccessStatement, ResourceExpr, Subscription};
use crate::domain::error::DocumentError;
use crate::domain::graph::{AccessGraph, Attributes, attrs};
use crate::domain::overlay::SubscriptionOverlay;
use crate::domain::ports::ScopePolicy;
use crate::domain::resolver::resolve;
use crate::domain::stack::Stack;
use tracing::{debug, info, warn};

pub const SEND_MESSAGE: &str = "sqs:SendMessage";
pub const DELETE_MESSAGE: &str = "sqs:DeleteMessage";
pub const PUBLISH: &str = "sns:Publish";

/// A directed edge decided for one actor/resource pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
    pub attributes: Attributes,
}

impl EdgeSpec {
    fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            attributes: Attributes::new(),
        }
    }
}

/// Decide the edge between an actor and a classified resource.
///
/// Queues: send+delete is a single `dir=both` edge, send alone points at the
/// queue, delete alone points at the actor. Topics need `sns:Publish`.
/// Domains and tables always get actor → resource.
pub fn edge_for(
    actor_key: &str,
    resource: &ClassifiedResource,
    statement: &AccessStatement,
) -> Option<EdgeSpec> {
    let res_key = resource.node_key.as_str();
    match resource.kind {
        ResourceKind::Queue => {
            let sends = statement.has_action(SEND_MESSAGE);
            let deletes = statement.has_action(DELETE_MESSAGE);
            match (sends, deletes) {
                (true, true) => Some(EdgeSpec {
                    attributes: attrs([("dir", "both")]),
                    ..EdgeSpec::new(actor_key, res_key)
                }),
                (true, false) => Some(EdgeSpec::new(actor_key, res_key)),
                (false, true) => Some(EdgeSpec::new(res_key, actor_key)),
                (false, false) => None,
            }
        }
        ResourceKind::Topic => statement
            .has_action(PUBLISH)
            .then(|| EdgeSpec::new(actor_key, res_key)),
        ResourceKind::Domain | ResourceKind::Table => Some(EdgeSpec::new(actor_key, res_key)),
    }
}

fn resource_node_attributes(resource: &ClassifiedResource) -> Attributes {
    let mut attributes = attrs([("label", resource.label.as_str()), ("shape", "rect")]);
    if let Some(color) = resource.kind.font_color() {
        attributes.insert("fontcolor".to_string(), color.to_string());
    }
    attributes
}

fn actor_node_attributes(actor: &Actor<'_>) -> Attributes {
    let label = format!("{}\n{}", actor.stack().name(), actor.logical_id());
    attrs([
        ("label", label.as_str()),
        ("shape", "ellipse"),
        ("color", "blue"),
    ])
}

/// Outcome of a full build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub graph: AccessGraph,
    /// Stacks that contributed to the graph.
    pub processed: Vec<String>,
    /// Stacks left out by the scope policy.
    pub out_of_scope: Vec<String>,
    /// Stacks whose documents could not be used, with the reason.
    pub failed: Vec<(String, DocumentError)>,
    /// Trace lines, suitable for embedding as comments.
    pub trace: Vec<String>,
}

/// Graph builder - walks stacks → actors → statements and fills an AccessGraph
pub struct GraphBuilder {
    scope: Box<dyn ScopePolicy>,
}

impl GraphBuilder {
    pub fn new(scope: Box<dyn ScopePolicy>) -> Self {
        Self { scope }
    }

    /// Build the graph for all in-scope stacks, then overlay subscriptions.
    ///
    /// Each stack is built into its own scratch graph which is merged only
    /// on success, so a broken stack contributes nothing.
    pub fn build(&self, stacks: &[Stack], subscriptions: &[Subscription]) -> BuildReport {
        let mut report = BuildReport::default();

        for stack in stacks {
            report.trace.push(format!("Processing {}", stack.name()));
            if !self
                .scope
                .includes_stack(stack.name(), stack.guess_environment())
            {
                debug!(stack = stack.name(), scope = self.scope.name(), "stack out of scope");
                report.out_of_scope.push(stack.name().to_string());
                continue;
            }

            let mut trace = Vec::new();
            match self.build_stack(stack, &mut trace) {
                Ok(graph) => {
                    info!(
                        stack = stack.name(),
                        nodes = graph.node_count(),
                        edges = graph.edge_count(),
                        "processed stack"
                    );
                    report.graph.merge(graph);
                    report.trace.extend(trace);
                    report.processed.push(stack.name().to_string());
                }
                Err(err) => {
                    warn!(stack = stack.name(), error = %err, "skipping stack");
                    report.failed.push((stack.name().to_string(), err));
                }
            }
        }

        let applied = SubscriptionOverlay::new(self.scope.as_ref())
            .apply(&mut report.graph, subscriptions);
        report.trace.extend(applied);

        report
    }

    /// Graph contribution of a single stack.
    pub fn build_stack(
        &self,
        stack: &Stack,
        trace: &mut Vec<String>,
    ) -> Result<AccessGraph, DocumentError> {
        let mut graph = AccessGraph::new();
        for actor in stack.actors()? {
            graph.add_node(&actor.node_id(), actor_node_attributes(&actor));
            self.add_actor(&mut graph, &actor, trace)?;
        }
        Ok(graph)
    }

    fn add_actor(
        &self,
        graph: &mut AccessGraph,
        actor: &Actor<'_>,
        trace: &mut Vec<String>,
    ) -> Result<(), DocumentError> {
        let statements = actor.policy_statements()?;
        for statement in statements.iter().filter(|s| s.is_allow()) {
            for expr in statement.resources.as_slice() {
                self.add_statement_resource(graph, actor, statement, expr, trace)?;
            }
        }
        Ok(())
    }

    fn add_statement_resource(
        &self,
        graph: &mut AccessGraph,
        actor: &Actor<'_>,
        statement: &AccessStatement,
        expr: &ResourceExpr,
        trace: &mut Vec<String>,
    ) -> Result<(), DocumentError> {
        let address = match resolve(actor.stack(), expr) {
            Ok(Some(address)) => address,
            Ok(None) => {
                debug!(actor = actor.logical_id(), ?expr, "uninterpreted resource expression");
                return Ok(());
            }
            Err(err) if err.is_recoverable() => {
                debug!(actor = actor.logical_id(), error = %err, "dropping statement resource");
                trace.push(format!(
                    "{} {} has an unresolved reference: {err}",
                    actor.stack().name(),
                    actor.logical_id()
                ));
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        debug!(actor = actor.logical_id(), %address, "access");
        trace.push(format!(
            "{} {} has some sort of access to {address}",
            actor.stack().name(),
            actor.logical_id()
        ));

        let actor_key = actor.node_id();
        for resource in classify(&address) {
            graph.add_node(&resource.node_key, resource_node_attributes(&resource));
            if let Some(edge) = edge_for(&actor_key, &resource, statement) {
                graph.add_edge(&edge.from, &edge.to, edge.attributes);
            }
        }
        Ok(())
    }
}
