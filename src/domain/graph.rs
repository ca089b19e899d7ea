use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

/// Attribute name → value, kept sorted so rendering is canonical.
pub type Attributes = BTreeMap<String, String>;

/// Build an attribute map from literal pairs.
pub fn attrs<const N: usize>(pairs: [(&str, &str); N]) -> Attributes {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A node slot. `attributes` is `None` while the node is only known as an
/// edge endpoint; such nodes are not declared in the output.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub key: String,
    pub attributes: Option<Attributes>,
}

/// Access graph - deduplicated nodes and edges keyed by identifier.
///
/// Both node and edge insertion are upserts: the last write for a key (or
/// ordered key pair) wins.
#[derive(Debug, Clone, Default)]
pub struct AccessGraph {
    pub graph: DiGraph<GraphNode, Attributes>,
    key_to_node: HashMap<String, NodeIndex>,
}

impl AccessGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_create_node(&mut self, key: &str) -> NodeIndex {
        if let Some(&idx) = self.key_to_node.get(key) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode {
            key: key.to_string(),
            attributes: None,
        });
        self.key_to_node.insert(key.to_string(), idx);
        idx
    }

    pub fn add_node(&mut self, key: &str, attributes: Attributes) {
        let idx = self.get_or_create_node(key);
        self.graph[idx].attributes = Some(attributes);
    }

    pub fn add_edge(&mut self, from: &str, to: &str, attributes: Attributes) {
        let a = self.get_or_create_node(from);
        let b = self.get_or_create_node(to);
        self.graph.update_edge(a, b, attributes);
    }

    pub fn node(&self, key: &str) -> Option<&Attributes> {
        self.key_to_node
            .get(key)
            .and_then(|&idx| self.graph[idx].attributes.as_ref())
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<&Attributes> {
        let a = *self.key_to_node.get(from)?;
        let b = *self.key_to_node.get(to)?;
        self.graph
            .find_edge(a, b)
            .and_then(|e| self.graph.edge_weight(e))
    }

    /// Number of declared nodes.
    pub fn node_count(&self) -> usize {
        self.graph
            .node_weights()
            .filter(|n| n.attributes.is_some())
            .count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0 && self.edge_count() == 0
    }

    /// Declared nodes in ascending key order.
    pub fn nodes(&self) -> Vec<(&str, &Attributes)> {
        let mut nodes: Vec<(&str, &Attributes)> = self
            .graph
            .node_weights()
            .filter_map(|n| n.attributes.as_ref().map(|a| (n.key.as_str(), a)))
            .collect();
        nodes.sort_by(|a, b| a.0.cmp(b.0));
        nodes
    }

    /// Edges in ascending (from, to) order.
    pub fn edges(&self) -> Vec<(&str, &str, &Attributes)> {
        let mut edges: Vec<(&str, &str, &Attributes)> = self
            .graph
            .edge_indices()
            .filter_map(|e| {
                let (a, b) = self.graph.edge_endpoints(e)?;
                Some((
                    self.graph[a].key.as_str(),
                    self.graph[b].key.as_str(),
                    &self.graph[e],
                ))
            })
            .collect();
        edges.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
        edges
    }

    /// Replay another graph's declarations on top of this one.
    pub fn merge(&mut self, other: AccessGraph) {
        for node in other.graph.node_weights() {
            match &node.attributes {
                Some(attributes) => self.add_node(&node.key, attributes.clone()),
                None => {
                    self.get_or_create_node(&node.key);
                }
            }
        }
        for e in other.graph.edge_indices() {
            if let Some((a, b)) = other.graph.edge_endpoints(e) {
                self.add_edge(&other.graph[a].key, &other.graph[b].key, other.graph[e].clone());
            }
        }
    }

    /// Render as a DOT digraph: nodes, then edges, each in canonical order.
    pub fn render(&self) -> String {
        self.render_with_comments(&[])
    }

    /// Render with `//` comment lines placed after the opening brace.
    pub fn render_with_comments(&self, comments: &[String]) -> String {
        let mut out = String::from("digraph aws {\n");
        for comment in comments {
            for line in comment.lines() {
                let _ = writeln!(out, "  // {line}");
            }
        }
        for (key, attributes) in self.nodes() {
            let _ = writeln!(out, "  {key}{}", render_attributes(attributes));
        }
        for (from, to, attributes) in self.edges() {
            let _ = writeln!(out, "  {from} -> {to}{}", render_attributes(attributes));
        }
        out.push_str("}\n");
        out
    }
}

fn render_attributes(attributes: &Attributes) -> String {
    if attributes.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = attributes
        .iter()
        .map(|(k, v)| format!("{k}={}", quote(v)))
        .collect();
    format!(" [ {} ]", pairs.join(", "))
}

/// Double-quoted DOT string with backslash escapes.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
