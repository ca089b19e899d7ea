//! Classification of resolved addresses by service prefix.

use regex::Regex;
use std::sync::OnceLock;

/// Address schemes that become graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Queue,
    Topic,
    Domain,
    Table,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Queue,
        ResourceKind::Topic,
        ResourceKind::Domain,
        ResourceKind::Table,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            ResourceKind::Queue => "arn:aws:sqs:",
            ResourceKind::Topic => "arn:aws:sns:",
            ResourceKind::Domain => "arn:aws:sdb:",
            ResourceKind::Table => "arn:aws:dynamodb:",
        }
    }

    /// Font colour distinguishing the kind in the rendered graph.
    pub fn font_color(&self) -> Option<&'static str> {
        match self {
            ResourceKind::Queue => None,
            ResourceKind::Topic => Some("red"),
            ResourceKind::Domain => Some("purple"),
            ResourceKind::Table => Some("brown"),
        }
    }

    fn name_delimiter(&self) -> char {
        match self {
            ResourceKind::Queue | ResourceKind::Topic => ':',
            ResourceKind::Domain | ResourceKind::Table => '/',
        }
    }
}

/// A resolved address recognised as one of the [`ResourceKind`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedResource {
    pub kind: ResourceKind,
    pub address: String,
    pub node_key: String,
    pub label: String,
}

fn non_word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]").expect("non-word regex"))
}

fn random_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-[A-Z0-9]{6,20}$").expect("random suffix regex"))
}

/// Dead-letter, bad-message and failure queues.
fn error_queue_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(DeadLetter|BadMessage|Fail)Queue|Dlq|Badmsg|BadMsg|Failed")
            .expect("error queue regex")
    })
}

/// Graph key for an address: every non-word character becomes `_`.
pub fn node_key(address: &str) -> String {
    non_word_regex().replace_all(address, "_").into_owned()
}

/// Human label: drop the generated suffix and break the name at hyphens.
pub fn node_label(name: &str) -> String {
    random_suffix_regex().replace(name, "").replace('-', "\n")
}

pub fn is_error_queue(address: &str) -> bool {
    error_queue_regex().is_match(address)
}

/// Every scheme the address matches, minus error queues.
pub fn classify(address: &str) -> Vec<ClassifiedResource> {
    ResourceKind::ALL
        .iter()
        .filter(|kind| address.starts_with(kind.prefix()))
        .filter(|kind| !(**kind == ResourceKind::Queue && is_error_queue(address)))
        .map(|&kind| {
            let name = address
                .rsplit(kind.name_delimiter())
                .next()
                .unwrap_or(address);
            ClassifiedResource {
                kind,
                address: address.to_string(),
                node_key: node_key(address),
                label: node_label(name),
            }
        })
        .collect()
}
