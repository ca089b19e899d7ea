use crate::domain::ports::ScopePolicy;
use crate::domain::stack::Environment;
use regex::Regex;
use std::sync::OnceLock;

/// Queue endpoints that belong to other teams or to single instances.
fn excluded_endpoint_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(Turncoat|Rorschach)Resources-Queue|-i-").expect("excluded endpoint regex")
    })
}

/// Production scope: stacks of one environment whose names mention one of
/// the domain keywords, and queue subscriptions between such resources.
pub struct LiveDomainScope {
    environment: Environment,
    relevance: Regex,
    topic_environment: Regex,
}

impl LiveDomainScope {
    pub const DEFAULT_KEYWORDS: [&'static str; 4] = ["modav", "mami", "sky", "housekeep"];

    /// Keywords are matched case-insensitively as plain substrings. An empty
    /// keyword list accepts every name.
    pub fn new<S: AsRef<str>>(
        environment: Environment,
        keywords: &[S],
    ) -> Result<Self, regex::Error> {
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        Ok(Self {
            environment,
            relevance: Regex::new(&format!("(?i){alternation}"))?,
            topic_environment: Regex::new(&format!("(?i):(sky)?{}", environment.as_str()))?,
        })
    }

    pub fn is_relevant(&self, name: &str) -> bool {
        self.relevance.is_match(name)
    }
}

impl Default for LiveDomainScope {
    fn default() -> Self {
        Self::new(Environment::Live, &Self::DEFAULT_KEYWORDS)
            .expect("default keywords form a valid regex")
    }
}

impl ScopePolicy for LiveDomainScope {
    fn includes_stack(&self, name: &str, environment: Option<Environment>) -> bool {
        environment == Some(self.environment) && self.is_relevant(name)
    }

    fn includes_subscription(&self, topic_arn: &str, endpoint: &str) -> bool {
        self.topic_environment.is_match(topic_arn)
            && self.is_relevant(topic_arn)
            && !excluded_endpoint_regex().is_match(endpoint)
            && self.is_relevant(endpoint)
    }

    fn name(&self) -> &str {
        "live-domain"
    }
}
