use crate::adapters::policy::LiveDomainScope;
use crate::app::engine::GraphEngine;
use crate::app::settings::{DEFAULT_STACKS_DIR, DEFAULT_SUBSCRIPTIONS, Settings};
use crate::domain::stack::Environment;
use anyhow::{Context as _, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// Render the IAM access graph of deployed stacks as a DOT digraph.
#[derive(Parser, Debug)]
#[command(name = "stackgraph", version)]
#[command(about = "Render the IAM access graph of deployed stacks as a DOT digraph")]
pub struct Cli {
    /// Directory containing one subdirectory per stack
    #[arg(long, short = 's', default_value = DEFAULT_STACKS_DIR)]
    pub stacks_dir: PathBuf,

    /// Subscription dump (output of `sns list-subscriptions`)
    #[arg(long, default_value = DEFAULT_SUBSCRIPTIONS)]
    pub subscriptions: PathBuf,

    /// Environment whose stacks are graphed (int, test or live)
    #[arg(long, short = 'e', default_value = "live", value_parser = parse_environment)]
    pub environment: Environment,

    /// Name keyword marking a stack or subscription as relevant (repeatable)
    #[arg(long = "keyword", short = 'k')]
    pub keywords: Vec<String>,

    /// Graph every stack and queue subscription, ignoring environment and keywords
    #[arg(long)]
    pub all: bool,

    /// Write the graph to this file instead of standard output
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Include `//` trace comments in the graph
    #[arg(long)]
    pub annotate: bool,

    /// Fail when the subscription dump is missing or malformed
    #[arg(long)]
    pub require_subscriptions: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_environment(s: &str) -> Result<Environment, String> {
    Environment::from_tag(s)
        .ok_or_else(|| format!("Unknown environment: {} (expected int, test or live)", s))
}

impl Cli {
    pub fn settings(&self) -> Settings {
        let keywords = if self.keywords.is_empty() {
            LiveDomainScope::DEFAULT_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect()
        } else {
            self.keywords.clone()
        };
        Settings {
            stacks_dir: self.stacks_dir.clone(),
            subscriptions: self.subscriptions.clone(),
            environment: self.environment,
            keywords,
            unfiltered: self.all,
            annotate: self.annotate,
            require_subscriptions: self.require_subscriptions,
        }
    }

    /// Default log filter for the chosen verbosity.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            _ => LevelFilter::DEBUG,
        }
    }
}

/// Build the graph and write it to the requested destination.
pub fn run(cli: &Cli) -> Result<()> {
    let engine = GraphEngine::new(cli.settings());
    let generated = engine.generate()?;

    match &cli.output {
        Some(path) => std::fs::write(path, &generated.dot)
            .with_context(|| format!("Failed to write graph to {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(generated.dot.as_bytes())
                .context("Failed to write graph to stdout")?;
            stdout.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["stackgraph"]);
        let settings = cli.settings();
        assert_eq!(settings.stacks_dir, PathBuf::from(DEFAULT_STACKS_DIR));
        assert_eq!(settings.environment, Environment::Live);
        assert_eq!(settings.keywords, vec!["modav", "mami", "sky", "housekeep"]);
        assert!(!settings.unfiltered);
        assert_eq!(cli.log_level(), LevelFilter::WARN);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "stackgraph", "-s", "/tmp/stacks", "-e", "Test", "-k", "billing", "-k", "search",
            "--all", "-vv",
        ]);
        let settings = cli.settings();
        assert_eq!(settings.stacks_dir, PathBuf::from("/tmp/stacks"));
        assert_eq!(settings.environment, Environment::Test);
        assert_eq!(settings.keywords, vec!["billing", "search"]);
        assert!(settings.unfiltered);
        assert_eq!(cli.log_level(), LevelFilter::DEBUG);
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        assert!(Cli::try_parse_from(["stackgraph", "-e", "prod"]).is_err());
    }
}
