//! Scope policies: deployment naming conventions deciding what enters the graph.

mod live_domain;
mod unfiltered;

pub use live_domain::LiveDomainScope;
pub use unfiltered::UnfilteredScope;
