//! stack-access-graph library — IAM access graph construction from stack snapshots.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
