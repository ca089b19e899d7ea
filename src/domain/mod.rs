pub mod actor;
pub mod builder;
pub mod classifier;
pub mod document;
pub mod error;
pub mod graph;
pub mod overlay;
pub mod ports;
pub mod resolver;
pub mod stack;
