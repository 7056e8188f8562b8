//! cotree: Project File Trees
//!
//! The nested file/folder model of a code project, its conversion to and from
//! the flat `path -> content` map projects are stored as, path-addressed edits,
//! and a template scanner that turns starter directories into trees.

pub mod config;
pub mod error;
pub mod logging;
pub mod sandbox;
pub mod scan;
pub mod session;
pub mod store;
pub mod template;
pub mod tooling;
pub mod tree;
pub mod types;
