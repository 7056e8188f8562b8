//! Integration tests for cotree

mod cli_contracts;
mod cli_parse;
mod project_store;
mod scan_templates;
mod support;
mod tree_roundtrip;
