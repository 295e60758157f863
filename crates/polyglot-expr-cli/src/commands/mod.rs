//! CLI command implementations - one command per file.

pub mod batch;
pub mod captures;
pub mod parse;
pub mod transpile;
