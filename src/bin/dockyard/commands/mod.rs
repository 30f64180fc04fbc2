//! Command implementations

pub mod build;
pub mod cache;
pub mod completions;
pub mod config;
