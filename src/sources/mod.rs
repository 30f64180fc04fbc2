//! Dependency checkouts and their revisions.

pub mod git;

use std::path::Path;

use crate::builder::errors::BuildError;

pub use git::GitRevisionProvider;

/// Reads the exact source identifier of a checkout.
pub trait RevisionProvider {
    fn revision(&self, checkout: &Path) -> Result<String, BuildError>;
}
