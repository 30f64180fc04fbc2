//! Dockyard - builds an embeddable native runtime and its pinned C dependencies
//!
//! This crate provides the library behind the `dockyard` CLI: option
//! resolution, the revision-keyed dependency cache, the dependency and
//! runtime builders, and the pipeline tying them together.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test doubles for Dockyard unit tests.
///
/// Only compiled for tests. Provides a recording tool runner, a fixed
/// revision provider and project fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::builder::{BuildContext, BuildError};
pub use crate::core::{BuildConfiguration, Project};
pub use crate::ops::{Pipeline, PipelineFailure, PipelineReport};
pub use crate::util::GlobalContext;
