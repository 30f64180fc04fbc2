//! Native build steps.
//!
//! Dependencies are built through [`DependencyRecipe`]s with a
//! revision-keyed cache; the runtime is configured with CMake and linked
//! against the shared libraries the dependencies leave behind.

pub mod cache;
pub mod cmake;
pub mod context;
pub mod dependency;
pub mod errors;
pub mod hooks;
pub mod make;
pub mod recipes;
pub mod runtime;
pub mod target;

pub use cache::{CacheEntry, CacheKey, CacheStore};
pub use context::BuildContext;
pub use dependency::{DependencyBuilder, DependencyReport};
pub use errors::BuildError;
pub use recipes::{AsyncIoRecipe, DependencyRecipe, VmCoreRecipe};
pub use runtime::{RuntimeBuilder, RuntimeReport};
pub use target::{BuildTarget, TargetSpec};
