//! High-level operations.
//!
//! This module contains the implementation of Dockyard commands.

pub mod dockyard_build;
pub mod dockyard_cache;
pub mod dockyard_config;
pub mod pipeline;

pub use dockyard_build::{build, BuildOptions};
pub use dockyard_cache::{list_cache, CacheListing};
pub use dockyard_config::{render_config, resolve_config};
pub use pipeline::{
    Pipeline, PipelineEvent, PipelineFailure, PipelineReport, PipelineState, Stage, StageOutcome,
};
