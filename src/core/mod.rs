//! Core data types: build configuration, project and build layout.

pub mod layout;
pub mod options;
pub mod project;

pub use layout::BuildLayout;
pub use options::{BuildConfiguration, BuildType, TargetArch, TargetOs};
pub use project::Project;
