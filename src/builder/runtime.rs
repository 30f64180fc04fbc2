//! Build of the runtime itself, linking the shared dependency libraries.

use std::path::PathBuf;

use crate::builder::cmake::{configure_with_detection_workaround, CMakeConfigure};
use crate::builder::context::BuildContext;
use crate::builder::errors::BuildError;
use crate::builder::hooks;
use crate::builder::make::make_command;
use crate::util::fs::ensure_dir;

/// Result of the runtime build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeReport {
    /// Executable or static library produced
    pub output: PathBuf,
    pub library: bool,
}

pub struct RuntimeBuilder<'a, 'ctx> {
    ctx: &'a BuildContext<'ctx>,
}

impl<'a, 'ctx> RuntimeBuilder<'a, 'ctx> {
    pub fn new(ctx: &'a BuildContext<'ctx>) -> Self {
        RuntimeBuilder { ctx }
    }

    /// Path of the executable or library the build must leave behind.
    pub fn expected_output(&self) -> PathBuf {
        let name = self.ctx.project.runtime_name();
        let file = if self.ctx.config.produces_library() {
            format!("lib{}.a", name)
        } else {
            name.to_string()
        };
        self.ctx.layout.runtime_dir().join(file)
    }

    pub fn build(&self) -> Result<RuntimeReport, BuildError> {
        let ctx = self.ctx;
        let config = ctx.config;

        hooks::codegen(ctx)?;

        let build_dir = ctx.layout.runtime_dir();
        ensure_dir(&build_dir)?;

        let mut cmake = CMakeConfigure::new(ctx, ctx.project.root(), &build_dir)
            .define("CMAKE_BUILD_TYPE", config.build_type().native_name())
            .define("CMAKE_TOOLCHAIN_FILE", ctx.toolchain_file());
        if config.is_embedded_cross() {
            cmake = cmake.define("NUTTX_HOME", ctx.embedded_home()?);
        }
        let cmake = cmake
            .define_if(config.produces_library(), "BUILD_TO_LIB", "YES")
            .define_if(config.memory_stats(), "JERRY_MEM_STATS", "YES");

        configure_with_detection_workaround(ctx, &cmake.command())?;

        ctx.run(&make_command(ctx, &build_dir, Vec::<String>::new()))?;

        let output = self.expected_output();
        if !output.is_file() {
            return Err(BuildError::ArtifactNotProduced {
                target: ctx.project.runtime_name().to_string(),
                path: output,
            });
        }

        tracing::info!("runtime written to {}", output.display());
        Ok(RuntimeReport {
            output,
            library: config.produces_library(),
        })
    }
}
