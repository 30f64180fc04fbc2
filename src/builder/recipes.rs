//! How each native dependency is generated and built.
//!
//! The generic algorithm lives in [`crate::builder::dependency`]; a recipe
//! only says where the checkout is, which targets are needed and which
//! commands produce them.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::builder::cmake::CMakeConfigure;
use crate::builder::context::BuildContext;
use crate::builder::errors::BuildError;
use crate::builder::make::make_command;
use crate::builder::target::{BuildTarget, TargetSpec};
use crate::core::BuildConfiguration;
use crate::util::process::ProcessBuilder;

/// One native dependency.
pub trait DependencyRecipe {
    /// Directory name under `deps/` in the build root.
    fn name(&self) -> &'static str;

    /// Source checkout.
    fn checkout(&self, ctx: &BuildContext) -> PathBuf;

    /// Targets required by the configuration, in build order.
    fn target_specs(&self, config: &BuildConfiguration) -> Vec<TargetSpec>;

    /// Build-system generator invocation.
    fn configure_command(&self, ctx: &BuildContext) -> Result<ProcessBuilder, BuildError>;

    /// Native build tool invocation for one target.
    fn build_command(&self, ctx: &BuildContext, target: &BuildTarget) -> ProcessBuilder;

    /// Where the native build leaves the target's static library.
    fn expected_output(&self, ctx: &BuildContext, target: &BuildTarget) -> PathBuf;
}

/// libuv, generated with gyp and built in its own `out/` tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct AsyncIoRecipe;

pub const LIBUV: TargetSpec = TargetSpec {
    name: "uv",
    variant: "",
    native_name: "libuv",
    output_dir: "out",
};

impl DependencyRecipe for AsyncIoRecipe {
    fn name(&self) -> &'static str {
        "libuv"
    }

    fn checkout(&self, ctx: &BuildContext) -> PathBuf {
        ctx.project.async_io_checkout()
    }

    fn target_specs(&self, _config: &BuildConfiguration) -> Vec<TargetSpec> {
        vec![LIBUV]
    }

    fn configure_command(&self, ctx: &BuildContext) -> Result<ProcessBuilder, BuildError> {
        let checkout = self.checkout(ctx);

        let cmd = if ctx.config.is_embedded_cross() {
            ProcessBuilder::new(checkout.join("nuttx-configure")).arg(ctx.embedded_home()?)
        } else {
            ProcessBuilder::new(checkout.join("gyp_uv.py")).args(["-f", "make"])
        };

        Ok(cmd.cwd(checkout))
    }

    fn build_command(&self, ctx: &BuildContext, target: &BuildTarget) -> ProcessBuilder {
        let build_type = format!("BUILDTYPE={}", ctx.config.build_type().native_name());
        make_command(
            ctx,
            &self.checkout(ctx),
            [
                OsString::from("-C"),
                target.output_dir().as_os_str().to_os_string(),
                OsString::from(build_type),
            ],
        )
    }

    fn expected_output(&self, ctx: &BuildContext, target: &BuildTarget) -> PathBuf {
        self.checkout(ctx)
            .join(target.output_dir())
            .join(ctx.config.build_type().native_name())
            .join(format!("lib{}.a", target.name()))
    }
}

/// JerryScript core, generated with CMake into the build root.
#[derive(Debug, Default, Clone, Copy)]
pub struct VmCoreRecipe;

pub const JERRY_CORE: TargetSpec = TargetSpec {
    name: "jerrycore",
    variant: "",
    native_name: "jerry-core",
    output_dir: "jerry-core",
};

pub const JERRY_CORE_MEM_STATS: TargetSpec = TargetSpec {
    name: "jerrycore",
    variant: "-mem_stats",
    native_name: "jerry-core",
    output_dir: "jerry-core",
};

/// Floating point emulation, needed on NuttX.
pub const FDLIBM: TargetSpec = TargetSpec {
    name: "fdlibm",
    variant: "",
    native_name: "jerry-fdlibm.third_party.lib",
    output_dir: "third-party/fdlibm",
};

impl VmCoreRecipe {
    fn build_home(&self, ctx: &BuildContext) -> PathBuf {
        ctx.layout.dep_home(self.name())
    }
}

impl DependencyRecipe for VmCoreRecipe {
    fn name(&self) -> &'static str {
        "jerry"
    }

    fn checkout(&self, ctx: &BuildContext) -> PathBuf {
        ctx.project.vm_core_checkout()
    }

    fn target_specs(&self, config: &BuildConfiguration) -> Vec<TargetSpec> {
        let mut specs = vec![if config.memory_stats() {
            JERRY_CORE_MEM_STATS
        } else {
            JERRY_CORE
        }];

        if config.is_embedded_cross() {
            specs.push(FDLIBM);
        }

        specs
    }

    fn configure_command(&self, ctx: &BuildContext) -> Result<ProcessBuilder, BuildError> {
        let mut cmake = CMakeConfigure::new(ctx, &self.checkout(ctx), &self.build_home(ctx))
            .define("ENABLE_LTO", "OFF")
            .define("CMAKE_TOOLCHAIN_FILE", ctx.toolchain_file());

        if ctx.config.is_embedded_cross() {
            cmake = cmake
                .define("EXTERNAL_LIBC_INTERFACE", ctx.embedded_home()?.join("include"))
                .define("PLATFORM_EXT", "NUTTX");
        }

        Ok(cmake.command())
    }

    fn build_command(&self, ctx: &BuildContext, target: &BuildTarget) -> ProcessBuilder {
        let home = self.build_home(ctx);
        make_command(
            ctx,
            &home,
            [
                OsString::from("-C"),
                home.clone().into_os_string(),
                OsString::from(target.native_target(ctx.config.build_type())),
            ],
        )
    }

    fn expected_output(&self, ctx: &BuildContext, target: &BuildTarget) -> PathBuf {
        self.build_home(ctx)
            .join(target.output_dir())
            .join(format!("lib{}.a", target.native_target(ctx.config.build_type())))
    }
}
