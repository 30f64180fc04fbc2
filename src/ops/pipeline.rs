//! The build pipeline.
//!
//! A linear state machine:
//!
//! ```text
//! Start -> StyleCheck -> SubmoduleSync -> BuildAsyncIo -> BuildVmCore
//!       -> BuildRuntime -> RunTests -> Done
//! ```
//!
//! Any stage error moves the machine to the terminal `Failed(stage)` state;
//! nothing after it runs. Disabled stages are skipped, not failed.

use std::fmt;

use thiserror::Error;

use crate::builder::context::BuildContext;
use crate::builder::dependency::{DependencyBuilder, DependencyReport};
use crate::builder::errors::BuildError;
use crate::builder::hooks;
use crate::builder::recipes::{AsyncIoRecipe, DependencyRecipe, VmCoreRecipe};
use crate::builder::runtime::{RuntimeBuilder, RuntimeReport};
use crate::util::fs::ensure_dir;

/// One step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    StyleCheck,
    SubmoduleSync,
    BuildAsyncIo,
    BuildVmCore,
    BuildRuntime,
    RunTests,
}

impl Stage {
    /// Stages in execution order.
    pub const ALL: [Stage; 6] = [
        Stage::StyleCheck,
        Stage::SubmoduleSync,
        Stage::BuildAsyncIo,
        Stage::BuildVmCore,
        Stage::BuildRuntime,
        Stage::RunTests,
    ];

    pub fn next(self) -> Option<Stage> {
        let index = Stage::ALL.iter().position(|s| *s == self)?;
        Stage::ALL.get(index + 1).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::StyleCheck => "style check",
            Stage::SubmoduleSync => "submodule sync",
            Stage::BuildAsyncIo => "async I/O build",
            Stage::BuildVmCore => "VM core build",
            Stage::BuildRuntime => "runtime build",
            Stage::RunTests => "tests",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the pipeline is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    Running(Stage),
    Done,
    Failed(Stage),
}

impl PipelineState {
    /// Move past the current stage. Terminal states stay put.
    pub fn advance(self) -> PipelineState {
        match self {
            PipelineState::Start => PipelineState::Running(Stage::ALL[0]),
            PipelineState::Running(stage) => match stage.next() {
                Some(next) => PipelineState::Running(next),
                None => PipelineState::Done,
            },
            terminal => terminal,
        }
    }

    /// Fail the running stage.
    pub fn fail(self) -> PipelineState {
        match self {
            PipelineState::Running(stage) => PipelineState::Failed(stage),
            other => other,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Completed,
    Skipped,
}

/// What a successful run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub stages: Vec<(Stage, StageOutcome)>,
    pub dependencies: Vec<DependencyReport>,
    pub runtime: Option<RuntimeReport>,
}

impl PipelineReport {
    pub fn outcome(&self, stage: Stage) -> Option<StageOutcome> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, outcome)| *outcome)
    }

    pub fn dependency(&self, name: &str) -> Option<&DependencyReport> {
        self.dependencies.iter().find(|d| d.dependency == name)
    }
}

/// A stage error together with the stage it ended.
#[derive(Debug, Error)]
#[error("{stage} failed")]
pub struct PipelineFailure {
    pub stage: Stage,
    #[source]
    pub source: BuildError,
}

/// Progress notifications for the CLI.
#[derive(Debug)]
pub enum PipelineEvent<'r> {
    StageStarted(Stage),
    StageFinished(Stage, StageOutcome),
    DependencyFinished(&'r DependencyReport),
}

/// Runs every stage in order against one build context.
pub struct Pipeline<'a, 'ctx> {
    ctx: &'a BuildContext<'ctx>,
    state: PipelineState,
    observer: Option<&'a dyn Fn(&PipelineEvent)>,
}

impl<'a, 'ctx> Pipeline<'a, 'ctx> {
    pub fn new(ctx: &'a BuildContext<'ctx>) -> Self {
        Pipeline {
            ctx,
            state: PipelineState::Start,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: &'a dyn Fn(&PipelineEvent)) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn run(mut self) -> Result<PipelineReport, PipelineFailure> {
        let mut report = PipelineReport::default();

        self.state = self.state.advance();
        while let PipelineState::Running(stage) = self.state {
            tracing::debug!("entering {}", stage);
            self.notify(&PipelineEvent::StageStarted(stage));

            match self.run_stage(stage, &mut report) {
                Ok(outcome) => {
                    report.stages.push((stage, outcome));
                    self.notify(&PipelineEvent::StageFinished(stage, outcome));
                    self.state = self.state.advance();
                }
                Err(source) => {
                    self.state = self.state.fail();
                    return Err(PipelineFailure { stage, source });
                }
            }
        }

        Ok(report)
    }

    fn notify(&self, event: &PipelineEvent) {
        if let Some(observer) = self.observer {
            observer(event);
        }
    }

    fn run_stage(
        &self,
        stage: Stage,
        report: &mut PipelineReport,
    ) -> Result<StageOutcome, BuildError> {
        let ctx = self.ctx;
        let config = ctx.config;

        match stage {
            Stage::StyleCheck => {
                if !config.style_check() {
                    return Ok(StageOutcome::Skipped);
                }
                Ok(ran(hooks::style_check(ctx)?))
            }
            Stage::SubmoduleSync => {
                if !config.sync_submodules() {
                    return Ok(StageOutcome::Skipped);
                }
                hooks::sync_submodules(ctx)?;
                Ok(StageOutcome::Completed)
            }
            Stage::BuildAsyncIo => {
                ensure_dir(ctx.layout.root())?;
                self.build_dependency(&AsyncIoRecipe, report)
            }
            Stage::BuildVmCore => self.build_dependency(&VmCoreRecipe, report),
            Stage::BuildRuntime => {
                report.runtime = Some(RuntimeBuilder::new(ctx).build()?);
                Ok(StageOutcome::Completed)
            }
            Stage::RunTests => {
                if !config.run_tests() {
                    return Ok(StageOutcome::Skipped);
                }
                match &report.runtime {
                    Some(runtime) if !runtime.library => {
                        Ok(ran(hooks::test_harness(ctx, &runtime.output)?))
                    }
                    _ => {
                        tracing::info!("runtime was built as a library, not running tests");
                        Ok(StageOutcome::Skipped)
                    }
                }
            }
        }
    }

    fn build_dependency(
        &self,
        recipe: &dyn DependencyRecipe,
        report: &mut PipelineReport,
    ) -> Result<StageOutcome, BuildError> {
        let dependency = DependencyBuilder::new(self.ctx, recipe).build()?;
        self.notify(&PipelineEvent::DependencyFinished(&dependency));
        report.dependencies.push(dependency);
        Ok(StageOutcome::Completed)
    }
}

fn ran(hook_ran: bool) -> StageOutcome {
    if hook_ran {
        StageOutcome::Completed
    } else {
        StageOutcome::Skipped
    }
}
