//! Implementation of `dockyard build`.

use std::time::Instant;

use anyhow::Result;

use crate::builder::BuildContext;
use crate::ops::pipeline::{Pipeline, PipelineEvent, PipelineReport, Stage, StageOutcome};
use crate::sources::GitRevisionProvider;
use crate::util::process::SystemRunner;
use crate::util::shell::{format_duration, Shell, Status};
use crate::util::GlobalContext;

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Raw `--key[=value]` build options, applied after `[defaults]`
    pub options: Vec<String>,
}

/// Run the full pipeline with the real tools.
pub fn build(gctx: &GlobalContext, shell: &Shell, opts: &BuildOptions) -> Result<PipelineReport> {
    let project = gctx.load_project()?;
    let config = project.resolve_options(&opts.options);

    tracing::debug!("resolved configuration:\n{}", toml::to_string(&config)?);
    shell.status(
        Status::Building,
        format!(
            "{} {} [{}]",
            project.runtime_name(),
            config.build_type(),
            config.target_tuple()
        ),
    );

    let runner = SystemRunner::new();
    let revisions = GitRevisionProvider::new();
    let ctx = BuildContext::new(&config, &project, &runner, &revisions);

    let observer = |event: &PipelineEvent| report_event(shell, event);
    let start = Instant::now();
    let report = Pipeline::new(&ctx).with_observer(&observer).run()?;

    shell.status(
        Status::Finished,
        format!(
            "{} build of {} in {}",
            config.build_type(),
            config.target_tuple(),
            format_duration(start.elapsed())
        ),
    );
    Ok(report)
}

fn report_event(shell: &Shell, event: &PipelineEvent) {
    match event {
        PipelineEvent::StageStarted(stage) => {
            let status = match stage {
                Stage::StyleCheck | Stage::RunTests => Status::Running,
                Stage::SubmoduleSync => Status::Syncing,
                Stage::BuildAsyncIo | Stage::BuildVmCore | Stage::BuildRuntime => Status::Building,
            };
            shell.status(status, stage);
        }
        PipelineEvent::StageFinished(stage, StageOutcome::Skipped) => {
            shell.status(Status::Skipped, stage);
        }
        PipelineEvent::StageFinished(_, StageOutcome::Completed) => {}
        PipelineEvent::DependencyFinished(dep) => {
            let revision = dep.revision.get(..12).unwrap_or(&dep.revision);
            for target in &dep.fresh {
                shell.status(Status::Fresh, format!("{} {} ({})", dep.dependency, target, revision));
            }
            for target in &dep.built {
                shell.status(Status::Built, format!("{} {} ({})", dep.dependency, target, revision));
            }
        }
    }
}
