//! Running every model alone ("ideal" condition) through the external
//! launcher, and moving each run's output file into the results
//! directory.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{anyhow, bail, Context, Result};

use crate::{
    experiment_config::{ExperimentConfig, LauncherConfig, ModelSpec},
    info,
    io_utils::{
        bash::{bash_command_line, bash_string_literal},
        tempfile_utils::Tempfile,
    },
    results_layout::ResultsLayout,
    utillib::home::{path_list_resolve_home, path_resolve_home},
    warn,
};

/// A fully resolved launcher call for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct LauncherInvocation {
    pub program: PathBuf,
    pub arguments: Vec<String>,
    pub env: Vec<(String, String)>,
    pub working_dir: PathBuf,
}

impl LauncherInvocation {
    pub fn new(launcher: &LauncherConfig, model: &ModelSpec) -> Result<Self> {
        let LauncherConfig {
            program,
            arguments,
            algo,
            config_file_template: _,
            working_dir,
            output_file: _,
            env,
        } = launcher;
        let mut arguments = arguments.clone();
        arguments.extend([
            "--algo".into(),
            algo.clone(),
            "--config_file".into(),
            launcher.config_file_for(model),
        ]);
        let env: Vec<(String, String)> = env
            .iter()
            .map(|(name, val)| -> Result<_> {
                let val = path_list_resolve_home(val)
                    .with_context(|| anyhow!("resolving `~/` in env var {name}"))?;
                Ok((name.clone(), val))
            })
            .collect::<Result<_>>()?;
        Ok(Self {
            program: path_resolve_home(program)?,
            arguments,
            env,
            working_dir: path_resolve_home(working_dir)?,
        })
    }

    /// For logging and dry runs.
    pub fn bash_command_line(&self) -> String {
        bash_command_line(
            self.env.iter().map(|(n, v)| (n.as_str(), v.as_str())),
            &self.program.to_string_lossy(),
            &self.arguments,
        )
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.arguments)
            .envs(self.env.iter().map(|(n, v)| (n, v)))
            .current_dir(&self.working_dir);
        command
    }

    /// Where the launcher leaves its result.
    pub fn output_path(&self, launcher: &LauncherConfig) -> PathBuf {
        self.working_dir.join(&launcher.output_file)
    }

    /// Run to completion; a non-success exit status is an error.
    pub fn run(&self) -> Result<()> {
        let cmd = self.bash_command_line();
        info!("running {cmd:?} in directory {:?}", self.working_dir);
        let status = self
            .command()
            .status()
            .with_context(|| anyhow!("starting launcher {cmd:?}"))?;
        if status.success() {
            info!("running {cmd:?} succeeded");
            Ok(())
        } else {
            bail!("launcher {cmd:?} in directory {:?} failed: {status}", self.working_dir)
        }
    }
}

/// Move the launcher's output to `target`: copied into place via a
/// temporary file (the two may be on different file systems), then
/// `output` is removed.
pub fn move_output_file(output: &Path, target: &Path) -> Result<()> {
    if !output.exists() {
        bail!("the launcher did not produce its output file {output:?}")
    }
    let tempfile = Tempfile::new(target)?;
    std::fs::copy(output, &tempfile.temp_path)
        .with_context(|| anyhow!("copying {output:?} to {:?}", tempfile.temp_path))?;
    tempfile.finish()?;
    std::fs::remove_file(output).with_context(|| anyhow!("removing {output:?}"))?;
    info!("moved {output:?} to {target:?}");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DryRun {
    /// Only print what would be done
    Print,
    Execute,
}

/// One launcher run per model and run index, in config order.
pub fn run_ideal(config: &ExperimentConfig, layout: &ResultsLayout, dry_run: DryRun) -> Result<()> {
    let launcher = &config.launcher;
    let ideal_dir = layout.ideal_dir();
    if dry_run == DryRun::Execute {
        std::fs::create_dir_all(&ideal_dir)
            .with_context(|| anyhow!("creating directory {ideal_dir:?}"))?;
    }

    for model in &config.models {
        let invocation = LauncherInvocation::new(launcher, model)?;
        let output = invocation.output_path(launcher);
        for run in 0..config.num_runs {
            let target = layout.ideal_run_path(&model.name, run);
            match dry_run {
                DryRun::Print => {
                    let quote_path =
                        |p: &Path| bash_string_literal(&p.to_string_lossy()).into_owned();
                    println!(
                        "# {} run {run}\n(cd {} && {})\nmv {} {}",
                        model.name,
                        quote_path(&invocation.working_dir),
                        invocation.bash_command_line(),
                        quote_path(&output),
                        quote_path(&target),
                    );
                }
                DryRun::Execute => {
                    info!("model {} run {run}", model.name);
                    if output.exists() {
                        warn!("removing stale launcher output file {output:?}");
                        std::fs::remove_file(&output)
                            .with_context(|| anyhow!("removing {output:?}"))?;
                    }
                    invocation
                        .run()
                        .with_context(|| anyhow!("model {} run {run}", model.name))?;
                    move_output_file(&output, &target)?;
                }
            }
        }
    }
    Ok(())
}
