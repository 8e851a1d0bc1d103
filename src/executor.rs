//! Launching of one or two external programs for a parsed [`Pipeline`].
//!
//! The shell blocks until every started child has exited. Failures that
//! concern a single stage (missing program, unreadable input file, spawn
//! error) are written to the diagnostics stream and turn into a failure
//! status for that stage; the other stage of a pipe still runs.

use crate::command::{COMMAND_NOT_FOUND, CommandSpec, ExitCode, FAILURE, Pipeline};
use crate::env::Environment;
use crate::error::ShellError;
use crate::external::{ExternalCommand, exit_code};
use log::{debug, warn};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::process::{Child, Stdio};

/// Runs pipelines in the working directory and environment of a session.
pub struct Executor<'a> {
    env: &'a Environment,
    diagnostics: &'a mut dyn Write,
}

/// A stage that was either started or reported as failed.
enum Stage {
    Running(Child),
    Failed(ExitCode),
}

impl<'a> Executor<'a> {
    pub fn new(env: &'a Environment, diagnostics: &'a mut dyn Write) -> Self {
        Self { env, diagnostics }
    }

    /// Run `pipeline` to completion and return the status of its last stage.
    pub fn run(&mut self, pipeline: &Pipeline) -> ExitCode {
        match &pipeline.right {
            None => {
                let stage = self.launch(&pipeline.left, Stdio::inherit(), Stdio::inherit());
                self.wait(&pipeline.left, stage)
            }
            Some(right) => self.run_pipe(&pipeline.left, right),
        }
    }

    fn run_pipe(&mut self, left: &CommandSpec, right: &CommandSpec) -> ExitCode {
        let mut left_stage = self.launch(left, Stdio::inherit(), Stdio::piped());

        // The read end moves into the right child's Command and is closed in
        // the parent once that child is spawned. The write end only ever
        // lives in the left child.
        let channel = match &mut left_stage {
            Stage::Running(child) => child.stdout.take().map(Stdio::from),
            Stage::Failed(_) => None,
        };
        let right_stage = self.launch(right, channel.unwrap_or_else(Stdio::null), Stdio::inherit());

        let left_code = self.wait(left, left_stage);
        let right_code = self.wait(right, right_stage);
        debug!("pipeline finished: left={} right={}", left_code, right_code);
        right_code
    }

    /// Wire redirections over the given defaults and start the program.
    fn launch(&mut self, spec: &CommandSpec, stdin: Stdio, stdout: Stdio) -> Stage {
        match self.try_launch(spec, stdin, stdout) {
            Ok(child) => Stage::Running(child),
            Err(err) => {
                let code = if matches!(err, ShellError::CommandNotFound(_)) {
                    COMMAND_NOT_FOUND
                } else {
                    FAILURE
                };
                self.report(&err);
                Stage::Failed(code)
            }
        }
    }

    fn try_launch(
        &self,
        spec: &CommandSpec,
        mut stdin: Stdio,
        mut stdout: Stdio,
    ) -> Result<Child, ShellError> {
        if let Some(path) = &spec.output {
            stdout = self.open_output(path)?.into();
        }
        if let Some(path) = &spec.input {
            stdin = self.open_input(path)?.into();
        }
        ExternalCommand::resolve(spec, self.env)?.spawn(stdin, stdout, self.env)
    }

    fn open_output(&self, path: &Path) -> Result<File, ShellError> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        options
            .open(self.env.resolve_path(path))
            .map_err(|source| ShellError::Redirect {
                path: path.to_path_buf(),
                source,
            })
    }

    fn open_input(&self, path: &Path) -> Result<File, ShellError> {
        File::open(self.env.resolve_path(path)).map_err(|source| ShellError::Redirect {
            path: path.to_path_buf(),
            source,
        })
    }

    fn wait(&mut self, spec: &CommandSpec, stage: Stage) -> ExitCode {
        match stage {
            Stage::Failed(code) => code,
            Stage::Running(mut child) => match child.wait() {
                Ok(status) => {
                    let code = exit_code(status);
                    debug!("{} (pid {}) exited with {}", spec.program, child.id(), code);
                    code
                }
                Err(e) => {
                    self.report(&ShellError::Io(e));
                    FAILURE
                }
            },
        }
    }

    fn report(&mut self, err: &ShellError) {
        debug!("stage failed: {:?}", err);
        if let Err(e) = writeln!(self.diagnostics, "{}", err) {
            warn!("could not report error: {}", e);
        }
    }
}
