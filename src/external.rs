use crate::command::{CommandSpec, ExitCode};
use crate::env::Environment;
use crate::error::ShellError;
use log::debug;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus, Stdio};

/// A program located on disk, ready to be started with its arguments.
pub struct ExternalCommand<'a> {
    path: PathBuf,
    spec: &'a CommandSpec,
}

impl<'a> ExternalCommand<'a> {
    /// Locate the program of `spec` using the session's `PATH` and working
    /// directory.
    pub fn resolve(spec: &'a CommandSpec, env: &Environment) -> Result<Self, ShellError> {
        let search_paths = env.get_var("PATH").unwrap_or_default();
        let path = find_command_path(
            OsStr::new(&search_paths),
            Path::new(&spec.program),
            &env.current_dir,
        )
        .ok_or_else(|| ShellError::CommandNotFound(spec.program.clone()))?
        .into_owned();
        debug!("{} resolved to {}", spec.program, path.display());
        Ok(Self { path, spec })
    }

    /// Start the program with the given standard streams.
    ///
    /// `argv[0]` stays the name the user typed. The call does not wait.
    pub fn spawn(self, stdin: Stdio, stdout: Stdio, env: &Environment) -> Result<Child, ShellError> {
        let mut cmd = std::process::Command::new(&self.path);
        cmd.args(&self.spec.args)
            .stdin(stdin)
            .stdout(stdout)
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&env.current_dir);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(&self.spec.program);
        }
        let child = cmd.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                ShellError::CommandNotFound(self.spec.program.clone())
            }
            _ => ShellError::Spawn(e),
        })?;
        debug!("spawned {} as pid {}", self.spec.program, child.id());
        Ok(child)
    }
}

/// Convert a collected child status into a shell exit code.
pub fn exit_code(exit_status: ExitStatus) -> ExitCode {
    match exit_status.code() {
        Some(x) => x,
        None => terminated_by_signal(exit_status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a command path the way a typical shell would.
///
/// - Absolute path: used as is.
/// - Relative path with a separator (`bin/tool`, `./tool`): looked up under `cwd`.
/// - Bare name: first executable match in the directories of `search_paths`.
/// - Empty path: nothing.
///
/// Only executable regular files match.
pub fn find_command_path<'a>(
    search_paths: &OsStr,
    path: &'a Path,
    cwd: &Path,
) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return is_executable(path).then_some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(std::path::Component::Normal(name)), None) => {
            find_in_path(search_paths, name).map(Cow::Owned)
        }
        _ => {
            let candidate = cwd.join(path);
            is_executable(&candidate).then_some(Cow::Owned(candidate))
        }
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
