use crate::command::ExitCode;
use crate::env::Environment;
use crate::history::History;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// State a built-in may inspect or change.
pub(crate) struct Session<'a> {
    pub env: &'a mut Environment,
    pub history: &'a History,
}

/// Commands executed inside the shell process itself.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and never spawn
/// a child process. Their arguments are plain words, never options.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Exact, case-sensitive name the command is invoked by.
    fn name() -> &'static str;

    /// Return value follows shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, session: &mut Session<'_>) -> Result<ExitCode>;
}

/// Object-safe handle on a parsed built-in.
pub(crate) trait ExecutableBuiltin {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, session: &mut Session<'_>)
        -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableBuiltin for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        session: &mut Session<'_>,
    ) -> Result<ExitCode> {
        match <T as BuiltinCommand>::execute(*self, stdout, session) {
            Ok(x) => Ok(x),
            Err(e) => {
                writeln!(stdout, "{:#}", e)?;
                Ok(1)
            }
        }
    }
}

/// Help text or a usage error produced by `argh` instead of a command.
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableBuiltin for InvalidArgs {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        _session: &mut Session<'_>,
    ) -> Result<ExitCode> {
        writeln!(stdout, "{}", self.output.trim_end())?;
        Ok(if self.is_error { 1 } else { 0 })
    }
}

/// Recognizes one built-in by name.
pub(crate) trait BuiltinFactory {
    /// Returns `None` when `name` is not this factory's command.
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableBuiltin>>;
}

/// Factory for the built-in `T`.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T: BuiltinCommand + 'static> BuiltinFactory for Factory<T> {
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableBuiltin>> {
        if name != T::name() {
            return None;
        }
        // Built-ins take no flags: `--` makes argh treat every word,
        // including `help` and `-x`, as a positional.
        let mut words = Vec::with_capacity(args.len() + 1);
        words.push("--");
        words.extend_from_slice(args);
        Some(match T::from_args(&[name], &words) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                output,
                is_error: status.is_err(),
            }),
        })
    }
}

/// The built-ins every session knows about.
pub(crate) fn default_builtins() -> Vec<Box<dyn BuiltinFactory>> {
    vec![
        Box::new(Factory::<Exit>::default()),
        Box::new(Factory::<Quit>::default()),
        Box::new(Factory::<Cd>::default()),
        Box::new(Factory::<HistoryCmd>::default()),
    ]
}

#[derive(FromArgs)]
/// Exit the shell.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, session: &mut Session<'_>) -> Result<ExitCode> {
        session.env.should_exit = true;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Exit the shell.
pub struct Quit {
    #[argh(positional, greedy)]
    /// ignored
    pub _args: Vec<String>,
}

impl BuiltinCommand for Quit {
    fn name() -> &'static str {
        "quit"
    }

    fn execute(self, _stdout: &mut dyn Write, session: &mut Session<'_>) -> Result<ExitCode> {
        session.env.should_exit = true;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// If no target is provided, changes to the directory specified by the HOME environment variable.
pub struct Cd {
    #[argh(positional, greedy)]
    /// directory to switch to; only the first one is used. Defaults to $HOME when omitted.
    pub args: Vec<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write, session: &mut Session<'_>) -> Result<ExitCode> {
        let env = &mut *session.env;
        let target = match self.args.first() {
            Some(t) if !t.is_empty() => PathBuf::from(t),
            _ => env
                .home_dir()
                .ok_or_else(|| anyhow::anyhow!("cd: no target and HOME not set"))?,
        };

        let new_dir = env.resolve_path(&target);
        let canonical = fs::canonicalize(&new_dir)
            .with_context(|| format!("cd: {}", target.display()))?;

        env::set_current_dir(&canonical)
            .with_context(|| format!("cd: can't chdir to {}", canonical.display()))?;
        env.current_dir = canonical;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// List remembered commands, most recent first.
pub struct HistoryCmd {
    #[argh(positional, greedy)]
    /// ignored
    pub _args: Vec<String>,
}

impl BuiltinCommand for HistoryCmd {
    fn name() -> &'static str {
        "history"
    }

    fn execute(self, stdout: &mut dyn Write, session: &mut Session<'_>) -> Result<ExitCode> {
        for (index, line) in session.history.print() {
            writeln!(stdout, "[{}] {}", index, line)?;
        }
        Ok(0)
    }
}
