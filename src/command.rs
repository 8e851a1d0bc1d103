use std::path::PathBuf;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// Statuses are collected from children but never shown to the user.
pub type ExitCode = i32;

/// Status of a command that could not be started for a reason other than
/// a missing program, e.g. an input file that does not exist.
pub const FAILURE: ExitCode = 1;

/// Status of a command whose program was not found.
pub const COMMAND_NOT_FOUND: ExitCode = 127;

/// One program invocation with its redirections already pulled out of argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Name or path of the program, `argv[0]`.
    pub program: String,
    /// Arguments following the program name.
    pub args: Vec<String>,
    /// Target of `>`: created if missing, truncated otherwise.
    pub output: Option<PathBuf>,
    /// Source of `<`: must already exist.
    pub input: Option<PathBuf>,
}

impl CommandSpec {
    /// A command without redirections.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            output: None,
            input: None,
        }
    }
}

/// A command line of one or two stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    /// The only command, or the stdout-producing side of `|`.
    pub left: CommandSpec,
    /// The stdout-consuming side of `|`.
    pub right: Option<CommandSpec>,
}
