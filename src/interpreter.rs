use crate::builtin::{BuiltinFactory, Session, default_builtins};
use crate::command::ExitCode;
use crate::env::Environment;
use crate::error::ShellError;
use crate::executor::Executor;
use crate::history::{DEFAULT_CAPACITY, History};
use crate::parser::construct_pipeline;
use crate::recall;
use crate::tokenizer::{bound_line, split_into_tokens};
use log::{debug, trace};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Prompt written before every read.
pub const DEFAULT_PROMPT: &str = "msh> ";

/// An interactive shell session.
///
/// Owns the [`Environment`], the command [`History`] and the set of
/// built-ins. Each line goes through recall expansion, is recorded in the
/// history, and is then either handled by a built-in or run as a pipeline of
/// external programs.
///
/// Example
/// ```
/// use msh::Interpreter;
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// sh.execute_line("history", &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "[1] history\n");
/// ```
pub struct Interpreter {
    env: Environment,
    history: History,
    builtins: Vec<Box<dyn BuiltinFactory>>,
    prompt: String,
    interrupted: Option<Arc<AtomicBool>>,
}

impl Interpreter {
    /// Create a session remembering at most `history_capacity` lines.
    pub fn new(history_capacity: usize) -> Self {
        Self {
            env: Environment::new(),
            history: History::with_capacity(history_capacity),
            builtins: default_builtins(),
            prompt: DEFAULT_PROMPT.to_string(),
            interrupted: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Flag raised asynchronously on an interrupt; checked between reads.
    pub fn with_interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(flag);
        self
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Set once `exit` or `quit` has run.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Interpret one input line.
    ///
    /// Returns `Ok(None)` for a blank line, which is neither recorded nor
    /// run. Messages for the user (recall echo, built-in output, launch
    /// failures) are written to `out`; output of external programs goes to
    /// the inherited streams unless redirected.
    pub fn execute_line(
        &mut self,
        line: &str,
        out: &mut dyn Write,
    ) -> std::result::Result<Option<ExitCode>, ShellError> {
        let mut tokens = split_into_tokens(line);
        trace!("tokens: {:?}", tokens);
        let Some(first) = tokens.first() else {
            return Ok(None);
        };

        let line = if recall::is_recall(first) {
            let resolved = recall::resolve(&self.history, first)?;
            writeln!(out, "Re-running command: {}", resolved)?;
            tokens = split_into_tokens(&resolved);
            resolved
        } else {
            line.to_owned()
        };
        self.history.push(&line);

        self.dispatch(&tokens, out).map(Some)
    }

    /// Run `line` and print any error instead of returning it.
    pub fn handle_line(&mut self, line: &str, out: &mut dyn Write) -> std::io::Result<()> {
        if let Err(err) = self.execute_line(line, out) {
            debug!("line {:?} failed: {:?}", line, err);
            writeln!(out, "{}", err)?;
        }
        out.flush()
    }

    fn dispatch(
        &mut self,
        tokens: &[String],
        out: &mut dyn Write,
    ) -> std::result::Result<ExitCode, ShellError> {
        let Some((name, args)) = tokens.split_first() else {
            return Ok(0);
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        if let Some(cmd) = self.builtins.iter().find_map(|f| f.try_create(name, &args)) {
            debug!("running builtin {}", name);
            let mut session = Session {
                env: &mut self.env,
                history: &self.history,
            };
            return Ok(cmd.execute(out, &mut session)?);
        }

        let pipeline = construct_pipeline(tokens)?;
        out.flush()?;
        Ok(Executor::new(&self.env, out).run(&pipeline))
    }

    /// Read-eval loop on the terminal. Returns on `exit`, `quit` or end of input.
    ///
    /// An interrupt that arrives while a child runs is noticed once the child
    /// has been waited for, and the next prompt starts on a fresh line. When
    /// stdin is not a terminal the line editor cannot see Ctrl-C, so an
    /// interrupt during a read is only noticed after that read returns.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        let mut stdout = std::io::stdout();

        while !self.env.should_exit {
            if self.take_interrupt() {
                writeln!(stdout)?;
            }
            match rl.readline(&self.prompt) {
                Ok(line) => {
                    let line = bound_line(&line);
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line)?;
                    }
                    self.handle_line(line, &mut stdout)?;
                }
                Err(ReadlineError::Interrupted) => {
                    debug!("interrupted while reading");
                    self.take_interrupt();
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }

    fn take_interrupt(&self) -> bool {
        let raised = self
            .interrupted
            .as_ref()
            .is_some_and(|flag| flag.swap(false, Ordering::SeqCst));
        if raised {
            debug!("interrupt notification received");
        }
        raised
    }
}

impl Default for Interpreter {
    /// A session with the standard history size and prompt.
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
