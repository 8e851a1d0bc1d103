//! A small interactive Unix shell.
//!
//! A line is split into whitespace-separated words, `!N` references are
//! expanded from a bounded history, built-ins (`exit`, `quit`, `cd`,
//! `history`) run in-process, and anything else is started as an external
//! program with optional `<`/`>` redirections and at most one `|`.
//!
//! The main entry point is [`Interpreter`], which owns the session state and
//! runs either single lines ([`Interpreter::execute_line`]) or the
//! interactive loop ([`Interpreter::repl`]).

mod builtin;
pub mod command;
pub mod env;
pub mod error;
mod executor;
mod external;
pub mod history;
mod interpreter;
pub mod parser;
pub mod recall;
pub mod tokenizer;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::{DEFAULT_PROMPT, Interpreter};
pub use error::ShellError;
pub use executor::Executor;
