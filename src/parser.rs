use crate::command::{CommandSpec, Pipeline};
use std::path::PathBuf;
use thiserror::Error;

/// Pipe operator.
pub const PIPE: &str = "|";
/// Output redirection operator.
pub const REDIRECT_OUT: &str = ">";
/// Input redirection operator.
pub const REDIRECT_IN: &str = "<";

/// Errors that can occur while turning tokens into a [`Pipeline`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParsingError {
    /// One side of `|` has no tokens at all (e.g. `| wc` or `ls |`).
    #[error("msh: missing command around '|'")]
    EmptyPipelineSide,
    /// `>` is the last token of its command.
    #[error("Error: No output file specified.")]
    MissingOutputFile,
    /// `<` is the last token of its command.
    #[error("Error: No input file specified.")]
    MissingInputFile,
    /// Only redirections were given, no program (e.g. `> out.txt`).
    #[error("msh: missing command")]
    MissingProgram,
}

struct CommandBuilder<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> CommandBuilder<'a> {
    fn from(tokens: &'a [String]) -> Self {
        CommandBuilder { tokens, pos: 0 }
    }

    fn consume(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token.as_str())
    }

    /// Parse a command: word (word | '>' path | '<' path)*
    fn build_command(mut self) -> Result<CommandSpec, ParsingError> {
        let mut argv = Vec::new();
        let mut output = None;
        let mut input = None;

        while let Some(token) = self.consume() {
            match token {
                REDIRECT_OUT => {
                    let path = self.consume().ok_or(ParsingError::MissingOutputFile)?;
                    output = Some(PathBuf::from(path));
                }
                REDIRECT_IN => {
                    let path = self.consume().ok_or(ParsingError::MissingInputFile)?;
                    input = Some(PathBuf::from(path));
                }
                word => argv.push(word.to_owned()),
            }
        }

        let mut argv = argv.into_iter();
        let program = argv.next().ok_or(ParsingError::MissingProgram)?;
        Ok(CommandSpec {
            program,
            args: argv.collect(),
            output,
            input,
        })
    }
}

/// Build a [`Pipeline`] from the tokens of one line.
///
/// Only the first `|` splits the line; later ones are ordinary words of the
/// right-hand command. Within each side the last `>` and the last `<` win,
/// and every operator is removed from argv together with its path.
pub fn construct_pipeline(tokens: &[String]) -> Result<Pipeline, ParsingError> {
    match tokens.iter().position(|t| t == PIPE) {
        None => Ok(Pipeline {
            left: CommandBuilder::from(tokens).build_command()?,
            right: None,
        }),
        Some(split) => {
            let (left, right) = (&tokens[..split], &tokens[split + 1..]);
            if left.is_empty() || right.is_empty() {
                return Err(ParsingError::EmptyPipelineSide);
            }
            Ok(Pipeline {
                left: CommandBuilder::from(left).build_command()?,
                right: Some(CommandBuilder::from(right).build_command()?),
            })
        }
    }
}
