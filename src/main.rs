use anyhow::{Context, Result, bail};
use argh::FromArgs;
use log::debug;
use msh::{DEFAULT_PROMPT, Interpreter};
use signal_hook::consts::{SIGINT, SIGTSTP};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

#[derive(FromArgs)]
/// Interactive shell with history recall, redirection and single pipes.
struct Args {
    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    /// text written before every input line
    prompt: String,

    #[argh(option, default = "msh::history::DEFAULT_CAPACITY")]
    /// number of commands kept for `history` and `!N`
    history_size: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Args = argh::from_env();
    if args.history_size == 0 {
        bail!("--history-size must be at least 1");
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTSTP] {
        signal_hook::flag::register(signal, Arc::clone(&interrupted))
            .with_context(|| format!("can't install handler for signal {}", signal))?;
    }
    debug!("interrupt handlers installed");

    let mut shell = Interpreter::new(args.history_size)
        .with_prompt(args.prompt)
        .with_interrupt_flag(interrupted);
    shell.repl().context("terminal error")?;
    Ok(())
}
