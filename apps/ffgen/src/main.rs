use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use log::{debug, info};
use std::cell::RefCell;
use std::io::{self, BufWriter, Write};
use std::time::Instant;

mod config;
mod controller;
mod terminal;

use config::Config;
use controller::Outcome;
use terminal::{AcceptAll, OutputSink, TerminalPicker, TerminalPrompt};

fn main() -> Result<()> {
    env_logger::init();

    let mut cfg = Config::parse();
    debug!("Parsed CLI arguments: {:?}", cfg);
    cfg.initialize()?;

    let start = Instant::now();
    info!("Resolving imports using {} threads", rayon::current_num_threads());

    if cfg.json {
        let result = controller::collect(&cfg, &cfg.seeds())?;
        let mut stdout = BufWriter::new(io::stdout());
        serde_json::to_writer_pretty(&mut stdout, &result)?;
        writeln!(stdout)?;
        stdout.flush()?;
        return Ok(());
    }

    let mut sink = OutputSink::new(io::stdout(), cfg.write_to.clone(), cfg.copy);
    let outcome = if cfg.yes {
        controller::generate(&cfg, &mut AcceptAll, &mut AcceptAll, &mut sink)
    } else {
        let input = RefCell::new(io::stdin().lock());
        let mut picker = TerminalPicker::new(&input, io::stderr());
        let mut prompt = TerminalPrompt::new(&input, io::stderr());
        controller::generate(&cfg, &mut picker, &mut prompt, &mut sink)
    };

    let code = finish(&outcome, start.elapsed().as_millis());
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}

/// Logs the run time, prints the outcome and returns the process exit code.
fn finish(outcome: &Outcome, elapsed_ms: u128) -> i32 {
    debug!("Finished in {}ms", elapsed_ms);

    let message = outcome.message();
    match outcome {
        Outcome::Delivered(_) | Outcome::Copied(_) => {
            eprintln!("{} {}", "✓".green().bold(), message);
            0
        }
        Outcome::NoFiles | Outcome::Cancelled => {
            eprintln!("{} {}", "●".bright_blue(), message);
            0
        }
        Outcome::Failed(_) => {
            eprintln!("{} {}", "✗".red().bold(), message.red());
            1
        }
    }
}
