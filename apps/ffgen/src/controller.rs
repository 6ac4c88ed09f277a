//! The command generation flow: seeds -> walk -> picker -> command -> prompt -> sink.
//!
//! The interactive steps are traits so the flow can be driven from a terminal,
//! non-interactively, or from tests.

use anyhow::Result;
use ffgen_core::{
    PickItem, Resolver, WalkResult, build_command, load_alias_table, pick_items, sort_for_display,
    walk,
};
use log::{debug, error, info, warn};
use std::path::PathBuf;

use crate::config::Config;

pub const NO_OPEN_FILES: &str = "No files are currently open.";
pub const CANCELLED: &str = "Command generation cancelled.";
pub const GENERATED: &str = "File Forge command generated!";
pub const COPIED: &str = "File Forge command generated and copied to clipboard!";

/// Multi-select over the discovered files.
pub trait Picker {
    /// The chosen paths, or `None` when the user declines the whole operation.
    fn pick(&mut self, items: &[PickItem]) -> Result<Option<Vec<PathBuf>>>;
}

/// Lets the user review and edit the generated command.
pub trait Prompt {
    fn edit(&mut self, command: &str) -> Result<Option<String>>;
}

/// How a sink handed the command over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Printed,
    Clipboard,
}

/// Where the accepted command ends up.
pub trait CommandSink {
    fn deliver(&mut self, command: &str) -> Result<Delivery>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NoFiles,
    Cancelled,
    Delivered(String),
    Copied(String),
    Failed(String),
}

impl Outcome {
    pub fn message(&self) -> String {
        match self {
            Outcome::NoFiles => NO_OPEN_FILES.to_string(),
            Outcome::Cancelled => CANCELLED.to_string(),
            Outcome::Delivered(_) => GENERATED.to_string(),
            Outcome::Copied(_) => COPIED.to_string(),
            Outcome::Failed(e) => format!("Error generating command: {}", e),
        }
    }
}

/// Runs the whole flow. Failures are reported as [`Outcome::Failed`], never
/// propagated.
pub fn generate(
    cfg: &Config,
    picker: &mut dyn Picker,
    prompt: &mut dyn Prompt,
    sink: &mut dyn CommandSink,
) -> Outcome {
    match run(cfg, picker, prompt, sink) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Error in generate: {:#}", e);
            Outcome::Failed(format!("{:#}", e))
        }
    }
}

fn run(
    cfg: &Config,
    picker: &mut dyn Picker,
    prompt: &mut dyn Prompt,
    sink: &mut dyn CommandSink,
) -> Result<Outcome> {
    let seeds = cfg.seeds();
    if seeds.is_empty() {
        info!("No seed files given");
        return Ok(Outcome::NoFiles);
    }

    let result = collect(cfg, &seeds)?;

    let selection = if result.files.is_empty() {
        debug!("Nothing to pick from");
        Vec::new()
    } else {
        let items = pick_items(&result, cfg.root()?, cfg.relative_paths);
        match picker.pick(&items)? {
            Some(chosen) => {
                // Only paths that were offered, in display order
                let mut selection: Vec<PathBuf> =
                    chosen.into_iter().filter(|p| result.files.contains(p)).collect();
                sort_for_display(&mut selection);
                selection.dedup();
                selection
            }
            None => {
                info!("File selection cancelled");
                return Ok(Outcome::Cancelled);
            }
        }
    };
    debug!("Selected {} files", selection.len());

    let command = build_command(&selection);
    match prompt.edit(&command)? {
        Some(accepted) => {
            let delivery = sink.deliver(&accepted)?;
            info!("Command delivered ({:?})", delivery);
            Ok(match delivery {
                Delivery::Printed => Outcome::Delivered(accepted),
                Delivery::Clipboard => Outcome::Copied(accepted),
            })
        }
        None => {
            info!("Command prompt cancelled");
            Ok(Outcome::Cancelled)
        }
    }
}

/// Walks the imports of `seeds` and drops excluded dependencies from the
/// result. Seeds are always kept. The alias table is reloaded on every call.
pub fn collect(cfg: &Config, seeds: &[PathBuf]) -> Result<WalkResult> {
    let root = cfg.root()?;
    let filter = cfg.filter()?;

    let resolver = Resolver::new(load_alias_table(root), cfg.alias_mode());
    debug!("Resolver has {} path aliases", resolver.aliases.len());

    let mut result = walk(seeds, &resolver);
    for (file, reason) in &result.errors {
        warn!("Skipping {}: {}", file.display(), reason);
    }

    result.files.retain(|f| seeds.contains(f) || filter.matches(f));
    let files = &result.files;
    result.provenance.retain(|f, _| files.contains(f));
    info!("{} files available for selection", result.files.len());
    Ok(result)
}
