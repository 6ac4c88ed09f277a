use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use ffgen_core::PickItem;
use log::{debug, trace, warn};
use std::{
    cell::RefCell,
    fs,
    io::{BufRead, Write},
    path::PathBuf,
};

use crate::controller::{CommandSink, Delivery, Picker, Prompt};

/// Takes every offered file and the command unedited (`--yes`).
pub struct AcceptAll;

impl Picker for AcceptAll {
    fn pick(&mut self, items: &[PickItem]) -> Result<Option<Vec<PathBuf>>> {
        Ok(Some(items.iter().map(|i| i.path.clone()).collect()))
    }
}

impl Prompt for AcceptAll {
    fn edit(&mut self, command: &str) -> Result<Option<String>> {
        Ok(Some(command.to_string()))
    }
}

/// Numbered multi-select read from a line of input.
///
/// Interaction goes to `output` (stderr in the binary) so stdout only ever
/// carries the final command. The input is shared with [`TerminalPrompt`],
/// stdin can only be locked once.
pub struct TerminalPicker<'a, R, W> {
    input: &'a RefCell<R>,
    output: W,
}

impl<'a, R: BufRead, W: Write> TerminalPicker<'a, R, W> {
    pub fn new(input: &'a RefCell<R>, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Picker for TerminalPicker<'_, R, W> {
    fn pick(&mut self, items: &[PickItem]) -> Result<Option<Vec<PathBuf>>> {
        writeln!(self.output, "{}", "Select files to include in the ffg command:".bold())?;
        for (idx, item) in items.iter().enumerate() {
            writeln!(
                self.output,
                "{:>4}  {}  {}",
                (idx + 1).to_string().cyan(),
                item.label.bright_white().bold(),
                item.description.dimmed()
            )?;
            if let Some(detail) = &item.detail {
                writeln!(self.output, "      {}", detail.blue())?;
            }
        }

        loop {
            write!(self.output, "Files [Enter = all, e.g. 1,3-5, q = cancel]: ")?;
            self.output.flush()?;

            let Some(line) = read_line(self.input)? else {
                debug!("Input closed during file selection");
                return Ok(None);
            };
            match parse_selection(&line, items.len()) {
                Ok(Selection::Cancel) => return Ok(None),
                Ok(Selection::Indices(indices)) => {
                    trace!("Selected indices {:?}", indices);
                    return Ok(Some(indices.into_iter().map(|i| items[i].path.clone()).collect()));
                }
                Err(e) => writeln!(self.output, "{} {}", "✗".red(), e)?,
            }
        }
    }
}

/// Shows the command and reads an optional replacement.
pub struct TerminalPrompt<'a, R, W> {
    input: &'a RefCell<R>,
    output: W,
}

impl<'a, R: BufRead, W: Write> TerminalPrompt<'a, R, W> {
    pub fn new(input: &'a RefCell<R>, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<'_, R, W> {
    fn edit(&mut self, command: &str) -> Result<Option<String>> {
        writeln!(self.output, "\n{}", "Copy this File Forge command to analyze open files".bold())?;
        writeln!(self.output, "{}", command.cyan())?;
        write!(self.output, "[Enter = accept, type a replacement, q = cancel]: ")?;
        self.output.flush()?;

        Ok(match read_line(self.input)? {
            None => None,
            Some(line) if line == "q" => None,
            Some(line) if line.is_empty() => Some(command.to_string()),
            Some(line) => Some(line),
        })
    }
}

/// Hands the accepted command over: to the system clipboard when `copy` is
/// set, printed to `output` otherwise or when no clipboard is available.
/// Optionally also saves it to a file.
pub struct OutputSink<W> {
    output: W,
    write_to: Option<PathBuf>,
    copy: bool,
}

impl<W: Write> OutputSink<W> {
    pub fn new(output: W, write_to: Option<PathBuf>, copy: bool) -> Self {
        Self { output, write_to, copy }
    }

    fn print(&mut self, command: &str) -> Result<Delivery> {
        writeln!(self.output, "{}", command)?;
        self.output.flush()?;
        Ok(Delivery::Printed)
    }
}

impl<W: Write> CommandSink for OutputSink<W> {
    fn deliver(&mut self, command: &str) -> Result<Delivery> {
        let delivery = if self.copy {
            match copy_to_clipboard(command) {
                Ok(()) => Delivery::Clipboard,
                Err(e) => {
                    warn!("Clipboard unavailable, printing instead: {:#}", e);
                    self.print(command)?
                }
            }
        } else {
            self.print(command)?
        };

        if let Some(path) = &self.write_to {
            fs::write(path, format!("{}\n", command))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            debug!("Wrote command to {}", path.display());
        }
        Ok(delivery)
    }
}

fn copy_to_clipboard(command: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("clipboard init")?;
    clipboard.set_text(command.to_string()).context("clipboard set")?;
    Ok(())
}

/// Trimmed line, or `None` at end of input.
fn read_line<R: BufRead>(input: &RefCell<R>) -> Result<Option<String>> {
    let mut line = String::new();
    if input.borrow_mut().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[derive(Debug, PartialEq, Eq)]
enum Selection {
    Cancel,
    /// Zero-based, ascending, deduplicated
    Indices(Vec<usize>),
}

/// Parses `""`/`all`, `q`, or a list of 1-based numbers and ranges separated
/// by commas or spaces.
fn parse_selection(line: &str, count: usize) -> Result<Selection> {
    let line = line.trim();
    match line {
        "" | "all" | "a" => return Ok(Selection::Indices((0..count).collect())),
        "q" | "quit" | "n" => return Ok(Selection::Cancel),
        _ => {}
    }

    let mut indices: Vec<usize> = Vec::new();
    for token in line.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty()) {
        let (start, end) = match token.split_once('-') {
            Some((a, b)) => (parse_index(a, count)?, parse_index(b, count)?),
            None => {
                let i = parse_index(token, count)?;
                (i, i)
            }
        };
        if start > end {
            return Err(anyhow!("Range '{}' is backwards", token));
        }
        indices.extend(start..=end);
    }

    indices.sort_unstable();
    indices.dedup();
    Ok(Selection::Indices(indices))
}

fn parse_index(token: &str, count: usize) -> Result<usize> {
    let n: usize = token.trim().parse().map_err(|_| anyhow!("'{}' is not a number", token))?;
    if n == 0 || n > count {
        return Err(anyhow!("{} is out of range 1-{}", n, count));
    }
    Ok(n - 1)
}
