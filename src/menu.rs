//! The interactive menu: a read–dispatch–report loop over any line reader
//! and writer.
//!
//! ```text
//!            ┌──────────── 1–4: run operation ───────────┐
//!            ▼                                            │
//!   ── AwaitingChoice ── other input: "Invalid choice" ───┤
//!            │                                            │
//!            └── 5 / end of input ──▶ exit                │
//!                                                         │
//!   operation: source? ─ missing ─▶ "File not found" ─────┤
//!                 │                                       │
//!                 └─▶ destination? ─▶ execute ─▶ report ──┘
//! ```
//!
//! No operation failure ends the loop; only `5` or end of input does.

use crate::config::ConverterConfig;
use crate::convert;
use crate::format::FilePath;
use crate::pipeline::input;
use crate::request::{ConversionRequest, OperationKind};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

/// A parsed menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Convert(OperationKind),
    Exit,
}

impl MenuChoice {
    /// Parse one line of input. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Convert(OperationKind::PdfToDocx)),
            "2" => Some(MenuChoice::Convert(OperationKind::DocxToPdf)),
            "3" => Some(MenuChoice::Convert(OperationKind::ExtractImages)),
            "4" => Some(MenuChoice::Convert(OperationKind::JpegToJpg)),
            "5" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuSummary {
    /// Operations that were executed, successfully or not.
    pub operations_run: usize,
    pub failures: usize,
    pub invalid_choices: usize,
}

/// The menu controller.
pub struct Menu<R, W> {
    input: R,
    output: W,
    config: ConverterConfig,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, config: ConverterConfig) -> Self {
        Self {
            input,
            output,
            config,
        }
    }

    /// Run until `5` or end of input.
    ///
    /// # Errors
    /// Only I/O failures on the menu's own reader or writer.
    pub fn run(mut self) -> io::Result<MenuSummary> {
        let mut summary = MenuSummary::default();

        loop {
            self.print_menu()?;
            let choice = match self.prompt("Enter your choice (1-5): ")? {
                None => MenuChoice::Exit,
                Some(line) => match MenuChoice::parse(&line) {
                    Some(choice) => choice,
                    None => {
                        warn!("Invalid menu choice: {:?}", line.trim());
                        writeln!(self.output, "Invalid choice! Please try again.")?;
                        summary.invalid_choices += 1;
                        continue;
                    }
                },
            };

            match choice {
                MenuChoice::Exit => {
                    writeln!(self.output, "Exiting the tool. Goodbye!")?;
                    break;
                }
                MenuChoice::Convert(kind) => self.run_operation(kind, &mut summary)?,
            }
        }

        info!(
            "Session finished: {} operation(s), {} failed, {} invalid choice(s)",
            summary.operations_run, summary.failures, summary.invalid_choices
        );
        Ok(summary)
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nSelect an option:")?;
        for (i, kind) in OperationKind::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, kind.label())?;
        }
        writeln!(self.output, "{}. Exit", OperationKind::ALL.len() + 1)
    }

    /// Print `text` and read one line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn run_operation(&mut self, kind: OperationKind, summary: &mut MenuSummary) -> io::Result<()> {
        let Some(raw_source) = self.prompt(kind.source_prompt())? else {
            return Ok(());
        };
        let source = FilePath::from_input(&raw_source);
        if !input::source_exists(source.path()) {
            warn!("Source not found: {}", source);
            writeln!(self.output, "File not found! Please check the path.")?;
            return Ok(());
        }

        let Some(raw_destination) = self.prompt(kind.destination_prompt())? else {
            return Ok(());
        };
        let destination = FilePath::from_input(&raw_destination);

        let request = ConversionRequest::new(kind, source, destination);
        let result = convert::execute(&request, &self.config);
        summary.operations_run += 1;

        match &result.error {
            None => {
                for e in &result.sanitize_errors {
                    writeln!(self.output, "Error removing metadata: {e}")?;
                }
                writeln!(self.output, "{}", kind.success_message(&request.destination))?;
            }
            Some(e) => {
                summary.failures += 1;
                writeln!(self.output, "{}: {}", kind.failure_prefix(), e)?;
            }
        }
        Ok(())
    }
}
