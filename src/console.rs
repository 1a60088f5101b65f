use crossterm::style::Stylize;
use std::fmt::Display;
use std::io::{IsTerminal, Stdout, Write};

use crate::error::RunlogError;
use crate::utils::get_color;

/// Operator-facing output. Diagnostics go through `tracing` instead.
pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl Console<Stdout> {
    pub fn stdout() -> Self {
        let out = std::io::stdout();
        let color = out.is_terminal();
        Console { out, color }
    }
}

impl<W: Write> Console<W> {
    #[cfg(test)]
    pub fn plain(out: W) -> Self {
        Console { out, color: false }
    }

    /// Writes one line and flushes so streamed output shows up immediately.
    pub fn line(&mut self, msg: impl Display) -> Result<(), RunlogError> {
        writeln!(self.out, "{}", msg).map_err(RunlogError::Output)?;
        self.out.flush().map_err(RunlogError::Output)
    }

    /// Pod name, colored consistently per pod on a terminal.
    pub fn pod(&self, name: &str) -> String {
        if self.color {
            name.to_string().with(get_color(name)).to_string()
        } else {
            name.to_string()
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
