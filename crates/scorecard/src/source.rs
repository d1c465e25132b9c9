//! Where search criteria come from
//!
//! The console prompts, the `search` flags and the web form all end up as a
//! [`SearchCriteria`]; normalization (trim, case, default school) lives in the
//! core so every source behaves the same.

use crate::prelude::*;
use scorecard_core::query::SearchCriteria;
use std::io::{BufRead, Write};

pub const STATE_PROMPT: &str = "Enter 2-letter state code (default WA): ";
pub const SCHOOL_PROMPT: &str = "Enter school name (leave blank for all schools in state): ";
pub const PROGRAM_PROMPT: &str =
    "Enter program title to search (leave blank for all programs): ";

pub trait CriteriaSource {
    fn criteria(&mut self) -> Result<SearchCriteria>;
}

/// Interactive prompts, one line of input per field
pub struct Prompts<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompts<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        // EOF reads as an empty answer
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        Ok(line)
    }
}

impl<R: BufRead, W: Write> CriteriaSource for Prompts<R, W> {
    fn criteria(&mut self) -> Result<SearchCriteria> {
        let state = self.ask(STATE_PROMPT)?;
        let school = self.ask(SCHOOL_PROMPT)?;
        let program = self.ask(PROGRAM_PROMPT)?;

        Ok(SearchCriteria::new(
            Some(state.as_str()),
            Some(school.as_str()),
            Some(program.as_str()),
        ))
    }
}

/// Criteria given up front on the command line
#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub state: Option<String>,
    pub school: Option<String>,
    pub program: Option<String>,
}

impl Flags {
    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.school.is_none() && self.program.is_none()
    }
}

impl CriteriaSource for Flags {
    fn criteria(&mut self) -> Result<SearchCriteria> {
        Ok(SearchCriteria::new(
            self.state.as_deref(),
            self.school.as_deref(),
            self.program.as_deref(),
        ))
    }
}
