use crate::client::ScorecardClient;
use crate::config::ScorecardConfig;
use crate::prelude::{eprintln, print, println, *};
use crate::render::{format_failure_text, format_record_text, format_results_json};
use crate::source::{CriteriaSource, Flags, Prompts};
use scorecard_core::results::ShapedResults;
use std::io::IsTerminal;

#[derive(Debug, clap::Args, Clone)]
pub struct SearchOptions {
    /// Two-letter state code (prompted for when no criteria flag is given)
    #[arg(short, long, env = "SCORECARD_STATE")]
    pub state: Option<String>,

    /// School name, or part of it
    #[arg(long, env = "SCORECARD_SCHOOL")]
    pub school: Option<String>,

    /// Only show programs whose title contains this text
    #[arg(short, long, env = "SCORECARD_PROGRAM")]
    pub program: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not clear the terminal before prompting
    #[arg(long)]
    pub no_clear: bool,
}

impl SearchOptions {
    fn flags(&self) -> Flags {
        Flags {
            state: self.state.clone(),
            school: self.school.clone(),
            program: self.program.clone(),
        }
    }
}

pub async fn run(options: SearchOptions, global: crate::Global) -> Result<()> {
    let config = ScorecardConfig::from_global(&global)?;

    let mut flags = options.flags();
    let criteria = if flags.is_empty() {
        let stdout = std::io::stdout();
        if stdout.is_terminal() && !options.no_clear {
            clear_screen();
        }
        Prompts::new(std::io::stdin().lock(), stdout.lock()).criteria()?
    } else {
        flags.criteria()?
    };

    let client = ScorecardClient::new(config)?;

    if global.verbose {
        eprintln!("Querying {}", client.query(&criteria).redacted_url());
    }

    let shaped = client.search(&criteria).await?;

    if global.verbose {
        eprintln!(
            "Found {} schools ({} skipped)",
            shaped.records.len(),
            shaped.failures.len()
        );
    }

    if options.json {
        output_json(&shaped)?;
    } else {
        output_formatted(&shaped);
    }

    Ok(())
}

fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

fn output_json(shaped: &ShapedResults) -> Result<()> {
    report_failures(shaped);
    let json = format_results_json(&shaped.records)?;
    println!("{}", json);
    Ok(())
}

fn output_formatted(shaped: &ShapedResults) {
    for record in &shaped.records {
        print!("{}", format_record_text(record));
    }
    report_failures(shaped);
}

fn report_failures(shaped: &ShapedResults) {
    for failure in &shaped.failures {
        eprintln!("{}", format_failure_text(failure));
    }
}
