use crate::prelude::*;
use colored::Colorize;
use scorecard_core::currency::{format_dollars, format_dollars_cents};
use scorecard_core::results::{Earning, RecordFailure, ResultRecord, Tuition};

/// Convert shaped records to a JSON string
pub fn format_results_json(records: &[ResultRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Convert one school to console text
pub fn format_record_text(record: &ResultRecord) -> String {
    let mut result = String::new();
    let name = &record.school_name;

    result.push_str(&format!("\n{}\n\n", " ===== ".bright_cyan()));
    result.push_str(&format!(
        "{} {}: {} \n {} {}: {}\n",
        name.white().bold(),
        "Admissions SAT".green(),
        pretty(&record.admissions.sat),
        name.white().bold(),
        "ACT".green(),
        pretty(&record.admissions.act)
    ));

    match &record.tuition {
        Tuition::Reported {
            in_state,
            out_of_state,
        } => result.push_str(&format!(
            "{}: {} (In-State), {} (Out-of-State)\n",
            "Tuition and Fees".green(),
            format_dollars(in_state).bright_yellow(),
            format_dollars(out_of_state).bright_yellow()
        )),
        Tuition::NotAvailable => {
            result.push_str(&format!("{}\n", "Tuition data not available".yellow()))
        }
    }

    if !record.has_program_data {
        result.push_str(&format!("{}\n\n", "No program data available.".yellow()));
        return result;
    }

    for program in &record.programs {
        result.push_str(&format!("{} {}\n", "Courses offered by".green(), name));
        result.push_str(&format!("{}: {}\n", "Code ".green(), program.code));
        result.push_str(&format!(
            "{}: {}\n",
            "Title Name".green(),
            program.title.white().bold()
        ));
        result.push_str(&format!(
            "{}: {}\n",
            "Title Type".green(),
            program.credential_title
        ));

        for (horizon, earning) in &program.earnings {
            let value = match earning {
                Earning::Reported(amount) => format_dollars_cents(amount).bright_yellow(),
                Earning::NotAvailable => "Data not available".yellow(),
            };
            result.push_str(&format!("{}: {}\n", horizon.label().green(), value));
        }

        result.push_str(&format!("\n{}\n\n", " ----- ".bright_black()));
    }

    result
}

/// One-line report for a school that could not be shaped
pub fn format_failure_text(failure: &RecordFailure) -> String {
    format!(
        "{} school #{} ({}): {}",
        "Skipping".red().bold(),
        failure.index,
        failure.school_name.as_deref().unwrap_or("unknown"),
        failure.error
    )
}
