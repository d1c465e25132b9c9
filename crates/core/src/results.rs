//! Response normalization and program filtering
//!
//! Turns a raw `schools.json` document into flat per-school records. All
//! guarding is against absent or `null` fields; a field holding the wrong JSON
//! type is reported as an error for the school that contains it.
//!
//! A school that cannot be shaped (for example one without
//! `latest.admissions`) does not abort the batch: it is collected as a
//! [`RecordFailure`] and the remaining schools are still processed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::field::{lookup, Field};

/// Error raised while shaping a single school record
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("missing required field `{path}`")]
    MissingField { path: String },

    #[error("field `{path}` has an unexpected type, expected {expected}")]
    UnexpectedType {
        path: String,
        expected: &'static str,
    },
}

/// Earnings horizon after program completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "1_yr")]
    OneYear,
    #[serde(rename = "4_yr")]
    FourYears,
    #[serde(rename = "5_yr")]
    FiveYears,
    #[serde(rename = "highest")]
    Highest,
}

impl Horizon {
    pub const ALL: [Horizon; 4] = [
        Horizon::OneYear,
        Horizon::FourYears,
        Horizon::FiveYears,
        Horizon::Highest,
    ];

    /// Key used by the API under `earnings`
    pub fn key(self) -> &'static str {
        match self {
            Horizon::OneYear => "1_yr",
            Horizon::FourYears => "4_yr",
            Horizon::FiveYears => "5_yr",
            Horizon::Highest => "highest",
        }
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            Horizon::OneYear => "First year earnings",
            Horizon::FourYears => "Fourth year earnings",
            Horizon::FiveYears => "Fifth year earnings",
            Horizon::Highest => "Highest earnings",
        }
    }
}

/// Median earnings for one horizon
///
/// Serializes as the number, or `null` when the API reported the horizon
/// without a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Earning {
    Reported(Number),
    NotAvailable,
}

/// Tuition and fees for a school
///
/// Serializes as `{"in_state": .., "out_of_state": ..}` or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tuition {
    Reported {
        in_state: Number,
        out_of_state: Number,
    },
    NotAvailable,
}

/// Raw SAT and ACT sub-documents, passed through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admissions {
    pub sat: Value,
    pub act: Value,
}

/// One program offered by a school
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramResult {
    pub code: String,
    pub title: String,
    #[serde(rename = "credential")]
    pub credential_title: String,
    /// Only horizons present in the raw document appear here
    pub earnings: BTreeMap<Horizon, Earning>,
}

/// Shaped output for one school
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "name")]
    pub school_name: String,
    pub admissions: Admissions,
    pub tuition: Tuition,
    /// `false` when the school has no `latest.programs.cip_4_digit` list
    pub has_program_data: bool,
    pub programs: Vec<ProgramResult>,
}

/// A school that could not be shaped
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFailure {
    /// Position of the school in `results`
    pub index: usize,
    pub school_name: Option<String>,
    pub error: ShapeError,
}

/// Output of [`shape_results`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedResults {
    pub records: Vec<ResultRecord>,
    pub failures: Vec<RecordFailure>,
}

/// Case-insensitive substring match of `filter` against a program title
///
/// No filter matches every title. The stored title keeps its casing; only the
/// comparison is lowercased.
pub fn title_matches(title: &str, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(filter) => title.to_lowercase().contains(&filter.to_lowercase()),
    }
}

/// Shape every school in `document.results`
///
/// A missing `results` key yields an empty output. Schools and programs keep
/// their original order.
pub fn shape_results(document: &Value, program_title_filter: Option<&str>) -> ShapedResults {
    let mut shaped = ShapedResults::default();

    let schools = match lookup(document, "results") {
        Ok(Field::Value(Value::Array(schools))) => schools,
        Ok(Field::Value(_)) => {
            shaped.failures.push(RecordFailure {
                index: 0,
                school_name: None,
                error: ShapeError::UnexpectedType {
                    path: "results".to_string(),
                    expected: "array",
                },
            });
            return shaped;
        }
        Ok(Field::Null | Field::Absent) => return shaped,
        Err(error) => {
            shaped.failures.push(RecordFailure {
                index: 0,
                school_name: None,
                error,
            });
            return shaped;
        }
    };

    for (index, school) in schools.iter().enumerate() {
        match shape_school(school, program_title_filter) {
            Ok(record) => shaped.records.push(record),
            Err(error) => shaped.failures.push(RecordFailure {
                index,
                school_name: lookup(school, "school.name")
                    .ok()
                    .and_then(Field::value)
                    .and_then(Value::as_str)
                    .map(str::to_string),
                error,
            }),
        }
    }

    shaped
}

/// Shape a single raw school record
pub fn shape_school(
    school: &Value,
    program_title_filter: Option<&str>,
) -> Result<ResultRecord, ShapeError> {
    let school_name = lookup(school, "school.name")?.required_str("school.name")?;
    let latest = lookup(school, "latest")?.required("latest")?;

    let admissions = lookup(latest, "admissions")?.required("latest.admissions")?;
    let admissions = Admissions {
        sat: lookup(admissions, "sat_scores")?
            .present("latest.admissions.sat_scores")?
            .clone(),
        act: lookup(admissions, "act_scores")?
            .present("latest.admissions.act_scores")?
            .clone(),
    };

    let tuition = shape_tuition(latest)?;

    let (has_program_data, programs) = match lookup(latest, "programs.cip_4_digit")? {
        Field::Value(Value::Array(programs)) => {
            let mut shaped = Vec::new();
            for (i, program) in programs.iter().enumerate() {
                let path = format!("latest.programs.cip_4_digit.{i}");
                let title = lookup(program, "title")?.required_str(&format!("{path}.title"))?;
                if title_matches(title, program_title_filter) {
                    shaped.push(shape_program(program, &path)?);
                }
            }
            (true, shaped)
        }
        Field::Value(_) => {
            return Err(ShapeError::UnexpectedType {
                path: "latest.programs.cip_4_digit".to_string(),
                expected: "array",
            })
        }
        Field::Null | Field::Absent => (false, Vec::new()),
    };

    Ok(ResultRecord {
        school_name: school_name.to_string(),
        admissions,
        tuition,
        has_program_data,
        programs,
    })
}

fn shape_tuition(latest: &Value) -> Result<Tuition, ShapeError> {
    let in_state = lookup(latest, "cost.tuition.in_state")?
        .optional_number("latest.cost.tuition.in_state")?;
    let out_of_state = lookup(latest, "cost.tuition.out_of_state")?
        .optional_number("latest.cost.tuition.out_of_state")?;

    Ok(match (in_state, out_of_state) {
        (Some(in_state), Some(out_of_state)) => Tuition::Reported {
            in_state: in_state.clone(),
            out_of_state: out_of_state.clone(),
        },
        _ => Tuition::NotAvailable,
    })
}

fn shape_program(program: &Value, path: &str) -> Result<ProgramResult, ShapeError> {
    let code = match lookup(program, "code")?.required(&format!("{path}.code"))? {
        Value::String(code) => code.clone(),
        Value::Number(code) => code.to_string(),
        _ => {
            return Err(ShapeError::UnexpectedType {
                path: format!("{path}.code"),
                expected: "string",
            })
        }
    };
    let title = lookup(program, "title")?.required_str(&format!("{path}.title"))?;
    let credential_title =
        lookup(program, "credential.title")?.required_str(&format!("{path}.credential.title"))?;

    let earnings_path = format!("{path}.earnings");
    let raw_earnings = lookup(program, "earnings")?.required(&earnings_path)?;
    if !raw_earnings.is_object() {
        return Err(ShapeError::UnexpectedType {
            path: earnings_path,
            expected: "object",
        });
    }

    let mut earnings = BTreeMap::new();
    for horizon in Horizon::ALL {
        let leaf = format!("{}.overall_median_earnings", horizon.key());
        let value = match lookup(raw_earnings, &leaf)? {
            Field::Value(Value::Number(n)) => Earning::Reported(n.clone()),
            Field::Value(_) => {
                return Err(ShapeError::UnexpectedType {
                    path: format!("{earnings_path}.{leaf}"),
                    expected: "number",
                })
            }
            Field::Null => Earning::NotAvailable,
            Field::Absent => continue,
        };
        earnings.insert(horizon, value);
    }

    Ok(ProgramResult {
        code,
        title: title.to_string(),
        credential_title: credential_title.to_string(),
        earnings,
    })
}
