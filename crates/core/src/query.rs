//! Search criteria and outbound query construction
//!
//! Pure functions that turn user-supplied search criteria into the query
//! string sent to the College Scorecard `schools.json` endpoint.

/// Default College Scorecard endpoint
pub const SCHOOLS_ENDPOINT: &str = "https://api.data.gov/ed/collegescorecard/v1/schools.json";

/// Page size large enough to return every match in a single page
pub const PER_PAGE: u64 = 3_000_000;

/// State used when neither a state nor a school name is given
pub const DEFAULT_STATE: &str = "WA";

/// School used when neither a state nor a school name is given
pub const DEFAULT_SCHOOL: &str = "University of Washington-Seattle";

/// Normalized search criteria
///
/// Built once per invocation through [`SearchCriteria::new`], which trims
/// every field, drops empty ones, uppercases the state code and lowercases the
/// program title. When both the state and the school name are missing the
/// default pair ([`DEFAULT_STATE`], [`DEFAULT_SCHOOL`]) is used so the query
/// is never unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    state_code: Option<String>,
    school_name: Option<String>,
    program_title_filter: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl SearchCriteria {
    pub fn new(
        state_code: Option<&str>,
        school_name: Option<&str>,
        program_title: Option<&str>,
    ) -> Self {
        let state_code = non_empty(state_code).map(str::to_uppercase);
        let school_name = non_empty(school_name).map(str::to_string);
        let program_title_filter = non_empty(program_title).map(str::to_lowercase);

        let (state_code, school_name) = match (state_code, school_name) {
            (None, None) => (
                Some(DEFAULT_STATE.to_string()),
                Some(DEFAULT_SCHOOL.to_string()),
            ),
            pair => pair,
        };

        Self {
            state_code,
            school_name,
            program_title_filter,
        }
    }

    pub fn state_code(&self) -> Option<&str> {
        self.state_code.as_deref()
    }

    pub fn school_name(&self) -> Option<&str> {
        self.school_name.as_deref()
    }

    pub fn program_title_filter(&self) -> Option<&str> {
        self.program_title_filter.as_deref()
    }
}

/// Outbound query: endpoint plus ordered `key=value` parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub base_url: String,
    pub params: Vec<String>,
}

impl QueryDescriptor {
    /// Point the same parameters at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fully assembled request URL
    pub fn url(&self) -> String {
        format!("{}?{}", self.base_url, self.params.join("&"))
    }

    /// Request URL with the credential masked, for logs
    pub fn redacted_url(&self) -> String {
        let params: Vec<&str> = self
            .params
            .iter()
            .map(|p| {
                if p.starts_with("api_key=") {
                    "api_key=REDACTED"
                } else {
                    p.as_str()
                }
            })
            .collect();

        format!("{}?{}", self.base_url, params.join("&"))
    }
}

/// Build the `schools.json` query for the given criteria
///
/// Parameter order is fixed: `school.state`, `school.name` (each only when
/// set), `per_page`, `api_key`. The state code is forwarded as-is; unknown
/// codes are left for the API to reject. The school name is percent-encoded.
pub fn build_query(criteria: &SearchCriteria, api_key: &str) -> QueryDescriptor {
    let mut params = Vec::with_capacity(4);

    if let Some(state) = criteria.state_code() {
        params.push(format!("school.state={state}"));
    }
    if let Some(name) = criteria.school_name() {
        params.push(format!("school.name={}", urlencoding::encode(name)));
    }
    params.push(format!("per_page={PER_PAGE}"));
    params.push(format!("api_key={api_key}"));

    QueryDescriptor {
        base_url: SCHOOLS_ENDPOINT.to_string(),
        params,
    }
}
