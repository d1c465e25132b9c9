use crate::client::ScorecardClient;
use crate::config::ScorecardConfig;
use crate::prelude::{eprintln, *};
use crate::source::CriteriaSource;
use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Form, Json, Router,
};
use scorecard_core::query::{SearchCriteria, DEFAULT_STATE};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

const INDEX_HTML: &str = include_str!("index.html");

/// Response header with the number of schools left out of the body
pub const SKIPPED_HEADER: &str = "x-scorecard-skipped";

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "SCORECARD_PORT", default_value = "8001")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "SCORECARD_HOST", default_value = "0.0.0.0")]
    pub host: String,
}

pub struct AppState {
    client: ScorecardClient,
    verbose: bool,
}

/// Fields posted by the search form
#[derive(Debug, Clone, Deserialize)]
pub struct SearchForm {
    #[serde(default = "default_state")]
    pub state_code: String,
    #[serde(default)]
    pub school_name: String,
    #[serde(default)]
    pub program_title: String,
}

fn default_state() -> String {
    DEFAULT_STATE.to_string()
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            state_code: default_state(),
            school_name: String::new(),
            program_title: String::new(),
        }
    }
}

/// JSON body plus the count of schools that failed to shape
#[derive(Debug)]
pub struct SearchReply {
    pub body: Value,
    pub skipped: usize,
}

impl SearchReply {
    fn error() -> Self {
        Self {
            body: json!({"error": "Failed to fetch data"}),
            skipped: 0,
        }
    }
}

impl CriteriaSource for SearchForm {
    fn criteria(&mut self) -> Result<SearchCriteria> {
        Ok(SearchCriteria::new(
            Some(self.state_code.as_str()),
            Some(self.school_name.as_str()),
            Some(self.program_title.as_str()),
        ))
    }
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    let config = ScorecardConfig::from_global(&global)?;
    let state = Arc::new(AppState {
        client: ScorecardClient::new(config)?,
        verbose: global.verbose,
    });

    let addr = format!("{}:{}", options.host, options.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    if global.verbose {
        eprintln!("Scorecard server listening on http://{}", addr);
        eprintln!("Search form: http://{}/", addr);
        eprintln!("Search endpoint: POST http://{}/search", addr);
    }

    axum::serve(listener, router(state))
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/search", post(search_handler))
        .layer(cors)
        .with_state(state)
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// A body that is not a form searches with the default fields
async fn search_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<SearchForm>, FormRejection>,
) -> impl IntoResponse {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            log::debug!("search body is not a form ({rejection}), using defaults");
            SearchForm::default()
        }
    };

    let reply = search_response(&state, form).await;
    (
        [(SKIPPED_HEADER, reply.skipped.to_string())],
        Json(reply.body),
    )
}

/// Run one search and build the JSON body
///
/// Fetch failures collapse into `{"error": "Failed to fetch data"}`. Schools
/// that fail to shape are logged, left out of the body and counted in
/// [`SearchReply::skipped`].
pub async fn search_response(state: &AppState, mut form: SearchForm) -> SearchReply {
    let criteria = match form.criteria() {
        Ok(criteria) => criteria,
        Err(e) => {
            log::warn!("invalid search form: {e}");
            return SearchReply::error();
        }
    };

    if state.verbose {
        eprintln!(
            "Search: state={:?} school={:?} program={:?}",
            criteria.state_code(),
            criteria.school_name(),
            criteria.program_title_filter()
        );
    }

    match state.client.search(&criteria).await {
        Ok(shaped) => match serde_json::to_value(&shaped.records) {
            Ok(body) => SearchReply {
                body,
                skipped: shaped.failures.len(),
            },
            Err(e) => {
                log::error!("failed to serialize search results: {e}");
                SearchReply::error()
            }
        },
        Err(e) => {
            log::warn!("search failed: {e}");
            SearchReply::error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state_for(base_url: String, timeout: Duration) -> AppState {
        AppState {
            client: ScorecardClient::new(ScorecardConfig {
                api_key: "test-key".to_string(),
                base_url,
                timeout,
            })
            .unwrap(),
            verbose: false,
        }
    }

    fn form(state_code: &str, school_name: &str, program_title: &str) -> SearchForm {
        SearchForm {
            state_code: state_code.to_string(),
            school_name: school_name.to_string(),
            program_title: program_title.to_string(),
        }
    }

    fn fixture() -> Value {
        json!({
            "results": [
                {
                    "school": {"name": "Gonzaga University"},
                    "latest": {
                        "admissions": {"sat_scores": {}, "act_scores": {}},
                        "cost": {"tuition": {"in_state": 52800, "out_of_state": 52800}},
                        "programs": {"cip_4_digit": [
                            {
                                "code": "5138",
                                "title": "Registered Nursing/Registered Nurse",
                                "credential": {"title": "Bachelor's Degree"},
                                "earnings": {"1_yr": {"overall_median_earnings": 79000}}
                            },
                            {
                                "code": "1107",
                                "title": "Computer Science",
                                "credential": {"title": "Bachelor's Degree"},
                                "earnings": {}
                            }
                        ]}
                    }
                },
                {"school": {"name": "No Admissions College"}, "latest": {}}
            ]
        })
    }

    #[tokio::test]
    async fn test_search_response_filters_programs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("school.state", "WA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture()))
            .mount(&server)
            .await;

        let state = state_for(format!("{}/schools.json", server.uri()), Duration::from_secs(5));
        let reply = search_response(&state, form("wa", "", "NURSING")).await;
        assert_eq!(reply.skipped, 1);

        let body = reply.body;
        let schools = body.as_array().unwrap();
        assert_eq!(schools.len(), 1);
        assert_eq!(schools[0]["name"], "Gonzaga University");
        assert_eq!(schools[0]["programs"].as_array().unwrap().len(), 1);
        assert_eq!(schools[0]["programs"][0]["earnings"]["1_yr"], 79000);
    }

    #[tokio::test]
    async fn test_search_response_timeout_returns_error_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(fixture())
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let state = state_for(
            format!("{}/schools.json", server.uri()),
            Duration::from_millis(50),
        );
        let body = search_response(&state, form("WA", "", "")).await.body;

        assert_eq!(body, json!({"error": "Failed to fetch data"}));
    }

    #[tokio::test]
    async fn test_search_response_status_error_returns_error_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let state = state_for(format!("{}/schools.json", server.uri()), Duration::from_secs(5));
        let body = search_response(&state, form("WA", "", "")).await.body;

        assert_eq!(body, json!({"error": "Failed to fetch data"}));
    }

    #[tokio::test]
    async fn test_search_response_empty_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;

        let state = state_for(format!("{}/schools.json", server.uri()), Duration::from_secs(5));
        let body = search_response(&state, form("ZZ", "", "")).await.body;

        assert_eq!(body, json!([]));
    }

    #[test]
    fn test_search_form_defaults_state() {
        let mut form: SearchForm = serde_json::from_value(json!({})).unwrap();
        assert_eq!(form.state_code, "WA");

        let criteria = form.criteria().unwrap();
        assert_eq!(criteria.state_code(), Some("WA"));
        assert_eq!(criteria.school_name(), None);
    }

    #[test]
    fn test_search_form_blank_fields_use_default_school() {
        let mut blank = form("", "", "");
        assert_eq!(
            blank.criteria().unwrap(),
            SearchCriteria::new(None, None, None)
        );
    }

    #[tokio::test]
    async fn test_router_serves_form_and_search() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("school.name", "Gonzaga University"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture()))
            .mount(&upstream)
            .await;

        let state = Arc::new(state_for(
            format!("{}/schools.json", upstream.uri()),
            Duration::from_secs(5),
        ));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router(state)).await });

        let http = reqwest::Client::new();

        let page = http
            .get(format!("http://{addr}/"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(page.contains("name=\"state_code\""));

        let body: Value = http
            .post(format!("http://{addr}/search"))
            .form(&[
                ("state_code", "WA"),
                ("school_name", "Gonzaga University"),
                ("program_title", "computer"),
            ])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body[0]["programs"][0]["code"], "1107");
    }

    #[tokio::test]
    async fn test_router_non_form_body_searches_with_defaults() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("school.state", "WA"))
            .and(query_param_is_missing("school.name"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture()))
            .expect(2)
            .mount(&upstream)
            .await;

        let state = Arc::new(state_for(
            format!("{}/schools.json", upstream.uri()),
            Duration::from_secs(5),
        ));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router(state)).await });

        let http = reqwest::Client::new();
        let requests = [
            http.post(format!("http://{addr}/search")),
            http.post(format!("http://{addr}/search"))
                .header("content-type", "application/json")
                .body(r#"{"state_code": "OR"}"#),
        ];

        for request in requests {
            let response = request.send().await.unwrap();
            assert_eq!(response.status(), 200);
            assert_eq!(
                response.headers()["content-type"],
                "application/json"
            );
            assert_eq!(response.headers()[SKIPPED_HEADER], "1");

            let body: Value = response.json().await.unwrap();
            assert_eq!(body[0]["name"], "Gonzaga University");
        }
    }

    #[test]
    fn test_search_form_default() {
        let form = SearchForm::default();
        assert_eq!(form.state_code, "WA");
        assert!(form.school_name.is_empty());
        assert!(form.program_title.is_empty());
    }
}
