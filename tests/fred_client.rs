//! HTTP-level tests for the FRED client against a mocked API.

use chrono::NaiveDate;
use fred_ingest::config::FredConfig;
use fred_ingest::data::{FredClient, SeriesSource};
use fred_ingest::domain::{FetchWindow, RawObservation};
use fred_ingest::error::EXIT_FETCH;
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OBS_PATH: &str = "/fred/series/observations";

/// The client is blocking, so the mock server runs on its own runtime and
/// requests are issued from the plain test thread.
struct TestApi {
    server: MockServer,
    runtime: Runtime,
}

impl TestApi {
    fn start() -> Self {
        let runtime = Runtime::new().expect("tokio runtime");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    fn client(&self) -> FredClient {
        FredClient::new(&FredConfig {
            api_key: "test-key".to_string(),
            base_url: format!("{}{OBS_PATH}", self.server.uri()),
        })
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn window() -> FetchWindow {
    FetchWindow {
        start: date(2020, 3, 2),
        end: date(2025, 3, 1),
    }
}

#[test]
fn fetches_observations_with_window_and_missing_values() {
    let api = TestApi::start();
    api.mount(
        Mock::given(method("GET"))
            .and(path(OBS_PATH))
            .and(query_param("series_id", "UNRATE"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("file_type", "json"))
            .and(query_param("observation_start", "2020-03-02"))
            .and(query_param("observation_end", "2025-03-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 3,
                "observations": [
                    {"realtime_start": "2025-03-01", "realtime_end": "2025-03-01", "date": "2024-12-01", "value": "4.2"},
                    {"realtime_start": "2025-03-01", "realtime_end": "2025-03-01", "date": "2025-01-01", "value": "."},
                    {"realtime_start": "2025-03-01", "realtime_end": "2025-03-01", "date": "2025-02-01", "value": "4.1"}
                ]
            }))),
    );

    let obs = api.client().fetch_series("UNRATE", window()).expect("fetch succeeds");

    assert_eq!(
        obs,
        vec![
            RawObservation::new(date(2024, 12, 1), Some(4.2)),
            RawObservation::new(date(2025, 1, 1), None),
            RawObservation::new(date(2025, 2, 1), Some(4.1)),
        ]
    );
}

#[test]
fn rejected_request_surfaces_fred_error_message() {
    let api = TestApi::start();
    api.mount(
        Mock::given(method("GET"))
            .and(path(OBS_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error_code": 400,
                "error_message": "Bad Request.  The series does not exist."
            }))),
    );

    let err = api.client().fetch_series("NOPE", window()).unwrap_err();

    assert_eq!(err.exit_code(), EXIT_FETCH);
    assert!(err.message().contains("400"), "got: {err}");
    assert!(err.message().contains("The series does not exist"), "got: {err}");
}

#[test]
fn server_error_without_body_is_reported() {
    let api = TestApi::start();
    api.mount(
        Mock::given(method("GET"))
            .and(path(OBS_PATH))
            .respond_with(ResponseTemplate::new(503)),
    );

    let err = api.client().fetch_series("UNRATE", window()).unwrap_err();

    assert!(err.message().contains("503"), "got: {err}");
    assert!(!err.message().contains("test-key"), "api key leaked: {err}");
}

#[test]
fn malformed_date_is_an_error() {
    let api = TestApi::start();
    api.mount(
        Mock::given(method("GET"))
            .and(path(OBS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "observations": [{"date": "01/02/2025", "value": "1.0"}]
            }))),
    );

    let err = api.client().fetch_series("UNRATE", window()).unwrap_err();

    assert!(err.message().contains("Invalid FRED date"), "got: {err}");
}

#[test]
fn unparsable_body_is_an_error() {
    let api = TestApi::start();
    api.mount(
        Mock::given(method("GET"))
            .and(path(OBS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>")),
    );

    let err = api.client().fetch_series("UNRATE", window()).unwrap_err();

    assert!(err.message().contains("Failed to parse FRED response"), "got: {err}");
}
