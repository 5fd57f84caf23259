//! Integration tests for the ipstack lookup client with Wiremock
//!
//! Exercises the error-normalization contract against a mock provider.

use geoloc::adapters::outbound::IpstackClient;
use geoloc::application::REQUIRED_FIELDS;
use geoloc::domain::ports::GeolocationLookup;
use geoloc::domain::value_objects::LookupOutcome;
use std::net::IpAddr;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IP: &str = "77.46.83.45";

fn client(base_url: &str) -> IpstackClient {
    IpstackClient::new(base_url.to_string(), "test-key".to_string())
}

fn ip() -> IpAddr {
    IP.parse().unwrap()
}

/// Test extraction of the requested fields from a successful response
#[tokio::test]
async fn test_fetch_extracts_requested_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/{}", IP)))
        .and(query_param("access_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ip": IP,
            "type": "ipv4",
            "city": "Białystok",
            "zip": "15-668",
            "country_name": "Poland",
            "latitude": 53.1325,
            "longitude": 23.1688
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server.uri()).fetch(ip(), &REQUIRED_FIELDS).await;

    assert_eq!(
        outcome,
        LookupOutcome::Fields(vec![
            ("city".to_string(), "Białystok".to_string()),
            ("zip".to_string(), "15-668".to_string()),
            ("country_name".to_string(), "Poland".to_string()),
        ])
    );
}

/// Test that null and blank values are not extracted
#[tokio::test]
async fn test_fetch_skips_blank_and_missing_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": null,
            "zip": "",
            "country_name": "Poland"
        })))
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server.uri()).fetch(ip(), &REQUIRED_FIELDS).await;

    assert_eq!(
        outcome,
        LookupOutcome::Fields(vec![("country_name".to_string(), "Poland".to_string())])
    );
}

/// Test that a non-success status carries its body verbatim as the error
#[tokio::test]
async fn test_fetch_returns_error_body_for_non_success() {
    let mock_server = MockServer::start().await;

    let error_body = "<html>\r\n<head><title>302 Found</title></head>\r\n<body>\r\n\
                      <center><h1>302 Found</h1></center>\r\n<hr><center>nginx</center>\r\n\
                      </body>\r\n</html>\r\n";

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(302).set_body_string(error_body))
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server.uri()).fetch(ip(), &REQUIRED_FIELDS).await;

    assert_eq!(outcome, LookupOutcome::Error(error_body.to_string()));
}

/// Test the provider's not-found shape (a `detail` member)
#[tokio::test]
async fn test_fetch_detail_marker_normalizes_to_resource_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "detail": "The requested resource does not exist."
        })))
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server.uri()).fetch(ip(), &REQUIRED_FIELDS).await;

    assert_eq!(outcome, LookupOutcome::Error("Resource not found".to_string()));
}

/// Test the provider's error envelope (nested `error.info`)
#[tokio::test]
async fn test_fetch_error_info_is_used_as_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "error": {
                "code": 101,
                "type": "invalid_access_key",
                "info": "You have not supplied a valid API Access Key."
            }
        })))
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server.uri()).fetch(ip(), &REQUIRED_FIELDS).await;

    assert_eq!(
        outcome,
        LookupOutcome::Error("You have not supplied a valid API Access Key.".to_string())
    );
}

/// Test that an unparsable success body yields no data, not an error
#[tokio::test]
async fn test_fetch_unparsable_success_body_yields_no_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server.uri()).fetch(ip(), &REQUIRED_FIELDS).await;

    assert_eq!(outcome, LookupOutcome::NoData);
}

/// Test that a parseable body with no requested fields and no error
/// markers is silent no-data rather than an explicit error
#[tokio::test]
async fn test_fetch_success_body_without_fields_yields_no_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ip": IP,
            "type": "ipv4"
        })))
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server.uri()).fetch(ip(), &REQUIRED_FIELDS).await;

    assert_eq!(outcome, LookupOutcome::NoData);
}

/// Test that a connection failure yields no data instead of an error
#[tokio::test]
async fn test_fetch_connection_failure_yields_no_data() {
    let mock_server = MockServer::start().await;
    let dead_uri = mock_server.uri();
    drop(mock_server);

    let outcome = client(&dead_uri).fetch(ip(), &REQUIRED_FIELDS).await;

    assert_eq!(outcome, LookupOutcome::NoData);
}
