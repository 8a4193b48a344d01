//! Integration tests for `SourceClient` using wiremock HTTP mocks.

use shopmatch_core::{find_common_shops, validate_grouped};
use shopmatch_sources::{SourceClient, SourceError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> SourceClient {
    SourceClient::new(base_url, 30, "shopmatch-test")
        .expect("client construction should not fail")
        .with_retry(2, 0)
}

#[tokio::test]
async fn list_companies_returns_names_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/companies"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!(["CompanyB", "CompanyA"])),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let companies = client.list_companies().await.expect("should list companies");
    assert_eq!(companies, vec!["CompanyB", "CompanyA"]);
}

#[tokio::test]
async fn list_shops_passes_company_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shops"))
        .and(query_param("company", "CompanyA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"shopId": "1", "name": "Joe's Pizza", "postcode": "AB1 2CD"}
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let shops = client.list_shops("CompanyA").await.expect("should list shops");
    assert_eq!(shops.len(), 1);
    assert_eq!(shops[0].name, Some(serde_json::json!("Joe's Pizza")));
}

#[tokio::test]
async fn token_is_sent_as_bearer_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/companies"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_token("secret-token");
    let companies = client.list_companies().await.expect("should list companies");
    assert!(companies.is_empty());
}

#[tokio::test]
async fn fetch_grouped_feeds_the_matcher() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/companies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            "CompanyA", "CompanyB", "CompanyC"
        ])))
        .mount(&server)
        .await;

    let shops = [
        ("CompanyA", serde_json::json!([{"shopId": "1", "name": "Joe's Pizza", "postcode": "AB1 2CD"}])),
        ("CompanyB", serde_json::json!([{"shopId": 2, "name": "Joes Pizza", "postcode": "ab12cd"}])),
        ("CompanyC", serde_json::json!([
            {"shopId": "3", "name": "Totally Different", "postcode": "ab12cd"},
            {"shopId": "4", "postcode": "ab12cd"}
        ])),
    ];
    for (company, body) in shops {
        Mock::given(method("GET"))
            .and(path("/shops"))
            .and(query_param("company", company))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
    }

    let client = test_client(&server.uri());
    let raw = client.fetch_grouped().await.expect("should fetch grouped");
    let companies: Vec<&str> = raw.companies().collect();
    assert_eq!(companies, vec!["CompanyA", "CompanyB", "CompanyC"]);

    let validated = validate_grouped(raw);
    assert_eq!(validated.rejected.len(), 1);

    let groups = find_common_shops(&validated.grouped);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].representative.shop_id, "1");
    assert!(groups[0].sources.contains("CompanyA"));
    assert!(groups[0].sources.contains("CompanyB"));
}

#[tokio::test]
async fn server_error_is_retried_then_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/companies"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.list_companies().await;
    assert!(
        matches!(result, Err(SourceError::Http(ref e)) if e.status().map(|s| s.as_u16()) == Some(503)),
        "expected HTTP 503, got: {result:?}"
    );
}

#[tokio::test]
async fn rate_limited_response_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/companies"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.list_companies().await;
    assert!(
        matches!(result, Err(SourceError::Http(ref e)) if e.status().map(|s| s.as_u16()) == Some(429)),
        "expected HTTP 429, got: {result:?}"
    );
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/companies"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.list_companies().await;
    assert!(matches!(result, Err(SourceError::Http(_))));
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/companies"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"a list\"}"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.list_companies().await;
    assert!(matches!(result, Err(SourceError::Deserialize { .. })));
}
