//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: credentials → token → authenticated
//! resource calls → paginated listings

use akeneo_client::pagination::PageErrorPolicy;
use akeneo_client::{
    AkeneoClient, ClientConfig, Creatable, Credentials, Error, Gettable, ListParams, Listable,
    ResourceKind, TokenState, Updatable,
};
use chrono::{Duration, Utc};
use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_PATH: &str = "/api/oauth/v1/token";

fn credentials() -> Credentials {
    Credentials::new("client", "secret", "admin", "admin")
}

async fn mount_token(server: &MockServer, access: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_json(json!({
            "grant_type": "password",
            "username": "admin",
            "password": "admin"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access,
            "refresh_token": "refresh-1",
            "expires_in": 3600,
            "token_type": "bearer"
        })))
        .mount(server)
        .await;
}

fn products_page(server: &MockServer, page: u32, next: Option<u32>, ids: &[&str]) -> Value {
    let url = |n: u32| format!("{}/api/rest/v1/products?page={n}", server.uri());
    let mut links = json!({
        "self": {"href": url(page)},
        "first": {"href": url(1)}
    });
    if let Some(next) = next {
        links["next"] = json!({"href": url(next)});
    }
    let items: Vec<Value> = ids.iter().map(|id| json!({"identifier": id})).collect();
    json!({
        "_links": links,
        "current_page": page,
        "_embedded": {"items": items}
    })
}

async fn mount_products(server: &MockServer, page: u32, next: Option<u32>, ids: &[&str]) {
    let body = products_page(server, page, next, ids);
    let mock = Mock::given(method("GET"))
        .and(path("/api/rest/v1/products"))
        .and(header("Authorization", "Bearer access-1"));
    let mock = if page == 1 {
        mock.and(query_param("pagination_type", "search_after"))
    } else {
        mock.and(query_param("page", page.to_string()))
    };
    mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Client construction
// ============================================================================

#[test]
fn test_client_requires_all_credentials() {
    let err = AkeneoClient::new(
        "http://localhost",
        Credentials::new("client", "secret", "", "admin"),
    )
    .unwrap_err();

    assert!(matches!(err, Error::Config { .. }));
    assert!(err.to_string().contains("username"));
}

#[test]
fn test_from_config_requires_credentials() {
    let config = ClientConfig::from_yaml_str("base_url: http://localhost").unwrap();
    let err = AkeneoClient::from_config(&config).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn test_client_endpoints() {
    let client = AkeneoClient::new("http://pim.local/", credentials()).unwrap();

    assert_eq!(
        client.endpoint(ResourceKind::AssociationTypes),
        "http://pim.local/api/rest/v1/association-types"
    );
    assert_eq!(
        client.authenticator().unwrap().token_url(),
        "http://pim.local/api/oauth/v1/token"
    );
}

// ============================================================================
// End-to-end flows
// ============================================================================

#[tokio::test]
async fn test_paginated_listing_with_token() {
    let server = MockServer::start().await;
    mount_token(&server, "access-1").await;
    mount_products(&server, 1, Some(2), &["a", "b"]).await;
    mount_products(&server, 2, Some(3), &["c", "d"]).await;
    mount_products(&server, 3, None, &["e"]).await;

    let client = AkeneoClient::new(server.uri(), credentials()).unwrap();
    let cursor = client.products().fetch_list(ListParams::new()).await.unwrap();

    let ids: Vec<String> = cursor
        .into_stream()
        .map(|item| item.unwrap()["identifier"].as_str().unwrap().to_string())
        .collect()
        .await;
    assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);

    // One password grant for the whole listing
    let token_requests = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == TOKEN_PATH)
        .count();
    assert_eq!(token_requests, 1);
}

#[tokio::test]
async fn test_listing_ends_quietly_on_page_failure() {
    let server = MockServer::start().await;
    mount_token(&server, "access-1").await;
    mount_products(&server, 1, Some(2), &["a", "b"]).await;

    Mock::given(method("GET"))
        .and(path("/api/rest/v1/products"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = AkeneoClient::new(server.uri(), credentials()).unwrap();
    let mut cursor = client.fetch_list(ResourceKind::Products, ListParams::new()).await.unwrap();

    let mut count = 0;
    while cursor.next_item().await.unwrap().is_some() {
        count += 1;
    }
    assert_eq!(count, 2);
    assert_eq!(cursor.last_failure().unwrap().status, Some(500));
}

#[tokio::test]
async fn test_listing_propagates_page_failure_when_configured() {
    let server = MockServer::start().await;
    mount_token(&server, "access-1").await;
    mount_products(&server, 1, Some(2), &["a"]).await;

    Mock::given(method("GET"))
        .and(path("/api/rest/v1/products"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = ClientConfig::from_yaml_str(&format!(
        r#"
base_url: "{}"
credentials:
  client_id: client
  secret: secret
  username: admin
  password: admin
pagination:
  on_page_error: propagate
"#,
        server.uri()
    ))
    .unwrap();

    let client = AkeneoClient::from_config(&config).unwrap();
    assert_eq!(client.policy(), PageErrorPolicy::Propagate);

    let results: Vec<_> = client
        .products()
        .fetch_list(ListParams::new())
        .await
        .unwrap()
        .into_stream()
        .collect()
        .await;

    assert_eq!(results.len(), 2);
    assert!(matches!(results[1], Err(Error::HttpStatus { status: 503, .. })));
}

#[tokio::test]
async fn test_expired_token_is_refreshed_before_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_json(json!({
            "grant_type": "refresh_token",
            "refresh_token": "old-refresh"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "refresh_token": "refresh-2",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/rest/v1/locales/en_US"))
        .and(header("Authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "en_US"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = AkeneoClient::new(server.uri(), credentials()).unwrap();
    let authenticator = client.authenticator().unwrap();
    authenticator
        .restore(TokenState::new(
            "old-access",
            "old-refresh",
            Utc::now() - Duration::seconds(5),
        ))
        .await;

    let locale = client.locales().fetch_item("en_US").await.unwrap();
    assert_eq!(locale["code"], json!("en_US"));
    assert_eq!(
        authenticator.token_state().await.unwrap().refresh_token,
        "refresh-2"
    );
}

#[tokio::test]
async fn test_rejected_credentials_surface_as_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(422).set_body_string(r#"{"message":"invalid credentials"}"#),
        )
        .mount(&server)
        .await;

    let client = AkeneoClient::new(server.uri(), credentials()).unwrap();
    let err = client.channels().fetch_item("ecommerce").await.unwrap_err();

    assert!(matches!(err, Error::Authentication { status: 422, .. }));
    assert!(err.to_string().contains("invalid credentials"));
}

#[tokio::test]
async fn test_create_and_update_family() {
    let server = MockServer::start().await;
    mount_token(&server, "access-1").await;

    Mock::given(method("POST"))
        .and(path("/api/rest/v1/families"))
        .and(header("Authorization", "Bearer access-1"))
        .and(body_json(json!({"code": "shoes"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/rest/v1/families/shoes"))
        .respond_with(
            ResponseTemplate::new(204)
                .insert_header("Location", "http://pim/api/rest/v1/families/shoes"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = AkeneoClient::new(server.uri(), credentials()).unwrap();
    let families = client.families();

    families.create_item(&json!({"code": "shoes"})).await.unwrap();
    let location = families
        .update_create_item(&json!({"code": "shoes", "attribute_as_label": "name"}), None)
        .await
        .unwrap();
    assert_eq!(
        location.as_deref(),
        Some("http://pim/api/rest/v1/families/shoes")
    );
}

#[tokio::test]
async fn test_with_session_skips_token_exchange() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/rest/v1/currencies"))
        .and(header("X-Session", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"code": "EUR", "enabled": true}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert("X-Session", reqwest::header::HeaderValue::from_static("abc"));
    let session = reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .unwrap();

    let client = AkeneoClient::with_session(server.uri(), session);
    assert!(client.authenticator().is_none());

    let items = client
        .fetch_list(ResourceKind::Currencies, ListParams::new())
        .await
        .unwrap()
        .collect_all()
        .await
        .unwrap();
    assert_eq!(items.len(), 1);

    let err = client
        .fetch_item(ResourceKind::Currencies, "EUR")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}

#[tokio::test]
async fn test_sub_resource_listing() {
    let server = MockServer::start().await;
    mount_token(&server, "access-1").await;

    let url = format!("{}/api/rest/v1/attributes/color/options", server.uri());
    Mock::given(method("GET"))
        .and(path("/api/rest/v1/attributes/color/options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_links": {
                "self": {"href": url},
                "first": {"href": url}
            },
            "_embedded": {"items": [
                {"code": "red", "attribute": "color"},
                {"code": "blue", "attribute": "color"}
            ]}
        })))
        .mount(&server)
        .await;

    let client = AkeneoClient::new(server.uri(), credentials()).unwrap();
    let options = client.attributes().options("color").unwrap();
    let items = options
        .fetch_list(ListParams::new())
        .await
        .unwrap()
        .collect_all()
        .await
        .unwrap();

    let codes: Vec<&str> = items.iter().filter_map(|i| i["code"].as_str()).collect();
    assert_eq!(codes, vec!["red", "blue"]);
}
