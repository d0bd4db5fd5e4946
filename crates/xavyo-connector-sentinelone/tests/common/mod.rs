//! Common test utilities for xavyo-connector-sentinelone integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xavyo_connector::resource::{Grant, Resource};
use xavyo_connector::traits::ResourceSyncer;
use xavyo_connector_sentinelone::{
    Account, SentinelOneClient, SentinelOneConfig, SentinelOneConnector, Site,
};

pub const API_TOKEN: &str = "test-api-token";

/// Request path of an API endpoint.
pub fn api_path(endpoint: &str) -> String {
    format!("/web/api/v2.1/{endpoint}")
}

pub fn test_config(server: &MockServer) -> SentinelOneConfig {
    SentinelOneConfig::builder()
        .api_token(API_TOKEN)
        .management_console_url(server.uri())
        .build()
        .expect("valid test config")
}

pub fn test_client(server: &MockServer) -> Arc<SentinelOneClient> {
    Arc::new(SentinelOneClient::new(&test_config(server)).expect("client"))
}

pub fn test_connector(server: &MockServer) -> SentinelOneConnector {
    SentinelOneConnector::new(test_config(server)).expect("connector")
}

/// Test data factory for console users.
pub fn user_json(id: &str, full_name: &str, scope: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{id}@example.com"),
        "fullName": full_name,
        "scope": scope,
        "scopeRoles": []
    })
}

/// Console user holding scope roles.
pub fn user_with_roles_json(id: &str, full_name: &str, scope: &str, roles: Vec<Value>) -> Value {
    let mut user = user_json(id, full_name, scope);
    user["scopeRoles"] = Value::Array(roles);
    user
}

pub fn service_user_json(id: &str, name: &str, scope: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("Service user {name}"),
        "scope": scope,
        "scopeRoles": []
    })
}

pub fn account_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "accountType": "Paid",
        "isDefault": false
    })
}

pub fn site_json(id: &str, name: &str, account_id: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "siteType": "Paid",
        "accountId": account_id
    })
}

pub fn predefined_role_json(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name })
}

pub fn scope_role_json(role_id: &str, role_name: &str, account_name: &str) -> Value {
    json!({
        "roleId": role_id,
        "roleName": role_name,
        "accountName": account_name
    })
}

/// Wraps records in the list envelope.
pub fn list_response(data: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "pagination": { "totalItems": data.len(), "nextCursor": next_cursor },
        "data": data
    })
}

/// Wraps site records in the sites envelope (`data.sites`).
pub fn sites_response(sites: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "pagination": { "totalItems": sites.len(), "nextCursor": next_cursor },
        "data": { "allSites": { "totalLicenses": 0 }, "sites": sites }
    })
}

/// Body carrying an in-band error array.
pub fn error_response(code: i64, title: &str) -> Value {
    json!({
        "errors": [{ "code": code, "detail": null, "title": title }],
        "data": []
    })
}

/// Mounts one page of an endpoint.
///
/// `filter` is an extra query parameter the request must carry. A `None`
/// cursor matches only requests without a cursor.
pub async fn mount_page(
    server: &MockServer,
    endpoint: &str,
    filter: Option<(&str, &str)>,
    cursor: Option<&str>,
    body: Value,
) {
    let mut mock = Mock::given(method("GET"))
        .and(path(api_path(endpoint)))
        .and(query_param("skipCount", "true"));
    if let Some((key, value)) = filter {
        mock = mock.and(query_param(key, value));
    }
    mock = match cursor {
        Some(c) => mock.and(query_param("cursor", c)),
        None => mock.and(query_param_is_missing("cursor")),
    };
    mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub fn test_account(id: &str, name: &str) -> Resource {
    xavyo_connector_sentinelone::account_resource(&Account {
        id: id.to_string(),
        name: name.to_string(),
        account_type: "Paid".to_string(),
        is_default: false,
    })
}

pub fn test_site(id: &str, name: &str, account_id: &str) -> Resource {
    xavyo_connector_sentinelone::site_resource(
        &Site {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            site_type: "Paid".to_string(),
            account_id: account_id.to_string(),
        },
        None,
    )
}

/// Calls `grants` until the token is exhausted.
///
/// Returns every grant and the number of calls made.
pub async fn drain_grants(syncer: &dyn ResourceSyncer, resource: &Resource) -> (Vec<Grant>, usize) {
    let mut grants = Vec::new();
    let mut token = String::new();
    let mut calls = 0;
    loop {
        let page = syncer.grants(resource, &token).await.expect("grants page");
        calls += 1;
        grants.extend(page.items);
        if page.next_token.is_empty() {
            return (grants, calls);
        }
        assert_ne!(page.next_token, token, "token did not advance");
        token = page.next_token;
        assert!(calls < 50, "grants traversal did not terminate");
    }
}

/// Endpoint paths of the requests the server received, in order.
pub async fn received_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().trim_start_matches("/web/api/v2.1/").to_string())
        .collect()
}
