//! Tests for the service layer

use super::*;
use crate::auth::AuthConfig;
use crate::config::ServiceConfig;
use crate::error::Error;
use crate::pagination::{next_cursor, ListParams, NextPageReference, PageResult, Pager};
use crate::types::Method;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> BaseService {
    BaseService::new(&ServiceConfig::new(server.uri())).unwrap()
}

#[derive(Debug, Deserialize, PartialEq)]
struct Project {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ProjectList {
    #[serde(default)]
    next: Option<NextPageReference>,
    projects: Vec<Project>,
}

impl PageResult for ProjectList {
    fn next_start(&self) -> Option<&str> {
        next_cursor(self.next.as_ref())
    }
}

#[test]
fn test_service_request_builder() {
    let request = ServiceRequest::get("/v2/projects/{id}")
        .path_param("id", "p-1")
        .query("limit", "10")
        .query_opt("start", None::<String>)
        .query_opt("detail", Some(true))
        .header("X-Request-Id", "r-1");

    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/v2/projects/{id}");
    assert_eq!(request.path_params.get("id"), Some(&"p-1".to_string()));
    assert_eq!(
        request.query,
        vec![
            ("limit".to_string(), "10".to_string()),
            ("detail".to_string(), "true".to_string()),
        ]
    );
    assert!(request.body.is_none());
}

#[test]
fn test_service_request_required() {
    assert!(ServiceRequest::required("project_id", "p-1").is_ok());

    let err = ServiceRequest::required("project_id", "").unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert!(err.to_string().contains("project_id cannot be empty"));
}

#[test]
fn test_request_headers_override_defaults() {
    let mut defaults = crate::types::StringMap::new();
    defaults.insert("X-Source".to_string(), "default".to_string());
    defaults.insert("X-Keep".to_string(), "yes".to_string());

    let (method, path, config) = ServiceRequest::delete("/v2/apps/{id}")
        .header("X-Source", "request")
        .into_parts(&defaults);

    assert_eq!(method, reqwest::Method::DELETE);
    assert_eq!(path, "/v2/apps/{id}");
    assert_eq!(config.headers.get("X-Source"), Some(&"request".to_string()));
    assert_eq!(config.headers.get("X-Keep"), Some(&"yes".to_string()));
}

#[test]
fn test_base_service_rejects_invalid_config() {
    let err = BaseService::new(&ServiceConfig::new("")).unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { .. }));
}

#[test]
fn test_set_service_url() {
    let mut service = BaseService::new(&ServiceConfig::new("https://a.example.com")).unwrap();

    service.set_service_url("https://b.example.com/api/").unwrap();
    assert_eq!(service.service_url(), "https://b.example.com/api");
    assert_eq!(
        service.client().config().base_url.as_deref(),
        Some("https://b.example.com/api")
    );

    assert!(matches!(
        service.set_service_url("").unwrap_err(),
        Error::InvalidArgument { .. }
    ));
    assert!(matches!(
        service.set_service_url("no scheme").unwrap_err(),
        Error::InvalidUrl(_)
    ));
}

#[tokio::test]
async fn test_execute_parses_body_status_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/projects/p-1"))
        .and(header("X-Team", "core"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Request-Id", "req-9")
                .set_body_json(json!({"id": "p-1", "name": "alpha"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut service = service_for(&mock_server);
    service.set_default_header("X-Team", "core");

    let response = service
        .execute::<Project>(ServiceRequest::get("/v2/projects/{id}").path_param("id", "p-1"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.header("X-Request-Id"), Some("req-9"));
    assert_eq!(
        response.into_result(),
        Project {
            id: "p-1".to_string(),
            name: "alpha".to_string(),
        }
    );
}

#[tokio::test]
async fn test_execute_with_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/projects"))
        .and(body_json(json!({"name": "beta"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "p-2", "name": "beta"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let request = ServiceRequest::post("/v2/projects")
        .json(&json!({"name": "beta"}))
        .unwrap();
    let response = service.execute::<Project>(request).await.unwrap();

    assert_eq!(response.status, 201);
    assert_eq!(response.result.id, "p-2");
}

#[tokio::test]
async fn test_execute_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v2/projects/p-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let response = service
        .execute_empty(ServiceRequest::delete("/v2/projects/{id}").path_param("id", "p-1"))
        .await
        .unwrap();

    assert_eq!(response.status, 204);
}

#[tokio::test]
async fn test_execute_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/projects/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("project not found"))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let err = service
        .execute::<Project>(ServiceRequest::get("/v2/projects/gone"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("project not found"));
}

#[tokio::test]
async fn test_execute_undecodable_body_is_not_retryable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/projects/p-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server);
    let err = service
        .execute::<serde_json::Value>(ServiceRequest::get("/v2/projects/p-1"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(ref e) if e.is_decode()));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_execute_with_bearer_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/projects/p-1"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "p-1", "name": "a"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ServiceConfig::new(mock_server.uri()).with_auth(AuthConfig::Bearer {
        token: "tok".to_string(),
    });
    let service = BaseService::new(&config).unwrap();
    let response = service
        .execute::<Project>(ServiceRequest::get("/v2/projects/p-1"))
        .await
        .unwrap();

    assert_eq!(response.result.name, "a");
}

#[test]
fn test_raw_page_cursor() {
    let page: RawPage = serde_json::from_value(json!({
        "next": {"href": "https://x/v2/projects?start=c2", "start": "c2"},
        "projects": []
    }))
    .unwrap();
    assert_eq!(page.next_start(), Some("c2"));

    let last: RawPage = serde_json::from_value(json!({"projects": []})).unwrap();
    assert_eq!(last.next_start(), None);

    let empty_cursor: RawPage = serde_json::from_value(json!({"next": {"start": ""}})).unwrap();
    assert_eq!(empty_cursor.next_start(), None);
}

#[test]
fn test_raw_page_items_at() {
    let items = RawPage::items_at("apps");

    let page: RawPage = serde_json::from_value(json!({"apps": [{"id": 1}, {"id": 2}]})).unwrap();
    assert_eq!(items(page), vec![json!({"id": 1}), json!({"id": 2})]);

    let missing: RawPage = serde_json::from_value(json!({"other": [1]})).unwrap();
    assert!(items(missing).is_empty());

    let not_array: RawPage = serde_json::from_value(json!({"apps": "nope"})).unwrap();
    assert!(items(not_array).is_empty());
}

#[tokio::test]
async fn test_http_list_operation_pages_raw() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/projects/p-1/apps"))
        .and(query_param("limit", "2"))
        .and(query_param_is_missing("start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "limit": 2,
            "apps": [{"name": "a"}, {"name": "b"}],
            "next": {"href": "ignored", "start": "c2"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/projects/p-1/apps"))
        .and(query_param("limit", "2"))
        .and(query_param("start", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "limit": 2,
            "apps": [{"name": "c"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = Arc::new(service_for(&mock_server));
    let operation = HttpListOperation::<RawPage>::new(service, "/v2/projects/{project_id}/apps")
        .path_param("project_id", "p-1");

    let mut pager = Pager::new(
        operation,
        &ListParams::new().with_limit(2),
        RawPage::items_at("apps"),
    )
    .unwrap();

    let names: Vec<String> = pager
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .filter_map(|app| app["name"].as_str().map(str::to_owned))
        .collect();

    assert_eq!(names, vec!["a", "b", "c"]);
    assert!(!pager.has_next());
    assert_eq!(pager.pages_fetched(), 2);
}

#[tokio::test]
async fn test_http_list_operation_typed_with_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/projects"))
        .and(query_param("name", "alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [{"id": "p-1", "name": "alpha"}],
            "next": {"start": ""}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = Arc::new(service_for(&mock_server));
    let operation = HttpListOperation::<ProjectList>::new(service, "/v2/projects");

    let mut pager = Pager::new(
        operation,
        &ListParams::new().filter("name", "alpha"),
        |page: ProjectList| page.projects,
    )
    .unwrap();

    let projects = pager.get_next().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert!(!pager.has_next());
    assert!(matches!(
        pager.get_next().await.unwrap_err(),
        Error::ExhaustedIterator
    ));
}

#[tokio::test]
async fn test_http_list_operation_error_passes_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/projects"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&mock_server)
        .await;

    let service = Arc::new(service_for(&mock_server));
    let mut pager = Pager::new(
        HttpListOperation::<RawPage>::new(service, "/v2/projects"),
        &ListParams::new(),
        RawPage::items_at("projects"),
    )
    .unwrap();

    let err = pager.get_next().await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(pager.has_next());
    assert_eq!(pager.pages_fetched(), 0);
}
