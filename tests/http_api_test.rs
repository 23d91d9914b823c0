//! REST and GraphQL surface tests, driven through the router without a socket.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common::*;
use fio_enricher::adapters::http::{build_router, AppState};
use fio_enricher::domain::models::AttributeKind;
use fio_enricher::domain::ports::{MessageLog, PersonRepository};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::MockServer;

struct TestApp {
    router: Router,
    repository: Arc<InMemoryPersonRepository>,
    log: Arc<dyn MessageLog>,
    _server: MockServer,
}

async fn test_app(server: MockServer) -> TestApp {
    let repository = Arc::new(InMemoryPersonRepository::new());
    let log: Arc<dyn MessageLog> = message_log().await;
    let people = person_service(&server, repository.clone());
    let router = build_router(Arc::new(AppState::new(people, log.clone())), false);
    TestApp {
        router,
        repository,
        log,
        _server: server,
    }
}

async fn zahar_app() -> TestApp {
    let server = MockServer::start().await;
    mount_zahar(&server).await;
    test_app(server).await
}

async fn send(router: &Router, method: Method, uri: &str, body: &[u8]) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = if body.is_empty() {
        builder.body(Body::empty()).unwrap()
    } else {
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_vec()))
            .unwrap()
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

async fn send_json(router: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    let bytes = serde_json::to_vec(&body).unwrap();
    send(router, method, uri, &bytes).await
}

async fn create_zahar(app: &TestApp) -> i64 {
    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/api/people",
        json!({"name": "Zahar", "surname": "Ivanov", "patronymic": "Andreevich"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = zahar_app().await;
    let (status, body) = send(&app.router, Method::GET, "/health", b"").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn test_create_person_enriches_record() {
    setup_test_logging();
    let app = zahar_app().await;

    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/api/people",
        json!({"name": "Zahar", "surname": "Ivanov", "patronymic": "Andreevich"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Zahar");
    assert_eq!(body["surname"], "Ivanov");
    assert_eq!(body["patronymic"], "Andreevich");
    assert_eq!(body["age"], 35);
    assert_eq!(body["gender"], "male");
    assert_eq!(body["nationality"], "RU");
    assert!(body["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_get_missing_person_is_404() {
    let app = zahar_app().await;
    let (status, body) = send(&app.router, Method::GET, "/api/people/42", b"").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Person not found", "code": "NOT_FOUND"}));
}

#[tokio::test]
async fn test_invalid_id_is_400() {
    let app = zahar_app().await;
    let (status, body) = send(&app.router, Method::GET, "/api/people/abc", b"").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ID");
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let app = zahar_app().await;
    let (status, body) = send(&app.router, Method::POST, "/api/people", b"{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON format"));
}

#[tokio::test]
async fn test_missing_surname_is_400() {
    let app = zahar_app().await;
    let (status, _) = send_json(&app.router, Method::POST, "/api/people", json!({"name": "Zahar"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.repository.all().is_empty());
}

#[tokio::test]
async fn test_enrichment_failure_is_500_and_stores_nothing() {
    let server = MockServer::start().await;
    mount_provider(&server, AttributeKind::Age, "Xyzzy", json!({"age": 30})).await;
    mount_provider(&server, AttributeKind::Gender, "Xyzzy", json!({"gender": null})).await;
    mount_provider(&server, AttributeKind::Nationality, "Xyzzy", json!({"country": [{"country_id": "FI"}]})).await;
    let app = test_app(server).await;

    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/api/people",
        json!({"name": "Xyzzy", "surname": "Plugh"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "ENRICHMENT_ERROR");
    assert!(body["error"].as_str().unwrap().starts_with("Error enriching person data"));
    assert!(app.repository.all().is_empty());
}

#[tokio::test]
async fn test_get_and_find_by_name() {
    let app = zahar_app().await;
    let id = create_zahar(&app).await;

    let (status, body) = send(&app.router, Method::GET, &format!("/api/people/{id}"), b"").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);

    let (status, body) = send(&app.router, Method::GET, "/api/people?name=Zahar", b"").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);

    let (status, _) = send(&app.router, Method::GET, "/api/people?name=Nobody", b"").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app.router, Method::GET, "/api/people", b"").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_replaces_record() {
    let app = zahar_app().await;
    let id = create_zahar(&app).await;

    let (status, body) = send_json(
        &app.router,
        Method::PUT,
        &format!("/api/people/{id}"),
        json!({"name": "Zahar", "surname": "Petrov", "age": 36, "gender": "male", "nationality": "KZ"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["surname"], "Petrov");
    assert_eq!(body["patronymic"], Value::Null);
    assert_eq!(body["nationality"], "KZ");

    let stored = app.repository.get(id).await.unwrap().unwrap();
    assert_eq!(stored.age, 36);
}

#[tokio::test]
async fn test_update_errors() {
    let app = zahar_app().await;
    let replacement = json!({"name": "A", "surname": "B", "age": 1, "gender": "female", "nationality": "US"});

    let (status, _) = send_json(&app.router, Method::PUT, "/api/people/999", replacement).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = create_zahar(&app).await;
    let (status, _) = send_json(
        &app.router,
        Method::PUT,
        &format!("/api/people/{id}"),
        json!({"name": "Zahar"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_404() {
    let app = zahar_app().await;
    let id = create_zahar(&app).await;
    let uri = format!("/api/people/{id}");

    let (status, body) = send(&app.router, Method::DELETE, &uri, b"").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Person deleted successfully"}));

    let (status, _) = send(&app.router, Method::DELETE, &uri, b"").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app.router, Method::GET, &uri, b"").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_graphql_create_then_query() {
    let app = zahar_app().await;

    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/graphql",
        json!({
            "query": "mutation { createPerson(name: \"Zahar\", surname: \"Ivanov\") { id age gender nationality } }"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let created = &body["data"]["createPerson"];
    assert_eq!(created["age"], 35);
    assert_eq!(created["gender"], "male");
    assert_eq!(created["nationality"], "RU");
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/graphql",
        json!({
            "query": "query Get($id: Int!) { person(id: $id) { name surname patronymic } }",
            "variables": {"id": id}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["person"],
        json!({"name": "Zahar", "surname": "Ivanov", "patronymic": null})
    );
}

#[tokio::test]
async fn test_graphql_create_trims_names() {
    let app = zahar_app().await;

    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/graphql",
        json!({
            "query": "mutation { createPerson(name: \"  Zahar \", surname: \"Ivanov \", patronymic: \" \") { name surname patronymic age } }"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(
        body["data"]["createPerson"],
        json!({"name": "Zahar", "surname": "Ivanov", "patronymic": null, "age": 35})
    );
}

#[tokio::test]
async fn test_graphql_update_and_delete() {
    let app = zahar_app().await;
    let id = create_zahar(&app).await;

    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/graphql",
        json!({
            "query": format!("mutation {{ updatePerson(id: {id}, surname: \"Sidorov\", patronymic: \"\") {{ surname patronymic age }} }}")
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(
        body["data"]["updatePerson"],
        json!({"surname": "Sidorov", "patronymic": null, "age": 35})
    );

    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/graphql",
        json!({"query": format!("mutation {{ deletePerson(id: {id}) }}")}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletePerson"], true);
    assert!(app.repository.all().is_empty());
}

#[tokio::test]
async fn test_graphql_update_rejects_blank_fields() {
    let app = zahar_app().await;
    let id = create_zahar(&app).await;

    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/graphql",
        json!({
            "query": format!("mutation {{ updatePerson(id: {id}, name: \"\", gender: \"\") {{ name gender }} }}")
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["errors"][0]["message"],
        "name, surname, gender and nationality cannot be empty"
    );

    let stored = app.repository.get(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Zahar");
    assert_eq!(stored.gender, "male");
}

#[tokio::test]
async fn test_update_with_blank_name_is_400_on_both_surfaces() {
    let app = zahar_app().await;
    let id = create_zahar(&app).await;

    let (status, body) = send_json(
        &app.router,
        Method::PUT,
        &format!("/api/people/{id}"),
        json!({"name": "  ", "surname": "Ivanov", "age": 35, "gender": "male", "nationality": "RU"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    let (status, _) = send_json(
        &app.router,
        Method::POST,
        "/graphql",
        json!({"query": format!("mutation {{ updatePerson(id: {id}, nationality: \" \") {{ id }} }}")}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.repository.get(id).await.unwrap().unwrap().nationality, "RU");
}

#[tokio::test]
async fn test_graphql_missing_person_is_error() {
    let app = zahar_app().await;

    let (status, body) = send_json(
        &app.router,
        Method::POST,
        "/graphql",
        json!({"query": "{ person(id: 42) { id } }"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["errors"][0]["message"], "Person not found");
}

#[tokio::test]
async fn test_publish_to_topic() {
    let app = zahar_app().await;
    let payload = br#"{"name":"Zahar","surname":"Ivanov"}"#;

    let (status, body) = send(&app.router, Method::POST, "/api/topics/FIO/messages", payload).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, json!({"topic": "FIO", "partition": 0, "offset": 0}));

    let (status, body) = send(&app.router, Method::POST, "/api/topics/FIO/messages", payload).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["offset"], 1);

    let stored = app.log.fetch("FIO", 0, 0, 10).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].payload, payload.to_vec());

    let (status, _) = send(&app.router, Method::POST, "/api/topics/FIO/messages", b"").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
