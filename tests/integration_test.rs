use std::net::SocketAddr;
use std::sync::Arc;

use automobile_api::{
    handlers,
    messaging::BroadcastTransport,
    models::Automobile,
    repository::{InMemoryAutomobileRepository, SharedStore},
    service::Topics,
    state::AppState,
};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

struct TestApp {
    addr: SocketAddr,
    client: Client,
    transport: Arc<BroadcastTransport>,
}

impl TestApp {
    fn request(&self, method: Method, path: &str, roles: &str) -> RequestBuilder {
        self.client
            .request(method, format!("http://{}/api{}", self.addr, path))
            .header("X-User-Roles", roles)
    }
}

async fn spawn_app() -> TestApp {
    let store: SharedStore = Arc::new(InMemoryAutomobileRepository::new());
    let transport = Arc::new(BroadcastTransport::new());
    let state = AppState::new(store, transport.clone(), Topics::default());
    state.service.seed().await.expect("Failed to seed store");

    let app = handlers::app_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        addr,
        client: Client::new(),
        transport,
    }
}

async fn create(app: &TestApp, name: &str, color: &str) -> Value {
    let response = app
        .request(Method::POST, "/automobiles", "MANAGER")
        .json(&json!({ "name": name, "color": color }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

#[tokio::test]
async fn test_seed_record_is_available_at_startup() {
    let app = spawn_app().await;

    let response = app.request(Method::GET, "/automobiles/1", "USER").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Ford");
    assert_eq!(body["color"], "Green");
    assert_eq!(body["deleted"], false);
}

#[tokio::test]
async fn test_create_assigns_id_and_reads_back_equal() {
    let app = spawn_app().await;

    let created = create(&app, "Tesla", "Red").await;
    let id = created["id"].as_i64().expect("id should be assigned");

    let fetched: Value = app
        .request(Method::GET, &format!("/automobiles/{}", id), "USER")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched["name"], "Tesla");
    assert_eq!(fetched["creationDate"], Value::Null);
}

#[tokio::test]
async fn test_get_unknown_id_returns_not_found() {
    let app = spawn_app().await;

    let response = app.request(Method::GET, "/automobiles/404", "USER").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request(Method::PUT, "/automobiles/404", "MANAGER")
        .json(&json!({ "name": "Ford", "color": "Blue" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_then_soft_delete_then_update_conflicts() {
    let app = spawn_app().await;

    let response = app
        .request(Method::PUT, "/automobiles/1", "MANAGER")
        .json(&json!({ "name": "Ford", "color": "Blue", "updateDate": "2024-06-01T08:00:00Z" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["color"], "Blue");
    assert_eq!(body["updateDate"], "2024-06-01T08:00:00Z");

    let response = app.request(Method::DELETE, "/automobiles/1", "ADMIN").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request(Method::PUT, "/automobiles/1", "MANAGER")
        .json(&json!({ "name": "Ford", "color": "Black" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app.request(Method::GET, "/automobiles/1", "USER").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Soft delete is repeatable and the row is still listed
    let response = app.request(Method::DELETE, "/automobiles/1", "ADMIN").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let all: Vec<Automobile> = app
        .request(Method::GET, "/automobiles", "USER")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].deleted);
    assert_eq!(all[0].color, "Blue");
}

#[tokio::test]
async fn test_delete_all_empties_the_store() {
    let app = spawn_app().await;
    create(&app, "Tesla", "Red").await;

    let response = app.request(Method::DELETE, "/automobiles", "ADMIN").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let all: Vec<Value> = app
        .request(Method::GET, "/automobiles", "USER")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_query_filters() {
    let app = spawn_app().await;
    create(&app, "Tesla", "Red").await;
    create(&app, "Tesla", "Grey").await;
    create(&app, "Audi", "Graphite").await;

    let by_name: Vec<Automobile> = app
        .request(Method::GET, "/automobiles?name=Tesla", "USER")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(by_name.len(), 2);

    let by_color: Vec<Automobile> = app
        .request(Method::GET, "/automobiles?color=Red", "USER")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(by_color.len(), 1);
    assert_eq!(by_color[0].name, "Tesla");

    let both: Vec<Automobile> = app
        .request(Method::GET, "/automobiles?name=Tesla&color=Grey", "USER")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].color, "Grey");

    let prefixed: Vec<Automobile> = app
        .request(Method::GET, "/automobiles?colorStartsWith=Gr&page=0&size=10", "USER")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let colors: Vec<_> = prefixed.iter().map(|a| a.color.as_str()).collect();
    assert_eq!(colors, vec!["Graphite", "Green", "Grey"]);

    let second_page: Vec<Automobile> = app
        .request(Method::GET, "/automobiles?colorStartsWith=Gr&page=1&size=2", "USER")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].color, "Grey");
}

#[tokio::test]
async fn test_names_are_sorted() {
    let app = spawn_app().await;
    create(&app, "Tesla", "Red").await;
    create(&app, "Audi", "Black").await;

    let names: Vec<String> = app
        .request(Method::GET, "/automobiles-names", "USER")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(names, vec!["Audi", "Ford", "Tesla"]);
}

#[tokio::test]
async fn test_publish_create_sends_to_auto_topic() {
    let app = spawn_app().await;
    let mut subscriber = app.transport.subscribe("AutoTopic").unwrap();

    let response = app
        .request(Method::POST, "/message", "MANAGER")
        .json(&json!({ "name": "Tesla", "color": "Red" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Automobile = response.json().await.unwrap();
    let sent: Automobile = serde_json::from_slice(&subscriber.recv().await.unwrap()).unwrap();
    assert_eq!(sent, body);
    assert!(body.id.is_some());
}

#[tokio::test]
async fn test_publish_update_sends_to_update_topic() {
    let app = spawn_app().await;
    let mut subscriber = app.transport.subscribe("UpdateAutoTopic").unwrap();

    let response = app
        .request(Method::POST, "/update-message", "MANAGER")
        .json(&json!({ "id": 1, "name": "Ford", "color": "Blue" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let sent: Automobile = serde_json::from_slice(&subscriber.recv().await.unwrap()).unwrap();
    assert_eq!(sent.color, "Blue");

    let response = app
        .request(Method::POST, "/update-message", "MANAGER")
        .json(&json!({ "id": 77, "name": "Ford", "color": "Blue" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_health_check_should_return_ok() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(format!("http://{}/api/health", app.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}
