//! Integration tests for the NTP Core API HTTP surface.
//!
//! The real router is spawned on an ephemeral port with in-memory fake
//! stores, then driven over HTTP with reqwest. Outage scenarios flip the
//! fakes into a failing mode to verify every route degrades to a JSON
//! error response without terminating the server.

use async_trait::async_trait;
use mongodb::bson::{DateTime, Document, doc, oid::ObjectId};
use ntp_core_api::config::AppConfig;
use ntp_core_api::error::RepositoryError;
use ntp_core_api::models::User;
use ntp_core_api::repositories::{NewUser, SocialImpactStore, UserStore};
use ntp_core_api::server::{AppState, create_app};
use reqwest::Client;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use tokio::net::TcpListener;

fn outage() -> RepositoryError {
    RepositoryError::Database(mongodb::error::Error::custom("simulated outage"))
}

/// In-memory user store with a switchable outage mode.
#[derive(Default)]
struct FakeUserStore {
    users: Mutex<Vec<User>>,
    fail: AtomicBool,
}

#[async_trait]
impl UserStore for FakeUserStore {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(outage());
        }
        Ok(self.users.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, RepositoryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(outage());
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == id)
            .cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(outage());
        }

        let mut users = self.users.lock().unwrap();
        if let Some(ref email) = new_user.email
            && users.iter().any(|user| user.email.as_ref() == Some(email))
        {
            return Err(RepositoryError::DuplicateKey);
        }

        let user = User {
            id: ObjectId::new(),
            name: new_user.name,
            email: new_user.email,
            created_at: DateTime::now(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

/// In-memory social impact store with a switchable outage mode.
#[derive(Default)]
struct FakeSocialImpactStore {
    jobs: Mutex<Vec<Document>>,
    alerts: Mutex<Vec<Document>>,
    fail: AtomicBool,
}

#[async_trait]
impl SocialImpactStore for FakeSocialImpactStore {
    async fn latest_jobs(&self) -> Result<Vec<Document>, RepositoryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(outage());
        }
        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn pending_alerts(&self) -> Result<Vec<Document>, RepositoryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(outage());
        }
        Ok(self.alerts.lock().unwrap().clone())
    }
}

struct TestServer {
    base_url: String,
    users: Arc<FakeUserStore>,
    social: Arc<FakeSocialImpactStore>,
}

/// Helper function to start the server on a random port with fake stores
async fn start_test_server() -> TestServer {
    let users = Arc::new(FakeUserStore::default());
    let social = Arc::new(FakeSocialImpactStore::default());

    let state = AppState {
        config: Arc::new(AppConfig::default()),
        users: users.clone(),
        social: social.clone(),
    };

    let app = create_app(state);
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{}", addr),
        users,
        social,
    }
}

#[tokio::test]
async fn test_root_returns_200_regardless_of_database_state() {
    let server = start_test_server().await;
    server.users.fail.store(true, Ordering::SeqCst);
    let client = Client::new();

    let response = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert_eq!(body, "NTP AI Core API V2 is Online and ready to serve");
}

#[tokio::test]
async fn test_list_users_response_shape() {
    let server = start_test_server().await;
    let client = Client::new();

    client
        .post(format!("{}/api/v1/users", server.base_url))
        .json(&json!({ "name": "Somchai P.", "email": "somchai@example.com" }))
        .send()
        .await
        .unwrap();

    let response = client
        .get(format!("{}/api/v1/users", server.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["count"], 1);
    assert_eq!(body["users"][0]["name"], "Somchai P.");
}

#[tokio::test]
async fn test_created_user_is_fetchable_by_returned_id() {
    let server = start_test_server().await;
    let client = Client::new();

    let created: Value = client
        .post(format!("{}/api/v1/users", server.base_url))
        .json(&json!({ "name": "Somchai P.", "email": "somchai@example.com" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let id = created["_id"].as_str().expect("created user has hex id");

    let response = client
        .get(format!("{}/api/v1/users/{}", server.base_url, id))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let fetched: Value = response.json().await.unwrap();
    assert_eq!(fetched["name"], "Somchai P.");
    assert_eq!(fetched["email"], "somchai@example.com");
    assert_eq!(fetched["_id"], created["_id"]);
}

#[tokio::test]
async fn test_create_user_returns_201_with_timestamp() {
    let server = start_test_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/v1/users", server.base_url))
        .json(&json!({ "name": "Somchai P." }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    assert!(body["createdAt"].as_str().is_some());
    // No email supplied, none echoed back.
    assert!(body.get("email").is_none());
}

#[tokio::test]
async fn test_create_user_without_name_is_400() {
    let server = start_test_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/v1/users", server.base_url))
        .json(&json!({ "email": "no-name@example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "name is required" }));
}

#[tokio::test]
async fn test_duplicate_email_conflicts_without_corrupting_first_record() {
    let server = start_test_server().await;
    let client = Client::new();

    let first: Value = client
        .post(format!("{}/api/v1/users", server.base_url))
        .json(&json!({ "name": "First", "email": "shared@example.com" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let second = client
        .post(format!("{}/api/v1/users", server.base_url))
        .json(&json!({ "name": "Second", "email": "shared@example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(second.status(), 409);

    let id = first["_id"].as_str().unwrap();
    let fetched: Value = client
        .get(format!("{}/api/v1/users/{}", server.base_url, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["name"], "First");
}

#[tokio::test]
async fn test_get_user_with_malformed_id_is_400_not_500() {
    let server = start_test_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/v1/users/not-an-id", server.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid id" }));
}

#[tokio::test]
async fn test_get_user_with_unknown_id_is_404() {
    let server = start_test_server().await;
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/api/v1/users/{}",
            server.base_url,
            ObjectId::new().to_hex()
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "User not found" }));
}

#[tokio::test]
async fn test_social_impact_with_empty_maintenance_store() {
    let server = start_test_server().await;
    server
        .social
        .jobs
        .lock()
        .unwrap()
        .push(doc! { "title": "route-42", "date": 1 });
    let client = Client::new();

    let response = client
        .get(format!("{}/api/social_impact_data", server.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["latest_jobs"].as_array().unwrap().len(), 1);
    assert_eq!(body["maintenance_alerts"], json!([]));
}

#[tokio::test]
async fn test_database_outage_returns_json_500s_and_server_survives() {
    let server = start_test_server().await;
    server.users.fail.store(true, Ordering::SeqCst);
    server.social.fail.store(true, Ordering::SeqCst);
    let client = Client::new();

    let list = client
        .get(format!("{}/api/v1/users", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(list.status(), 500);
    let list_body: Value = list.json().await.unwrap();
    assert_eq!(list_body["status"], "error");
    assert!(list_body["message"].as_str().is_some());

    let get = client
        .get(format!(
            "{}/api/v1/users/{}",
            server.base_url,
            ObjectId::new().to_hex()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(get.status(), 500);
    let get_body: Value = get.json().await.unwrap();
    assert_eq!(get_body, json!({ "error": "Internal server error" }));

    let create = client
        .post(format!("{}/api/v1/users", server.base_url))
        .json(&json!({ "name": "Somchai P." }))
        .send()
        .await
        .unwrap();
    assert_eq!(create.status(), 500);

    let social = client
        .get(format!("{}/api/social_impact_data", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(social.status(), 500);
    let social_body: Value = social.json().await.unwrap();
    assert_eq!(social_body["status"], "error");

    // Server still answers after the outage; the process did not terminate.
    server.users.fail.store(false, Ordering::SeqCst);
    let root = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(root.status(), 200);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let server = start_test_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/openapi.json", server.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(body["paths"].get("/api/v1/users").is_some());
    assert!(body["paths"].get("/api/social_impact_data").is_some());
}
