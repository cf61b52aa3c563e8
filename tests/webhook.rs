use async_trait::async_trait;
use axum::body::{ to_bytes, Body };
use axum::http::{ header::CONTENT_TYPE, Method, Request, StatusCode };
use chat_relay::agent::{ TurnHandler, FALLBACK_REPLY };
use chat_relay::error::{ CompletionError, StoreError };
use chat_relay::history::{ MemoryMessageStore, MessageStore };
use chat_relay::llm::chat::ChatClient;
use chat_relay::llm::{ CompletionRequest, CompletionResponse };
use chat_relay::models::chat::{ Message, Role };
use chat_relay::server::api::{ router, AppState };
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct CannedChat(Option<&'static str>);

#[async_trait]
impl ChatClient for CannedChat {
    async fn complete(
        &self,
        _request: &CompletionRequest
    ) -> Result<CompletionResponse, CompletionError> {
        match self.0 {
            Some(text) => Ok(CompletionResponse { response: text.to_string() }),
            None => Err(CompletionError::NoChoices),
        }
    }

    fn get_model(&self) -> String {
        "canned".to_string()
    }
}

struct DownStore;

#[async_trait]
impl MessageStore for DownStore {
    async fn insert(&self, _message: &Message) -> Result<(), StoreError> {
        Err(StoreError::ConnectTimeout(Duration::from_secs(5)))
    }

    fn kind(&self) -> &'static str {
        "down"
    }
}

fn app(store: Option<Arc<dyn MessageStore>>, reply: Option<&'static str>) -> axum::Router {
    let handler = TurnHandler::new(store, Arc::new(CannedChat(reply)), Duration::from_secs(5));
    router(AppState { handler: Arc::new(handler) })
}

fn webhook(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/webhook")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, String, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

fn envelope(text: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        text
    )
}

#[tokio::test]
async fn replies_with_twiml_envelope() {
    let (status, content_type, body) = send(
        app(None, Some("  Hello there!  ")),
        webhook("From=whatsapp%3A%2B1555&Body=hi"),
    ).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/xml");
    assert_eq!(body, envelope("Hello there!"));
}

#[tokio::test]
async fn completion_failure_still_returns_200() {
    let (status, content_type, body) = send(app(None, None), webhook("From=%2B1555&Body=hi")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/xml");
    assert_eq!(body, envelope(FALLBACK_REPLY));
}

#[tokio::test]
async fn store_outage_is_invisible_to_caller() {
    let (_, _, healthy) = send(app(None, Some("same")), webhook("From=%2B1555&Body=hi")).await;
    let (status, _, degraded) = send(
        app(Some(Arc::new(DownStore)), Some("same")),
        webhook("From=%2B1555&Body=hi"),
    ).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(healthy, degraded);
}

#[tokio::test]
async fn turn_is_logged_with_trimmed_inbound() {
    let store = Arc::new(MemoryMessageStore::new());
    let (status, _, _) = send(
        app(Some(store.clone()), Some("Hi!")),
        webhook("From=%2B1555&Body=++hello++"),
    ).await;
    assert_eq!(status, StatusCode::OK);

    let logged = store.messages().await;
    assert_eq!(logged.len(), 2);
    assert_eq!(logged[0].sender, "+1555");
    assert_eq!(logged[0].role, Role::User);
    assert_eq!(logged[0].text, "hello");
    assert_eq!(logged[1].role, Role::Assistant);
    assert_eq!(logged[1].text, "Hi!");
}

#[tokio::test]
async fn missing_field_is_a_client_error() {
    let store = Arc::new(MemoryMessageStore::new());
    let (status, _, _) = send(app(Some(store.clone()), Some("x")), webhook("From=%2B1555")).await;

    assert!(status.is_client_error());
    assert!(store.messages().await.is_empty());
}

#[tokio::test]
async fn health_lists_endpoints() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, content_type, body) = send(app(None, None), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("application/json"));
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "running");
    assert_eq!(json["endpoints"]["webhook"], "/webhook (POST)");
    assert!(json["message"].is_string());
}
