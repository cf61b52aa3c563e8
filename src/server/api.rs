use crate::agent::TurnHandler;
use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
    extract::{State, Form},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

/// Twilio messaging webhook fields we consume; everything else is ignored.
#[derive(Deserialize, Debug)]
pub struct WebhookForm {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Body")]
    pub body: String,
}

#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<TurnHandler>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home_handler))
        .route("/webhook", post(webhook_handler))
        .layer(cors)
        .with_state(state)
}

async fn home_handler() -> impl IntoResponse {
    Json(json!({
        "status": "running",
        "message": "Welcome to the chat relay API",
        "endpoints": {
            "webhook": "/webhook (POST)"
        }
    }))
}

async fn webhook_handler(
    State(state): State<AppState>,
    Form(form): Form<WebhookForm>,
) -> impl IntoResponse {
    state.handler.handle(&form.from, &form.body).await
}
