// In-process stand-in for the quotation backend, served by axum on a random port

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lumopack_studio_lib::api::ApiClient;
use lumopack_studio_lib::StudioConfig;

#[derive(Debug, Clone, Default)]
pub struct MockSession {
    pub step: u8,
    pub collected: Value,
    pub history: Vec<(String, String)>,
}

#[derive(Default)]
pub struct MockState {
    pub sessions: Mutex<HashMap<String, MockSession>>,
    pub resets: Mutex<Vec<String>>,
    next_id: AtomicUsize,
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockBackend {
    pub fn client(&self) -> ApiClient {
        let config = StudioConfig {
            api_base_url: self.base_url.clone(),
            request_timeout_secs: Some(5),
            ..StudioConfig::default()
        };
        ApiClient::new(&config).unwrap()
    }
}

pub async fn spawn_backend() -> MockBackend {
    let state = Arc::new(MockState::default());
    let app = Router::new()
        .route("/health", get(health))
        .route("/api/chat/message", post(chat_message))
        .route(
            "/api/chat/session/:id",
            get(get_session).delete(delete_session),
        )
        .route("/api/chat/session/:id/history", get(get_history))
        .route("/api/chat/session/:id/reset", post(reset_session))
        .route("/api/pricing/calculate", post(calculate_price))
        .route("/analyze", post(analyze))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        base_url: format!("http://{}", addr),
        state,
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": "Session not found"})),
    )
        .into_response()
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "timestamp": 1_700_000_000.0}))
}

async fn chat_message(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let message = body["message"].as_str().unwrap_or_default().to_string();
    if message == "boom" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "LLM unavailable"})),
        )
            .into_response();
    }
    if message == "garbled" {
        return (StatusCode::OK, "not json").into_response();
    }

    let session_id = match body["session_id"].as_str() {
        Some(id) => id.to_string(),
        None => format!("sess_{}", state.next_id.fetch_add(1, Ordering::SeqCst) + 1),
    };

    let mut sessions = state.sessions.lock().unwrap();
    let session = sessions.entry(session_id.clone()).or_insert_with(|| MockSession {
        step: 1,
        collected: json!({}),
        history: Vec::new(),
    });

    if message.contains("20 30 10") {
        session.step = 6;
        session.collected["dimensions"] = json!({"width": 20, "length": 30, "height": 10});
        session.collected["quantity"] = json!(500);
    } else if message.starts_with("shape ") {
        session.collected["box_type"] = json!(message.trim_start_matches("shape "));
        session.step = session.step.max(3);
    } else {
        session.step = (session.step + 1).min(14);
    }

    let response = format!("Noted: {}", message);
    session.history.push(("user".to_string(), message));
    session.history.push(("assistant".to_string(), response.clone()));

    Json(json!({
        "response": response,
        "session_id": session_id,
        "current_step": session.step,
        "collected_data": session.collected,
        "is_waiting_confirmation": session.step == 6,
        "is_complete": session.step >= 14,
    }))
    .into_response()
}

async fn get_session(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    let sessions = state.sessions.lock().unwrap();
    match sessions.get(&id) {
        Some(session) => Json(json!({
            "session_id": id,
            "current_step": session.step,
            "collected_data": session.collected,
            "message_count": session.history.len(),
            "is_complete": session.step >= 14,
            "created_at": "2026-01-01T00:00:00",
            "last_activity": "2026-01-01T00:05:00",
        }))
        .into_response(),
        None => not_found(),
    }
}

async fn get_history(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let sessions = state.sessions.lock().unwrap();
    let Some(session) = sessions.get(&id) else {
        return not_found();
    };

    let limit = params
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(usize::MAX);
    let skip = session.history.len().saturating_sub(limit);
    let messages: Vec<Value> = session
        .history
        .iter()
        .skip(skip)
        .map(|(role, content)| json!({"role": role, "content": content}))
        .collect();

    Json(json!({
        "session_id": id,
        "message_count": messages.len(),
        "messages": messages,
    }))
    .into_response()
}

async fn reset_session(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    let mut sessions = state.sessions.lock().unwrap();
    let Some(session) = sessions.get_mut(&id) else {
        return not_found();
    };
    *session = MockSession {
        step: 1,
        collected: json!({}),
        history: Vec::new(),
    };
    state.resets.lock().unwrap().push(id.clone());

    Json(json!({"message": "Session reset successfully", "session_id": id})).into_response()
}

async fn delete_session(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    match state.sessions.lock().unwrap().remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}

async fn calculate_price(Json(body): Json<Value>) -> Response {
    let quantity = body["quantity"].as_u64().unwrap_or(0);
    if quantity < 500 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [{"loc": ["body", "quantity"], "msg": "quantity must be at least 500"}]})),
        )
            .into_response();
    }

    let per_box = 12.5;
    let subtotal = per_box * quantity as f64;
    let vat = subtotal * 0.07;
    Json(json!({
        "box_base": subtotal,
        "subtotal": subtotal,
        "vat": vat,
        "grand_total": subtotal + vat,
        "price_per_box": (subtotal + vat) / quantity as f64,
        "breakdown": {"box_type": body["box_type"]},
    }))
    .into_response()
}

async fn analyze(Json(body): Json<Value>) -> Json<Value> {
    let weight = body["weight"].as_f64().unwrap_or(0.0);
    let danger = weight > 20.0;
    Json(json!({
        "status": if danger { "DANGER" } else { "SAFE" },
        "safety_score": if danger { 35 } else { 90 },
        "max_load_kg": 18.0,
        "recommendation": if danger { "Use double wall BC flute" } else { "Current board is sufficient" },
        "flute_type": body["flute_type"],
        "bct_kgf": 240.0,
        "safety_factor": if danger { 0.9 } else { 3.2 },
    }))
}
