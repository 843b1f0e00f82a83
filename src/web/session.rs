//! Cookie-backed browser sessions
//!
//! Each browser gets a `sessionid` cookie holding a v4 uuid. Session data lives
//! in memory on the server and is lost on restart. A session is stored, and its
//! cookie sent, only once a handler writes to it; reads of a session that was
//! never written see the defaults.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::AppState;

pub const SESSION_COOKIE: &str = "sessionid";

/// Per-browser state
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SessionData {
    pub streaming: bool,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionData>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, id: &Uuid) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    pub async fn get(&self, id: &Uuid) -> SessionData {
        self.sessions.read().await.get(id).cloned().unwrap_or_default()
    }

    pub async fn update<F>(&self, id: Uuid, f: F)
    where
        F: FnOnce(&mut SessionData),
    {
        let mut sessions = self.sessions.write().await;
        let data = sessions.entry(id).or_insert_with(|| {
            log::debug!("Created session {}", id);
            SessionData::default()
        });
        f(data);
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Handle to the current request's session, inserted by [`session_layer`].
#[derive(Clone)]
pub struct Session {
    id: Uuid,
    store: Arc<SessionStore>,
}

impl Session {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn streaming(&self) -> bool {
        self.store.get(&self.id).await.streaming
    }

    pub async fn set_streaming(&self, streaming: bool) {
        self.store.update(self.id, |data| data.streaming = streaming).await;
        log::debug!("Session {} streaming={}", self.id, streaming);
    }
}

/// Extract the session id from `Cookie` headers, if any parses as a uuid.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

fn session_cookie(id: Uuid) -> String {
    format!("{}={}; HttpOnly; Path=/; SameSite=Lax", SESSION_COOKIE, id)
}

/// Middleware resolving the session for every request. Requests without a
/// known cookie get a fresh id that is only kept if the handler writes to it.
pub async fn session_layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let store = state.sessions.clone();

    let mut existing = session_id_from_headers(req.headers());
    if let Some(id) = existing {
        if !store.contains(&id).await {
            existing = None;
        }
    }
    let is_new = existing.is_none();
    let id = existing.unwrap_or_else(Uuid::new_v4);

    req.extensions_mut().insert(Session {
        id,
        store: store.clone(),
    });
    let mut response = next.run(req).await;

    if is_new && store.contains(&id).await {
        match HeaderValue::from_str(&session_cookie(id)) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => log::warn!("Failed to build session cookie: {}", e),
        }
    }

    response
}
