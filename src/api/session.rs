//! Cookie-based session middleware.
//!
//! - Requests carry the session id in the `task_session` cookie
//! - Missing, malformed or expired ids start a new session
//! - A new session's id is returned with `Set-Cookie`

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use super::routes::AppState;
use crate::session::SharedController;

pub const SESSION_COOKIE: &str = "task_session";

/// Session attached to the current request.
#[derive(Clone)]
pub struct CurrentSession {
    pub id: Uuid,
    pub controller: SharedController,
}

pub async fn attach_session(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let requested = session_id_from_headers(req.headers());
    let session = state.sessions.open(requested).await;

    req.extensions_mut().insert(CurrentSession {
        id: session.id,
        controller: session.controller,
    });

    let mut response = next.run(req).await;

    if session.created {
        match HeaderValue::from_str(&session_cookie(session.id)) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!("Failed to build session cookie: {}", e),
        }
    }

    response
}

fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE).then_some(value)
        })
        .find_map(|value| Uuid::parse_str(value.trim()).ok())
}

pub fn session_cookie(id: Uuid) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

/// Cookie value that removes the session cookie from the browser.
pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
