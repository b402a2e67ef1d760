//! HTTP interface: the two-tab page and a JSON API over the same sessions.

mod routes;
mod session;
mod tasks;
mod types;
mod ui;

pub use routes::{build_router, serve, AppState};
pub use session::SESSION_COOKIE;
