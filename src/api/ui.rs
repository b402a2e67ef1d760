//! Server-rendered pages: the "New Task" and "View Tasks" tabs.

use axum::{
    extract::{Extension, Form, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    Router,
};
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::routes::AppState;
use super::session::CurrentSession;
use super::tasks::export_tasks;
use crate::session::{
    AnalyzeOutcome, InteractionController, TaskLogEntry, View, EMPTY_INPUT_WARNING,
};
use crate::task::TaskRecord;

const INDEX_TEMPLATE: &str = "index.html";

/// Compiled page templates.
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, include_str!("templates/index.html"))?;
        Ok(Self { env })
    }

    fn render_index(&self, page: &IndexPage<'_>) -> Result<String, minijinja::Error> {
        self.env.get_template(INDEX_TEMPLATE)?.render(page)
    }
}

#[derive(Debug, Serialize)]
struct IndexPage<'a> {
    view: View,
    input: &'a str,
    tasks: Vec<TaskLogEntry>,
    analyzed: Option<&'a TaskRecord>,
    warning: Option<&'static str>,
}

impl<'a> IndexPage<'a> {
    fn new(controller: &'a InteractionController) -> Self {
        Self {
            view: controller.view(),
            input: controller.input(),
            tasks: controller.task_log(),
            analyzed: None,
            warning: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    tab: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    description: String,
}

/// Create the page routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze))
        .route("/clear", post(clear))
        .route("/export.csv", get(export_tasks))
}

fn render(state: &AppState, page: &IndexPage<'_>) -> Result<Html<String>, (StatusCode, String)> {
    state.pages.render_index(page).map(Html).map_err(|e| {
        tracing::error!("Failed to render page: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

/// GET / - show the selected tab.
async fn index(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<CurrentSession>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, (StatusCode, String)> {
    let mut controller = session.controller.lock().await;
    if let Some(view) = query.tab.as_deref().and_then(View::from_tab) {
        controller.select_view(view);
    }

    render(&state, &IndexPage::new(&controller))
}

/// POST /analyze - analyze the submitted description.
async fn analyze(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<AnalyzeForm>,
) -> Result<Html<String>, (StatusCode, String)> {
    let mut controller = session.controller.lock().await;
    controller.set_input(form.description);
    controller.select_view(View::NewTask);

    let outcome = controller.analyze().map_err(|e| {
        tracing::error!(session = %session.id, "Task analysis failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let mut page = IndexPage::new(&controller);
    match &outcome {
        AnalyzeOutcome::Analyzed(record) => page.analyzed = Some(record),
        AnalyzeOutcome::EmptyInput => page.warning = Some(EMPTY_INPUT_WARNING),
    }

    render(&state, &page)
}

/// POST /clear - empty the input and go back to the form.
async fn clear(Extension(session): Extension<CurrentSession>) -> Redirect {
    session.controller.lock().await.clear();
    Redirect::to("/")
}
