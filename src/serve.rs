//! HTTP server for interactive mode
//!
//! `biodash serve` → starts server, opens browser, the page asks the server
//! for each selected sample and the server re-runs the dashboard cycle.

use crate::config::DashboardConfig;
use crate::dashboard::{CycleOutcome, Dashboard};
use crate::error::{DashError, Result};
use crate::report::html;
use crate::selector::SelectionChanged;
use crate::source;
use crate::view::PageState;
use serde::{Deserialize, Serialize};
use tiny_http::{Header, Method, Request, Response, Server};
use tokio::runtime::Runtime;
use tracing::{info, warn};

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }
}

impl ApiResponse<()> {
    fn failure(error: impl ToString) -> Self {
        Self { ok: false, data: None, error: Some(error.to_string()) }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ViewParams {
    #[serde(default)]
    pub sample: Option<String>,
}

/// A routed response, before it is written to the socket
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_string(value)
            .unwrap_or_else(|e| format!(r#"{{"ok":false,"data":null,"error":"{}"}}"#, e));
        Self { status, content_type: "application/json", body }
    }

    fn html(body: String) -> Self {
        Self { status: 200, content_type: "text/html; charset=utf-8", body }
    }

    fn not_found() -> Self {
        Self { status: 404, content_type: "text/plain", body: "Not found".to_string() }
    }
}

/// Dashboard state behind the HTTP API
pub struct DashboardServer {
    runtime: Runtime,
    dashboard: Dashboard<PageState>,
}

impl DashboardServer {
    pub fn new(config: DashboardConfig) -> Result<Self> {
        let runtime = Runtime::new()?;
        let source = source::from_config(&config)?;
        let dashboard = Dashboard::new(config, source, PageState::default());
        Ok(Self { runtime, dashboard })
    }

    /// Run startup unless it already succeeded
    fn ensure_started(&self) -> Result<()> {
        let selector = self.dashboard.config().targets.selector.clone();
        if self.dashboard.surface().dropdown(&selector).is_some() {
            return Ok(());
        }
        let outcome = self.runtime.block_on(self.dashboard.startup())?;
        info!(?outcome, "startup complete");
        Ok(())
    }

    fn names(&self) -> Result<Vec<String>> {
        self.ensure_started()?;
        let selector = &self.dashboard.config().targets.selector;
        Ok(self
            .dashboard
            .surface()
            .dropdown(selector)
            .map(|d| d.options.iter().map(|o| o.value.clone()).collect())
            .unwrap_or_default())
    }

    fn view(&self, params: ViewParams) -> Result<PageState> {
        self.ensure_started()?;
        let sample = match params.sample.or_else(|| self.dashboard.selected()) {
            Some(s) => s,
            None => return Ok(self.dashboard.surface().clone()),
        };
        let outcome = self
            .runtime
            .block_on(self.dashboard.on_selection_change(SelectionChanged::new(sample)))?;
        if let CycleOutcome::Superseded { .. } = outcome {
            warn!(?outcome, "selection superseded");
        }
        Ok(self.dashboard.surface().clone())
    }

    /// Route one request
    pub fn route(&self, method: &Method, url: &str) -> Reply {
        let mut parts = url.splitn(2, '?');
        let path = parts.next().unwrap_or("/");
        let query = parts.next().unwrap_or("");

        match (method, path) {
            (&Method::Get, "/") => Reply::html(html::live_page(&self.dashboard.config().targets)),

            (&Method::Get, "/api/health") => Reply::json(200, &ApiResponse::success("ok")),

            (&Method::Get, "/api/names") => match self.names() {
                Ok(names) => Reply::json(200, &ApiResponse::success(names)),
                Err(e) => upstream_failure(e),
            },

            (&Method::Get, "/api/view") => {
                let params = match serde_urlencoded::from_str::<ViewParams>(query) {
                    Ok(p) => p,
                    Err(e) => return Reply::json(400, &ApiResponse::failure(e)),
                };
                match self.view(params) {
                    Ok(page) => Reply::json(200, &ApiResponse::success(page)),
                    Err(e) => upstream_failure(e),
                }
            }

            _ => Reply::not_found(),
        }
    }
}

fn upstream_failure(e: DashError) -> Reply {
    warn!(error = %e, "request failed");
    Reply::json(502, &ApiResponse::failure(e))
}

/// Start server, open browser, serve UI
pub fn start(port: u16, config: DashboardConfig, open_browser: bool) -> Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr).map_err(|e| DashError::Server(e.to_string()))?;
    let state = DashboardServer::new(config)?;

    let url = format!("http://localhost:{}", port);
    eprintln!("\n\x1b[1;32mBelly Button Biodiversity\x1b[0m");
    eprintln!("   {}", url);
    eprintln!("   Dataset: {}\n", source_label(state.dashboard.config()));

    if let Err(e) = state.ensure_started() {
        warn!(error = %e, "initial fetch failed, will retry on first page load");
    }

    if open_browser {
        let _ = open::that(&url);
    }

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(&state, request) {
            warn!(error = %e, "failed to write response");
        }
    }

    Ok(())
}

fn handle_request(state: &DashboardServer, request: Request) -> std::io::Result<()> {
    let reply = state.route(request.method(), request.url());
    info!(method = %request.method(), url = %request.url(), status = reply.status, "request");

    let response = Response::from_string(reply.body)
        .with_status_code(reply.status)
        .with_header(
            Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes())
                .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "bad header"))?,
        );
    request.respond(response)
}

fn source_label(config: &DashboardConfig) -> String {
    match &config.dataset_file {
        Some(path) => path.display().to_string(),
        None => config.dataset_url.clone(),
    }
}
