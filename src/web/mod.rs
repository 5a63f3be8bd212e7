//! Embedded web server for the monitoring dashboard.
//!
//! A sync `tiny_http` server that serves:
//! - the dashboard page, which polls the region markup and swaps it in;
//! - JSON endpoints for region markup, chart configuration, and a full reload;
//! - a static snapshot page with the current markup inlined.
//!
//! Launched via `facewatch dashboard` (default: `http://127.0.0.1:9747`).

mod api;
pub mod frontend;

use std::io::Cursor;
use std::time::Duration;

use anyhow::Result;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::dashboard::Dashboard;
use crate::utils::{log, process};

pub(crate) type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Bind `addr`, load every region, start polling, and serve until the
/// process is stopped.
pub fn serve(dashboard: &Dashboard, addr: &str, open: bool, interval: Duration) -> Result<()> {
    let server = bind(addr)?;
    let url = match server.server_addr().to_ip() {
        Some(bound) => format!("http://{bound}"),
        None => format!("http://{addr}"),
    };

    println!("facewatch dashboard running at {url}");
    println!("Press Ctrl+C to stop.\n");
    log::info(&format!("dashboard listening on {url}"));

    dashboard.load_all();
    let poller = dashboard.start_polling(interval);

    if open && let Err(e) = process::open_browser(&url) {
        log::warn(&format!("could not open browser: {e:#}"));
    }

    handle_requests(&server, dashboard, interval);
    poller.stop();
    Ok(())
}

pub fn bind(addr: &str) -> Result<Server> {
    Server::http(addr).map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))
}

/// Answer requests one at a time until the server shuts down.
///
/// Handlers only read the shared dashboard state (except the manual
/// refresh), so a sequential loop is enough for a local viewer.
pub fn handle_requests(server: &Server, dashboard: &Dashboard, interval: Duration) {
    let refresh_ms = interval.as_millis();

    for request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let response = match dispatch(dashboard, &method, &url, refresh_ms) {
            Ok(resp) => resp,
            Err(e) => {
                log::error(&format!("{method} {url} failed: {e:#}"));
                let body = serde_json::json!({ "error": e.to_string() }).to_string();
                with_content_type(Response::from_data(body.into_bytes()), JSON)
                    .with_status_code(StatusCode(500))
            }
        };
        let _ = request.respond(response);

        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub(crate) fn dispatch(
    dashboard: &Dashboard,
    method: &Method,
    url: &str,
    refresh_ms: u128,
) -> Result<HttpResponse> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => {
            Ok(html_response(frontend::index_html(refresh_ms)))
        }
        (&Method::Get, "/snapshot.html") => Ok(html_response(frontend::render_snapshot_page(
            &dashboard.snapshot(),
        ))),

        (&Method::Get, "/api/regions") => api::get_regions(dashboard),
        (&Method::Get, "/api/charts") => api::get_charts(dashboard),
        (&Method::Post, "/api/refresh") => api::post_refresh(dashboard),
        (&Method::Get, p) if p.starts_with("/api/regions/") => {
            api::get_region(dashboard, &p["/api/regions/".len()..])
        }

        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

const JSON: &str = "application/json; charset=utf-8";
const HTML: &str = "text/html; charset=utf-8";

fn html_response(html: String) -> HttpResponse {
    with_content_type(Response::from_data(html.into_bytes()), HTML)
        .with_status_code(StatusCode(200))
}

pub(crate) fn not_found() -> HttpResponse {
    let body = r#"{"error": "not found"}"#;
    with_content_type(Response::from_data(body.as_bytes().to_vec()), JSON)
        .with_status_code(StatusCode(404))
}

pub(crate) fn json_content(resp: HttpResponse) -> HttpResponse {
    with_content_type(resp, JSON)
}

fn with_content_type(resp: HttpResponse, value: &str) -> HttpResponse {
    match Header::from_bytes("Content-Type", value) {
        Ok(header) => resp.with_header(header),
        Err(()) => resp,
    }
}
