//! JSON API handlers for the dashboard server.

use anyhow::{Context, Result};
use serde::Serialize;
use tiny_http::{Response, StatusCode};

use super::{HttpResponse, json_content, not_found};
use crate::dashboard::{Dashboard, Region, RegionMarkup};

/// Body of `POST /api/refresh`.
#[derive(Serialize)]
struct RefreshResponse {
    success: bool,
    regions: Vec<RegionMarkup>,
}

fn json_response<T: Serialize>(data: &T) -> Result<HttpResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(json_content(Response::from_data(body.into_bytes())).with_status_code(StatusCode(200)))
}

/// `GET /api/regions`: current markup of all five regions.
pub fn get_regions(dashboard: &Dashboard) -> Result<HttpResponse> {
    json_response(&dashboard.snapshot())
}

/// `GET /api/regions/<element id>`
pub fn get_region(dashboard: &Dashboard, id: &str) -> Result<HttpResponse> {
    let Some(region) = Region::from_element_id(id) else {
        return Ok(not_found());
    };
    match dashboard
        .snapshot()
        .into_iter()
        .find(|r| r.id == region.element_id())
    {
        Some(markup) => json_response(&markup),
        None => Ok(not_found()),
    }
}

/// `GET /api/charts`: chart configurations.
pub fn get_charts(dashboard: &Dashboard) -> Result<HttpResponse> {
    json_response(&dashboard.chart_configs())
}

/// `POST /api/refresh`: reload all five regions, including the ones that
/// are not polled. The fetches run concurrently, so the request loop waits
/// for the slowest one only.
pub fn post_refresh(dashboard: &Dashboard) -> Result<HttpResponse> {
    dashboard.load_all();
    json_response(&RefreshResponse {
        success: true,
        regions: dashboard.snapshot(),
    })
}
