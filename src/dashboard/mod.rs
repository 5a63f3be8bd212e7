//! Monitoring Dashboard.
//!
//! Five independent fetch-and-render pairs, one per [`Region`]. Each fetch
//! renders its own region and nothing else; a failure is logged and leaves
//! that region's previous markup in place. Only performance and health are
//! polled; the other three load once (or on an explicit full reload).
//!
//! Fetches may overlap when polling runs them on their own threads. Every
//! fetch takes a ticket from a monotonic [`RequestSequencer`] before the
//! request goes out, and a region ignores any response whose ticket is not
//! newer than the one it last rendered, so a slow stale response can never
//! overwrite a fresher one.

pub mod chart;
pub mod consent;
pub mod metrics;
pub mod render;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::api::BackendClient;
use crate::api::types::{ConsentLog, HealthSnapshot, ModelCard, PerformanceReport, SystemSettings};
use crate::utils::{log, time};
use chart::Chart;
use consent::ConsentTable;
use metrics::{LogField, PerformanceSummary};

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Region {
    Performance,
    ModelCard,
    ConsentLogs,
    Settings,
    Health,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Performance,
        Region::ModelCard,
        Region::ConsentLogs,
        Region::Settings,
        Region::Health,
    ];

    /// DOM id of the region's container.
    pub fn element_id(self) -> &'static str {
        match self {
            Self::Performance => "performanceMetrics",
            Self::ModelCard => "modelCard",
            Self::ConsentLogs => "consentLogs",
            Self::Settings => "systemSettings",
            Self::Health => "systemHealth",
        }
    }

    /// Heading shown above the region.
    pub fn title(self) -> &'static str {
        match self {
            Self::Performance => "Performance Metrics",
            Self::ModelCard => "Model Card",
            Self::ConsentLogs => "Consent Logs",
            Self::Settings => "System Settings",
            Self::Health => "System Health",
        }
    }

    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.element_id() == id)
    }

    /// Whether the refresh timer re-fetches this region.
    pub fn is_polled(self) -> bool {
        matches!(self, Self::Performance | Self::Health)
    }

    fn index(self) -> usize {
        self as usize
    }

    fn resource(self) -> &'static str {
        match self {
            Self::Performance => "monitoring data",
            Self::ModelCard => "model card",
            Self::ConsentLogs => "consent logs",
            Self::Settings => "settings",
            Self::Health => "system health",
        }
    }
}

// ---------------------------------------------------------------------------
// Sequencing
// ---------------------------------------------------------------------------

/// Hands out strictly increasing request tickets, starting at 1.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    last: AtomicU64,
}

impl RequestSequencer {
    pub fn next(&self) -> u64 {
        self.last.fetch_add(1, Ordering::SeqCst) + 1
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Current content of one region.
#[derive(Debug, Clone, Default)]
pub struct RegionSlot {
    pub markup: String,
    /// Ticket of the response that produced `markup`; 0 before first render.
    pub applied_seq: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Rendered regions plus the retained charts.
#[derive(Debug)]
pub struct DashboardState {
    slots: [RegionSlot; 5],
    confidence_chart: Chart,
    processing_chart: Chart,
    offset: FixedOffset,
}

impl DashboardState {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            slots: Default::default(),
            confidence_chart: Chart::confidence(),
            processing_chart: Chart::processing_time(),
            offset,
        }
    }

    pub fn slot(&self, region: Region) -> &RegionSlot {
        &self.slots[region.index()]
    }

    pub fn markup(&self, region: Region) -> &str {
        &self.slot(region).markup
    }

    pub fn confidence_chart(&self) -> &Chart {
        &self.confidence_chart
    }

    pub fn processing_chart(&self) -> &Chart {
        &self.processing_chart
    }

    fn is_fresh(&self, region: Region, seq: u64) -> bool {
        seq > self.slot(region).applied_seq
    }

    fn store(&mut self, region: Region, seq: u64, markup: String) {
        self.slots[region.index()] = RegionSlot {
            markup,
            applied_seq: seq,
            updated_at: Some(Utc::now()),
        };
    }

    /// Update both charts in place and re-render the summary block.
    pub fn apply_performance(&mut self, seq: u64, report: &PerformanceReport) -> bool {
        if !self.is_fresh(Region::Performance, seq) {
            return false;
        }
        let summary = PerformanceSummary::from_report(report);
        let offset = self.offset;
        self.confidence_chart
            .update_series(chart::series_from_logs(&report.logs, LogField::Confidence, &offset));
        self.processing_chart.update_series(chart::series_from_logs(
            &report.logs,
            LogField::ProcessingTime,
            &offset,
        ));
        let markup = render::performance(&summary, &self.confidence_chart, &self.processing_chart);
        self.store(Region::Performance, seq, markup);
        true
    }

    pub fn apply_model_card(&mut self, seq: u64, card: &ModelCard) -> bool {
        if !self.is_fresh(Region::ModelCard, seq) {
            return false;
        }
        self.store(Region::ModelCard, seq, render::model_card(card));
        true
    }

    /// Expiry and status are judged against `now`.
    pub fn apply_consent_logs(&mut self, seq: u64, log: &ConsentLog, now: DateTime<Utc>) -> bool {
        if !self.is_fresh(Region::ConsentLogs, seq) {
            return false;
        }
        let table = ConsentTable::build(&log.records, now, &self.offset);
        let markup = render::consent_logs(&table, &self.offset);
        self.store(Region::ConsentLogs, seq, markup);
        true
    }

    pub fn apply_settings(&mut self, seq: u64, settings: &SystemSettings) -> bool {
        if !self.is_fresh(Region::Settings, seq) {
            return false;
        }
        self.store(Region::Settings, seq, render::settings(settings));
        true
    }

    pub fn apply_health(&mut self, seq: u64, snapshot: &HealthSnapshot) -> bool {
        if !self.is_fresh(Region::Health, seq) {
            return false;
        }
        let markup = render::health(snapshot, &self.offset);
        self.store(Region::Health, seq, markup);
        true
    }
}

/// One region's markup as served to the browser.
#[derive(Debug, Clone, Serialize)]
pub struct RegionMarkup {
    pub id: &'static str,
    pub title: &'static str,
    pub markup: String,
    pub revision: u64,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Shared handle to the dashboard; clones see the same state.
#[derive(Debug, Clone)]
pub struct Dashboard {
    client: BackendClient,
    state: Arc<Mutex<DashboardState>>,
    sequencer: Arc<RequestSequencer>,
}

impl Dashboard {
    pub fn new(client: BackendClient) -> Self {
        Self::with_offset(client, time::local_offset())
    }

    /// Render dates and times in `offset`.
    pub fn with_offset(client: BackendClient, offset: FixedOffset) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(DashboardState::new(offset))),
            sequencer: Arc::new(RequestSequencer::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the current state under the lock.
    pub fn with_state<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        f(&self.lock())
    }

    /// Fetch and render performance logs. Returns whether the region was
    /// re-rendered.
    pub fn fetch_monitoring_data(&self) -> bool {
        let seq = self.sequencer.next();
        match self.client.performance() {
            Ok(report) => self.lock().apply_performance(seq, &report),
            Err(e) => self.fetch_failed(Region::Performance, &e),
        }
    }

    pub fn fetch_model_card(&self) -> bool {
        let seq = self.sequencer.next();
        match self.client.model_card() {
            Ok(card) => self.lock().apply_model_card(seq, &card),
            Err(e) => self.fetch_failed(Region::ModelCard, &e),
        }
    }

    pub fn fetch_consent_logs(&self) -> bool {
        let seq = self.sequencer.next();
        match self.client.consent_logs() {
            Ok(log) => self.lock().apply_consent_logs(seq, &log, Utc::now()),
            Err(e) => self.fetch_failed(Region::ConsentLogs, &e),
        }
    }

    pub fn fetch_settings(&self) -> bool {
        let seq = self.sequencer.next();
        match self.client.settings() {
            Ok(settings) => self.lock().apply_settings(seq, &settings),
            Err(e) => self.fetch_failed(Region::Settings, &e),
        }
    }

    pub fn check_system_health(&self) -> bool {
        let seq = self.sequencer.next();
        match self.client.health() {
            Ok(snapshot) => self.lock().apply_health(seq, &snapshot),
            Err(e) => self.fetch_failed(Region::Health, &e),
        }
    }

    pub fn fetch(&self, region: Region) -> bool {
        match region {
            Region::Performance => self.fetch_monitoring_data(),
            Region::ModelCard => self.fetch_model_card(),
            Region::ConsentLogs => self.fetch_consent_logs(),
            Region::Settings => self.fetch_settings(),
            Region::Health => self.check_system_health(),
        }
    }

    /// Page-load fetch of all five regions. The fetches run concurrently
    /// and this returns once every one has finished, so an unreachable
    /// backend costs one request timeout rather than five.
    pub fn load_all(&self) {
        for handle in self.spawn_fetches(Region::ALL) {
            let _ = handle.join();
        }
    }

    /// One timer tick: re-fetch the polled regions.
    pub fn refresh(&self) {
        for region in Region::ALL.into_iter().filter(|r| r.is_polled()) {
            self.fetch(region);
        }
    }

    /// One timer tick with each polled fetch on its own thread, so a slow
    /// endpoint does not hold back the others.
    pub fn spawn_refresh(&self) -> Vec<JoinHandle<bool>> {
        self.spawn_fetches(Region::ALL.into_iter().filter(|r| r.is_polled()))
    }

    fn spawn_fetches(&self, regions: impl IntoIterator<Item = Region>) -> Vec<JoinHandle<bool>> {
        regions
            .into_iter()
            .map(|region| {
                let dashboard = self.clone();
                thread::spawn(move || dashboard.fetch(region))
            })
            .collect()
    }

    /// Start the refresh timer. Ticks do not wait for earlier ticks to
    /// finish; the sequencer keeps late responses from rendering.
    pub fn start_polling(&self, interval: Duration) -> Poller {
        let stop = Arc::new(AtomicBool::new(false));
        let dashboard = self.clone();
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !flag.load(Ordering::SeqCst) {
                thread::sleep(interval);
                if flag.load(Ordering::SeqCst) {
                    break;
                }
                // Detached: a slow fetch finishes on its own.
                drop(dashboard.spawn_refresh());
            }
        });
        Poller { stop, handle }
    }

    /// Current markup of every region, in display order.
    pub fn snapshot(&self) -> Vec<RegionMarkup> {
        let state = self.lock();
        Region::ALL
            .into_iter()
            .map(|region| {
                let slot = state.slot(region);
                RegionMarkup {
                    id: region.element_id(),
                    title: region.title(),
                    markup: slot.markup.clone(),
                    revision: slot.applied_seq,
                }
            })
            .collect()
    }

    /// Chart configurations for a browser-side charting library.
    pub fn chart_configs(&self) -> Vec<serde_json::Value> {
        let state = self.lock();
        vec![
            state.confidence_chart().to_config(),
            state.processing_chart().to_config(),
        ]
    }

    fn fetch_failed(&self, region: Region, error: &crate::api::ApiError) -> bool {
        log::error(&format!("Error fetching {}: {error}", region.resource()));
        false
    }
}

/// Handle to the refresh timer thread.
#[derive(Debug)]
pub struct Poller {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Stop ticking and wait for the timer thread to exit. Fetches already
    /// in flight are not waited for.
    pub fn stop(self) {
        self.stop.store(true, Ordering::SeqCst);
        let _ = self.handle.join();
    }
}
