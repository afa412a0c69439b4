use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::{Mutex, watch};

use crate::models::appointment::Appointment;
use crate::models::palette::assign_event_colors;
use crate::service::appointment_source::AppointmentSource;
use crate::service::loading_gate::{DEFAULT_BUSY_HOLD, LoadingGate};

#[derive(Debug, Clone, PartialEq)]
pub enum FetchStatus {
    Idle,
    InFlight,
    Loaded,
    Failed(String),
}

/// Windowed appointment cache: fetches the full appointment set once,
/// lazily, and republishes the subset overlapping the visible date window
/// every time the window changes. Consumers observe the published subset,
/// the loading flag, and the fetch status through watch channels instead
/// of being handed into the cache.
#[derive(Clone)]
pub struct SchedulerCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    source: Arc<dyn AppointmentSource>,
    state: Mutex<CacheState>,
    appointments_tx: watch::Sender<Vec<Appointment>>,
    status_tx: watch::Sender<FetchStatus>,
    loading: LoadingGate,
}

#[derive(Default)]
struct CacheState {
    full_set: Option<Vec<Appointment>>,
    visible_window: Vec<NaiveDate>,
    fetch_started: bool,
}

impl SchedulerCache {
    pub fn new(source: Arc<dyn AppointmentSource>) -> Self {
        Self::with_busy_hold(source, DEFAULT_BUSY_HOLD)
    }

    pub fn with_busy_hold(source: Arc<dyn AppointmentSource>, hold: Duration) -> Self {
        let (appointments_tx, _) = watch::channel(Vec::new());
        let (status_tx, _) = watch::channel(FetchStatus::Idle);
        Self {
            inner: Arc::new(CacheInner {
                source,
                state: Mutex::new(CacheState::default()),
                appointments_tx,
                status_tx,
                loading: LoadingGate::new(hold),
            }),
        }
    }

    /// The currently visible subset. A fresh container is published on
    /// every recomputation; previously borrowed snapshots are never
    /// mutated.
    pub fn appointments(&self) -> watch::Receiver<Vec<Appointment>> {
        self.inner.appointments_tx.subscribe()
    }

    pub fn loading(&self) -> watch::Receiver<bool> {
        self.inner.loading.subscribe()
    }

    pub fn fetch_status(&self) -> watch::Receiver<FetchStatus> {
        self.inner.status_tx.subscribe()
    }

    /// Reports that the visible date range changed. The first call kicks
    /// off the one-time feed fetch on its own task and returns without
    /// waiting on it; once the data has landed, every call recomputes the
    /// visible subset synchronously.
    pub async fn on_window_changed(&self, window: Vec<NaiveDate>) {
        if window.is_empty() {
            tracing::debug!("ignoring empty visible window");
            return;
        }

        let mut state = self.inner.state.lock().await;
        state.visible_window = window;

        let Some(full_set) = &state.full_set else {
            // Guard against concurrent window changes re-triggering the
            // fetch while the first one is still in flight.
            if !state.fetch_started {
                state.fetch_started = true;
                drop(state);
                self.spawn_fetch();
            }
            return;
        };

        if full_set.is_empty() {
            // Nothing to show; the prior subset stands.
            return;
        }

        let subset = filter_visible(full_set, &state.visible_window);
        drop(state);
        self.inner.appointments_tx.send_replace(subset);
    }

    fn spawn_fetch(&self) {
        let inner = self.inner.clone();
        tokio::spawn(async move {
            inner.loading.begin();
            inner.status_tx.send_replace(FetchStatus::InFlight);

            let result = inner.source.fetch_all().await;

            let mut state = inner.state.lock().await;
            match result {
                Ok(mut appointments) => {
                    assign_event_colors(&mut appointments);
                    tracing::info!(count = appointments.len(), "appointment feed loaded");
                    state.full_set = Some(appointments);
                    inner.status_tx.send_replace(FetchStatus::Loaded);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "appointment fetch failed");
                    // The feed is fetched once per process lifetime; a
                    // failure degrades to an empty calendar, never a retry.
                    state.full_set = Some(Vec::new());
                    inner.status_tx.send_replace(FetchStatus::Failed(err.to_string()));
                }
            }

            // Recompute against whichever window is current now; window
            // changes that arrived mid-fetch are picked up here.
            if let Some(full_set) = &state.full_set {
                if !full_set.is_empty() && !state.visible_window.is_empty() {
                    let subset = filter_visible(full_set, &state.visible_window);
                    inner.appointments_tx.send_replace(subset);
                }
            }
            drop(state);

            inner.loading.finish().await;
        });
    }
}

/// Keeps every appointment whose start date or end date falls inside
/// `[window.first(), window.last()]`, date-only and inclusive on both
/// ends. Only the endpoint dates are compared: an appointment spanning
/// the whole window with both endpoint dates outside of it is not
/// matched.
pub fn filter_visible(full_set: &[Appointment], window: &[NaiveDate]) -> Vec<Appointment> {
    let (Some(first), Some(last)) = (window.first(), window.last()) else {
        return Vec::new();
    };

    full_set
        .iter()
        .filter(|appointment| {
            let start = appointment.start_time.date();
            let end = appointment.end_time.date();
            (*first <= start && *last >= start) || (*first <= end && *last >= end)
        })
        .cloned()
        .collect()
}
