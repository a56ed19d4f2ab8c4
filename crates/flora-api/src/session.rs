//! Explorer session event loop
//!
//! One task owns all mutable UI state and consumes [`UiEvent`]s:
//! - Keystrokes arm a debounce deadline; only the last one in the window fires
//! - A fired search calls the simulated remote on its own task
//! - Every call carries a generation; a completion that is no longer the
//!   pending one is dropped, so a slow old response never replaces a newer one
//! - In-flight calls are never aborted

use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

use flora_core::{filter_records, Catalogue, SearchQuery, ShortQueryPolicy, SpeciesId};

use crate::config::ExplorerConfig;
use crate::detail::{DetailPanel, MapSurface, MapViewState, BASELINE_TITLE};
use crate::error::AppError;
use crate::remote::{RemoteError, RemoteResponse, SimulatedRemote, SEARCH_PATH};
use crate::render::{render, StatusIndicator, StatusLine, ViewState};
use crate::report::{ReportLevel, Reporter};

/// Buffer for both the event and the update channels
pub const CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The search box now holds this text
    Input(String),
    /// Search immediately, skipping the quiet window
    Submit,
    Open(String),
    Close,
    Shutdown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UiUpdate {
    Status { status: StatusLine },
    Results { generation: u64, query: String, view: ViewState, status: StatusLine },
    DetailOpened { view: MapViewState },
    DetailClosed { title: String },
    Error { error: AppError },
}

/// Everything the session mutates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplorerState {
    pub query: String,
    pub results: ViewState,
    pub status: StatusIndicator,
    /// Generation of the last search fired
    pub generation: u64,
    /// Generation whose completion is still awaited
    pub pending: Option<u64>,
    pub open_detail: Option<SpeciesId>,
    pub searches_fired: u64,
    pub stale_discarded: u64,
}

impl ExplorerState {
    fn new(results: ViewState) -> Self {
        Self {
            query: String::new(),
            results,
            status: StatusIndicator::Ready,
            generation: 0,
            pending: None,
            open_detail: None,
            searches_fired: 0,
            stale_discarded: 0,
        }
    }
}

struct Completion {
    generation: u64,
    query: String,
    outcome: Result<RemoteResponse, RemoteError>,
}

pub struct Explorer<S: MapSurface> {
    catalogue: Arc<Catalogue>,
    remote: Arc<SimulatedRemote>,
    reporter: Arc<dyn Reporter>,
    debounce: Duration,
    policy: ShortQueryPolicy,
    detail: DetailPanel<S>,
    state: ExplorerState,
    updates: mpsc::Sender<UiUpdate>,
}

impl<S: MapSurface> Explorer<S> {
    pub fn new(
        catalogue: Arc<Catalogue>,
        remote: Arc<SimulatedRemote>,
        reporter: Arc<dyn Reporter>,
        surface: S,
        config: &ExplorerConfig,
        updates: mpsc::Sender<UiUpdate>,
    ) -> Self {
        let initial = render(&catalogue.iter().collect::<Vec<_>>());
        Self {
            catalogue,
            remote,
            reporter,
            debounce: config.debounce(),
            policy: config.short_query_policy,
            detail: DetailPanel::new(surface),
            state: ExplorerState::new(initial),
            updates,
        }
    }

    /// Run until [`UiEvent::Shutdown`] or the event channel closes.
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) -> ExplorerState {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
        let mut deadline: Option<Instant> = None;

        self.publish(UiUpdate::Results {
            generation: 0,
            query: String::new(),
            view: self.state.results.clone(),
            status: self.state.status.into(),
        })
        .await;

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    None | Some(UiEvent::Shutdown) => break,
                    Some(UiEvent::Input(text)) => {
                        self.state.query = text;
                        deadline = Some(Instant::now() + self.debounce);
                    }
                    Some(UiEvent::Submit) => {
                        deadline = None;
                        self.fire(&done_tx).await;
                    }
                    Some(UiEvent::Open(id)) => self.open_detail(&id).await,
                    Some(UiEvent::Close) => self.close_detail().await,
                },
                () = wait_until(deadline), if deadline.is_some() => {
                    deadline = None;
                    self.fire(&done_tx).await;
                }
                Some(done) = done_rx.recv() => self.complete(done).await,
            }
        }

        self.detail.close();
        tracing::info!(
            searches = self.state.searches_fired,
            stale = self.state.stale_discarded,
            "explorer session stopped"
        );
        self.state
    }

    async fn fire(&mut self, done_tx: &mpsc::UnboundedSender<Completion>) {
        self.state.generation += 1;
        self.state.searches_fired += 1;
        let generation = self.state.generation;
        let query = self.state.query.clone();
        self.state.pending = Some(generation);
        self.state.status = StatusIndicator::Loading;

        tracing::info!(generation, query = %query, "search triggered");
        self.reporter.report(
            ReportLevel::Info,
            "search triggered",
            json!({ "query": query, "generation": generation }),
        );
        self.publish(UiUpdate::Status { status: StatusIndicator::Loading.into() }).await;

        let remote = Arc::clone(&self.remote);
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let payload = json!({ "query": query, "type": "GENETIC_BARCODE" });
            let outcome = remote.call(SEARCH_PATH, &payload).await;
            // The session may already be gone.
            let _ = done_tx.send(Completion { generation, query, outcome });
        });
    }

    async fn complete(&mut self, done: Completion) {
        if self.state.pending != Some(done.generation) {
            self.state.stale_discarded += 1;
            tracing::debug!(
                generation = done.generation,
                current = self.state.generation,
                "discarding superseded search completion"
            );
            return;
        }
        self.state.pending = None;

        match done.outcome {
            Ok(response) => {
                let query = SearchQuery::parse(&done.query).with_policy(self.policy);
                let matched = filter_records(&query, self.catalogue.records());
                self.state.results = render(&matched);
                self.state.status = StatusIndicator::for_results(matched.len());
                tracing::info!(
                    request_id = %response.request_id,
                    query = %done.query,
                    results = matched.len(),
                    "search completed"
                );
                self.reporter.report(
                    ReportLevel::Info,
                    "search completed",
                    json!({ "query": done.query, "results": matched.len() }),
                );
            }
            Err(err) => {
                let error = AppError::from(err);
                self.state.results = ViewState::empty();
                self.state.status = StatusIndicator::Offline;
                tracing::error!(query = %done.query, error = %error, "search failed");
                self.reporter.report(
                    ReportLevel::Error,
                    "search failed",
                    json!({ "query": done.query, "error": error }),
                );
                self.publish(UiUpdate::Error { error }).await;
            }
        }

        self.publish(UiUpdate::Results {
            generation: done.generation,
            query: done.query,
            view: self.state.results.clone(),
            status: self.state.status.into(),
        })
        .await;
    }

    async fn open_detail(&mut self, id: &str) {
        let Some(record) = self.catalogue.get(id) else {
            let error = AppError::species_not_found(id);
            tracing::warn!(species_id = id, "detail requested for unknown species");
            self.reporter.report(ReportLevel::Error, &error.message, json!({ "id": id }));
            self.publish(UiUpdate::Error { error }).await;
            return;
        };
        let view = self.detail.open(record).clone();
        self.state.open_detail = Some(record.id.clone());
        self.publish(UiUpdate::DetailOpened { view }).await;
    }

    async fn close_detail(&mut self) {
        if self.detail.close() {
            self.state.open_detail = None;
            self.publish(UiUpdate::DetailClosed { title: BASELINE_TITLE.to_string() }).await;
        }
    }

    async fn publish(&self, update: UiUpdate) {
        if self.updates.send(update).await.is_err() {
            tracing::debug!("update receiver dropped");
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::MemoryMapSurface;
    use crate::remote::{RemoteBehavior, ScriptedStep};
    use crate::report::MemoryReporter;

    struct Harness {
        events: mpsc::Sender<UiEvent>,
        updates: mpsc::Receiver<UiUpdate>,
        remote: Arc<SimulatedRemote>,
        reporter: Arc<MemoryReporter>,
        task: tokio::task::JoinHandle<ExplorerState>,
    }

    fn start(behavior: RemoteBehavior) -> Harness {
        let catalogue = Arc::new(Catalogue::builtin());
        let remote = Arc::new(SimulatedRemote::new(behavior, catalogue.len()));
        let reporter = Arc::new(MemoryReporter::new());
        let (events_tx, events_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (updates_tx, updates_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let explorer = Explorer::new(
            catalogue,
            Arc::clone(&remote),
            reporter.clone(),
            MemoryMapSurface::new(),
            &ExplorerConfig::default(),
            updates_tx,
        );
        let task = tokio::spawn(explorer.run(events_rx));
        Harness { events: events_tx, updates: updates_rx, remote, reporter, task }
    }

    impl Harness {
        async fn send(&self, event: UiEvent) {
            if self.events.send(event).await.is_err() {
                panic!("explorer stopped early");
            }
        }

        async fn finish(mut self) -> (ExplorerState, Vec<UiUpdate>) {
            self.send(UiEvent::Shutdown).await;
            let Ok(state) = self.task.await else {
                panic!("explorer task panicked");
            };
            let mut updates = Vec::new();
            while let Ok(update) = self.updates.try_recv() {
                updates.push(update);
            }
            (state, updates)
        }
    }

    fn ids(view: &ViewState) -> Vec<&str> {
        view.cards.iter().map(|card| card.id.as_str()).collect()
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_input_fires_one_search() {
        let harness = start(RemoteBehavior::instant());
        for text in ["r", "ri", "riz", "rize"] {
            harness.send(UiEvent::Input(text.to_string())).await;
            advance(100).await;
        }
        advance(1_000).await;
        let remote = Arc::clone(&harness.remote);
        let (state, _) = harness.finish().await;

        assert_eq!(remote.call_count(), 1);
        assert_eq!(state.searches_fired, 1);
        assert_eq!(ids(&state.results), vec!["TR-003", "TR-006"]);
        assert_eq!(state.status, StatusIndicator::Results { count: 2 });
        assert!(state.pending.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_inside_quiet_window() {
        let harness = start(RemoteBehavior::instant());
        harness.send(UiEvent::Input("rize".to_string())).await;
        advance(200).await;
        assert_eq!(harness.remote.call_count(), 0);
        advance(200).await;
        assert_eq!(harness.remote.call_count(), 1);
        let _ = harness.finish().await;
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_completion_never_replaces_newer_render() {
        let harness = start(RemoteBehavior::Scripted(vec![
            ScriptedStep::success(Duration::from_millis(1_000)),
            ScriptedStep::success(Duration::from_millis(100)),
        ]));
        harness.send(UiEvent::Input("rize".to_string())).await;
        harness.send(UiEvent::Submit).await;
        advance(200).await;
        harness.send(UiEvent::Input("palmiye".to_string())).await;
        harness.send(UiEvent::Submit).await;
        advance(2_000).await;

        let (state, updates) = harness.finish().await;
        assert_eq!(ids(&state.results), vec!["TR-005"]);
        assert_eq!(state.stale_discarded, 1);
        assert_eq!(state.generation, 2);

        let rendered = updates
            .iter()
            .filter_map(|update| match update {
                UiUpdate::Results { generation, .. } => Some(*generation),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(rendered, vec![0, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn remote_failure_clears_results_and_goes_offline() {
        let harness = start(RemoteBehavior::Scripted(vec![ScriptedStep::failure(
            Duration::from_millis(50),
        )]));
        let reporter = Arc::clone(&harness.reporter);
        harness.send(UiEvent::Input("endemik".to_string())).await;
        harness.send(UiEvent::Submit).await;
        advance(500).await;

        let (state, updates) = harness.finish().await;
        assert!(state.results.empty_state);
        assert!(state.results.is_empty());
        assert_eq!(state.status, StatusIndicator::Offline);
        assert_eq!(reporter.error_count(), 1);
        assert!(updates.iter().any(|update| matches!(
            update,
            UiUpdate::Error { error } if error.code == "NETWORK_REMOTE_UNAVAILABLE"
        )));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_id_reports_error_and_keeps_detail_closed() {
        let harness = start(RemoteBehavior::instant());
        let reporter = Arc::clone(&harness.reporter);
        harness.send(UiEvent::Open("TR-999".to_string())).await;

        let (state, updates) = harness.finish().await;
        assert!(state.open_detail.is_none());
        assert_eq!(reporter.error_count(), 1);
        assert!(updates.iter().any(|update| matches!(
            update,
            UiUpdate::Error { error } if error.code == "NOT_FOUND_SPECIES"
        )));
        assert!(!updates.iter().any(|update| matches!(update, UiUpdate::DetailOpened { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn open_then_switch_then_close() {
        let harness = start(RemoteBehavior::instant());
        harness.send(UiEvent::Open("TR-001".to_string())).await;
        harness.send(UiEvent::Open("TR-003".to_string())).await;
        harness.send(UiEvent::Close).await;
        harness.send(UiEvent::Close).await;

        let (state, updates) = harness.finish().await;
        assert!(state.open_detail.is_none());
        let opened = updates
            .iter()
            .filter_map(|update| match update {
                UiUpdate::DetailOpened { view } => Some(view.species_id.as_str().to_string()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(opened, vec!["TR-001", "TR-003"]);
        let closed = updates
            .iter()
            .filter(|update| matches!(update, UiUpdate::DetailClosed { .. }))
            .count();
        assert_eq!(closed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn initial_update_shows_whole_catalogue() {
        let harness = start(RemoteBehavior::instant());
        let (state, updates) = harness.finish().await;
        assert_eq!(state.results.len(), 12);
        assert_eq!(state.status, StatusIndicator::Ready);
        assert!(matches!(updates.first(), Some(UiUpdate::Results { generation: 0, .. })));
    }
}
