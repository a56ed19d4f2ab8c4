use serde::Serialize;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use flora_core::{
    explain, filter_records, Catalogue, MatchReason, SearchQuery, SequenceCheck, ShortQueryPolicy,
    SpeciesId,
};

pub mod config;
pub mod detail;
pub mod diagnostics;
pub mod error;
pub mod remote;
pub mod render;
pub mod report;
pub mod session;

pub use config::{ConfigError, ExplorerConfig};
pub use detail::{map_view, DetailPanel, MapHandle, MapSurface, MapViewState, MemoryMapSurface};
pub use diagnostics::{run_diagnostics, DiagnosticsReport, HealthStatus};
pub use error::{AppError, ErrorCategory, ErrorCode};
pub use remote::{RemoteBehavior, RemoteError, RemoteResponse, ScriptedStep, SimulatedRemote};
pub use render::{render, StatusIndicator, StatusLine, ViewCard, ViewState};
pub use report::{MemoryReporter, ReportEntry, ReportLevel, Reporter, Tee, TracingReporter};
pub use session::{Explorer, ExplorerState, UiEvent, UiUpdate};

pub const API_CONTRACT_VERSION: &str = "api.v1";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ListResult {
    pub view: ViewState,
    pub status: StatusLine,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchResult {
    pub query: String,
    pub view: ViewState,
    pub status: StatusLine,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AppError>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExplainedMatch {
    pub id: SpeciesId,
    pub reason: MatchReason,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExplainResult {
    pub query: String,
    pub normalized: String,
    /// Tokens long enough to take part in the multi-token clause
    pub tokens: Vec<String>,
    pub policy: ShortQueryPolicy,
    pub matches: Vec<ExplainedMatch>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusResult {
    pub ok: bool,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AppError>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidateResult {
    pub records: Vec<SequenceCheck>,
    pub invalid_count: usize,
    pub errors: Vec<AppError>,
}

/// Entry point for every explorer operation
#[derive(Clone)]
pub struct FloraExplorerApi {
    catalogue: Arc<Catalogue>,
    config: ExplorerConfig,
    remote: Arc<SimulatedRemote>,
    reporter: Arc<dyn Reporter>,
}

impl FloraExplorerApi {
    #[must_use]
    pub fn new(catalogue: Catalogue, config: ExplorerConfig) -> Self {
        let remote = SimulatedRemote::new(config.remote_behavior(), catalogue.len());
        Self {
            catalogue: Arc::new(catalogue),
            config,
            remote: Arc::new(remote),
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Validate `config` and load the catalogue file, falling back to the
    /// built-in catalogue when no path is given.
    ///
    /// # Errors
    /// Returns a validation [`AppError`] when the configuration is invalid or
    /// the catalogue file cannot be read, parsed, or validated.
    pub fn load(config: ExplorerConfig, catalogue_path: Option<&Path>) -> Result<Self, AppError> {
        config.validate()?;
        let catalogue = match catalogue_path {
            Some(path) => {
                let body = std::fs::read_to_string(path).map_err(|err| {
                    AppError::invalid_catalogue(format!("{}: {err}", path.display()))
                })?;
                Catalogue::from_json_str(&body)?
            }
            None => Catalogue::builtin(),
        };
        tracing::info!(records = catalogue.len(), "catalogue loaded");
        Ok(Self::new(catalogue, config))
    }

    /// Replace the simulated remote, e.g. with a scripted one.
    #[must_use]
    pub fn with_remote_behavior(mut self, behavior: RemoteBehavior) -> Self {
        self.remote = Arc::new(SimulatedRemote::new(behavior, self.catalogue.len()));
        self
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    fn parse_query(&self, query: &str) -> SearchQuery {
        SearchQuery::parse(query).with_policy(self.config.short_query_policy)
    }

    /// Render the whole catalogue without a remote call.
    #[must_use]
    pub fn list(&self) -> ListResult {
        let records = self.catalogue.iter().collect::<Vec<_>>();
        ListResult { view: render(&records), status: StatusIndicator::Ready.into() }
    }

    /// One simulated remote call, then filter and render. A remote failure
    /// yields an empty view with the offline status.
    pub async fn search(&self, query: &str) -> SearchResult {
        let payload = json!({ "query": query, "type": "GENETIC_BARCODE" });
        match self.remote.call(remote::SEARCH_PATH, &payload).await {
            Ok(response) => {
                let parsed = self.parse_query(query);
                let matched = filter_records(&parsed, self.catalogue.records());
                tracing::info!(
                    request_id = %response.request_id,
                    query,
                    results = matched.len(),
                    "search completed"
                );
                SearchResult {
                    query: query.to_string(),
                    view: render(&matched),
                    status: StatusIndicator::for_results(matched.len()).into(),
                    request_id: Some(response.request_id),
                    error: None,
                }
            }
            Err(err) => {
                let error = AppError::from(err);
                self.reporter.report(
                    ReportLevel::Error,
                    "search failed",
                    json!({ "query": query, "error": error }),
                );
                SearchResult {
                    query: query.to_string(),
                    view: ViewState::empty(),
                    status: StatusIndicator::Offline.into(),
                    request_id: None,
                    error: Some(error),
                }
            }
        }
    }

    #[must_use]
    pub fn explain(&self, query: &str) -> ExplainResult {
        let parsed = self.parse_query(query);
        let matches = explain(&parsed, self.catalogue.records())
            .into_iter()
            .map(|found| ExplainedMatch { id: found.record.id.clone(), reason: found.reason })
            .collect();
        ExplainResult {
            query: parsed.raw().to_string(),
            normalized: parsed.normalized().to_string(),
            tokens: parsed.tokens().to_vec(),
            policy: parsed.policy(),
            matches,
        }
    }

    /// Map view for one record.
    ///
    /// # Errors
    /// Returns a not-found [`AppError`] for an unknown id.
    pub fn detail(&self, id: &str) -> Result<MapViewState, AppError> {
        match self.catalogue.get(id) {
            Some(record) => Ok(map_view(record)),
            None => {
                let error = AppError::species_not_found(id);
                self.reporter.report(ReportLevel::Error, &error.message, json!({ "id": id }));
                Err(error)
            }
        }
    }

    /// The startup health call against `/status`.
    pub async fn status(&self) -> StatusResult {
        match self.remote.call(remote::STATUS_PATH, &json!({ "method": "GET" })).await {
            Ok(response) => StatusResult {
                ok: true,
                status: response.status,
                data: Some(response.data),
                error: None,
            },
            Err(err) => {
                let status = err.status;
                let error = AppError::from(err);
                self.reporter.report(
                    ReportLevel::Warning,
                    "status check failed",
                    json!({ "error": error }),
                );
                StatusResult { ok: false, status, data: None, error: Some(error) }
            }
        }
    }

    /// Genetic sequence validity per record. Never fails.
    #[must_use]
    pub fn validate(&self) -> ValidateResult {
        let records = self.catalogue.sequence_report();
        let errors = records
            .iter()
            .filter(|check| !check.valid)
            .map(|check| AppError::invalid_sequence(check.id.as_str(), &check.preview))
            .collect::<Vec<_>>();
        for error in &errors {
            self.reporter.report(ReportLevel::Warning, &error.message, serde_json::Value::Null);
        }
        ValidateResult { invalid_count: errors.len(), records, errors }
    }

    #[must_use]
    pub fn diagnostics(&self) -> DiagnosticsReport {
        run_diagnostics(&self.catalogue, &self.config)
    }

    /// Build an interactive session sharing this catalogue and remote.
    pub fn explorer<S: MapSurface>(
        &self,
        surface: S,
        updates: tokio::sync::mpsc::Sender<UiUpdate>,
    ) -> Explorer<S> {
        Explorer::new(
            Arc::clone(&self.catalogue),
            Arc::clone(&self.remote),
            Arc::clone(&self.reporter),
            surface,
            &self.config,
            updates,
        )
    }
}
