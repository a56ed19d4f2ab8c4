//! Component health checks for the explorer

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use flora_core::{Catalogue, SearchQuery, SequenceCheck, SpeciesId, SYSTEM_VERSION};

use crate::config::ExplorerConfig;
use crate::detail::{map_view, Viewport};
use crate::render::render;

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub version: String,
    pub catalogue: ComponentHealth,
    pub query_engine: ComponentHealth,
    pub renderer: ComponentHealth,
    pub map_engine: ComponentHealth,
    pub simulated_remote: ComponentHealth,
    /// Worst of all components
    pub overall_status: HealthStatus,
    pub record_count: usize,
    /// `None` for an empty catalogue
    pub first_record_sequence_valid: Option<bool>,
    pub checked_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Error,
    Unavailable,
}

impl HealthStatus {
    #[must_use]
    pub fn worst(self, other: Self) -> Self {
        match (self, other) {
            (Self::Error, _) | (_, Self::Error) => Self::Error,
            (Self::Unavailable, _) | (_, Self::Unavailable) => Self::Unavailable,
            (Self::Warning, _) | (_, Self::Warning) => Self::Warning,
            _ => Self::Healthy,
        }
    }
}

impl ComponentHealth {
    fn healthy(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: HealthStatus::Healthy,
            message: message.to_string(),
            details: None,
        }
    }

    fn warning(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            status: HealthStatus::Warning,
            message: message.to_string(),
            details,
        }
    }

    fn error(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            status: HealthStatus::Error,
            message: message.to_string(),
            details,
        }
    }

    fn unavailable(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: HealthStatus::Unavailable,
            message: message.to_string(),
            details: None,
        }
    }
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a SpeciesId>) -> String {
    ids.map(SpeciesId::as_str).collect::<Vec<_>>().join(", ")
}

/// Malformed sequences only warn; they never stop the catalogue from loading.
pub fn check_catalogue(catalogue: &Catalogue) -> ComponentHealth {
    if catalogue.is_empty() {
        return ComponentHealth::warning("Catalogue", "No records loaded", None);
    }
    let report = catalogue.sequence_report();
    let invalid = report.iter().filter(|check| !check.valid).collect::<Vec<&SequenceCheck>>();
    if invalid.is_empty() {
        ComponentHealth::healthy("Catalogue", &format!("OK - {} records", catalogue.len()))
    } else {
        ComponentHealth::warning(
            "Catalogue",
            &format!("{} of {} genetic sequences are malformed", invalid.len(), catalogue.len()),
            Some(join_ids(invalid.iter().map(|check| &check.id))),
        )
    }
}

/// Every record must be admitted by a query for its own id, and a blank
/// query must return the whole catalogue. Linear in the catalogue size.
pub fn check_query_engine(catalogue: &Catalogue) -> ComponentHealth {
    let everything = catalogue.filter(&SearchQuery::parse("   "));
    if everything.len() != catalogue.len() {
        return ComponentHealth::error(
            "Query engine",
            "Blank query did not return the full catalogue",
            Some(format!("expected {}, got {}", catalogue.len(), everything.len())),
        );
    }
    let unreachable = catalogue
        .iter()
        .filter(|record| !SearchQuery::parse(record.id.as_str()).matches(record))
        .map(|record| &record.id)
        .collect::<Vec<_>>();
    if unreachable.is_empty() {
        ComponentHealth::healthy("Query engine", "OK - every id resolves")
    } else {
        ComponentHealth::error(
            "Query engine",
            "Some records cannot be found by id",
            Some(join_ids(unreachable.into_iter())),
        )
    }
}

pub fn check_renderer(catalogue: &Catalogue) -> ComponentHealth {
    let view = render(&catalogue.iter().collect::<Vec<_>>());
    if view.len() == catalogue.len() {
        ComponentHealth::healthy("Renderer", &format!("OK - {} cards", view.len()))
    } else {
        ComponentHealth::error(
            "Renderer",
            "Card count does not match record count",
            Some(format!("records={}, cards={}", catalogue.len(), view.len())),
        )
    }
}

pub fn check_map_engine(catalogue: &Catalogue) -> ComponentHealth {
    let centered = catalogue
        .iter()
        .filter(|record| matches!(map_view(record).viewport, Viewport::Centered { .. }))
        .map(|record| &record.id)
        .collect::<Vec<_>>();
    if centered.is_empty() {
        ComponentHealth::healthy("Map engine", "OK - all views fit their highlights")
    } else {
        ComponentHealth::warning(
            "Map engine",
            "Some views fall back to center and zoom",
            Some(join_ids(centered.into_iter())),
        )
    }
}

pub fn check_simulated_remote(config: &ExplorerConfig) -> ComponentHealth {
    let details = format!(
        "latency={}-{}ms failure_rate={}",
        config.latency_min_ms, config.latency_max_ms, config.failure_rate
    );
    if config.failure_rate >= 1.0 {
        ComponentHealth::unavailable("Simulated remote", "Every call fails")
    } else if config.failure_rate >= 0.5 {
        ComponentHealth::warning("Simulated remote", "Most calls fail", Some(details))
    } else {
        let mut health = ComponentHealth::healthy("Simulated remote", "OK");
        health.details = Some(details);
        health
    }
}

pub fn run_diagnostics(catalogue: &Catalogue, config: &ExplorerConfig) -> DiagnosticsReport {
    let catalogue_health = check_catalogue(catalogue);
    let query_engine = check_query_engine(catalogue);
    let renderer = check_renderer(catalogue);
    let map_engine = check_map_engine(catalogue);
    let simulated_remote = check_simulated_remote(config);

    let components = [&catalogue_health, &query_engine, &renderer, &map_engine, &simulated_remote];
    let overall_status = components
        .iter()
        .fold(HealthStatus::Healthy, |acc, health| acc.worst(health.status));

    let first_record_sequence_valid =
        catalogue.records().first().map(|record| record.sequence_check().valid);

    tracing::debug!(
        records = catalogue.len(),
        overall = ?overall_status,
        "diagnostics completed"
    );

    DiagnosticsReport {
        version: SYSTEM_VERSION.to_string(),
        catalogue: catalogue_health,
        query_engine,
        renderer,
        map_engine,
        simulated_remote,
        overall_status,
        record_count: catalogue.len(),
        first_record_sequence_valid,
        checked_at: OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
    }
}
