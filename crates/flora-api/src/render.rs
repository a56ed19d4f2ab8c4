//! Card list rendering
//!
//! Pure data-to-view transform. A surface that draws cards receives the
//! whole [`ViewState`] and replaces what it showed before.

use serde::{Deserialize, Serialize};

use flora_core::{SpeciesId, SpeciesRecord};

/// Characters kept from the description before the ellipsis
pub const DESCRIPTION_EXCERPT_CHARS: usize = 70;
const ELLIPSIS: &str = "...";

/// Severity of the status line, mapped to the pulse color by the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Nominal,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StatusIndicator {
    Ready,
    Loading,
    Results { count: usize },
    NoResults,
    /// The simulated remote answered 503
    Offline,
    /// An operation failed unexpectedly
    Critical,
}

impl StatusIndicator {
    /// Status after a successful search returning `count` records.
    #[must_use]
    pub fn for_results(count: usize) -> Self {
        if count == 0 {
            Self::NoResults
        } else {
            Self::Results { count }
        }
    }

    #[must_use]
    pub fn text(self) -> String {
        match self {
            Self::Ready => "SİSTEM ÇEKİRDEĞİ DEVREDE. HOŞ GELDİNİZ.".to_string(),
            Self::Loading => "GENETİK VERİ PAKETLERİ YÜKLENİYOR...".to_string(),
            Self::Results { count } => format!("SONUÇ: {count} KOD BULUNDU"),
            Self::NoResults => "SİSTEM ÇEVRİMİÇİ | ANALİZ HAZIR".to_string(),
            Self::Offline => "HATA KODU: 404S - SUNUCU HATA".to_string(),
            Self::Critical => "HATA KODU: 500X - KRİTİK".to_string(),
        }
    }

    #[must_use]
    pub fn tone(self) -> StatusTone {
        match self {
            Self::Ready | Self::Loading | Self::Results { .. } => StatusTone::Nominal,
            Self::NoResults => StatusTone::Warning,
            Self::Offline | Self::Critical => StatusTone::Error,
        }
    }
}

/// Serialized form of the status line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    #[serde(flatten)]
    pub indicator: StatusIndicator,
    pub text: String,
    pub tone: StatusTone,
}

impl From<StatusIndicator> for StatusLine {
    fn from(indicator: StatusIndicator) -> Self {
        Self { indicator, text: indicator.text(), tone: indicator.tone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCard {
    pub id: SpeciesId,
    pub name: String,
    pub scientific_name: String,
    pub description_excerpt: String,
    pub match_score: u8,
    /// Share of the progress track to fill, 0-100
    pub progress_width_pct: u8,
    pub conservation_label: String,
    pub threat_color: String,
}

impl ViewCard {
    #[must_use]
    pub fn from_record(record: &SpeciesRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.common_name.clone(),
            scientific_name: record.scientific_name.clone(),
            description_excerpt: excerpt(&record.description),
            match_score: record.match_score,
            progress_width_pct: record.match_score.min(100),
            conservation_label: record.conservation_status.label().to_string(),
            threat_color: record.threat_color().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub cards: Vec<ViewCard>,
    /// Set when there is nothing to show
    pub empty_state: bool,
}

impl ViewState {
    #[must_use]
    pub fn empty() -> Self {
        Self { cards: Vec::new(), empty_state: true }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// First [`DESCRIPTION_EXCERPT_CHARS`] characters, always followed by `...`.
#[must_use]
pub fn excerpt(description: &str) -> String {
    let mut out = description.chars().take(DESCRIPTION_EXCERPT_CHARS).collect::<String>();
    out.push_str(ELLIPSIS);
    out
}

/// One card per record, in input order.
#[must_use]
pub fn render(results: &[&SpeciesRecord]) -> ViewState {
    if results.is_empty() {
        tracing::debug!("render: no results");
        return ViewState::empty();
    }
    let cards = results.iter().map(|record| ViewCard::from_record(record)).collect::<Vec<_>>();
    tracing::debug!(cards = cards.len(), "render: cards built");
    ViewState { cards, empty_state: false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flora_core::Catalogue;

    fn with_description(description: &str) -> SpeciesRecord {
        let catalogue = Catalogue::builtin();
        let Some(first) = catalogue.records().first() else {
            panic!("builtin catalogue is not empty");
        };
        let mut record = first.clone();
        record.description = description.to_string();
        record
    }

    #[test]
    fn empty_results_render_empty_state() {
        let view = render(&[]);
        assert!(view.empty_state);
        assert_eq!(view.len(), 0);
        assert_eq!(view, ViewState::empty());
    }

    #[test]
    fn cards_follow_input_order() {
        let catalogue = Catalogue::builtin();
        let records = catalogue.records();
        let view = render(&[&records[4], &records[1]]);
        assert!(!view.empty_state);
        let ids = view.cards.iter().map(|card| card.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["TR-005", "TR-002"]);
    }

    #[test]
    fn long_description_is_truncated_with_ellipsis() {
        let description = "x".repeat(120);
        let record = with_description(&description);
        let view = render(&[&record]);
        let excerpt = &view.cards[0].description_excerpt;
        assert_eq!(excerpt.chars().count(), 73);
        assert_eq!(excerpt, &format!("{}...", "x".repeat(70)));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let description = "ğ".repeat(80);
        let excerpt = excerpt(&description);
        assert_eq!(excerpt, format!("{}...", "ğ".repeat(70)));
    }

    #[test]
    fn short_description_still_gets_ellipsis() {
        assert_eq!(excerpt("Kısa"), "Kısa...");
    }

    #[test]
    fn card_carries_label_color_and_progress() {
        let catalogue = Catalogue::builtin();
        let Some(record) = catalogue.get("TR-005") else {
            panic!("TR-005 is builtin");
        };
        let card = ViewCard::from_record(record);
        assert_eq!(card.match_score, 91);
        assert_eq!(card.progress_width_pct, 91);
        assert_eq!(card.conservation_label, "Kritik Tehlikede (CR)");
        assert_eq!(card.threat_color, "#ff0000");
        assert_eq!(card.id.as_str(), "TR-005");
        assert_eq!(card.scientific_name, "Phoenix theophrasti");
    }

    #[test]
    fn status_texts_and_tones() {
        assert_eq!(StatusIndicator::for_results(3).text(), "SONUÇ: 3 KOD BULUNDU");
        assert_eq!(StatusIndicator::for_results(0), StatusIndicator::NoResults);
        assert_eq!(StatusIndicator::NoResults.tone(), StatusTone::Warning);
        assert_eq!(StatusIndicator::Offline.text(), "HATA KODU: 404S - SUNUCU HATA");
        assert_eq!(StatusIndicator::Offline.tone(), StatusTone::Error);
    }

    #[test]
    fn status_line_serializes_flat() {
        let line = StatusLine::from(StatusIndicator::Results { count: 2 });
        let Ok(json) = serde_json::to_value(&line) else {
            panic!("status line should serialize");
        };
        assert_eq!(json["state"], "results");
        assert_eq!(json["count"], 2);
        assert_eq!(json["tone"], "nominal");
    }
}
