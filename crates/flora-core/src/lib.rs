use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

mod builtin;

pub const SYSTEM_VERSION: &str = "4.0.1 ALPHA";

/// Tokens with this many characters or fewer are dropped from multi-token matching.
pub const SHORT_TOKEN_MAX_CHARS: usize = 2;

const UNKNOWN_STATUS_LABEL: &str = "Bilinmiyor";
const UNKNOWN_THREAT_COLOR: &str = "#888899";

#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum CatalogueError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("duplicate species id: {0}")]
    DuplicateId(String),
    #[error("catalogue parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(transparent)]
pub struct SpeciesId(pub String);

impl SpeciesId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SpeciesId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// IUCN-style conservation category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ConservationStatus {
    #[serde(rename = "LC")]
    LeastConcern,
    #[serde(rename = "NT")]
    NearThreatened,
    #[serde(rename = "VU")]
    Vulnerable,
    #[serde(rename = "EN")]
    Endangered,
    #[serde(rename = "CR")]
    CriticallyEndangered,
    #[serde(rename = "EX")]
    Extinct,
}

impl ConservationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeastConcern => "LC",
            Self::NearThreatened => "NT",
            Self::Vulnerable => "VU",
            Self::Endangered => "EN",
            Self::CriticallyEndangered => "CR",
            Self::Extinct => "EX",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LC" => Some(Self::LeastConcern),
            "NT" => Some(Self::NearThreatened),
            "VU" => Some(Self::Vulnerable),
            "EN" => Some(Self::Endangered),
            "CR" => Some(Self::CriticallyEndangered),
            "EX" => Some(Self::Extinct),
            _ => None,
        }
    }

    /// Full-text display label in the catalogue locale.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::LeastConcern => "Asgari Endişe (LC)",
            Self::NearThreatened => "Tehdite Yakın (NT)",
            Self::Vulnerable => "Hassas (VU)",
            Self::Endangered => "Tehlikede (EN)",
            Self::CriticallyEndangered => "Kritik Tehlikede (CR)",
            Self::Extinct => "Yok Olmuş (EX)",
        }
    }
}

/// Label for a raw status code; unrecognized codes map to the "unknown" label.
#[must_use]
pub fn conservation_label(code: &str) -> &'static str {
    ConservationStatus::parse(code).map_or(UNKNOWN_STATUS_LABEL, ConservationStatus::label)
}

/// Fixed color scale for threat levels 1 (low) to 5 (high); anything else is grey.
#[must_use]
pub fn threat_color(level: u8) -> &'static str {
    match level {
        1 => "#00ff9d",
        2 => "#6affc8",
        3 => "#ffdf00",
        4 => "#ff8c00",
        5 => "#ff0000",
        _ => UNKNOWN_THREAT_COLOR,
    }
}

/// Accepts non-empty strings over `A`, `T`, `C`, `G`, `N` in either case.
#[must_use]
pub fn validate_genetic_sequence(sequence: &str) -> bool {
    !sequence.is_empty()
        && sequence.chars().all(|ch| matches!(ch.to_ascii_uppercase(), 'A' | 'T' | 'C' | 'G' | 'N'))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    #[must_use]
    pub fn offset(self, d_lat: f64, d_lon: f64) -> Self {
        Self { lat: self.lat + d_lat, lon: self.lon + d_lon }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Geography {
    pub center: Coordinate,
    pub zoom: u8,
    pub regions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeciesRecord {
    pub id: SpeciesId,
    pub common_name: String,
    pub scientific_name: String,
    pub description: String,
    pub match_score: u8,
    pub conservation_status: ConservationStatus,
    pub geography: Geography,
    pub genetic_sequence: String,
    #[serde(default)]
    pub researcher: String,
    pub threat_level: u8,
}

impl SpeciesRecord {
    /// Validate one record against the catalogue invariants.
    ///
    /// The genetic sequence is not checked here; see
    /// [`SpeciesRecord::sequence_check`].
    ///
    /// # Errors
    /// Returns [`CatalogueError::Validation`] when identity, score, threat level,
    /// or geography constraints are violated.
    pub fn validate(&self) -> Result<(), CatalogueError> {
        if self.id.as_str().trim().is_empty() {
            return Err(CatalogueError::Validation("id MUST be non-empty".to_string()));
        }

        for (field, value) in
            [("common_name", &self.common_name), ("scientific_name", &self.scientific_name)]
        {
            if value.trim().is_empty() {
                return Err(CatalogueError::Validation(format!(
                    "{field} MUST be non-empty for {}",
                    self.id
                )));
            }
        }

        if self.match_score > 100 {
            return Err(CatalogueError::Validation(format!(
                "match_score MUST be in [0, 100] for {}",
                self.id
            )));
        }

        if !(1..=5).contains(&self.threat_level) {
            return Err(CatalogueError::Validation(format!(
                "threat_level MUST be in [1, 5] for {}",
                self.id
            )));
        }

        if !self.geography.center.is_valid() {
            return Err(CatalogueError::Validation(format!(
                "geography.center MUST be a finite lat/lon pair for {}",
                self.id
            )));
        }

        if self.geography.regions.first().map_or(true, |region| region.trim().is_empty()) {
            return Err(CatalogueError::Validation(format!(
                "geography.regions MUST start with a named region for {}",
                self.id
            )));
        }

        Ok(())
    }

    /// Lower-cased concatenation of every field the query engine searches.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        let mut parts = vec![
            self.common_name.as_str(),
            self.scientific_name.as_str(),
            self.id.as_str(),
            self.description.as_str(),
            self.genetic_sequence.as_str(),
        ];
        parts.extend(self.geography.regions.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }

    #[must_use]
    pub fn sequence_check(&self) -> SequenceCheck {
        SequenceCheck {
            id: self.id.clone(),
            valid: validate_genetic_sequence(&self.genetic_sequence),
            preview: self.genetic_sequence.chars().take(10).collect(),
            length: self.genetic_sequence.chars().count(),
        }
    }

    #[must_use]
    pub fn threat_color(&self) -> &'static str {
        threat_color(self.threat_level)
    }
}

/// Diagnostic result for one record's genetic sequence.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct SequenceCheck {
    pub id: SpeciesId,
    pub valid: bool,
    pub preview: String,
    pub length: usize,
}

/// Immutable, ordered species catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogue {
    records: Vec<SpeciesRecord>,
}

impl Catalogue {
    /// Build a catalogue, enforcing per-record invariants and id uniqueness.
    ///
    /// Ids are compared case-insensitively because exact-id lookups are.
    ///
    /// # Errors
    /// Returns [`CatalogueError::Validation`] for an invalid record, or
    /// [`CatalogueError::DuplicateId`] when two records share an id.
    pub fn new(records: Vec<SpeciesRecord>) -> Result<Self, CatalogueError> {
        let mut seen = BTreeSet::new();
        for record in &records {
            record.validate()?;
            if !seen.insert(record.id.as_str().to_lowercase()) {
                return Err(CatalogueError::DuplicateId(record.id.to_string()));
            }
        }
        Ok(Self { records })
    }

    /// The twelve records shipped with the explorer.
    #[must_use]
    pub fn builtin() -> Self {
        Self { records: builtin::records() }
    }

    /// Parse a JSON array of records.
    ///
    /// # Errors
    /// Returns [`CatalogueError::Parse`] for malformed JSON, or any error from
    /// [`Catalogue::new`].
    pub fn from_json_str(body: &str) -> Result<Self, CatalogueError> {
        let records: Vec<SpeciesRecord> =
            serde_json::from_str(body).map_err(|err| CatalogueError::Parse(err.to_string()))?;
        Self::new(records)
    }

    #[must_use]
    pub fn records(&self) -> &[SpeciesRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeciesRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SpeciesRecord> {
        self.records.iter().find(|record| record.id.as_str() == id)
    }

    #[must_use]
    pub fn sequence_report(&self) -> Vec<SequenceCheck> {
        self.records.iter().map(SpeciesRecord::sequence_check).collect()
    }

    #[must_use]
    pub fn filter(&self, query: &SearchQuery) -> Vec<&SpeciesRecord> {
        filter_records(query, &self.records)
    }
}

/// What the multi-token clause does when every token is too short to count.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ShortQueryPolicy {
    /// The clause matches every record (an empty `all` is true).
    #[default]
    MatchAll,
    /// The clause needs at least one surviving token to match.
    RequireToken,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    EmptyQuery,
    ExactId,
    ExactScientificName,
    Substring,
    AllTokens,
    VacuousTokens,
}

impl MatchReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmptyQuery => "empty_query",
            Self::ExactId => "exact_id",
            Self::ExactScientificName => "exact_scientific_name",
            Self::Substring => "substring",
            Self::AllTokens => "all_tokens",
            Self::VacuousTokens => "vacuous_tokens",
        }
    }
}

/// A normalized free-text query.
///
/// Case folding is plain Unicode `to_lowercase` on both sides, with no
/// locale rules: `İzmir` folds to `i̇zmir`, so the ASCII query `izmir` does
/// not match it while `İzmir` and `i̇zmir` do.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SearchQuery {
    raw: String,
    normalized: String,
    tokens: Vec<String>,
    policy: ShortQueryPolicy,
}

impl SearchQuery {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.to_lowercase().trim().to_string();
        let tokens = normalized
            .split_whitespace()
            .filter(|token| token.chars().count() > SHORT_TOKEN_MAX_CHARS)
            .map(str::to_string)
            .collect();
        Self { raw: raw.to_string(), normalized, tokens, policy: ShortQueryPolicy::default() }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ShortQueryPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    #[must_use]
    pub fn policy(&self) -> ShortQueryPolicy {
        self.policy
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// First clause that admits `record`, or `None` when it is filtered out.
    #[must_use]
    pub fn match_reason(&self, record: &SpeciesRecord) -> Option<MatchReason> {
        if self.is_empty() {
            return Some(MatchReason::EmptyQuery);
        }

        if record.id.as_str().to_lowercase() == self.normalized {
            return Some(MatchReason::ExactId);
        }
        if record.scientific_name.to_lowercase() == self.normalized {
            return Some(MatchReason::ExactScientificName);
        }

        let text = record.searchable_text();
        if text.contains(self.normalized.as_str()) {
            return Some(MatchReason::Substring);
        }

        if self.tokens.is_empty() {
            return match self.policy {
                ShortQueryPolicy::MatchAll => Some(MatchReason::VacuousTokens),
                ShortQueryPolicy::RequireToken => None,
            };
        }

        self.tokens
            .iter()
            .all(|token| text.contains(token.as_str()))
            .then_some(MatchReason::AllTokens)
    }

    #[must_use]
    pub fn matches(&self, record: &SpeciesRecord) -> bool {
        self.match_reason(record).is_some()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QueryMatch<'a> {
    pub record: &'a SpeciesRecord,
    pub reason: MatchReason,
}

/// Filter `records` by a raw query string, keeping catalogue order.
#[must_use]
pub fn filter<'a>(query: &str, records: &'a [SpeciesRecord]) -> Vec<&'a SpeciesRecord> {
    filter_records(&SearchQuery::parse(query), records)
}

#[must_use]
pub fn filter_records<'a>(
    query: &SearchQuery,
    records: &'a [SpeciesRecord],
) -> Vec<&'a SpeciesRecord> {
    if query.is_empty() {
        return records.iter().collect();
    }
    records.iter().filter(|record| query.matches(record)).collect()
}

/// Like [`filter_records`] but keeps the clause that admitted each record.
#[must_use]
pub fn explain<'a>(query: &SearchQuery, records: &'a [SpeciesRecord]) -> Vec<QueryMatch<'a>> {
    records
        .iter()
        .filter_map(|record| query.match_reason(record).map(|reason| QueryMatch { record, reason }))
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn mk_record(id: &str, description: &str, regions: &[&str]) -> SpeciesRecord {
        SpeciesRecord {
            id: SpeciesId::new(id),
            common_name: format!("common {id}"),
            scientific_name: format!("Genus species{}", id.len()),
            description: description.to_string(),
            match_score: 80,
            conservation_status: ConservationStatus::Vulnerable,
            geography: Geography {
                center: Coordinate::new(39.0, 35.0),
                zoom: 7,
                regions: regions.iter().map(|region| (*region).to_string()).collect(),
            },
            genetic_sequence: "ATCG".to_string(),
            researcher: "fixture".to_string(),
            threat_level: 3,
        }
    }

    fn ids(records: &[&SpeciesRecord]) -> Vec<String> {
        records.iter().map(|record| record.id.to_string()).collect()
    }

    fn assert_validation_error_contains(record: &SpeciesRecord, expected_substring: &str) {
        match record.validate() {
            Err(CatalogueError::Validation(message)) => assert!(
                message.contains(expected_substring),
                "expected `{expected_substring}` in `{message}`"
            ),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn builtin_catalogue_satisfies_invariants() {
        let catalogue = Catalogue::builtin();
        assert_eq!(catalogue.len(), 12);
        let rebuilt = Catalogue::new(catalogue.records().to_vec());
        assert_eq!(rebuilt, Ok(catalogue.clone()));
        assert!(catalogue.sequence_report().iter().all(|check| check.valid));
    }

    #[test]
    fn validate_rejects_out_of_range_match_score() {
        let mut record = mk_record("SP-1", "desc", &["Ankara"]);
        record.match_score = 101;
        assert_validation_error_contains(&record, "match_score");
    }

    #[test]
    fn validate_rejects_out_of_range_threat_level() {
        let mut record = mk_record("SP-1", "desc", &["Ankara"]);
        record.threat_level = 0;
        assert_validation_error_contains(&record, "threat_level");
        record.threat_level = 6;
        assert_validation_error_contains(&record, "threat_level");
    }

    #[test]
    fn validate_rejects_missing_regions_and_bad_center() {
        let mut record = mk_record("SP-1", "desc", &[]);
        assert_validation_error_contains(&record, "regions");
        record.geography.regions = vec!["Ankara".to_string()];
        record.geography.center = Coordinate::new(f64::NAN, 10.0);
        assert_validation_error_contains(&record, "center");
    }

    #[test]
    fn catalogue_rejects_case_insensitive_duplicate_ids() {
        let result = Catalogue::new(vec![
            mk_record("SP-1", "a", &["X"]),
            mk_record("sp-1", "b", &["Y"]),
        ]);
        assert_eq!(result, Err(CatalogueError::DuplicateId("sp-1".to_string())));
    }

    #[test]
    fn malformed_sequence_does_not_block_catalogue_construction() {
        let mut record = mk_record("SP-1", "desc", &["Ankara"]);
        record.genetic_sequence = "ATXG".to_string();
        let catalogue = Catalogue::new(vec![record]);
        let Ok(catalogue) = catalogue else {
            panic!("malformed sequence must stay diagnostic-only");
        };
        assert!(!catalogue.sequence_report()[0].valid);
    }

    #[test]
    fn genetic_sequence_validator_accepts_only_nucleotide_alphabet() {
        assert!(validate_genetic_sequence("ATCGN"));
        assert!(validate_genetic_sequence("atcgn"));
        assert!(!validate_genetic_sequence(""));
        assert!(!validate_genetic_sequence("ATCU"));
        assert!(!validate_genetic_sequence("AT CG"));
    }

    #[test]
    fn conservation_label_is_stable_for_critically_endangered() {
        let first = conservation_label("CR");
        let second = ConservationStatus::CriticallyEndangered.label();
        assert_eq!(first, "Kritik Tehlikede (CR)");
        assert_eq!(first, second);
        assert_eq!(conservation_label("ZZ"), "Bilinmiyor");
    }

    #[test]
    fn threat_colors_follow_fixed_scale() {
        assert_eq!(threat_color(1), "#00ff9d");
        assert_eq!(threat_color(3), "#ffdf00");
        assert_eq!(threat_color(5), "#ff0000");
        assert_eq!(threat_color(9), "#888899");
    }

    #[test]
    fn catalogue_parses_json_records() {
        let body = r#"[{
            "id": "SP-9",
            "common_name": "Test Ağacı",
            "scientific_name": "Testus arborea",
            "description": "fixture",
            "match_score": 50,
            "conservation_status": "EX",
            "geography": {"center": {"lat": 40.0, "lon": 30.0}, "zoom": 6, "regions": ["Bolu"]},
            "genetic_sequence": "ACGT",
            "threat_level": 2
        }]"#;
        let catalogue = Catalogue::from_json_str(body);
        let Ok(catalogue) = catalogue else {
            panic!("fixture catalogue should parse: {catalogue:?}");
        };
        assert_eq!(catalogue.records()[0].conservation_status, ConservationStatus::Extinct);
        assert!(catalogue.records()[0].researcher.is_empty());

        let broken = Catalogue::from_json_str("[{\"id\": 1}]");
        assert!(matches!(broken, Err(CatalogueError::Parse(_))));
    }

    #[test]
    fn exact_scientific_name_matches_case_insensitively() {
        let catalogue = Catalogue::builtin();
        let results = catalogue.filter(&SearchQuery::parse("  PINUS PINEA "));
        assert_eq!(ids(&results), vec!["TR-001"]);
    }

    #[test]
    fn region_names_are_searchable() {
        let catalogue = Catalogue::builtin();
        let results = filter("rize", catalogue.records());
        assert_eq!(ids(&results), vec!["TR-003", "TR-006"]);
    }

    #[test]
    fn multi_token_query_requires_every_long_token() {
        let catalogue = Catalogue::builtin();
        let results = filter("erzurum endemik", catalogue.records());
        assert_eq!(ids(&results), vec!["TR-006"]);

        let none = filter("erzurum palmiye", catalogue.records());
        assert!(none.is_empty());
    }

    #[test]
    fn short_tokens_are_ignored_by_multi_token_clause() {
        let catalogue = Catalogue::builtin();
        let results = filter("ab rize", catalogue.records());
        assert_eq!(ids(&results), vec!["TR-003", "TR-006"]);
    }

    #[test]
    fn short_only_query_is_vacuous_under_default_policy() {
        let catalogue = Catalogue::builtin();
        let query = SearchQuery::parse("qq zz");
        assert!(query.tokens().is_empty());
        let matches = explain(&query, catalogue.records());
        assert_eq!(matches.len(), catalogue.len());
        assert!(matches.iter().all(|item| item.reason == MatchReason::VacuousTokens));
    }

    #[test]
    fn short_only_query_matches_nothing_under_require_token_policy() {
        let catalogue = Catalogue::builtin();
        let query = SearchQuery::parse("qq zz").with_policy(ShortQueryPolicy::RequireToken);
        assert!(catalogue.filter(&query).is_empty());

        // Substring still applies: "tr" occurs in every id.
        let query = SearchQuery::parse("tr").with_policy(ShortQueryPolicy::RequireToken);
        assert_eq!(catalogue.filter(&query).len(), catalogue.len());
    }

    #[test]
    fn explain_reports_first_matching_clause() {
        let catalogue = Catalogue::builtin();
        let by_id = explain(&SearchQuery::parse("tr-004"), catalogue.records());
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].reason, MatchReason::ExactId);

        let by_text = explain(&SearchQuery::parse("palmiye"), catalogue.records());
        assert_eq!(by_text.len(), 1);
        assert_eq!(by_text[0].reason, MatchReason::Substring);
        assert_eq!(by_text[0].record.id.as_str(), "TR-005");
    }

    #[test]
    fn dotted_capital_i_is_not_folded_to_ascii() {
        let catalogue = Catalogue::builtin();
        let ascii = SearchQuery::parse("izmir");
        let dotted = SearchQuery::parse("İzmir");
        assert!(catalogue.filter(&ascii).iter().all(|record| record.id.as_str() != "TR-001"));
        assert!(catalogue.filter(&dotted).iter().any(|record| record.id.as_str() == "TR-001"));
    }

    #[test]
    fn filter_meets_baseline_budget() {
        let records = (0..2_000)
            .map(|index| {
                mk_record(&format!("SP-{index:05}"), "synthetic record for budget", &["Ankara"])
            })
            .collect::<Vec<_>>();

        let start = std::time::Instant::now();
        for _ in 0..25 {
            let results = filter("budget ankara", &records);
            assert_eq!(results.len(), records.len());
        }
        assert!(
            start.elapsed() <= std::time::Duration::from_secs(4),
            "filter exceeded baseline budget"
        );
    }

    fn arb_record(index: usize) -> impl Strategy<Value = SpeciesRecord> {
        (
            "[a-z]{3,12}",
            "[a-z ]{0,140}",
            "[ATCGN]{1,40}",
            prop::collection::vec("[a-z]{3,10}", 1..4),
            0_u8..=100,
            1_u8..=5,
        )
            .prop_map(move |(name, description, sequence, regions, score, threat)| {
                SpeciesRecord {
                    id: SpeciesId::new(format!("SP-{index:04}")),
                    common_name: name.clone(),
                    scientific_name: format!("{name} specium"),
                    description,
                    match_score: score,
                    conservation_status: ConservationStatus::NearThreatened,
                    geography: Geography {
                        center: Coordinate::new(38.0, 32.0),
                        zoom: 6,
                        regions,
                    },
                    genetic_sequence: sequence,
                    researcher: String::new(),
                    threat_level: threat,
                }
            })
    }

    fn arb_records() -> impl Strategy<Value = Vec<SpeciesRecord>> {
        (1_usize..12).prop_flat_map(|len| (0..len).map(arb_record).collect::<Vec<_>>())
    }

    proptest! {
        #[test]
        fn property_blank_query_returns_catalogue_in_order(
            records in arb_records(),
            blank in "[ \t\n]{0,8}",
        ) {
            let results = filter(&blank, &records);
            prop_assert_eq!(results.len(), records.len());
            for (result, record) in results.iter().zip(records.iter()) {
                prop_assert_eq!(*result, record);
            }
        }
    }

    proptest! {
        #[test]
        fn property_exact_id_selects_only_that_record(
            records in arb_records(),
            pick in any::<prop::sample::Index>(),
            upper in any::<bool>(),
        ) {
            let target = &records[pick.index(records.len())];
            let query = if upper {
                target.id.as_str().to_uppercase()
            } else {
                target.id.as_str().to_lowercase()
            };
            let results = filter(&query, &records);
            prop_assert_eq!(results.len(), 1);
            prop_assert_eq!(results[0], target);
        }
    }

    proptest! {
        #[test]
        fn property_short_token_queries_admit_everything(
            records in arb_records(),
            tokens in prop::collection::vec("[0-9]{1,2}", 1..4),
        ) {
            // Every record is admitted, by substring or by the vacuous token clause.
            let query = SearchQuery::parse(&tokens.join(" "));
            prop_assert!(query.tokens().is_empty());
            prop_assert_eq!(filter_records(&query, &records).len(), records.len());
        }
    }
}
