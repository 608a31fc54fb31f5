//! Filter composition over record views.
//!
//! A [`FilterSelection`] is the shell's four selector values; each unset slot
//! is the "All" sentinel and matches everything. Filters are ANDed, so they
//! can be applied in any order with the same result.

use crate::error::TrackerError;
use crate::store::{RecordStore, View};
use crate::types::{InvestorRecord, InvestorType, RiskStatus, Stage};
use serde::Serialize;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Selector value meaning "no filter".
pub const ALL: &str = "All";

/// A single predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Case-insensitive substring of `location_interest`. Stored lowercased.
    Location(String),
    InvestorType(InvestorType),
    Stage(Stage),
    RiskStatus(RiskStatus),
}

impl Filter {
    pub fn location(needle: &str) -> Filter {
        Filter::Location(needle.trim().to_lowercase())
    }

    pub fn matches(&self, r: &InvestorRecord) -> bool {
        match self {
            Filter::Location(needle) => r.location_interest.to_lowercase().contains(needle.as_str()),
            Filter::InvestorType(t) => r.investor_type == *t,
            Filter::Stage(s) => r.current_stage == *s,
            Filter::RiskStatus(s) => r.risk_status == *s,
        }
    }

    pub fn apply<'a>(&self, view: &View<'a>) -> View<'a> {
        view.retain_by(|r| self.matches(r))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterSelection {
    location: Option<String>,
    pub investor_type: Option<InvestorType>,
    pub stage: Option<Stage>,
    pub risk_status: Option<RiskStatus>,
}

impl FilterSelection {
    /// No filters: every record passes.
    pub fn all() -> Self {
        Self::default()
    }

    /// Sets the location substring. Blank input and `All` clear it; the
    /// stored needle is lowercased so equivalent selections hash alike.
    pub fn with_location(mut self, needle: &str) -> Self {
        let needle = needle.trim();
        self.location = if needle.is_empty() || needle.eq_ignore_ascii_case(ALL) {
            None
        } else {
            Some(needle.to_lowercase())
        };
        self
    }

    pub fn with_investor_type(mut self, t: InvestorType) -> Self {
        self.investor_type = Some(t);
        self
    }

    pub fn with_stage(mut self, s: Stage) -> Self {
        self.stage = Some(s);
        self
    }

    pub fn with_risk_status(mut self, s: RiskStatus) -> Self {
        self.risk_status = Some(s);
        self
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn is_unfiltered(&self) -> bool {
        self.filters().is_empty()
    }

    /// The active predicates, one per set slot.
    pub fn filters(&self) -> Vec<Filter> {
        let mut out = Vec::new();
        if let Some(l) = &self.location {
            out.push(Filter::location(l));
        }
        if let Some(t) = self.investor_type {
            out.push(Filter::InvestorType(t));
        }
        if let Some(s) = self.stage {
            out.push(Filter::Stage(s));
        }
        if let Some(s) = self.risk_status {
            out.push(Filter::RiskStatus(s));
        }
        out
    }

    /// Narrows `base` to the records every active filter accepts.
    pub fn apply<'a>(&self, base: &View<'a>) -> View<'a> {
        let filters = self.filters();
        let view = base.retain_by(|r| filters.iter().all(|f| f.matches(r)));
        tracing::debug!(
            filters = filters.len(),
            before = base.len(),
            after = view.len(),
            "Applied filter selection"
        );
        view
    }
}

/// Parses a selector value, mapping the `All` sentinel (any case) to `None`.
pub fn parse_choice<T>(s: &str) -> Result<Option<T>, TrackerError>
where
    T: FromStr<Err = TrackerError>,
{
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case(ALL) {
        return Ok(None);
    }
    s.parse().map(Some)
}

/// Selector contents: `All` followed by the distinct store values, sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub locations: Vec<String>,
    pub investor_types: Vec<String>,
    pub stages: Vec<String>,
    pub risk_statuses: Vec<String>,
}

impl FilterOptions {
    pub fn from_store(store: &RecordStore) -> Self {
        fn options<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
            let distinct: BTreeSet<&str> = values.collect();
            std::iter::once(ALL)
                .chain(distinct)
                .map(str::to_string)
                .collect()
        }
        let records = store.records();
        FilterOptions {
            locations: options(records.iter().map(|r| r.location_interest.as_str())),
            investor_types: options(records.iter().map(|r| r.investor_type.label())),
            stages: options(records.iter().map(|r| r.current_stage.label())),
            risk_statuses: options(records.iter().map(|r| r.risk_status.label())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_reference, LoadOptions};
    use crate::settings::Settings;

    fn store() -> RecordStore {
        load_reference(&LoadOptions::from(&Settings::default())).unwrap().0
    }

    #[test]
    fn test_no_filters_is_identity() {
        let store = store();
        let view = FilterSelection::all().apply(&store.view());
        assert_eq!(view, store.view());
    }

    #[test]
    fn test_location_is_case_insensitive_substring() {
        let store = store();
        let view = FilterSelection::all()
            .with_location("kAKinada")
            .apply(&store.view());
        assert_eq!(view.len(), 6);
        assert!(view
            .iter()
            .all(|r| r.location_interest.to_lowercase().contains("kakinada")));
        // Multi-site entries match on any component.
        assert!(view
            .firm_names()
            .contains(&"Hindustan Shipyard Limited (HSL)"));
    }

    #[test]
    fn test_all_sentinel_clears_location() {
        let sel = FilterSelection::all().with_location(" all ");
        assert_eq!(sel.location(), None);
        assert!(sel.is_unfiltered());
    }

    #[test]
    fn test_exact_match_filters() {
        let store = store();
        let view = FilterSelection::all()
            .with_investor_type(InvestorType::International)
            .apply(&store.view());
        assert_eq!(view.len(), 3);

        let view = FilterSelection::all()
            .with_stage(Stage::MouSigned)
            .with_risk_status(RiskStatus::Active)
            .apply(&store.view());
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_filter_order_does_not_matter() {
        let store = store();
        let sel = FilterSelection::all()
            .with_location("machilipatnam")
            .with_investor_type(InvestorType::Domestic)
            .with_risk_status(RiskStatus::Delayed);
        let filters = sel.filters();

        let forward = filters
            .iter()
            .fold(store.view(), |v, f| f.apply(&v));
        let backward = filters
            .iter()
            .rev()
            .fold(store.view(), |v, f| f.apply(&v));
        assert_eq!(forward, backward);
        assert_eq!(forward, sel.apply(&store.view()));

        let by_hand = [
            Filter::RiskStatus(RiskStatus::Delayed),
            Filter::location("  MACHILIPATNAM "),
            Filter::InvestorType(InvestorType::Domestic),
        ]
        .iter()
        .fold(store.view(), |v, f| f.apply(&v));
        assert_eq!(by_hand, forward);
    }

    #[test]
    fn test_filtering_is_idempotent_and_shrinking() {
        let store = store();
        let sel = FilterSelection::all().with_risk_status(RiskStatus::Stalled);
        let once = sel.apply(&store.view());
        let twice = sel.apply(&once);
        assert_eq!(once, twice);
        assert!(once.len() <= store.len());
    }

    #[test]
    fn test_unmatched_location_yields_empty_view() {
        let store = store();
        let view = FilterSelection::all()
            .with_location("Atlantis")
            .apply(&store.view());
        assert!(view.is_empty());
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice::<Stage>("All").unwrap(), None);
        assert_eq!(
            parse_choice::<Stage>("mou signed").unwrap(),
            Some(Stage::MouSigned)
        );
        assert!(parse_choice::<RiskStatus>("Paused").is_err());
    }

    #[test]
    fn test_filter_options_are_sorted_with_all_first() {
        let opts = FilterOptions::from_store(&store());
        assert_eq!(opts.investor_types, vec!["All", "Domestic", "International"]);
        assert_eq!(opts.risk_statuses, vec!["All", "Active", "Closed", "Delayed", "Stalled"]);
        assert_eq!(opts.locations[0], "All");
        assert_eq!(opts.locations.len(), 13);
    }
}
