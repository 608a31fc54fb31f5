//! Memoized views keyed by filter selection.
//!
//! The cache is owned by its caller and borrows the store; there is no
//! process-wide state. Each snapshot computes its KPIs and attention set on
//! first use only.

use crate::filters::FilterSelection;
use crate::kpi::{calculate_kpis, KpiSet};
use crate::risk::attention_set;
use crate::store::{RecordStore, View};
use crate::types::AttentionEntry;
use once_cell::unsync::OnceCell;
use std::collections::HashMap;

#[derive(Debug)]
pub struct Snapshot<'a> {
    view: View<'a>,
    threshold_days: i64,
    kpis: OnceCell<KpiSet>,
    attention: OnceCell<Vec<AttentionEntry>>,
}

impl<'a> Snapshot<'a> {
    fn new(view: View<'a>, threshold_days: i64) -> Self {
        Self {
            view,
            threshold_days,
            kpis: OnceCell::new(),
            attention: OnceCell::new(),
        }
    }

    pub fn view(&self) -> &View<'a> {
        &self.view
    }

    pub fn kpis(&self) -> &KpiSet {
        self.kpis.get_or_init(|| calculate_kpis(&self.view))
    }

    pub fn attention(&self) -> &[AttentionEntry] {
        self.attention
            .get_or_init(|| attention_set(&self.view, self.threshold_days))
    }
}

#[derive(Debug)]
pub struct ViewCache<'a> {
    store: &'a RecordStore,
    threshold_days: i64,
    entries: HashMap<FilterSelection, Snapshot<'a>>,
}

impl<'a> ViewCache<'a> {
    pub fn new(store: &'a RecordStore, threshold_days: i64) -> Self {
        Self {
            store,
            threshold_days,
            entries: HashMap::new(),
        }
    }

    /// The snapshot for `selection`, filtering the store on first request.
    pub fn snapshot(&mut self, selection: &FilterSelection) -> &Snapshot<'a> {
        let store = self.store;
        let threshold_days = self.threshold_days;
        self.entries.entry(selection.clone()).or_insert_with(|| {
            tracing::debug!(?selection, "View cache miss");
            Snapshot::new(selection.apply(&store.view()), threshold_days)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_reference, LoadOptions};
    use crate::settings::Settings;
    use crate::types::InvestorType;

    #[test]
    fn test_equivalent_selections_share_an_entry() {
        let store = load_reference(&LoadOptions::from(&Settings::default()))
            .unwrap()
            .0;
        let mut cache = ViewCache::new(&store, 60);

        let a = FilterSelection::all().with_location("Kakinada");
        let b = FilterSelection::all().with_location("  KAKINADA ");
        assert_eq!(cache.snapshot(&a).view().len(), 6);
        assert_eq!(cache.snapshot(&b).view().len(), 6);
        assert_eq!(cache.len(), 1);

        let intl = FilterSelection::all().with_investor_type(InvestorType::International);
        let snap = cache.snapshot(&intl);
        assert_eq!(snap.kpis().international_count, 3);
        assert!((snap.kpis().total_land_requested - 500.0).abs() < 1e-9);
        assert_eq!(snap.attention().len(), 3);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_snapshot_matches_direct_computation() {
        let store = load_reference(&LoadOptions::from(&Settings::default()))
            .unwrap()
            .0;
        let mut cache = ViewCache::new(&store, 60);
        let snap = cache.snapshot(&FilterSelection::all());
        assert_eq!(snap.kpis(), &calculate_kpis(&store.view()));
        assert_eq!(snap.attention(), attention_set(&store.view(), 60).as_slice());
    }
}
