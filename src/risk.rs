//! Staleness-based attention tiers and risk status counts.
//!
//! The two signals are independent: a stale record can be `Active` and a
//! fresh one `Stalled`. `risk_status` is taken from the record as supplied.

use crate::store::View;
use crate::types::{AttentionEntry, InvestorRecord, MonitorRow, RiskStatus};
use serde::Serialize;

pub const DEFAULT_STALENESS_THRESHOLD_DAYS: i64 = 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskCounts {
    pub active: usize,
    pub delayed: usize,
    pub stalled: usize,
    pub closed: usize,
}

impl RiskCounts {
    pub fn get(&self, status: RiskStatus) -> usize {
        match status {
            RiskStatus::Active => self.active,
            RiskStatus::Delayed => self.delayed,
            RiskStatus::Stalled => self.stalled,
            RiskStatus::Closed => self.closed,
        }
    }

    pub fn total(&self) -> usize {
        self.active + self.delayed + self.stalled + self.closed
    }
}

pub fn risk_counts(view: &View<'_>) -> RiskCounts {
    let mut counts = RiskCounts::default();
    for r in view.iter() {
        match r.risk_status {
            RiskStatus::Active => counts.active += 1,
            RiskStatus::Delayed => counts.delayed += 1,
            RiskStatus::Stalled => counts.stalled += 1,
            RiskStatus::Closed => counts.closed += 1,
        }
    }
    counts
}

/// Records with `days_since_activity > threshold_days`, most stale first.
/// Equal staleness keeps view order.
pub fn attention_records<'a>(view: &View<'a>, threshold_days: i64) -> Vec<&'a InvestorRecord> {
    let mut stale: Vec<&'a InvestorRecord> = view
        .iter()
        .filter(|r| r.days_since_activity > threshold_days)
        .collect();
    stale.sort_by(|a, b| b.days_since_activity.cmp(&a.days_since_activity));
    tracing::debug!(
        threshold_days,
        stale = stale.len(),
        of = view.len(),
        "Classified attention set"
    );
    stale
}

pub fn attention_set(view: &View<'_>, threshold_days: i64) -> Vec<AttentionEntry> {
    attention_records(view, threshold_days)
        .into_iter()
        .map(|r| AttentionEntry {
            firm_name: r.firm_name.clone(),
            stage: r.current_stage,
            days_since_activity: r.days_since_activity,
            next_action: r.next_action.clone(),
            risk_status: r.risk_status,
        })
        .collect()
}

/// One status row per record, in view order.
pub fn status_monitor(view: &View<'_>) -> Vec<MonitorRow> {
    view.iter()
        .map(|r| MonitorRow {
            firm_name: r.firm_name.clone(),
            investor_type: r.investor_type,
            stage: r.current_stage,
            risk_status: r.risk_status,
            days_since_activity: r.days_since_activity,
            next_action: r.next_action.clone(),
            last_activity_period: r.last_activity_period.to_string(),
        })
        .collect()
}
