//! KPI aggregation over a view.
//!
//! Every aggregate here skips absent optional values rather than counting
//! them as zero, and every function accepts an empty view.

use crate::store::View;
use crate::types::{
    InvestorRecord, InvestorType, InvestorTypeRow, LocationTotalRow, RiskBreakdownRow, RiskStatus,
    Stage, StageCount, TopInvestorRow,
};
use crate::util::{mean_present, percentage};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// The fixed set of headline metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalInvestment,
    TotalDirectEmployment,
    TotalIndirectEmployment,
    TotalLandRequested,
    TotalWaterfront,
    MousSigned,
    ActiveInvestors,
    DelayedOrStalled,
    DomesticCount,
    InternationalCount,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::TotalInvestment,
        Metric::TotalDirectEmployment,
        Metric::TotalIndirectEmployment,
        Metric::TotalLandRequested,
        Metric::TotalWaterfront,
        Metric::MousSigned,
        Metric::ActiveInvestors,
        Metric::DelayedOrStalled,
        Metric::DomesticCount,
        Metric::InternationalCount,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Metric::TotalInvestment => "total_investment",
            Metric::TotalDirectEmployment => "total_direct_employment",
            Metric::TotalIndirectEmployment => "total_indirect_employment",
            Metric::TotalLandRequested => "total_land_requested",
            Metric::TotalWaterfront => "total_waterfront",
            Metric::MousSigned => "mous_signed",
            Metric::ActiveInvestors => "active_investors",
            Metric::DelayedOrStalled => "delayed_or_stalled",
            Metric::DomesticCount => "domestic_count",
            Metric::InternationalCount => "international_count",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::TotalInvestment => "Total Investment",
            Metric::TotalDirectEmployment => "Direct Jobs",
            Metric::TotalIndirectEmployment => "Indirect Jobs",
            Metric::TotalLandRequested => "Acres Required",
            Metric::TotalWaterfront => "Waterfront (m)",
            Metric::MousSigned => "MoUs Signed",
            Metric::ActiveInvestors => "Active Investors",
            Metric::DelayedOrStalled => "Delayed/Stalled",
            Metric::DomesticCount => "Domestic Investors",
            Metric::InternationalCount => "International Investors",
        }
    }
}

/// Headline figures for a view. Always fully populated; an empty view gives
/// all zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiSet {
    pub total_investment: f64,
    pub total_direct_employment: u64,
    pub total_indirect_employment: u64,
    pub total_land_requested: f64,
    pub total_waterfront: f64,
    pub mous_signed: usize,
    pub active_investors: usize,
    pub delayed_or_stalled: usize,
    pub domestic_count: usize,
    pub international_count: usize,
}

impl KpiSet {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TotalInvestment => self.total_investment,
            Metric::TotalDirectEmployment => self.total_direct_employment as f64,
            Metric::TotalIndirectEmployment => self.total_indirect_employment as f64,
            Metric::TotalLandRequested => self.total_land_requested,
            Metric::TotalWaterfront => self.total_waterfront,
            Metric::MousSigned => self.mous_signed as f64,
            Metric::ActiveInvestors => self.active_investors as f64,
            Metric::DelayedOrStalled => self.delayed_or_stalled as f64,
            Metric::DomesticCount => self.domestic_count as f64,
            Metric::InternationalCount => self.international_count as f64,
        }
    }

    /// `(metric, value)` for every metric, in `Metric::ALL` order.
    pub fn entries(&self) -> Vec<(Metric, f64)> {
        Metric::ALL.iter().map(|m| (*m, self.get(*m))).collect()
    }

    pub fn total_investors(&self) -> usize {
        self.domestic_count + self.international_count
    }

    pub fn total_employment(&self) -> u64 {
        self.total_direct_employment + self.total_indirect_employment
    }
}

/// Sum of the present values of `field`.
pub fn sum_present<F>(view: &View<'_>, field: F) -> f64
where
    F: Fn(&InvestorRecord) -> Option<f64>,
{
    view.iter().filter_map(|r| field(r)).sum()
}

fn sum_count<F>(view: &View<'_>, field: F) -> u64
where
    F: Fn(&InvestorRecord) -> Option<u32>,
{
    view.iter().filter_map(|r| field(r)).map(u64::from).sum()
}

fn count_where<F>(view: &View<'_>, pred: F) -> usize
where
    F: Fn(&InvestorRecord) -> bool,
{
    view.iter().filter(|r| pred(r)).count()
}

pub fn calculate_kpis(view: &View<'_>) -> KpiSet {
    KpiSet {
        total_investment: sum_present(view, |r| r.investment_amount),
        total_direct_employment: sum_count(view, |r| r.direct_employment),
        total_indirect_employment: sum_count(view, |r| r.indirect_employment),
        total_land_requested: sum_present(view, |r| r.land_requirement),
        total_waterfront: sum_present(view, |r| r.waterfront_requirement),
        mous_signed: count_where(view, |r| r.current_stage == Stage::MouSigned),
        active_investors: count_where(view, |r| r.risk_status == RiskStatus::Active),
        delayed_or_stalled: count_where(view, |r| {
            matches!(r.risk_status, RiskStatus::Delayed | RiskStatus::Stalled)
        }),
        domestic_count: count_where(view, |r| r.investor_type == InvestorType::Domestic),
        international_count: count_where(view, |r| r.investor_type == InvestorType::International),
    }
}

/// Secondary figures shown next to the headline KPIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SecondaryFigures {
    pub total_investors: usize,
    pub total_employment: u64,
    pub distinct_locations: usize,
    /// `None` when no record in the view states a draft requirement.
    pub average_draft: Option<f64>,
    pub domestic_investment: f64,
    pub international_investment: f64,
}

pub fn secondary_figures(view: &View<'_>) -> SecondaryFigures {
    let kpis = calculate_kpis(view);
    let by_type = |t: InvestorType| -> f64 {
        view.iter()
            .filter(|r| r.investor_type == t)
            .filter_map(|r| r.investment_amount)
            .sum()
    };
    let mut locations: Vec<&str> = view.iter().map(|r| r.location_interest.as_str()).collect();
    locations.sort_unstable();
    locations.dedup();
    SecondaryFigures {
        total_investors: view.len(),
        total_employment: kpis.total_employment(),
        distinct_locations: locations.len(),
        average_draft: mean_present(view.iter().map(|r| r.draft_requirement)),
        domestic_investment: by_type(InvestorType::Domestic),
        international_investment: by_type(InvestorType::International),
    }
}

/// Count per funnel stage, in funnel order, omitting stages absent from the
/// view. Off-funnel stages are never reported.
pub fn stage_funnel(view: &View<'_>) -> Vec<StageCount> {
    Stage::FUNNEL
        .iter()
        .map(|s| StageCount {
            stage: *s,
            count: count_where(view, |r| r.current_stage == *s),
        })
        .filter(|c| c.count > 0)
        .collect()
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Up to `n` records ranked by `field`, largest first. Records without a
/// value are left out; equal values keep view order.
pub fn top_by<'a, F>(view: &View<'a>, n: usize, field: F) -> Vec<(&'a InvestorRecord, f64)>
where
    F: Fn(&InvestorRecord) -> Option<f64>,
{
    let mut ranked: Vec<(&'a InvestorRecord, f64)> =
        view.iter().filter_map(|r| field(r).map(|v| (r, v))).collect();
    // `sort_by` is stable.
    ranked.sort_by(|a, b| descending(a.1, b.1));
    ranked.truncate(n);
    ranked
}

pub fn top_investors(view: &View<'_>, n: usize) -> Vec<TopInvestorRow> {
    top_by(view, n, |r| r.investment_amount)
        .into_iter()
        .enumerate()
        .map(|(idx, (r, amount))| TopInvestorRow {
            rank: idx + 1,
            firm_name: r.firm_name.clone(),
            investment: amount,
            stage: r.current_stage,
        })
        .collect()
}

/// Sums `field` per literal `location_interest` value. Groups whose total is
/// not positive are dropped; the rest are sorted largest first with ties in
/// first-appearance order.
pub fn location_totals<F>(view: &View<'_>, field: F) -> Vec<LocationTotalRow>
where
    F: Fn(&InvestorRecord) -> Option<f64>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<LocationTotalRow> = Vec::new();
    for r in view.iter() {
        let slot = *index.entry(r.location_interest.as_str()).or_insert_with(|| {
            groups.push(LocationTotalRow {
                location: r.location_interest.clone(),
                total: 0.0,
            });
            groups.len() - 1
        });
        if let Some(v) = field(r) {
            groups[slot].total += v;
        }
    }
    groups.retain(|g| g.total > 0.0);
    groups.sort_by(|a, b| descending(a.total, b.total));
    groups
}

pub fn top_locations_by_investment(view: &View<'_>, n: usize) -> Vec<LocationTotalRow> {
    let mut rows = location_totals(view, |r| r.investment_amount);
    rows.truncate(n);
    rows
}

/// Share of the view per risk status. Statuses absent from the view are
/// omitted; rows are ordered by count, ties in status order.
pub fn risk_breakdown(view: &View<'_>) -> Vec<RiskBreakdownRow> {
    let total = view.len();
    let mut rows: Vec<RiskBreakdownRow> = RiskStatus::ALL
        .iter()
        .map(|s| {
            let count = count_where(view, |r| r.risk_status == *s);
            RiskBreakdownRow {
                status: *s,
                count,
                percentage: percentage(count, total),
            }
        })
        .filter(|row| row.count > 0)
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Domestic and international rows, always both present.
pub fn investor_type_split(kpis: &KpiSet) -> Vec<InvestorTypeRow> {
    let total = kpis.total_investors();
    [
        (InvestorType::Domestic, kpis.domestic_count),
        (InvestorType::International, kpis.international_count),
    ]
    .into_iter()
    .map(|(investor_type, count)| InvestorTypeRow {
        investor_type,
        count,
        percentage: percentage(count, total),
    })
    .collect()
}
