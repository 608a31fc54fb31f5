//! Report data shaping.
//!
//! [`build_summary`] decides which rows and figures go into the executive
//! summary; `render` turns the result into markup. [`export_csv`] is the flat
//! tabular export.

use crate::error::TrackerError;
use crate::kpi::{
    investor_type_split, risk_breakdown, secondary_figures, stage_funnel, top_investors,
    top_locations_by_investment, KpiSet, SecondaryFigures,
};
use crate::risk::attention_records;
use crate::settings::AnalysisSettings;
use crate::store::View;
use crate::types::{
    ExportRow, InvestorTypeRow, LocationTotalRow, RiskBreakdownRow, StageCount, TopInvestorRow,
    EXPORT_HEADERS,
};
use chrono::NaiveDate;
use serde::Serialize;

/// Everything the executive summary shows, independent of presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub reference_date: NaiveDate,
    pub kpis: KpiSet,
    pub secondary: SecondaryFigures,
    pub stage_funnel: Vec<StageCount>,
    pub top_investors: Vec<TopInvestorRow>,
    pub risk_breakdown: Vec<RiskBreakdownRow>,
    pub top_locations: Vec<LocationTotalRow>,
    pub investor_types: Vec<InvestorTypeRow>,
    pub staleness_threshold_days: i64,
    pub attention_count: usize,
}

impl SummaryReport {
    pub fn investors_tracked(&self) -> usize {
        self.secondary.total_investors
    }
}

pub fn build_summary(view: &View<'_>, kpis: &KpiSet, analysis: &AnalysisSettings) -> SummaryReport {
    if view.is_empty() {
        tracing::warn!("Building summary for an empty view");
    }
    SummaryReport {
        reference_date: analysis.reference_date,
        kpis: kpis.clone(),
        secondary: secondary_figures(view),
        stage_funnel: stage_funnel(view),
        top_investors: top_investors(view, analysis.top_investors),
        risk_breakdown: risk_breakdown(view),
        top_locations: top_locations_by_investment(view, analysis.top_locations),
        investor_types: investor_type_split(kpis),
        staleness_threshold_days: analysis.staleness_threshold_days,
        attention_count: attention_records(view, analysis.staleness_threshold_days).len(),
    }
}

/// Serializes the view as CSV: a header row, then one row per record in
/// view order. Absent quantities are empty cells.
pub fn export_csv(view: &View<'_>) -> Result<String, TrackerError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    // Written by hand so an empty view still gets a header.
    wtr.write_record(EXPORT_HEADERS)?;
    for r in view.iter() {
        wtr.serialize(ExportRow::from(r))?;
    }
    let bytes = wtr.into_inner().map_err(|e| TrackerError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| TrackerError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
