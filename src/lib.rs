//! # Investor portfolio analytics
//!
//! Tracks prospective investors for a maritime infrastructure authority and
//! turns filtered views of them into KPIs, follow-up priorities and reports.
//!
//! Data flows one way: [`loader`] builds an immutable [`RecordStore`],
//! [`filters`] narrows it to a [`View`], and [`kpi`], [`risk`] and
//! [`breakdowns`] compute over that view. [`reports`] shapes the results into
//! a [`SummaryReport`] and a CSV export; [`render`] turns the report into
//! HTML and [`output`] writes artifacts atomically.
//!
//! Everything is synchronous and pure over borrowed data. A [`ViewCache`]
//! memoizes per-selection results for callers that re-query often.

pub mod breakdowns;
pub mod cache;
pub mod error;
pub mod filters;
pub mod kpi;
pub mod loader;
pub mod output;
pub mod render;
pub mod reports;
pub mod risk;
pub mod settings;
pub mod store;
pub mod types;
pub mod util;

#[cfg(test)]
mod test_support;

pub use cache::{Snapshot, ViewCache};
pub use error::TrackerError;
pub use filters::{FilterOptions, FilterSelection};
pub use kpi::{KpiSet, Metric};
pub use reports::SummaryReport;
pub use settings::Settings;
pub use store::{RecordStore, View};
pub use types::{InvestorRecord, InvestorType, RiskStatus, Stage};
