use crate::error::TrackerError;
use crate::util::{format_number, format_optional, format_percent};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum InvestorType {
    Domestic,
    International,
}

impl InvestorType {
    pub const ALL: [InvestorType; 2] = [InvestorType::Domestic, InvestorType::International];

    pub fn label(self) -> &'static str {
        match self {
            InvestorType::Domestic => "Domestic",
            InvestorType::International => "International",
        }
    }
}

/// Pipeline stage of an investor. The first seven variants form the stage
/// funnel, in funnel order; `Inactive` and `Declined` sit outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Stage {
    #[serde(rename = "Early Discussion")]
    EarlyDiscussion,
    #[serde(rename = "EOI Submitted")]
    EoiSubmitted,
    #[serde(rename = "Site Visit Complete")]
    SiteVisitComplete,
    #[serde(rename = "DPR Pending")]
    DprPending,
    #[serde(rename = "MoU Signed")]
    MouSigned,
    #[serde(rename = "Land Allotted")]
    LandAllotted,
    #[serde(rename = "High-Level Meeting")]
    HighLevelMeeting,
    Inactive,
    Declined,
}

impl Stage {
    pub const FUNNEL: [Stage; 7] = [
        Stage::EarlyDiscussion,
        Stage::EoiSubmitted,
        Stage::SiteVisitComplete,
        Stage::DprPending,
        Stage::MouSigned,
        Stage::LandAllotted,
        Stage::HighLevelMeeting,
    ];

    pub const ALL: [Stage; 9] = [
        Stage::EarlyDiscussion,
        Stage::EoiSubmitted,
        Stage::SiteVisitComplete,
        Stage::DprPending,
        Stage::MouSigned,
        Stage::LandAllotted,
        Stage::HighLevelMeeting,
        Stage::Inactive,
        Stage::Declined,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::EarlyDiscussion => "Early Discussion",
            Stage::EoiSubmitted => "EOI Submitted",
            Stage::SiteVisitComplete => "Site Visit Complete",
            Stage::DprPending => "DPR Pending",
            Stage::MouSigned => "MoU Signed",
            Stage::LandAllotted => "Land Allotted",
            Stage::HighLevelMeeting => "High-Level Meeting",
            Stage::Inactive => "Inactive",
            Stage::Declined => "Declined",
        }
    }

    pub fn in_funnel(self) -> bool {
        Stage::FUNNEL.contains(&self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RiskStatus {
    Active,
    Delayed,
    Stalled,
    Closed,
}

impl RiskStatus {
    pub const ALL: [RiskStatus; 4] = [
        RiskStatus::Active,
        RiskStatus::Delayed,
        RiskStatus::Stalled,
        RiskStatus::Closed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RiskStatus::Active => "Active",
            RiskStatus::Delayed => "Delayed",
            RiskStatus::Stalled => "Stalled",
            RiskStatus::Closed => "Closed",
        }
    }
}

// Labels are matched case-insensitively so CLI input like `mou signed` works.
macro_rules! label_enum {
    ($ty:ident, $kind:literal) => {
        impl FromStr for $ty {
            type Err = TrackerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(s))
                    .ok_or_else(|| TrackerError::UnknownLabel {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

label_enum!(InvestorType, "investor type");
label_enum!(Stage, "stage");
label_enum!(RiskStatus, "risk status");

/// Calendar month of the most recent contact, e.g. `November 2025`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActivityPeriod {
    first_day: NaiveDate,
}

impl ActivityPeriod {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| ActivityPeriod { first_day })
    }

    pub fn first_day(self) -> NaiveDate {
        self.first_day
    }
}

impl FromStr for ActivityPeriod {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono needs a day to build a date, so pin it to the first.
        let first_day = NaiveDate::parse_from_str(&format!("1 {}", s.trim()), "%d %B %Y")?;
        Ok(ActivityPeriod { first_day })
    }
}

impl fmt::Display for ActivityPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_day.format("%B %Y"))
    }
}

impl Serialize for ActivityPeriod {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the investor dataset as it appears on disk. Every column is
/// read as text so validation can report the offending value verbatim.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Firm_Name")]
    pub firm_name: Option<String>,
    #[serde(rename = "Investor_Type")]
    pub investor_type: Option<String>,
    #[serde(rename = "Sector")]
    pub sector: Option<String>,
    #[serde(rename = "Location_Interest")]
    pub location_interest: Option<String>,
    #[serde(rename = "Current_Stage")]
    pub current_stage: Option<String>,
    #[serde(rename = "Investment_INR_Cr")]
    pub investment_amount: Option<String>,
    #[serde(rename = "Land_Requirement_Acres")]
    pub land_requirement: Option<String>,
    #[serde(rename = "Waterfront_Requirement_Meters")]
    pub waterfront_requirement: Option<String>,
    #[serde(rename = "Draft_Requirement_Meters")]
    pub draft_requirement: Option<String>,
    #[serde(rename = "Direct_Employment")]
    pub direct_employment: Option<String>,
    #[serde(rename = "Indirect_Employment")]
    pub indirect_employment: Option<String>,
    #[serde(rename = "Support_Requested")]
    pub support_requested: Option<String>,
    #[serde(rename = "Risk_Status")]
    pub risk_status: Option<String>,
    #[serde(rename = "Next_Action")]
    pub next_action: Option<String>,
    #[serde(rename = "Last_Activity_Month")]
    pub last_activity_month: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
}

/// A validated investor. Built once at load and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestorRecord {
    pub firm_name: String,
    pub investor_type: InvestorType,
    pub sector: String,
    pub location_interest: String,
    pub current_stage: Stage,
    /// INR crore.
    pub investment_amount: Option<f64>,
    /// Acres.
    pub land_requirement: Option<f64>,
    /// Metres of quay frontage.
    pub waterfront_requirement: Option<f64>,
    /// Metres.
    pub draft_requirement: Option<f64>,
    pub direct_employment: Option<u32>,
    pub indirect_employment: Option<u32>,
    pub support_requested: String,
    pub risk_status: RiskStatus,
    pub next_action: String,
    pub last_activity_period: ActivityPeriod,
    pub country: String,
    pub last_activity_date: NaiveDate,
    pub days_since_activity: i64,
}

/// Flat export row. Column names match the dataset headers so an export can
/// be loaded back; the two derived columns are ignored on reload.
#[derive(Debug, Serialize)]
pub struct ExportRow<'a> {
    #[serde(rename = "Firm_Name")]
    pub firm_name: &'a str,
    #[serde(rename = "Investor_Type")]
    pub investor_type: InvestorType,
    #[serde(rename = "Sector")]
    pub sector: &'a str,
    #[serde(rename = "Location_Interest")]
    pub location_interest: &'a str,
    #[serde(rename = "Current_Stage")]
    pub current_stage: Stage,
    #[serde(rename = "Investment_INR_Cr")]
    pub investment_amount: Option<f64>,
    #[serde(rename = "Land_Requirement_Acres")]
    pub land_requirement: Option<f64>,
    #[serde(rename = "Waterfront_Requirement_Meters")]
    pub waterfront_requirement: Option<f64>,
    #[serde(rename = "Draft_Requirement_Meters")]
    pub draft_requirement: Option<f64>,
    #[serde(rename = "Direct_Employment")]
    pub direct_employment: Option<u32>,
    #[serde(rename = "Indirect_Employment")]
    pub indirect_employment: Option<u32>,
    #[serde(rename = "Support_Requested")]
    pub support_requested: &'a str,
    #[serde(rename = "Risk_Status")]
    pub risk_status: RiskStatus,
    #[serde(rename = "Next_Action")]
    pub next_action: &'a str,
    #[serde(rename = "Last_Activity_Month")]
    pub last_activity_period: ActivityPeriod,
    #[serde(rename = "Country")]
    pub country: &'a str,
    #[serde(rename = "Last_Activity_Date")]
    pub last_activity_date: NaiveDate,
    #[serde(rename = "Days_Since_Activity")]
    pub days_since_activity: i64,
}

pub const EXPORT_HEADERS: [&str; 18] = [
    "Firm_Name",
    "Investor_Type",
    "Sector",
    "Location_Interest",
    "Current_Stage",
    "Investment_INR_Cr",
    "Land_Requirement_Acres",
    "Waterfront_Requirement_Meters",
    "Draft_Requirement_Meters",
    "Direct_Employment",
    "Indirect_Employment",
    "Support_Requested",
    "Risk_Status",
    "Next_Action",
    "Last_Activity_Month",
    "Country",
    "Last_Activity_Date",
    "Days_Since_Activity",
];

impl<'a> From<&'a InvestorRecord> for ExportRow<'a> {
    fn from(r: &'a InvestorRecord) -> Self {
        ExportRow {
            firm_name: &r.firm_name,
            investor_type: r.investor_type,
            sector: &r.sector,
            location_interest: &r.location_interest,
            current_stage: r.current_stage,
            investment_amount: r.investment_amount,
            land_requirement: r.land_requirement,
            waterfront_requirement: r.waterfront_requirement,
            draft_requirement: r.draft_requirement,
            direct_employment: r.direct_employment,
            indirect_employment: r.indirect_employment,
            support_requested: &r.support_requested,
            risk_status: r.risk_status,
            next_action: &r.next_action,
            last_activity_period: r.last_activity_period,
            country: &r.country,
            last_activity_date: r.last_activity_date,
            days_since_activity: r.days_since_activity,
        }
    }
}

fn display_amount(v: &f64) -> String {
    format_number(*v, 0)
}

fn display_percent(v: &f64) -> String {
    format_percent(*v)
}

fn display_optional(v: &Option<f64>) -> String {
    format_optional(*v, 1)
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct StageCount {
    #[serde(rename = "Stage")]
    #[tabled(rename = "Stage")]
    pub stage: Stage,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct TopInvestorRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Firm")]
    #[tabled(rename = "Firm")]
    pub firm_name: String,
    #[serde(rename = "InvestmentCr")]
    #[tabled(rename = "InvestmentCr", display_with = "display_amount")]
    pub investment: f64,
    #[serde(rename = "Stage")]
    #[tabled(rename = "Stage")]
    pub stage: Stage,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct RiskBreakdownRow {
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: RiskStatus,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Percentage")]
    #[tabled(rename = "Percentage", display_with = "display_percent")]
    pub percentage: f64,
}

/// A location group with a summed quantity (investment or land).
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct LocationTotalRow {
    #[serde(rename = "Location")]
    #[tabled(rename = "Location")]
    pub location: String,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total", display_with = "display_amount")]
    pub total: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct InvestorTypeRow {
    #[serde(rename = "Type")]
    #[tabled(rename = "Type")]
    pub investor_type: InvestorType,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Percentage")]
    #[tabled(rename = "Percentage", display_with = "display_percent")]
    pub percentage: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct AttentionEntry {
    #[serde(rename = "Firm")]
    #[tabled(rename = "Firm")]
    pub firm_name: String,
    #[serde(rename = "Stage")]
    #[tabled(rename = "Stage")]
    pub stage: Stage,
    #[serde(rename = "DaysSinceActivity")]
    #[tabled(rename = "DaysSinceActivity")]
    pub days_since_activity: i64,
    #[serde(rename = "NextAction")]
    #[tabled(rename = "NextAction")]
    pub next_action: String,
    #[serde(rename = "RiskStatus")]
    #[tabled(rename = "RiskStatus")]
    pub risk_status: RiskStatus,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct MonitorRow {
    #[serde(rename = "Firm")]
    #[tabled(rename = "Firm")]
    pub firm_name: String,
    #[serde(rename = "Type")]
    #[tabled(rename = "Type")]
    pub investor_type: InvestorType,
    #[serde(rename = "Stage")]
    #[tabled(rename = "Stage")]
    pub stage: Stage,
    #[serde(rename = "RiskStatus")]
    #[tabled(rename = "RiskStatus")]
    pub risk_status: RiskStatus,
    #[serde(rename = "DaysSinceActivity")]
    #[tabled(rename = "DaysSinceActivity")]
    pub days_since_activity: i64,
    #[serde(rename = "NextAction")]
    #[tabled(rename = "NextAction")]
    pub next_action: String,
    #[serde(rename = "LastActivity")]
    #[tabled(rename = "LastActivity")]
    pub last_activity_period: String,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct EmploymentRow {
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Direct")]
    #[tabled(rename = "Direct")]
    pub direct: u64,
    #[serde(rename = "Indirect")]
    #[tabled(rename = "Indirect")]
    pub indirect: u64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CountryCount {
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct WaterfrontDraftPoint {
    #[serde(rename = "Firm")]
    #[tabled(rename = "Firm")]
    pub firm_name: String,
    #[serde(rename = "WaterfrontM")]
    #[tabled(rename = "WaterfrontM")]
    pub waterfront: f64,
    #[serde(rename = "DraftM")]
    #[tabled(rename = "DraftM")]
    pub draft: f64,
    #[serde(rename = "LandAcres")]
    #[tabled(rename = "LandAcres", display_with = "display_optional")]
    pub land: Option<f64>,
    #[serde(rename = "InvestmentCr")]
    #[tabled(rename = "InvestmentCr", display_with = "display_optional")]
    pub investment: Option<f64>,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct InternationalRow {
    #[serde(rename = "Firm")]
    #[tabled(rename = "Firm")]
    pub firm_name: String,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "Sector")]
    #[tabled(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "Location")]
    #[tabled(rename = "Location")]
    pub location_interest: String,
    #[serde(rename = "Stage")]
    #[tabled(rename = "Stage")]
    pub stage: Stage,
    #[serde(rename = "LandAcres")]
    #[tabled(rename = "LandAcres", display_with = "display_optional")]
    pub land: Option<f64>,
    #[serde(rename = "WaterfrontM")]
    #[tabled(rename = "WaterfrontM", display_with = "display_optional")]
    pub waterfront: Option<f64>,
    #[serde(rename = "RiskStatus")]
    #[tabled(rename = "RiskStatus")]
    pub risk_status: RiskStatus,
}
