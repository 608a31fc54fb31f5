use crate::error::TrackerError;
use crate::settings::Settings;
use crate::store::RecordStore;
use crate::types::{ActivityPeriod, InvestorRecord, InvestorType, RawRow};
use crate::util::{days_diff, non_blank, parse_optional_count, parse_optional_f64};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// The 20-investor seed dataset shipped with the binary.
///
/// Hanwha Ocean is recorded as `Active` here (the dashboard data had it
/// `Delayed`), giving 8 active investors in the unfiltered view.
pub const REFERENCE_DATASET: &str = include_str!("../data/reference_investors.csv");

/// Inputs to derived-field computation.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    pub reference_date: NaiveDate,
    pub home_country: String,
}

impl From<&Settings> for LoadOptions {
    fn from(s: &Settings) -> Self {
        LoadOptions {
            reference_date: s.analysis.reference_date,
            home_country: s.dataset.home_country.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub source: String,
    pub total_rows: usize,
    /// Optional numeric cells that were blank across all rows.
    pub absent_values: usize,
    pub defaulted_countries: usize,
}

/// Loads the dataset named in the settings, or the reference dataset when
/// none is configured.
pub fn load(settings: &Settings) -> Result<(RecordStore, LoadReport), TrackerError> {
    let opts = LoadOptions::from(settings);
    match &settings.dataset.path {
        Some(path) => load_from_path(path, &opts),
        None => load_reference(&opts),
    }
}

pub fn load_reference(opts: &LoadOptions) -> Result<(RecordStore, LoadReport), TrackerError> {
    load_from_reader(REFERENCE_DATASET.as_bytes(), "reference dataset", opts)
}

pub fn load_from_path(
    path: &Path,
    opts: &LoadOptions,
) -> Result<(RecordStore, LoadReport), TrackerError> {
    let file = std::fs::File::open(path)?;
    load_from_reader(file, &path.display().to_string(), opts)
}

/// Reads and validates every row. The first bad row aborts the load; a
/// partially validated store is never returned.
pub fn load_from_reader<R: Read>(
    reader: R,
    source: &str,
    opts: &LoadOptions,
) -> Result<(RecordStore, LoadReport), TrackerError> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut records: Vec<InvestorRecord> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut absent_values = 0usize;
    let mut defaulted_countries = 0usize;

    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        let row_no = idx + 1;
        let row = result?;
        let (record, stats) = validate_row(row_no, row, opts)?;
        if !seen.insert(record.firm_name.clone()) {
            return Err(TrackerError::DuplicateFirm {
                row: row_no,
                firm: record.firm_name,
            });
        }
        absent_values += stats.absent_values;
        if stats.defaulted_country {
            defaulted_countries += 1;
        }
        records.push(record);
    }

    let report = LoadReport {
        source: source.to_string(),
        total_rows: records.len(),
        absent_values,
        defaulted_countries,
    };
    tracing::info!(
        source = %report.source,
        rows = report.total_rows,
        absent_values = report.absent_values,
        "Loaded investor dataset"
    );
    Ok((RecordStore::new(records, opts.reference_date), report))
}

#[derive(Default)]
struct RowStats {
    absent_values: usize,
    defaulted_country: bool,
}

fn required<'a>(row: usize, field: &'static str, v: &'a Option<String>) -> Result<&'a str, TrackerError> {
    non_blank(v.as_deref()).ok_or_else(|| TrackerError::validation(row, field, "value is required"))
}

fn label<T>(row: usize, field: &'static str, v: &Option<String>) -> Result<T, TrackerError>
where
    T: FromStr<Err = TrackerError>,
{
    required(row, field, v)?
        .parse()
        .map_err(|e: TrackerError| TrackerError::validation(row, field, e.to_string()))
}

fn text(v: Option<String>) -> String {
    v.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn validate_row(
    row_no: usize,
    row: RawRow,
    opts: &LoadOptions,
) -> Result<(InvestorRecord, RowStats), TrackerError> {
    let mut stats = RowStats::default();

    let firm_name = required(row_no, "Firm_Name", &row.firm_name)?.to_string();
    let investor_type: InvestorType = label(row_no, "Investor_Type", &row.investor_type)?;
    let current_stage = label(row_no, "Current_Stage", &row.current_stage)?;
    let risk_status = label(row_no, "Risk_Status", &row.risk_status)?;

    let quantity = |field: &'static str, v: &Option<String>| {
        parse_optional_f64(v.as_deref()).map_err(|m| TrackerError::validation(row_no, field, m))
    };
    let investment_amount = quantity("Investment_INR_Cr", &row.investment_amount)?;
    let land_requirement = quantity("Land_Requirement_Acres", &row.land_requirement)?;
    let waterfront_requirement = quantity("Waterfront_Requirement_Meters", &row.waterfront_requirement)?;
    let draft_requirement = quantity("Draft_Requirement_Meters", &row.draft_requirement)?;

    let count = |field: &'static str, v: &Option<String>| {
        parse_optional_count(v.as_deref()).map_err(|m| TrackerError::validation(row_no, field, m))
    };
    let direct_employment = count("Direct_Employment", &row.direct_employment)?;
    let indirect_employment = count("Indirect_Employment", &row.indirect_employment)?;

    stats.absent_values = [
        investment_amount,
        land_requirement,
        waterfront_requirement,
        draft_requirement,
    ]
    .iter()
    .filter(|v| v.is_none())
    .count()
        + [direct_employment, indirect_employment]
            .iter()
            .filter(|v| v.is_none())
            .count();

    let month = required(row_no, "Last_Activity_Month", &row.last_activity_month)?;
    let last_activity_period = ActivityPeriod::from_str(month).map_err(|_| {
        TrackerError::validation(
            row_no,
            "Last_Activity_Month",
            format!("'{}' is not a '<Month> <year>' value", month),
        )
    })?;
    let last_activity_date = last_activity_period.first_day();
    let days_since_activity = days_diff(last_activity_date, opts.reference_date);
    if days_since_activity < 0 {
        return Err(TrackerError::validation(
            row_no,
            "Last_Activity_Month",
            format!(
                "{} is after the reference date {}",
                last_activity_period, opts.reference_date
            ),
        ));
    }

    let country = match non_blank(row.country.as_deref()) {
        Some(c) => c.to_string(),
        None if investor_type == InvestorType::Domestic => {
            stats.defaulted_country = true;
            opts.home_country.clone()
        }
        None => {
            return Err(TrackerError::validation(
                row_no,
                "Country",
                "value is required for international investors",
            ))
        }
    };

    let record = InvestorRecord {
        firm_name,
        investor_type,
        sector: text(row.sector),
        location_interest: text(row.location_interest),
        current_stage,
        investment_amount,
        land_requirement,
        waterfront_requirement,
        draft_requirement,
        direct_employment,
        indirect_employment,
        support_requested: text(row.support_requested),
        risk_status,
        next_action: text(row.next_action),
        last_activity_period,
        country,
        last_activity_date,
        days_since_activity,
    };
    Ok((record, stats))
}
