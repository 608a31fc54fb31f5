use crate::error::TrackerError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "investor_report.toml";
/// Prefix for environment overrides, e.g. `INVESTOR_REPORT__ANALYSIS__TOP_INVESTORS=3`.
pub const ENV_PREFIX: &str = "INVESTOR_REPORT";

/// The root configuration structure. Every section falls back to its defaults
/// so an empty or missing file is valid.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub analysis: AnalysisSettings,
    pub dataset: DatasetSettings,
    pub report: ReportSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Fixed "as-of" date staleness is measured against. Never wall-clock.
    pub reference_date: NaiveDate,
    /// Records strictly older than this many days need attention.
    pub staleness_threshold_days: i64,
    pub top_investors: usize,
    pub top_locations: usize,
    pub top_land_locations: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            reference_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap_or_default(),
            staleness_threshold_days: crate::risk::DEFAULT_STALENESS_THRESHOLD_DAYS,
            top_investors: 5,
            top_locations: 5,
            top_land_locations: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatasetSettings {
    /// CSV file to load. The embedded reference dataset is used when unset.
    pub path: Option<PathBuf>,
    /// Country assigned to domestic investors with a blank country cell.
    pub home_country: String,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: None,
            home_country: "India".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ReportSettings {
    pub title: String,
    pub organization: String,
    pub subtitle: String,
    pub version: String,
    pub confidentiality_notice: String,
    pub currency_symbol: String,
    pub currency_unit: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: "APMB Investor Dashboard".to_string(),
            organization: "Andhra Pradesh Maritime Board".to_string(),
            subtitle: "Government of Andhra Pradesh".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            confidentiality_notice: "Confidential - For Internal Use Only".to_string(),
            currency_symbol: "₹".to_string(),
            currency_unit: "Cr".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from defaults, then the config file, then the environment.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Settings, TrackerError> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        let a = &self.analysis;
        if a.staleness_threshold_days < 0 {
            return Err(TrackerError::InvalidSettings(format!(
                "staleness_threshold_days must be >= 0, got {}",
                a.staleness_threshold_days
            )));
        }
        for (name, n) in [
            ("top_investors", a.top_investors),
            ("top_locations", a.top_locations),
            ("top_land_locations", a.top_land_locations),
        ] {
            if n == 0 {
                return Err(TrackerError::InvalidSettings(format!("{} must be >= 1", name)));
            }
        }
        if self.dataset.home_country.trim().is_empty() {
            return Err(TrackerError::InvalidSettings(
                "home_country must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let s = Settings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.analysis.staleness_threshold_days, 60);
        assert_eq!(
            s.analysis.reference_date,
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
        );
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[analysis]\nreference_date = \"2026-01-01\"\ntop_investors = 3\n\n[report]\nversion = \"9.9\""
        )
        .unwrap();

        let s = Settings::load(Some(file.path())).unwrap();
        assert_eq!(
            s.analysis.reference_date,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
        );
        assert_eq!(s.analysis.top_investors, 3);
        assert_eq!(s.analysis.top_locations, 5);
        assert_eq!(s.report.version, "9.9");
        assert_eq!(s.dataset.home_country, "India");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_top_n() {
        let mut s = Settings::default();
        s.analysis.top_locations = 0;
        assert!(matches!(s.validate(), Err(TrackerError::InvalidSettings(_))));
    }
}
