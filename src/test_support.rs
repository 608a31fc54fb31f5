// Hand-built records for unit tests.
use crate::store::RecordStore;
use crate::types::{ActivityPeriod, InvestorRecord, InvestorType, RiskStatus, Stage};
use crate::util::days_diff;
use chrono::NaiveDate;

pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
}

pub struct RecordBuilder(InvestorRecord);

pub fn record(name: &str) -> RecordBuilder {
    let period = ActivityPeriod::new(2025, 10).unwrap();
    RecordBuilder(InvestorRecord {
        firm_name: name.to_string(),
        investor_type: InvestorType::Domestic,
        sector: "Shipbuilding".to_string(),
        location_interest: "Kakinada".to_string(),
        current_stage: Stage::EarlyDiscussion,
        investment_amount: None,
        land_requirement: None,
        waterfront_requirement: None,
        draft_requirement: None,
        direct_employment: None,
        indirect_employment: None,
        support_requested: "Land".to_string(),
        risk_status: RiskStatus::Active,
        next_action: "Follow-up".to_string(),
        last_activity_period: period,
        country: "India".to_string(),
        last_activity_date: period.first_day(),
        days_since_activity: days_diff(period.first_day(), reference_date()),
    })
}

impl RecordBuilder {
    pub fn investor_type(mut self, t: InvestorType) -> Self {
        self.0.investor_type = t;
        self
    }

    pub fn location(mut self, l: &str) -> Self {
        self.0.location_interest = l.to_string();
        self
    }

    pub fn stage(mut self, s: Stage) -> Self {
        self.0.current_stage = s;
        self
    }

    pub fn risk(mut self, s: RiskStatus) -> Self {
        self.0.risk_status = s;
        self
    }

    pub fn investment(mut self, v: f64) -> Self {
        self.0.investment_amount = Some(v);
        self
    }

    pub fn land(mut self, v: f64) -> Self {
        self.0.land_requirement = Some(v);
        self
    }

    pub fn waterfront(mut self, v: f64) -> Self {
        self.0.waterfront_requirement = Some(v);
        self
    }

    pub fn draft(mut self, v: f64) -> Self {
        self.0.draft_requirement = Some(v);
        self
    }

    pub fn employment(mut self, direct: u32, indirect: Option<u32>) -> Self {
        self.0.direct_employment = Some(direct);
        self.0.indirect_employment = indirect;
        self
    }

    pub fn country(mut self, c: &str) -> Self {
        self.0.country = c.to_string();
        self
    }

    /// Overrides staleness directly; the activity month is left as is.
    pub fn days(mut self, d: i64) -> Self {
        self.0.days_since_activity = d;
        self
    }

    pub fn build(self) -> InvestorRecord {
        self.0
    }
}

pub fn store_of(records: Vec<InvestorRecord>) -> RecordStore {
    RecordStore::new(records, reference_date())
}
