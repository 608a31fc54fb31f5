use crate::types::InvestorRecord;
use chrono::NaiveDate;

/// The full, immutable collection of investor records.
///
/// Built by the loader; nothing hands out `&mut` access afterwards, so any
/// number of views can borrow it at once.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStore {
    records: Vec<InvestorRecord>,
    reference_date: NaiveDate,
}

impl RecordStore {
    pub(crate) fn new(records: Vec<InvestorRecord>, reference_date: NaiveDate) -> Self {
        Self {
            records,
            reference_date,
        }
    }

    pub fn records(&self) -> &[InvestorRecord] {
        &self.records
    }

    /// The as-of date `days_since_activity` was measured against.
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A view over every record, in load order.
    pub fn view(&self) -> View<'_> {
        View {
            records: self.records.iter().collect(),
        }
    }

    pub fn get(&self, firm_name: &str) -> Option<&InvestorRecord> {
        self.records.iter().find(|r| r.firm_name == firm_name)
    }
}

/// An ordered subset of the store. Two views are equal when they hold the
/// same records in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    records: Vec<&'a InvestorRecord>,
}

impl<'a> View<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a InvestorRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn records(&self) -> &[&'a InvestorRecord] {
        &self.records
    }

    /// Keeps the records matching `pred`, preserving order.
    pub fn retain_by<F>(&self, mut pred: F) -> View<'a>
    where
        F: FnMut(&InvestorRecord) -> bool,
    {
        View {
            records: self.records.iter().copied().filter(|r| pred(*r)).collect(),
        }
    }

    pub fn firm_names(&self) -> Vec<&'a str> {
        self.records.iter().map(|r| r.firm_name.as_str()).collect()
    }
}
