//! Per-location, per-firm and per-country series behind the dashboard
//! charts. Only the data is shaped here; drawing is left to the caller.

use crate::kpi::{location_totals, top_by};
use crate::store::View;
use crate::types::{
    CountryCount, EmploymentRow, InternationalRow, InvestorType, LocationTotalRow,
    WaterfrontDraftPoint,
};
use std::collections::HashMap;

/// Investment per location, positive groups only, largest first.
pub fn investment_by_location(view: &View<'_>) -> Vec<LocationTotalRow> {
    location_totals(view, |r| r.investment_amount)
}

/// Land demand per location, top `n` positive groups.
pub fn land_by_location(view: &View<'_>, n: usize) -> Vec<LocationTotalRow> {
    let mut rows = location_totals(view, |r| r.land_requirement);
    rows.truncate(n);
    rows
}

/// Direct and indirect jobs per location, for locations with direct jobs.
pub fn employment_by_location(view: &View<'_>) -> Vec<EmploymentRow> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<EmploymentRow> = Vec::new();
    for r in view.iter() {
        let slot = *index.entry(r.location_interest.as_str()).or_insert_with(|| {
            rows.push(EmploymentRow {
                name: r.location_interest.clone(),
                direct: 0,
                indirect: 0,
            });
            rows.len() - 1
        });
        rows[slot].direct += r.direct_employment.map(u64::from).unwrap_or(0);
        rows[slot].indirect += r.indirect_employment.map(u64::from).unwrap_or(0);
    }
    rows.retain(|row| row.direct > 0);
    rows
}

/// Per-firm jobs for records that state direct employment, most jobs first.
pub fn employment_impact(view: &View<'_>) -> Vec<EmploymentRow> {
    top_by(view, view.len(), |r| r.direct_employment.map(f64::from))
        .into_iter()
        .map(|(r, _)| EmploymentRow {
            name: r.firm_name.clone(),
            direct: r.direct_employment.map(u64::from).unwrap_or(0),
            indirect: r.indirect_employment.map(u64::from).unwrap_or(0),
        })
        .collect()
}

/// Records stating both waterfront and draft requirements.
pub fn waterfront_vs_draft(view: &View<'_>) -> Vec<WaterfrontDraftPoint> {
    view.iter()
        .filter_map(|r| {
            Some(WaterfrontDraftPoint {
                firm_name: r.firm_name.clone(),
                waterfront: r.waterfront_requirement?,
                draft: r.draft_requirement?,
                land: r.land_requirement,
                investment: r.investment_amount,
            })
        })
        .collect()
}

/// International investors per country, most first, ties by first appearance.
pub fn country_breakdown(view: &View<'_>) -> Vec<CountryCount> {
    let mut rows: Vec<CountryCount> = Vec::new();
    for r in view
        .iter()
        .filter(|r| r.investor_type == InvestorType::International)
    {
        match rows.iter_mut().find(|c| c.country == r.country) {
            Some(c) => c.count += 1,
            None => rows.push(CountryCount {
                country: r.country.clone(),
                count: 1,
            }),
        }
    }
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

pub fn international_details(view: &View<'_>) -> Vec<InternationalRow> {
    view.iter()
        .filter(|r| r.investor_type == InvestorType::International)
        .map(|r| InternationalRow {
            firm_name: r.firm_name.clone(),
            country: r.country.clone(),
            sector: r.sector.clone(),
            location_interest: r.location_interest.clone(),
            stage: r.current_stage,
            land: r.land_requirement,
            waterfront: r.waterfront_requirement,
            risk_status: r.risk_status,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_reference, LoadOptions};
    use crate::settings::Settings;
    use crate::store::RecordStore;
    use crate::test_support::{record, store_of};

    fn reference() -> RecordStore {
        load_reference(&LoadOptions::from(&Settings::default()))
            .unwrap()
            .0
    }

    #[test]
    fn test_land_by_location_top_n() {
        let store = reference();
        let rows = land_by_location(&store.view(), 3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].location, "Visakhapatnam");
        assert!((rows[0].total - 1200.0).abs() < 1e-9);
        assert!(rows.windows(2).all(|w| w[0].total >= w[1].total));
    }

    #[test]
    fn test_employment_by_location_drops_locations_without_jobs() {
        let store = store_of(vec![
            record("a").location("P").employment(10, Some(40)).build(),
            record("b").location("Q").build(),
            record("c").location("P").employment(5, None).build(),
        ]);
        let rows = employment_by_location(&store.view());
        assert_eq!(
            rows,
            vec![EmploymentRow { name: "P".into(), direct: 15, indirect: 40 }]
        );
    }

    #[test]
    fn test_employment_impact_sorted() {
        let rows = employment_impact(&reference().view());
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Goa Shipyard Limited (GSL)", "Hindustan Shipyard Limited (HSL)"]
        );
    }

    #[test]
    fn test_waterfront_vs_draft_requires_both() {
        let store = store_of(vec![
            record("both").waterfront(100.0).draft(8.0).build(),
            record("water-only").waterfront(100.0).build(),
            record("draft-only").draft(8.0).build(),
        ]);
        let points = waterfront_vs_draft(&store.view());
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].firm_name, "both");
    }

    #[test]
    fn test_country_breakdown() {
        let store = reference();
        let rows = country_breakdown(&store.view());
        assert_eq!(
            rows,
            vec![
                CountryCount { country: "South Korea".into(), count: 2 },
                CountryCount { country: "Netherlands".into(), count: 1 },
            ]
        );
        let store = store_of(vec![record("dom")
            .investor_type(InvestorType::Domestic)
            .country("UAE")
            .build()]);
        assert!(country_breakdown(&store.view()).is_empty());
    }

    #[test]
    fn test_international_details() {
        let rows = international_details(&reference().view());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].land, Some(500.0));
        assert_eq!(rows[1].land, None);
    }
}
