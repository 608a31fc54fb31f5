//! HTML rendering of a [`SummaryReport`].
//!
//! The page layout lives in `templates/executive_summary.html.hbs`; this
//! module only assembles the template context and registers the number
//! formatting helpers. The output is a single self-contained page with an
//! `@page` rule so it can be printed to A4 from a browser. Identical inputs
//! give identical bytes; the only moving part is the `generated_at`
//! timestamp passed in.

use crate::error::TrackerError;
use crate::kpi::Metric;
use crate::reports::SummaryReport;
use crate::settings::ReportSettings;
use crate::util::{format_int, format_number, format_percent};
use chrono::NaiveDateTime;
use handlebars::{
    html_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext,
};
use serde::Serialize;

const SUMMARY_TEMPLATE: &str = "executive_summary";

#[derive(Serialize)]
struct KpiCard {
    label: &'static str,
    value: f64,
    is_money: bool,
}

#[derive(Serialize)]
struct SummaryContext<'a> {
    report: &'a SummaryReport,
    settings: &'a ReportSettings,
    kpi_cards: Vec<KpiCard>,
    generated_date: String,
    generated_at: String,
    data_as_of: String,
}

/// Template registry for the executive summary.
pub struct SummaryRenderer {
    handlebars: Handlebars<'static>,
}

impl SummaryRenderer {
    pub fn new() -> Result<Self, TrackerError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);

        handlebars.register_helper("money", Box::new(money_helper));
        handlebars.register_helper("number", Box::new(number_helper));
        handlebars.register_helper("int", Box::new(int_helper));
        handlebars.register_helper("percent", Box::new(percent_helper));
        handlebars.register_helper("lower", Box::new(lower_helper));

        handlebars
            .register_template_string(
                SUMMARY_TEMPLATE,
                include_str!("templates/executive_summary.html.hbs"),
            )
            .map_err(|e| TrackerError::Template(e.to_string()))?;

        Ok(Self { handlebars })
    }

    pub fn render(
        &self,
        report: &SummaryReport,
        settings: &ReportSettings,
        generated_at: NaiveDateTime,
    ) -> Result<String, TrackerError> {
        let kpi_cards = report
            .kpis
            .entries()
            .into_iter()
            .map(|(metric, value)| KpiCard {
                label: metric.label(),
                value,
                is_money: metric == Metric::TotalInvestment,
            })
            .collect();
        let context = SummaryContext {
            report,
            settings,
            kpi_cards,
            generated_date: generated_at.format("%B %d, %Y").to_string(),
            generated_at: generated_at.format("%B %d, %Y at %I:%M %p").to_string(),
            data_as_of: report.reference_date.format("%B %d, %Y").to_string(),
        };
        self.handlebars
            .render(SUMMARY_TEMPLATE, &context)
            .map_err(|e| TrackerError::Template(e.to_string()))
    }
}

/// Renders `report` with a freshly built [`SummaryRenderer`].
pub fn render_html(
    report: &SummaryReport,
    settings: &ReportSettings,
    generated_at: NaiveDateTime,
) -> Result<String, TrackerError> {
    SummaryRenderer::new()?.render(report, settings, generated_at)
}

// Helper output bypasses the template's escaping, so configured text is
// escaped here.

/// `{{money value settings}}` -> `₹3,000 Cr`
fn money_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h.param(0).and_then(|v| v.value().as_f64()).unwrap_or(0.0);
    let settings = h.param(1).map(|v| v.value());
    let field = |name: &str| {
        settings
            .and_then(|s| s.get(name))
            .and_then(|v| v.as_str())
            .unwrap_or("")
    };

    let result = format!(
        "{}{} {}",
        html_escape(field("currency_symbol")),
        format_number(value, 0),
        html_escape(field("currency_unit"))
    );
    out.write(&result)?;
    Ok(())
}

fn number_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h.param(0).and_then(|v| v.value().as_f64()).unwrap_or(0.0);
    out.write(&format_number(value, 0))?;
    Ok(())
}

fn int_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h.param(0).and_then(|v| v.value().as_u64()).unwrap_or(0);
    out.write(&format_int(value))?;
    Ok(())
}

fn percent_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h.param(0).and_then(|v| v.value().as_f64()).unwrap_or(0.0);
    out.write(&format_percent(value))?;
    Ok(())
}

fn lower_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let text = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
    out.write(&html_escape(&text.to_lowercase()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterSelection;
    use crate::kpi::calculate_kpis;
    use crate::loader::{load_reference, LoadOptions};
    use crate::reports::build_summary;
    use crate::settings::Settings;
    use crate::test_support::{record, store_of};
    use crate::types::Stage;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 3)
            .unwrap()
            .and_hms_opt(h, 30, 0)
            .unwrap()
    }

    fn render_for(selection: FilterSelection, ts: NaiveDateTime) -> String {
        render_with(&Settings::default(), selection, ts)
    }

    fn render_with(settings: &Settings, selection: FilterSelection, ts: NaiveDateTime) -> String {
        let store = load_reference(&LoadOptions::from(settings)).unwrap().0;
        let view = selection.apply(&store.view());
        let kpis = calculate_kpis(&view);
        let summary = build_summary(&view, &kpis, &settings.analysis);
        render_html(&summary, &settings.report, ts).unwrap()
    }

    #[test]
    fn test_render_contains_sections() {
        let html = render_for(FilterSelection::all(), at(9));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Executive Summary Report | December 03, 2025"));
        assert!(html.contains("Data as of December 01, 2025"));
        assert!(html.contains("Hindustan Shipyard Limited (HSL)"));
        assert!(html.contains("<td>₹3,000 Cr</td>"));
        assert!(html.contains("<td class=\"status-active\">Active</td>"));
        assert!(html.contains("40.0%"));
        assert!(html.contains("<h3>₹4,500 Cr</h3><p>Total Investment</p>"));
        assert!(html.contains("<h3>6,394</h3><p>Acres Required</p>"));
        assert!(html.contains("<p>MoUs Signed</p>"));
        assert!(html.contains("Tracking 20 investors across 12 locations."));
        assert!(html.contains("18 investors have not been contacted in over 60 days."));
        assert!(html.contains("Confidential - For Internal Use Only"));
        assert!(html.contains(&format!("Version {}", env!("CARGO_PKG_VERSION"))));
        assert!(html.contains("Generated on December 03, 2025 at 09:30 AM"));
    }

    #[test]
    fn test_render_escapes_record_text() {
        let store = store_of(vec![
            record("P&P <Marine>")
                .location("Kakinada \"North\"")
                .investment(250.0)
                .stage(Stage::MouSigned)
                .build(),
        ]);
        let settings = Settings::default();
        let view = store.view();
        let summary = build_summary(&view, &calculate_kpis(&view), &settings.analysis);
        let html = render_html(&summary, &settings.report, at(9)).unwrap();

        assert!(html.contains("<td>P&amp;P &lt;Marine&gt;</td>"));
        assert!(html.contains("Kakinada &quot;North&quot;"));
        assert!(!html.contains("<Marine>"));
        assert!(html.contains("<td>MoU Signed</td>"));
    }

    #[test]
    fn test_render_escapes_configured_text() {
        let mut settings = Settings::default();
        settings.report.organization = "Ports & Harbours <Dept>".to_string();
        settings.report.currency_unit = "<b>Cr</b>".to_string();
        let html = render_with(&settings, FilterSelection::all(), at(9));
        assert!(html.contains("Ports &amp; Harbours &lt;Dept&gt;"));
        assert!(!html.contains("Ports & Harbours"));
        assert!(html.contains("₹3,000 &lt;b&gt;Cr&lt;/b&gt;"));
        assert!(!html.contains("<b>Cr</b>"));
    }

    #[test]
    fn test_render_is_deterministic_apart_from_timestamp() {
        let a = render_for(FilterSelection::all(), at(9));
        let b = render_for(FilterSelection::all(), at(9));
        assert_eq!(a, b);

        let c = render_for(FilterSelection::all(), at(10));
        let strip = |s: &str| s.replace("09:30 AM", "").replace("10:30 AM", "");
        assert_eq!(strip(&a), strip(&c));
    }

    #[test]
    fn test_render_empty_view() {
        let html = render_for(FilterSelection::all().with_location("Atlantis"), at(9));
        assert!(html.contains("Tracking 0 investors across 0 locations."));
        assert!(html.contains("No records in the current view"));
        assert!(!html.contains("Alert:"));
        assert!(html.contains("₹0 Cr"));
        assert!(html.contains("<td>Domestic</td><td>0</td><td>0.0%</td>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_renderer_is_reusable() {
        let renderer = SummaryRenderer::new().unwrap();
        let settings = Settings::default();
        let store = load_reference(&LoadOptions::from(&settings)).unwrap().0;
        let view = store.view();
        let summary = build_summary(&view, &calculate_kpis(&view), &settings.analysis);
        let first = renderer.render(&summary, &settings.report, at(9)).unwrap();
        let second = renderer.render(&summary, &settings.report, at(9)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, render_html(&summary, &settings.report, at(9)).unwrap());
    }
}
