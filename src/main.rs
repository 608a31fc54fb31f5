// Command-line shell over the analytics library.
//
// Each subcommand loads the configured dataset once, applies the global
// filter flags, and prints or writes one artifact:
// - `summary` prints KPIs and the ranking tables,
// - `attention` lists investors overdue for follow-up,
// - `export` / `report` write the CSV export and the HTML summary.
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use investor_report::filters::parse_choice;
use investor_report::output::{preview_table_rows, write_atomic, write_json};
use investor_report::util::{format_int, format_number, format_optional};
use investor_report::{
    breakdowns, kpi, loader, render, reports, risk, FilterOptions, FilterSelection, Metric,
    Settings, Snapshot, ViewCache,
};
use std::path::PathBuf;
use tabled::Tabled;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Investor portfolio analytics: KPIs, follow-up priorities and reports.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (TOML). Defaults to `investor_report.toml` if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Investor CSV to load instead of the configured/reference dataset.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Case-insensitive location substring, or "All".
    #[arg(long, global = true, default_value = "All")]
    location: String,

    /// Domestic, International or "All".
    #[arg(long, global = true, default_value = "All")]
    investor_type: String,

    /// Pipeline stage (e.g. "MoU Signed") or "All".
    #[arg(long, global = true, default_value = "All")]
    stage: String,

    /// Active, Delayed, Stalled, Closed or "All".
    #[arg(long, global = true, default_value = "All")]
    risk: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print KPIs, the stage funnel and ranking tables.
    Summary {
        /// Also write the KPI set as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// List investors not contacted within the staleness threshold.
    Attention,
    /// Print the full risk status monitor.
    Monitor,
    /// Print location, employment and country breakdowns.
    Breakdowns,
    /// Write the filtered view as CSV.
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write the executive summary as HTML.
    Report {
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also write the report's structured data as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// List the values each filter accepts.
    Options,
}

#[derive(Tabled, Clone)]
struct FigureRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn selection_from(cli: &Cli) -> Result<FilterSelection> {
    let mut selection = FilterSelection::all().with_location(&cli.location);
    selection.investor_type = parse_choice(&cli.investor_type).context("--investor-type")?;
    selection.stage = parse_choice(&cli.stage).context("--stage")?;
    selection.risk_status = parse_choice(&cli.risk).context("--risk")?;
    Ok(selection)
}

fn handle_summary(snapshot: &Snapshot<'_>, settings: &Settings, json: Option<PathBuf>) -> Result<()> {
    let view = snapshot.view();
    let kpis = snapshot.kpis();
    let analysis = &settings.analysis;

    println!("Key Performance Indicators ({} investors in view)\n", format_int(view.len()));
    let mut figures: Vec<FigureRow> = kpis
        .entries()
        .into_iter()
        .map(|(metric, value)| FigureRow {
            metric: metric.label().to_string(),
            value: match metric {
                Metric::TotalInvestment
                | Metric::TotalLandRequested
                | Metric::TotalWaterfront => format_number(value, 0),
                _ => format_int(value as u64),
            },
        })
        .collect();
    let secondary = kpi::secondary_figures(view);
    figures.push(FigureRow {
        metric: "Total Employment".to_string(),
        value: format_int(secondary.total_employment),
    });
    figures.push(FigureRow {
        metric: "Average Draft (m)".to_string(),
        value: secondary
            .average_draft
            .map(|d| format_number(d, 1))
            .unwrap_or_else(|| "N/A".to_string()),
    });
    figures.push(FigureRow {
        metric: "Domestic Investment (Cr)".to_string(),
        value: format_number(secondary.domestic_investment, 0),
    });
    figures.push(FigureRow {
        metric: "International Investment (Cr)".to_string(),
        value: format_number(secondary.international_investment, 0),
    });
    preview_table_rows(&figures, figures.len());

    println!("Investment Pipeline Funnel\n");
    let funnel = kpi::stage_funnel(view);
    preview_table_rows(&funnel, funnel.len());

    println!("Top {} Investors by Investment\n", analysis.top_investors);
    preview_table_rows(&kpi::top_investors(view, analysis.top_investors), analysis.top_investors);

    println!("Risk Status Breakdown\n");
    preview_table_rows(&kpi::risk_breakdown(view), 4);

    println!("Top {} Locations by Investment\n", analysis.top_locations);
    preview_table_rows(
        &kpi::top_locations_by_investment(view, analysis.top_locations),
        analysis.top_locations,
    );

    println!("Investor Type Distribution\n");
    preview_table_rows(&kpi::investor_type_split(kpis), 2);

    if let Some(path) = json {
        write_json(&path, kpis).with_context(|| format!("writing {}", path.display()))?;
        println!("(KPIs exported to {})\n", path.display());
    }
    Ok(())
}

fn handle_attention(snapshot: &Snapshot<'_>, settings: &Settings) {
    let attention = snapshot.attention();
    let threshold = settings.analysis.staleness_threshold_days;
    if attention.is_empty() {
        println!("All investors have been contacted within the last {} days.\n", threshold);
        return;
    }
    println!(
        "Alert: {} investors have not been contacted in over {} days.\n",
        format_int(attention.len()),
        threshold
    );
    preview_table_rows(attention, attention.len());
}

fn handle_monitor(snapshot: &Snapshot<'_>) {
    let counts = risk::risk_counts(snapshot.view());
    println!(
        "Active: {} | Delayed: {} | Stalled: {} | Closed: {}\n",
        counts.active, counts.delayed, counts.stalled, counts.closed
    );
    let rows = risk::status_monitor(snapshot.view());
    preview_table_rows(&rows, rows.len());
}

fn handle_breakdowns(snapshot: &Snapshot<'_>, settings: &Settings) {
    let view = snapshot.view();

    println!("Investment by Location\n");
    let rows = breakdowns::investment_by_location(view);
    preview_table_rows(&rows, rows.len());

    let n = settings.analysis.top_land_locations;
    println!("Land Demand by Location (Top {})\n", n);
    preview_table_rows(&breakdowns::land_by_location(view, n), n);

    println!("Employment Impact by Firm\n");
    let rows = breakdowns::employment_impact(view);
    preview_table_rows(&rows, rows.len());

    println!("Employment by Location\n");
    let rows = breakdowns::employment_by_location(view);
    preview_table_rows(&rows, rows.len());

    println!("Waterfront vs Draft Requirements\n");
    let rows = breakdowns::waterfront_vs_draft(view);
    preview_table_rows(&rows, rows.len());

    println!("International Investors by Country\n");
    let rows = breakdowns::country_breakdown(view);
    preview_table_rows(&rows, rows.len());

    println!("International Investor Details\n");
    let rows = breakdowns::international_details(view);
    preview_table_rows(&rows, rows.len());
    let with_land: Vec<String> = rows
        .iter()
        .filter(|r| r.land.is_some())
        .map(|r| format!("{} ({} acres)", r.firm_name, format_optional(r.land, 0)))
        .collect();
    if !with_land.is_empty() {
        println!("Land requested: {}\n", with_land.join(", "));
    }
}

fn handle_export(snapshot: &Snapshot<'_>, out: Option<PathBuf>, now: NaiveDateTime) -> Result<()> {
    let path = out.unwrap_or_else(|| {
        PathBuf::from(format!("investors_{}.csv", now.format("%Y%m%d")))
    });
    let csv = reports::export_csv(snapshot.view())?;
    write_atomic(&path, csv.as_bytes()).with_context(|| format!("writing {}", path.display()))?;
    println!(
        "Exported {} investors to {}\n",
        format_int(snapshot.view().len()),
        path.display()
    );
    Ok(())
}

fn handle_report(
    snapshot: &Snapshot<'_>,
    settings: &Settings,
    out: Option<PathBuf>,
    json: Option<PathBuf>,
    now: NaiveDateTime,
) -> Result<()> {
    let summary = reports::build_summary(snapshot.view(), snapshot.kpis(), &settings.analysis);
    let html = render::render_html(&summary, &settings.report, now)?;
    let path = out.unwrap_or_else(|| {
        PathBuf::from(format!("executive_summary_{}.html", now.format("%Y%m%d")))
    });
    write_atomic(&path, html.as_bytes()).with_context(|| format!("writing {}", path.display()))?;
    println!("Executive summary written to {} (open in a browser to print)\n", path.display());
    if let Some(json_path) = json {
        write_json(&json_path, &summary)
            .with_context(|| format!("writing {}", json_path.display()))?;
        println!("(Report data exported to {})\n", json_path.display());
    }
    Ok(())
}

fn handle_options(options: &FilterOptions) {
    println!("Location:      {}", options.locations.join(" | "));
    println!("Investor Type: {}", options.investor_types.join(" | "));
    println!("Current Stage: {}", options.stages.join(" | "));
    println!("Risk Status:   {}\n", options.risk_statuses.join(" | "));
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    if let Some(data) = &cli.data {
        settings.dataset.path = Some(data.clone());
    }

    let (store, load_report) = loader::load(&settings).context("loading investor dataset")?;
    println!(
        "Processing dataset... ({} investors loaded from {}, as of {})",
        format_int(load_report.total_rows),
        load_report.source,
        store.reference_date()
    );
    if load_report.defaulted_countries > 0 {
        println!(
            "Info: Defaulted country to {} for {} domestic investors.",
            settings.dataset.home_country,
            format_int(load_report.defaulted_countries)
        );
    }
    println!();

    let selection = selection_from(&cli)?;
    let mut cache = ViewCache::new(&store, settings.analysis.staleness_threshold_days);
    let snapshot = cache.snapshot(&selection);
    let now = Local::now().naive_local();

    match cli.command {
        Commands::Summary { json } => handle_summary(snapshot, &settings, json)?,
        Commands::Attention => handle_attention(snapshot, &settings),
        Commands::Monitor => handle_monitor(snapshot),
        Commands::Breakdowns => handle_breakdowns(snapshot, &settings),
        Commands::Export { out } => handle_export(snapshot, out, now)?,
        Commands::Report { out, json } => handle_report(snapshot, &settings, out, json, now)?,
        Commands::Options => handle_options(&FilterOptions::from_store(&store)),
    }
    Ok(())
}
