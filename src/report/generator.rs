//! Dashboard rendering.
//!
//! Turns a session view into terminal text, Markdown or JSON. All
//! number formatting lives here; the core hands over raw totals.

use crate::analysis::Aggregation;
use crate::cli::OutputFormat;
use crate::models::{Campaign, StatusFilter, SummaryStatistics};
use crate::session::View;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

const NO_RESULTS_TITLE: &str = "No campaigns found";
const NO_RESULTS_HINT: &str = "Try adjusting your filter to see more results";

/// Render a view in the requested format.
pub fn render(view: &View<'_>, filter: StatusFilter, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(generate_text_dashboard(view)),
        OutputFormat::Markdown => Ok(generate_markdown_dashboard(view)),
        OutputFormat::Json => generate_json_dashboard(view, filter, Utc::now()),
    }
}

/// Cost rounded for display, always two decimals.
fn display_cost(cost: Decimal) -> Decimal {
    let mut rounded = cost.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Format a currency amount as `$1234.50`.
pub fn format_currency(cost: Decimal) -> String {
    format!("${}", display_cost(cost))
}

/// Format a count with comma thousands separators.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Generate the terminal dashboard.
pub fn generate_text_dashboard(view: &View<'_>) -> String {
    match view {
        View::Loading => "⏳ Loading dashboard...\n".to_string(),
        View::Failed { message } => format!("❌ Error Loading Data\n   {}\n", message),
        View::Ready { aggregation, .. } => {
            let mut output = String::new();

            output.push_str("📊 Campaign Analytics\n");
            output.push_str("   Monitor and analyze your campaign performance\n\n");
            output.push_str(&generate_text_summary(&aggregation.summary));
            output.push_str(&format!(
                "\nCampaign Details (Status: {})\n\n",
                aggregation.filter.label()
            ));
            output.push_str(&generate_text_table(aggregation));

            output
        }
    }
}

fn generate_text_summary(summary: &SummaryStatistics) -> String {
    let mut section = String::new();

    section.push_str(&format!("   Total Campaigns:   {}\n", summary.total));
    section.push_str(&format!(
        "   Total Clicks:      {}\n",
        format_count(summary.clicks)
    ));
    section.push_str(&format!(
        "   Total Cost:        {}\n",
        format_currency(summary.cost)
    ));
    section.push_str(&format!(
        "   Total Impressions: {}\n",
        format_count(summary.impressions)
    ));

    section
}

fn generate_text_table(aggregation: &Aggregation<'_>) -> String {
    if aggregation.is_empty() {
        return format!("   {}\n   {}\n", NO_RESULTS_TITLE, NO_RESULTS_HINT);
    }

    let rows: Vec<[String; 5]> = aggregation.campaigns.iter().map(|c| table_row(c)).collect();
    let headers = ["Campaign Name", "Status", "Clicks", "Cost", "Impressions"];

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut table = String::new();
    table.push_str(&text_line(&headers.map(String::from), &widths));
    table.push_str(&format!(
        "{}\n",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
    ));
    for row in &rows {
        table.push_str(&text_line(row, &widths));
    }

    table
}

fn table_row(campaign: &Campaign) -> [String; 5] {
    [
        campaign.name.clone(),
        campaign.status.to_string(),
        format_count(campaign.clicks),
        format_currency(campaign.cost),
        format_count(campaign.impressions),
    ]
}

/// First two columns left aligned, numbers right aligned.
fn text_line(cells: &[String; 5], widths: &[usize; 5]) -> String {
    let mut line = cells
        .iter()
        .zip(widths.iter())
        .enumerate()
        .map(|(i, (cell, width))| {
            if i < 2 {
                format!("{:<width$}", cell, width = *width)
            } else {
                format!("{:>width$}", cell, width = *width)
            }
        })
        .collect::<Vec<_>>()
        .join("  ");

    let trimmed = line.trim_end().len();
    line.truncate(trimmed);
    line.push('\n');
    line
}

/// Generate a Markdown dashboard.
pub fn generate_markdown_dashboard(view: &View<'_>) -> String {
    let mut output = String::new();

    output.push_str("# Campaign Analytics\n\n");

    match view {
        View::Loading => output.push_str("*Loading dashboard...*\n\n"),
        View::Failed { message } => {
            output.push_str("## Error Loading Data\n\n");
            output.push_str(&format!("> {}\n\n", message));
        }
        View::Ready { aggregation, .. } => {
            output.push_str(&generate_markdown_summary(&aggregation.summary));
            output.push_str(&generate_markdown_details(aggregation));
        }
    }

    output.push_str(&generate_footer());
    output
}

fn generate_markdown_summary(summary: &SummaryStatistics) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Total Campaigns | Total Clicks | Total Cost | Total Impressions |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        summary.total,
        format_count(summary.clicks),
        format_currency(summary.cost),
        format_count(summary.impressions)
    ));

    section
}

fn generate_markdown_details(aggregation: &Aggregation<'_>) -> String {
    let mut section = String::new();

    section.push_str("## Campaign Details\n\n");
    section.push_str(&format!("*Status: {}*\n\n", aggregation.filter.label()));

    if aggregation.is_empty() {
        section.push_str(&format!("**{}**\n\n{}\n\n", NO_RESULTS_TITLE, NO_RESULTS_HINT));
        return section;
    }

    section.push_str("| Campaign Name | Status | Clicks | Cost | Impressions |\n");
    section.push_str("|:---|:---|---:|---:|---:|\n");

    for campaign in &aggregation.campaigns {
        section.push_str(&format!(
            "| {} | {} {} | {} | {} | {} |\n",
            campaign.name.replace('|', "\\|"),
            campaign.status.emoji(),
            campaign.status,
            format_count(campaign.clicks),
            format_currency(campaign.cost),
            format_count(campaign.impressions)
        ));
    }
    section.push('\n');

    section
}

fn generate_footer() -> String {
    "---\n\n*Generated by campdash*\n".to_string()
}

/// Serialized form of the dashboard.
#[derive(Debug, Serialize)]
struct DashboardDocument<'a> {
    generated_at: DateTime<Utc>,
    filter: StatusFilter,
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<SummaryStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    no_results: Option<bool>,
    campaigns: Vec<&'a Campaign>,
}

/// Generate a JSON dashboard.
pub fn generate_json_dashboard(
    view: &View<'_>,
    filter: StatusFilter,
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let document = match view {
        View::Loading => DashboardDocument {
            generated_at,
            filter,
            state: view.phase().as_str(),
            error: None,
            summary: None,
            no_results: None,
            campaigns: Vec::new(),
        },
        View::Failed { message } => DashboardDocument {
            generated_at,
            filter,
            state: view.phase().as_str(),
            error: Some(*message),
            summary: None,
            no_results: None,
            campaigns: Vec::new(),
        },
        View::Ready {
            aggregation,
            no_results,
        } => {
            let mut summary = aggregation.summary.clone();
            summary.cost = display_cost(summary.cost);
            DashboardDocument {
                generated_at,
                filter,
                state: view.phase().as_str(),
                error: None,
                summary: Some(summary),
                no_results: Some(*no_results),
                campaigns: aggregation.campaigns.clone(),
            }
        }
    };

    serde_json::to_string_pretty(&document).map_err(Into::into)
}
