//! Plain-text rendering of the dashboard views for the terminal.

use crate::dashboard::{LoadStatus, Tab};
use crate::views::{DashboardViews, HourlyRow, StationView, SummaryView};
use std::fmt::Write;

const TITLE: &str = "Production Overview";
const BAR_WIDTH: usize = 40;

pub fn render_dashboard(views: &DashboardViews) -> String {
    match &views.status {
        LoadStatus::Loading => return "Loading dashboard...\n".to_string(),
        LoadStatus::Failed(message) => return format!("ERROR: {message}\n"),
        LoadStatus::Ready => {}
    }

    let mut out = String::new();
    let _ = writeln!(out, "{TITLE}\n{}\n", "=".repeat(TITLE.len()));
    out.push_str(&render_summary(&views.summary));
    out.push('\n');
    out.push_str(&render_hourly_chart(&views.hourly));
    out.push('\n');
    out.push_str(&render_stations(&views.stations));
    out
}

pub fn render_summary(view: &SummaryView) -> String {
    let mut out = String::new();
    let tab = |t: Tab, label: &str| if view.tab == t { format!("[{label}]") } else { format!(" {label} ") };
    let _ = writeln!(out, "{} {}", tab(Tab::Today, "Today"), tab(Tab::Yesterday, "Yesterday"));

    if let Some(placeholder) = view.placeholder {
        let _ = writeln!(out, "  {placeholder}");
        return out;
    }

    let width = view.rows.iter().map(|r| r.description.chars().count()).max().unwrap_or(0).clamp(7, 40);
    let _ = writeln!(out, "  {:<width$}  {:>7}  {:>13}", "Product", "Units", "Total Pounds");
    for row in &view.rows {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>7}  {:>13}",
            truncate(&row.description, width),
            row.total_cases,
            row.total_pounds
        );
    }
    out
}

/// Horizontal bar chart of pounds per hour, scaled to the busiest hour.
pub fn render_hourly_chart(rows: &[HourlyRow]) -> String {
    let mut out = String::from("Pounds Produced per Hour\n");
    let max = rows.iter().map(|r| r.total_pounds).fold(0.0_f64, f64::max);

    for row in rows {
        let len = if max > 0.0 { ((row.total_pounds / max) * BAR_WIDTH as f64).round() as usize } else { 0 };
        let _ = writeln!(out, "  {:>5} | {:<BAR_WIDTH$} {:.2}", row.label, "#".repeat(len), row.total_pounds);
    }
    out
}

pub fn render_stations(view: &StationView) -> String {
    let mut out = String::from("Station Monitor\n");
    if let Some(placeholder) = view.placeholder {
        let _ = writeln!(out, "  {placeholder}");
        return out;
    }

    let _ = writeln!(
        out,
        "  {:<12} {:<10} {:<15} {:>10} {:>11} {:>7} {:>8} {:>6}",
        "Station ID", "Status", "IP Address", "Last Seen", "Uptime", "CPU", "Memory", "Scans"
    );
    for row in &view.rows {
        let _ = writeln!(
            out,
            "  {:<12} {:<10} {:<15} {:>10} {:>11} {:>7} {:>8} {:>6}",
            truncate(&row.station_id, 12),
            truncate(&row.status, 10),
            row.ip_address,
            row.last_seen,
            row.uptime,
            row.cpu_usage,
            row.memory_usage,
            row.scans_since_boot
        );
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
