//! Human-readable formatter for lag reports.

use crate::report::{ProjectReport, ScopeReport};
use colored::*;
use laggard_core::{Statistics, TechnicalLag, TechnicalLagStatistics, UpdateScope};

pub struct HumanFormatter;

pub fn render_report(report: &ProjectReport<'_>) -> String {
    let mut out = String::new();
    let title = format!("Technical Lag Report ({})", report.ecosystem);
    out.push_str(&format!("\n{}\n", title.bold()));
    out.push_str(&format!("{}\n", "=".repeat(title.len())));

    if report.scopes.is_empty() {
        out.push_str("\nNo dependency scopes to analyze.\n");
    }
    for scope in &report.scopes {
        render_scope(&mut out, report, scope);
    }
    out
}

fn render_scope(out: &mut String, report: &ProjectReport<'_>, scope: &ScopeReport<'_>) {
    let completeness = scope.analyzed.completeness();
    let percentage = completeness.percentage();
    let colored_percentage = match percentage {
        p if p >= 90.0 => format!("{:.1}%", p).green(),
        p if p >= 50.0 => format!("{:.1}%", p).yellow(),
        p => format!("{:.1}%", p).red(),
    };

    out.push_str(&format!("\n📦 Scope {}:\n", scope.name.cyan().bold()));
    out.push_str(&format!("  Packages: {}\n", scope.analyzed.node_count()));
    out.push_str(&format!(
        "  Completeness: {} ({} of {} slots)\n",
        colored_percentage, completeness.populated, completeness.expected
    ));

    for summary in scope.summaries(&report.update_scopes) {
        out.push_str(&format!("  {}\n", summary.scope.as_str().bold()));
        if !report.shallow_only {
            out.push_str(&format!("    deep     {}\n", describe(summary.deep.as_ref())));
        }
        out.push_str(&format!("    shallow  {}\n", describe(summary.shallow.as_ref())));
    }
}

fn describe(stats: Option<&TechnicalLagStatistics>) -> String {
    let Some(stats) = stats else {
        return "no data".bright_black().to_string();
    };
    let (Some(lib_days), Some(missed)) = (stats.lib_days, stats.missed_releases) else {
        return "no data".bright_black().to_string();
    };

    let mut line = format!(
        "libdays {}  missed {}",
        spread(&lib_days),
        spread(&missed)
    );
    if let Some(distance) = stats.distance {
        line.push_str(&format!(
            "  distance {:.1}/{:.1}/{:.1}",
            distance.major.average, distance.minor.average, distance.patch.average
        ));
    }
    if let Some(frequency) = stats.release_frequency {
        line.push_str(&format!("  releases/month {:.2}", frequency.average));
    }
    line
}

fn spread(stats: &Statistics) -> String {
    format!("{:.1} ±{:.1}", stats.average, stats.standard_deviation)
}

/// Lag of a single package version, one line per update scope
pub fn render_lag(package: &str, used: &str, lags: &[(UpdateScope, Option<TechnicalLag>)]) -> String {
    let mut out = format!("{}@{}\n", package.bold(), used);

    for (scope, lag) in lags {
        let line = match lag {
            None => "no data".bright_black().to_string(),
            Some(lag) if lag.is_up_to_date() => format!("{} up to date", "✓".green()),
            Some(lag) => format!(
                "→ {}  {} days ({:.2} libyears)  {} missed  distance {}",
                lag.target_version.cyan(),
                lag.lib_days,
                lag.lib_years(),
                lag.missed_releases,
                lag.distance
            ),
        };
        out.push_str(&format!("  {:6} {}\n", scope.as_str(), line));
    }
    out
}
