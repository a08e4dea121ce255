//! Output formatters for lag reports.

pub mod human;
pub mod json;

use crate::report::ProjectReport;
use anyhow::Result;

pub use human::HumanFormatter;
pub use json::JsonFormatter;

/// Renders a project report
pub trait Formatter {
    fn render(&self, report: &ProjectReport<'_>) -> Result<String>;

    fn print(&self, report: &ProjectReport<'_>) -> Result<()> {
        println!("{}", self.render(report)?);
        Ok(())
    }
}

impl Formatter for HumanFormatter {
    fn render(&self, report: &ProjectReport<'_>) -> Result<String> {
        Ok(human::render_report(report))
    }
}

impl Formatter for JsonFormatter {
    fn render(&self, report: &ProjectReport<'_>) -> Result<String> {
        json::render_report(report)
    }
}
