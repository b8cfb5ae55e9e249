//! Offline report generation
//!
//! A report is the dashboard with every sample already rendered, so the page
//! works without a server or a network connection:
//!
//! - **HTML**: standalone page with Plotly.js, dropdown switches between the
//!   embedded views
//! - **JSON**: the same views for programmatic consumption
//!
//! # Usage
//!
//! ```ignore
//! use biodash::report::{self, Report};
//!
//! let report = Report::build(&config, &dataset, "samples.json");
//! report::generate("dashboard.html", &report)?;  // HTML
//! report::generate("dashboard.json", &report)?;  // JSON
//! ```

pub mod html;

use crate::config::{DashboardConfig, Targets};
use crate::dashboard::render_sample;
use crate::dataset::Dataset;
use crate::projector::project;
use crate::view::PageState;
use rayon::prelude::*;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// One sample's fully rendered page
#[derive(Debug, Clone, Serialize)]
pub struct SampleView {
    pub sample: String,
    pub page: PageState,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated: String,
    pub source: String,
    pub targets: Targets,
    pub names: Vec<String>,
    /// First name, shown when the page opens
    pub initial: Option<String>,
    pub summary: Summary,
    pub views: Vec<SampleView>,
}

impl Report {
    /// Render every sample named in the dataset.
    pub fn build(config: &DashboardConfig, dataset: &Dataset, source: &str) -> Self {
        let views = dataset
            .names
            .par_iter()
            .map(|name| SampleView {
                sample: name.clone(),
                page: render_sample(config, dataset, name),
            })
            .collect();

        Self {
            generated: chrono::Local::now().to_rfc3339(),
            source: source.to_string(),
            targets: config.targets.clone(),
            names: dataset.names.clone(),
            initial: dataset.names.first().cloned(),
            summary: Summary::from_dataset(dataset),
            views,
        }
    }

    pub fn view(&self, sample: &str) -> Option<&SampleView> {
        self.views.iter().find(|v| v.sample == sample)
    }

    /// Open the page on `sample` instead of the first name.
    ///
    /// Returns false and keeps the current choice when the dataset does not
    /// list `sample`, since the page has no view to switch to.
    pub fn select_initial(&mut self, sample: &str) -> bool {
        if self.view(sample).is_none() {
            return false;
        }
        self.initial = Some(sample.to_string());
        true
    }
}

/// Generate a report in the appropriate format based on file extension
pub fn generate<P: AsRef<Path>>(path: P, report: &Report) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = io::BufWriter::new(std::fs::File::create(path)?);

    match ext.as_str() {
        "json" => write_json(&mut file, report)?,
        _ => html::write(&mut file, report)?,
    }
    file.flush()
}

pub fn write_json<W: Write>(writer: &mut W, report: &Report) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)
}

/// Counts shown in the report header
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub names: usize,
    /// Names with a matching sample record
    pub with_sample: usize,
    /// Names with a matching metadata record
    pub with_metadata: usize,
    /// Distinct OTU ids across all samples
    pub distinct_otus: usize,
}

impl Summary {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut summary = Self {
            names: dataset.names.len(),
            ..Self::default()
        };

        for name in &dataset.names {
            let p = project(dataset, name);
            if p.sample.is_some() {
                summary.with_sample += 1;
            }
            if p.metadata.is_some() {
                summary.with_metadata += 1;
            }
        }

        let mut otus: Vec<i64> = dataset
            .samples
            .iter()
            .flat_map(|s| s.otu_ids[..s.len()].iter().copied())
            .collect();
        otus.sort_unstable();
        otus.dedup();
        summary.distinct_otus = otus.len();

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==========================================================================
    // SUMMARY STATISTICS TESTS
    // ==========================================================================
    //
    // The summary counts how much of the dataset is actually drawable: names
    // without a sample record render empty charts, names without metadata
    // show the fallback line.
    // ==========================================================================

    fn dataset() -> Dataset {
        serde_json::from_value(json!({
            "names": ["940", "941", "942"],
            "samples": [
                {"id": "940", "otu_ids": [1, 2, 3], "sample_values": [5, 3, 1], "otu_labels": ["a", "b", "c"]},
                {"id": "941", "otu_ids": [3, 4], "sample_values": [9, 2], "otu_labels": ["c", "d"]}
            ],
            "metadata": [{"id": 940, "age": 30}, {"id": 942, "age": 12}]
        }))
        .unwrap()
    }

    #[test]
    fn test_summary_counts() {
        let s = Summary::from_dataset(&dataset());
        assert_eq!(
            s,
            Summary { names: 3, with_sample: 2, with_metadata: 2, distinct_otus: 4 }
        );
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(Summary::from_dataset(&Dataset::default()), Summary::default());
    }

    #[test]
    fn test_build_renders_every_name_in_order() {
        let report = Report::build(&DashboardConfig::default(), &dataset(), "test");
        let order: Vec<&str> = report.views.iter().map(|v| v.sample.as_str()).collect();
        assert_eq!(order, vec!["940", "941", "942"]);
        assert_eq!(report.initial.as_deref(), Some("940"));

        let missing = report.view("942").unwrap();
        assert!(missing.page.chart("bar").unwrap().trace().is_empty());
        assert_eq!(missing.page.panel_text("sample-metadata"), vec!["id: 942", "age: 12"]);
    }

    #[test]
    fn test_select_initial_requires_listed_name() {
        let mut report = Report::build(&DashboardConfig::default(), &dataset(), "test");
        assert!(report.select_initial("941"));
        assert_eq!(report.initial.as_deref(), Some("941"));

        // unlisted name leaves the previous choice in place
        assert!(!report.select_initial("999"));
        assert_eq!(report.initial.as_deref(), Some("941"));
        assert!(report.view(report.initial.as_deref().unwrap()).is_some());
    }

    #[test]
    fn test_generate_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let report = Report::build(&DashboardConfig::default(), &dataset(), "test");

        let json_path = dir.path().join("out.json");
        generate(&json_path, &report).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(parsed["names"], json!(["940", "941", "942"]));
        let first_panel = &parsed["views"][0]["page"]["panels"]["sample-metadata"];
        assert_eq!(first_panel[0]["text"], json!("id: 940"));

        let html_path = dir.path().join("out.html");
        generate(&html_path, &report).unwrap();
        let html = std::fs::read_to_string(&html_path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
