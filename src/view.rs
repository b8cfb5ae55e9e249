//! Render surface: the page elements the dashboard writes into
//!
//! The dashboard never talks to a browser directly. It writes selector
//! options, charts and panel lines into a [`Surface`] keyed by element id.
//! [`PageState`] keeps them in memory and serializes to the JSON the page
//! script applies (`Plotly.newPlot` per chart, `<option>` per selector entry,
//! one `<div>` per panel line).

use crate::chart::Chart;
use crate::panel::PanelLine;
use crate::selector::SelectOption;
use serde::Serialize;
use std::collections::BTreeMap;

pub trait Surface {
    /// Append options to a dropdown.
    fn append_options(&mut self, target: &str, options: Vec<SelectOption>);

    /// Mark `value` as the current choice of a dropdown.
    fn select(&mut self, target: &str, value: &str);

    /// Replace the chart drawn at `target`.
    fn draw_chart(&mut self, target: &str, chart: Chart);

    /// Replace the content of a text panel.
    fn replace_panel(&mut self, target: &str, lines: Vec<PanelLine>);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dropdown {
    pub options: Vec<SelectOption>,
    pub selected: Option<String>,
}

/// In-memory page, one entry per element id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageState {
    pub dropdowns: BTreeMap<String, Dropdown>,
    pub charts: BTreeMap<String, Chart>,
    pub panels: BTreeMap<String, Vec<PanelLine>>,
}

impl PageState {
    pub fn dropdown(&self, target: &str) -> Option<&Dropdown> {
        self.dropdowns.get(target)
    }

    pub fn chart(&self, target: &str) -> Option<&Chart> {
        self.charts.get(target)
    }

    pub fn panel(&self, target: &str) -> Option<&[PanelLine]> {
        self.panels.get(target).map(Vec::as_slice)
    }

    /// Panel text only, one string per line
    pub fn panel_text(&self, target: &str) -> Vec<String> {
        self.panel(target)
            .map(|lines| lines.iter().map(|l| l.text.clone()).collect())
            .unwrap_or_default()
    }
}

impl Surface for PageState {
    fn append_options(&mut self, target: &str, options: Vec<SelectOption>) {
        self.dropdowns
            .entry(target.to_string())
            .or_default()
            .options
            .extend(options);
    }

    fn select(&mut self, target: &str, value: &str) {
        self.dropdowns.entry(target.to_string()).or_default().selected = Some(value.to_string());
    }

    fn draw_chart(&mut self, target: &str, chart: Chart) {
        self.charts.insert(target.to_string(), chart);
    }

    fn replace_panel(&mut self, target: &str, lines: Vec<PanelLine>) {
        self.panels.insert(target.to_string(), lines);
    }
}
