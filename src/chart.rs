//! Chart renderer and the fixed per-chart layouts

use crate::trace::Trace;
use crate::view::Surface;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Margin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: &'static str,
}

/// Plotly layout. Static per chart type; nothing here comes from the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: &'static str,
    pub margin: Margin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
}

impl Layout {
    pub fn bar() -> Self {
        Self {
            title: "Top 10 OTUs Found",
            margin: Margin { t: Some(30), l: Some(150) },
            showlegend: None,
            hovermode: None,
            xaxis: None,
        }
    }

    pub fn bubble() -> Self {
        Self {
            title: "Bacteria Cultures Per Sample",
            margin: Margin { t: Some(30), l: None },
            showlegend: Some(false),
            hovermode: Some("closest"),
            xaxis: Some(Axis { title: "OTU ID" }),
        }
    }
}

/// One fully described single-series chart: what `Plotly.newPlot` receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub data: [Trace; 1],
    pub layout: Layout,
}

impl Chart {
    pub fn new(trace: impl Into<Trace>, layout: Layout) -> Self {
        Self {
            data: [trace.into()],
            layout,
        }
    }

    pub fn trace(&self) -> &Trace {
        &self.data[0]
    }
}

/// Replace whatever is drawn at `target` with a fresh chart.
pub fn render<S: Surface + ?Sized>(
    surface: &mut S,
    target: &str,
    trace: impl Into<Trace>,
    layout: Layout,
) {
    surface.draw_chart(target, Chart::new(trace, layout));
}
