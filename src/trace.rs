//! Trace builders: sample record -> Plotly trace
//!
//! Both builders are pure. The structs serialize to the JSON shape
//! `Plotly.newPlot` expects for one series, so the browser side only has to
//! hand them over.

use crate::dataset::Sample;
use serde::Serialize;

/// How many OTUs the bar chart shows
pub const TOP_N: usize = 10;

/// Fixed colour scale of the bubble chart
pub const BUBBLE_COLORSCALE: &str = "Earth";

/// Horizontal bar series of the top OTUs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    /// Bar lengths (sample values)
    pub x: Vec<f64>,
    /// Category labels, `"OTU <id>"`
    pub y: Vec<String>,
    /// Hover text (OTU labels)
    pub text: Vec<String>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub orientation: &'static str,
}

impl BarTrace {
    pub fn empty() -> Self {
        Self {
            x: vec![],
            y: vec![],
            text: vec![],
            kind: "bar",
            orientation: "h",
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub size: Vec<f64>,
    pub color: Vec<i64>,
    pub colorscale: &'static str,
}

/// Scatter-of-markers series of every OTU in a sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleTrace {
    pub x: Vec<i64>,
    pub y: Vec<f64>,
    pub text: Vec<String>,
    pub mode: &'static str,
    pub marker: Marker,
}

impl BubbleTrace {
    pub fn empty() -> Self {
        Self {
            x: vec![],
            y: vec![],
            text: vec![],
            mode: "markers",
            marker: Marker {
                size: vec![],
                color: vec![],
                colorscale: BUBBLE_COLORSCALE,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Either trace, serialized without a tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Trace {
    Bar(BarTrace),
    Bubble(BubbleTrace),
}

impl Trace {
    pub fn len(&self) -> usize {
        match self {
            Trace::Bar(t) => t.len(),
            Trace::Bubble(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<BarTrace> for Trace {
    fn from(t: BarTrace) -> Self {
        Trace::Bar(t)
    }
}

impl From<BubbleTrace> for Trace {
    fn from(t: BubbleTrace) -> Self {
        Trace::Bubble(t)
    }
}

/// Build the top-OTU bar trace.
///
/// Takes the first [`TOP_N`] observations as they appear in the sample and
/// reverses them, so the first observation ends up as the topmost bar. No
/// sorting happens here: the dataset ships values in descending order.
pub fn bar_trace(sample: &Sample) -> BarTrace {
    let n = sample.len().min(TOP_N);

    let x = sample.sample_values[..n].iter().rev().copied().collect();
    let y = sample.otu_ids[..n]
        .iter()
        .rev()
        .map(|id| format!("OTU {}", id))
        .collect();
    let text = sample.otu_labels[..n].iter().rev().cloned().collect();

    BarTrace { x, y, text, ..BarTrace::empty() }
}

/// Build the bubble trace from every observation in the sample.
pub fn bubble_trace(sample: &Sample) -> BubbleTrace {
    let n = sample.len();
    let ids = sample.otu_ids[..n].to_vec();
    let values = sample.sample_values[..n].to_vec();

    BubbleTrace {
        x: ids.clone(),
        y: values.clone(),
        text: sample.otu_labels[..n].to_vec(),
        mode: "markers",
        marker: Marker {
            size: values,
            color: ids,
            colorscale: BUBBLE_COLORSCALE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_with(n: usize) -> Sample {
        Sample {
            id: "940".to_string(),
            otu_ids: (0..n as i64).map(|i| 1000 + i).collect(),
            // descending values, like the real dataset
            sample_values: (0..n).map(|i| (n - i) as f64).collect(),
            otu_labels: (0..n).map(|i| format!("Bacteria;{}", i)).collect(),
        }
    }

    // ==========================================================================
    // BAR TRACE TESTS
    // ==========================================================================
    //
    // The bar chart shows at most TOP_N OTUs, taken from the front of the
    // sample and reversed so Plotly draws the first one on top.
    // ==========================================================================

    #[test]
    fn test_bar_truncates_to_ten() {
        for n in [10, 11, 50, 80] {
            assert_eq!(bar_trace(&sample_with(n)).len(), 10, "n = {}", n);
        }
    }

    #[test]
    fn test_bar_short_sample_uses_all() {
        for n in [1, 3, 9] {
            let t = bar_trace(&sample_with(n));
            assert_eq!(t.len(), n);
            assert_eq!(t.y.len(), n);
            assert_eq!(t.text.len(), n);
        }
    }

    #[test]
    fn test_bar_empty_sample() {
        let t = bar_trace(&sample_with(0));
        assert!(t.is_empty());
        assert_eq!(t, BarTrace::empty());
    }

    #[test]
    fn test_bar_reverses_first_ten() {
        let t = bar_trace(&sample_with(10));
        // values were 10, 9, ..., 1
        assert_eq!(t.x, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(t.y.first().map(String::as_str), Some("OTU 1009"));
        assert_eq!(t.y.last().map(String::as_str), Some("OTU 1000"));
        assert_eq!(t.text.first().map(String::as_str), Some("Bacteria;9"));
    }

    #[test]
    fn test_bar_does_not_sort() {
        let s = Sample {
            id: "1".into(),
            otu_ids: vec![7, 8, 9],
            sample_values: vec![1.0, 50.0, 3.0],
            otu_labels: vec!["a".into(), "b".into(), "c".into()],
        };
        assert_eq!(bar_trace(&s).x, vec![3.0, 50.0, 1.0]);
    }

    #[test]
    fn test_bar_json_shape() {
        let s = Sample {
            id: "1".into(),
            otu_ids: vec![42],
            sample_values: vec![5.0],
            otu_labels: vec!["Archaea".into()],
        };
        let v = serde_json::to_value(bar_trace(&s)).unwrap();
        assert_eq!(
            v,
            json!({"x": [5.0], "y": ["OTU 42"], "text": ["Archaea"], "type": "bar", "orientation": "h"})
        );
    }

    // ==========================================================================
    // BUBBLE TRACE TESTS
    // ==========================================================================

    #[test]
    fn test_bubble_keeps_every_point() {
        for n in [0, 1, 50] {
            let t = bubble_trace(&sample_with(n));
            assert_eq!(t.len(), n);
            assert_eq!(t.marker.size.len(), n);
            assert_eq!(t.marker.color.len(), n);
            assert_eq!(t.text.len(), n);
        }
    }

    #[test]
    fn test_bubble_axes_and_marker() {
        let s = sample_with(3);
        let t = bubble_trace(&s);
        assert_eq!(t.x, s.otu_ids);
        assert_eq!(t.y, s.sample_values);
        assert_eq!(t.marker.size, s.sample_values);
        assert_eq!(t.marker.color, s.otu_ids);
        assert_eq!(t.marker.colorscale, "Earth");
        assert_eq!(t.mode, "markers");
    }

    #[test]
    fn test_untagged_trace_serializes_inner() {
        let t: Trace = BubbleTrace::empty().into();
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["mode"], json!("markers"));
        assert_eq!(v["marker"]["colorscale"], json!("Earth"));
        assert!(t.is_empty());
    }
}
