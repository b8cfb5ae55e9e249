//! HTML dashboard page with Plotly.js charts
//!
//! The same page serves two modes. A report embeds every rendered sample
//! view and switches between them locally. The live page served by
//! [`crate::serve`] asks `/api/view` for each selection instead.

use crate::config::Targets;
use crate::report::Report;
use std::io::{self, Write};

/// Standalone page with all views embedded
pub fn write<W: Write>(writer: &mut W, report: &Report) -> io::Result<()> {
    let data = script_json(&serde_json::to_string(report)?);
    let subtitle = format!(
        "{} samples &middot; {} with metadata &middot; {} distinct OTUs",
        report.summary.names, report.summary.with_metadata, report.summary.distinct_otus
    );
    write_page(writer, &report.targets, &data, &subtitle)
}

/// Page that loads every view from the server
pub fn write_live<W: Write>(writer: &mut W, targets: &Targets) -> io::Result<()> {
    write_page(writer, targets, "null", "live")
}

pub fn live_page(targets: &Targets) -> String {
    let mut buf = Vec::new();
    // writing into a Vec cannot fail
    let _ = write_live(&mut buf, targets);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Make JSON safe to place inside a `<script>` element
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\!--")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn write_page<W: Write>(
    writer: &mut W,
    targets: &Targets,
    data: &str,
    subtitle: &str,
) -> io::Result<()> {
    let targets_json = script_json(&serde_json::to_string(targets)?);
    let selector = escape_attr(&targets.selector);
    let bar = escape_attr(&targets.bar);
    let bubble = escape_attr(&targets.bubble);
    let metadata = escape_attr(&targets.metadata);

    write!(writer, r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Belly Button Biodiversity Dashboard</title>
    <script src="https://cdn.plot.ly/plotly-2.27.0.min.js"></script>
    <style>
        :root {{
            --bg: #0d1117;
            --card: #161b22;
            --border: #30363d;
            --text: #e6edf3;
            --dim: #7d8590;
            --accent: #58a6ff;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
        }}
        .container {{ max-width: 1400px; margin: 0 auto; padding: 2rem; }}
        .header {{
            margin-bottom: 2rem;
            padding-bottom: 1rem;
            border-bottom: 1px solid var(--border);
        }}
        .logo {{
            font-size: 2.25rem;
            font-weight: 800;
            background: linear-gradient(135deg, var(--accent), #a371f7);
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
        }}
        .subtitle {{ color: var(--dim); font-size: 1rem; }}
        .grid {{
            display: grid;
            grid-template-columns: 300px 1fr;
            gap: 1.5rem;
            margin-bottom: 1.5rem;
        }}
        .card {{
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.5rem;
        }}
        .card-title {{
            font-size: 1rem;
            font-weight: 600;
            margin-bottom: 1rem;
            color: var(--dim);
        }}
        select {{
            width: 100%;
            padding: 0.5rem;
            background: var(--bg);
            color: var(--text);
            border: 1px solid var(--border);
            border-radius: 6px;
            margin-bottom: 1.5rem;
        }}
        .panel div {{ font-family: 'SF Mono', 'Fira Code', monospace; font-size: 0.85rem; }}
        .panel h6 {{ color: var(--dim); font-size: 0.9rem; }}
        .status {{ color: var(--dim); font-size: 0.8rem; min-height: 1.2rem; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <div class="logo">Belly Button Biodiversity</div>
            <div class="subtitle">{subtitle}</div>
        </div>

        <div class="grid">
            <div class="card">
                <div class="card-title">Test Subject ID No.</div>
                <select id="{selector}" onchange="optionChanged(this.value)"></select>
                <div class="card-title">Demographic Info</div>
                <div class="panel" id="{metadata}"></div>
                <div class="status" id="status"></div>
            </div>
            <div class="card">
                <div id="{bar}"></div>
            </div>
        </div>

        <div class="card">
            <div id="{bubble}"></div>
        </div>
    </div>

    <script>
    const targets = {targets_json};
    const report = {data};

    // Bumped per selection; responses from older selections are dropped
    let generation = 0;

    function setStatus(text) {{
        document.getElementById('status').textContent = text;
    }}

    function fillDropdown(names) {{
        const dropdown = document.getElementById(targets.selector);
        if (dropdown.options.length > 0) return;
        names.forEach(name => {{
            const option = document.createElement('option');
            option.text = name;
            option.value = name;
            dropdown.appendChild(option);
        }});
    }}

    function applyPage(page) {{
        const dropdown = page.dropdowns[targets.selector];
        if (dropdown) {{
            fillDropdown(dropdown.options.map(o => o.value));
            if (dropdown.selected !== null) {{
                document.getElementById(targets.selector).value = dropdown.selected;
            }}
        }}

        Object.entries(page.charts).forEach(([id, chart]) => {{
            Plotly.newPlot(id, chart.data, chart.layout);
        }});

        Object.entries(page.panels).forEach(([id, lines]) => {{
            const panel = document.getElementById(id);
            panel.innerHTML = '';
            lines.forEach(line => {{
                const el = document.createElement(line.kind === 'fallback' ? 'h6' : 'div');
                el.textContent = line.text;
                panel.appendChild(el);
            }});
        }});
    }}

    async function loadView(sample) {{
        const mine = ++generation;

        if (report) {{
            const view = report.views.find(v => v.sample === sample);
            if (view) applyPage(view.page);
            return;
        }}

        setStatus('Loading ' + sample + '...');
        try {{
            const resp = await fetch('/api/view?sample=' + encodeURIComponent(sample));
            const body = await resp.json();
            if (mine !== generation) return;
            if (!body.ok) {{
                setStatus(body.error);
                return;
            }}
            applyPage(body.data);
            setStatus('');
        }} catch (err) {{
            if (mine === generation) setStatus(String(err));
        }}
    }}

    function optionChanged(sample) {{
        loadView(sample);
    }}

    async function init() {{
        if (report) {{
            fillDropdown(report.names);
            if (report.initial !== null) loadView(report.initial);
            return;
        }}
        try {{
            const resp = await fetch('/api/names');
            const body = await resp.json();
            if (!body.ok) {{
                setStatus(body.error);
                return;
            }}
            fillDropdown(body.data);
            if (body.data.length > 0) loadView(body.data[0]);
        }} catch (err) {{
            setStatus(String(err));
        }}
    }}

    init();
    </script>
</body>
</html>
"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::dataset::Dataset;
    use serde_json::json;

    fn report() -> Report {
        let dataset: Dataset = serde_json::from_value(json!({
            "names": ["940"],
            "samples": [{"id": "940", "otu_ids": [1], "sample_values": [5], "otu_labels": ["</script><b>"]}],
            "metadata": [{"id": 940, "age": 30}]
        }))
        .unwrap();
        Report::build(&DashboardConfig::default(), &dataset, "test")
    }

    fn render(report: &Report) -> String {
        let mut buf = Vec::new();
        write(&mut buf, report).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_page_contains_all_targets() {
        let html = render(&report());
        for id in ["selDataset", "bar", "bubble", "sample-metadata"] {
            assert!(html.contains(&format!("id=\"{}\"", id)), "missing element {}", id);
        }
        assert!(html.contains("plotly"));
    }

    #[test]
    fn test_embedded_json_cannot_close_script() {
        let html = render(&report());
        // only the page's own closing tag remains
        assert_eq!(html.matches("</script>").count(), 2);
        assert!(html.contains("<\\/script><b>"));
    }

    #[test]
    fn test_embedded_json_cannot_open_comment() {
        // `<!--` followed by `<script` switches the parser into an escaped state
        let json = serde_json::to_string(&json!({"label": "<!--<script>"})).unwrap();
        let safe = script_json(&json);
        assert!(!safe.contains("<!--"));
        assert!(safe.contains("<\\!--<script>"));
    }

    #[test]
    fn test_live_page_has_no_embedded_report() {
        let html = live_page(&Targets::default());
        assert!(html.contains("const report = null;"));
        assert!(html.contains("/api/view?sample="));
    }

    #[test]
    fn test_custom_target_ids_are_escaped() {
        let mut targets = Targets::default();
        targets.bar = "a\"b".to_string();
        let html = live_page(&targets);
        assert!(html.contains("id=\"a&quot;b\""));
    }
}
