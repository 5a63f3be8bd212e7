//! Embedded HTML/CSS/JS for the dashboard page and the static snapshot.
//!
//! Both pages are compiled into the binary. The live page polls
//! `/api/regions` and replaces a region's content only when its revision
//! changed; the snapshot page has the markup inlined and no script.

use crate::dashboard::RegionMarkup;
use crate::dashboard::render::escape_html;

const STYLE: &str = r##"
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app { max-width: 1200px; margin: 0 auto; padding: 24px; }

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 24px; font-weight: 600; }
header h1 .logo { color: var(--accent); font-family: var(--mono); font-weight: 700; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

button {
  padding: 8px 16px;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: var(--surface);
  color: var(--text);
  font-size: 13px;
  cursor: pointer;
}
button:hover { border-color: var(--accent); color: var(--accent); }

.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}
.card h2 { font-size: 16px; font-weight: 600; margin-bottom: 16px; }
.card h3 { font-size: 14px; font-weight: 600; margin-bottom: 8px; }
.card h4 { font-size: 13px; color: var(--text-muted); margin: 12px 0 6px; }
.card ul { list-style: none; }
.card li { padding: 2px 0; }
.empty-region { color: var(--text-muted); }

.metrics-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 16px; }
.metrics-summary { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 16px; margin-top: 16px; }
.metric-box { border: 1px solid var(--border); border-radius: var(--radius); padding: 12px; }
.metric-box p { font-family: var(--mono); font-size: 13px; }

svg.chart { width: 100%; height: auto; }
svg.chart .chart-title { fill: var(--text); font-size: 13px; }
svg.chart .axis { stroke: var(--border); }
svg.chart .tick, svg.chart .empty { fill: var(--text-muted); font-size: 11px; }
svg.chart .series { stroke: var(--accent); }

.settings-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); gap: 16px; }
.settings-card { border: 1px solid var(--border); border-radius: var(--radius); padding: 12px; }

table { width: 100%; border-collapse: collapse; font-size: 13px; margin-top: 12px; }
th, td { text-align: left; padding: 8px 12px; border-bottom: 1px solid var(--border); }
th { color: var(--text-muted); font-weight: 500; font-size: 12px; text-transform: uppercase; letter-spacing: 0.5px; }
tr.expired td { color: var(--yellow); }
tr.revoked td { color: var(--red); text-decoration: line-through; }

.health-status { border-left: 4px solid var(--border); padding-left: 12px; }
.health-status.healthy { border-left-color: var(--green); }
.health-status.unhealthy { border-left-color: var(--red); }
"##;

const INDEX_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>facewatch Dashboard</title>
<style>__STYLE__</style>
</head>
<body>
<div class="app">
<header>
  <div>
    <h1><span class="logo">facewatch</span> monitoring</h1>
    <div class="subtitle" id="updated">Waiting for data...</div>
  </div>
  <button id="refresh">Reload all</button>
</header>
<section class="card"><h2>Performance Metrics</h2><div id="performanceMetrics"></div></section>
<section class="card"><h2>System Health</h2><div id="systemHealth"></div></section>
<section class="card"><h2>Model Card</h2><div id="modelCard"></div></section>
<section class="card"><h2>Consent Logs</h2><div id="consentLogs"></div></section>
<section class="card"><h2>System Settings</h2><div id="systemSettings"></div></section>
</div>
<script>
const REFRESH_MS = __REFRESH_MS__;
const seen = {};

function apply(regions) {
  for (const r of regions) {
    if (seen[r.id] === r.revision) continue;
    const el = document.getElementById(r.id);
    if (!el) continue;
    el.innerHTML = r.markup;
    seen[r.id] = r.revision;
  }
  document.getElementById('updated').textContent =
    'Updated ' + new Date().toLocaleTimeString();
}

async function poll() {
  try {
    const res = await fetch('/api/regions');
    apply(await res.json());
  } catch (e) {
    console.error('Error polling regions:', e);
  }
}

document.getElementById('refresh').addEventListener('click', async () => {
  try {
    const res = await fetch('/api/refresh', { method: 'POST' });
    const body = await res.json();
    apply(body.regions || []);
  } catch (e) {
    console.error('Error reloading regions:', e);
  }
});

poll();
setInterval(poll, REFRESH_MS);
</script>
</body>
</html>"##;

const SNAPSHOT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>facewatch Snapshot</title>
<style>__STYLE__</style>
</head>
<body>
<div class="app">
<header>
  <div>
    <h1><span class="logo">facewatch</span> snapshot</h1>
  </div>
</header>
__REGIONS__</div>
</body>
</html>"##;

/// The live dashboard page, polling every `refresh_ms` milliseconds.
pub fn index_html(refresh_ms: u128) -> String {
    INDEX_TEMPLATE
        .replace("__STYLE__", STYLE)
        .replace("__REFRESH_MS__", &refresh_ms.to_string())
}

/// A self-contained page with every region's current markup inlined.
/// Regions that never loaded show a placeholder.
pub fn render_snapshot_page(regions: &[RegionMarkup]) -> String {
    let sections: String = regions
        .iter()
        .map(|region| {
            let content = if region.markup.is_empty() {
                r#"<p class="empty-region">Not available</p>"#
            } else {
                region.markup.as_str()
            };
            format!(
                "<section class=\"card\"><h2>{}</h2><div id=\"{}\">\n{}\n</div></section>\n",
                escape_html(region.title),
                region.id,
                content
            )
        })
        .collect();

    SNAPSHOT_TEMPLATE
        .replace("__STYLE__", STYLE)
        .replace("__REGIONS__", &sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_has_all_region_containers() {
        let html = index_html(1000);
        for id in [
            "performanceMetrics",
            "modelCard",
            "consentLogs",
            "systemSettings",
            "systemHealth",
        ] {
            assert!(html.contains(&format!(r#"id="{id}""#)), "missing {id}");
        }
        assert!(html.contains("const REFRESH_MS = 1000;"));
        assert!(!html.contains("__STYLE__"));
    }

    #[test]
    fn snapshot_inlines_markup_without_script() {
        let regions = vec![
            RegionMarkup {
                id: "systemHealth",
                title: "System Health",
                markup: "<p>Status: healthy</p>".to_string(),
                revision: 2,
            },
            RegionMarkup {
                id: "modelCard",
                title: "Model Card",
                markup: String::new(),
                revision: 0,
            },
        ];
        let html = render_snapshot_page(&regions);
        assert!(html.contains("<div id=\"systemHealth\">\n<p>Status: healthy</p>\n</div>"));
        assert!(html.contains("Not available"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("__REGIONS__"));
    }
}
