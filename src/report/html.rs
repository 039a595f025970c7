//! HTML dashboard rendering.
//!
//! Produces a single self-contained page with inline CSS, inline SVG
//! charts and a small script for the theme toggle and the tabs. The page
//! works offline.

use crate::models::{Dashboard, Metrics, Ranked, Theme};
use std::f64::consts::PI;
use std::fmt::Write;

/// Slice colours for the content-type donut.
const PALETTE: [&str; 6] = ["#E50914", "#B81D24", "#F5F5F1", "#831010", "#564D4D", "#FFA00A"];

/// Fraction of the donut radius left empty in the middle.
const DONUT_HOLE: f64 = 0.4;

/// Rendering options for the HTML page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlOptions {
    /// Theme the page opens with.
    pub theme: Theme,
    /// When set, flipping the toggle reloads the page with `?theme=`
    /// so the server renders the other theme.
    pub live: bool,
}

/// Render the complete dashboard page.
pub fn render_html(dashboard: &Dashboard, options: HtmlOptions) -> String {
    let n = dashboard.metadata.top_n;

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body class="{body_class}" data-live="{live}">
    <div class="container">
        {toggle}
        {header}
        {metrics}
        <div class="row">
            {type_chart}
            {year_chart}
        </div>
        <div class="row">
            {genre_chart}
            {country_chart}
        </div>
        {tables}
        {footer}
    </div>
    <script>{js}</script>
</body>
</html>"#,
        title = html_escape(&dashboard.metadata.title),
        css = inline_css(),
        js = inline_javascript(),
        body_class = options.theme.css_class(),
        live = options.live,
        toggle = render_toggle(options.theme),
        header = render_header(dashboard),
        metrics = render_metrics(&dashboard.metrics),
        type_chart = render_panel("Content by Type", &render_donut(&dashboard.by_type)),
        year_chart = render_panel("Titles Added Over Years", &render_year_bars(&dashboard.by_year)),
        genre_chart = render_panel(
            &format!("Top {} Genres", n),
            &render_horizontal_bars(&dashboard.top_genres)
        ),
        country_chart = render_panel(
            &format!("Top {} Countries by Titles", n),
            &render_horizontal_bars(&dashboard.top_countries)
        ),
        tables = render_tables(dashboard),
        footer = render_footer(dashboard),
    )
}

fn render_toggle(theme: Theme) -> String {
    let checked = if theme == Theme::Dark { " checked" } else { "" };
    format!(
        r#"<label class="toggle"><input type="checkbox" id="theme-toggle"{checked}> <span>🌗 Toggle Dark Mode</span></label>"#
    )
}

fn render_header(dashboard: &Dashboard) -> String {
    format!(
        r#"<header>
            <h1>📺 {title}</h1>
            <div class="meta">{rows} titles from <code>{source}</code></div>
        </header>"#,
        title = html_escape(&dashboard.metadata.title),
        rows = dashboard.metadata.rows_loaded,
        source = html_escape(&dashboard.metadata.source),
    )
}

fn render_metrics(metrics: &Metrics) -> String {
    let cards = [
        ("Total Titles", metrics.total_titles),
        ("Total Movies", metrics.total_movies),
        ("Total TV Shows", metrics.total_tv_shows),
        ("Countries", metrics.countries),
    ];

    let mut html = String::from(r#"<div class="metrics">"#);
    for (label, value) in cards {
        let _ = write!(
            html,
            r#"<div class="metric"><h3>{label}</h3><div class="value">{value}</div></div>"#
        );
    }
    html.push_str("</div>");
    html
}

fn render_panel(title: &str, body: &str) -> String {
    format!(
        r#"<section class="panel"><h2>{}</h2>{}</section>"#,
        html_escape(title),
        body
    )
}

fn render_empty() -> String {
    r#"<p class="empty">No data</p>"#.to_string()
}

/// Donut chart of label shares.
fn render_donut(rows: &[Ranked]) -> String {
    let total: usize = rows.iter().map(|r| r.count).sum();
    if total == 0 {
        return render_empty();
    }

    let (cx, cy, r) = (110.0, 110.0, 100.0);
    let inner = r * DONUT_HOLE;
    let mut svg = String::from(r#"<div class="donut"><svg viewBox="0 0 220 220" role="img">"#);
    let mut legend = String::from(r#"<ul class="legend">"#);
    let mut start = -PI / 2.0;

    for (idx, row) in rows.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];
        let share = row.count as f64 / total as f64;
        let label = html_escape(&row.label);
        let tooltip = format!("{}: {} ({:.1}%)", label, row.count, share * 100.0);

        if row.count == total {
            // A single full slice cannot be drawn as an arc
            let _ = write!(
                svg,
                r#"<circle cx="{cx}" cy="{cy}" r="{mid:.2}" fill="none" stroke="{color}" stroke-width="{width:.2}"><title>{tooltip}</title></circle>"#,
                mid = (r + inner) / 2.0,
                width = r - inner,
            );
        } else if row.count > 0 {
            let end = start + share * 2.0 * PI;
            let large = if share > 0.5 { 1 } else { 0 };
            let (x0, y0) = polar(cx, cy, r, start);
            let (x1, y1) = polar(cx, cy, r, end);
            let (x2, y2) = polar(cx, cy, inner, end);
            let (x3, y3) = polar(cx, cy, inner, start);
            let _ = write!(
                svg,
                r#"<path d="M {x0:.2} {y0:.2} A {r} {r} 0 {large} 1 {x1:.2} {y1:.2} L {x2:.2} {y2:.2} A {inner} {inner} 0 {large} 0 {x3:.2} {y3:.2} Z" fill="{color}"><title>{tooltip}</title></path>"#
            );
            start = end;
        }

        let _ = write!(
            legend,
            r#"<li><span class="swatch" style="background:{color}"></span>{label} <span class="count">{:.1}%</span></li>"#,
            share * 100.0
        );
    }

    svg.push_str("</svg>");
    legend.push_str("</ul>");
    svg.push_str(&legend);
    svg.push_str("</div>");
    svg
}

fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    (cx + r * angle.cos(), cy + r * angle.sin())
}

/// Vertical bar chart of titles per year.
fn render_year_bars(by_year: &[(i32, usize)]) -> String {
    let max = by_year.iter().map(|(_, c)| *c).max().unwrap_or(0);
    if max == 0 {
        return render_empty();
    }

    let (width, height) = (480.0, 240.0);
    let (left, bottom, top) = (40.0, 30.0, 10.0);
    let plot_h = height - bottom - top;
    let slot = (width - left) / by_year.len() as f64;
    let bar_w = (slot * 0.8).max(1.0);

    let mut svg = format!(r#"<svg class="bars" viewBox="0 0 {width} {height}" role="img">"#);
    let _ = write!(
        svg,
        r#"<line class="axis" x1="{left}" y1="{y}" x2="{width}" y2="{y}"/><text class="axis-label" x="4" y="{top_label}">Count</text><text class="axis-label" x="{x_label}" y="{height}">Year</text><text class="tick" x="{tick_x}" y="{tick_y}" text-anchor="end">{max}</text>"#,
        y = height - bottom,
        top_label = top + 8.0,
        x_label = width - 30.0,
        tick_x = left - 4.0,
        tick_y = top + 4.0,
    );

    // Label at most ~12 years to keep the axis readable
    let label_every = by_year.len().div_ceil(12).max(1);

    for (idx, (year, count)) in by_year.iter().enumerate() {
        let h = *count as f64 / max as f64 * plot_h;
        let x = left + idx as f64 * slot + (slot - bar_w) / 2.0;
        let y = height - bottom - h;
        let _ = write!(
            svg,
            r#"<rect class="bar" x="{x:.2}" y="{y:.2}" width="{bar_w:.2}" height="{h:.2}"><title>{year}: {count}</title></rect>"#
        );
        if idx % label_every == 0 {
            let _ = write!(
                svg,
                r#"<text class="tick" x="{cx:.2}" y="{ty}" text-anchor="middle">{year}</text>"#,
                cx = x + bar_w / 2.0,
                ty = height - bottom + 14.0,
            );
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Horizontal bar chart, largest bar on top.
fn render_horizontal_bars(rows: &[Ranked]) -> String {
    let max = rows.iter().map(|r| r.count).max().unwrap_or(0);
    if max == 0 {
        return render_empty();
    }

    let mut html = String::from(r#"<div class="hbars">"#);
    for row in rows {
        let pct = row.count as f64 / max as f64 * 100.0;
        let _ = write!(
            html,
            r#"<div class="hbar" title="{label}: {count}"><span class="hbar-label">{label}</span><span class="hbar-track"><span class="hbar-fill" style="width:{pct:.1}%"></span></span><span class="hbar-count">{count}</span></div>"#,
            label = html_escape(&row.label),
            count = row.count,
        );
    }
    html.push_str("</div>");
    html
}

/// Tabbed directors / titles tables.
fn render_tables(dashboard: &Dashboard) -> String {
    format!(
        r#"<section class="panel wide">
            <h2>📋 Most Frequent Directors and Titles</h2>
            <div class="tabs">
                <button class="tab active" data-tab="tab-directors">🎬 Top Directors</button>
                <button class="tab" data-tab="tab-titles">📺 Top Shows</button>
            </div>
            <div class="tab-panel active" id="tab-directors">{directors}</div>
            <div class="tab-panel" id="tab-titles">{titles}</div>
        </section>"#,
        directors = render_table("Director", "Titles", &dashboard.top_directors),
        titles = render_table("Title", "Frequency", &dashboard.top_titles),
    )
}

fn render_table(label: &str, value: &str, rows: &[Ranked]) -> String {
    if rows.is_empty() {
        return render_empty();
    }

    let mut html = format!(
        r#"<table><thead><tr><th>#</th><th>{label}</th><th>{value}</th></tr></thead><tbody>"#
    );
    for (idx, row) in rows.iter().enumerate() {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            idx + 1,
            html_escape(&row.label),
            row.count
        );
    }
    html.push_str("</tbody></table>");
    html
}

fn render_footer(dashboard: &Dashboard) -> String {
    format!(
        r#"<footer>Generated {} by catalogdash v{}</footer>"#,
        dashboard.metadata.generated_at.format("%Y-%m-%d %H:%M UTC"),
        env!("CARGO_PKG_VERSION")
    )
}

/// Inline CSS for both themes.
fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; margin: 0; padding: 0; }

body.theme-dark {
    --bg: linear-gradient(to bottom, #141414, #000000);
    --fg: #ffffff;
    --card: #1a1a1a;
    --border: #333333;
    --muted: #aaaaaa;
    --track: #2a2a2a;
    font-family: 'Bebas Neue', Impact, sans-serif;
}

body.theme-light {
    --bg: #f9f9f9;
    --fg: #111111;
    --card: #ffffff;
    --border: #dddddd;
    --muted: #555555;
    --track: #eeeeee;
    font-family: Arial, sans-serif;
}

body {
    background: var(--bg);
    color: var(--fg);
    min-height: 100vh;
    line-height: 1.5;
}

.container { max-width: 1400px; margin: 0 auto; padding: 1.5rem; }

h1, h2, h3, h4 { color: #E50914; text-align: center; }

header { text-align: center; margin-bottom: 1.5rem; }
header h1 { font-size: 28px; }
header .meta { color: var(--muted); font-size: 0.875rem; }

.toggle { display: inline-flex; gap: 0.5rem; cursor: pointer; color: var(--muted); }

.metrics {
    display: grid;
    grid-template-columns: repeat(4, 1fr);
    gap: 1rem;
    margin-bottom: 1.5rem;
}

.metric {
    background: var(--card);
    border: 1px solid var(--border);
    border-radius: 12px;
    padding: 10px;
    text-align: center;
}

.metric h3 { font-size: 0.875rem; color: var(--muted); }
.metric .value { font-size: 2rem; font-weight: 700; }

.row {
    display: grid;
    grid-template-columns: 1fr 1fr;
    gap: 1rem;
    margin-bottom: 1rem;
}

.panel {
    background: var(--card);
    border: 1px solid var(--border);
    border-radius: 12px;
    padding: 1rem;
}

.panel h2 { font-size: 1.25rem; margin-bottom: 0.75rem; }
.panel.wide { margin-bottom: 1rem; }

.empty { color: var(--muted); text-align: center; padding: 2rem; }

.donut { display: flex; align-items: center; gap: 1rem; justify-content: center; }
.donut svg { width: 220px; height: 220px; }
.legend { list-style: none; }
.legend .count { color: var(--muted); }
.swatch { display: inline-block; width: 12px; height: 12px; margin-right: 6px; border-radius: 2px; }

.bars { width: 100%; height: auto; }
.bars .bar { fill: #E50914; }
.bars .bar:hover { fill: #ff2a36; }
.bars .axis { stroke: var(--muted); }
.bars .tick, .bars .axis-label { fill: var(--muted); font-size: 10px; }

.hbar { display: grid; grid-template-columns: 12rem 1fr 3rem; gap: 0.5rem; align-items: center; margin: 4px 0; }
.hbar-label { text-align: right; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.hbar-track { background: var(--track); border-radius: 4px; height: 16px; }
.hbar-fill { display: block; background: #E50914; height: 100%; border-radius: 4px; }
.hbar-count { color: var(--muted); }

.tabs { display: flex; gap: 0.5rem; margin-bottom: 0.75rem; }
.tab {
    background: transparent;
    color: var(--fg);
    border: none;
    border-bottom: 2px solid transparent;
    padding: 0.5rem 1rem;
    cursor: pointer;
    font: inherit;
}
.tab.active { border-bottom-color: #E50914; color: #E50914; }
.tab-panel { display: none; }
.tab-panel.active { display: block; }

table { width: 100%; border-collapse: collapse; }
th, td { padding: 0.5rem; text-align: left; border-bottom: 1px solid var(--border); }
th { color: var(--muted); font-weight: 600; }

footer { text-align: center; padding: 10px; font-size: 14px; color: var(--muted); }

@media (max-width: 900px) {
    .row, .metrics { grid-template-columns: 1fr; }
}
"#
}

/// Inline script for the theme toggle and the tabs.
fn inline_javascript() -> &'static str {
    r#"
(function () {
    var body = document.body;
    var toggle = document.getElementById('theme-toggle');
    toggle.addEventListener('change', function () {
        var theme = toggle.checked ? 'dark' : 'light';
        if (body.dataset.live === 'true') {
            window.location.search = '?theme=' + theme;
            return;
        }
        body.className = 'theme-' + theme;
    });

    document.querySelectorAll('.tab').forEach(function (tab) {
        tab.addEventListener('click', function () {
            document.querySelectorAll('.tab').forEach(function (t) { t.classList.remove('active'); });
            document.querySelectorAll('.tab-panel').forEach(function (p) { p.classList.remove('active'); });
            tab.classList.add('active');
            document.getElementById(tab.dataset.tab).classList.add('active');
        });
    });
})();
"#
}

/// Escape text for safe inclusion in HTML.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
