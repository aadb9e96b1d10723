//! Interactive HTML chart of download speeds.
//!
//! Produces a single self-contained page (inline CSS, data and script, no
//! network access needed to view it): a time series of download speed with
//! hover text showing each row's comment, and a range selector below the
//! plot.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::data::Dataset;

/// Page and chart title.
pub const TITLE: &str = "Internet download speeds";

/// Y axis title.
pub const Y_AXIS_TITLE: &str = "Download Speed [Mbits/s]";

/// X axis title.
pub const X_AXIS_TITLE: &str = "Date";

/// Headroom above the fastest sample on the speed axis.
const Y_HEADROOM: f64 = 5.0;

/// One plotted point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// RFC 3339 timestamp.
    pub date: String,
    /// Milliseconds since the Unix epoch, used for the x position.
    pub t: i64,
    /// Download speed in MiBit/s.
    pub speed: f64,
    /// Hover text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChartData<'a> {
    title: &'a str,
    x_title: &'a str,
    y_title: &'a str,
    y_min: f64,
    y_max: f64,
    points: Vec<ChartPoint>,
}

/// Points for `dataset`, in file order.
pub fn chart_points(dataset: &Dataset) -> Vec<ChartPoint> {
    dataset
        .rows()
        .iter()
        .map(|row| ChartPoint {
            date: row.date.to_rfc3339(),
            t: row.date.timestamp_millis(),
            speed: row.speed,
            comment: row.comment.clone(),
        })
        .collect()
}

/// Speed axis range: from 0, or lower to reach unavailable rows plotted
/// at their real value, up to the fastest sample plus headroom.
pub fn y_range(points: &[ChartPoint]) -> (f64, f64) {
    let min = points.iter().map(|p| p.speed).fold(0.0, f64::min);
    let max = points.iter().map(|p| p.speed).fold(0.0, f64::max);
    (min, max + Y_HEADROOM)
}

/// Render the full HTML page for `dataset`.
pub fn render(dataset: &Dataset) -> Result<String, serde_json::Error> {
    let points = chart_points(dataset);
    let (y_min, y_max) = y_range(&points);
    let data = ChartData {
        title: TITLE,
        x_title: X_AXIS_TITLE,
        y_title: Y_AXIS_TITLE,
        y_min,
        y_max,
        points,
    };
    let json = script_safe(&serde_json::to_string(&data)?);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{styles}</style>
</head>
<body>
<h1>{title}</h1>
<div id="chart"><svg id="plot" viewBox="0 0 960 420" preserveAspectRatio="none"></svg><div id="tip"></div></div>
<div id="range">
<label>From <input id="from" type="range" min="0" value="0"></label>
<label>To <input id="to" type="range" min="0" value="0"></label>
<span id="span"></span>
</div>
<script id="chart-data" type="application/json">{json}</script>
<script>{script}</script>
</body>
</html>
"#,
        title = escape_html(TITLE),
        styles = STYLES,
        json = json,
        script = SCRIPT,
    ))
}

/// Write the chart for `dataset` to `path`, replacing any existing file.
pub fn write<P: AsRef<Path>>(dataset: &Dataset, path: P) -> io::Result<()> {
    let path = path.as_ref();
    let html = render(dataset).map_err(io::Error::other)?;
    fs::write(path, html)?;
    info!(path = %path.display(), points = dataset.len(), "wrote interactive chart");
    Ok(())
}

/// Escape HTML special characters.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Make JSON safe to embed in a `<script>` element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\!--")
}

const STYLES: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; background: #f5f5f5; color: #333; }
h1 { font-size: 1.4em; }
#chart { position: relative; background: white; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
#plot { width: 100%; height: 420px; display: block; }
#plot .axis { stroke: #999; stroke-width: 1; }
#plot .grid { stroke: #eee; stroke-width: 1; }
#plot .series { fill: none; stroke: #4a90d9; stroke-width: 2; vector-effect: non-scaling-stroke; }
#plot .point { fill: #4a90d9; }
#plot .point.unavailable { fill: #d9534f; }
#plot text { font-size: 11px; fill: #666; }
#tip { position: absolute; display: none; pointer-events: none; background: rgba(40,40,40,0.9); color: white; padding: 4px 8px; border-radius: 3px; font-size: 12px; white-space: pre; }
#range { margin-top: 12px; display: flex; gap: 16px; align-items: center; }
#range input { width: 300px; }
"#;

const SCRIPT: &str = r#"
(function () {
  var data = JSON.parse(document.getElementById('chart-data').textContent);
  var pts = data.points;
  var svg = document.getElementById('plot');
  var tip = document.getElementById('tip');
  var from = document.getElementById('from');
  var to = document.getElementById('to');
  var span = document.getElementById('span');
  var W = 960, H = 420, L = 60, R = 20, T = 20, B = 50;
  var NS = 'http://www.w3.org/2000/svg';

  function el(name, attrs, text) {
    var e = document.createElementNS(NS, name);
    for (var k in attrs) e.setAttribute(k, attrs[k]);
    if (text !== undefined) e.textContent = text;
    svg.appendChild(e);
    return e;
  }

  function draw() {
    while (svg.firstChild) svg.removeChild(svg.firstChild);
    var lo = Math.min(+from.value, +to.value), hi = Math.max(+from.value, +to.value);
    var view = pts.slice(lo, hi + 1);
    span.textContent = view.length ? view[0].date + '  →  ' + view[view.length - 1].date : 'no data';
    if (!view.length) return;

    var t0 = Math.min.apply(null, view.map(function (p) { return p.t; }));
    var t1 = Math.max.apply(null, view.map(function (p) { return p.t; }));
    if (t0 === t1) { t0 -= 1; t1 += 1; }
    var ymin = data.y_min, ymax = data.y_max;
    var x = function (t) { return L + (t - t0) / (t1 - t0) * (W - L - R); };
    var y = function (v) { return T + (1 - (v - ymin) / (ymax - ymin)) * (H - T - B); };

    for (var i = 0; i <= 5; i++) {
      var v = ymin + (ymax - ymin) * i / 5, gy = y(v);
      el('line', { x1: L, x2: W - R, y1: gy, y2: gy, 'class': 'grid' });
      el('text', { x: L - 6, y: gy + 4, 'text-anchor': 'end' }, v.toFixed(0));
    }
    el('line', { x1: L, x2: W - R, y1: H - B, y2: H - B, 'class': 'axis' });
    el('line', { x1: L, x2: L, y1: T, y2: H - B, 'class': 'axis' });
    el('text', { x: (L + W - R) / 2, y: H - 10, 'text-anchor': 'middle' }, data.x_title);
    el('text', { x: 14, y: (T + H - B) / 2, 'text-anchor': 'middle', transform: 'rotate(-90 14 ' + (T + H - B) / 2 + ')' }, data.y_title);
    [t0, (t0 + t1) / 2, t1].forEach(function (t) {
      el('text', { x: x(t), y: H - B + 16, 'text-anchor': 'middle' }, new Date(t).toISOString().slice(0, 16).replace('T', ' '));
    });

    el('polyline', { 'class': 'series', points: view.map(function (p) { return x(p.t) + ',' + y(p.speed); }).join(' ') });
    view.forEach(function (p) {
      var c = el('circle', { cx: x(p.t), cy: y(p.speed), r: 3, 'class': p.speed < 0 ? 'point unavailable' : 'point' });
      c.addEventListener('mouseenter', function (ev) {
        tip.textContent = p.date + '\n' + p.speed.toFixed(2) + ' Mbit/s' + (p.comment ? '\n' + p.comment : '');
        tip.style.display = 'block';
        tip.style.left = (ev.offsetX + 12) + 'px';
        tip.style.top = (ev.offsetY + 12) + 'px';
      });
      c.addEventListener('mouseleave', function () { tip.style.display = 'none'; });
    });
  }

  from.max = to.max = Math.max(pts.length - 1, 0);
  to.value = to.max;
  from.addEventListener('input', draw);
  to.addEventListener('input', draw);
  draw();
})();
"#;
