//! Time series panel: download speed against measurement date.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset as Series, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::Dataset;
use crate::ui::SPEED_AXIS;

/// Headroom above the fastest sample on the speed axis.
const Y_HEADROOM: f64 = 5.0;

/// Render the speed-over-time line chart.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Download speed over time ")
        .title_style(app.theme.header)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let points = points(&app.dataset);
    if points.is_empty() {
        let empty = Paragraph::new("No measurements").style(app.theme.axis).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let (x_min, x_max) = x_bounds(&points);
    let y_max = y_upper(&points);

    let series = vec![Series::default()
        .name("Download")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(app.theme.series))
        .data(&points)];

    let x_labels = vec![
        Span::styled(date_label(x_min), app.theme.axis),
        Span::styled(date_label((x_min + x_max) / 2.0), app.theme.axis),
        Span::styled(date_label(x_max), app.theme.axis),
    ];
    let y_labels = vec![
        Span::styled("0", app.theme.axis),
        Span::styled(format!("{:.0}", y_max / 2.0), app.theme.axis),
        Span::styled(format!("{:.0}", y_max), app.theme.axis),
    ];

    let chart = Chart::new(series)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Date")
                .style(app.theme.axis)
                .bounds([x_min, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(SPEED_AXIS)
                .style(app.theme.axis)
                .bounds([0.0, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

/// Chart points as (unix seconds, speed), in file order.
fn points(dataset: &Dataset) -> Vec<(f64, f64)> {
    dataset
        .rows()
        .iter()
        .map(|row| (row.date.timestamp() as f64, row.speed))
        .collect()
}

/// Time bounds; a single sample gets an hour either side.
fn x_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        (min - 3600.0, max + 3600.0)
    } else {
        (min, max)
    }
}

fn y_upper(points: &[(f64, f64)]) -> f64 {
    let max = points.iter().map(|p| p.1).fold(0.0, f64::max);
    max + Y_HEADROOM
}

fn date_label(secs: f64) -> String {
    DateTime::<Utc>::from_timestamp(secs as i64, 0)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DatasetRow;
    use chrono::TimeZone;

    fn row(hour: u32, speed: f64) -> DatasetRow {
        DatasetRow {
            date: Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap(),
            speed,
            comment: None,
        }
    }

    #[test]
    fn test_points_keep_file_order() {
        let dataset = Dataset::from_rows(vec![row(5, 40.0), row(1, 42.5)], false);
        let pts = points(&dataset);
        assert_eq!(pts.len(), 2);
        assert!(pts[0].0 > pts[1].0);
        assert_eq!(pts[1].1, 42.5);
    }

    #[test]
    fn test_y_upper_adds_headroom() {
        assert_eq!(y_upper(&[(0.0, 40.0), (1.0, 95.0)]), 100.0);
        // Only sentinel values still give a positive axis
        assert_eq!(y_upper(&[(0.0, -1.0)]), 5.0);
    }

    #[test]
    fn test_x_bounds_single_sample() {
        let (min, max) = x_bounds(&[(7200.0, 1.0)]);
        assert_eq!(min, 3600.0);
        assert_eq!(max, 10800.0);
    }

    #[test]
    fn test_date_label() {
        let secs = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap().timestamp() as f64;
        assert_eq!(date_label(secs), "2024-03-01 12:30");
    }
}
