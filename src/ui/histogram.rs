//! Histogram panel: how often each download speed was seen.

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::SPEED_AXIS;

/// Render the histogram of download speeds.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let histogram = app.histogram();

    let block = Block::default()
        .title(format!(" {} (x) / Count (y) ", SPEED_AXIS))
        .title_style(app.theme.header)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if histogram.bins().is_empty() {
        let empty = Paragraph::new("No measurements").style(app.theme.axis).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let bars: Vec<Bar> = histogram
        .bins()
        .iter()
        .map(|bin| {
            Bar::default()
                .value(bin.count)
                .label(Line::from(format!("{:.0}", bin.lower)))
                .style(Style::default().fg(app.theme.bars))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let (bar_width, bar_gap) = bar_layout(inner_width, bars.len() as u16);

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .max(histogram.max_count().max(1))
        .label_style(app.theme.axis)
        .value_style(app.theme.header);

    frame.render_widget(chart, area);
}

/// Widest bars (with a one-column gap when room allows) that fit `width`.
fn bar_layout(width: u16, bars: u16) -> (u16, u16) {
    if bars == 0 {
        return (1, 0);
    }
    let with_gap = width.saturating_sub(bars.saturating_sub(1)) / bars;
    if with_gap >= 2 {
        (with_gap, 1)
    } else {
        ((width / bars).max(1), 0)
    }
}
