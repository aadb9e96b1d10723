//! Header bar, status bar and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

/// One-line summary of the log: sample count, latest speed, min/mean/max
/// over available samples and how many runs were offline.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let summary = &app.summary;

    let mut spans = vec![
        Span::styled(" SPEEDWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("· "),
        Span::styled(
            format!("{}", summary.count),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" samples · latest "),
    ];

    match summary.latest {
        Some(speed) => spans.push(Span::styled(format_speed(speed), app.theme.speed_style(speed))),
        None => spans.push(Span::styled("-", Style::default().add_modifier(Modifier::DIM))),
    }

    if let (Some(min), Some(mean), Some(max)) = (summary.min, summary.mean, summary.max) {
        spans.push(Span::raw(format!(
            " · min {:.2} avg {:.2} max {:.2}",
            min, mean, max
        )));
    }

    spans.push(Span::raw(" · "));
    if summary.unavailable > 0 {
        spans.push(Span::styled(
            format!("{}", summary.unavailable),
            Style::default().fg(app.theme.unavailable).add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled("0", Style::default().add_modifier(Modifier::DIM)));
    }
    spans.push(Span::raw(" offline"));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Format a speed for display, spelling out the sentinel.
pub fn format_speed(speed: f64) -> String {
    if speed == speedwatch_types::SENTINEL {
        "offline".to_string()
    } else {
        format!("{:.2} Mbit/s", speed)
    }
}

/// Key bindings listed in the help overlay.
const SHORTCUTS: &[(&str, &str)] = &[
    ("+ / =", "more histogram bins"),
    ("-", "fewer histogram bins"),
    ("r", "reload the log"),
    ("e", "export the HTML chart"),
    ("?", "toggle this help"),
    ("q / Esc", "quit"),
];

/// Bottom line: a fresh status message, the last load error, or the
/// source and key hints.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if let Some(msg) = app.get_status_message() {
        (format!(" {} ", msg), Style::default().fg(app.theme.highlight))
    } else if let Some(ref err) = app.load_error {
        (
            format!(" Reload failed: {} | r:retry q:quit", err),
            Style::default().fg(app.theme.unavailable),
        )
    } else {
        (
            format!(
                " {} | {} bins | +/-:bins r:reload e:export ?:help q:quit",
                app.source_description(),
                app.histogram_bins,
            ),
            Style::default().add_modifier(Modifier::DIM),
        )
    };

    frame.render_widget(Paragraph::new(text).style(style), area);
}

/// Centered overlay listing [`SHORTCUTS`].
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = SHORTCUTS
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("  {:<9}", keys), key_style),
                Span::raw(*action),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  any key closes this window",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let width = 40u16.min(area.width.saturating_sub(4));
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    let block = Block::default()
        .title(" Keys ")
        .title_style(app.theme.header)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
