//! Chart palettes for dark and light terminals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use speedwatch_types::SENTINEL;

/// Colors used by the static chart.
///
/// [`Theme::auto_detect()`] picks a palette from the terminal background.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent for status messages and the help border.
    pub highlight: Color,
    /// Color of the time series line.
    pub series: Color,
    /// Color of histogram bars.
    pub bars: Color,
    /// Color for unavailable measurements and errors.
    pub unavailable: Color,
    /// Panel borders.
    pub border: Color,
    /// Panel titles and bar values.
    pub header: Style,
    /// Style for axis labels.
    pub axis: Style,
    pub border_type: BorderType,
}

impl Theme {
    /// Palette for dark backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            series: Color::Cyan,
            bars: Color::Blue,
            unavailable: Color::Red,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            axis: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Palette for light backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            series: Color::Blue,
            bars: Color::LightBlue,
            unavailable: Color::Red,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            axis: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Light palette when the background luma is above one half, dark
    /// otherwise (including when the terminal does not answer).
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a speed value, flagging the sentinel.
    pub fn speed_style(&self, speed: f64) -> Style {
        if speed == SENTINEL {
            Style::default().fg(self.unavailable).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.highlight)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_style_flags_sentinel() {
        let theme = Theme::dark();
        assert_eq!(theme.speed_style(-1.0).fg, Some(Color::Red));
        assert_eq!(theme.speed_style(42.0).fg, Some(Color::Cyan));
    }
}
