use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::metrics::WpmBand;

/// Rows a tile needs: two borders, the name and the value
pub const TILE_HEIGHT: u16 = 4;

/// Tile background for a WPM band; zero stays unstyled.
pub fn band_color(band: WpmBand) -> Option<Color> {
    match band {
        WpmBand::Unscored => None,
        WpmBand::Slow => Some(Color::Rgb(0xeb, 0x48, 0x41)),
        WpmBand::Steady => Some(Color::Rgb(0xf4, 0x88, 0x47)),
        WpmBand::Good => Some(Color::Rgb(0xff, 0xc8, 0x4a)),
        WpmBand::Fast => Some(Color::Rgb(0xa6, 0xc3, 0x4c)),
        WpmBand::Blazing => Some(Color::Rgb(0x4e, 0xc0, 0x4e)),
    }
}

/// A single labelled number on the score board
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTile {
    pub name: &'static str,
    pub value: String,
    pub style: Style,
}

impl ScoreTile {
    pub fn plain(name: &'static str, value: impl ToString) -> Self {
        Self {
            name,
            value: value.to_string(),
            style: Style::default(),
        }
    }

    pub fn wpm(wpm: u64) -> Self {
        let style = match band_color(WpmBand::of(wpm)) {
            Some(bg) => Style::default().fg(Color::White).bg(bg),
            None => Style::default(),
        };
        Self {
            name: "WPM",
            value: wpm.to_string(),
            style,
        }
    }

    pub fn accuracy(accuracy: i64) -> Self {
        Self::plain("Accuracy", accuracy_label(accuracy))
    }
}

/// The percent sign only shows up once there is a positive accuracy
pub fn accuracy_label(accuracy: i64) -> String {
    if accuracy > 0 {
        format!("{accuracy}%")
    } else {
        accuracy.to_string()
    }
}

impl Widget for &ScoreTile {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::from(Span::raw(self.name)),
            Line::from(Span::styled(
                self.value.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];

        Paragraph::new(lines)
            .style(self.style)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_suffix_only_when_positive() {
        assert_eq!(accuracy_label(0), "0");
        assert_eq!(accuracy_label(97), "97%");
        assert_eq!(accuracy_label(-12), "-12");
    }

    #[test]
    fn band_colors() {
        assert_eq!(band_color(WpmBand::Unscored), None);
        assert_eq!(band_color(WpmBand::Slow), Some(Color::Rgb(235, 72, 65)));
        assert_eq!(band_color(WpmBand::Blazing), Some(Color::Rgb(78, 192, 78)));
    }

    #[test]
    fn wpm_tile_is_banded() {
        assert_eq!(ScoreTile::wpm(0).style, Style::default());
        assert_eq!(
            ScoreTile::wpm(45).style.bg,
            Some(Color::Rgb(0xff, 0xc8, 0x4a))
        );
        assert_eq!(ScoreTile::wpm(85).style.fg, Some(Color::White));
    }

    #[test]
    fn tile_renders_name_and_value() {
        let tile = ScoreTile::plain("Errors", 7);
        let area = Rect::new(0, 0, 12, TILE_HEIGHT);
        let mut buf = Buffer::empty(area);

        (&tile).render(area, &mut buf);

        let row = |y: u16| -> String { (0..area.width).map(|x| buf[(x, y)].symbol()).collect() };
        assert!(row(1).contains("Errors"));
        assert!(row(2).contains('7'));
    }
}
