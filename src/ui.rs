pub mod tiles;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    scoring::{Outcome, TranscriptEntry},
    session::{EndReason, Session, SessionPhase},
};
use tiles::{ScoreTile, TILE_HEIGHT};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(3), // title, subtitle, warning
                Constraint::Length(2), // control label
                Constraint::Min(6),    // tiles and quote
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(vec![
            Line::from(Span::styled("chaabi", bold_style.fg(Color::Cyan))),
            Line::from(Span::styled("typing speed test", italic_style)),
            Line::from(vec![
                Span::raw("Don't use "),
                Span::styled("backspace", bold_style),
                Span::raw(" to correct your mistakes."),
            ])
            .style(Style::default().fg(Color::Red)),
        ])
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        Paragraph::new(Span::styled(control_label(session.phase()), bold_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(20),
                Constraint::Percentage(60),
                Constraint::Percentage(20),
            ])
            .split(chunks[2]);

        let metrics = session.metrics();
        render_tiles(
            &[
                ScoreTile::wpm(metrics.wpm),
                ScoreTile::plain("CPM", metrics.cpm),
                ScoreTile::plain("Last Score", session.last_score()),
            ],
            columns[0],
            buf,
        );
        render_tiles(
            &[
                ScoreTile::plain("Timer", session.countdown().remaining_secs()),
                ScoreTile::plain("Errors", session.scoring().error_count),
                ScoreTile::accuracy(metrics.accuracy),
            ],
            columns[2],
            buf,
        );

        render_typing_area(session, columns[1], buf);

        Paragraph::new(Span::styled(legend(session.phase()), italic_style))
            .render(chunks[3], buf);
    }
}

fn control_label(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::NotStarted => "GO! (press enter)",
        SessionPhase::Running => "Hurry",
        SessionPhase::Ended => "Reload (press r)",
    }
}

fn legend(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::NotStarted => "(enter) go / (esc)ape",
        SessionPhase::Running => "type the quote / (esc)ape",
        SessionPhase::Ended => "(r)eload / (esc)ape",
    }
}

fn render_tiles(tiles: &[ScoreTile], area: Rect, buf: &mut Buffer) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            tiles
                .iter()
                .map(|_| Constraint::Length(TILE_HEIGHT))
                .chain(std::iter::once(Constraint::Min(0))),
        )
        .split(area);

    for (tile, row) in tiles.iter().zip(rows.iter()) {
        tile.render(*row, buf);
    }
}

fn render_typing_area(session: &Session, area: Rect, buf: &mut Buffer) {
    let dim_bold_style = Style::default()
        .add_modifier(Modifier::BOLD)
        .add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = dim_bold_style.add_modifier(Modifier::UNDERLINED);

    let scoring = session.scoring();
    let inner_width = area.width.saturating_sub(2).max(1);

    let (quote_lines, border_style) = match session.phase() {
        SessionPhase::NotStarted => (
            vec![Line::from(Span::styled(
                session.quote().text.clone(),
                dim_bold_style,
            ))],
            Style::default().fg(Color::DarkGray),
        ),
        SessionPhase::Running => {
            let remaining = scoring.remaining(session.target());
            let mut spans = Vec::new();
            if let Some((next, rest)) = remaining.split_first() {
                spans.push(Span::styled(next.to_string(), underlined_dim_bold_style));
                spans.push(Span::styled(rest.iter().collect::<String>(), dim_bold_style));
            }
            let border = if scoring.is_error {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Green)
            };
            (vec![Line::from(spans)], border)
        }
        SessionPhase::Ended => (
            vec![
                Line::from(Span::styled(
                    format!("\"{}\"", session.quote().text),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("- {}", session.quote().author),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )),
            ],
            Style::default().fg(Color::DarkGray),
        ),
    };

    let quote_height = quote_lines
        .iter()
        .map(|line| {
            let width = line
                .spans
                .iter()
                .map(|span| span.content.width())
                .sum();
            wrapped_rows(width, inner_width)
        })
        .fold(2u16, u16::saturating_add)
        .min(area.height);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(quote_height), Constraint::Min(3)])
        .split(area);

    let title = match session.end_reason() {
        Some(reason) => format!(" quote ({}) ", end_reason_label(reason)),
        None => " quote ".to_string(),
    };
    Paragraph::new(quote_lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style)
                .title(title),
        )
        .render(chunks[0], buf);

    Paragraph::new(Line::from(transcript_spans(&scoring.transcript)))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" typed "),
        )
        .render(chunks[1], buf);
}

fn end_reason_label(reason: EndReason) -> &'static str {
    match reason {
        EndReason::Timeout => "time's up",
        EndReason::Completed => "done",
        EndReason::ErrorCeiling => "too many errors",
    }
}

fn wrapped_rows(text_width: usize, width: u16) -> u16 {
    let rows = text_width.max(1).div_ceil(usize::from(width.max(1)));
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Consecutive keystrokes with the same outcome share a span; mistakes are red
/// and a mistyped space shows as a middle dot.
pub fn transcript_spans(transcript: &[TranscriptEntry]) -> Vec<Span<'static>> {
    let red_bold_style = Style::default()
        .add_modifier(Modifier::BOLD)
        .fg(Color::Red);

    transcript
        .iter()
        .chunk_by(|entry| entry.outcome)
        .into_iter()
        .map(|(outcome, group)| match outcome {
            Outcome::Correct => Span::raw(group.map(|e| e.ch).collect::<String>()),
            Outcome::Incorrect => Span::styled(
                group
                    .map(|e| if e.ch == ' ' { '·' } else { e.ch })
                    .collect::<String>(),
                red_bold_style,
            ),
        })
        .collect()
}
