use ratatui::{prelude::*, widgets::*};

use super::{section, stat_card, ACCENT};
use crate::messages::RenderState;

pub fn draw(f: &mut Frame, state: &RenderState, area: Rect) {
    let monitor = &state.monitor;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);

    let feed = vec![
        Line::from(Span::styled("[ Latest Snapshot ]", Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(vec![
            Span::raw("Activity Detected: "),
            Span::styled(monitor.model.status.label(), Style::default().fg(ACCENT).bold()),
        ]),
        Line::from(Span::styled(
            format!("Snapshot from {}", monitor.last_snapshot),
            Style::default().fg(Color::Gray),
        )),
    ];
    f.render_widget(
        Paragraph::new(feed).centered().block(section("Monitor")),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(" Current Stats").style(Style::default().bold()),
        chunks[1],
    );

    let stats = &monitor.model.stats;
    let cards = [
        ("Sleep Quality", stats.sleep_quality.as_str()),
        ("Movement", stats.movement.label()),
        ("Sound Level", stats.sound_level.label()),
        ("Room Temp", stats.temperature.as_str()),
    ];
    for (row, pair) in cards.chunks(2).enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2 + row]);
        for (col, (label, value)) in pair.iter().enumerate() {
            f.render_widget(stat_card(label, value), cols[col]);
        }
    }

    let updated = monitor
        .last_update
        .map(|t| format!("Last update: {}", t.format("%-I:%M:%S %p")))
        .unwrap_or_else(|| String::from("Waiting for first update..."));
    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(updated, Style::default().fg(Color::DarkGray))),
            Line::from(Span::styled(
                "[p] Take New Snapshot",
                Style::default().fg(ACCENT),
            )),
        ])
        .block(Block::default().padding(Padding::horizontal(1))),
        chunks[4],
    );
}
