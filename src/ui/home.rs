use ratatui::{prelude::*, widgets::*};

use super::{section, status_color, ACCENT};
use crate::messages::RenderState;

const INSTRUCTIONS: &[&str] = &[
    "1. Make sure your monitoring device is powered on and connected",
    "2. Press s to start monitoring your baby",
    "3. Check the Monitor tab for real-time updates",
    "4. Set up automatic responses in the Responses tab",
];

pub fn draw(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    draw_status_card(f, state, chunks[0]);
    draw_controls(f, state, chunks[1]);

    let lines: Vec<Line> = INSTRUCTIONS.iter().map(|l| Line::from(*l)).collect();
    f.render_widget(
        Paragraph::new(lines)
            .block(section("How to use"))
            .wrap(Wrap { trim: true }),
        chunks[2],
    );
}

fn draw_status_card(f: &mut Frame, state: &RenderState, area: Rect) {
    let home = &state.home;
    let status = if home.refreshing {
        Span::styled("Checking...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            home.device_status.label(),
            Style::default().fg(status_color(home.device_status)).bold(),
        )
    };
    let device = state
        .user
        .as_ref()
        .map(|u| u.device_id.as_str())
        .filter(|id| !id.is_empty())
        .unwrap_or("no device linked");

    let lines = vec![
        Line::from(vec![Span::raw("Status: "), status]),
        Line::from(Span::styled(
            format!("Device: {}", device),
            Style::default().fg(Color::Gray),
        )),
    ];
    f.render_widget(Paragraph::new(lines).block(section("Device Status")), area);
}

fn draw_controls(f: &mut Frame, state: &RenderState, area: Rect) {
    let home = &state.home;
    let button = |label: &'static str, enabled: bool| {
        let style = if enabled {
            Style::default().fg(Color::Black).bg(ACCENT).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(label, style)
    };

    let mut spans = vec![
        button(" [s] Start Scan ", home.can_start()),
        Span::raw("  "),
        button(" [x] Stop Scan ", home.can_stop()),
    ];
    if home.loading {
        spans.push(Span::styled("  working...", Style::default().fg(Color::Yellow)));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL)),
        area,
    );
}
