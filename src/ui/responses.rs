use ratatui::{prelude::*, widgets::*};

use super::{draw_form, form_height, section, ACCENT};
use crate::messages::RenderState;

pub fn draw(f: &mut Frame, state: &RenderState, area: Rect) {
    let responses = &state.responses;
    let baby = state
        .user
        .as_ref()
        .and_then(|u| u.selected_baby())
        .map(|(name, _)| name.to_string());

    let form_rows = if responses.adding {
        form_height(&responses.form) + 2
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(form_rows),
            Constraint::Min(0),
        ])
        .split(area);

    let header = match &baby {
        Some(name) => format!(" Responses for {}", name),
        None => String::from(" Responses"),
    };
    let toggle = if responses.adding { "[Esc] close" } else { "[a] add" };
    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(header, Style::default().bold())),
            Line::from(Span::styled(format!(" {}", toggle), Style::default().fg(ACCENT))),
        ]),
        chunks[0],
    );

    if responses.adding {
        let block = section("Add New Response");
        let inner = block.inner(chunks[1]);
        f.render_widget(block, chunks[1]);
        draw_form(f, &responses.form, true, inner);
    }

    let entries = state.response_entries();
    if entries.is_empty() {
        let message = if baby.is_none() {
            "No baby selected. Pick one on the Profile tab."
        } else {
            "No responses added yet. Press a to add one."
        };
        f.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .block(section("Saved")),
            chunks[2],
        );
        return;
    }

    let items: Vec<ListItem> = entries
        .iter()
        .map(|(name, url)| {
            let playing = responses.playing.as_deref() == Some(*name);
            let icon = if playing { "⏸ " } else { "▶ " };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(icon, Style::default().fg(ACCENT)),
                    Span::styled(name.to_string(), Style::default().bold()),
                ]),
                Line::from(Span::styled(
                    format!("   {}", url),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(section("Saved"))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(responses.selected));
    f.render_stateful_widget(list, chunks[2], &mut list_state);
}
