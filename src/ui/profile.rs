use ratatui::{prelude::*, widgets::*};

use super::{draw_form, form_height, section, status_color, ACCENT};
use crate::app::state::ProfileMode;
use crate::messages::RenderState;

pub fn draw(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(user) = &state.user else {
        f.render_widget(Paragraph::new("Not logged in").centered(), area);
        return;
    };
    let profile = &state.profile;

    let info_rows = match profile.mode {
        ProfileMode::EditInfo => form_height(&profile.info) + 2,
        _ => 5,
    };
    let baby_rows = (user.baby.len() as u16).max(1) + 2;
    let add_rows = if profile.mode == ProfileMode::AddBaby {
        form_height(&profile.baby_form) + 2
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(info_rows),
            Constraint::Length(baby_rows),
            Constraint::Length(add_rows),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    // Personal information
    if profile.mode == ProfileMode::EditInfo {
        let title = if profile.save.is_some() {
            "Personal Information (saving...)"
        } else {
            "Personal Information (Enter: save)"
        };
        let block = section(title);
        let inner = block.inner(chunks[0]);
        f.render_widget(block, chunks[0]);
        draw_form(f, &profile.info, profile.save.is_none(), inner);
    } else {
        let row = |label: &'static str, value: &str| {
            Line::from(vec![
                Span::styled(format!("{:<8}", label), Style::default().fg(Color::Gray)),
                Span::raw(value.to_string()),
            ])
        };
        let lines = vec![
            row("Name", &user.name),
            row("Email", &user.email),
            row("Phone", &user.phone_number),
        ];
        f.render_widget(
            Paragraph::new(lines).block(section("Personal Information")),
            chunks[0],
        );
    }

    // Babies
    let items: Vec<ListItem> = if user.baby.is_empty() {
        vec![ListItem::new(Span::styled(
            "No babies added yet",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        user.baby
            .iter()
            .map(|(name, baby)| {
                let scanning = *name == user.scanning_baby;
                let marker = if scanning { "● " } else { "○ " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(ACCENT)),
                    Span::styled(name.clone(), Style::default().bold()),
                    Span::styled(format!("  {}", baby.age), Style::default().fg(Color::Gray)),
                ]))
            })
            .collect()
    };
    let list = List::new(items)
        .block(section("Babies"))
        .highlight_style(Style::default().bg(Color::DarkGray));
    let selected = (!user.baby.is_empty() && profile.mode == ProfileMode::View)
        .then_some(profile.selected_baby);
    let mut list_state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, chunks[1], &mut list_state);

    if profile.mode == ProfileMode::AddBaby {
        let block = section("Add Baby");
        let inner = block.inner(chunks[2]);
        f.render_widget(block, chunks[2]);
        draw_form(f, &profile.baby_form, true, inner);
    }

    // Device
    let status = state.home.device_status;
    let device = Line::from(vec![
        Span::raw(format!("{}  ", user.device_id)),
        Span::styled(status.label(), Style::default().fg(status_color(status))),
        Span::styled(
            if profile.loading { "  working..." } else { "  [s] start  [x] stop" },
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(device).block(section("Device")), chunks[3]);

    f.render_widget(
        Paragraph::new(" [l] Logout").style(Style::default().fg(Color::Red)),
        chunks[4],
    );
}
