use ratatui::{prelude::*, widgets::*};

use super::{centered_rect, draw_form, form_height, ACCENT};
use crate::constants::APP_NAME;
use crate::messages::RenderState;

pub fn draw_login(f: &mut Frame, state: &RenderState, area: Rect) {
    let form = &state.login.form;
    let card = centered_rect(50, 80, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(form_height(form)),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(card);

    f.render_widget(title(APP_NAME, "Sign in to continue"), chunks[0]);
    draw_form(f, form, !state.login.loading, chunks[1]);

    let action = if state.login.loading {
        Span::styled("Logging in...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("Enter: Login", Style::default().fg(ACCENT).bold())
    };
    f.render_widget(Paragraph::new(Line::from(action)).centered(), chunks[2]);
    f.render_widget(
        Paragraph::new("Don't have an account? Ctrl+N to sign up | Esc: quit")
            .style(Style::default().fg(Color::DarkGray))
            .centered(),
        chunks[3],
    );
}

pub fn draw_signup(f: &mut Frame, state: &RenderState, area: Rect) {
    let form = &state.signup.form;
    let card = centered_rect(50, 95, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(form_height(form)),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(card);

    f.render_widget(title("Create Account", "All fields are required"), chunks[0]);
    draw_form(f, form, !state.signup.loading, chunks[1]);

    let action = if state.signup.loading {
        Span::styled("Creating account...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("Enter: Sign Up | Esc: back to login", Style::default().fg(ACCENT))
    };
    f.render_widget(Paragraph::new(Line::from(action)).centered(), chunks[2]);
}

fn title<'a>(heading: &'a str, subtitle: &'a str) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(heading, Style::default().fg(ACCENT).bold())),
        Line::from(Span::styled(subtitle, Style::default().fg(Color::Gray))),
    ])
    .centered()
}
