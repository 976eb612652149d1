//! UI layer - draws a [`RenderState`] into the terminal. Never mutates state.

mod auth;
mod home;
mod monitor;
mod profile;
mod responses;
mod settings;

use ratatui::{prelude::*, widgets::*};

use crate::app::form::{Form, TextField};
use crate::app::state::Alert;
use crate::messages::ui_events::{AppTab, InputMode, Screen};
use crate::messages::RenderState;
use crate::models::DeviceStatus;

/// Brand green
pub const ACCENT: Color = Color::Rgb(155, 206, 34);

pub fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    match state.screen {
        Screen::Login => auth::draw_login(f, state, area),
        Screen::Signup => auth::draw_signup(f, state, area),
        Screen::Main => draw_main(f, state, area),
    }

    // Popups
    if state.show_help {
        draw_help_popup(f, area);
    }
    if let Some(alert) = &state.alert {
        draw_alert(f, alert, area);
    }
}

fn draw_main(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_tab_bar(f, state, chunks[0]);

    match state.active_tab {
        AppTab::Home => home::draw(f, state, chunks[1]),
        AppTab::Monitor => monitor::draw(f, state, chunks[1]),
        AppTab::Responses => responses::draw(f, state, chunks[1]),
        AppTab::Profile => profile::draw(f, state, chunks[1]),
        AppTab::Settings => settings::draw(f, state, chunks[1]),
    }

    draw_status_bar(f, state, chunks[2]);
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let titles: Vec<String> = AppTab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!(" {}:{} ", i + 1, tab.title()))
        .collect();
    let titles: Vec<&str> = titles.iter().map(String::as_str).collect();
    f.render_widget(render_tabs(&titles, state.active_tab.index()), area);
}

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Black).bg(ACCENT).bold())
        .divider("|")
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = if state.key_context.input_mode == InputMode::Editing {
        " Enter:submit | Tab:next field | Esc:cancel "
    } else {
        match state.active_tab {
            AppTab::Home => " s:start scan | x:stop scan | r:refresh | ?:help | q:quit ",
            AppTab::Monitor => " p:take snapshot | ?:help | q:quit ",
            AppTab::Responses => " a:add | ↑↓:select | p/space:play | d:remove | q:quit ",
            AppTab::Profile => {
                " e:edit | n:add baby | ↑↓ Enter:select baby | s/x:scan | l:logout "
            }
            AppTab::Settings => " ↑↓:select | Enter:open | ←→:adjust | Esc:back | q:quit ",
        }
    };

    let user = state
        .user
        .as_ref()
        .map(|u| format!(" {} ", u.username))
        .unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(user.len() as u16)])
        .split(area);

    f.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        chunks[0],
    );
    f.render_widget(Paragraph::new(user).style(Style::default().fg(ACCENT)), chunks[1]);
}

fn draw_alert(f: &mut Frame, alert: &Alert, area: Rect) {
    let popup_area = centered_rect(50, 25, area);
    let color = if alert.title == "Success" {
        ACCENT
    } else {
        Color::Red
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", alert.title))
        .title_bottom(Line::from(" press any key ").right_aligned())
        .style(Style::default().bg(Color::Black));

    let text = Paragraph::new(alert.message.as_str())
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup_area);
    f.render_widget(text, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 BABYBEACON - Keyboard Shortcuts

 NAVIGATION
   1-5 / Tab          Switch tabs
   ↑ / ↓              Move selection
   Enter / Esc        Open / go back

 HOME
   s / x / r          Start scan / stop scan / refresh status

 MONITOR
   p                  Take snapshot

 RESPONSES
   a                  Add response
   p / Space          Play or pause
   d                  Remove response

 PROFILE
   e / n              Edit info / add baby
   Enter              Select baby
   l                  Log out

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

/// Renders a text input field; places the terminal cursor when focused
pub fn render_input(f: &mut Frame, field: &TextField, is_focused: bool, area: Rect) {
    let style = if is_focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(field.label);

    let content = if field.value.is_empty() && !is_focused {
        Line::from(Span::styled(field.placeholder, Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(field.display())
    };

    f.render_widget(Paragraph::new(content).block(block), area);

    if is_focused {
        f.set_cursor_position((area.x + 1 + field.cursor_column() as u16, area.y + 1));
    }
}

/// Stack a form's fields vertically, three rows each
pub fn draw_form(f: &mut Frame, form: &Form, active: bool, area: Rect) {
    let constraints: Vec<Constraint> = form
        .fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in form.fields.iter().enumerate() {
        render_input(f, field, active && i == form.focused, rows[i]);
    }
}

/// Rows a form occupies when drawn with [`draw_form`]
pub fn form_height(form: &Form) -> u16 {
    form.fields.len() as u16 * 3
}

/// A bordered label/value card
pub fn stat_card<'a>(label: &'a str, value: &'a str) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
        Line::from(Span::styled(value, Style::default().fg(ACCENT).bold())),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL))
}

/// Device status color
pub fn status_color(status: DeviceStatus) -> Color {
    match status {
        DeviceStatus::Scanning => ACCENT,
        DeviceStatus::Idle => Color::Yellow,
        DeviceStatus::Unknown => Color::DarkGray,
    }
}

/// A titled, bordered section
pub fn section(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" {} ", title), Style::default().bold()))
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
