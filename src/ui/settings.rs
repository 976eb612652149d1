use ratatui::{prelude::*, widgets::*};

use super::{section, stat_card, ACCENT};
use crate::app::settings::{
    index_entries, SettingsPage, SettingsState, Slider, ToggleSetting, SETTINGS_GROUPS,
    STATISTICS_SUMMARY,
};
use crate::constants::{APP_DESCRIPTION, APP_NAME, APP_VERSION};
use crate::messages::RenderState;

pub fn draw(f: &mut Frame, state: &RenderState, area: Rect) {
    let settings = &state.settings;
    match settings.page {
        SettingsPage::Index => draw_index(f, settings, area),
        SettingsPage::Notifications => {
            let items = settings.notifications.iter().map(toggle_item).collect();
            draw_rows(f, settings, items, area);
        }
        SettingsPage::Sounds => {
            let sounds = &settings.sounds;
            let mut items: Vec<ListItem> = sounds.toggles.iter().map(toggle_item).collect();
            items.push(slider_item(&sounds.default_volume, sounds.volume_label()));
            items.push(slider_item(&sounds.fade_time, sounds.fade_label()));
            draw_rows(f, settings, items, area);
        }
        SettingsPage::Thresholds => {
            let items = settings
                .thresholds
                .iter()
                .map(|s| slider_item(s, s.percent_label()))
                .collect();
            draw_rows(f, settings, items, area);
        }
        SettingsPage::Statistics => draw_statistics(f, area),
        SettingsPage::About => {
            let lines = vec![
                Line::from(Span::styled(APP_NAME, Style::default().fg(ACCENT).bold())),
                Line::from(format!("Version {}", APP_VERSION)),
                Line::from(""),
                Line::from(APP_DESCRIPTION),
            ];
            f.render_widget(
                Paragraph::new(lines)
                    .centered()
                    .wrap(Wrap { trim: true })
                    .block(page_block(settings.page)),
                area,
            );
        }
        SettingsPage::Device | SettingsPage::Triggers => {
            f.render_widget(
                Paragraph::new("Coming soon")
                    .style(Style::default().fg(Color::DarkGray))
                    .centered()
                    .block(page_block(settings.page)),
                area,
            );
        }
    }
}

fn page_block(page: SettingsPage) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", page.title()))
        .title_bottom(Line::from(" Esc: back ").right_aligned())
}

fn draw_index(f: &mut Frame, settings: &SettingsState, area: Rect) {
    let entries = index_entries();
    let selected = entries.get(settings.index_selected).copied();

    let mut lines = Vec::new();
    for group in SETTINGS_GROUPS {
        lines.push(Line::from(Span::styled(
            group.title.to_uppercase(),
            Style::default().fg(Color::Gray).bold(),
        )));
        for page in group.items {
            let style = if Some(*page) == selected {
                Style::default().fg(Color::Black).bg(ACCENT)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(format!("  {}  ›", page.title()), style)));
        }
        lines.push(Line::from(""));
    }
    f.render_widget(Paragraph::new(lines).block(section("Settings")), area);
}

fn toggle_item(setting: &ToggleSetting) -> ListItem<'static> {
    let (mark, color) = if setting.enabled {
        ("[on] ", ACCENT)
    } else {
        ("[off]", Color::DarkGray)
    };
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(mark, Style::default().fg(color)),
            Span::raw(" "),
            Span::styled(setting.title, Style::default().bold()),
        ]),
        Line::from(Span::styled(
            format!("      {}", setting.description),
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

fn slider_item(slider: &Slider, label: String) -> ListItem<'static> {
    const WIDTH: usize = 20;
    let filled = (slider.ratio() * WIDTH as f64).round() as usize;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(WIDTH - filled.min(WIDTH)));
    ListItem::new(vec![
        Line::from(Span::styled(slider.name, Style::default().bold())),
        Line::from(vec![
            Span::styled(bar, Style::default().fg(ACCENT)),
            Span::raw(format!(" {}", label)),
        ]),
    ])
}

fn draw_rows(f: &mut Frame, settings: &SettingsState, items: Vec<ListItem>, area: Rect) {
    let list = List::new(items)
        .block(page_block(settings.page))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(settings.selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_statistics(f: &mut Frame, area: Rect) {
    let block = page_block(SettingsPage::Statistics);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(4), Constraint::Min(0)])
        .split(inner);
    for (row, pair) in STATISTICS_SUMMARY.chunks(2).enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[row]);
        for (col, (label, value)) in pair.iter().enumerate() {
            f.render_widget(stat_card(label, value), cols[col]);
        }
    }
}
