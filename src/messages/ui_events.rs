//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::settings::SettingsPage;

/// Top-level screens
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Screen {
    #[default]
    Login,
    Signup,
    Main,
}

/// Tabs of the main screen
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AppTab {
    #[default]
    Home,
    Monitor,
    Responses,
    Profile,
    Settings,
}

impl AppTab {
    pub const ALL: [AppTab; 5] = [
        AppTab::Home,
        AppTab::Monitor,
        AppTab::Responses,
        AppTab::Profile,
        AppTab::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AppTab::Home => "Home",
            AppTab::Monitor => "Monitor",
            AppTab::Responses => "Responses",
            AppTab::Profile => "Profile",
            AppTab::Settings => "Settings",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> AppTab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> AppTab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Tab navigation
    SwitchTab(AppTab),
    NextTab,
    PrevTab,

    // List / slider navigation
    Up,
    Down,
    Left,
    Right,
    Select,
    Back,

    // Form editing
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    NextField,
    PrevField,
    Submit,
    CancelForm,

    // Login / signup
    GoToSignup,
    GoToLogin,

    // Device
    StartScan,
    StopScan,
    RefreshStatus,

    // Monitor
    TakeSnapshot,

    // Responses
    ToggleAddResponse,
    PlayResponse,
    RemoveResponse,

    // Profile
    EditProfile,
    ToggleAddBaby,
    Logout,

    // Settings
    Toggle,

    // Popups
    DismissAlert,
    ToggleHelp,

    // System
    Quit,
}

/// What the key mapper needs to know about the current UI
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KeyContext {
    pub screen: Screen,
    pub tab: AppTab,
    pub settings_page: SettingsPage,
    pub input_mode: InputMode,
    pub show_alert: bool,
    pub show_help: bool,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, ctx: KeyContext) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            KeyCode::Char('n') if ctx.screen == Screen::Login => return Some(UiEvent::GoToSignup),
            _ => {}
        }
    }

    // Popups swallow the next key
    if ctx.show_alert {
        return Some(UiEvent::DismissAlert);
    }
    if ctx.show_help {
        return Some(UiEvent::ToggleHelp);
    }

    match ctx.screen {
        Screen::Login => handle_form_keys(key).or(match key.code {
            KeyCode::Esc => Some(UiEvent::Quit),
            _ => None,
        }),
        Screen::Signup => handle_form_keys(key).or(match key.code {
            KeyCode::Esc => Some(UiEvent::GoToLogin),
            _ => None,
        }),
        Screen::Main => match ctx.input_mode {
            InputMode::Editing => handle_form_keys(key).or(match key.code {
                KeyCode::Esc => Some(UiEvent::CancelForm),
                _ => None,
            }),
            InputMode::Normal => handle_main_keys(key, ctx.tab, ctx.settings_page),
        },
    }
}

/// Keys shared by every text form
fn handle_form_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Enter => Some(UiEvent::Submit),
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(UiEvent::CharInput(c))
        }
        _ => None,
    }
}

/// Keys on the main screen outside of forms
fn handle_main_keys(key: KeyEvent, tab: AppTab, page: SettingsPage) -> Option<UiEvent> {
    let common = match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            Some(UiEvent::SwitchTab(AppTab::ALL[index]))
        }
        KeyCode::Tab => Some(UiEvent::NextTab),
        KeyCode::BackTab => Some(UiEvent::PrevTab),
        KeyCode::Up => Some(UiEvent::Up),
        KeyCode::Down => Some(UiEvent::Down),
        KeyCode::Left => Some(UiEvent::Left),
        KeyCode::Right => Some(UiEvent::Right),
        KeyCode::Enter => Some(UiEvent::Select),
        KeyCode::Esc => Some(UiEvent::Back),
        _ => None,
    };
    if common.is_some() {
        return common;
    }

    match (tab, key.code) {
        (AppTab::Home, KeyCode::Char('s')) => Some(UiEvent::StartScan),
        (AppTab::Home, KeyCode::Char('x')) => Some(UiEvent::StopScan),
        (AppTab::Home, KeyCode::Char('r')) => Some(UiEvent::RefreshStatus),

        (AppTab::Monitor, KeyCode::Char('p')) => Some(UiEvent::TakeSnapshot),

        (AppTab::Responses, KeyCode::Char('a')) => Some(UiEvent::ToggleAddResponse),
        (AppTab::Responses, KeyCode::Char('p') | KeyCode::Char(' ')) => {
            Some(UiEvent::PlayResponse)
        }
        (AppTab::Responses, KeyCode::Char('d')) => Some(UiEvent::RemoveResponse),

        (AppTab::Profile, KeyCode::Char('e')) => Some(UiEvent::EditProfile),
        (AppTab::Profile, KeyCode::Char('n')) => Some(UiEvent::ToggleAddBaby),
        (AppTab::Profile, KeyCode::Char('s')) => Some(UiEvent::StartScan),
        (AppTab::Profile, KeyCode::Char('x')) => Some(UiEvent::StopScan),
        (AppTab::Profile, KeyCode::Char('l')) => Some(UiEvent::Logout),

        (AppTab::Settings, KeyCode::Char(' ')) if page != SettingsPage::Index => {
            Some(UiEvent::Toggle)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn main_ctx(tab: AppTab) -> KeyContext {
        KeyContext {
            screen: Screen::Main,
            tab,
            ..Default::default()
        }
    }

    #[test]
    fn test_login_typing_is_text() {
        let ctx = KeyContext::default();
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('q')), ctx),
            Some(UiEvent::CharInput('q'))
        );
        assert_eq!(key_to_ui_event(press(KeyCode::Enter), ctx), Some(UiEvent::Submit));
        assert_eq!(key_to_ui_event(press(KeyCode::Esc), ctx), Some(UiEvent::Quit));
        assert_eq!(
            key_to_ui_event(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL), ctx),
            Some(UiEvent::GoToSignup)
        );
    }

    #[test]
    fn test_alert_swallows_keys() {
        let ctx = KeyContext {
            show_alert: true,
            ..main_ctx(AppTab::Home)
        };
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('s')), ctx),
            Some(UiEvent::DismissAlert)
        );
        assert_eq!(
            key_to_ui_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), ctx),
            Some(UiEvent::Quit)
        );
    }

    #[test]
    fn test_tab_specific_keys() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('s')), main_ctx(AppTab::Home)),
            Some(UiEvent::StartScan)
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('s')), main_ctx(AppTab::Monitor)),
            None
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('3')), main_ctx(AppTab::Home)),
            Some(UiEvent::SwitchTab(AppTab::Responses))
        );
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('d')), main_ctx(AppTab::Responses)),
            Some(UiEvent::RemoveResponse)
        );
    }

    #[test]
    fn test_editing_on_main_screen() {
        let ctx = KeyContext {
            input_mode: InputMode::Editing,
            ..main_ctx(AppTab::Responses)
        };
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('d')), ctx),
            Some(UiEvent::CharInput('d'))
        );
        assert_eq!(key_to_ui_event(press(KeyCode::Esc), ctx), Some(UiEvent::CancelForm));
    }

    #[test]
    fn test_release_events_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(key_to_ui_event(key, main_ctx(AppTab::Home)), None);
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(AppTab::Settings.next(), AppTab::Home);
        assert_eq!(AppTab::Home.prev(), AppTab::Settings);
    }
}
