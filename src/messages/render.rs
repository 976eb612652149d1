//! Render state - data structure sent from App layer to UI for rendering

use crate::app::settings::SettingsState;
use crate::app::state::{
    Alert, HomeState, LoginState, MonitorState, ProfileState, ResponsesState, SignupState,
};
use crate::messages::ui_events::{AppTab, KeyContext, Screen};
use crate::models::User;

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    pub screen: Screen,
    pub active_tab: AppTab,
    /// Handed back to the key mapper
    pub key_context: KeyContext,
    pub user: Option<User>,

    pub login: LoginState,
    pub signup: SignupState,
    pub home: HomeState,
    pub monitor: MonitorState,
    pub responses: ResponsesState,
    pub profile: ProfileState,
    pub settings: SettingsState,

    // Popups
    pub alert: Option<Alert>,
    pub show_help: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            screen: Screen::Login,
            active_tab: AppTab::Home,
            key_context: KeyContext::default(),
            user: None,
            login: LoginState::default(),
            signup: SignupState::default(),
            home: HomeState::default(),
            monitor: MonitorState::default(),
            responses: ResponsesState::default(),
            profile: ProfileState::default(),
            settings: SettingsState::default(),
            alert: None,
            show_help: false,
        }
    }
}

impl RenderState {
    /// Responses of the selected baby, in display order
    pub fn response_entries(&self) -> Vec<(&str, &str)> {
        self.user
            .as_ref()
            .and_then(|u| u.selected_baby())
            .map(|(_, baby)| {
                baby.responses
                    .iter()
                    .map(|(name, url)| (name.as_str(), url.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
