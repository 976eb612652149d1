//! App state - pure data structure with no I/O logic

use std::collections::HashMap;

use chrono::{DateTime, Local};

use crate::app::form::{Form, TextField};
use crate::app::settings::SettingsState;
use crate::messages::ui_events::{AppTab, InputMode, KeyContext, Screen};
use crate::messages::{NetworkCommand, RenderState};
use crate::models::{DeviceStatus, User};
use crate::monitoring::MonitoringModel;
use crate::session::{Action, Session};

/// Placeholder shown before the first snapshot is taken
pub const INITIAL_SNAPSHOT_LABEL: &str = "2:45 PM";

/// A modal message; any key dismisses it
#[derive(Clone, Debug, PartialEq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Alert {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("Error", message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new("Success", message)
    }
}

/// Which screen control issued a request, so its reply lands in the right place
#[derive(Clone, Debug, PartialEq)]
pub enum Origin {
    Login,
    Signup,
    HomeStatus,
    HomeStart,
    HomeStop,
    ProfileSave,
    ProfileSelectBaby,
    ProfileAddBaby,
    ProfileStartScan,
    ProfileStopScan,
    ResponseAdd,
    ResponseRemove(String),
    ResponsePlay(String),
}

/// A request in flight, keyed by id in [`AppState::pending`]
#[derive(Clone, Debug)]
pub struct PendingRequest {
    pub action: Action,
    pub origin: Origin,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoginState {
    pub form: Form,
    pub loading: bool,
}

impl Default for LoginState {
    fn default() -> Self {
        LoginState {
            form: Form::new(vec![
                TextField::new("Username").placeholder("Username"),
                TextField::new("Password").placeholder("Password").masked(),
            ]),
            loading: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignupState {
    pub form: Form,
    pub loading: bool,
}

impl SignupState {
    pub const USERNAME: usize = 0;
    pub const PASSWORD: usize = 1;
    pub const NAME: usize = 2;
    pub const EMAIL: usize = 3;
    pub const PHONE: usize = 4;
    pub const DEVICE_ID: usize = 5;
}

impl Default for SignupState {
    fn default() -> Self {
        SignupState {
            form: Form::new(vec![
                TextField::new("Username"),
                TextField::new("Password").masked(),
                TextField::new("Full Name"),
                TextField::new("Email"),
                TextField::new("Phone Number"),
                TextField::new("Device ID"),
            ]),
            loading: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HomeState {
    pub device_status: DeviceStatus,
    /// Start/stop in flight
    pub loading: bool,
    /// Status fetch in flight
    pub refreshing: bool,
}

impl HomeState {
    pub fn can_start(&self) -> bool {
        !self.loading && self.device_status != DeviceStatus::Scanning
    }

    pub fn can_stop(&self) -> bool {
        !self.loading && self.device_status == DeviceStatus::Scanning
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonitorState {
    pub model: MonitoringModel,
    pub last_update: Option<DateTime<Local>>,
    pub last_snapshot: String,
}

impl Default for MonitorState {
    fn default() -> Self {
        MonitorState {
            model: MonitoringModel::default(),
            last_update: None,
            last_snapshot: String::from(INITIAL_SNAPSHOT_LABEL),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResponsesState {
    pub adding: bool,
    pub form: Form,
    pub selected: usize,
    pub playing: Option<String>,
}

impl Default for ResponsesState {
    fn default() -> Self {
        ResponsesState {
            adding: false,
            form: Form::new(vec![
                TextField::new("Name").placeholder("Response Name (e.g. Lullaby)"),
                TextField::new("URL").placeholder("YouTube URL"),
            ]),
            selected: 0,
            playing: None,
        }
    }
}

/// Which profile form, if any, has the keyboard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProfileMode {
    #[default]
    View,
    EditInfo,
    AddBaby,
}

/// Aggregates independent field updates into one alert
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveBatch {
    pub remaining: usize,
    pub all_ok: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfileState {
    pub mode: ProfileMode,
    pub info: Form,
    pub baby_form: Form,
    /// Cursor in the babies list
    pub selected_baby: usize,
    pub loading: bool,
    pub save: Option<SaveBatch>,
}

impl Default for ProfileState {
    fn default() -> Self {
        ProfileState {
            mode: ProfileMode::View,
            info: Form::new(vec![
                TextField::new("Name"),
                TextField::new("Email"),
                TextField::new("Phone"),
            ]),
            baby_form: Form::new(vec![
                TextField::new("Baby's Name"),
                TextField::new("Baby's Age").placeholder("e.g. 6 months"),
            ]),
            selected_baby: 0,
            loading: false,
            save: None,
        }
    }
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub screen: Screen,
    pub active_tab: AppTab,
    pub session: Session,

    // Per-screen state
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

    // Requests
    pub next_request_id: u64,
    pub pending: HashMap<u64, PendingRequest>,
    outbox: Vec<NetworkCommand>,
}

impl AppState {
    /// Start on Home when the session rehydrated a user, else on Login
    pub fn new(session: Session) -> Self {
        let screen = if session.is_logged_in() {
            Screen::Main
        } else {
            Screen::Login
        };
        let mut state = AppState {
            screen,
            active_tab: AppTab::Home,
            session,
            login: LoginState::default(),
            signup: SignupState::default(),
            home: HomeState::default(),
            monitor: MonitorState::default(),
            responses: ResponsesState::default(),
            profile: ProfileState::default(),
            settings: SettingsState::default(),
            alert: None,
            show_help: false,
            next_request_id: 1,
            pending: HashMap::new(),
            outbox: Vec::new(),
        };
        if state.screen == Screen::Main {
            state.mount_tab(AppTab::Home);
        }
        state
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub(crate) fn queue(&mut self, command: NetworkCommand) {
        self.outbox.push(command);
    }

    /// Drain commands produced since the last call
    pub fn take_commands(&mut self) -> Vec<NetworkCommand> {
        std::mem::take(&mut self.outbox)
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    /// Names of the selected baby's responses, in display order
    pub fn response_names(&self) -> Vec<String> {
        self.user()
            .and_then(|u| u.selected_baby())
            .map(|(_, baby)| baby.responses.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn baby_names(&self) -> Vec<String> {
        self.user()
            .map(|u| u.baby.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn input_mode(&self) -> InputMode {
        match self.screen {
            Screen::Login | Screen::Signup => InputMode::Editing,
            Screen::Main => {
                let editing = match self.active_tab {
                    AppTab::Responses => self.responses.adding,
                    AppTab::Profile => self.profile.mode != ProfileMode::View,
                    _ => false,
                };
                if editing {
                    InputMode::Editing
                } else {
                    InputMode::Normal
                }
            }
        }
    }

    /// The form that has the keyboard, if any
    pub fn active_form_mut(&mut self) -> Option<&mut Form> {
        match self.screen {
            Screen::Login => Some(&mut self.login.form),
            Screen::Signup => Some(&mut self.signup.form),
            Screen::Main => match (self.active_tab, self.profile.mode) {
                (AppTab::Responses, _) if self.responses.adding => Some(&mut self.responses.form),
                (AppTab::Profile, ProfileMode::EditInfo) => Some(&mut self.profile.info),
                (AppTab::Profile, ProfileMode::AddBaby) => Some(&mut self.profile.baby_form),
                _ => None,
            },
        }
    }

    /// The poller should run exactly while the Monitor tab is on screen
    pub fn wants_monitoring(&self) -> bool {
        self.screen == Screen::Main && self.active_tab == AppTab::Monitor
    }

    pub fn key_context(&self) -> KeyContext {
        KeyContext {
            screen: self.screen,
            tab: self.active_tab,
            settings_page: self.settings.page,
            input_mode: self.input_mode(),
            show_alert: self.alert.is_some(),
            show_help: self.show_help,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            screen: self.screen,
            active_tab: self.active_tab,
            key_context: self.key_context(),
            user: self.session.user().cloned(),
            login: self.login.clone(),
            signup: self.signup.clone(),
            home: self.home.clone(),
            monitor: self.monitor.clone(),
            responses: self.responses.clone(),
            profile: self.profile.clone(),
            settings: self.settings.clone(),
            alert: self.alert.clone(),
            show_help: self.show_help,
        }
    }
}
