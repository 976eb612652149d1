//! Command handlers - business logic for processing UI events

use crate::app::settings::{SettingsPage, SettingsState};
use crate::app::state::{
    Alert, AppState, HomeState, LoginState, MonitorState, Origin, PendingRequest, ProfileMode,
    ProfileState, ResponsesState, SaveBatch, SignupState,
};
use crate::messages::ui_events::{AppTab, Screen};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{DeviceStatus, Responses, SignupForm};
use crate::monitoring::MonitorSnapshot;
use crate::session::{Action, Outcome, UserUpdate};
use crate::validation;

impl AppState {
    // ========================
    // Requests
    // ========================

    /// Resolve `action` against the session and queue the call. A failed
    /// precondition is reported to `origin` as a failure with no request.
    pub fn dispatch(&mut self, action: Action, origin: Origin) -> Option<u64> {
        match self.session.prepare(&action) {
            Ok(call) => {
                let id = self.next_id();
                tracing::debug!(id, call = call.name(), "Queueing request");
                self.pending.insert(id, PendingRequest { action, origin });
                self.queue(NetworkCommand::Call { id, call });
                Some(id)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Request not issued");
                self.on_outcome(origin, Outcome::Failed);
                None
            }
        }
    }

    /// Route a network reply back through the session to its screen
    pub fn handle_response(&mut self, response: NetworkResponse) {
        let NetworkResponse::Completed { id, reply } = response;
        let Some(pending) = self.pending.remove(&id) else {
            tracing::debug!(id, "Dropping reply for unknown request");
            return;
        };
        let outcome = self.session.commit(&pending.action, reply);
        self.on_outcome(pending.origin, outcome);
    }

    fn on_outcome(&mut self, origin: Origin, outcome: Outcome) {
        let ok = outcome.is_success();
        match origin {
            Origin::Login => {
                self.login.loading = false;
                if ok {
                    self.login = LoginState::default();
                    self.screen = Screen::Main;
                    self.active_tab = AppTab::Home;
                    self.mount_tab(AppTab::Home);
                } else {
                    self.alert = Some(Alert::new("Login Failed", "Invalid username or password"));
                }
            }
            Origin::Signup => {
                self.signup.loading = false;
                if ok {
                    self.signup = SignupState::default();
                    self.screen = Screen::Login;
                    self.alert = Some(Alert::success("Account created, please log in"));
                } else {
                    self.alert = Some(Alert::error("Failed to sign up"));
                }
            }
            Origin::HomeStatus => {
                self.home.refreshing = false;
                if let Outcome::ScanStatus(status) = outcome {
                    self.home.device_status = status.status;
                }
            }
            Origin::HomeStart => {
                self.home.loading = false;
                if ok {
                    self.home.device_status = DeviceStatus::Scanning;
                }
            }
            Origin::HomeStop => {
                self.home.loading = false;
                if ok {
                    self.home.device_status = DeviceStatus::Idle;
                }
            }
            Origin::ProfileStartScan | Origin::ProfileStopScan => {
                self.profile.loading = false;
                let starting = origin == Origin::ProfileStartScan;
                if ok {
                    self.home.device_status = if starting {
                        DeviceStatus::Scanning
                    } else {
                        DeviceStatus::Idle
                    };
                } else if starting {
                    self.alert = Some(Alert::error("Failed to start scan"));
                } else {
                    self.alert = Some(Alert::error("Failed to stop scan"));
                }
            }
            Origin::ProfileSave => {
                let Some(mut batch) = self.profile.save else {
                    return;
                };
                batch.remaining = batch.remaining.saturating_sub(1);
                batch.all_ok &= ok;
                if batch.remaining > 0 {
                    self.profile.save = Some(batch);
                    return;
                }
                self.profile.save = None;
                self.finish_profile_save(batch.all_ok);
            }
            Origin::ProfileSelectBaby => {
                if ok {
                    self.responses.selected = 0;
                    self.responses.playing = None;
                } else {
                    self.alert = Some(Alert::error("Failed to select baby"));
                }
            }
            Origin::ProfileAddBaby => {
                if ok {
                    // the new baby becomes the scanning baby
                    self.responses.selected = 0;
                    self.responses.playing = None;
                    self.profile.baby_form.clear();
                    self.profile.mode = ProfileMode::View;
                    self.alert = Some(Alert::success("Baby added successfully"));
                } else {
                    self.alert = Some(Alert::error("Failed to add baby"));
                }
            }
            Origin::ResponseAdd => {
                if ok {
                    self.responses.form.clear();
                    self.responses.adding = false;
                    self.alert = Some(Alert::success("Response added successfully"));
                } else {
                    self.alert = Some(Alert::error("Failed to add response"));
                }
            }
            Origin::ResponseRemove(name) => {
                if ok {
                    if self.responses.playing.as_deref() == Some(name.as_str()) {
                        self.responses.playing = None;
                    }
                    self.clamp_response_selection();
                    self.alert = Some(Alert::success("Response removed successfully"));
                } else {
                    self.alert = Some(Alert::error("Failed to remove response"));
                }
            }
            Origin::ResponsePlay(name) => {
                if !ok {
                    if self.responses.playing.as_deref() == Some(name.as_str()) {
                        self.responses.playing = None;
                    }
                    self.alert = Some(Alert::error("Failed to play response"));
                }
            }
        }
    }

    // ========================
    // Navigation
    // ========================

    pub fn switch_tab(&mut self, tab: AppTab) {
        if self.screen != Screen::Main || tab == self.active_tab {
            return;
        }
        if self.active_tab == AppTab::Settings {
            self.settings = SettingsState::default();
        }
        self.active_tab = tab;
        self.mount_tab(tab);
    }

    pub fn next_tab(&mut self) {
        self.switch_tab(self.active_tab.next());
    }

    pub fn prev_tab(&mut self) {
        self.switch_tab(self.active_tab.prev());
    }

    /// Work a tab does each time it comes on screen
    pub(crate) fn mount_tab(&mut self, tab: AppTab) {
        if tab == AppTab::Home {
            self.refresh_status();
        }
    }

    pub fn go_to_signup(&mut self) {
        if self.screen == Screen::Login {
            self.screen = Screen::Signup;
        }
    }

    pub fn go_to_login(&mut self) {
        if self.screen == Screen::Signup {
            self.signup = SignupState::default();
            self.screen = Screen::Login;
        }
    }

    pub fn select_next(&mut self) {
        match self.active_tab {
            AppTab::Responses => {
                let count = self.response_names().len();
                if count > 0 {
                    self.responses.selected = (self.responses.selected + 1) % count;
                }
            }
            AppTab::Profile => {
                let count = self.baby_names().len();
                if count > 0 {
                    self.profile.selected_baby = (self.profile.selected_baby + 1) % count;
                }
            }
            AppTab::Settings => self.settings.select_next(),
            _ => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.active_tab {
            AppTab::Responses => {
                let count = self.response_names().len();
                if count > 0 {
                    self.responses.selected =
                        self.responses.selected.checked_sub(1).unwrap_or(count - 1);
                }
            }
            AppTab::Profile => {
                let count = self.baby_names().len();
                if count > 0 {
                    self.profile.selected_baby =
                        self.profile.selected_baby.checked_sub(1).unwrap_or(count - 1);
                }
            }
            AppTab::Settings => self.settings.select_prev(),
            _ => {}
        }
    }

    /// Enter outside of a form
    pub fn activate(&mut self) {
        match self.active_tab {
            AppTab::Responses => self.play_response(),
            AppTab::Profile => self.select_baby(),
            AppTab::Settings => self.settings.activate(),
            _ => {}
        }
    }

    /// Esc outside of a form
    pub fn back(&mut self) {
        if self.active_tab == AppTab::Settings && self.settings.page != SettingsPage::Index {
            self.settings.back();
        }
    }

    pub fn adjust(&mut self, steps: i32) {
        if self.active_tab == AppTab::Settings {
            self.settings.adjust(steps);
        }
    }

    pub fn toggle_setting(&mut self) {
        if self.active_tab == AppTab::Settings {
            self.settings.toggle();
        }
    }

    // ========================
    // Input editing
    // ========================

    pub fn enter_char(&mut self, c: char) {
        if let Some(form) = self.active_form_mut() {
            form.enter_char(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(form) = self.active_form_mut() {
            form.delete_char();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(form) = self.active_form_mut() {
            form.move_cursor_left();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(form) = self.active_form_mut() {
            form.move_cursor_right();
        }
    }

    pub fn next_field(&mut self) {
        if let Some(form) = self.active_form_mut() {
            form.next_field();
        }
    }

    pub fn prev_field(&mut self) {
        if let Some(form) = self.active_form_mut() {
            form.prev_field();
        }
    }

    /// Enter inside a form
    pub fn submit(&mut self) {
        match self.screen {
            Screen::Login => self.submit_login(),
            Screen::Signup => self.submit_signup(),
            Screen::Main => match (self.active_tab, self.profile.mode) {
                (AppTab::Responses, _) if self.responses.adding => self.submit_response(),
                (AppTab::Profile, ProfileMode::EditInfo) => self.save_profile(),
                (AppTab::Profile, ProfileMode::AddBaby) => self.submit_baby(),
                _ => {}
            },
        }
    }

    /// Esc inside a form on the main screen
    pub fn cancel_form(&mut self) {
        match self.active_tab {
            AppTab::Responses => {
                self.responses.adding = false;
                self.responses.form.clear();
            }
            AppTab::Profile => {
                self.profile.mode = ProfileMode::View;
                self.profile.baby_form.clear();
            }
            _ => {}
        }
    }

    // ========================
    // Login / signup
    // ========================

    fn submit_login(&mut self) {
        if self.login.loading {
            return;
        }
        let username = self.login.form.value(0).trim().to_string();
        let password = self.login.form.value(1).to_string();
        if let Err(e) = validation::validate_login(&username, &password) {
            self.alert = Some(Alert::error(e.to_string()));
            return;
        }
        self.login.loading = true;
        self.dispatch(Action::Login { username, password }, Origin::Login);
    }

    fn submit_signup(&mut self) {
        if self.signup.loading {
            return;
        }
        let value = |i: usize| self.signup.form.value(i).trim().to_string();
        let form = SignupForm {
            username: value(SignupState::USERNAME),
            password: self.signup.form.value(SignupState::PASSWORD).to_string(),
            name: value(SignupState::NAME),
            email: value(SignupState::EMAIL),
            phone_number: value(SignupState::PHONE),
            device_id: value(SignupState::DEVICE_ID),
            ..Default::default()
        };
        if let Err(e) = validation::validate_signup(&form) {
            self.alert = Some(Alert::error(e.to_string()));
            return;
        }
        self.signup.loading = true;
        self.dispatch(Action::Signup(form), Origin::Signup);
    }

    /// Forget the user and every piece of per-user screen state
    pub fn logout(&mut self) {
        self.session.logout();
        if !self.pending.is_empty() {
            tracing::debug!(count = self.pending.len(), "Abandoning in-flight requests");
        }
        self.pending.clear();
        self.home = HomeState::default();
        self.monitor = MonitorState::default();
        self.responses = ResponsesState::default();
        self.profile = ProfileState::default();
        self.settings = SettingsState::default();
        self.active_tab = AppTab::Home;
        self.screen = Screen::Login;
    }

    // ========================
    // Device
    // ========================

    pub fn refresh_status(&mut self) {
        if self.home.refreshing {
            return;
        }
        self.home.refreshing = true;
        self.dispatch(Action::ScanStatus, Origin::HomeStatus);
    }

    pub fn start_scan(&mut self) {
        match self.active_tab {
            AppTab::Home if self.home.can_start() => {
                self.home.loading = true;
                self.dispatch(Action::StartScan, Origin::HomeStart);
            }
            AppTab::Profile if !self.profile.loading => {
                self.profile.loading = true;
                self.dispatch(Action::StartScan, Origin::ProfileStartScan);
            }
            _ => {}
        }
    }

    pub fn stop_scan(&mut self) {
        match self.active_tab {
            AppTab::Home if self.home.can_stop() => {
                self.home.loading = true;
                self.dispatch(Action::StopScan, Origin::HomeStop);
            }
            AppTab::Profile if !self.profile.loading => {
                self.profile.loading = true;
                self.dispatch(Action::StopScan, Origin::ProfileStopScan);
            }
            _ => {}
        }
    }

    // ========================
    // Monitor
    // ========================

    pub fn take_snapshot(&mut self) {
        let now = chrono::Local::now();
        self.monitor.last_snapshot = now.format("%-I:%M %p").to_string();
        tracing::info!(at = %self.monitor.last_snapshot, "Snapshot taken");
    }

    pub fn apply_monitor_snapshot(&mut self, snapshot: MonitorSnapshot) {
        self.monitor.model.stats = snapshot.stats;
        self.monitor.model.status = snapshot.status;
        self.monitor.last_update = Some(snapshot.updated_at);
    }

    // ========================
    // Responses
    // ========================

    pub fn toggle_add_response(&mut self) {
        self.responses.adding = !self.responses.adding;
        if !self.responses.adding {
            self.responses.form.clear();
        }
    }

    fn selected_baby_name(&self) -> Option<String> {
        self.user()
            .and_then(|u| u.selected_baby())
            .map(|(name, _)| name.to_string())
    }

    fn submit_response(&mut self) {
        let baby = self.selected_baby_name();
        let name = self.responses.form.value(0).trim().to_string();
        let url = self.responses.form.value(1).trim().to_string();
        if let Err(e) = validation::validate_new_response(baby.as_deref(), &name, &url) {
            self.alert = Some(Alert::error(e.to_string()));
            return;
        }
        let Some(baby) = baby else {
            return;
        };
        let responses = Responses::from([(name, url)]);
        self.dispatch(Action::AddResponses { baby, responses }, Origin::ResponseAdd);
    }

    fn selected_response(&self) -> Option<(String, String)> {
        let user = self.user()?;
        let (_, baby) = user.selected_baby()?;
        baby.responses
            .iter()
            .nth(self.responses.selected)
            .map(|(name, url)| (name.clone(), url.clone()))
    }

    /// Pause the playing row, or play the selected one
    pub fn play_response(&mut self) {
        let Some((name, url)) = self.selected_response() else {
            return;
        };
        if self.responses.playing.as_deref() == Some(name.as_str()) {
            self.responses.playing = None;
            return;
        }
        self.responses.playing = Some(name.clone());
        self.dispatch(Action::SendResponse { url }, Origin::ResponsePlay(name));
    }

    pub fn remove_response(&mut self) {
        let Some(baby) = self.selected_baby_name() else {
            return;
        };
        let Some((name, _)) = self.selected_response() else {
            return;
        };
        self.dispatch(
            Action::RemoveResponses {
                baby,
                names: vec![name.clone()],
            },
            Origin::ResponseRemove(name),
        );
    }

    fn clamp_response_selection(&mut self) {
        let count = self.response_names().len();
        if self.responses.selected >= count {
            self.responses.selected = count.saturating_sub(1);
        }
    }

    // ========================
    // Profile
    // ========================

    /// Open the info form prefilled from the current user
    pub fn edit_profile(&mut self) {
        let Some(user) = self.user().cloned() else {
            return;
        };
        self.profile.info.set(0, user.name);
        self.profile.info.set(1, user.email);
        self.profile.info.set(2, user.phone_number);
        self.profile.info.focused = 0;
        self.profile.mode = ProfileMode::EditInfo;
    }

    pub fn toggle_add_baby(&mut self) {
        self.profile.mode = match self.profile.mode {
            ProfileMode::AddBaby => {
                self.profile.baby_form.clear();
                ProfileMode::View
            }
            _ => ProfileMode::AddBaby,
        };
    }

    /// One independent update per changed field; a single alert once all
    /// of them have answered
    fn save_profile(&mut self) {
        if self.profile.save.is_some() {
            return;
        }
        let Some(user) = self.user() else {
            return;
        };
        let info = &self.profile.info;
        let mut updates = Vec::new();
        if info.value(0) != user.name {
            updates.push(UserUpdate::Name(info.value(0).to_string()));
        }
        if info.value(1) != user.email {
            updates.push(UserUpdate::Email(info.value(1).to_string()));
        }
        if info.value(2) != user.phone_number {
            updates.push(UserUpdate::PhoneNumber(info.value(2).to_string()));
        }

        if updates.is_empty() {
            self.finish_profile_save(true);
            return;
        }
        self.profile.save = Some(SaveBatch {
            remaining: updates.len(),
            all_ok: true,
        });
        for update in updates {
            self.dispatch(Action::UpdateField(update), Origin::ProfileSave);
        }
    }

    fn finish_profile_save(&mut self, all_ok: bool) {
        if all_ok {
            self.profile.mode = ProfileMode::View;
            self.alert = Some(Alert::success("Profile updated successfully"));
        } else {
            self.alert = Some(Alert::error("Failed to update profile"));
        }
    }

    fn submit_baby(&mut self) {
        let name = self.profile.baby_form.value(0).trim().to_string();
        let age = self.profile.baby_form.value(1).trim().to_string();
        if let Err(e) = validation::validate_new_baby(&name, &age) {
            self.alert = Some(Alert::error(e.to_string()));
            return;
        }
        self.dispatch(Action::AddBaby { name, age }, Origin::ProfileAddBaby);
    }

    /// Make the baby under the cursor the scanning baby
    pub fn select_baby(&mut self) {
        let Some(name) = self.baby_names().get(self.profile.selected_baby).cloned() else {
            return;
        };
        self.dispatch(
            Action::UpdateField(UserUpdate::ScanningBaby(name)),
            Origin::ProfileSelectBaby,
        );
    }

    // ========================
    // Popups
    // ========================

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}
