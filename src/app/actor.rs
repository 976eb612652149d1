//! App actor - message loop processing UI events, network responses and
//! monitoring snapshots

use std::time::Duration;

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use crate::monitoring::{MonitorSnapshot, MonitoringPoller};

/// App actor that owns [`AppState`] and the monitoring poller
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
    poll_interval: Duration,
    poller: Option<MonitoringPoller>,
    monitor_tx: mpsc::UnboundedSender<MonitorSnapshot>,
    monitor_rx: mpsc::UnboundedReceiver<MonitorSnapshot>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        poll_interval: Duration,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        let (monitor_tx, monitor_rx) = mpsc::unbounded_channel();
        AppActor {
            state,
            network_tx,
            render_tx,
            poll_interval,
            poller: None,
            monitor_tx,
            monitor_rx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        self.flush();

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        self.stop_poller();
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                }
                Some(snapshot) = self.monitor_rx.recv() => {
                    self.state.apply_monitor_snapshot(snapshot);
                }
                else => break,
            }
            self.flush();
        }
    }

    /// Send queued requests, reconcile the poller, publish a frame
    fn flush(&mut self) {
        for command in self.state.take_commands() {
            let _ = self.network_tx.send(command);
        }
        self.sync_poller();
        let _ = self.render_tx.send(self.state.to_render_state());
    }

    fn sync_poller(&mut self) {
        let running = self.poller.is_some();
        if self.state.wants_monitoring() && !running {
            self.poller = Some(MonitoringPoller::start(
                self.poll_interval,
                self.state.monitor.model.clone(),
                self.monitor_tx.clone(),
            ));
        } else if !self.state.wants_monitoring() && running {
            self.stop_poller();
        }
    }

    fn stop_poller(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
        // snapshots already queued belong to the stopped schedule
        while self.monitor_rx.try_recv().is_ok() {}
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Tab navigation
            UiEvent::SwitchTab(tab) => self.state.switch_tab(tab),
            UiEvent::NextTab => self.state.next_tab(),
            UiEvent::PrevTab => self.state.prev_tab(),

            // List / slider navigation
            UiEvent::Up => self.state.select_prev(),
            UiEvent::Down => self.state.select_next(),
            UiEvent::Left => self.state.adjust(-1),
            UiEvent::Right => self.state.adjust(1),
            UiEvent::Select => self.state.activate(),
            UiEvent::Back => self.state.back(),

            // Form editing
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),
            UiEvent::Submit => self.state.submit(),
            UiEvent::CancelForm => self.state.cancel_form(),

            // Login / signup
            UiEvent::GoToSignup => self.state.go_to_signup(),
            UiEvent::GoToLogin => self.state.go_to_login(),

            // Device
            UiEvent::StartScan => self.state.start_scan(),
            UiEvent::StopScan => self.state.stop_scan(),
            UiEvent::RefreshStatus => self.state.refresh_status(),

            // Monitor
            UiEvent::TakeSnapshot => self.state.take_snapshot(),

            // Responses
            UiEvent::ToggleAddResponse => self.state.toggle_add_response(),
            UiEvent::PlayResponse => self.state.play_response(),
            UiEvent::RemoveResponse => self.state.remove_response(),

            // Profile
            UiEvent::EditProfile => self.state.edit_profile(),
            UiEvent::ToggleAddBaby => self.state.toggle_add_baby(),
            UiEvent::Logout => self.state.logout(),

            // Settings
            UiEvent::Toggle => self.state.toggle_setting(),

            // Popups
            UiEvent::DismissAlert => self.state.dismiss_alert(),
            UiEvent::ToggleHelp => self.state.toggle_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::ui_events::AppTab;
    use crate::models::User;
    use crate::session::Session;
    use crate::storage::SessionStorage;
    use tempfile::tempdir;

    #[tokio::test(start_paused = true)]
    async fn test_poller_runs_only_on_monitor_tab() {
        let dir = tempdir().unwrap();
        let storage = SessionStorage::new(dir.path());
        storage
            .save(&User {
                username: "anna".into(),
                device_id: "pi-42".into(),
                ..Default::default()
            })
            .unwrap();
        let state = AppState::new(Session::rehydrate(storage));

        let (network_tx, mut network_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (_net_tx, net_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(state, Duration::from_secs(20), network_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, net_rx));

        // the Home mount fetches device status
        assert!(matches!(
            network_rx.recv().await,
            Some(NetworkCommand::Call { .. })
        ));
        let first = render_rx.recv().await.unwrap();
        assert_eq!(first.monitor.last_update, None);

        ui_tx.send(UiEvent::SwitchTab(AppTab::Monitor)).unwrap();
        let frame = loop {
            let frame = render_rx.recv().await.unwrap();
            if frame.monitor.last_update.is_some() {
                break frame;
            }
        };
        assert_eq!(frame.active_tab, AppTab::Monitor);

        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();
        assert!(matches!(
            network_rx.recv().await,
            Some(NetworkCommand::Shutdown)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_stops_when_leaving_monitor_tab() {
        let dir = tempdir().unwrap();
        let storage = SessionStorage::new(dir.path());
        storage
            .save(&User {
                username: "anna".into(),
                device_id: "pi-42".into(),
                ..Default::default()
            })
            .unwrap();
        let state = AppState::new(Session::rehydrate(storage));

        let (network_tx, _network_rx) = mpsc::unbounded_channel();
        let (render_tx, mut render_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (_net_tx, net_rx) = mpsc::unbounded_channel();

        let interval = Duration::from_secs(20);
        let actor = AppActor::new(state, interval, network_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, net_rx));

        ui_tx.send(UiEvent::SwitchTab(AppTab::Monitor)).unwrap();
        loop {
            let frame = render_rx.recv().await.unwrap();
            if frame.monitor.last_update.is_some() {
                break;
            }
        }

        ui_tx.send(UiEvent::SwitchTab(AppTab::Home)).unwrap();
        let stopped_at = loop {
            let frame = render_rx.recv().await.unwrap();
            if frame.active_tab == AppTab::Home {
                break frame.monitor.last_update;
            }
        };
        assert!(stopped_at.is_some());

        tokio::time::advance(interval * 3).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        while let Ok(frame) = render_rx.try_recv() {
            assert_eq!(frame.active_tab, AppTab::Home);
            assert_eq!(frame.monitor.last_update, stopped_at);
        }

        ui_tx.send(UiEvent::Quit).unwrap();
        handle.await.unwrap();
    }
}
