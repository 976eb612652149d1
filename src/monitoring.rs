//! Mock monitoring statistics and the poller that refreshes them
//!
//! Nothing here talks to a sensor. Each tick resamples movement and sound
//! level and may flip the sleeping/awake status; the values exist only to
//! populate the Monitor screen.

use std::time::Duration;

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Probability that movement reads `Low` on a tick
const P_MOVEMENT_LOW: f64 = 0.5;
/// Probability that sound level reads `Moderate` on a tick
const P_SOUND_MODERATE: f64 = 0.3;
/// Probability that the baby status flips on a tick
const P_STATUS_FLIP: f64 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    Low,
    Medium,
}

impl Movement {
    pub fn label(&self) -> &'static str {
        match self {
            Movement::Low => "Low",
            Movement::Medium => "Medium",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundLevel {
    Quiet,
    Moderate,
}

impl SoundLevel {
    pub fn label(&self) -> &'static str {
        match self {
            SoundLevel::Quiet => "Quiet",
            SoundLevel::Moderate => "Moderate",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BabyStatus {
    #[default]
    Sleeping,
    Awake,
}

impl BabyStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BabyStatus::Sleeping => "Sleeping",
            BabyStatus::Awake => "Awake",
        }
    }

    pub fn flipped(&self) -> BabyStatus {
        match self {
            BabyStatus::Sleeping => BabyStatus::Awake,
            BabyStatus::Awake => BabyStatus::Sleeping,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonitoringStats {
    pub sleep_quality: String,
    pub movement: Movement,
    pub sound_level: SoundLevel,
    pub temperature: String,
}

impl Default for MonitoringStats {
    fn default() -> Self {
        MonitoringStats {
            sleep_quality: String::from("Good"),
            movement: Movement::Low,
            sound_level: SoundLevel::Quiet,
            temperature: String::from("72°F"),
        }
    }
}

/// What the poller publishes after each tick
#[derive(Clone, Debug)]
pub struct MonitorSnapshot {
    pub stats: MonitoringStats,
    pub status: BabyStatus,
    pub updated_at: DateTime<Local>,
}

/// The mutable state the poller advances
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MonitoringModel {
    pub stats: MonitoringStats,
    pub status: BabyStatus,
}

impl MonitoringModel {
    /// Advance one tick
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.stats.movement = if rng.random_bool(P_MOVEMENT_LOW) {
            Movement::Low
        } else {
            Movement::Medium
        };
        self.stats.sound_level = if rng.random_bool(P_SOUND_MODERATE) {
            SoundLevel::Moderate
        } else {
            SoundLevel::Quiet
        };
        if rng.random_bool(P_STATUS_FLIP) {
            self.status = self.status.flipped();
        }
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            stats: self.stats.clone(),
            status: self.status,
            updated_at: Local::now(),
        }
    }
}

/// Recurring background task driving a [`MonitoringModel`].
///
/// Ticks once immediately, then every `interval`. Stopped explicitly with
/// [`MonitoringPoller::stop`] or implicitly on drop.
pub struct MonitoringPoller {
    cancel_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl MonitoringPoller {
    /// Start from `model` with an OS-seeded RNG
    pub fn start(
        interval: Duration,
        model: MonitoringModel,
        tx: mpsc::UnboundedSender<MonitorSnapshot>,
    ) -> Self {
        let rng = StdRng::from_rng(&mut rand::rng());
        Self::start_with_rng(interval, model, rng, tx)
    }

    pub fn start_with_rng<R>(
        interval: Duration,
        mut model: MonitoringModel,
        mut rng: R,
        tx: mpsc::UnboundedSender<MonitorSnapshot>,
    ) -> Self
    where
        R: Rng + Send + 'static,
    {
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        tracing::info!(interval_secs = interval.as_secs(), "Setting up monitoring interval");

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;

                    _ = &mut cancel_rx => break,
                    _ = ticker.tick() => {
                        model.tick(&mut rng);
                        tracing::debug!(
                            movement = model.stats.movement.label(),
                            sound_level = model.stats.sound_level.label(),
                            status = model.status.label(),
                            "Updating stats"
                        );
                        if tx.send(model.snapshot()).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::info!("Cleaning up monitoring interval");
        });

        MonitoringPoller {
            cancel_tx: Some(cancel_tx),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the schedule. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(cancel_tx) = self.cancel_tx.take() {
            let _ = cancel_tx.send(());
        }
        self.handle.take();
    }
}

impl Drop for MonitoringPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model() {
        let model = MonitoringModel::default();
        assert_eq!(model.status, BabyStatus::Sleeping);
        assert_eq!(model.stats.sleep_quality, "Good");
        assert_eq!(model.stats.temperature, "72°F");
        assert_eq!(model.stats.movement, Movement::Low);
        assert_eq!(model.stats.sound_level, SoundLevel::Quiet);
    }

    #[test]
    fn test_tick_distribution() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut model = MonitoringModel::default();
        let ticks = 20_000;
        let (mut low, mut moderate, mut flips) = (0, 0, 0);

        for _ in 0..ticks {
            let before = model.status;
            model.tick(&mut rng);
            if model.stats.movement == Movement::Low {
                low += 1;
            }
            if model.stats.sound_level == SoundLevel::Moderate {
                moderate += 1;
            }
            if model.status != before {
                flips += 1;
            }
            // untouched by ticks
            assert_eq!(model.stats.sleep_quality, "Good");
            assert_eq!(model.stats.temperature, "72°F");
        }

        let frac = |n: i32| n as f64 / ticks as f64;
        assert!((0.47..0.53).contains(&frac(low)), "low = {}", frac(low));
        assert!((0.27..0.33).contains(&frac(moderate)), "moderate = {}", frac(moderate));
        assert!((0.37..0.43).contains(&frac(flips)), "flips = {}", frac(flips));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Movement::Medium.label(), "Medium");
        assert_eq!(SoundLevel::Moderate.label(), "Moderate");
        assert_eq!(BabyStatus::Awake.flipped(), BabyStatus::Sleeping);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_ticks_at_interval() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let interval = Duration::from_secs(20);
        let _poller = MonitoringPoller::start_with_rng(
            interval,
            MonitoringModel::default(),
            StdRng::seed_from_u64(1),
            tx,
        );

        let start = tokio::time::Instant::now();
        rx.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);

        for n in 1..=3u32 {
            rx.recv().await.unwrap();
            assert_eq!(start.elapsed(), interval * n);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_schedule() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut poller = MonitoringPoller::start_with_rng(
            Duration::from_secs(20),
            MonitoringModel::default(),
            StdRng::seed_from_u64(1),
            tx,
        );
        rx.recv().await.unwrap();
        assert!(poller.is_running());

        poller.stop();
        assert!(!poller.is_running());
        // sender is dropped once the task exits
        assert!(rx.recv().await.is_none());
        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_schedule() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let poller = MonitoringPoller::start(
            Duration::from_secs(20),
            MonitoringModel::default(),
            tx,
        );
        rx.recv().await.unwrap();
        drop(poller);
        assert!(rx.recv().await.is_none());
    }
}
